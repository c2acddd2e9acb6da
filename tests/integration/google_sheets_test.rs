// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Local, TimeZone};
use findmini_crawler::config::settings::{Settings, SheetsSettings};
use findmini_crawler::domain::models::item_record::{ItemRecord, ResultSet};
use findmini_crawler::domain::models::run_context::RunContext;
use findmini_crawler::domain::models::sheet_plan::SheetWritePlan;
use findmini_crawler::domain::repositories::sheet_destination::{
    DestinationError, SheetDestination,
};
use findmini_crawler::infrastructure::sheets::google_sheets::GoogleSheetsClient;
use serde_json::json;
use wiremock::matchers::{any, body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sheets_settings(server: &MockServer, overrides: &[(&str, &str)]) -> SheetsSettings {
    let api = server.uri();
    let drive = format!("{}/drive/v3", server.uri());
    let mut all: Vec<(&str, &str)> = vec![
        ("sheets.api_base_url", api.as_str()),
        ("sheets.drive_api_base_url", drive.as_str()),
    ];
    all.extend_from_slice(overrides);
    Settings::from_overrides(&all).unwrap().sheets
}

fn ctx() -> RunContext {
    RunContext::at(Local.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap())
}

fn plan() -> SheetWritePlan {
    let results: ResultSet = ["Alpha", "Beta"]
        .into_iter()
        .map(|name| ItemRecord {
            name: name.to_string(),
            description: format!("About {}", name),
            telegram_link: format!("https://t.me/{}", name),
            source_url: format!("https://www.findmini.app/{}/", name),
            category: "Games".to_string(),
            user_count: "1K".to_string(),
            language: "English".to_string(),
            useful_links: String::new(),
            images: vec![format!("=IMAGE(\"https://cdn/{}.png\"; 4; 200; 100)", name)],
        })
        .collect();
    SheetWritePlan::build(&results, 0, &ctx().sheet_title("Data"), 200, 400)
}

#[tokio::test]
async fn test_missing_token_leaves_destination_unusable() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let destination = GoogleSheetsClient::connect(&sheets_settings(&server, &[]), &ctx()).await;

    assert!(!destination.is_usable());
}

#[tokio::test]
async fn test_configured_spreadsheet_is_reused() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = sheets_settings(
        &server,
        &[
            ("sheets.access_token", "token-1"),
            ("sheets.spreadsheet_id", "existing-id"),
        ],
    );
    let destination = GoogleSheetsClient::connect(&settings, &ctx()).await;

    assert!(destination.is_usable());
    assert_eq!(destination.spreadsheet_id(), Some("existing-id"));
}

#[tokio::test]
async fn test_creates_and_shares_spreadsheet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spreadsheets"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_partial_json(json!({
            "properties": { "title": "findminiapp-20250601_083000" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "spreadsheetId": "new-id" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files/new-id/permissions"))
        .and(query_param("sendNotificationEmail", "true"))
        .and(body_partial_json(json!({
            "type": "user",
            "role": "writer",
            "emailAddress": "owner@example.com",
            "pendingOwner": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "perm-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = sheets_settings(
        &server,
        &[
            ("sheets.access_token", "token-1"),
            ("sheets.share_with", "owner@example.com"),
        ],
    );
    let destination = GoogleSheetsClient::connect(&settings, &ctx()).await;

    assert!(destination.is_usable());
    assert_eq!(destination.spreadsheet_id(), Some("new-id"));
}

#[tokio::test]
async fn test_creation_failure_leaves_destination_unusable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spreadsheets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = sheets_settings(&server, &[("sheets.access_token", "token-1")]);
    let destination = GoogleSheetsClient::connect(&settings, &ctx()).await;

    assert!(!destination.is_usable());
}

#[tokio::test]
async fn test_write_batch_formats_then_writes_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spreadsheets/sheet-123:batchUpdate"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_partial_json(json!({
            "requests": [
                { "updateSheetProperties": { "properties": { "title": "Data_20250601_083000" } } },
                { "updateSheetProperties": { "properties": { "gridProperties": { "rowCount": 3 } } } }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/spreadsheets/sheet-123/values/.*Data_20250601_083000.*A1$"))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(body_partial_json(json!({
            "values": [
                ["Name", "Description", "Telegram App Link", "FindMiniApp Link", "Category",
                 "Number Of Users", "Language", "Useful Links", "Images"],
                ["Alpha", "About Alpha", "https://t.me/Alpha", "https://www.findmini.app/Alpha/",
                 "Games", "1K", "English", "", "=IMAGE(\"https://cdn/Alpha.png\"; 4; 200; 100)"],
                ["Beta", "About Beta", "https://t.me/Beta", "https://www.findmini.app/Beta/",
                 "Games", "1K", "English", "", "=IMAGE(\"https://cdn/Beta.png\"; 4; 200; 100)"]
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updatedRows": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = sheets_settings(
        &server,
        &[
            ("sheets.access_token", "token-1"),
            ("sheets.spreadsheet_id", "sheet-123"),
        ],
    );
    let destination = GoogleSheetsClient::connect(&settings, &ctx()).await;

    destination.write_batch(&plan()).await.unwrap();
}

#[tokio::test]
async fn test_write_batch_reports_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spreadsheets/sheet-123:batchUpdate"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = sheets_settings(
        &server,
        &[
            ("sheets.access_token", "token-1"),
            ("sheets.spreadsheet_id", "sheet-123"),
        ],
    );
    let destination = GoogleSheetsClient::connect(&settings, &ctx()).await;

    let error = destination.write_batch(&plan()).await.unwrap_err();

    match error {
        DestinationError::Api { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "permission denied");
        }
        other => panic!("unexpected error: {}", other),
    }
}
