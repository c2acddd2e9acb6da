// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    category_page, item_page, seed_page, test_settings, use_case, RecordingDestination,
};
use findmini_crawler::application::use_cases::crawl_use_case::{CrawlError, RunOutcome};
use findmini_crawler::domain::models::run_context::RunContext;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page_path: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page_path: &str, status: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_items(server: &MockServer, names: &[&str]) {
    for name in names {
        mount_page(server, &format!("/app/{}/", name), item_page(name), 1).await;
    }
}

fn item_links(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| format!("/app/{}/", n)).collect()
}

#[tokio::test]
async fn test_two_categories_end_to_end() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/category/",
        seed_page(&[
            ("/category/games/", "Games"),
            ("/category/tools/", "Tools"),
            ("/category/games/", "Games (duplicate)"),
        ]),
        1,
    )
    .await;

    let games = ["alpha", "beta", "gamma"];
    let tools = ["delta", "epsilon", "zeta"];
    let games_links = item_links(&games);
    let tools_links = item_links(&tools);
    let games_refs: Vec<&str> = games_links.iter().map(String::as_str).collect();
    let tools_refs: Vec<&str> = tools_links.iter().map(String::as_str).collect();

    mount_page(&server, "/category/games/", category_page("Games", &games_refs), 1).await;
    mount_page(&server, "/category/tools/", category_page("Tools", &tools_refs), 1).await;
    // Pagination always overshoots by exactly one request per category
    mount_status(&server, "/category/games/2", 404, 1).await;
    mount_status(&server, "/category/tools/2", 404, 1).await;
    mount_items(&server, &games).await;
    mount_items(&server, &tools).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Stored {
            records: 6,
            truncated_categories: 0
        }
    );
    assert_eq!(destination.write_count(), 1);

    let writes = destination.writes.lock();
    let plan = &writes[0];
    assert_eq!(plan.values.len(), 7);
    assert_eq!(plan.values[0][0], "Name");
    assert_eq!(plan.row_count, 7);

    let mut names: Vec<&str> = plan.values[1..].iter().map(|row| row[0].as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "beta", "delta", "epsilon", "gamma", "zeta"]);

    let alpha = plan.values[1..]
        .iter()
        .find(|row| row[0] == "alpha")
        .unwrap();
    assert_eq!(alpha[1], "About alpha");
    assert_eq!(alpha[2], "https://t.me/alpha_bot");
    assert_eq!(alpha[3], format!("{}/app/alpha/", server.uri()));
    assert_eq!(alpha[4], "Games");
    assert_eq!(alpha[5], "12K");
    assert_eq!(alpha[6], "English");
    assert_eq!(alpha[7], "https://example.org/alpha");
    assert_eq!(
        alpha[8],
        format!("=IMAGE(\"{}/media/alpha.png\"; 4; 200; 100)", server.uri())
    );

    let stats = use_case.stats();
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.pagination_stops, 2);
    assert_eq!(stats.items_extracted, 6);
}

#[tokio::test]
async fn test_not_found_stops_only_its_own_category() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/category/",
        seed_page(&[("/category/games/", "Games"), ("/category/tools/", "Tools")]),
        1,
    )
    .await;

    // Games has two pages, tools is empty from the start
    mount_page(&server, "/category/games/", category_page("Games", &["/app/one/"]), 1).await;
    mount_page(&server, "/category/games/2", category_page("Games", &["/app/two/"]), 1).await;
    mount_status(&server, "/category/games/3", 404, 1).await;
    mount_status(&server, "/category/tools/", 404, 1).await;
    mount_status(&server, "/category/tools/2", 404, 0).await;
    mount_items(&server, &["one", "two"]).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Stored {
            records: 2,
            truncated_categories: 0
        }
    );
    assert_eq!(use_case.stats().pagination_stops, 2);
}

#[tokio::test]
async fn test_unusable_destination_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::unusable();
    let use_case = use_case(&settings, destination.clone());

    let result = use_case.execute(&RunContext::new()).await;

    assert!(matches!(result, Err(CrawlError::DestinationUnavailable)));
    assert_eq!(destination.write_count(), 0);
}

#[tokio::test]
async fn test_transient_item_failure_is_retried() {
    let server = MockServer::start().await;

    mount_page(&server, "/category/", seed_page(&[("/category/games/", "Games")]), 1).await;
    mount_page(&server, "/category/games/", category_page("Games", &["/app/flaky/"]), 1).await;
    mount_status(&server, "/category/games/2", 404, 1).await;

    Mock::given(method("GET"))
        .and(path("/app/flaky/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/app/flaky/", item_page("flaky"), 1).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Stored { records: 1, .. }));
    assert_eq!(destination.writes.lock()[0].values[1][0], "flaky");
}

#[tokio::test]
async fn test_rejected_category_page_is_reported_as_truncation() {
    let server = MockServer::start().await;

    mount_page(&server, "/category/", seed_page(&[("/category/games/", "Games")]), 1).await;
    mount_page(&server, "/category/games/", category_page("Games", &["/app/one/"]), 1).await;
    mount_status(&server, "/category/games/2", 403, 1).await;
    mount_status(&server, "/category/games/3", 404, 0).await;
    mount_items(&server, &["one"]).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Stored {
            records: 1,
            truncated_categories: 1
        }
    );
    assert_eq!(use_case.stats().pagination_stops, 0);
}

#[tokio::test]
async fn test_failed_item_page_is_dropped() {
    let server = MockServer::start().await;

    mount_page(&server, "/category/", seed_page(&[("/category/games/", "Games")]), 1).await;
    mount_page(
        &server,
        "/category/games/",
        category_page("Games", &["/app/one/", "/app/gone/"]),
        1,
    )
    .await;
    mount_status(&server, "/category/games/2", 404, 1).await;
    mount_items(&server, &["one"]).await;
    mount_status(&server, "/app/gone/", 410, 1).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Stored { records: 1, .. }));
    assert_eq!(use_case.stats().item_failures, 1);
}

#[tokio::test]
async fn test_no_items_is_a_no_op() {
    let server = MockServer::start().await;

    mount_page(&server, "/category/", seed_page(&[("/category/games/", "Games")]), 1).await;
    mount_status(&server, "/category/games/", 404, 1).await;

    let settings = test_settings(&server.uri(), &[]);
    let destination = RecordingDestination::usable();
    let use_case = use_case(&settings, destination.clone());

    let outcome = use_case.execute(&RunContext::new()).await.unwrap();

    assert_eq!(outcome, RunOutcome::NoOp);
    assert_eq!(destination.write_count(), 0);
}

#[tokio::test]
async fn test_duplicate_items_are_kept_unless_deduplicated() {
    for (dedupe, expected) in [("false", 2usize), ("true", 1usize)] {
        let server = MockServer::start().await;

        mount_page(
            &server,
            "/category/",
            seed_page(&[("/category/games/", "Games"), ("/category/top/", "Top")]),
            1,
        )
        .await;
        mount_page(&server, "/category/games/", category_page("Games", &["/app/same/"]), 1).await;
        mount_page(&server, "/category/top/", category_page("Top", &["/app/same/"]), 1).await;
        mount_status(&server, "/category/games/2", 404, 1).await;
        mount_status(&server, "/category/top/2", 404, 1).await;
        mount_page(&server, "/app/same/", item_page("same"), 2).await;

        let settings = test_settings(&server.uri(), &[("crawler.dedupe_items_by_url", dedupe)]);
        let destination = RecordingDestination::usable();
        let use_case = use_case(&settings, destination.clone());

        let outcome = use_case.execute(&RunContext::new()).await.unwrap();

        assert!(
            matches!(outcome, RunOutcome::Stored { records, .. } if records == expected),
            "dedupe={} gave {:?}",
            dedupe,
            outcome
        );
    }
}
