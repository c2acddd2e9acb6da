// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SheetsSettings;
use crate::domain::models::run_context::RunContext;
use crate::domain::models::sheet_plan::SheetWritePlan;
use crate::domain::repositories::sheet_destination::{DestinationError, SheetDestination};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Google Sheets 表格目标
///
/// 通过 Sheets v4 REST API 写入，必要时先创建表格并通过 Drive API 共享
pub struct GoogleSheetsClient {
    /// HTTP 客户端，构建失败时为空
    client: Option<reqwest::Client>,
    api_base_url: String,
    drive_api_base_url: String,
    access_token: Option<String>,
    /// 为空时表示目标不可用
    spreadsheet_id: Option<String>,
}

impl GoogleSheetsClient {
    /// 连接表格目标
    ///
    /// 配置了 `spreadsheet_id` 时直接使用，否则按运行时间戳创建新表格。
    /// 缺少令牌或创建失败时返回不可用的目标，错误只记录日志
    pub async fn connect(settings: &SheetsSettings, ctx: &RunContext) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to build Google API HTTP client: {}", e);
                None
            }
        };

        let mut destination = Self {
            client,
            api_base_url: settings.api_base_url.clone(),
            drive_api_base_url: settings.drive_api_base_url.clone(),
            access_token: settings.access_token.clone(),
            spreadsheet_id: None,
        };

        if destination.client.is_none() {
            return destination;
        }

        if destination.access_token.is_none() {
            error!("No Google API access token configured (sheets.access_token).");
            return destination;
        }

        if let Some(id) = &settings.spreadsheet_id {
            info!("Using configured spreadsheet {}", id);
            destination.spreadsheet_id = Some(id.clone());
            return destination;
        }

        let title = ctx.spreadsheet_title(&settings.spreadsheet_prefix);
        match destination
            .create_spreadsheet(&title, settings.share_with.as_deref())
            .await
        {
            Ok(id) => {
                info!("Created new spreadsheet: {} ({})", title, id);
                destination.spreadsheet_id = Some(id);
            }
            Err(e) => error!("Failed to create spreadsheet: {}", e),
        }

        destination
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.spreadsheet_id.as_deref()
    }

    fn http(&self) -> Result<&reqwest::Client, DestinationError> {
        self.client
            .as_ref()
            .ok_or_else(|| DestinationError::NotConfigured("no HTTP client".to_string()))
    }

    fn token(&self) -> Result<&str, DestinationError> {
        self.access_token
            .as_deref()
            .ok_or_else(|| DestinationError::NotConfigured("missing access token".to_string()))
    }

    async fn create_spreadsheet(
        &self,
        title: &str,
        share_with: Option<&str>,
    ) -> Result<String, DestinationError> {
        let url = endpoint(&self.api_base_url, &["spreadsheets"])?;
        let response = self
            .http()?
            .post(url)
            .bearer_auth(self.token()?)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await?;
        let body: Value = check_status(response).await?.json().await?;

        let id = body
            .get("spreadsheetId")
            .and_then(Value::as_str)
            .ok_or_else(|| DestinationError::InvalidResponse("missing spreadsheetId".to_string()))?
            .to_string();

        if let Some(email) = share_with {
            self.share(&id, email).await?;
            info!("Shared spreadsheet {} with {}", id, email);
        }

        Ok(id)
    }

    /// 以编辑者身份共享给指定用户，并发送带链接的通知邮件
    async fn share(&self, spreadsheet_id: &str, email: &str) -> Result<(), DestinationError> {
        let mut url = endpoint(
            &self.drive_api_base_url,
            &["files", spreadsheet_id, "permissions"],
        )?;
        let message = format!(
            "Hello,\n\nI have shared a Google Spreadsheet with you. You can access it via the link below:\n\nhttps://docs.google.com/spreadsheets/d/{}",
            spreadsheet_id
        );
        url.query_pairs_mut()
            .append_pair("sendNotificationEmail", "true")
            .append_pair("emailMessage", &message);

        let response = self
            .http()?
            .post(url)
            .bearer_auth(self.token()?)
            .json(&json!({
                "type": "user",
                "role": "writer",
                "emailAddress": email,
                "pendingOwner": true,
            }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SheetDestination for GoogleSheetsClient {
    fn is_usable(&self) -> bool {
        self.client.is_some() && self.access_token.is_some() && self.spreadsheet_id.is_some()
    }

    async fn write_batch(&self, plan: &SheetWritePlan) -> Result<(), DestinationError> {
        let spreadsheet_id = self
            .spreadsheet_id
            .as_deref()
            .ok_or_else(|| DestinationError::NotConfigured("no spreadsheet".to_string()))?;
        let token = self.token()?;

        let batch_url = endpoint(
            &self.api_base_url,
            &["spreadsheets", &format!("{}:batchUpdate", spreadsheet_id)],
        )?;
        let response = self
            .http()?
            .post(batch_url)
            .bearer_auth(token)
            .json(&batch_update_body(plan))
            .send()
            .await?;
        check_status(response).await?;

        let mut values_url = endpoint(
            &self.api_base_url,
            &["spreadsheets", spreadsheet_id, "values", &plan.value_range],
        )?;
        values_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let response = self
            .http()?
            .put(values_url)
            .bearer_auth(token)
            .json(&json!({ "values": plan.values }))
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }
}

/// 结构性修改：重命名、调整行数、列宽、行高和描述列换行
pub fn batch_update_body(plan: &SheetWritePlan) -> Value {
    let wrap_rows: Vec<Value> = plan
        .wrap_rows
        .clone()
        .map(|_| json!({ "values": [{ "userEnteredFormat": { "wrapStrategy": "WRAP" } }] }))
        .collect();

    json!({
        "requests": [
            {
                "updateSheetProperties": {
                    "properties": { "sheetId": plan.sheet_id, "title": plan.sheet_title },
                    "fields": "title"
                }
            },
            {
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": plan.sheet_id,
                        "gridProperties": { "rowCount": plan.row_count }
                    },
                    "fields": "gridProperties.rowCount"
                }
            },
            {
                "updateDimensionProperties": {
                    "range": {
                        "sheetId": plan.sheet_id,
                        "dimension": "COLUMNS",
                        "startIndex": plan.columns.range.start,
                        "endIndex": plan.columns.range.end
                    },
                    "properties": { "pixelSize": plan.columns.pixel_size },
                    "fields": "pixelSize"
                }
            },
            {
                "updateDimensionProperties": {
                    "range": {
                        "sheetId": plan.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": plan.rows.range.start,
                        "endIndex": plan.rows.range.end
                    },
                    "properties": { "pixelSize": plan.rows.pixel_size },
                    "fields": "pixelSize"
                }
            },
            {
                "updateCells": {
                    "range": {
                        "sheetId": plan.sheet_id,
                        "startColumnIndex": plan.wrap_column,
                        "endColumnIndex": plan.wrap_column + 1,
                        "startRowIndex": plan.wrap_rows.start,
                        "endRowIndex": plan.wrap_rows.end
                    },
                    "fields": "userEnteredFormat.wrapStrategy",
                    "rows": wrap_rows
                }
            }
        ]
    })
}

/// 在API基础地址后追加路径段，路径段会被转义
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, DestinationError> {
    let mut url = Url::parse(base).map_err(|e| {
        DestinationError::NotConfigured(format!("invalid API base URL {}: {}", base, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| DestinationError::NotConfigured(format!("invalid API base URL {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DestinationError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(DestinationError::Api { status, body })
}
