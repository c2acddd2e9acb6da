// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use tracing::Span;
use uuid::Uuid;

/// 运行上下文
///
/// 每次运行构建一次，提供时间戳和运行级别的日志 span
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Local>,
    /// `%Y%m%d_%H%M%S` 格式的启动时间
    pub timestamp: String,
    span: Span,
}

impl RunContext {
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    pub fn at(started_at: DateTime<Local>) -> Self {
        let run_id = Uuid::new_v4();
        let timestamp = started_at.format("%Y%m%d_%H%M%S").to_string();
        let span = tracing::info_span!("crawl_run", run_id = %run_id, timestamp = %timestamp);
        Self {
            run_id,
            started_at,
            timestamp,
            span,
        }
    }

    /// 新建表格的标题
    pub fn spreadsheet_title(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.timestamp)
    }

    /// 工作表标题
    pub fn sheet_title(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.timestamp)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
