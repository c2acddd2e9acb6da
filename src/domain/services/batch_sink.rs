// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SheetsSettings;
use crate::domain::models::item_record::ResultSet;
use crate::domain::models::run_context::RunContext;
use crate::domain::models::sheet_plan::SheetWritePlan;
use crate::domain::repositories::sheet_destination::{DestinationError, SheetDestination};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// 批量写入错误
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to store data: {0}")]
    Destination(#[from] DestinationError),
}

/// 批量写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// 已写入的数据行数（不含表头）
    Written { rows: usize },
    /// 结果集为空，未做任何写入
    NoOp,
}

/// 批量输出器
///
/// 运行结束时把整个结果集作为一次写入交给表格目标，失败不重试
pub struct BatchSink<D: SheetDestination> {
    destination: Arc<D>,
    sheet_id: i64,
    sheet_prefix: String,
    row_height_px: u32,
    column_width_px: u32,
}

impl<D: SheetDestination> BatchSink<D> {
    pub fn new(destination: Arc<D>, settings: &SheetsSettings) -> Self {
        Self {
            destination,
            sheet_id: settings.sheet_id,
            sheet_prefix: settings.sheet_prefix.clone(),
            row_height_px: settings.row_height_px,
            column_width_px: settings.column_width_px,
        }
    }

    /// 写入结果集
    ///
    /// # 返回值
    ///
    /// * `Ok(SinkOutcome::Written)` - 写入成功
    /// * `Ok(SinkOutcome::NoOp)` - 结果集为空
    /// * `Err(SinkError)` - 表格目标返回错误
    pub async fn store(
        &self,
        ctx: &RunContext,
        results: &ResultSet,
    ) -> Result<SinkOutcome, SinkError> {
        if results.is_empty() {
            warn!("No data to upload.");
            return Ok(SinkOutcome::NoOp);
        }

        let sheet_title = ctx.sheet_title(&self.sheet_prefix);
        let plan = SheetWritePlan::build(
            results,
            self.sheet_id,
            &sheet_title,
            self.row_height_px,
            self.column_width_px,
        );

        match self.destination.write_batch(&plan).await {
            Ok(()) => {
                info!(
                    "Data successfully stored in sheet '{}' ({} rows).",
                    sheet_title,
                    plan.record_count()
                );
                Ok(SinkOutcome::Written {
                    rows: plan.record_count(),
                })
            }
            Err(e) => {
                error!("Failed to store data: {}", e);
                Err(SinkError::Destination(e))
            }
        }
    }
}
