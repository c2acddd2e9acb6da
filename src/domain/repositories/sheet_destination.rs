// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sheet_plan::SheetWritePlan;
use async_trait::async_trait;
use thiserror::Error;

/// 表格目标错误类型
#[derive(Error, Debug)]
pub enum DestinationError {
    /// 未配置访问令牌或表格
    #[error("Destination not configured: {0}")]
    NotConfigured(String),
    /// HTTP请求失败
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    /// API返回错误状态
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    /// 响应缺少必要字段
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// 表格目标特质
///
/// 结果集在运行结束时整体写入一次
#[async_trait]
pub trait SheetDestination: Send + Sync {
    /// 是否有可写入的表格
    fn is_usable(&self) -> bool;

    /// 执行一次批量写入
    async fn write_batch(&self, plan: &SheetWritePlan) -> Result<(), DestinationError>;
}
