// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 提取器构建错误类型
///
/// 选择器和正则在启动时编译一次，逐页提取本身不会失败
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("无效选择器 `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("无效正则表达式: {0}")]
    InvalidPattern(#[from] regex::Error),
}
