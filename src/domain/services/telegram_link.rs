// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::ExtractionError;
use regex::Regex;
use scraper::{Html, Selector};

const BUTTON_SELECTOR: &str = r#"button[onclick*="window.open"]"#;
const WINDOW_OPEN_PATTERN: &str = r"window\.open\('([^']+)',?\s*'[^']*'\)";

/// 取不到链接时的值
pub const UNKNOWN_LINK: &str = "Unknown";

/// Telegram 链接解析器
///
/// 从按钮的 `onclick` 属性中取出 `window.open` 的第一个参数
#[derive(Debug, Clone)]
pub struct TelegramLinkResolver {
    button: Selector,
    pattern: Regex,
}

impl TelegramLinkResolver {
    pub fn new() -> Result<Self, ExtractionError> {
        let button =
            Selector::parse(BUTTON_SELECTOR).map_err(|e| ExtractionError::InvalidSelector {
                selector: BUTTON_SELECTOR.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            button,
            pattern: Regex::new(WINDOW_OPEN_PATTERN)?,
        })
    }

    /// 在文档中查找链接
    pub fn find(&self, document: &Html) -> Option<String> {
        let onclick = document
            .select(&self.button)
            .next()
            .and_then(|button| button.value().attr("onclick"))?;
        self.from_onclick(onclick)
    }

    /// 解析 `onclick` 属性值
    pub fn from_onclick(&self, onclick: &str) -> Option<String> {
        self.pattern
            .captures(onclick.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// 解析文档，找不到时返回 "Unknown"
    pub fn resolve(&self, document: &Html) -> String {
        self.find(document)
            .unwrap_or_else(|| UNKNOWN_LINK.to_string())
    }
}
