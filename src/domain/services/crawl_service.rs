// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::category::CategoryRef;
use crate::domain::services::extraction_service::compile_selector;
use crate::utils::errors::ExtractionError;
use crate::utils::url_utils;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

const SEED_LINK_SELECTOR: &str = "body > div:nth-of-type(1) > main > div:nth-of-type(1) > a[href]";
const CATEGORY_HEADING_SELECTOR: &str = "body > div:nth-of-type(1) > main > h1";
const ITEM_LINK_SELECTOR: &str = "body > div:nth-of-type(1) > main > div:nth-of-type(3) a[href]";

const UNKNOWN: &str = "Unknown";

/// 链接发现器
///
/// 负责从种子页面提取分类链接，从分类页面提取条目链接和分类名称
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    seed_links: Selector,
    heading: Selector,
    item_links: Selector,
}

impl LinkDiscoverer {
    /// 创建链接发现器，选择器在此编译
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            seed_links: compile_selector(SEED_LINK_SELECTOR)?,
            heading: compile_selector(CATEGORY_HEADING_SELECTOR)?,
            item_links: compile_selector(ITEM_LINK_SELECTOR)?,
        })
    }

    /// 从种子页面提取分类
    ///
    /// 只保留 href 包含 `marker` 的链接，按解析后的URL去重，
    /// 保持首次出现的顺序
    ///
    /// # 参数
    ///
    /// * `html_content` - 种子页面内容
    /// * `base_url` - 种子页面URL
    /// * `marker` - 分类链接必须包含的路径片段
    pub fn discover_categories(
        &self,
        html_content: &str,
        base_url: &Url,
        marker: &str,
    ) -> Vec<CategoryRef> {
        let document = Html::parse_document(html_content);
        let mut seen = HashSet::new();
        let mut categories = Vec::new();

        for anchor in document.select(&self.seed_links) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains(marker) {
                continue;
            }
            let Some(url) = url_utils::canonicalize(base_url, href) else {
                continue;
            };
            if !seen.insert(url.clone()) {
                continue;
            }

            let text = anchor.text().collect::<String>();
            let name = match text.trim() {
                "" => UNKNOWN.to_string(),
                trimmed => trimmed.to_string(),
            };
            categories.push(CategoryRef { name, url });
        }

        categories
    }

    /// 分类页面的标题，缺失时为 "Unknown"
    pub fn category_heading(&self, document: &Html) -> String {
        document
            .select(&self.heading)
            .next()
            .and_then(|h1| {
                h1.children()
                    .filter_map(|child| child.value().as_text())
                    .next()
                    .map(|text| text.trim().to_string())
            })
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// 分类页面上的条目链接，保持页面顺序，不去重
    pub fn item_links(&self, document: &Html, page_url: &Url) -> Vec<Url> {
        document
            .select(&self.item_links)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| url_utils::canonicalize(page_url, href))
            .collect()
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
