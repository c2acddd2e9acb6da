// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item_record::ItemRecord;
use crate::domain::services::telegram_link::TelegramLinkResolver;
use crate::utils::errors::ExtractionError;
use crate::utils::text_normalizer::TextNormalizer;
use crate::utils::url_utils;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const NAME_SELECTOR: &str = "body > div:nth-of-type(1) > main > div > div:nth-of-type(2) > div:nth-of-type(1) > div > div:nth-of-type(1) > h1";
const DESCRIPTION_SELECTOR: &str = "body > div:nth-of-type(1) > main > div > div:nth-of-type(4) > div:nth-of-type(1) > div:nth-of-type(1) > span";
const USER_COUNT_SELECTOR: &str = "body > div:nth-of-type(1) > main > div > div:nth-of-type(2) > div:nth-of-type(1) > div > div:nth-of-type(2) > span:nth-of-type(2) > span";
const IMAGE_SELECTOR: &str = "body > div:nth-of-type(1) > main > div > div:nth-of-type(3) > div img[src]";
const HEADING_SELECTOR: &str = "h3";
const LINK_SELECTOR: &str = "a[href]";

const LANGUAGES_HEADING: &str = "Interface languages";
const LINKS_HEADING: &str = "More links";

/// 条目字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    TelegramLink,
    UserCount,
    Language,
    UsefulLinks,
}

/// 字段缺失时的取值
///
/// 单值字段回退为 "Unknown"，多值字段回退为空字符串
pub const FIELD_FALLBACKS: [(Field, &str); 6] = [
    (Field::Name, "Unknown"),
    (Field::Description, ""),
    (Field::TelegramLink, "Unknown"),
    (Field::UserCount, "Unknown"),
    (Field::Language, ""),
    (Field::UsefulLinks, ""),
];

impl Field {
    pub fn fallback(self) -> &'static str {
        FIELD_FALLBACKS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, value)| *value)
            .unwrap_or_default()
    }

    fn or_fallback(self, value: Option<String>) -> String {
        value.unwrap_or_else(|| self.fallback().to_string())
    }
}

/// 编译CSS选择器，失败时返回启动错误
pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// 字段提取器
///
/// 选择器和正则在构建时编译一次。每个字段独立提取，
/// 某个字段缺失不会影响其余字段
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    name: Selector,
    description: Selector,
    user_count: Selector,
    images: Selector,
    heading: Selector,
    link: Selector,
    telegram: TelegramLinkResolver,
    normalizer: TextNormalizer,
}

impl FieldExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            name: compile_selector(NAME_SELECTOR)?,
            description: compile_selector(DESCRIPTION_SELECTOR)?,
            user_count: compile_selector(USER_COUNT_SELECTOR)?,
            images: compile_selector(IMAGE_SELECTOR)?,
            heading: compile_selector(HEADING_SELECTOR)?,
            link: compile_selector(LINK_SELECTOR)?,
            telegram: TelegramLinkResolver::new()?,
            normalizer: TextNormalizer::new()?,
        })
    }

    /// 从条目页面提取一条记录
    ///
    /// # 参数
    ///
    /// * `page_url` - 条目页面URL，同时用于解析相对图片地址
    /// * `html` - 页面内容
    /// * `category` - 所属分类名称
    pub fn extract(&self, page_url: &Url, html: &str, category: &str) -> ItemRecord {
        let document = Html::parse_document(html);

        ItemRecord {
            name: Field::Name.or_fallback(self.name(&document)),
            description: Field::Description.or_fallback(self.description(&document)),
            telegram_link: Field::TelegramLink.or_fallback(self.telegram.find(&document)),
            source_url: page_url.to_string(),
            category: category.to_string(),
            user_count: Field::UserCount.or_fallback(self.user_count(&document)),
            language: Field::Language.or_fallback(self.language(&document)),
            useful_links: Field::UsefulLinks.or_fallback(self.useful_links(&document)),
            images: self.images(&document, page_url),
        }
    }

    fn name(&self, document: &Html) -> Option<String> {
        let h1 = document.select(&self.name).next()?;
        own_text(h1).next().map(|t| t.trim().to_string())
    }

    fn description(&self, document: &Html) -> Option<String> {
        let fragments: Vec<&str> = document
            .select(&self.description)
            .flat_map(own_text)
            .collect();
        if fragments.is_empty() {
            return None;
        }
        Some(fragments.join(" ").trim().to_string())
    }

    fn user_count(&self, document: &Html) -> Option<String> {
        let span = document.select(&self.user_count).next()?;
        let text = own_text(span).next()?;
        Some(self.normalizer.remove_emojis(text).trim().to_string())
    }

    fn language(&self, document: &Html) -> Option<String> {
        let languages: Vec<&str> = self
            .siblings_after(document, LANGUAGES_HEADING, "span")
            .flat_map(own_text)
            .collect();
        if languages.is_empty() {
            return None;
        }
        let joined = languages.join(", ");
        Some(self.normalizer.remove_emojis(&joined).trim().to_string())
    }

    fn useful_links(&self, document: &Html) -> Option<String> {
        let links: Vec<&str> = self
            .siblings_after(document, LINKS_HEADING, "ul")
            .flat_map(|ul| ul.select(&self.link))
            .filter_map(|a| a.value().attr("href"))
            .collect();
        if links.is_empty() {
            return None;
        }
        Some(links.join(", "))
    }

    fn images(&self, document: &Html, page_url: &Url) -> Vec<String> {
        document
            .select(&self.images)
            .filter_map(|img| img.value().attr("src"))
            .map(|src| {
                let absolute = url_utils::resolve_url(page_url, src)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| src.to_string());
                image_formula(&absolute)
            })
            .collect()
    }

    /// 标题文字包含 `heading_text` 的 h3 之后、名为 `tag` 的兄弟元素
    fn siblings_after<'a>(
        &'a self,
        document: &'a Html,
        heading_text: &'a str,
        tag: &'a str,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        document
            .select(&self.heading)
            .filter(move |h3| own_text(*h3).any(|t| t.contains(heading_text)))
            .flat_map(|h3| h3.next_siblings().filter_map(ElementRef::wrap))
            .filter(move |sibling| sibling.value().name() == tag)
    }
}

/// 元素自身的文本节点（不含子元素）
fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
}

/// 表格中渲染图片的公式
pub fn image_formula(url: &str) -> String {
    format!("=IMAGE(\"{}\"; 4; 200; 100)", url)
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
