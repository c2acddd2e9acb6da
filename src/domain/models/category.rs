// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::Url;

/// 分类引用
///
/// 从种子页面发现的分类链接，身份只由URL决定
#[derive(Debug, Clone)]
pub struct CategoryRef {
    /// 锚点文字，解析不到时为 "Unknown"
    pub name: String,
    /// 规范化后的分类URL
    pub url: Url,
}

impl PartialEq for CategoryRef {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for CategoryRef {}

impl Hash for CategoryRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

/// 分页游标
///
/// 每个分类一个，只会通过 `next` 生成下一页
#[derive(Debug, Clone)]
pub struct PageCursor {
    pub category: Arc<CategoryRef>,
    pub page: u32,
}

impl PageCursor {
    /// 分类的第一页
    pub fn first(category: Arc<CategoryRef>) -> Self {
        Self { category, page: 1 }
    }

    pub fn next(&self) -> Self {
        Self {
            category: Arc::clone(&self.category),
            page: self.page + 1,
        }
    }

    /// 当前页的URL：第一页为分类URL，之后在末尾追加页码
    pub fn page_url(&self) -> Result<Url, url::ParseError> {
        url_utils::page_url(&self.category.url, self.page)
    }
}
