// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 解析链接并去掉片段标识，便于按URL去重
pub fn canonicalize(base_url: &Url, href: &str) -> Option<Url> {
    let mut url = resolve_url(base_url, href.trim()).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// 在分类URL后追加页码，第一页就是分类URL本身
pub fn page_url(category_url: &Url, page: u32) -> Result<Url, ParseError> {
    if page <= 1 {
        return Ok(category_url.clone());
    }
    Url::parse(&format!("{}{}", category_url, page))
}
