// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::PageCursor;
use crate::domain::services::crawl_service::LinkDiscoverer;
use crate::engines::downloader::FetchError;
use crate::engines::traits::FetchResponse;
use scraper::Html;
use url::Url;

/// 分页终止原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// 页面返回404，分类列表正常结束
    EndOfListing { url: Url },
    /// 非404失败（重试耗尽或被拒绝），分类被截断
    Truncated { url: Url, reason: String },
}

/// 分页的一步
#[derive(Debug, Clone)]
pub enum WalkStep {
    Continue {
        category_name: String,
        items: Vec<Url>,
        next: PageCursor,
    },
    Stop(StopReason),
}

/// 分页遍历器
///
/// 根据当前游标和抓取结果决定下一步，不做任何I/O。
/// 只有404表示列表结束，因此每个分类总会多请求一页
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    discoverer: LinkDiscoverer,
}

impl PaginationWalker {
    pub fn new(discoverer: LinkDiscoverer) -> Self {
        Self { discoverer }
    }

    pub fn advance(
        &self,
        cursor: &PageCursor,
        outcome: Result<&FetchResponse, &FetchError>,
    ) -> WalkStep {
        match outcome {
            Ok(response) => {
                let document = Html::parse_document(&response.content);
                WalkStep::Continue {
                    category_name: self.discoverer.category_heading(&document),
                    items: self.discoverer.item_links(&document, &response.url),
                    next: cursor.next(),
                }
            }
            Err(FetchError::NotFound { url }) => {
                WalkStep::Stop(StopReason::EndOfListing { url: url.clone() })
            }
            Err(e) => WalkStep::Stop(StopReason::Truncated {
                url: cursor
                    .page_url()
                    .unwrap_or_else(|_| cursor.category.url.clone()),
                reason: e.to_string(),
            }),
        }
    }
}
