// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::category::PageCursor;
use crate::domain::models::item_record::ItemRecord;
use crate::domain::services::extraction_service::FieldExtractor;
use crate::domain::services::pagination::{PaginationWalker, StopReason, WalkStep};
use crate::engines::downloader::Downloader;
use crate::infrastructure::metrics::CrawlStats;
use crate::workers::worker::JobRunner;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

/// 爬取任务
#[derive(Debug, Clone)]
pub enum CrawlJob {
    /// 分类列表的某一页
    CategoryPage(PageCursor),
    /// 条目详情页，附带所属分类名称
    ItemPage { url: Url, category: Arc<str> },
}

/// 爬取执行器
///
/// 分类页派生条目任务和下一页任务，条目页生成记录并发送给结果收集器
pub struct CrawlWorker {
    downloader: Arc<Downloader>,
    walker: PaginationWalker,
    extractor: FieldExtractor,
    records: mpsc::UnboundedSender<ItemRecord>,
    stats: Arc<CrawlStats>,
}

impl CrawlWorker {
    pub fn new(
        downloader: Arc<Downloader>,
        walker: PaginationWalker,
        extractor: FieldExtractor,
        records: mpsc::UnboundedSender<ItemRecord>,
        stats: Arc<CrawlStats>,
    ) -> Self {
        Self {
            downloader,
            walker,
            extractor,
            records,
            stats,
        }
    }

    async fn category_page(&self, cursor: PageCursor) -> Vec<CrawlJob> {
        let url = match cursor.page_url() {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build page {} of {}: {}", cursor.page, cursor.category.url, e);
                self.stats.record_truncation();
                return vec![];
            }
        };

        let outcome = self.downloader.fetch(&url).await;
        if outcome.is_ok() {
            self.stats.record_page_fetched();
        }

        match self.walker.advance(&cursor, outcome.as_ref()) {
            WalkStep::Continue {
                category_name,
                items,
                next,
            } => {
                debug!("{} yielded {} items", url, items.len());
                let category: Arc<str> = category_name.into();
                let mut jobs: Vec<CrawlJob> = items
                    .into_iter()
                    .map(|url| CrawlJob::ItemPage {
                        url,
                        category: Arc::clone(&category),
                    })
                    .collect();
                jobs.push(CrawlJob::CategoryPage(next));
                jobs
            }
            WalkStep::Stop(StopReason::EndOfListing { url }) => {
                info!("Stopping pagination: {} returned 404.", url);
                self.stats.record_pagination_stop();
                vec![]
            }
            WalkStep::Stop(StopReason::Truncated { url, reason }) => {
                warn!(
                    "Category '{}' truncated at {}: {}",
                    cursor.category.name, url, reason
                );
                self.stats.record_truncation();
                vec![]
            }
        }
    }

    async fn item_page(&self, url: Url, category: Arc<str>) {
        match self.downloader.fetch(&url).await {
            Ok(response) => {
                let record = self
                    .extractor
                    .extract(&response.url, &response.content, &category);
                self.stats.record_item();
                if self.records.send(record).is_err() {
                    warn!("Result collector closed, dropping record from {}", url);
                }
            }
            Err(e) => {
                warn!("Dropping item {}: {}", url, e);
                self.stats.record_item_failure();
            }
        }
    }
}

#[async_trait]
impl JobRunner for CrawlWorker {
    type Job = CrawlJob;

    async fn run(&self, job: CrawlJob) -> Vec<CrawlJob> {
        match job {
            CrawlJob::CategoryPage(cursor) => self.category_page(cursor).await,
            CrawlJob::ItemPage { url, category } => {
                self.item_page(url, category).await;
                vec![]
            }
        }
    }

    fn name(&self) -> &str {
        "crawl"
    }
}
