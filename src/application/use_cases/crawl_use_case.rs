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

use crate::{
    config::settings::{CrawlerSettings, Settings},
    domain::{
        models::{category::PageCursor, run_context::RunContext},
        repositories::sheet_destination::SheetDestination,
        services::{
            batch_sink::{BatchSink, SinkError, SinkOutcome},
            crawl_service::LinkDiscoverer,
            extraction_service::FieldExtractor,
            pagination::PaginationWalker,
        },
    },
    engines::downloader::{Downloader, FetchError},
    infrastructure::metrics::{CrawlStats, StatsSnapshot},
    utils::errors::ExtractionError,
    workers::{
        collector::ResultCollector,
        crawl_worker::{CrawlJob, CrawlWorker},
        manager::WorkerPool,
    },
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, info};
use url::Url;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("No valid spreadsheet ID")]
    DestinationUnavailable,
    #[error("Invalid start URL {url}: {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Seed page failed: {0}")]
    Seed(#[source] FetchError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("Extractor setup failed: {0}")]
    Setup(#[from] ExtractionError),
    #[error("Result collector failed: {0}")]
    Collector(#[from] JoinError),
}

/// 一次运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 结果已写入表格
    Stored {
        records: usize,
        /// 因非404失败而提前结束的分类数量
        truncated_categories: u64,
    },
    /// 没有任何记录，未写入
    NoOp,
}

/// 爬取用例
///
/// 检查输出目标 → 抓取种子页 → 发现分类 → 工作池遍历所有分类和条目 →
/// 收集结果 → 一次性写入
pub struct CrawlUseCase<D: SheetDestination> {
    downloader: Arc<Downloader>,
    destination: Arc<D>,
    sink: BatchSink<D>,
    discoverer: LinkDiscoverer,
    extractor: FieldExtractor,
    crawler: CrawlerSettings,
    stats: Arc<CrawlStats>,
}

impl<D> CrawlUseCase<D>
where
    D: SheetDestination + 'static,
{
    /// 创建用例，选择器和正则在此编译
    pub fn new(
        downloader: Arc<Downloader>,
        destination: Arc<D>,
        settings: &Settings,
    ) -> Result<Self, CrawlError> {
        Ok(Self {
            sink: BatchSink::new(Arc::clone(&destination), &settings.sheets),
            downloader,
            destination,
            discoverer: LinkDiscoverer::new()?,
            extractor: FieldExtractor::new()?,
            crawler: settings.crawler.clone(),
            stats: Arc::new(CrawlStats::new()),
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// 执行一次完整的爬取
    ///
    /// # 返回值
    ///
    /// * `Ok(RunOutcome::Stored)` - 结果已写入
    /// * `Ok(RunOutcome::NoOp)` - 没有任何记录
    /// * `Err(CrawlError)` - 输出目标不可用、种子页失败或写入失败
    pub async fn execute(&self, ctx: &RunContext) -> Result<RunOutcome, CrawlError> {
        if !self.destination.is_usable() {
            error!("No valid spreadsheet ID. Stopping the scraping process.");
            return Err(CrawlError::DestinationUnavailable);
        }

        let start_url =
            Url::parse(&self.crawler.start_url).map_err(|source| CrawlError::InvalidStartUrl {
                url: self.crawler.start_url.clone(),
                source,
            })?;

        info!("Fetching seed page {}", start_url);
        let seed = self
            .downloader
            .fetch(&start_url)
            .await
            .map_err(CrawlError::Seed)?;

        let categories = self.discoverer.discover_categories(
            &seed.content,
            &seed.url,
            &self.crawler.category_path_marker,
        );
        self.stats.record_categories(categories.len());
        info!("Discovered {} categories", categories.len());

        let (records, collector) = ResultCollector::spawn(self.crawler.dedupe_items_by_url);
        let worker = Arc::new(CrawlWorker::new(
            Arc::clone(&self.downloader),
            PaginationWalker::new(self.discoverer.clone()),
            self.extractor.clone(),
            records,
            Arc::clone(&self.stats),
        ));
        let seeds = categories
            .into_iter()
            .map(|category| CrawlJob::CategoryPage(PageCursor::first(Arc::new(category))));

        WorkerPool::new(self.crawler.concurrent_requests)
            .drain(Arc::clone(&worker), seeds)
            .await;
        // The collector finishes once the last sender is gone
        drop(worker);

        let results = collector.await?;
        let stats = self.stats.snapshot();
        info!(
            categories = stats.categories,
            pages_fetched = stats.pages_fetched,
            pagination_stops = stats.pagination_stops,
            categories_truncated = stats.categories_truncated,
            items_extracted = stats.items_extracted,
            item_failures = stats.item_failures,
            "Crawl finished with {} records",
            results.len()
        );

        match self.sink.store(ctx, &results).await? {
            SinkOutcome::Written { rows } => Ok(RunOutcome::Stored {
                records: rows,
                truncated_categories: stats.categories_truncated,
            }),
            SinkOutcome::NoOp => Ok(RunOutcome::NoOp),
        }
    }
}
