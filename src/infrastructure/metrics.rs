// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{counter, describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

pub const PAGES_FETCHED: &str = "findmini_pages_fetched_total";
pub const ITEMS_EXTRACTED: &str = "findmini_items_extracted_total";
pub const ITEM_FAILURES: &str = "findmini_item_failures_total";
pub const PAGINATION_STOPS: &str = "findmini_pagination_stops_total";
pub const CATEGORIES_TRUNCATED: &str = "findmini_categories_truncated_total";
pub const FETCH_RETRIES: &str = "findmini_fetch_retries_total";
pub const THROTTLE_DELAY: &str = "findmini_throttle_delay_seconds";

/// 初始化指标导出
///
/// 未配置监听地址时只注册指标描述，指标调用退化为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if let Some(listen_addr) = &settings.listen_addr {
        match listen_addr.parse::<SocketAddr>() {
            Ok(addr) => {
                // Ignore error if address is already in use (for development/testing)
                if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
                    warn!("Failed to install Prometheus recorder: {}", e);
                } else {
                    info!("Metrics exporter listening on {}", addr);
                }
            }
            Err(e) => warn!("Invalid metrics listen address {}: {}", listen_addr, e),
        }
    }

    describe_counter!(PAGES_FETCHED, "Category pages fetched successfully");
    describe_counter!(ITEMS_EXTRACTED, "Item records extracted");
    describe_counter!(ITEM_FAILURES, "Item pages dropped after fetch failure");
    describe_counter!(PAGINATION_STOPS, "Categories that ended on a 404 page");
    describe_counter!(
        CATEGORIES_TRUNCATED,
        "Categories whose pagination stopped on a non-404 failure"
    );
    describe_counter!(FETCH_RETRIES, "Fetch attempts retried after a transient failure");
    describe_gauge!(THROTTLE_DELAY, "Current adaptive delay between requests");
}

/// 单次爬取运行的统计
#[derive(Debug, Default)]
pub struct CrawlStats {
    categories: AtomicU64,
    pages_fetched: AtomicU64,
    pagination_stops: AtomicU64,
    categories_truncated: AtomicU64,
    items_extracted: AtomicU64,
    item_failures: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub categories: u64,
    pub pages_fetched: u64,
    pub pagination_stops: u64,
    pub categories_truncated: u64,
    pub items_extracted: u64,
    pub item_failures: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_categories(&self, count: usize) {
        self.categories.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        counter!(PAGES_FETCHED).increment(1);
    }

    pub fn record_pagination_stop(&self) {
        self.pagination_stops.fetch_add(1, Ordering::Relaxed);
        counter!(PAGINATION_STOPS).increment(1);
    }

    pub fn record_truncation(&self) {
        self.categories_truncated.fetch_add(1, Ordering::Relaxed);
        counter!(CATEGORIES_TRUNCATED).increment(1);
    }

    pub fn record_item(&self) {
        self.items_extracted.fetch_add(1, Ordering::Relaxed);
        counter!(ITEMS_EXTRACTED).increment(1);
    }

    pub fn record_item_failure(&self) {
        self.item_failures.fetch_add(1, Ordering::Relaxed);
        counter!(ITEM_FAILURES).increment(1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            categories: self.categories.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pagination_stops: self.pagination_stops.load(Ordering::Relaxed),
            categories_truncated: self.categories_truncated.load(Ordering::Relaxed),
            items_extracted: self.items_extracted.load(Ordering::Relaxed),
            item_failures: self.item_failures.load(Ordering::Relaxed),
        }
    }
}
