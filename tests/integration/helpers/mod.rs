// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use findmini_crawler::application::use_cases::crawl_use_case::CrawlUseCase;
use findmini_crawler::config::settings::Settings;
use findmini_crawler::domain::models::sheet_plan::SheetWritePlan;
use findmini_crawler::domain::repositories::sheet_destination::{
    DestinationError, SheetDestination,
};
use findmini_crawler::engines::downloader::Downloader;
use findmini_crawler::engines::reqwest_engine::ReqwestEngine;
use parking_lot::Mutex;
use std::sync::Arc;

/// 记录每次写入的表格目标
pub struct RecordingDestination {
    usable: bool,
    pub writes: Mutex<Vec<SheetWritePlan>>,
}

impl RecordingDestination {
    pub fn usable() -> Arc<Self> {
        Arc::new(Self {
            usable: true,
            writes: Mutex::new(Vec::new()),
        })
    }

    pub fn unusable() -> Arc<Self> {
        Arc::new(Self {
            usable: false,
            writes: Mutex::new(Vec::new()),
        })
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }
}

#[async_trait]
impl SheetDestination for RecordingDestination {
    fn is_usable(&self) -> bool {
        self.usable
    }

    async fn write_batch(&self, plan: &SheetWritePlan) -> Result<(), DestinationError> {
        self.writes.lock().push(plan.clone());
        Ok(())
    }
}

/// 指向测试服务器、关闭节流的配置
pub fn test_settings(server_uri: &str, overrides: &[(&str, &str)]) -> Settings {
    let start_url = format!("{}/category/", server_uri);
    let mut all: Vec<(&str, &str)> = vec![
        ("crawler.start_url", start_url.as_str()),
        ("crawler.concurrent_requests", "4"),
        ("crawler.download_timeout_secs", "5"),
        ("throttle.enabled", "false"),
        ("throttle.download_delay_secs", "0"),
        ("retry.max_retries", "2"),
        ("retry.initial_backoff_ms", "1"),
        ("retry.max_backoff_ms", "5"),
    ];
    all.extend_from_slice(overrides);
    Settings::from_overrides(&all).unwrap()
}

pub fn use_case(
    settings: &Settings,
    destination: Arc<RecordingDestination>,
) -> CrawlUseCase<RecordingDestination> {
    let engine = Arc::new(ReqwestEngine::new().unwrap());
    let downloader = Arc::new(Downloader::new(engine, settings));
    CrawlUseCase::new(downloader, destination, settings).unwrap()
}

/// 种子页面，链接位于 main 的第一个 div 中
pub fn seed_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, name)| format!(r#"<a href="{}">{}</a>"#, href, name))
        .collect();
    format!(
        "<html><body><div><main><div>{}</div><div><a href=\"/category/ignored/\">x</a></div></main></div></body></html>",
        anchors
    )
}

/// 分类页面，条目链接位于 main 的第三个 div 中
pub fn category_page(heading: &str, items: &[&str]) -> String {
    let anchors: String = items
        .iter()
        .map(|href| format!(r#"<div><a href="{}">app</a></div>"#, href))
        .collect();
    format!(
        "<html><body><div><main><h1>{}</h1><div>filters</div><div>featured</div><div>{}</div></main></div></body></html>",
        heading, anchors
    )
}

/// 条目页面
pub fn item_page(name: &str) -> String {
    format!(
        r#"<html><body><div><main><div>
            <div>nav</div>
            <div><div><div>
                <div><h1>{name}</h1></div>
                <div><span>Users</span><span><span>👥 12K</span></span></div>
            </div></div></div>
            <div><div><img src="/media/{name}.png"></div></div>
            <div><div><div><span>About {name}</span></div></div></div>
            <div>
                <h3>Interface languages</h3><span>English</span>
                <h3>More links</h3><ul><li><a href="https://example.org/{name}">site</a></li></ul>
            </div>
            <button onclick="window.open('https://t.me/{name}_bot','_blank')">Open</button>
        </div></main></div></body></html>"#,
        name = name
    )
}
