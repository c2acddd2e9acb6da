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

use findmini_crawler::application::use_cases::crawl_use_case::{CrawlUseCase, RunOutcome};
use findmini_crawler::config::settings::Settings;
use findmini_crawler::domain::models::run_context::RunContext;
use findmini_crawler::engines::downloader::Downloader;
use findmini_crawler::engines::reqwest_engine::ReqwestEngine;
use findmini_crawler::infrastructure::metrics::init_metrics;
use findmini_crawler::infrastructure::sheets::google_sheets::GoogleSheetsClient;
use findmini_crawler::utils::telemetry;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Instrument};

/// 主函数
///
/// 加载配置、初始化日志和指标，执行一次完整的爬取
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(&settings.logging);
    init_metrics(&settings.metrics);

    let ctx = RunContext::new();
    let span = ctx.span().clone();
    run(&settings, &ctx).instrument(span).await
}

async fn run(settings: &Settings, ctx: &RunContext) -> anyhow::Result<ExitCode> {
    info!("Starting findmini-crawler run {}", ctx.run_id);

    // 3. Initialize engine and destination
    let engine = Arc::new(ReqwestEngine::new()?);
    let downloader = Arc::new(Downloader::new(engine, settings));
    let destination = Arc::new(GoogleSheetsClient::connect(&settings.sheets, ctx).await);

    // 4. Run the crawl
    let use_case = CrawlUseCase::new(downloader, destination, settings)?;
    match use_case.execute(ctx).await {
        Ok(RunOutcome::Stored {
            records,
            truncated_categories,
        }) => {
            info!(
                "Run finished: {} records stored, {} categories truncated",
                records, truncated_categories
            );
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::NoOp) => {
            info!("Run finished without data");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
