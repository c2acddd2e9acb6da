// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::engines::throttle::AutoThrottle;
use crate::engines::traits::{EngineError, FetchEngine, FetchRequest, FetchResponse};
use crate::engines::user_agent::UserAgentPool;
use crate::infrastructure::metrics::FETCH_RETRIES;
use crate::utils::retry_policy::{is_retryable_status, RetryPolicy};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// 分类后的抓取失败
#[derive(Error, Debug)]
pub enum FetchError {
    /// 页面不存在，分页的唯一终止信号
    #[error("{url} returned 404")]
    NotFound { url: Url },

    /// 非瞬时的HTTP错误（例如403），不重试
    #[error("{url} rejected with HTTP {status}")]
    Rejected { url: Url, status: u16 },

    /// 瞬时故障重试次数耗尽
    #[error("{url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: Url,
        attempts: u32,
        #[source]
        source: EngineError,
    },

    /// 不可重试的传输错误
    #[error("{url} failed: {source}")]
    Failed {
        url: Url,
        #[source]
        source: EngineError,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// 下载器
///
/// 在抓取引擎之上叠加节流、User-Agent轮换、超时和重试
pub struct Downloader {
    engine: Arc<dyn FetchEngine>,
    throttle: AutoThrottle,
    retry_policy: RetryPolicy,
    user_agents: UserAgentPool,
    timeout: Duration,
}

impl Downloader {
    pub fn new(engine: Arc<dyn FetchEngine>, settings: &Settings) -> Self {
        Self {
            engine,
            throttle: AutoThrottle::from_settings(&settings.throttle),
            retry_policy: RetryPolicy::from(&settings.retry),
            user_agents: UserAgentPool::new(&settings.crawler.user_agents),
            timeout: Duration::from_secs(settings.crawler.download_timeout_secs),
        }
    }

    /// 抓取页面
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 2xx响应
    /// * `Err(FetchError)` - 404、被拒绝、重试耗尽或不可重试的错误
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let mut retries = 0;
        loop {
            self.throttle.acquire().await;

            let request = FetchRequest {
                url: url.clone(),
                timeout: self.timeout,
                user_agent: self.user_agents.pick().to_string(),
            };

            let failure = match self.engine.fetch(&request).await {
                Ok(response) => {
                    self.throttle
                        .record_response(response.response_time, response.status_code);
                    if response.is_success() {
                        return Ok(response);
                    }
                    match response.status_code {
                        404 => return Err(FetchError::NotFound { url: url.clone() }),
                        status if is_retryable_status(status) => EngineError::HttpStatus(status),
                        status => {
                            return Err(FetchError::Rejected {
                                url: url.clone(),
                                status,
                            })
                        }
                    }
                }
                Err(e) if e.is_retryable() => e,
                Err(e) => {
                    return Err(FetchError::Failed {
                        url: url.clone(),
                        source: e,
                    })
                }
            };

            if !self.retry_policy.should_retry(retries) {
                return Err(FetchError::RetriesExhausted {
                    url: url.clone(),
                    attempts: retries + 1,
                    source: failure,
                });
            }

            retries += 1;
            counter!(FETCH_RETRIES).increment(1);
            debug!(
                "Retrying {} ({}/{}) after: {}",
                url, retries, self.retry_policy.max_retries, failure
            );
            tokio::time::sleep(self.retry_policy.calculate_backoff(retries)).await;
        }
    }
}
