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

use crate::engines::traits::{EngineError, FetchEngine, FetchRequest, FetchResponse};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::time::Instant;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取引擎，整个运行期间共享一个连接池
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 新的引擎实例
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 抓取响应（包括非2xx状态）
    /// * `Err(EngineError)` - 传输层错误或超时
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let start = Instant::now();
        let response = self
            .client
            .get(request.url.clone())
            .header(USER_AGENT, request.user_agent.as_str())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, request))?;

        let status_code = response.status().as_u16();
        let url = response.url().clone();
        let content = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, request))?;

        Ok(FetchResponse {
            status_code,
            url,
            content,
            response_time: start.elapsed(),
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

fn map_transport_error(error: reqwest::Error, request: &FetchRequest) -> EngineError {
    if error.is_timeout() {
        EngineError::Timeout(request.timeout)
    } else {
        EngineError::RequestFailed(error)
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
