// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// 应用程序配置设置
///
/// 包含爬虫、节流、重试、表格输出、日志和指标等所有配置项
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 爬虫配置
    #[validate(nested)]
    pub crawler: CrawlerSettings,
    /// 自适应节流配置
    #[validate(nested)]
    pub throttle: ThrottleSettings,
    /// 重试配置
    #[validate(nested)]
    pub retry: RetrySettings,
    /// Google Sheets 配置
    #[validate(nested)]
    pub sheets: SheetsSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CrawlerSettings {
    /// 种子页面（分类列表页）URL
    #[validate(url)]
    pub start_url: String,
    /// 分类链接必须包含的路径片段
    #[validate(length(min = 1))]
    pub category_path_marker: String,
    /// 同时进行的最大请求数
    #[validate(range(min = 1, max = 256))]
    pub concurrent_requests: usize,
    /// 单个请求的超时时间（秒）
    #[validate(range(min = 1))]
    pub download_timeout_secs: u64,
    /// 按来源URL去重条目
    pub dedupe_items_by_url: bool,
    /// 轮换使用的 User-Agent 列表，为空时使用内置列表
    #[serde(default)]
    pub user_agents: Vec<String>,
}

/// 自适应节流配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ThrottleSettings {
    /// 是否启用自适应节流
    pub enabled: bool,
    /// 初始延迟（秒）
    #[validate(range(min = 0.0))]
    pub start_delay_secs: f64,
    /// 最大延迟（秒）
    #[validate(range(min = 0.0))]
    pub max_delay_secs: f64,
    /// 目标平均并发数
    #[validate(range(exclusive_min = 0.0))]
    pub target_concurrency: f64,
    /// 基础下载延迟（秒），同时也是节流的下限
    #[validate(range(min = 0.0))]
    pub download_delay_secs: f64,
    /// 是否在 0.5x ~ 1.5x 之间随机化下载延迟
    pub randomize_delay: bool,
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RetrySettings {
    /// 最大重试次数
    #[validate(range(max = 20))]
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
}

/// Google Sheets 配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SheetsSettings {
    /// Sheets API 基础地址
    #[validate(url)]
    pub api_base_url: String,
    /// Drive API 基础地址
    #[validate(url)]
    pub drive_api_base_url: String,
    /// OAuth 访问令牌（由外部凭证流程签发）
    pub access_token: Option<String>,
    /// 复用已有表格；为空时每次运行新建表格
    pub spreadsheet_id: Option<String>,
    /// 要写入的工作表ID
    pub sheet_id: i64,
    /// 共享表格给该邮箱（可选）
    #[validate(email)]
    pub share_with: Option<String>,
    /// 新建表格标题前缀
    pub spreadsheet_prefix: String,
    /// 工作表标题前缀
    pub sheet_prefix: String,
    /// 数据行高度（像素）
    #[validate(range(min = 1))]
    pub row_height_px: u32,
    /// 数据列宽度（像素）
    #[validate(range(min = 1))]
    pub column_width_px: u32,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 输出 JSON 格式日志
    pub json: bool,
    /// 未设置 RUST_LOG 时使用的过滤器
    pub filter: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 导出地址，为空时不启动导出器
    pub listen_addr: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `FINDMINI__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FINDMINI")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("crawler.user_agents")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// 从指定配置文件加载，并叠加显式覆盖项
    pub fn from_file(path: &str, overrides: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?.add_source(File::from(Path::new(path)));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Self::finish(builder)
    }

    /// 仅使用内置默认值和显式覆盖项构建配置
    pub fn from_overrides(overrides: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Crawler
            .set_default("crawler.start_url", "https://www.findmini.app/category/")?
            .set_default("crawler.category_path_marker", "/category/")?
            .set_default("crawler.concurrent_requests", 8)?
            .set_default("crawler.download_timeout_secs", 15)?
            .set_default("crawler.dedupe_items_by_url", false)?
            // Throttle
            .set_default("throttle.enabled", true)?
            .set_default("throttle.start_delay_secs", 1.0)?
            .set_default("throttle.max_delay_secs", 10.0)?
            .set_default("throttle.target_concurrency", 2.0)?
            .set_default("throttle.download_delay_secs", 0.5)?
            .set_default("throttle.randomize_delay", true)?
            // Retry
            .set_default("retry.max_retries", 5)?
            .set_default("retry.initial_backoff_ms", 500)?
            .set_default("retry.max_backoff_ms", 10_000)?
            // Sheets
            .set_default("sheets.api_base_url", "https://sheets.googleapis.com/v4")?
            .set_default("sheets.drive_api_base_url", "https://www.googleapis.com/drive/v3")?
            .set_default("sheets.sheet_id", 0)?
            .set_default("sheets.spreadsheet_prefix", "findminiapp")?
            .set_default("sheets.sheet_prefix", "Data")?
            .set_default("sheets.row_height_px", 200)?
            .set_default("sheets.column_width_px", 400)?
            // Logging
            .set_default("logging.json", false)?
            .set_default("logging.filter", "info,findmini_crawler=debug")
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
