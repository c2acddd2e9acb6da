// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含爬取运行的编排用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和输出接口
pub mod domain;

/// 引擎模块
///
/// HTTP抓取、节流、重试和User-Agent轮换
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如 Google Sheets 和指标导出
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 有界工作池、爬取任务执行和结果收集
pub mod workers;
