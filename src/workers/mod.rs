// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供爬取任务的执行、有界工作池和结果收集
pub mod collector;
pub mod crawl_worker;
pub mod manager;
pub mod worker;

pub use worker::JobRunner;
