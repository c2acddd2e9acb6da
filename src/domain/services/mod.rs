// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含爬取流程中不涉及I/O的业务逻辑：
/// - 批量输出（batch_sink）：运行结束时把结果集一次写入表格
/// - 链接发现（crawl_service）：分类链接、条目链接和分类名称
/// - 字段提取（extraction_service）：从条目页面生成记录
/// - 分页（pagination）：根据抓取结果决定继续还是停止
/// - Telegram链接（telegram_link）：解析按钮中的 `window.open` 调用
pub mod batch_sink;
pub mod crawl_service;
pub mod extraction_service;
pub mod pagination;
pub mod telegram_link;
