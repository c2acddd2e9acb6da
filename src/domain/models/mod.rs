// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了爬取运行中流转的核心数据结构：
/// - 分类（category）：分类引用和分页游标
/// - 条目记录（item_record）：单个条目的提取结果和整次运行的结果集
/// - 运行上下文（run_context）：运行ID、时间戳和日志 span
/// - 写入计划（sheet_plan）：一次批量写入表格的完整描述
pub mod category;
pub mod item_record;
pub mod run_context;
pub mod sheet_plan;
