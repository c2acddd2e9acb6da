// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含与外部系统交互的技术实现：
/// - 指标（metrics）：运行统计和 Prometheus 导出
/// - 表格（sheets）：领域输出接口的 Google Sheets 实现
pub mod metrics;
pub mod sheets;
