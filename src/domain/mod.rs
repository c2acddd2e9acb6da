// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：分类、条目记录、运行上下文和写入计划
/// - 仓库接口（repositories）：结果输出的抽象接口
/// - 服务（services）：提取、分页和批量输出规则
///
/// 领域层不依赖于任何外部实现。
pub mod models;
pub mod repositories;
pub mod services;
