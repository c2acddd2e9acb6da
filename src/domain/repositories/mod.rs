// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的输出接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的接口：
/// - 表格目标（sheet_destination）：接收整次运行结果的批量写入
pub mod sheet_destination;
