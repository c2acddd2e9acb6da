// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

/// 任务执行器trait
///
/// 工作池中的每个任务都由此执行，返回的后续任务按顺序进入队列
#[async_trait]
pub trait JobRunner: Send + Sync {
    type Job: Send + 'static;

    /// 执行一个任务
    async fn run(&self, job: Self::Job) -> Vec<Self::Job>;

    /// 获取执行器名称
    fn name(&self) -> &str;
}
