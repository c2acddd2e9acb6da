// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::worker::JobRunner;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, Instrument};

/// 有界工作池
///
/// 先进先出的任务队列，同时运行的任务数不超过 `concurrency`。
/// 队列为空且没有在途任务时结束
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 执行所有任务直到队列耗尽
    ///
    /// # 参数
    ///
    /// * `runner` - 任务执行器
    /// * `seeds` - 初始任务
    ///
    /// # 返回值
    ///
    /// 完成的任务数量
    pub async fn drain<W>(&self, runner: Arc<W>, seeds: impl IntoIterator<Item = W::Job>) -> usize
    where
        W: JobRunner + 'static,
    {
        let mut queue: VecDeque<W::Job> = seeds.into_iter().collect();
        let mut in_flight = JoinSet::new();
        let mut completed = 0;

        debug!(
            "{} pool starting with {} jobs, concurrency {}",
            runner.name(),
            queue.len(),
            self.concurrency
        );

        loop {
            while in_flight.len() < self.concurrency {
                let Some(job) = queue.pop_front() else {
                    break;
                };
                let runner = Arc::clone(&runner);
                in_flight.spawn(async move { runner.run(job).await }.in_current_span());
            }

            match in_flight.join_next().await {
                Some(Ok(follow_ups)) => {
                    completed += 1;
                    queue.extend(follow_ups);
                }
                Some(Err(e)) => {
                    completed += 1;
                    error!("{} job failed to complete: {}", runner.name(), e);
                }
                None => break,
            }
        }

        debug!("{} pool drained after {} jobs", runner.name(), completed);
        completed
    }
}
