// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item_record::{ItemRecord, ResultSet};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// 结果收集器
///
/// 结果集只由收集任务持有。所有发送端被丢弃后任务结束并返回完整结果集
pub struct ResultCollector;

impl ResultCollector {
    /// 启动收集任务
    ///
    /// # 参数
    ///
    /// * `dedupe_by_url` - 是否丢弃来源URL重复的记录
    pub fn spawn(dedupe_by_url: bool) -> (mpsc::UnboundedSender<ItemRecord>, JoinHandle<ResultSet>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<ItemRecord>();

        let handle = tokio::spawn(async move {
            let mut results = ResultSet::new();
            let mut seen = HashSet::new();

            while let Some(record) = rx.recv().await {
                if dedupe_by_url && !seen.insert(record.source_url.clone()) {
                    debug!("Skipping duplicate item {}", record.source_url);
                    continue;
                }
                results.push(record);
            }

            results
        });

        (tx, handle)
    }
}
