// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::item_record::{ResultSet, FIXED_COLUMNS, HEADER};
use serde::Serialize;
use std::ops::Range;

/// 描述列（B列）的索引
pub const DESCRIPTION_COLUMN: u32 = 1;

/// 一段行或列的尺寸设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionRange {
    pub range: Range<u32>,
    pub pixel_size: u32,
}

/// 一次批量写入的完整描述
///
/// 由批量输出器根据结果集计算，目标表格只负责执行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetWritePlan {
    pub sheet_id: i64,
    pub sheet_title: String,
    /// 数据行数 + 表头
    pub row_count: u32,
    pub columns: DimensionRange,
    pub rows: DimensionRange,
    /// 自动换行的列
    pub wrap_column: u32,
    /// 自动换行的行范围
    pub wrap_rows: Range<u32>,
    /// A1 表示法的写入起点
    pub value_range: String,
    /// 表头 + 每条记录一行
    pub values: Vec<Vec<String>>,
}

impl SheetWritePlan {
    pub fn build(
        results: &ResultSet,
        sheet_id: i64,
        sheet_title: &str,
        row_height_px: u32,
        column_width_px: u32,
    ) -> Self {
        let data_rows = results.len() as u32;
        let row_count = data_rows + 1;

        let mut values = Vec::with_capacity(results.len() + 1);
        values.push(HEADER.iter().map(|h| h.to_string()).collect());
        values.extend(results.records().iter().map(|r| r.to_row()));

        Self {
            sheet_id,
            sheet_title: sheet_title.to_string(),
            row_count,
            columns: DimensionRange {
                range: 0..FIXED_COLUMNS as u32,
                pixel_size: column_width_px,
            },
            rows: DimensionRange {
                range: 1..row_count,
                pixel_size: row_height_px,
            },
            wrap_column: DESCRIPTION_COLUMN,
            wrap_rows: 1..row_count,
            value_range: format!("'{}'!A1", sheet_title),
            values,
        }
    }

    /// 数据行数（不含表头）
    pub fn record_count(&self) -> usize {
        self.values.len().saturating_sub(1)
    }
}
