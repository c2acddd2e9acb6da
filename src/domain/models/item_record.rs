// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 表头，顺序与 [`ItemRecord::to_row`] 一致
pub const HEADER: [&str; 9] = [
    "Name",
    "Description",
    "Telegram App Link",
    "FindMiniApp Link",
    "Category",
    "Number Of Users",
    "Language",
    "Useful Links",
    "Images",
];

/// 固定列数（图片列之前）
pub const FIXED_COLUMNS: usize = 8;

/// 单个条目的提取结果
///
/// 创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub name: String,
    pub description: String,
    pub telegram_link: String,
    pub source_url: String,
    pub category: String,
    pub user_count: String,
    /// 逗号连接的语言列表
    pub language: String,
    /// 逗号连接的外部链接
    pub useful_links: String,
    /// `=IMAGE(...)` 公式，按页面顺序
    pub images: Vec<String>,
}

impl ItemRecord {
    /// 转换为表格行：固定列之后追加所有图片列
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(FIXED_COLUMNS + self.images.len());
        row.push(self.name.clone());
        row.push(self.description.clone());
        row.push(self.telegram_link.clone());
        row.push(self.source_url.clone());
        row.push(self.category.clone());
        row.push(self.user_count.clone());
        row.push(self.language.clone());
        row.push(self.useful_links.clone());
        row.extend(self.images.iter().cloned());
        row
    }
}

/// 一次运行的全部结果，只追加
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ItemRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ItemRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }
}

impl FromIterator<ItemRecord> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ItemRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
