// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::ExtractionError;
use regex::Regex;

// A pictograph (or flag half / skin tone) followed by whatever glues an emoji
// sequence together. Keycaps go with their base character, lone selectors
// and keycap marks are dropped as well.
const EMOJI_PATTERN: &str = r"[0-9#*]\x{FE0F}?\x{20E3}|(?:[\p{Extended_Pictographic}\p{Regional_Indicator}\p{Emoji_Modifier}](?:[\x{FE0E}\x{FE0F}\x{20E3}\p{Emoji_Modifier}\x{E0020}-\x{E007F}]|\x{200D}[\p{Extended_Pictographic}\p{Regional_Indicator}])*)|[\x{FE0F}\x{20E3}]";

/// 文本规范化器
///
/// 移除文本中的表情符号，其余字符（包括首尾空白）原样保留
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    pattern: Regex,
}

impl TextNormalizer {
    /// 编译表情符号匹配规则
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            pattern: Regex::new(EMOJI_PATTERN)?,
        })
    }

    /// 移除所有表情符号
    pub fn remove_emojis(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }
}
