//! 商品名の正規化
//!
//! 在庫表の "Item Name" セルを表示用の正規形に変換する。
//!
//! ## 処理順
//! 1. 先頭の数量トークン（`12`, `12*`）を末尾の括弧へ移動
//! 2. ハイフンを全て除去
//! 3. 先頭の `.` を1つ除去
//! 4. `<数字>*<数字>`（入数表記）を `<数字><数字> (*)` に書き換え
//! 5. 前後の空白を除去

use crate::types::CellValue;
use regex::Regex;

/// 商品名を正規化する
pub fn normalize_item_name(raw: &str) -> String {
    lazy_static::lazy_static! {
        // 先頭の数量トークンと区切り（-・空白）
        static ref LEADING_NUMBER_RE: Regex = Regex::new(r"(?s)^(\d+\*?)[-\s]*(.*)").unwrap();
        // 先頭が入数表記の場合は数量として扱わない
        static ref MULTI_PACK_PREFIX_RE: Regex = Regex::new(r"^\d+\*\d").unwrap();
        static ref MULTI_PACK_RE: Regex = Regex::new(r"(\d+)\*(\d+)").unwrap();
    }

    let mut name = raw.to_string();

    if !MULTI_PACK_PREFIX_RE.is_match(&name) {
        if let Some(caps) = LEADING_NUMBER_RE.captures(&name) {
            name = format!("{} ({})", &caps[2], &caps[1]);
        }
    }

    let name = name.replace('-', "");
    let name = name.strip_prefix('.').unwrap_or(&name);
    let name = MULTI_PACK_RE.replace_all(name, "${1}${2} (*)");

    name.trim().to_string()
}

/// セル値を正規化する（空セルは空文字列）
pub fn normalize_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        other => normalize_item_name(&other.to_text()),
    }
}
