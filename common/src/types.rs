//! 在庫表レコードの型定義
//!
//! - CellValue: ワークシートのセル値（読み込み元に依存しない表現）
//! - ItemRecord: 正規化済みの1行
//! - RecordSet: ジョブコード単位の正規化済みレコード集合

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 商品名列
pub const ITEM_NAME_COLUMN: &str = "Item Name";
/// 商品コード列
pub const ITEM_CODE_COLUMN: &str = "Item Code";
/// 部門列
pub const DEPARTMENT_COLUMN: &str = "Department";
/// 出力時に付与するジョブコード列
pub const CODE_COLUMN: &str = "Code";
/// 部門が空・0のときの既定値
pub const DEFAULT_DEPARTMENT: &str = "Other";

/// セル値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// null または空文字列
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 数値の0
    pub fn is_zero(&self) -> bool {
        matches!(self, CellValue::Number(n) if *n == 0.0)
    }

    /// 表示用の文字列に変換（整数値の浮動小数は小数点なしで出力）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 正規化済みの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// 正規化済み商品名（空にならない）
    pub item_name: String,
    /// 商品コード（サムネイルのファイル名に使用）
    pub item_code: String,
    /// 部門（空・0は "Other"）
    pub department: String,
    /// 元の列順に並んだ全セル（商品名・部門は正規化後の値）
    pub cells: Vec<CellValue>,
}

/// ジョブコード単位のレコード集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    pub code: String,
    /// 元ファイルのヘッダ（列順）
    pub columns: Vec<String>,
    /// (部門, 商品コード) 昇順
    pub records: Vec<ItemRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 出力ファイルの列（元の列 + Code）
    pub fn output_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(CODE_COLUMN))
            .collect()
    }

    /// 重複を除いた部門（出現順）
    pub fn departments(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.department.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }
}
