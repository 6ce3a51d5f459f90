//! ワークブック読み込み
//!
//! calamine でシートを読み込み、共通ライブラリの
//! `build_record_set` で正規化済みレコード集合に変換する。

use crate::error::{ItemThumbError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use item_thumb_common::{build_record_set, CellValue, RecordSet};
use std::path::Path;

/// 在庫表ローダー
#[derive(Debug, Clone, Default)]
pub struct RecordLoader {
    /// 読み込むシート（0始まり）
    sheet_index: usize,
}

impl RecordLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet_index: usize) -> Self {
        Self { sheet_index }
    }

    /// ワークブックを読み込み、ジョブコードを付与したレコード集合を返す
    pub fn load(&self, path: &Path, code: &str) -> Result<RecordSet> {
        let rows = read_sheet(path, self.sheet_index)?;
        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        let body: Vec<Vec<CellValue>> = rows.collect();

        let records = build_record_set(&header, &body, code)?;
        tracing::debug!(
            file = %path.display(),
            code,
            rows = body.len(),
            kept = records.len(),
            "在庫表を読み込みました"
        );
        Ok(records)
    }
}

/// シートの全行をセル値として読み込む
pub fn read_sheet(path: &Path, sheet_index: usize) -> Result<Vec<Vec<CellValue>>> {
    if !path.exists() {
        return Err(ItemThumbError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ItemThumbError::Workbook(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(sheet_index)
        .ok_or_else(|| {
            ItemThumbError::Workbook(format!("シート{}がありません: {}", sheet_index + 1, path.display()))
        })?
        .map_err(|e| ItemThumbError::Workbook(format!("{}: {}", path.display(), e)))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(to_cell_value).collect())
        .collect())
}

fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(to_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(to_cell_value(&Data::Float(0.0)), CellValue::Number(0.0));
        assert_eq!(
            to_cell_value(&Data::String("Produce".into())),
            CellValue::Text("Produce".into())
        );
    }

    #[test]
    fn test_read_sheet_missing_file() {
        let result = read_sheet(Path::new("/nonexistent/inventory-42.xlsx"), 0);
        assert!(matches!(result, Err(ItemThumbError::FileNotFound(_))));
    }
}
