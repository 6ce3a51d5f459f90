//! ワークシートの行からレコード集合を組み立てる
//!
//! 読み込み方法（xlsx/ods等）には依存しない純粋な変換。
//! 空の商品名を除外し、商品名を正規化し、部門を補完し、
//! (部門, 商品コード) で安定ソートしてジョブコードを付与する。

use crate::error::{Error, Result};
use crate::normalizer::normalize_cell;
use crate::types::{
    CellValue, ItemRecord, RecordSet, DEFAULT_DEPARTMENT, DEPARTMENT_COLUMN, ITEM_CODE_COLUMN,
    ITEM_NAME_COLUMN,
};
use std::cmp::Ordering;

/// 必須列の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    item_name: usize,
    item_code: usize,
    department: usize,
}

/// ヘッダ行とデータ行からレコード集合を作る
///
/// # Arguments
/// * `header` - 1行目のセル
/// * `rows` - 2行目以降のセル
/// * `code` - ジョブコード
///
/// # Errors
/// 必須列（Item Name / Item Code / Department）が欠けている場合 `Error::Schema`
pub fn build_record_set(header: &[CellValue], rows: &[Vec<CellValue>], code: &str) -> Result<RecordSet> {
    let columns = column_names(header);
    let layout = locate_columns(&columns)?;

    let mut records: Vec<ItemRecord> = rows
        .iter()
        .filter_map(|row| build_record(row, columns.len(), layout))
        .collect();

    // sort_by は安定ソート
    records.sort_by(|a, b| {
        a.department
            .cmp(&b.department)
            .then_with(|| compare_item_codes(&a.item_code, &b.item_code))
    });

    Ok(RecordSet {
        code: code.to_string(),
        columns,
        records,
    })
}

fn column_names(header: &[CellValue]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_text().trim().to_string();
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect()
}

fn locate_columns(columns: &[String]) -> Result<ColumnLayout> {
    let find = |name: &str| columns.iter().position(|c| c == name);

    match (
        find(ITEM_NAME_COLUMN),
        find(ITEM_CODE_COLUMN),
        find(DEPARTMENT_COLUMN),
    ) {
        (Some(item_name), Some(item_code), Some(department)) => Ok(ColumnLayout {
            item_name,
            item_code,
            department,
        }),
        (name, code, department) => {
            let missing = [
                (name, ITEM_NAME_COLUMN),
                (code, ITEM_CODE_COLUMN),
                (department, DEPARTMENT_COLUMN),
            ]
            .iter()
            .filter(|(idx, _)| idx.is_none())
            .map(|(_, column)| column.to_string())
            .collect();
            Err(Error::Schema { missing })
        }
    }
}

fn build_record(row: &[CellValue], width: usize, layout: ColumnLayout) -> Option<ItemRecord> {
    let mut cells: Vec<CellValue> = (0..width)
        .map(|i| row.get(i).cloned().unwrap_or_default())
        .collect();

    let raw_name = &cells[layout.item_name];
    if raw_name.is_blank() {
        return None;
    }

    // 正規化の結果が空になる名前（"-" 等）も除外
    let item_name = normalize_cell(raw_name);
    if item_name.is_empty() {
        return None;
    }
    cells[layout.item_name] = CellValue::Text(item_name.clone());

    let raw_department = &cells[layout.department];
    let department = if raw_department.is_blank() || raw_department.is_zero() {
        cells[layout.department] = CellValue::Text(DEFAULT_DEPARTMENT.to_string());
        DEFAULT_DEPARTMENT.to_string()
    } else {
        raw_department.to_text()
    };

    let item_code = cells[layout.item_code].to_text();

    Some(ItemRecord {
        item_name,
        item_code,
        department,
        cells,
    })
}

/// 商品コードの並び順
#[derive(Debug, PartialEq)]
enum CodeKey<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> CodeKey<'a> {
    fn of(code: &'a str) -> Self {
        match code.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => CodeKey::Number(n),
            _ => CodeKey::Text(code),
        }
    }
}

/// 商品コードを比較する
///
/// 数値として読めるコードは数値順で文字列コードより前、それ以外は文字列順。
pub fn compare_item_codes(a: &str, b: &str) -> Ordering {
    match (CodeKey::of(a), CodeKey::of(b)) {
        (CodeKey::Number(x), CodeKey::Number(y)) => x.total_cmp(&y),
        (CodeKey::Number(_), CodeKey::Text(_)) => Ordering::Less,
        (CodeKey::Text(_), CodeKey::Number(_)) => Ordering::Greater,
        (CodeKey::Text(x), CodeKey::Text(y)) => x.cmp(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<CellValue> {
        vec!["Item Name".into(), "Item Code".into(), "Department".into(), "Price".into()]
    }

    fn row(name: CellValue, code: &str, department: CellValue) -> Vec<CellValue> {
        vec![name, code.into(), department, CellValue::Number(1.0)]
    }

    #[test]
    fn test_end_to_end_rows() {
        let rows = vec![
            row("3-Apple".into(), "A1", "Produce".into()),
            row("".into(), "A2", CellValue::Number(0.0)),
            row("Bread".into(), "B1", CellValue::Empty),
        ];
        let set = build_record_set(&header(), &rows, "42").unwrap();

        assert_eq!(set.code, "42");
        assert_eq!(set.len(), 2);
        assert_eq!(set.records[0].item_code, "B1");
        assert_eq!(set.records[0].department, "Other");
        assert_eq!(set.records[0].item_name, "Bread");
        assert_eq!(set.records[1].item_code, "A1");
        assert_eq!(set.records[1].department, "Produce");
        assert_eq!(set.records[1].item_name, "Apple (3)");
        // セルにも正規化後の値が入る
        assert_eq!(set.records[1].cells[0], CellValue::Text("Apple (3)".into()));
        assert_eq!(set.records[0].cells[2], CellValue::Text("Other".into()));
    }

    #[test]
    fn test_drops_blank_names() {
        let rows = vec![
            row(CellValue::Empty, "X1", "Dairy".into()),
            row("".into(), "X2", "Dairy".into()),
            row("-".into(), "X3", "Dairy".into()),
            row("Milk".into(), "X4", "Dairy".into()),
        ];
        let set = build_record_set(&header(), &rows, "10").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.records[0].item_code, "X4");
    }

    #[test]
    fn test_zero_department_defaults_to_other() {
        let rows = vec![row("Salt".into(), "S1", CellValue::Number(0.0))];
        let set = build_record_set(&header(), &rows, "10").unwrap();
        assert_eq!(set.records[0].department, "Other");
    }

    #[test]
    fn test_text_zero_department_kept() {
        let rows = vec![row("Salt".into(), "S1", "0".into())];
        let set = build_record_set(&header(), &rows, "10").unwrap();
        assert_eq!(set.records[0].department, "0");
    }

    #[test]
    fn test_stable_sort_for_ties() {
        let rows = vec![
            row("First".into(), "C1", "Dairy".into()),
            row("Second".into(), "C1", "Dairy".into()),
            row("Third".into(), "A1", "Dairy".into()),
        ];
        let set = build_record_set(&header(), &rows, "10").unwrap();
        let names: Vec<&str> = set.records.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let header = vec!["Item Name".into(), "Price".into()];
        let err = build_record_set(&header, &[], "10").unwrap_err();
        match err {
            Error::Schema { missing } => {
                assert_eq!(missing, vec!["Item Code".to_string(), "Department".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_header_names_trimmed() {
        let header = vec![" Item Name ".into(), "Item Code".into(), "Department ".into()];
        let rows = vec![vec!["Tea".into(), "T1".into(), "Drinks".into()]];
        let set = build_record_set(&header, &rows, "10").unwrap();
        assert_eq!(set.columns, vec!["Item Name", "Item Code", "Department"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_short_rows_padded() {
        let rows = vec![vec!["Tea".into(), "T1".into()]];
        let set = build_record_set(&header(), &rows, "10").unwrap();
        assert_eq!(set.records[0].department, "Other");
        assert_eq!(set.records[0].cells.len(), 4);
    }

    #[test]
    fn test_compare_item_codes() {
        assert_eq!(compare_item_codes("9", "10"), Ordering::Less);
        assert_eq!(compare_item_codes("A2", "A10"), Ordering::Greater);
        assert_eq!(compare_item_codes("10", "A1"), Ordering::Less);
        assert_eq!(compare_item_codes("B1", "B1"), Ordering::Equal);
    }
}
