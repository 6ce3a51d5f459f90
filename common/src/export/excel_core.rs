//! Excel生成（共通ライブラリ）
//!
//! 正規化済みレコード集合を1シートのxlsxとしてバッファに書き出す。
//! 列は元ファイルの順序を保ち、末尾に Code 列を追加する。

use crate::types::{CellValue, RecordSet};
use rust_xlsxwriter::*;

/// 出力シート名
pub const SHEET_NAME: &str = "Sheet1";

/// レコード集合をxlsxバッファに変換
pub fn generate_excel_buffer(records: &RecordSet) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    // ヘッダ行
    for (col, name) in records.output_columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)
            .map_err(|e| format!("ヘッダ書き込みエラー: {}", e))?;
    }

    let code_col = records.columns.len() as u16;

    for (i, record) in records.records.iter().enumerate() {
        let row = (i + 1) as u32;

        for (col, cell) in record.cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)
                        .map_err(|e| format!("セル書き込みエラー: {}", e))?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n)
                        .map_err(|e| format!("セル書き込みエラー: {}", e))?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)
                        .map_err(|e| format!("セル書き込みエラー: {}", e))?;
                }
            }
        }

        worksheet.write_string(row, code_col, &records.code)
            .map_err(|e| format!("Code書き込みエラー: {}", e))?;
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemRecord;

    #[test]
    fn test_generate_excel_buffer_is_zip() {
        let records = RecordSet {
            code: "42".to_string(),
            columns: vec!["Item Name".into(), "Item Code".into(), "Department".into()],
            records: vec![ItemRecord {
                item_name: "Bread".into(),
                item_code: "B1".into(),
                department: "Other".into(),
                cells: vec!["Bread".into(), "B1".into(), "Other".into()],
            }],
        };

        let buffer = generate_excel_buffer(&records).unwrap();
        // xlsx は ZIP コンテナ
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_generate_excel_buffer_empty_records() {
        let records = RecordSet {
            code: "42".to_string(),
            columns: vec!["Item Name".into(), "Item Code".into(), "Department".into()],
            records: vec![],
        };
        assert!(generate_excel_buffer(&records).is_ok());
    }
}
