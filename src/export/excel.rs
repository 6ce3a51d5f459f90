//! Excel出力（CLI版）
//!
//! 共通ライブラリでバッファを生成し、一時ファイル経由で書き込む

use super::write_atomic;
use crate::error::{ItemThumbError, Result};
use item_thumb_common::export::excel_core::generate_excel_buffer;
use item_thumb_common::RecordSet;
use std::path::Path;

/// レコード集合をxlsxとして保存
pub fn write_record_set(records: &RecordSet, output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(records).map_err(ItemThumbError::ExcelGeneration)?;
    write_atomic(output_path, &buffer)?;
    Ok(())
}
