//! Item Thumb Common Library
//!
//! 在庫表の正規化ロジックと共有型（I/Oを持たない部分）

pub mod types;
pub mod error;
pub mod normalizer;
pub mod label;
pub mod records;
pub mod export;

pub use types::{CellValue, ItemRecord, RecordSet};
pub use error::{Error, Result};
pub use normalizer::{normalize_cell, normalize_item_name};
pub use label::{extract_job_code, sanitize_label};
pub use records::{build_record_set, compare_item_codes};
