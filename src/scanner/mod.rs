use crate::error::{ItemThumbError, Result};
use item_thumb_common::extract_job_code;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// 監視フォルダに置かれた在庫表
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    /// 作成日時（取得できない環境では更新日時）
    pub created: SystemTime,
    /// ファイル名から抽出したジョブコード
    pub code: Option<String>,
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "XLSX"];

pub fn scan_watch_dir(folder: &Path) -> Result<Vec<SourceFile>> {
    if !folder.exists() {
        return Err(ItemThumbError::FolderNotFound(folder.display().to_string()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Excelのロックファイル（~$xxx.xlsx）・隠しファイルは対象外
        if file_name.starts_with("~$") || file_name.starts_with('.') {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if WORKBOOK_EXTENSIONS.iter().any(|&e| e == ext_str) {
                let created = entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.created().or_else(|_| m.modified()).ok())
                    .unwrap_or(SystemTime::UNIX_EPOCH);

                files.push(SourceFile {
                    path: path.to_path_buf(),
                    code: extract_job_code(&file_name),
                    file_name,
                    created,
                });
            }
        }
    }

    // ファイル名でソート
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(files)
}

/// ジョブコードを持つファイルのうち最も新しいもの
///
/// 作成日時が同じ場合はファイル名の大きい方を選ぶ。
pub fn newest_eligible(files: &[SourceFile]) -> Option<(&SourceFile, &str)> {
    files
        .iter()
        .filter_map(|f| f.code.as_deref().map(|code| (f, code)))
        .max_by(|(a, _), (b, _)| {
            a.created
                .cmp(&b.created)
                .then_with(|| a.file_name.cmp(&b.file_name))
        })
}

#[cfg(test)]
fn is_workbook_extension(ext: &str) -> bool {
    WORKBOOK_EXTENSIONS.contains(&ext)
}
