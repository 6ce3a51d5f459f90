pub mod excel;

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// 一時ファイル名の乱数部の長さ
const TEMP_RAND_LEN: usize = 6;
const TEMP_SUFFIX: &str = ".tmp";

/// 正規化済みスプレッドシートの出力パス
pub fn processed_data_path(code_folder: &Path, code: &str) -> PathBuf {
    code_folder.join(format!("processed_data_{}.xlsx", code))
}

/// 一時ファイルの接頭辞（`.<最終ファイル名>.`）
///
/// 一時ファイルは `.<name>.XXXXXX.tmp` となり、どのラベルの最終パスとも重ならない。
fn temp_prefix(final_path: &Path) -> String {
    let file_name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!(".{}.", file_name)
}

fn is_temp_for(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(TEMP_SUFFIX))
        .map(|rand| rand.len() == TEMP_RAND_LEN && rand.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(false)
}

/// 中断された書き込みの一時ファイルを削除する
pub fn remove_stale_temps(final_path: &Path) -> std::io::Result<usize> {
    let folder = final_path.parent().unwrap_or_else(|| Path::new("."));
    if !folder.exists() {
        return Ok(0);
    }

    let prefix = temp_prefix(final_path);
    let mut removed = 0;
    for entry in std::fs::read_dir(folder)?.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().to_string();
        if is_temp_for(&name, &prefix) && entry.path().is_file() {
            std::fs::remove_file(entry.path())?;
            tracing::debug!(file = %name, "残っていた一時ファイルを削除");
            removed += 1;
        }
    }
    Ok(removed)
}

/// 同じフォルダの一時ファイル経由でバイト列を書き込む
///
/// 一時ファイルは排他的に作成され、`persist` で最終パスへ置き換える。
/// 失敗時は一時ファイルを残さない。
pub fn write_atomic(final_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let folder = final_path.parent().unwrap_or_else(|| Path::new("."));
    remove_stale_temps(final_path)?;

    let mut temp: NamedTempFile = Builder::new()
        .prefix(&temp_prefix(final_path))
        .suffix(TEMP_SUFFIX)
        .rand_bytes(TEMP_RAND_LEN)
        .tempfile_in(folder)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    temp.persist(final_path).map_err(|e| e.error)?;
    Ok(())
}
