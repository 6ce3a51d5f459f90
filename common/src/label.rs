//! ファイル名まわりのユーティリティ
//!
//! - ラベル（部門名・商品コード）からサムネイルのファイル名を作る
//! - 入力ファイル名からジョブコードを取り出す

/// ファイル名に使えない文字
pub const DISALLOWED_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// ジョブコードの桁数範囲
pub const JOB_CODE_MIN_LEN: usize = 2;
pub const JOB_CODE_MAX_LEN: usize = 10;

/// 使えない文字を `_` に置換する（1文字ずつ、連続していても個別に置換）
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if DISALLOWED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// ファイル名からジョブコードを抽出する
///
/// 最後の `-` 以降、最初の `.` より前の部分が 2〜10 桁の数字であれば返す。
/// `-` を含まない場合はファイル名全体を対象にする。
///
/// - `inventory-42.xlsx` → `Some("42")`
/// - `inventory-4.xlsx` → `None`（桁数不足）
/// - `inventory-A42.xlsx` → `None`
pub fn extract_job_code(file_name: &str) -> Option<String> {
    let tail = file_name.rsplit('-').next().unwrap_or(file_name);
    let code = tail.split('.').next().unwrap_or(tail);

    let valid_len = (JOB_CODE_MIN_LEN..=JOB_CODE_MAX_LEN).contains(&code.len());
    if valid_len && code.chars().all(|c| c.is_ascii_digit()) {
        Some(code.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_each_disallowed_char() {
        assert_eq!(sanitize_label(r#"a\b/c*d?e:f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_runs_of_disallowed_chars() {
        assert_eq!(sanitize_label("A/B::C"), "A_B__C");
        assert_eq!(sanitize_label("<<>>"), "____");
        assert_eq!(sanitize_label("Fruit & Veg"), "Fruit & Veg");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii() {
        assert_eq!(sanitize_label("青果/果物"), "青果_果物");
    }

    #[test]
    fn test_extract_job_code() {
        assert_eq!(extract_job_code("inventory-42.xlsx"), Some("42".to_string()));
        assert_eq!(extract_job_code("a-b-1234567890.xlsx"), Some("1234567890".to_string()));
        assert_eq!(extract_job_code("42.xlsx"), Some("42".to_string()));
    }

    #[test]
    fn test_extract_job_code_rejects_invalid() {
        assert_eq!(extract_job_code("inventory-4.xlsx"), None);
        assert_eq!(extract_job_code("inventory-12345678901.xlsx"), None);
        assert_eq!(extract_job_code("inventory-A42.xlsx"), None);
        assert_eq!(extract_job_code("inventory-.xlsx"), None);
        assert_eq!(extract_job_code("inventory-４２.xlsx"), None);
    }
}
