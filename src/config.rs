use crate::error::{ItemThumbError, Result};
use crate::thumbnail::{ThumbnailFormat, ThumbnailOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 監視フォルダ
    pub watch_dir: PathBuf,
    /// 出力ルート
    pub output_root: PathBuf,
    pub poll_interval_seconds: u64,
    /// 読み込むシート（0始まり）
    pub sheet_index: usize,
    /// 実画像サムネイルのサイズ上限（KB）
    pub size_budget_kb: u64,
    pub thumbnail_format: ThumbnailFormat,
    pub search_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ItemThumbError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("item-thumb").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            watch_dir: PathBuf::from("raw_files"),
            output_root: PathBuf::from("processed_data"),
            poll_interval_seconds: 10,
            sheet_index: 0,
            size_budget_kb: 50,
            thumbnail_format: ThumbnailFormat::Webp,
            search_timeout_seconds: 10,
            user_agent: "Mozilla/5.0".into(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }

    pub fn thumbnail_options(&self) -> ThumbnailOptions {
        ThumbnailOptions {
            size_budget_kb: self.size_budget_kb,
            format: self.thumbnail_format,
            ..Default::default()
        }
    }

    /// 監視フォルダと出力ルートを作成
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.watch_dir)?;
        std::fs::create_dir_all(&self.output_root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.watch_dir, PathBuf::from("raw_files"));
        assert_eq!(config.output_root, PathBuf::from("processed_data"));
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.sheet_index, 0);
        assert_eq!(config.thumbnail_options().budget_bytes(), 50 * 1024);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"size_budget_kb": 80, "thumbnail_format": "jpeg"}"#).unwrap();
        assert_eq!(config.size_budget_kb, 80);
        assert_eq!(config.thumbnail_format, ThumbnailFormat::Jpeg);
        assert_eq!(config.user_agent, "Mozilla/5.0");
    }
}
