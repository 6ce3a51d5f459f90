//! Web画像検索とHTTP取得（reqwest blocking）

use super::{FetchResponse, ImageFetch, ImageSearch};
use crate::error::{ItemThumbError, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

/// 画像検索ページをスクレイピングして最初の画像URLを返す
pub struct WebImageSearch {
    client: Client,
    endpoint: String,
}

impl WebImageSearch {
    pub const DEFAULT_ENDPOINT: &'static str = "https://www.google.com/search";

    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ItemThumbError::Network(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// 検索エンドポイントを差し替える
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl ImageSearch for WebImageSearch {
    fn search(&self, query: &str) -> Option<String> {
        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("tbm", "isch"), ("q", query)])
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(query, error = %e, "画像検索に接続できません。プレースホルダを使用します");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(query, status = response.status().as_u16(), "画像検索が失敗しました");
            return None;
        }

        let html = match response.text() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(query, error = %e, "検索結果の読み込みに失敗しました");
                return None;
            }
        };

        let url = extract_image_url(&html);
        if url.is_none() {
            tracing::debug!(query, "検索結果に画像がありません");
        }
        url
    }
}

/// HTML中の `<img src>` のうち、最初に `http` を含むものを返す
pub fn extract_image_url(html: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref IMG_SRC_RE: Regex =
            Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).unwrap();
    }

    IMG_SRC_RE
        .captures_iter(html)
        .map(|cap| cap[1].replace("&amp;", "&"))
        .find(|src| src.contains("http"))
}

/// HTTP GET による画像取得
pub struct HttpImageFetch {
    client: Client,
}

impl HttpImageFetch {
    /// 既定のタイムアウト（reqwest blocking の既定値）で作成
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ItemThumbError::Network(format!("HTTPクライアント初期化エラー: {}", e)))?;
        Ok(Self { client })
    }
}

impl ImageFetch for HttpImageFetch {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ItemThumbError::Network(format!("{}: {}", url, e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .map_err(|e| ItemThumbError::Network(format!("{}: {}", url, e)))?
            .to_vec();

        Ok(FetchResponse { status, bytes })
    }
}
