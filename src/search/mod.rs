//! 画像検索・取得の外部機能
//!
//! スクレイピングによる検索は壊れやすいため、狭いトレイトの背後に置く。
//! テストではスタブに差し替える。

mod web;

pub use web::{extract_image_url, HttpImageFetch, WebImageSearch};

use crate::error::Result;

/// 画像検索
pub trait ImageSearch {
    /// 候補画像のURLを返す。通信失敗・該当なしはどちらも `None`
    fn search(&self, query: &str) -> Option<String>;
}

/// 画像取得（HTTP GET）
pub trait ImageFetch {
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// 取得結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 常に該当なし（オフライン運用・プレースホルダのみ）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSearch;

impl ImageSearch for NoSearch {
    fn search(&self, _query: &str) -> Option<String> {
        None
    }
}

impl<T: ImageSearch + ?Sized> ImageSearch for Box<T> {
    fn search(&self, query: &str) -> Option<String> {
        (**self).search(query)
    }
}

impl<T: ImageFetch + ?Sized> ImageFetch for Box<T> {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        (**self).get(url)
    }
}
