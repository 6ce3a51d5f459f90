//! サムネイル生成パイプライン
//!
//! ラベル（部門名・商品コード）ごとに1枚のサムネイルを作る。
//!
//! ## 処理フロー
//! 1. 画像検索 → URL取得
//! 2. 画像取得・デコード（失敗時はプレースホルダへ）
//! 3. 400x400 にリサイズ（Lanczos3）・シャープ化
//! 4. サイズ上限に収まるまで品質を下げてエンコード
//! 5. 一時ファイル（`.<name>.XXXXXX.tmp`）に書き込み、最終パスへ置き換え

pub mod encode;
pub mod placeholder;

pub use encode::{encode_within_budget, QualityLadder, ThumbnailFormat};
pub use placeholder::render_placeholder;

use crate::error::{ItemThumbError, Result};
use crate::export::write_atomic;
use crate::search::{ImageFetch, ImageSearch};
use image::imageops::{self, FilterType};
use image::RgbImage;
use item_thumb_common::sanitize_label;
use std::path::{Path, PathBuf};

/// サムネイル設定
#[derive(Debug, Clone)]
pub struct ThumbnailOptions {
    /// 実画像サムネイルのサイズ上限（KB）
    pub size_budget_kb: u64,
    /// 出力の一辺（px）
    pub edge: u32,
    pub format: ThumbnailFormat,
    pub ladder: QualityLadder,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            size_budget_kb: 50,
            edge: 400,
            format: ThumbnailFormat::Webp,
            ladder: QualityLadder::default(),
        }
    }
}

impl ThumbnailOptions {
    pub fn budget_bytes(&self) -> u64 {
        self.size_budget_kb * 1024
    }
}

/// 生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResult {
    pub path: PathBuf,
    pub was_placeholder: bool,
    /// 最終的なエンコード品質
    pub quality: u8,
    pub size_bytes: u64,
}

/// 3x3 シャープ化カーネル（合計16で正規化）
const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-2, -2, -2], [-2, 32, -2], [-2, -2, -2]];
const SHARPEN_DIVISOR: f32 = 16.0;

pub struct ThumbnailPipeline {
    search: Box<dyn ImageSearch>,
    fetch: Box<dyn ImageFetch>,
    options: ThumbnailOptions,
}

impl ThumbnailPipeline {
    pub fn new(
        search: Box<dyn ImageSearch>,
        fetch: Box<dyn ImageFetch>,
        options: ThumbnailOptions,
    ) -> Self {
        Self {
            search,
            fetch,
            options,
        }
    }

    pub fn options(&self) -> &ThumbnailOptions {
        &self.options
    }

    /// ラベルに対応するサムネイルのパス
    pub fn thumbnail_path(&self, label: &str, folder: &Path) -> PathBuf {
        folder.join(format!("{}.{}", sanitize_label(label), self.options.format.extension()))
    }

    /// サムネイルを作成（既存ファイルは上書き）
    ///
    /// # Errors
    /// * `InvalidLabel` - ラベルが空
    /// * `Io` / `ImageEncode` - 書き込み・エンコード失敗
    ///
    /// 検索・取得の失敗はエラーにならず、プレースホルダを作成する。
    pub fn ensure_thumbnail(&self, label: &str, folder: &Path) -> Result<ThumbnailResult> {
        self.ensure_thumbnail_with_query(label, label, folder)
    }

    /// 検索語とファイル名のラベルを分けてサムネイルを作成
    ///
    /// 商品行では商品名で検索し、商品コードでファイルを保存する。
    /// 検索語が空の場合はラベルで検索する。
    pub fn ensure_thumbnail_with_query(
        &self,
        query: &str,
        label: &str,
        folder: &Path,
    ) -> Result<ThumbnailResult> {
        if label.trim().is_empty() {
            return Err(ItemThumbError::InvalidLabel);
        }

        let query = if query.trim().is_empty() { label } else { query };
        let final_path = self.thumbnail_path(label, folder);

        match self.acquire(query) {
            Some(image) => self.write_real(&image, label, final_path),
            None => self.write_placeholder(final_path),
        }
    }

    /// 検索・取得・デコード。どの段階の失敗も `None`
    fn acquire(&self, query: &str) -> Option<RgbImage> {
        let url = self.search.search(query)?;

        let response = match self.fetch.get(&url) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(query, url = %url, error = %e, "画像の取得に失敗しました");
                return None;
            }
        };

        if !response.is_ok() {
            tracing::warn!(query, url = %url, status = response.status, "画像の取得に失敗しました");
            return None;
        }

        match decode_image(&response.bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(query, url = %url, error = %e, "プレースホルダを使用します");
                None
            }
        }
    }

    fn write_real(&self, image: &RgbImage, label: &str, final_path: PathBuf) -> Result<ThumbnailResult> {
        let prepared = prepare_thumbnail(image, self.options.edge);
        let encoded = encode_within_budget(
            &prepared,
            self.options.format,
            self.options.ladder,
            self.options.budget_bytes(),
        )?;

        write_atomic(&final_path, &encoded.bytes)?;

        tracing::debug!(
            label,
            path = %final_path.display(),
            quality = encoded.quality,
            size = encoded.bytes.len(),
            "サムネイルを保存"
        );

        Ok(ThumbnailResult {
            path: final_path,
            was_placeholder: false,
            quality: encoded.quality,
            size_bytes: encoded.bytes.len() as u64,
        })
    }

    fn write_placeholder(&self, final_path: PathBuf) -> Result<ThumbnailResult> {
        let canvas = render_placeholder(self.options.edge);
        let quality = self.options.ladder.initial;
        let bytes = encode::encode_rgb(&canvas, self.options.format, quality)?;
        write_atomic(&final_path, &bytes)?;

        tracing::debug!(path = %final_path.display(), "プレースホルダを保存");

        Ok(ThumbnailResult {
            path: final_path,
            was_placeholder: true,
            quality,
            size_bytes: bytes.len() as u64,
        })
    }
}

/// 取得したバイト列を画像としてデコード
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgb8())
        .map_err(|e| ItemThumbError::ImageDecode(e.to_string()))
}

/// 正方形にリサイズしてシャープ化
pub fn prepare_thumbnail(image: &RgbImage, edge: u32) -> RgbImage {
    let resized = imageops::resize(image, edge, edge, FilterType::Lanczos3);
    sharpen(&resized)
}

/// シャープ化（外周1pxはそのまま）
pub fn sharpen(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0i32; 3];
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, &k) in row.iter().enumerate() {
                    let p = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for (c, sum) in acc.iter_mut().enumerate() {
                        *sum += k * p[c] as i32;
                    }
                }
            }

            let pixel = out.get_pixel_mut(x, y);
            for (c, sum) in acc.iter().enumerate() {
                pixel[c] = (*sum as f32 / SHARPEN_DIVISOR).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_sharpen_keeps_flat_image() {
        let image = RgbImage::from_pixel(8, 8, Rgb([120, 60, 30]));
        assert_eq!(sharpen(&image), image);
    }

    #[test]
    fn test_sharpen_increases_contrast() {
        let mut image = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
        image.put_pixel(2, 2, Rgb([150, 150, 150]));
        let sharpened = sharpen(&image);
        assert!(sharpened.get_pixel(2, 2)[0] > 150);
        assert!(sharpened.get_pixel(1, 1)[0] < 100);
    }

    #[test]
    fn test_prepare_thumbnail_dimensions() {
        let image = RgbImage::from_pixel(640, 320, Rgb([10, 200, 30]));
        let prepared = prepare_thumbnail(&image, 400);
        assert_eq!(prepared.dimensions(), (400, 400));
    }

    #[test]
    fn test_decode_image_rejects_html() {
        let result = decode_image(b"<html>not an image</html>");
        assert!(matches!(result, Err(ItemThumbError::ImageDecode(_))));
    }

    #[test]
    fn test_default_options() {
        let options = ThumbnailOptions::default();
        assert_eq!(options.budget_bytes(), 50 * 1024);
        assert_eq!(options.edge, 400);
        assert_eq!(options.ladder.initial, 85);
    }
}
