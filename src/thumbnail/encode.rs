//! サムネイルのエンコード
//!
//! 非可逆形式（WebP / JPEG）で品質を下げながらサイズ上限に収める。

use crate::error::{ItemThumbError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// 出力画像形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailFormat {
    #[default]
    Webp,
    Jpeg,
}

impl ThumbnailFormat {
    /// ファイル拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            ThumbnailFormat::Webp => "webp",
            ThumbnailFormat::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for ThumbnailFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(ThumbnailFormat::Webp),
            "jpeg" | "jpg" => Ok(ThumbnailFormat::Jpeg),
            _ => Err(format!("Unknown format: {}. Use webp or jpeg", s)),
        }
    }
}

impl std::fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThumbnailFormat::Webp => write!(f, "webp"),
            ThumbnailFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// 品質の段階（85 → 10、5刻み）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityLadder {
    pub initial: u8,
    /// 下限（これ以上は下げない）
    pub floor: u8,
    pub step: u8,
}

impl Default for QualityLadder {
    fn default() -> Self {
        Self {
            initial: 85,
            floor: 10,
            step: 5,
        }
    }
}

/// エンコード結果
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub quality: u8,
}

/// 指定品質でエンコード
pub fn encode_rgb(image: &RgbImage, format: ThumbnailFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        ThumbnailFormat::Webp => {
            let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
            let encoded = encoder
                .encode_simple(false, quality as f32)
                .map_err(|e| ItemThumbError::ImageEncode(format!("WebP: {:?}", e)))?;
            Ok(encoded.to_vec())
        }
        ThumbnailFormat::Jpeg => {
            let mut buf = Vec::new();
            {
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
                encoder
                    .encode_image(image)
                    .map_err(|e| ItemThumbError::ImageEncode(e.to_string()))?;
            }
            Ok(buf)
        }
    }
}

/// サイズ上限に収まるまで品質を下げてエンコード
///
/// 下限品質に達した場合はサイズ超過のまま返す（サイズだけでは失敗しない）。
pub fn encode_within_budget(
    image: &RgbImage,
    format: ThumbnailFormat,
    ladder: QualityLadder,
    budget_bytes: u64,
) -> Result<Encoded> {
    let mut quality = ladder.initial.max(ladder.floor);

    loop {
        let bytes = encode_rgb(image, format, quality)?;
        let size = bytes.len() as u64;

        if size <= budget_bytes || quality <= ladder.floor {
            return Ok(Encoded { bytes, quality });
        }

        tracing::debug!(quality, size, budget = budget_bytes, "サイズ超過、品質を下げて再エンコード");
        quality = quality.saturating_sub(ladder.step.max(1)).max(ladder.floor);
    }
}
