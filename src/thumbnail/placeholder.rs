//! プレースホルダ画像
//!
//! 白地に黒で "No Image Found" を中央配置した正方形画像を描画する。
//! フォントは 5x7 のビットマップを内蔵（外部フォントファイル不要）。

use image::{Rgb, RgbImage};

/// プレースホルダの文言
pub const PLACEHOLDER_TEXT: &str = "No Image Found";

/// 文字の拡大率
const TEXT_SCALE: u32 = 2;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// 文字間（拡大前）
const GLYPH_SPACING: u32 = 1;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// 各行の下位5ビットが左から右のドット
fn glyph(c: char) -> [u8; 7] {
    match c {
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'g' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'n' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'd' => [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111],
        _ => [0; 7],
    }
}

/// 描画後のテキストの外接矩形 (幅, 高さ)
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, 0);
    }
    let width = (chars * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * scale;
    (width, GLYPH_HEIGHT * scale)
}

/// (x, y) を左上としてテキストを描画（はみ出した部分は切り捨て）
pub fn draw_text(image: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (width, height) = image.dimensions();

    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * (GLYPH_WIDTH + GLYPH_SPACING) * scale;

        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = origin_x + col * scale + dx;
                        let py = y + row as u32 * scale + dy;
                        if px < width && py < height {
                            image.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}

/// プレースホルダ画像を描画
pub fn render_placeholder(edge: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(edge, edge, WHITE);

    let (text_width, text_height) = text_size(PLACEHOLDER_TEXT, TEXT_SCALE);
    let x = edge.saturating_sub(text_width) / 2;
    let y = edge.saturating_sub(text_height) / 2;
    draw_text(&mut canvas, PLACEHOLDER_TEXT, x, y, TEXT_SCALE, BLACK);

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("", 2), (0, 0));
        assert_eq!(text_size("N", 1), (5, 7));
        assert_eq!(text_size(PLACEHOLDER_TEXT, 2), (166, 14));
    }

    #[test]
    fn test_placeholder_dimensions_and_background() {
        let image = render_placeholder(400);
        assert_eq!(image.dimensions(), (400, 400));
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(399, 399), WHITE);
    }

    #[test]
    fn test_placeholder_text_is_centered() {
        let image = render_placeholder(400);

        let dark: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!dark.is_empty());

        let min_x = dark.iter().map(|p| p.0).min().unwrap();
        let max_x = dark.iter().map(|p| p.0).max().unwrap();
        let min_y = dark.iter().map(|p| p.1).min().unwrap();
        let max_y = dark.iter().map(|p| p.1).max().unwrap();

        // 左端 'N' と右端 'd' はどちらも外接矩形の端まで描画される
        assert_eq!(min_x, 117);
        assert_eq!(max_x, 117 + 166 - 1);
        assert_eq!(min_y, 193);
        assert_eq!(max_y, 193 + 14 - 1);
    }

    #[test]
    fn test_draw_text_clips_outside() {
        let mut image = RgbImage::from_pixel(10, 10, WHITE);
        draw_text(&mut image, "NNNN", 5, 5, 2, BLACK);
        assert_eq!(*image.get_pixel(5, 5), BLACK);
    }
}
