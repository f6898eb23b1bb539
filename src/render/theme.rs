//! Page geometry and the slate palette shared by every page.

use crate::render::canvas::Color;

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;
pub const MARGIN: f32 = 60.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Baseline of the page title.
pub const TITLE_Y: f32 = PAGE_HEIGHT - 80.0;

pub const PRIMARY: Color = Color::hex(0x1e293b);
pub const SECONDARY: Color = Color::hex(0x334155);
pub const TERTIARY: Color = Color::hex(0x475569);
pub const LIGHT: Color = Color::hex(0x64748b);
pub const LIGHTER: Color = Color::hex(0x94a3b8);
pub const LIGHTEST: Color = Color::hex(0xcbd5e1);
pub const BG_LIGHT: Color = Color::hex(0xf8fafc);
pub const WHITE: Color = Color::hex(0xffffff);
pub const BLACK: Color = Color::hex(0x000000);
pub const BRAND: Color = Color::hex(0x17134f);

/// Series colors, darkest first.
pub const SERIES: [Color; 10] = [
    Color::hex(0x17134f),
    Color::hex(0x1e40af),
    Color::hex(0x3b82f6),
    Color::hex(0x60a5fa),
    Color::hex(0x0f766e),
    Color::hex(0x14b8a6),
    Color::hex(0x64748b),
    Color::hex(0x94a3b8),
    Color::hex(0xa16207),
    Color::hex(0xeab308),
];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}
