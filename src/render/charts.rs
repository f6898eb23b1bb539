//! Reusable drawing blocks: metric strips, axes, bar/line/donut charts,
//! legends and tables.

use crate::render::canvas::{Align, Canvas, Color, Paint};
use crate::render::fonts::Font;
use crate::render::format;
use crate::render::theme;

/// Rectangle with `y` at the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Center of the `i`-th of `n` equal slots along the x axis.
    pub fn slot_center(&self, i: usize, n: usize) -> f32 {
        let slot = self.width / n.max(1) as f32;
        self.x + slot * (i as f32 + 0.5)
    }
}

#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: Color,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Metric {
    pub value: String,
    pub label: String,
    pub sublabel: String,
}

impl Metric {
    pub fn new(value: impl Into<String>, label: impl Into<String>, sublabel: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            sublabel: sublabel.into(),
        }
    }
}

/// Linear mapping from data values to a vertical extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    pub fn new(min: f64, max: f64) -> Self {
        if max > min {
            Self { min, max }
        } else {
            Self { min, max: min + 1.0 }
        }
    }

    /// From zero (or below, for negative data) to a rounded ceiling.
    pub fn for_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Self {
        let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
        for &v in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let max = nice_ceiling(hi * 1.1);
        let min = if lo < 0.0 { -nice_ceiling(-lo * 1.1) } else { 0.0 };
        Self::new(min, max)
    }

    pub fn y(&self, area: &Area, value: f64) -> f32 {
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        area.y + area.height * t as f32
    }

    pub fn ticks(&self, steps: usize) -> Vec<f64> {
        ticks(self.min, self.max, steps)
    }
}

/// Smallest of 1, 2, 2.5 or 5 × 10^k that is at least `value`.
pub fn nice_ceiling(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let base = 10_f64.powf(value.log10().floor());
    for m in [1.0, 2.0, 2.5, 5.0] {
        if m * base >= value * (1.0 - 1e-9) {
            return m * base;
        }
    }
    10.0 * base
}

/// `steps + 1` evenly spaced values from `min` to `max`.
pub fn ticks(min: f64, max: f64, steps: usize) -> Vec<f64> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| min + (max - min) * i as f64 / steps as f64)
        .collect()
}

/// A strip of headline numbers separated by thin dividers.
pub fn metric_row(canvas: &mut Canvas, x: f32, top: f32, width: f32, height: f32, metrics: &[Metric]) {
    if metrics.is_empty() {
        return;
    }
    let section = width / metrics.len() as f32;

    for (i, metric) in metrics.iter().enumerate() {
        let left = x + section * i as f32;
        if i > 0 {
            canvas.set_stroke(theme::LIGHTEST);
            canvas.set_line_width(1.0);
            canvas.line(left, top - height + 15.0, left, top - 15.0);
        }

        let center = left + section / 2.0;
        let value_y = top - height / 2.0 + 10.0;

        canvas.set_fill(theme::PRIMARY);
        canvas.text_centred(center, value_y, Font::Bold, 20.0, &metric.value);

        canvas.set_fill(theme::LIGHT);
        canvas.text_centred(center, value_y - 20.0, Font::Bold, 8.0, &metric.label.to_uppercase());

        canvas.set_fill(theme::LIGHTER);
        for (j, part) in metric.sublabel.split(" • ").enumerate() {
            canvas.text_centred(center, value_y - 33.0 - j as f32 * 9.0, Font::Regular, 7.0, part);
        }
    }
}

/// Horizontal grid lines with labels on the left.
pub fn value_axis(
    canvas: &mut Canvas,
    area: &Area,
    scale: &Scale,
    steps: usize,
    label: impl Fn(f64) -> String,
) {
    for tick in scale.ticks(steps) {
        let y = scale.y(area, tick);
        canvas.set_fill(theme::LIGHT);
        canvas.text_right(area.x - 8.0, y - 3.0, Font::Regular, 8.0, &label(tick));

        canvas.set_stroke(theme::LIGHTEST);
        canvas.set_line_width(0.5);
        canvas.line(area.x, y, area.right(), y);
    }
}

/// Category labels centred under each slot.
pub fn category_axis(canvas: &mut Canvas, area: &Area, categories: &[String]) {
    canvas.set_fill(theme::TERTIARY);
    for (i, category) in categories.iter().enumerate() {
        let cx = area.slot_center(i, categories.len());
        canvas.text_centred(cx, area.y - 14.0, Font::Regular, 8.0, category);
    }
}

fn bar_width(area: &Area, n: usize, max: f32) -> f32 {
    let slot = area.width / n.max(1) as f32;
    (slot * 0.6).min(max)
}

/// One bar per category, segments stacked in series order. The stack total
/// is printed above each bar.
pub fn stacked_bars(
    canvas: &mut Canvas,
    area: &Area,
    categories: &[String],
    series: &[Series],
    scale: &Scale,
    total_label: impl Fn(f64) -> String,
) {
    let n = categories.len();
    if n == 0 {
        return;
    }
    let width = bar_width(area, n, 40.0);

    for i in 0..n {
        let cx = area.slot_center(i, n);
        let mut running = 0.0;
        for s in series {
            let value = s.values.get(i).copied().unwrap_or(0.0).max(0.0);
            if value <= 0.0 {
                continue;
            }
            let y0 = scale.y(area, running);
            let y1 = scale.y(area, running + value);
            canvas.fill_rect(cx - width / 2.0, y0, width, y1 - y0, s.color);
            running += value;
        }

        if running > 0.0 {
            canvas.set_fill(theme::PRIMARY);
            canvas.text_centred(
                cx,
                scale.y(area, running) + 5.0,
                Font::Bold,
                7.0,
                &total_label(running),
            );
        }
    }

    category_axis(canvas, area, categories);
}

/// Single-series bars with the value above each bar and labels rotated
/// under the axis.
pub fn ranking_bars(
    canvas: &mut Canvas,
    area: &Area,
    labels: &[String],
    values: &[f64],
    color: Color,
    scale: &Scale,
    value_label: impl Fn(f64) -> String,
) {
    let n = values.len();
    if n == 0 {
        return;
    }
    let width = bar_width(area, n, 30.0);

    for (i, &value) in values.iter().enumerate() {
        let cx = area.slot_center(i, n);
        let top = scale.y(area, value).max(area.y + 5.0);
        canvas.fill_rect(cx - width / 2.0, area.y, width, top - area.y, color);

        canvas.set_fill(theme::PRIMARY);
        canvas.text_centred(cx, top + 5.0, Font::Bold, 7.0, &value_label(value));

        if let Some(label) = labels.get(i) {
            canvas.set_fill(theme::TERTIARY);
            let w = canvas.string_width(label, Font::Regular, 7.0);
            // Rotated -45° so the label ends under the bar.
            let offset = w * std::f32::consts::FRAC_1_SQRT_2;
            canvas.text_rotated(cx - offset, area.y - 10.0 + offset, -45.0, Font::Regular, 7.0, label);
        }
    }
}

/// Polylines with round markers; one point per category.
pub fn line_chart(canvas: &mut Canvas, area: &Area, categories: &[String], series: &[Series], scale: &Scale) {
    let n = categories.len();
    if n == 0 {
        return;
    }

    for s in series {
        let points: Vec<(f32, f32)> = (0..n)
            .map(|i| {
                let value = s.values.get(i).copied().unwrap_or(0.0);
                (area.slot_center(i, n), scale.y(area, value))
            })
            .collect();

        canvas.set_stroke(s.color);
        canvas.set_line_width(2.0);
        canvas.polyline(&points);

        canvas.set_fill(s.color);
        for &(x, y) in &points {
            canvas.circle(x, y, 2.5, Paint::Fill);
        }
    }

    category_axis(canvas, area, categories);
}

/// Horizontal legend that wraps to new rows. Returns the height used.
pub fn legend(canvas: &mut Canvas, x: f32, top: f32, max_width: f32, items: &[(String, Color)]) -> f32 {
    let row_height = 14.0;
    let mut cx = x;
    let mut cy = top;

    for (label, color) in items {
        let item_width = 12.0 + canvas.string_width(label, Font::Regular, 8.0) + 14.0;
        if cx > x && cx + item_width > x + max_width {
            cx = x;
            cy -= row_height;
        }
        canvas.fill_rect(cx, cy - 7.0, 8.0, 8.0, *color);
        canvas.set_fill(theme::TERTIARY);
        canvas.text(cx + 12.0, cy - 6.0, Font::Regular, 8.0, label);
        cx += item_width;
    }

    if items.is_empty() {
        0.0
    } else {
        top - cy + row_height
    }
}

/// Donut with a headline in the hole and a legend with percentages
/// underneath.
#[allow(clippy::too_many_arguments)]
pub fn donut_chart(
    canvas: &mut Canvas,
    cx: f32,
    cy: f32,
    radius: f32,
    slices: &[(String, f64, Color)],
    center_value: &str,
    center_label: &str,
) {
    let values: Vec<(f64, Color)> = slices.iter().map(|(_, v, c)| (*v, *c)).collect();
    let total: f64 = values.iter().map(|(v, _)| v.max(0.0)).sum();

    if total <= 0.0 {
        canvas.set_stroke(theme::LIGHTEST);
        canvas.set_line_width(radius * 0.4);
        canvas.circle(cx, cy, radius * 0.8, Paint::Stroke);
    } else {
        canvas.donut(cx, cy, radius, radius * 0.6, &values, theme::WHITE);
    }

    canvas.set_fill(theme::PRIMARY);
    canvas.text_centred(cx, cy + 2.0, Font::Bold, 14.0, center_value);
    canvas.set_fill(theme::LIGHT);
    canvas.text_centred(cx, cy - 12.0, Font::Regular, 7.0, center_label);

    let mut y = cy - radius - 22.0;
    for (label, value, color) in slices {
        let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
        canvas.fill_rect(cx - radius, y, 8.0, 8.0, *color);
        canvas.set_fill(theme::TERTIARY);
        canvas.text(cx - radius + 12.0, y + 1.0, Font::Regular, 8.0, label);
        canvas.set_fill(theme::PRIMARY);
        canvas.text_right(
            cx + radius,
            y + 1.0,
            Font::Bold,
            8.0,
            &format!("{} ({:.1}%)", format::brl_short(*value), share),
        );
        y -= 14.0;
    }
}

/// Empty axes with a centred message.
pub fn no_data(canvas: &mut Canvas, area: &Area, message: &str) {
    canvas.set_stroke(theme::LIGHTEST);
    canvas.set_line_width(0.5);
    canvas.line(area.x, area.y, area.x, area.top());
    canvas.line(area.x, area.y, area.right(), area.y);

    canvas.set_fill(theme::LIGHTER);
    canvas.text_centred(
        area.x + area.width / 2.0,
        area.y + area.height / 2.0,
        Font::Oblique,
        11.0,
        message,
    );
}

#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub width: f32,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, width: f32, align: Align) -> Self {
        Self {
            header: header.into(),
            width,
            align,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    /// Group title spanning the row.
    Section,
    Highlight,
    Total,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<String>,
    pub style: RowStyle,
}

impl Row {
    pub fn new(cells: Vec<String>, style: RowStyle) -> Self {
        Self { cells, style }
    }

    pub fn section(title: impl Into<String>) -> Self {
        Self {
            cells: vec![title.into()],
            style: RowStyle::Section,
        }
    }
}

/// Draws a header row and body rows from `top` downwards. Returns the y of
/// the bottom edge.
pub fn table(canvas: &mut Canvas, x: f32, top: f32, columns: &[Column], rows: &[Row], row_height: f32) -> f32 {
    let total_width: f32 = columns.iter().map(|c| c.width).sum();
    let font_size = (row_height * 0.5).clamp(6.0, 9.0);
    let baseline = |row_top: f32| row_top - row_height / 2.0 - font_size * 0.35;

    canvas.fill_rect(x, top - row_height, total_width, row_height, theme::PRIMARY);
    canvas.set_fill(theme::WHITE);
    draw_cells(
        canvas,
        x,
        baseline(top),
        columns,
        columns.iter().map(|c| c.header.as_str()),
        Font::Bold,
        font_size,
    );

    let mut y = top - row_height;
    for (i, row) in rows.iter().enumerate() {
        let (background, text_color, font) = match row.style {
            RowStyle::Section => (Some(theme::LIGHTEST.lighten(0.4)), theme::PRIMARY, Font::Bold),
            RowStyle::Highlight => (Some(theme::BG_LIGHT), theme::PRIMARY, Font::Bold),
            RowStyle::Total => (Some(theme::SECONDARY), theme::WHITE, Font::Bold),
            RowStyle::Normal if i % 2 == 1 => (Some(theme::BG_LIGHT), theme::TERTIARY, Font::Regular),
            RowStyle::Normal => (None, theme::TERTIARY, Font::Regular),
        };

        if let Some(color) = background {
            canvas.fill_rect(x, y - row_height, total_width, row_height, color);
        }
        canvas.set_fill(text_color);

        if row.style == RowStyle::Section {
            let title = row.cells.first().map(String::as_str).unwrap_or_default();
            canvas.text(x + 6.0, baseline(y), font, font_size, title);
        } else {
            draw_cells(
                canvas,
                x,
                baseline(y),
                columns,
                row.cells.iter().map(String::as_str),
                font,
                font_size,
            );
        }

        canvas.set_stroke(theme::LIGHTEST);
        canvas.set_line_width(0.3);
        canvas.line(x, y - row_height, x + total_width, y - row_height);
        y -= row_height;
    }

    y
}

fn draw_cells<'a>(
    canvas: &mut Canvas,
    x: f32,
    baseline: f32,
    columns: &[Column],
    cells: impl Iterator<Item = &'a str>,
    font: Font,
    size: f32,
) {
    let mut left = x;
    for (column, text) in columns.iter().zip(cells) {
        let anchor = match column.align {
            Align::Left => left + 6.0,
            Align::Center => left + column.width / 2.0,
            Align::Right => left + column.width - 6.0,
        };
        canvas.text_aligned(anchor, baseline, font, size, text, column.align);
        left += column.width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ceiling() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(7.0), 10.0);
        assert_eq!(nice_ceiling(1.0), 1.0);
        assert_eq!(nice_ceiling(180.0), 200.0);
        assert_eq!(nice_ceiling(2_100_000.0), 2_500_000.0);
        assert_eq!(nice_ceiling(4_600.0), 5_000.0);
    }

    #[test]
    fn test_scale_maps_values() {
        let area = Area::new(0.0, 100.0, 200.0, 100.0);
        let scale = Scale::new(0.0, 50.0);
        assert_eq!(scale.y(&area, 0.0), 100.0);
        assert_eq!(scale.y(&area, 50.0), 200.0);
        assert_eq!(scale.y(&area, 25.0), 150.0);
        assert_eq!(scale.y(&area, 80.0), 200.0);
    }

    #[test]
    fn test_scale_for_values_includes_negatives() {
        let scale = Scale::for_values(&[-40.0, 90.0]);
        assert_eq!(scale.max, 100.0);
        assert_eq!(scale.min, -50.0);

        let empty = Scale::for_values(Vec::<f64>::new().iter());
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(0.0, 100.0, 4), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(ticks(-1.0, 1.0, 2), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_table_returns_bottom_edge() {
        let mut canvas = Canvas::new(500.0, 500.0);
        let columns = vec![
            Column::new("Item", 100.0, Align::Left),
            Column::new("21/22", 60.0, Align::Right),
        ];
        let rows = vec![
            Row::section("RECEITAS"),
            Row::new(vec!["Soja".into(), "1.2M".into()], RowStyle::Normal),
            Row::new(vec!["Total".into(), "1.2M".into()], RowStyle::Total),
        ];
        let bottom = table(&mut canvas, 10.0, 400.0, &columns, &rows, 16.0);
        assert_eq!(bottom, 400.0 - 16.0 * 4.0);
    }

    #[test]
    fn test_legend_height() {
        let mut canvas = Canvas::new(500.0, 500.0);
        assert_eq!(legend(&mut canvas, 0.0, 100.0, 400.0, &[]), 0.0);
        let items = vec![("Soja".to_string(), theme::series_color(0))];
        assert_eq!(legend(&mut canvas, 0.0, 100.0, 400.0, &items), 14.0);
    }
}
