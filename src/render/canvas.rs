//! A page of vector drawing operations, in PDF user space (points, origin
//! at the bottom-left corner).

use crate::render::fonts::{self, Font};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Mixes towards white; `amount` 0 keeps the color, 1 gives white.
    pub fn lighten(self, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }

    fn operands(self) -> Vec<Object> {
        vec![
            num(self.r as f32 / 255.0),
            num(self.g as f32 / 255.0),
            num(self.b as f32 / 255.0),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

impl Paint {
    fn operator(self) -> &'static str {
        match self {
            Paint::Fill => "f",
            Paint::Stroke => "S",
            Paint::FillStroke => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub struct Canvas {
    pub width: f32,
    pub height: f32,
    operations: Vec<Operation>,
}

fn num(value: f32) -> Object {
    Object::Real(value)
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            operations: Vec::new(),
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_content(self) -> Content {
        Content {
            operations: self.operations,
        }
    }

    pub fn save(&mut self) {
        self.op("q", vec![]);
    }

    pub fn restore(&mut self) {
        self.op("Q", vec![]);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.op(
            "cm",
            vec![num(1.0), num(0.0), num(0.0), num(1.0), num(dx), num(dy)],
        );
    }

    pub fn rotate(&mut self, degrees: f32) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.op(
            "cm",
            vec![num(cos), num(sin), num(-sin), num(cos), num(0.0), num(0.0)],
        );
    }

    pub fn set_fill(&mut self, color: Color) {
        self.op("rg", color.operands());
    }

    pub fn set_stroke(&mut self, color: Color) {
        self.op("RG", color.operands());
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.op("w", vec![num(width)]);
    }

    pub fn set_dash(&mut self, on: f32, off: f32) {
        self.op("d", vec![Object::Array(vec![num(on), num(off)]), num(0.0)]);
    }

    pub fn clear_dash(&mut self) {
        self.op("d", vec![Object::Array(vec![]), num(0.0)]);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.op("re", vec![num(x), num(y), num(w), num(h)]);
        self.op(paint.operator(), vec![]);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.set_fill(color);
        self.rect(x, y, w, h, Paint::Fill);
    }

    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, paint: Paint) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        // Bezier handle length for a quarter circle.
        let k = r * 0.552_284_8;

        self.move_to(x + r, y);
        self.line_to(x + w - r, y);
        self.curve_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
        self.line_to(x + w, y + h - r);
        self.curve_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
        self.line_to(x + r, y + h);
        self.curve_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
        self.line_to(x, y + r);
        self.curve_to(x, y + r - k, x + r - k, y, x + r, y);
        self.op("h", vec![]);
        self.op(paint.operator(), vec![]);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.op("m", vec![num(x), num(y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.op("l", vec![num(x), num(y)]);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.op(
            "c",
            vec![num(x1), num(y1), num(x2), num(y2), num(x3), num(y3)],
        );
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.op("S", vec![]);
    }

    pub fn polyline(&mut self, points: &[(f32, f32)]) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.move_to(x0, y0);
        for &(x, y) in rest {
            self.line_to(x, y);
        }
        self.op("S", vec![]);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: Paint) {
        let k = r * 0.552_284_8;
        self.move_to(cx + r, cy);
        self.curve_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.curve_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.curve_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.curve_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self.op("h", vec![]);
        self.op(paint.operator(), vec![]);
    }

    /// Pie slice from `start` sweeping `sweep` degrees counter-clockwise
    /// (0° points right).
    pub fn wedge(&mut self, cx: f32, cy: f32, r: f32, start: f32, sweep: f32, paint: Paint) {
        if sweep.abs() < 1e-3 || r <= 0.0 {
            return;
        }
        if sweep.abs() >= 359.99 {
            self.circle(cx, cy, r, paint);
            return;
        }

        self.move_to(cx, cy);
        let start_rad = start.to_radians();
        self.line_to(cx + r * start_rad.cos(), cy + r * start_rad.sin());

        let segments = (sweep.abs() / 90.0).ceil().max(1.0) as usize;
        let step = sweep.to_radians() / segments as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan() * r;

        let mut angle = start_rad;
        for _ in 0..segments {
            let next = angle + step;
            let (s0, c0) = angle.sin_cos();
            let (s1, c1) = next.sin_cos();
            self.curve_to(
                cx + r * c0 - k * s0,
                cy + r * s0 + k * c0,
                cx + r * c1 + k * s1,
                cy + r * s1 - k * c1,
                cx + r * c1,
                cy + r * s1,
            );
            angle = next;
        }

        self.op("h", vec![]);
        self.op(paint.operator(), vec![]);
    }

    /// Ring of slices; `values` are drawn clockwise from 12 o'clock.
    pub fn donut(
        &mut self,
        cx: f32,
        cy: f32,
        outer: f32,
        inner: f32,
        values: &[(f64, Color)],
        hole: Color,
    ) {
        let total: f64 = values.iter().map(|(v, _)| v.max(0.0)).sum();
        if total <= 0.0 {
            return;
        }

        let mut start = 90.0_f32;
        for (value, color) in values {
            let sweep = (value.max(0.0) / total * 360.0) as f32;
            self.set_fill(*color);
            self.wedge(cx, cy, outer, start, -sweep, Paint::Fill);
            start -= sweep;
        }

        self.set_fill(hole);
        self.circle(cx, cy, inner, Paint::Fill);
    }

    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.op("BT", vec![]);
        self.op("Tf", vec![font.resource_name().into(), num(size)]);
        self.op("Td", vec![num(x), num(y)]);
        self.op(
            "Tj",
            vec![Object::String(
                fonts::encode_win_ansi(text),
                StringFormat::Hexadecimal,
            )],
        );
        self.op("ET", vec![]);
    }

    pub fn text_aligned(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str, align: Align) {
        let width = fonts::string_width(text, font, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.text(left, y, font, size, text);
    }

    pub fn text_right(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.text_aligned(x, y, font, size, text, Align::Right);
    }

    pub fn text_centred(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        self.text_aligned(x, y, font, size, text, Align::Center);
    }

    /// Text rotated about its starting point.
    pub fn text_rotated(&mut self, x: f32, y: f32, degrees: f32, font: Font, size: f32, text: &str) {
        self.save();
        self.translate(x, y);
        self.rotate(degrees);
        self.text(0.0, 0.0, font, size, text);
        self.restore();
    }

    pub fn string_width(&self, text: &str, font: Font, size: f32) -> f32 {
        fonts::string_width(text, font, size)
    }
}
