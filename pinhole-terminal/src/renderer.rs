//! ASCII drawing surface for terminal rendering
use std::convert::Infallible;
use std::io::Write;

use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use pinhole_core::{Color, DrawSurface, ScreenPoint};

/// Fill characters for translucent areas (faintest to densest)
const FILL_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as wide, so every row covers
/// two logical pixels.
const ROW_HEIGHT: f64 = 2.0;

/// Lowest alpha a color is blended with before reaching the terminal
const MIN_VISIBLE_ALPHA: f64 = 0.45;

/// Character + color buffer the scenes draw into
pub struct AsciiSurface {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<TermColor>,
}

impl AsciiSurface {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![TermColor::Reset; size],
        }
    }

    /// Resize the buffers to a new terminal size, clearing them
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        if column < self.width && row < self.height {
            Some(self.char_buffer[row * self.width + column])
        } else {
            None
        }
    }

    /// One buffer row as a string
    pub fn row_text(&self, row: usize) -> String {
        self.char_buffer[row * self.width..(row + 1) * self.width].iter().collect()
    }

    fn to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let column = x.floor();
        let row = (y / ROW_HEIGHT).floor();
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.width && row < self.height).then_some((column, row))
    }

    fn plot(&mut self, x: f64, y: f64, character: char, color: Color) {
        if let Some((column, row)) = self.to_cell(x, y) {
            let idx = row * self.width + column;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = term_color(color);
        }
    }

    /// Fill one triangle using barycentric inside tests over its cell bounding box
    fn fill_triangle(&mut self, v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), character: char, color: Color) {
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0);
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0);
        let min_row = (v0.1.min(v1.1).min(v2.1) / ROW_HEIGHT).floor().max(0.0);
        let max_row = (v0.1.max(v1.1).max(v2.1) / ROW_HEIGHT).ceil().min(self.height as f64 - 1.0);
        if !(min_x <= max_x && min_row <= max_row) {
            return;
        }

        for row in min_row as usize..=max_row as usize {
            for column in min_x as usize..=max_x as usize {
                let px = column as f64 + 0.5;
                let py = (row as f64 + 0.5) * ROW_HEIGHT;
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, (px, py)) {
                    let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                    if inside {
                        self.plot(px, py, character, color);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for AsciiSurface {
    type Error = Infallible;

    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64 * ROW_HEIGHT)
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(TermColor::Reset);
        Ok(())
    }

    fn draw_line(&mut self, from: &ScreenPoint, to: &ScreenPoint, color: Color, _width: f64) -> Result<(), Infallible> {
        let character = line_char(to.x - from.x, (to.y - from.y) / ROW_HEIGHT);
        let (width, height) = self.size();
        let Some(((x0, y0), (x1, y1))) = clip_segment((from.x, from.y), (to.x, to.y), width, height) else {
            return Ok(());
        };
        let (dx, dy) = (x1 - x0, y1 - y0);
        // step once per cell along the longer axis
        let steps = dx.abs().max(dy.abs() / ROW_HEIGHT).ceil().max(1.0);
        for i in 0..=steps as usize {
            let t = i as f64 / steps;
            self.plot(x0 + dx * t, y0 + dy * t, character, color);
        }
        Ok(())
    }

    fn draw_point(&mut self, at: &ScreenPoint, color: Color, radius: f64) -> Result<(), Infallible> {
        // markers are a few pixels wide; anything wider than a cell gets a ring of 'o'
        let reach = (radius / 4.0).floor();
        if reach >= 1.0 {
            self.plot(at.x - reach, at.y, 'o', color);
            self.plot(at.x + reach, at.y, 'o', color);
        }
        self.plot(at.x, at.y, '@', color);
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], stroke: Option<Color>, fill: Option<Color>) -> Result<(), Infallible> {
        if points.is_empty() {
            return Ok(());
        }
        if let Some(fill) = fill {
            let character = fill_char(fill.a);
            let anchor = (points[0].x, points[0].y);
            for pair in points[1..].windows(2) {
                self.fill_triangle(anchor, (pair[0].x, pair[0].y), (pair[1].x, pair[1].y), character, fill);
            }
        }
        if let Some(stroke) = stroke {
            for (i, from) in points.iter().enumerate() {
                let to = &points[(i + 1) % points.len()];
                self.draw_line(from, to, stroke, 1.0)?;
            }
        }
        Ok(())
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64, color: Option<Color>) -> Result<(), Infallible> {
        let color = color.unwrap_or(pinhole_core::palette::LABEL);
        for (i, character) in text.chars().enumerate() {
            self.plot(x + i as f64, y, character, color);
        }
        Ok(())
    }
}

/// Pick a stroke character matching the direction of a line in cell units
fn line_char(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.4 {
        '-'
    } else if ax <= ay * 0.4 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        // y grows downward on screen
        '\\'
    } else {
        '/'
    }
}

/// Liang-Barsky clip of a segment to `[0, width] x [0, height]`.
///
/// Returns `None` when the segment misses the box or is not finite.
fn clip_segment(from: (f64, f64), to: (f64, f64), width: f64, height: f64) -> Option<((f64, f64), (f64, f64))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let edges = [
        (-dx, from.0),
        (dx, width - from.0),
        (-dy, from.1),
        (dy, height - from.1),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

fn fill_char(alpha: f64) -> char {
    let index = (alpha * FILL_RAMP.len() as f64) as usize;
    FILL_RAMP[index.min(FILL_RAMP.len() - 1)]
}

/// Blend translucent colors toward black so faint strokes stay visible
fn term_color(color: Color) -> TermColor {
    let a = color.a.clamp(MIN_VISIBLE_ALPHA, 1.0);
    let blend = |c: u8| (f64::from(c) * a).round() as u8;
    TermColor::Rgb {
        r: blend(color.r),
        g: blend(color.g),
        b: blend(color.b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), p: (f64, f64)) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinhole_core::palette;

    fn pt(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x, y, 0.0)
    }

    #[test]
    fn test_logical_size_doubles_rows() {
        let surface = AsciiSurface::new(80, 24);
        assert_eq!(surface.size(), (80.0, 48.0));
    }

    #[test]
    fn test_horizontal_line() {
        let mut surface = AsciiSurface::new(20, 5);
        surface.draw_line(&pt(2.0, 4.0), &pt(10.0, 4.0), palette::AXIS_X, 1.0).unwrap();
        assert_eq!(surface.row_text(2), "  ---------         ");
    }

    #[test]
    fn test_vertical_and_diagonal_chars() {
        assert_eq!(line_char(0.0, 5.0), '|');
        assert_eq!(line_char(3.0, 3.0), '\\');
        assert_eq!(line_char(3.0, -3.0), '/');
        assert_eq!(line_char(-4.0, 0.5), '-');
    }

    #[test]
    fn test_offscreen_drawing_is_clipped() {
        let mut surface = AsciiSurface::new(10, 4);
        surface.draw_line(&pt(-50.0, -50.0), &pt(50.0, 50.0), palette::GUIDE, 1.0).unwrap();
        surface.draw_point(&pt(500.0, 3.0), palette::POINT, 5.0).unwrap();
        surface.draw_label("far away", 9.0, 100.0, None).unwrap();
        assert_eq!(surface.cell(0, 0), Some('\\'));
    }

    #[test]
    fn test_far_endpoint_is_clipped() {
        let mut surface = AsciiSurface::new(80, 24);
        surface.draw_line(&pt(10.0, 10.0), &pt(3e9, 10.0), palette::AXIS_X, 1.0).unwrap();
        assert_eq!(surface.row_text(5), format!("{}{}", " ".repeat(10), "-".repeat(70)));

        surface.clear().unwrap();
        surface.draw_line(&pt(-1e12, -4e11), &pt(1e12, 4e11), palette::GUIDE, 1.0).unwrap();
        let text: String = (0..24).map(|row| surface.row_text(row)).collect();
        assert!(text.chars().filter(|c| *c == '-').count() >= 79);
    }

    #[test]
    fn test_clip_segment() {
        assert_eq!(clip_segment((-5.0, 2.0), (15.0, 2.0), 10.0, 4.0), Some(((0.0, 2.0), (10.0, 2.0))));
        assert_eq!(clip_segment((1.0, 1.0), (3.0, 2.0), 10.0, 4.0), Some(((1.0, 1.0), (3.0, 2.0))));
        assert_eq!(clip_segment((-5.0, -1.0), (20.0, -1.0), 10.0, 4.0), None);
        assert_eq!(clip_segment((12.0, 0.0), (20.0, 3.0), 10.0, 4.0), None);
        assert_eq!(clip_segment((f64::NAN, 0.0), (5.0, 5.0), 10.0, 4.0), None);
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut surface = AsciiSurface::new(10, 4);
        surface.draw_line(&pt(f64::NAN, 0.0), &pt(5.0, 5.0), palette::GUIDE, 1.0).unwrap();
        surface.draw_point(&pt(f64::INFINITY, 1.0), palette::POINT, 4.0).unwrap();
    }

    #[test]
    fn test_label_writes_text() {
        let mut surface = AsciiSurface::new(20, 4);
        surface.draw_label("Camera C", 3.0, 2.5, None).unwrap();
        assert_eq!(surface.row_text(1), "   Camera C         ");
    }

    #[test]
    fn test_polygon_fills_interior() {
        let mut surface = AsciiSurface::new(20, 10);
        let square = [pt(2.0, 2.0), pt(12.0, 2.0), pt(12.0, 14.0), pt(2.0, 14.0)];
        surface
            .draw_polygon(&square, Some(palette::IMAGE_PLANE_STROKE), Some(palette::IMAGE_PLANE_FILL))
            .unwrap();
        assert_eq!(surface.cell(6, 4), Some(fill_char(0.10)));
        assert_eq!(surface.cell(6, 1), Some('-'));
        assert_eq!(surface.cell(18, 4), Some(' '));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut surface = AsciiSurface::new(10, 4);
        surface.draw_point(&pt(3.0, 3.0), palette::CAMERA, 4.0).unwrap();
        assert_eq!(surface.cell(3, 1), Some('@'));
        surface.clear().unwrap();
        assert_eq!(surface.cell(3, 1), Some(' '));
    }

    #[test]
    fn test_translucent_colors_stay_visible() {
        assert_eq!(term_color(palette::AXIS_X), TermColor::Rgb { r: 0xEC, g: 0x51, b: 0x51 });
        match term_color(palette::IMAGE_PLANE_FILL) {
            TermColor::Rgb { b, .. } => assert!(b > 80),
            other => panic!("unexpected {other:?}"),
        }
    }
}
