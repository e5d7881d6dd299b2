//! `CanvasRenderingContext2d` drawing surface
use std::f64::consts::PI;

use pinhole_core::{palette, Color, DrawSurface, ScreenPoint};
use pinhole_core::surface::POLYGON_STROKE_WIDTH;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const LABEL_FONT: &str = "13px IBM Plex Sans";

/// Smallest backing size in CSS pixels
const MIN_CSS_SIZE: f64 = 2.0;

/// Backing-store layout for one repaint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backing {
    /// Logical size in CSS pixels
    pub css_width: u32,
    pub css_height: u32,
    pub pixel_ratio: f64,
}

impl Backing {
    /// Size the backing store from the container's CSS box and the device
    /// pixel ratio. The ratio is floored and held to `[1, 2]`.
    pub fn from_css(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.floor().clamp(1.0, 2.0)
        } else {
            1.0
        };
        Self {
            css_width: css_width.floor().max(MIN_CSS_SIZE) as u32,
            css_height: css_height.floor().max(MIN_CSS_SIZE) as u32,
            pixel_ratio: ratio,
        }
    }

    /// Size of the pixel buffer
    pub fn device_size(&self) -> (u32, u32) {
        (
            (f64::from(self.css_width) * self.pixel_ratio) as u32,
            (f64::from(self.css_height) * self.pixel_ratio) as u32,
        )
    }
}

/// Draws scenes onto a 2D canvas context in CSS pixel coordinates
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
        })
    }

    /// Match the backing store to the container size before a repaint
    pub fn fit_to_container(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let rect = match self.canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => self.canvas.get_bounding_client_rect(),
        };
        let backing = Backing::from_css(rect.width(), rect.height(), window.device_pixel_ratio());
        let (device_width, device_height) = backing.device_size();

        self.canvas.set_width(device_width);
        self.canvas.set_height(device_height);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", backing.css_width))?;
        style.set_property("height", &format!("{}px", backing.css_height))?;

        let ratio = backing.pixel_ratio;
        self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)?;
        self.width = f64::from(backing.css_width);
        self.height = f64::from(backing.css_height);
        Ok(())
    }

    fn trace_path(&self, points: &[ScreenPoint]) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
    }
}

impl DrawSurface for CanvasSurface {
    type Error = JsValue;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn draw_line(&mut self, from: &ScreenPoint, to: &ScreenPoint, color: Color, width: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        Ok(())
    }

    fn draw_point(&mut self, at: &ScreenPoint, color: Color, radius: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI)?;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], stroke: Option<Color>, fill: Option<Color>) -> Result<(), JsValue> {
        if points.is_empty() {
            return Ok(());
        }
        self.trace_path(points);
        if let Some(fill) = fill {
            self.ctx.set_fill_style_str(&fill.to_css());
            self.ctx.fill();
        }
        if let Some(stroke) = stroke {
            self.ctx.set_stroke_style_str(&stroke.to_css());
            self.ctx.set_line_width(POLYGON_STROKE_WIDTH);
            self.ctx.stroke();
        }
        Ok(())
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64, color: Option<Color>) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(&color.unwrap_or(palette::LABEL).to_css());
        self.ctx.set_font(LABEL_FONT);
        self.ctx.fill_text(text, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_floors_and_clamps_ratio() {
        let backing = Backing::from_css(640.7, 359.2, 2.6);
        assert_eq!(backing.css_width, 640);
        assert_eq!(backing.css_height, 359);
        assert_eq!(backing.pixel_ratio, 2.0);
        assert_eq!(backing.device_size(), (1280, 718));
    }

    #[test]
    fn test_backing_low_ratio() {
        let backing = Backing::from_css(300.0, 200.0, 0.75);
        assert_eq!(backing.pixel_ratio, 1.0);
        assert_eq!(Backing::from_css(300.0, 200.0, 1.5).pixel_ratio, 1.0);
        assert_eq!(Backing::from_css(300.0, 200.0, f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn test_backing_minimum_size() {
        let backing = Backing::from_css(0.0, -4.0, 1.0);
        assert_eq!((backing.css_width, backing.css_height), (2, 2));
    }
}
