//! Drawing-surface capability the scenes render through
use std::convert::Infallible;
use std::fmt;

use crate::projection::ScreenPoint;

/// Stroke width used for polygon outlines
pub const POLYGON_STROKE_WIDTH: f64 = 1.5;

/// An sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same hue with a different alpha
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// CSS color string (`#RRGGBB` when opaque, `rgba(...)` otherwise)
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Named colors shared by both scenes
pub mod palette {
    use super::Color;

    pub const AXIS_X: Color = Color::rgb(0xEC, 0x51, 0x51);
    pub const AXIS_Y: Color = Color::rgb(0x55, 0xC4, 0x32);
    pub const AXIS_Z: Color = Color::rgb(0x41, 0x8D, 0xE2);

    pub const CAMERA: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const POINT: Color = Color::rgb(0xFF, 0x59, 0x3F);
    pub const PROJECTION: Color = Color::rgb(0x21, 0x82, 0xC7);
    pub const WORLD_ORIGIN: Color = Color::rgb(0x66, 0x66, 0x66);

    pub const RAY_TO_POINT: Color = Color::rgba(255, 89, 63, 0.85);
    pub const IMAGE_PLANE_STROKE: Color = Color::rgba(33, 130, 199, 0.7);
    pub const IMAGE_PLANE_FILL: Color = Color::rgba(33, 130, 199, 0.10);
    pub const GUIDE: Color = Color::rgba(0, 0, 0, 0.3);

    pub const LABEL: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const LABEL_POINT: Color = Color::rgb(0xC4, 0x47, 0x32);
    pub const LABEL_PROJECTION: Color = Color::rgb(0x1E, 0x6F, 0xA8);
    pub const LABEL_MUTED: Color = Color::rgb(0x55, 0x55, 0x55);

    /// Highlight (stroke, fill) for the XY plane
    pub const PLANE_XY: (Color, Color) = (Color::rgba(236, 81, 81, 0.45), Color::rgba(236, 81, 81, 0.10));
    pub const PLANE_YZ: (Color, Color) = (Color::rgba(85, 196, 50, 0.45), Color::rgba(85, 196, 50, 0.10));
    pub const PLANE_XZ: (Color, Color) = (Color::rgba(245, 166, 35, 0.55), Color::rgba(245, 166, 35, 0.14));
}

/// A 2D target the scenes draw onto, in pixel coordinates.
///
/// Implemented by the browser canvas and the terminal rasterizer. Every
/// call may fail with the surface's own error type.
pub trait DrawSurface {
    type Error;

    /// Logical size in pixels
    fn size(&self) -> (f64, f64);

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn draw_line(
        &mut self,
        from: &ScreenPoint,
        to: &ScreenPoint,
        color: Color,
        width: f64,
    ) -> Result<(), Self::Error>;

    fn draw_point(&mut self, at: &ScreenPoint, color: Color, radius: f64) -> Result<(), Self::Error>;

    /// Closed polygon. Implementations draw nothing for an empty slice.
    fn draw_polygon(
        &mut self,
        points: &[ScreenPoint],
        stroke: Option<Color>,
        fill: Option<Color>,
    ) -> Result<(), Self::Error>;

    fn draw_label(&mut self, text: &str, x: f64, y: f64, color: Option<Color>) -> Result<(), Self::Error>;
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
        width: f64,
    },
    Point {
        at: ScreenPoint,
        color: Color,
        radius: f64,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        stroke: Option<Color>,
        fill: Option<Color>,
    },
    Label {
        text: String,
        x: f64,
        y: f64,
        color: Option<Color>,
    },
}

/// Surface that keeps a display list instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Texts of all recorded labels, in draw order
    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of the label with the given text
    pub fn label_position(&self, wanted: &str) -> Option<(f64, f64)> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Label { text, x, y, .. } if text == wanted => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn polygons(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    type Error = Infallible;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn draw_line(&mut self, from: &ScreenPoint, to: &ScreenPoint, color: Color, width: f64) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Line {
            from: *from,
            to: *to,
            color,
            width,
        });
        Ok(())
    }

    fn draw_point(&mut self, at: &ScreenPoint, color: Color, radius: f64) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Point { at: *at, color, radius });
        Ok(())
    }

    fn draw_polygon(
        &mut self,
        points: &[ScreenPoint],
        stroke: Option<Color>,
        fill: Option<Color>,
    ) -> Result<(), Infallible> {
        if points.is_empty() {
            return Ok(());
        }
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            stroke,
            fill,
        });
        Ok(())
    }

    fn draw_label(&mut self, text: &str, x: f64, y: f64, color: Option<Color>) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Label {
            text: text.to_owned(),
            x,
            y,
            color,
        });
        Ok(())
    }
}
