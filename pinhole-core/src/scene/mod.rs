//! Scene renderers and the pieces they share
//!
//! Both scenes own a state record that the controller mutates, derive
//! their geometry fresh on every repaint, and draw through a
//! [`ViewProjector`] built from the shared [`ViewState`].

use serde::{Deserialize, Serialize};

use crate::math::{add3, clamp, map_slider, scale3, Vec3};
use crate::projection::{make_view_projector, ScreenPoint, ViewMode, ViewProjector};
use crate::surface::{palette, Color, DrawSurface};

pub mod extrinsic;
pub mod intrinsic;

pub use extrinsic::{ExtrinsicGeometry, ExtrinsicState};
pub use intrinsic::{IntrinsicGeometry, IntrinsicState};

/// Radians of orbit per dragged pixel
pub const DRAG_SENSITIVITY: f64 = 0.006;
pub const PITCH_LIMIT: f64 = 1.2;
pub const MIN_ZOOM: f64 = 0.55;
pub const MAX_ZOOM: f64 = 2.8;
const WHEEL_ZOOM_IN: f64 = 1.08;
const WHEEL_ZOOM_OUT: f64 = 0.92;

/// Caption position in pixels
const CAPTION_X: f64 = 16.0;
const CAPTION_Y: f64 = 24.0;

/// Orbit view the diagram is looked at through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub yaw: f64,
    pub pitch: f64,
    pub zoom: f64,
    pub mode: ViewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
            mode: ViewMode::Free3D,
        }
    }
}

impl ViewState {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch,
            ..Self::default()
        }
    }

    /// Apply a drag delta in pixels. Only the free view can be orbited.
    pub fn orbit(&mut self, dx: f64, dy: f64) -> bool {
        if !self.mode.is_free() {
            return false;
        }
        self.yaw += dx * DRAG_SENSITIVITY;
        self.pitch = clamp(self.pitch + dy * DRAG_SENSITIVITY, -PITCH_LIMIT, PITCH_LIMIT);
        true
    }

    /// Apply a wheel delta; negative scrolls zoom in.
    ///
    /// Returns `false` when the wheel is not consumed (plane modes).
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if !self.mode.is_free() {
            return false;
        }
        let factor = if delta_y < 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.zoom = clamp(self.zoom * factor, MIN_ZOOM, MAX_ZOOM);
        true
    }

    /// Pull pitch and zoom back inside the limits orbit and wheel keep
    pub fn limit(&mut self) {
        self.pitch = clamp(self.pitch, -PITCH_LIMIT, PITCH_LIMIT);
        self.zoom = clamp(self.zoom, MIN_ZOOM, MAX_ZOOM);
    }

    pub fn projector(&self, width: f64, height: f64, fit_points: &[Vec3]) -> ViewProjector {
        make_view_projector(width, height, self.mode, self.yaw, self.pitch, fit_points, self.zoom)
    }
}

/// A slider-controlled scene parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    /// Initial slider position in `[0, 1]`
    pub default_position: f64,
}

impl ParameterSpec {
    pub const fn new(name: &'static str, label: &'static str, min: f64, max: f64, default_position: f64) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default_position,
        }
    }

    /// Map a normalized slider position into this parameter's range
    pub fn value_at(&self, position: f64) -> f64 {
        map_slider(position, self.min, self.max)
    }
}

/// A diagram the controller can drive and repaint
pub trait Scene {
    /// Slider table, in widget order
    fn parameters(&self) -> &'static [ParameterSpec];

    /// Current value of the parameter at `index`
    fn parameter(&self, index: usize) -> Option<f64>;

    /// Store an already-mapped value. Out-of-range indices are ignored.
    fn set_parameter(&mut self, index: usize, value: f64);

    fn view(&self) -> &ViewState;

    fn view_mut(&mut self) -> &mut ViewState;

    /// Draw one frame. The caller clears the surface first.
    fn draw<S: DrawSurface>(&self, surface: &mut S) -> Result<(), S::Error>;
}

/// Rectangle around `center` spanned by `a` and `b`, corners in winding order
pub(crate) fn quad(center: &Vec3, a: &Vec3, b: &Vec3, half_a: f64, half_b: f64) -> [Vec3; 4] {
    let corner = |sa: f64, sb: f64| add3(&add3(center, &scale3(a, sa * half_a)), &scale3(b, sb * half_b));
    [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)]
}

/// Highlight the plane matching the selected mode, spanned by the given
/// right/up/forward basis. Nothing is drawn in the free view.
pub(crate) fn draw_plane_highlight<S: DrawSurface>(
    surface: &mut S,
    view: &ViewProjector,
    center: &Vec3,
    basis: [&Vec3; 3],
    size: f64,
) -> Result<(), S::Error> {
    let [right, up, forward] = basis;
    let (a, b, (stroke, fill)) = match view.mode() {
        ViewMode::Free3D => return Ok(()),
        ViewMode::PlaneXY => (right, up, palette::PLANE_XY),
        ViewMode::PlaneYZ => (forward, up, palette::PLANE_YZ),
        ViewMode::PlaneXZ => (right, forward, palette::PLANE_XZ),
    };
    let corners = view.project_all(&quad(center, a, b, size, size));
    surface.draw_polygon(&corners, Some(stroke), Some(fill))
}

/// Draw three axes from `origin` to `tips`, colored X/Y/Z
pub(crate) fn draw_axes<S: DrawSurface>(
    surface: &mut S,
    origin: &ScreenPoint,
    tips: &[ScreenPoint; 3],
    alpha: f64,
    width: f64,
) -> Result<(), S::Error> {
    let colors = [palette::AXIS_X, palette::AXIS_Y, palette::AXIS_Z];
    for (tip, color) in tips.iter().zip(colors) {
        surface.draw_line(origin, tip, color.with_alpha(alpha), width)?;
    }
    Ok(())
}

/// Label placed up and to the right of a marker
pub(crate) fn draw_marker_label<S: DrawSurface>(
    surface: &mut S,
    text: &str,
    at: &ScreenPoint,
    dy: f64,
    color: Option<Color>,
) -> Result<(), S::Error> {
    let (x, y) = at.offset(8.0, dy);
    surface.draw_label(text, x, y, color)
}

/// Caption naming the current view, drawn in the top-left corner
pub(crate) fn draw_caption<S: DrawSurface>(surface: &mut S, mode: ViewMode, plane_prefix: &str) -> Result<(), S::Error> {
    let text = match mode {
        ViewMode::Free3D => "3D view (mouse wheel to zoom)".to_owned(),
        ViewMode::PlaneXY => format!("{plane_prefix}XY plane view"),
        ViewMode::PlaneYZ => format!("{plane_prefix}YZ plane view"),
        ViewMode::PlaneXZ => format!("{plane_prefix}XZ plane view"),
    };
    surface.draw_label(&text, CAPTION_X, CAPTION_Y, Some(palette::LABEL))
}
