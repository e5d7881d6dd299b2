//! View projector construction for the external diagram view
use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{rotate_world_to_view, vec3, Vec3};

/// Distance added to view-space z so the scene sits in front of the virtual lens
const FREE_LENS_OFFSET: f64 = 7.0;
/// Fraction of `min(width, height)` covered by one unit at depth 1 and zoom 1
const FREE_SCALE: f64 = 0.65;
/// Screen origin as a fraction of the viewport, shared by both paths
const ORIGIN_X: f64 = 0.5;
const ORIGIN_Y: f64 = 0.56;
/// Share of the viewport the fitted bounding box may occupy
pub const FIT_WIDTH: f64 = 0.82;
pub const FIT_HEIGHT: f64 = 0.74;
/// Lower bound for each bounding-box span
const MIN_SPAN: f64 = 0.9;

/// Projection mode selected by the segmented control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Perspective view following the live orbit angles
    #[default]
    Free3D,
    PlaneXY,
    PlaneYZ,
    PlaneXZ,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Free3D,
        ViewMode::PlaneXY,
        ViewMode::PlaneYZ,
        ViewMode::PlaneXZ,
    ];

    /// Labels shown on the segmented control, in option order
    pub const OPTION_LABELS: [&'static str; 4] = ["Image", "XY", "YZ", "XZ"];

    /// Resolve a segmented-control option index
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::ViewModeIndex(index))
    }

    pub fn index(self) -> usize {
        match self {
            ViewMode::Free3D => 0,
            ViewMode::PlaneXY => 1,
            ViewMode::PlaneYZ => 2,
            ViewMode::PlaneXZ => 3,
        }
    }

    pub fn is_free(self) -> bool {
        self == ViewMode::Free3D
    }

    /// Effective (yaw, pitch) for this mode. Plane modes ignore the live angles.
    pub fn view_angles(self, yaw: f64, pitch: f64) -> (f64, f64) {
        match self {
            ViewMode::Free3D => (yaw, pitch),
            ViewMode::PlaneXY => (0.0, 0.0),
            ViewMode::PlaneYZ => (-FRAC_PI_2, 0.0),
            ViewMode::PlaneXZ => (0.0, -FRAC_PI_2),
        }
    }
}

/// A projected point in pixel coordinates, y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// View-space depth; informational only, never used for occlusion
    pub depth: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64, depth: f64) -> Self {
        Self { x, y, depth }
    }

    /// Offset in pixels, handy for label placement
    pub fn offset(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy)]
enum Mapping {
    Perspective {
        zoom: f64,
    },
    Orthographic {
        center_x: f64,
        center_y: f64,
        scale: f64,
    },
}

/// Maps world points to the screen for one frame.
///
/// Built by [`make_view_projector`] from the current scene state and
/// discarded after the repaint.
#[derive(Debug, Clone, Copy)]
pub struct ViewProjector {
    width: f64,
    height: f64,
    mode: ViewMode,
    yaw: f64,
    pitch: f64,
    mapping: Mapping,
}

/// Build the projector for a viewport.
///
/// In [`ViewMode::Free3D`] the result is a perspective projection driven by
/// `yaw`, `pitch` and `zoom`. In the plane modes the fixed angle pair is
/// used and `fit_points` are laid out orthographically so that their
/// bounding box fills the viewport; `zoom` is ignored there.
pub fn make_view_projector(
    width: f64,
    height: f64,
    mode: ViewMode,
    yaw: f64,
    pitch: f64,
    fit_points: &[Vec3],
    zoom: f64,
) -> ViewProjector {
    let (yaw, pitch) = mode.view_angles(yaw, pitch);

    let mapping = match mode {
        ViewMode::Free3D => Mapping::Perspective { zoom },
        ViewMode::PlaneXY | ViewMode::PlaneYZ | ViewMode::PlaneXZ => {
            fit_orthographic(width, height, yaw, pitch, fit_points)
        }
    };

    ViewProjector {
        width,
        height,
        mode,
        yaw,
        pitch,
        mapping,
    }
}

fn fit_orthographic(width: f64, height: f64, yaw: f64, pitch: f64, fit_points: &[Vec3]) -> Mapping {
    let mut rotated: Vec<Vec3> = fit_points
        .iter()
        .map(|p| rotate_world_to_view(p, yaw, pitch))
        .collect();

    if rotated.is_empty() {
        rotated = vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(-1.0, -1.0, 0.0)];
    }

    let (mut min_x, mut max_x) = (rotated[0].x, rotated[0].x);
    let (mut min_y, mut max_y) = (rotated[0].y, rotated[0].y);
    for r in &rotated[1..] {
        min_x = min_x.min(r.x);
        max_x = max_x.max(r.x);
        min_y = min_y.min(r.y);
        max_y = max_y.max(r.y);
    }

    let span_x = (max_x - min_x).max(MIN_SPAN);
    let span_y = (max_y - min_y).max(MIN_SPAN);
    let avail_w = width * FIT_WIDTH;
    let avail_h = height * FIT_HEIGHT;

    Mapping::Orthographic {
        center_x: (min_x + max_x) * 0.5,
        center_y: (min_y + max_y) * 0.5,
        scale: (avail_w / span_x).min(avail_h / span_y),
    }
}

impl ViewProjector {
    /// Project a world point to pixel coordinates
    pub fn project(&self, p: &Vec3) -> ScreenPoint {
        let r = rotate_world_to_view(p, self.yaw, self.pitch);
        let (ox, oy) = self.origin();
        match self.mapping {
            Mapping::Perspective { zoom } => {
                let depth = r.z + FREE_LENS_OFFSET;
                let scale = self.width.min(self.height) * FREE_SCALE * zoom / depth;
                ScreenPoint::new(ox + r.x * scale, oy - r.y * scale, depth)
            }
            Mapping::Orthographic {
                center_x,
                center_y,
                scale,
            } => ScreenPoint::new(
                ox + (r.x - center_x) * scale,
                oy - (r.y - center_y) * scale,
                r.z,
            ),
        }
    }

    pub fn project_all(&self, points: &[Vec3]) -> Vec<ScreenPoint> {
        points.iter().map(|p| self.project(p)).collect()
    }

    /// Pixels per world unit applied to `p`. Constant in the plane modes.
    pub fn scale_at(&self, p: &Vec3) -> f64 {
        match self.mapping {
            Mapping::Perspective { zoom } => {
                let depth = rotate_world_to_view(p, self.yaw, self.pitch).z + FREE_LENS_OFFSET;
                self.width.min(self.height) * FREE_SCALE * zoom / depth
            }
            Mapping::Orthographic { scale, .. } => scale,
        }
    }

    /// Pixel position of the view origin
    pub fn origin(&self) -> (f64, f64) {
        (self.width * ORIGIN_X, self.height * ORIGIN_Y)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Effective (yaw, pitch) after mode resolution
    pub fn angles(&self) -> (f64, f64) {
        (self.yaw, self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn sample_points() -> Vec<Vec3> {
        vec![
            vec3(0.0, 0.0, 0.0),
            vec3(0.8, 0.5, 2.6),
            vec3(-1.3, -0.9, 1.2),
            vec3(1.3, 0.9, 1.2),
            vec3(1.4, 0.0, 0.0),
            vec3(0.0, 1.4, 0.0),
            vec3(0.0, 0.0, 1.4),
        ]
    }

    #[test]
    fn test_mode_from_index() {
        assert_eq!(ViewMode::from_index(0).unwrap(), ViewMode::Free3D);
        assert_eq!(ViewMode::from_index(3).unwrap(), ViewMode::PlaneXZ);
        assert!(matches!(ViewMode::from_index(4), Err(Error::ViewModeIndex(4))));
        for mode in ViewMode::ALL {
            assert_eq!(ViewMode::from_index(mode.index()).unwrap(), mode);
        }
    }

    #[test]
    fn test_plane_xy_ignores_live_angles() {
        let projector = make_view_projector(W, H, ViewMode::PlaneXY, 1.1, -0.9, &sample_points(), 1.0);
        assert_eq!(projector.angles(), (0.0, 0.0));
        assert_eq!(ViewMode::PlaneYZ.view_angles(0.3, 0.3), (-FRAC_PI_2, 0.0));
        assert_eq!(ViewMode::PlaneXZ.view_angles(0.3, 0.3), (0.0, -FRAC_PI_2));
        assert_eq!(ViewMode::Free3D.view_angles(0.3, -0.2), (0.3, -0.2));
    }

    #[test]
    fn test_free_zoom_doubles_offsets() {
        let p = vec3(0.7, -0.4, 1.9);
        let a = make_view_projector(W, H, ViewMode::Free3D, -0.6, 0.45, &[], 1.0);
        let b = make_view_projector(W, H, ViewMode::Free3D, -0.6, 0.45, &[], 2.0);
        let (ox, oy) = a.origin();
        let pa = a.project(&p);
        let pb = b.project(&p);
        assert!(((pb.x - ox) - 2.0 * (pa.x - ox)).abs() < 1e-9);
        assert!(((oy - pb.y) - 2.0 * (oy - pa.y)).abs() < 1e-9);
        assert!((b.scale_at(&p) - 2.0 * a.scale_at(&p)).abs() < 1e-9);
        assert_eq!(pa.depth, pb.depth);
    }

    #[test]
    fn test_free_round_trip_recovers_view_xy() {
        let camera = vec3(-0.4, -0.2, 0.1);
        let (yaw, pitch) = (-0.55, 0.35);
        let projector = make_view_projector(W, H, ViewMode::Free3D, yaw, pitch, &[], 1.3);
        let s = projector.project(&camera);
        let (ox, oy) = projector.origin();
        let scale = W.min(H) * 0.65 * 1.3 / s.depth;
        let rotated = rotate_world_to_view(&camera, yaw, pitch);
        assert!(((s.x - ox) / scale - rotated.x).abs() < 1e-9);
        assert!(((oy - s.y) / scale - rotated.y).abs() < 1e-9);
        assert!((s.depth - 7.0 - rotated.z).abs() < 1e-9);
    }

    #[test]
    fn test_plane_fit_fills_constrained_axis() {
        let points = sample_points();
        for mode in [ViewMode::PlaneXY, ViewMode::PlaneYZ, ViewMode::PlaneXZ] {
            let projector = make_view_projector(W, H, mode, 0.2, 0.1, &points, 1.0);
            let screen = projector.project_all(&points);
            let min_x = screen.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
            let max_x = screen.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
            let min_y = screen.iter().map(|s| s.y).fold(f64::INFINITY, f64::min);
            let max_y = screen.iter().map(|s| s.y).fold(f64::NEG_INFINITY, f64::max);
            let (span_x, span_y) = (max_x - min_x, max_y - min_y);
            let (avail_w, avail_h) = (W * FIT_WIDTH, H * FIT_HEIGHT);
            assert!(span_x <= avail_w + 1e-6, "{mode:?} overflows width");
            assert!(span_y <= avail_h + 1e-6, "{mode:?} overflows height");
            assert!(
                (span_x - avail_w).abs() < 1e-6 || (span_y - avail_h).abs() < 1e-6,
                "{mode:?} fills neither axis"
            );
        }
    }

    #[test]
    fn test_plane_fit_is_centered() {
        let points = sample_points();
        let projector = make_view_projector(W, H, ViewMode::PlaneXY, 0.0, 0.0, &points, 1.0);
        let screen = projector.project_all(&points);
        let min_x = screen.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
        let max_x = screen.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
        assert!(((min_x + max_x) * 0.5 - W * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_plane_fit_ignores_zoom() {
        let points = sample_points();
        let a = make_view_projector(W, H, ViewMode::PlaneYZ, 0.0, 0.0, &points, 0.55);
        let b = make_view_projector(W, H, ViewMode::PlaneYZ, 0.0, 0.0, &points, 2.8);
        assert_eq!(a.project(&points[1]), b.project(&points[1]));
    }

    #[test]
    fn test_empty_fit_uses_fallback_triangle() {
        let projector = make_view_projector(W, H, ViewMode::PlaneXY, 0.0, 0.0, &[], 1.0);
        // fallback box spans 2 x 2 units around the origin
        let expected = (W * FIT_WIDTH / 2.0).min(H * FIT_HEIGHT / 2.0);
        assert!((projector.scale_at(&Vec3::zeros()) - expected).abs() < 1e-9);
        let origin = projector.project(&Vec3::zeros());
        assert!((origin.x - W * 0.5).abs() < 1e-9);
        assert!((origin.y - H * 0.56).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_fit_uses_minimum_span() {
        let p = vec3(0.3, 0.2, 0.0);
        let projector = make_view_projector(W, H, ViewMode::PlaneXY, 0.0, 0.0, &[p], 1.0);
        let expected = (W * FIT_WIDTH / 0.9).min(H * FIT_HEIGHT / 0.9);
        assert!((projector.scale_at(&p) - expected).abs() < 1e-9);
        let s = projector.project(&p);
        assert!(s.x.is_finite() && s.y.is_finite());
        assert!((s.x - W * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_plane_depth_is_view_z() {
        let projector = make_view_projector(W, H, ViewMode::PlaneXY, 0.0, 0.0, &sample_points(), 1.0);
        assert_eq!(projector.project(&vec3(0.1, 0.2, 1.7)).depth, 1.7);
    }
}
