//! Focal-length scene: a camera fixed at the origin looking down +Z
use serde::{Deserialize, Serialize};

use super::{draw_axes, draw_caption, draw_marker_label, draw_plane_highlight, quad, ParameterSpec, Scene, ViewState};
use crate::math::{vec3, Vec3};
use crate::surface::{palette, DrawSurface};

const PLANE_HALF_WIDTH: f64 = 1.3;
const PLANE_HALF_HEIGHT: f64 = 0.9;
const AXIS_LENGTH: f64 = 1.4;
const HIGHLIGHT_SIZE: f64 = 1.3;

const PARAMETERS: [ParameterSpec; 4] = [
    ParameterSpec::new("focal_length", "Focal length f", 0.5, 2.0, 0.47),
    ParameterSpec::new("point_x", "Point X", -1.2, 1.2, 0.83),
    ParameterSpec::new("point_y", "Point Y", -1.0, 1.0, 0.75),
    ParameterSpec::new("point_z", "Point Z", 1.2, 4.0, 0.5),
];

/// Slider-controlled state of the focal-length scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrinsicState {
    pub focal_length: f64,
    /// The imaged point. Its z stays within the slider range, so it is
    /// always in front of the camera.
    pub point: Vec3,
    pub view: ViewState,
}

impl Default for IntrinsicState {
    fn default() -> Self {
        Self {
            focal_length: 1.2,
            point: vec3(0.8, 0.5, 2.6),
            view: ViewState::new(-0.6, 0.45),
        }
    }
}

/// Everything derived from [`IntrinsicState`] for one frame
#[derive(Debug, Clone)]
pub struct IntrinsicGeometry {
    pub projected: Vec3,
    pub plane_corners: [Vec3; 4],
}

impl IntrinsicGeometry {
    pub fn compute(state: &IntrinsicState) -> Self {
        let f = state.focal_length;
        let p = &state.point;
        let projected = vec3(f * p.x / p.z, f * p.y / p.z, f);
        let plane_corners = quad(
            &vec3(0.0, 0.0, f),
            &Vec3::x(),
            &Vec3::y(),
            PLANE_HALF_WIDTH,
            PLANE_HALF_HEIGHT,
        );
        Self {
            projected,
            plane_corners,
        }
    }

    pub fn axis_tips() -> [Vec3; 3] {
        [
            vec3(AXIS_LENGTH, 0.0, 0.0),
            vec3(0.0, AXIS_LENGTH, 0.0),
            vec3(0.0, 0.0, AXIS_LENGTH),
        ]
    }

    pub fn fit_points(&self, state: &IntrinsicState) -> Vec<Vec3> {
        let mut points = vec![Vec3::zeros(), state.point, self.projected];
        points.extend(self.plane_corners);
        points.extend(Self::axis_tips());
        points
    }
}

impl Scene for IntrinsicState {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &PARAMETERS
    }

    fn parameter(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.focal_length),
            1 => Some(self.point.x),
            2 => Some(self.point.y),
            3 => Some(self.point.z),
            _ => None,
        }
    }

    fn set_parameter(&mut self, index: usize, value: f64) {
        match index {
            0 => self.focal_length = value,
            1 => self.point.x = value,
            2 => self.point.y = value,
            3 => self.point.z = value,
            _ => {}
        }
    }

    fn view(&self) -> &ViewState {
        &self.view
    }

    fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    fn draw<S: DrawSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let geometry = IntrinsicGeometry::compute(self);
        let (width, height) = surface.size();
        let view = self.view.projector(width, height, &geometry.fit_points(self));

        let origin = Vec3::zeros();
        draw_plane_highlight(
            surface,
            &view,
            &origin,
            [&Vec3::x(), &Vec3::y(), &Vec3::z()],
            HIGHLIGHT_SIZE,
        )?;

        let corners2 = view.project_all(&geometry.plane_corners);
        let cam2 = view.project(&origin);
        let p2 = view.project(&self.point);
        let proj2 = view.project(&geometry.projected);

        surface.draw_polygon(
            &corners2,
            Some(palette::IMAGE_PLANE_STROKE),
            Some(palette::IMAGE_PLANE_FILL),
        )?;

        let tips = IntrinsicGeometry::axis_tips().map(|p| view.project(&p));
        draw_axes(surface, &cam2, &tips, 1.0, 1.8)?;

        surface.draw_line(&cam2, &p2, palette::RAY_TO_POINT, 2.0)?;
        surface.draw_line(&cam2, &proj2, palette::PROJECTION.with_alpha(0.65), 1.6)?;
        surface.draw_line(&p2, &proj2, palette::GUIDE.with_alpha(0.25), 1.2)?;

        surface.draw_point(&cam2, palette::CAMERA, 4.2)?;
        surface.draw_point(&p2, palette::POINT, 5.0)?;
        surface.draw_point(&proj2, palette::PROJECTION, 4.4)?;

        draw_marker_label(surface, "Camera center O", &cam2, -8.0, None)?;
        draw_marker_label(surface, "3D point X", &p2, -8.0, Some(palette::LABEL_POINT))?;
        draw_marker_label(surface, "Projected point x", &proj2, -8.0, Some(palette::LABEL_PROJECTION))?;
        draw_marker_label(surface, "Image plane Z = f", &corners2[0], -10.0, Some(palette::LABEL_PROJECTION))?;

        draw_caption(surface, self.view.mode, "")
    }
}
