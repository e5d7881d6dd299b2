//! Camera pose scene: a movable, rotatable camera imaging a fixed world point
use serde::{Deserialize, Serialize};

use super::{draw_axes, draw_caption, draw_marker_label, draw_plane_highlight, quad, ParameterSpec, Scene, ViewState};
use crate::camera::CameraPose;
use crate::math::{scale3, vec3, Vec3};
use crate::surface::{palette, DrawSurface};

/// The point being imaged, in world coordinates
pub const WORLD_POINT: Vec3 = Vec3::new(1.2, 0.8, 2.8);
pub const FOCAL_LENGTH: f64 = 1.0;
/// Lower bound on camera-space depth before the perspective divide
pub const MIN_DEPTH: f64 = 0.35;
const PLANE_HALF_WIDTH: f64 = 1.1;
const PLANE_HALF_HEIGHT: f64 = 0.75;
const CAMERA_AXIS_LENGTH: f64 = 0.75;
const WORLD_AXIS_LENGTH: f64 = 1.05;
const HIGHLIGHT_SIZE: f64 = 0.9;

const PARAMETERS: [ParameterSpec; 6] = [
    ParameterSpec::new("camera_x", "Camera x", -1.5, 1.5, 0.37),
    ParameterSpec::new("camera_y", "Camera y", -1.0, 1.0, 0.40),
    ParameterSpec::new("camera_z", "Camera z", -1.0, 1.0, 0.55),
    ParameterSpec::new("camera_yaw", "Yaw", -1.2, 1.2, 0.65),
    ParameterSpec::new("camera_pitch", "Pitch", -1.0, 1.0, 0.55),
    ParameterSpec::new("camera_roll", "Roll", -1.0, 1.0, 0.47),
];

/// Slider-controlled state of the camera pose scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrinsicState {
    pub camera: CameraPose,
    pub view: ViewState,
}

impl Default for ExtrinsicState {
    fn default() -> Self {
        Self {
            camera: CameraPose::default(),
            view: ViewState::new(-0.55, 0.35),
        }
    }
}

/// Everything derived from [`ExtrinsicState`] for one frame
#[derive(Debug, Clone)]
pub struct ExtrinsicGeometry {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
    /// World point in camera coordinates, before depth clamping
    pub point_camera: Vec3,
    /// Projection on the image plane, camera coordinates
    pub projected_camera: Vec3,
    /// Projection on the image plane, world coordinates
    pub projected_world: Vec3,
    pub plane_center: Vec3,
    pub plane_corners: [Vec3; 4],
}

impl ExtrinsicGeometry {
    pub fn compute(camera: &CameraPose) -> Self {
        let right = camera.right();
        let up = camera.up();
        let forward = camera.forward();

        let point_camera = camera.world_to_camera(&WORLD_POINT);
        let z = point_camera.z.max(MIN_DEPTH);
        let projected_camera = vec3(
            FOCAL_LENGTH * point_camera.x / z,
            FOCAL_LENGTH * point_camera.y / z,
            FOCAL_LENGTH,
        );
        let projected_world = camera.camera_to_world(&projected_camera);

        let plane_center = camera.position + scale3(&forward, FOCAL_LENGTH);
        let plane_corners = quad(&plane_center, &right, &up, PLANE_HALF_WIDTH, PLANE_HALF_HEIGHT);

        Self {
            right,
            up,
            forward,
            point_camera,
            projected_camera,
            projected_world,
            plane_center,
            plane_corners,
        }
    }

    /// Tips of the camera's local axes, in right/up/forward order
    pub fn camera_axis_tips(&self, camera: &CameraPose) -> [Vec3; 3] {
        [self.right, self.up, self.forward].map(|axis| camera.position + scale3(&axis, CAMERA_AXIS_LENGTH))
    }

    pub fn world_axis_tips() -> [Vec3; 3] {
        [
            vec3(WORLD_AXIS_LENGTH, 0.0, 0.0),
            vec3(0.0, WORLD_AXIS_LENGTH, 0.0),
            vec3(0.0, 0.0, WORLD_AXIS_LENGTH),
        ]
    }

    /// Points the plane views are fitted to
    pub fn fit_points(&self, camera: &CameraPose) -> Vec<Vec3> {
        let mut points = vec![camera.position, WORLD_POINT, self.projected_world, self.plane_center];
        points.extend(self.plane_corners);
        points.push(Vec3::zeros());
        points.extend(Self::world_axis_tips());
        points.extend(self.camera_axis_tips(camera));
        points
    }
}

impl Scene for ExtrinsicState {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &PARAMETERS
    }

    fn parameter(&self, index: usize) -> Option<f64> {
        let camera = &self.camera;
        match index {
            0 => Some(camera.position.x),
            1 => Some(camera.position.y),
            2 => Some(camera.position.z),
            3 => Some(camera.yaw),
            4 => Some(camera.pitch),
            5 => Some(camera.roll),
            _ => None,
        }
    }

    fn set_parameter(&mut self, index: usize, value: f64) {
        let camera = &mut self.camera;
        match index {
            0 => camera.position.x = value,
            1 => camera.position.y = value,
            2 => camera.position.z = value,
            3 => camera.yaw = value,
            4 => camera.pitch = value,
            5 => camera.roll = value,
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
        let camera = &self.camera;
        let geometry = ExtrinsicGeometry::compute(camera);
        let (width, height) = surface.size();
        let view = self.view.projector(width, height, &geometry.fit_points(camera));

        let c2 = view.project(&camera.position);
        let x2 = view.project(&WORLD_POINT);
        let q2 = view.project(&geometry.projected_world);
        let center2 = view.project(&geometry.plane_center);
        let corners2 = view.project_all(&geometry.plane_corners);

        draw_plane_highlight(
            surface,
            &view,
            &camera.position,
            [&geometry.right, &geometry.up, &geometry.forward],
            HIGHLIGHT_SIZE,
        )?;

        surface.draw_polygon(
            &corners2,
            Some(palette::IMAGE_PLANE_STROKE),
            Some(palette::IMAGE_PLANE_FILL),
        )?;

        surface.draw_line(&c2, &x2, palette::RAY_TO_POINT, 2.0)?;
        surface.draw_line(&c2, &q2, palette::PROJECTION.with_alpha(0.85), 1.8)?;

        surface.draw_point(&c2, palette::CAMERA, 4.5)?;
        surface.draw_point(&x2, palette::POINT, 5.0)?;
        surface.draw_point(&q2, palette::PROJECTION, 4.4)?;

        surface.draw_line(&c2, &center2, palette::GUIDE, 1.2)?;

        let origin2 = view.project(&Vec3::zeros());
        let world_tips = ExtrinsicGeometry::world_axis_tips().map(|p| view.project(&p));
        draw_axes(surface, &origin2, &world_tips, 0.55, 1.4)?;
        surface.draw_point(&origin2, palette::WORLD_ORIGIN, 3.6)?;

        let camera_tips = geometry.camera_axis_tips(camera).map(|p| view.project(&p));
        draw_axes(surface, &c2, &camera_tips, 1.0, 1.7)?;

        draw_marker_label(surface, "Camera C", &c2, -8.0, None)?;
        draw_marker_label(surface, "World point X", &x2, -8.0, Some(palette::LABEL_POINT))?;
        draw_marker_label(surface, "Projected x", &q2, -8.0, Some(palette::LABEL_PROJECTION))?;
        draw_marker_label(surface, "Image plane", &corners2[0], -10.0, Some(palette::LABEL_PROJECTION))?;
        draw_marker_label(surface, "World origin O_w", &origin2, 14.0, Some(palette::LABEL_MUTED))?;

        draw_caption(surface, self.view.mode, "Camera ")
    }
}
