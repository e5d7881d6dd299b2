//! Demo controller: owns one scene's state and applies UI input to it
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::math::{clamp, unmap_slider};
use crate::projection::ViewMode;
use crate::scene::{ExtrinsicState, IntrinsicState, ParameterSpec, Scene};
use crate::surface::DrawSurface;

/// Single owner of a scene state.
///
/// Host adapters call the input methods and then [`DemoController::repaint`]
/// whenever one of them reports a change.
#[derive(Debug, Clone, Default)]
pub struct DemoController<S> {
    scene: S,
}

impl<S: Scene> DemoController<S> {
    pub fn new(scene: S) -> Self {
        Self { scene }
    }

    /// Build from a partial JSON object; missing fields keep their defaults.
    ///
    /// Slider-backed values are clamped to their parameter ranges and the
    /// view to its pitch and zoom limits.
    pub fn from_json(json: &str) -> Result<Self>
    where
        S: DeserializeOwned,
    {
        let mut controller = Self::new(serde_json::from_str(json)?);
        controller.clamp_to_ranges();
        Ok(controller)
    }

    fn clamp_to_ranges(&mut self) {
        for (index, spec) in self.parameters().iter().enumerate() {
            if let Some(value) = self.scene.parameter(index) {
                let clamped = clamp(value, spec.min, spec.max);
                if clamped != value {
                    debug!("clamped {} from {value} to {clamped}", spec.name);
                    self.scene.set_parameter(index, clamped);
                }
            }
        }
        self.scene.view_mut().limit();
    }

    pub fn state_json(&self) -> Result<String>
    where
        S: Serialize,
    {
        Ok(serde_json::to_string(&self.scene)?)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn parameters(&self) -> &'static [ParameterSpec] {
        self.scene.parameters()
    }

    /// Apply a slider position in `[0, 1]`, returning the mapped value
    pub fn set_slider(&mut self, index: usize, position: f64) -> Result<f64> {
        let spec = self.parameters().get(index).ok_or_else(|| {
            debug!("rejected slider index {index}");
            Error::ParameterIndex(index)
        })?;
        let value = spec.value_at(position);
        self.scene.set_parameter(index, value);
        Ok(value)
    }

    /// Apply a slider position to the parameter called `name`
    pub fn update_parameter(&mut self, name: &str, position: f64) -> Result<f64> {
        let index = self
            .parameters()
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| {
                debug!("rejected unknown parameter {name:?}");
                Error::UnknownParameter(name.to_owned())
            })?;
        self.set_slider(index, position)
    }

    /// Slider position matching the parameter's current value
    pub fn slider_position(&self, index: usize) -> Result<f64> {
        let spec = self.parameters().get(index).ok_or(Error::ParameterIndex(index))?;
        let value = self.scene.parameter(index).ok_or(Error::ParameterIndex(index))?;
        Ok(unmap_slider(value, spec.min, spec.max))
    }

    /// Move every slider to its declared default position
    pub fn apply_default_positions(&mut self) {
        for (index, spec) in self.parameters().iter().enumerate() {
            self.scene.set_parameter(index, spec.value_at(spec.default_position));
        }
    }

    /// Segmented-control selection
    pub fn select_mode(&mut self, option: usize) -> Result<ViewMode> {
        let mode = ViewMode::from_index(option)?;
        if self.scene.view().mode != mode {
            debug!("view mode {:?} -> {:?}", self.scene.view().mode, mode);
        }
        self.scene.view_mut().mode = mode;
        Ok(mode)
    }

    pub fn mode(&self) -> ViewMode {
        self.scene.view().mode
    }

    /// Orbit the external view. Returns whether a repaint is due.
    pub fn drag(&mut self, dx: f64, dy: f64) -> bool {
        self.scene.view_mut().orbit(dx, dy)
    }

    /// Zoom the external view. Returns whether the wheel was consumed.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.scene.view_mut().wheel(delta_y)
    }

    /// Clear the surface and draw the current state
    pub fn repaint<D: DrawSurface>(&self, surface: &mut D) -> std::result::Result<(), D::Error> {
        let (width, height) = surface.size();
        trace!("repaint {width}x{height} in {:?}", self.mode());
        surface.clear()?;
        self.scene.draw(surface)
    }
}

/// Which diagram a host shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    /// Camera pose: position and orientation sliders
    #[default]
    Extrinsic,
    /// Camera at the origin: focal length and point sliders
    Intrinsic,
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "extrinsic" | "step1" | "pose" => Ok(SceneKind::Extrinsic),
            "intrinsic" | "step2" | "focal" => Ok(SceneKind::Intrinsic),
            _ => Err(Error::UnknownScene(s.to_owned())),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneKind::Extrinsic => write!(f, "extrinsic"),
            SceneKind::Intrinsic => write!(f, "intrinsic"),
        }
    }
}

/// A controller for either scene, for hosts that pick one at runtime
#[derive(Debug, Clone)]
pub enum AnyController {
    Extrinsic(DemoController<ExtrinsicState>),
    Intrinsic(DemoController<IntrinsicState>),
}

macro_rules! dispatch {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            AnyController::Extrinsic($c) => $body,
            AnyController::Intrinsic($c) => $body,
        }
    };
}

impl AnyController {
    pub fn new(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Extrinsic => AnyController::Extrinsic(DemoController::default()),
            SceneKind::Intrinsic => AnyController::Intrinsic(DemoController::default()),
        }
    }

    pub fn from_json(kind: SceneKind, json: &str) -> Result<Self> {
        Ok(match kind {
            SceneKind::Extrinsic => AnyController::Extrinsic(DemoController::from_json(json)?),
            SceneKind::Intrinsic => AnyController::Intrinsic(DemoController::from_json(json)?),
        })
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            AnyController::Extrinsic(_) => SceneKind::Extrinsic,
            AnyController::Intrinsic(_) => SceneKind::Intrinsic,
        }
    }

    pub fn parameters(&self) -> &'static [ParameterSpec] {
        dispatch!(self, c => c.parameters())
    }

    pub fn set_slider(&mut self, index: usize, position: f64) -> Result<f64> {
        dispatch!(self, c => c.set_slider(index, position))
    }

    pub fn update_parameter(&mut self, name: &str, position: f64) -> Result<f64> {
        dispatch!(self, c => c.update_parameter(name, position))
    }

    pub fn slider_position(&self, index: usize) -> Result<f64> {
        dispatch!(self, c => c.slider_position(index))
    }

    pub fn select_mode(&mut self, option: usize) -> Result<ViewMode> {
        dispatch!(self, c => c.select_mode(option))
    }

    pub fn mode(&self) -> ViewMode {
        dispatch!(self, c => c.mode())
    }

    pub fn drag(&mut self, dx: f64, dy: f64) -> bool {
        dispatch!(self, c => c.drag(dx, dy))
    }

    pub fn wheel(&mut self, delta_y: f64) -> bool {
        dispatch!(self, c => c.wheel(delta_y))
    }

    pub fn apply_default_positions(&mut self) {
        dispatch!(self, c => c.apply_default_positions())
    }

    pub fn state_json(&self) -> Result<String> {
        dispatch!(self, c => c.state_json())
    }

    pub fn repaint<D: DrawSurface>(&self, surface: &mut D) -> std::result::Result<(), D::Error> {
        dispatch!(self, c => c.repaint(surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;
    use crate::scene::{MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT};
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_slider_updates_parameter() {
        let mut controller = DemoController::new(IntrinsicState::default());
        assert_eq!(controller.set_slider(0, 1.0).unwrap(), 2.0);
        assert_eq!(controller.scene().focal_length, 2.0);
        assert_eq!(controller.update_parameter("point_z", 0.0).unwrap(), 1.2);
        assert_eq!(controller.scene().point.z, 1.2);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut controller = DemoController::new(ExtrinsicState::default());
        assert!(matches!(controller.set_slider(6, 0.5), Err(Error::ParameterIndex(6))));
        assert!(matches!(
            controller.update_parameter("focal_length", 0.5),
            Err(Error::UnknownParameter(name)) if name == "focal_length"
        ));
        assert!(matches!(controller.select_mode(4), Err(Error::ViewModeIndex(4))));
        assert_eq!(controller.scene(), &ExtrinsicState::default());
    }

    #[test]
    fn test_camera_slider_ranges() {
        let mut controller = DemoController::new(ExtrinsicState::default());
        controller.update_parameter("camera_x", 0.0).unwrap();
        controller.update_parameter("camera_yaw", 1.0).unwrap();
        assert_eq!(controller.scene().camera.position.x, -1.5);
        assert_eq!(controller.scene().camera.yaw, 1.2);
        assert!((controller.slider_position(0).unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_positions_match_defaults() {
        let mut controller = DemoController::new(IntrinsicState::default());
        controller.apply_default_positions();
        let scene = controller.scene();
        assert!((scene.focal_length - 1.2).abs() < 0.01);
        assert!((scene.point.x - 0.792).abs() < 1e-9);
        assert!((scene.point.z - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_gestures_saturate() {
        let mut controller = DemoController::new(IntrinsicState::default());
        for _ in 0..60 {
            assert!(controller.wheel(-100.0));
            assert!(controller.drag(3.0, 50.0));
        }
        assert_eq!(controller.scene().view.zoom, MAX_ZOOM);
        assert_eq!(controller.scene().view.pitch, PITCH_LIMIT);
        for _ in 0..60 {
            controller.wheel(100.0);
            controller.drag(0.0, -50.0);
        }
        assert_eq!(controller.scene().view.zoom, MIN_ZOOM);
        assert_eq!(controller.scene().view.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_gestures_ignored_in_plane_mode() {
        let mut controller = DemoController::new(ExtrinsicState::default());
        assert_eq!(controller.select_mode(1).unwrap(), ViewMode::PlaneXY);
        let before = *controller.scene();
        assert!(!controller.drag(25.0, 25.0));
        assert!(!controller.wheel(-1.0));
        assert_eq!(controller.scene(), &before);
    }

    #[test]
    fn test_plane_xy_forces_fixed_angles() {
        let mut controller = DemoController::new(IntrinsicState::default());
        controller.drag(80.0, -30.0);
        controller.select_mode(1).unwrap();
        let view = controller.scene().view;
        let projector = view.projector(800.0, 600.0, &[]);
        assert_eq!(projector.angles(), (0.0, 0.0));
        assert_ne!((view.yaw, view.pitch), (0.0, 0.0));
    }

    #[test]
    fn test_repaint_clears_first() {
        let controller = DemoController::new(ExtrinsicState::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        controller.repaint(&mut surface).unwrap();
        let first_len = surface.commands.len();
        controller.repaint(&mut surface).unwrap();
        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert_eq!(surface.commands.len(), first_len);
    }

    #[test]
    fn test_from_json_partial() {
        let controller =
            DemoController::<IntrinsicState>::from_json(r#"{"focal_length": 1.5, "view": {"mode": "PlaneYZ"}}"#).unwrap();
        let scene = controller.scene();
        assert_eq!(scene.focal_length, 1.5);
        assert_eq!(scene.point, vec3(0.8, 0.5, 2.6));
        assert_eq!(scene.view.mode, ViewMode::PlaneYZ);
        assert_eq!(scene.view.zoom, 1.0);
    }

    #[test]
    fn test_from_json_clamps_out_of_range_values() {
        let controller = DemoController::<IntrinsicState>::from_json(
            r#"{"point": [0.8, 0.5, 0.0], "view": {"zoom": 40.0, "pitch": 3.0, "yaw": 9.0}}"#,
        )
        .unwrap();
        let scene = controller.scene();
        assert_eq!(scene.point, vec3(0.8, 0.5, 1.2));
        assert_eq!(scene.view.zoom, MAX_ZOOM);
        assert_eq!(scene.view.pitch, PITCH_LIMIT);
        assert_eq!(scene.view.yaw, 9.0);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        controller.repaint(&mut surface).unwrap();
        for command in &surface.commands {
            if let DrawCommand::Point { at, .. } = command {
                assert!(at.x.is_finite() && at.y.is_finite());
            }
        }

        let controller =
            DemoController::<ExtrinsicState>::from_json(r#"{"camera": {"yaw": 5.0}, "view": {"zoom": 0.01}}"#).unwrap();
        assert_eq!(controller.scene().camera.yaw, 1.2);
        assert_eq!(controller.scene().view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = DemoController::<ExtrinsicState>::from_json("{not json");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut controller = DemoController::new(ExtrinsicState::default());
        controller.update_parameter("camera_roll", 0.9).unwrap();
        let json = controller.state_json().unwrap();
        let restored = DemoController::<ExtrinsicState>::from_json(&json).unwrap();
        assert_eq!(restored.scene(), controller.scene());
    }

    #[test]
    fn test_scene_kind_parse() {
        assert_eq!("step1".parse::<SceneKind>().unwrap(), SceneKind::Extrinsic);
        assert_eq!("Intrinsic".parse::<SceneKind>().unwrap(), SceneKind::Intrinsic);
        assert!(matches!("step3".parse::<SceneKind>(), Err(Error::UnknownScene(_))));
        assert_eq!(SceneKind::Intrinsic.to_string(), "intrinsic");
    }

    #[test]
    fn test_any_controller_dispatch() {
        let mut any = AnyController::new(SceneKind::Intrinsic);
        assert_eq!(any.kind(), SceneKind::Intrinsic);
        assert_eq!(any.parameters().len(), 4);
        assert!((any.set_slider(3, 1.0).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(any.select_mode(2).unwrap(), ViewMode::PlaneYZ);
        assert_eq!(any.mode(), ViewMode::PlaneYZ);

        let mut surface = RecordingSurface::new(320.0, 240.0);
        any.repaint(&mut surface).unwrap();
        assert_eq!(surface.labels().last(), Some(&"YZ plane view"));
    }
}
