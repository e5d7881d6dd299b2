//! Pinhole Core Library - projection math and scene logic for camera-model diagrams
//!
//! This library is host-agnostic: scenes draw through the [`DrawSurface`]
//! trait, and hosts feed input through a [`DemoController`].

pub mod camera;
pub mod controller;
pub mod error;
pub mod math;
pub mod projection;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use camera::CameraPose;
pub use controller::{AnyController, DemoController, SceneKind};
pub use error::{Error, Result};
pub use math::Vec3;
pub use projection::{make_view_projector, ScreenPoint, ViewMode, ViewProjector};
pub use scene::{ExtrinsicState, IntrinsicState, ParameterSpec, Scene, ViewState};
pub use surface::{palette, Color, DrawCommand, DrawSurface, RecordingSurface};
