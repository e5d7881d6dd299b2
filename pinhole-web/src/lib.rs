//! Pinhole Web - WASM canvas host for the camera model diagrams
//!
//! The page script looks up the slider and segmented-control widgets,
//! forwards their values and the pointer gestures to a [`PinholeDemo`],
//! and calls [`PinholeDemo::repaint`] on load and resize.
use std::fmt::Display;

use log::{debug, Level};
use pinhole_core::{AnyController, SceneKind, ViewMode};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod canvas;

pub use canvas::{Backing, CanvasSurface};

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One interactive diagram bound to a canvas element
#[wasm_bindgen]
pub struct PinholeDemo {
    surface: CanvasSurface,
    controller: AnyController,
}

#[wasm_bindgen]
impl PinholeDemo {
    /// Bind a diagram to the canvas with id `canvas_id`.
    ///
    /// `scene` is `"extrinsic"` (camera pose) or `"intrinsic"` (focal
    /// length); `config` is an optional JSON object of initial values.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, scene: &str, config: Option<String>) -> Result<PinholeDemo, JsValue> {
        let kind: SceneKind = scene.parse().map_err(to_js)?;
        let controller = match config.as_deref() {
            Some(json) => AnyController::from_json(kind, json).map_err(to_js)?,
            None => AnyController::new(kind),
        };

        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("element {canvas_id:?} is not a canvas")))?;

        let mut demo = PinholeDemo {
            surface: CanvasSurface::new(canvas)?,
            controller,
        };
        debug!("mounted {kind} diagram on #{canvas_id}");
        demo.repaint()?;
        Ok(demo)
    }

    /// Like the constructor, but a missing canvas yields `undefined` instead of an error
    #[wasm_bindgen(js_name = tryMount)]
    pub fn try_mount(canvas_id: &str, scene: &str) -> Option<PinholeDemo> {
        match PinholeDemo::new(canvas_id, scene, None) {
            Ok(demo) => Some(demo),
            Err(err) => {
                debug!("skipping #{canvas_id}: {err:?}");
                None
            }
        }
    }

    /// Resize to the container, clear and redraw
    pub fn repaint(&mut self) -> Result<(), JsValue> {
        self.surface.fit_to_container()?;
        self.controller.repaint(&mut self.surface)
    }

    /// Pointer drag delta in CSS pixels
    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        if self.controller.drag(dx, dy) {
            self.repaint()?;
        }
        Ok(())
    }

    /// Wheel delta; returns `true` when the event should be prevented
    pub fn wheel(&mut self, delta_y: f64) -> Result<bool, JsValue> {
        let handled = self.controller.wheel(delta_y);
        if handled {
            self.repaint()?;
        }
        Ok(handled)
    }

    /// Slider callback with a normalized value in `[0, 1]`
    #[wasm_bindgen(js_name = setSlider)]
    pub fn set_slider(&mut self, index: usize, value: f64) -> Result<(), JsValue> {
        self.controller.set_slider(index, value).map_err(to_js)?;
        self.repaint()
    }

    /// Slider callback addressed by parameter name
    #[wasm_bindgen(js_name = updateParameter)]
    pub fn update_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        self.controller.update_parameter(name, value).map_err(to_js)?;
        self.repaint()
    }

    /// Segmented-control callback
    #[wasm_bindgen(js_name = selectPlane)]
    pub fn select_plane(&mut self, option: usize) -> Result<(), JsValue> {
        self.controller.select_mode(option).map_err(to_js)?;
        self.repaint()
    }

    #[wasm_bindgen(js_name = sliderCount)]
    pub fn slider_count(&self) -> usize {
        self.controller.parameters().len()
    }

    #[wasm_bindgen(js_name = sliderName)]
    pub fn slider_name(&self, index: usize) -> Option<String> {
        self.controller.parameters().get(index).map(|spec| spec.name.to_owned())
    }

    #[wasm_bindgen(js_name = sliderLabel)]
    pub fn slider_label(&self, index: usize) -> Option<String> {
        self.controller.parameters().get(index).map(|spec| spec.label.to_owned())
    }

    /// Initial widget position declared for a slider
    #[wasm_bindgen(js_name = sliderDefault)]
    pub fn slider_default(&self, index: usize) -> Option<f64> {
        self.controller.parameters().get(index).map(|spec| spec.default_position)
    }

    /// Widget position matching the parameter's current value
    #[wasm_bindgen(js_name = sliderPosition)]
    pub fn slider_position(&self, index: usize) -> Result<f64, JsValue> {
        self.controller.slider_position(index).map_err(to_js)
    }

    #[wasm_bindgen(js_name = planeOptions)]
    pub fn plane_options() -> Vec<String> {
        ViewMode::OPTION_LABELS.iter().map(|label| (*label).to_owned()).collect()
    }

    #[wasm_bindgen(js_name = selectedPlane)]
    pub fn selected_plane(&self) -> usize {
        self.controller.mode().index()
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        self.controller.state_json().map_err(to_js)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(Level::Debug).map_err(to_js)?;
    Ok(())
}
