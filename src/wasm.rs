//! WASM bindings for the wordcloud-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::layout::{LINE_HEIGHT_EM, LayoutConfig, Measurement, TextMetrics};
use crate::output::layout_json;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    pub fn console_warn(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Measures text on an offscreen 2D canvas.
struct CanvasMetrics {
    context: Option<CanvasRenderingContext2d>,
    font_family: String,
}

impl CanvasMetrics {
    fn new(font_family: &str) -> Self {
        Self { context: canvas_context(), font_family: font_family.to_string() }
    }
}

fn canvas_context() -> Option<CanvasRenderingContext2d> {
    let document = web_sys::window()?.document()?;
    let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.get_context("2d").ok()??.dyn_into().ok()
}

impl TextMetrics for CanvasMetrics {
    fn measure(&self, text: &str, font_px: f64) -> Option<Measurement> {
        let context = self.context.as_ref()?;
        context.set_font(&format!("{font_px}px {}", self.font_family));
        let metrics = context.measure_text(text).ok()?;
        Some(Measurement { width: metrics.width(), height: font_px * LINE_HEIGHT_EM })
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Lay out a JSON word list and return placements as JSON.
/// On failure returns `{"error": "..."}`.
#[wasm_bindgen]
pub fn layout_words(request: &str, font_family: &str) -> String {
    let metrics = CanvasMetrics::new(font_family);
    if metrics.context.is_none() {
        console_warn("Canvas text metrics unavailable, using estimated word sizes");
    }

    match layout_json(request, &metrics) {
        Ok(json) => json,
        Err(e) => {
            console_error(&format!("Error laying out words: {e}"));
            error_json(&e.to_string())
        }
    }
}

/// The default layout config as JSON, for the front-end's settings form.
#[wasm_bindgen]
pub fn default_config() -> String {
    serde_json::to_string(&LayoutConfig::default()).unwrap_or_else(|e| error_json(&e.to_string()))
}
