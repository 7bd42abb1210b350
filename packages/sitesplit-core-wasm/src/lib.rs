use wasm_bindgen::prelude::*;
use serde_wasm_bindgen::to_value;

// Create a console module for logging
pub mod console;
// Shared data structures
pub mod models;
pub mod error;
// Request options and their defaults
pub mod config;
// Ring/polygon conversion and area helpers
pub mod geometry;
pub mod validator;
pub mod splitter;
pub mod assembler;
// In-memory storage of split results per project
pub mod site_store;
pub mod processing;

pub use config::{SiteRequest, ValidationMode};
pub use error::{SiteError, SiteResult};
pub use models::{BuildSite, BuildingLimit, HeightPlateau, Point, Ring, SplitPiece, SplitResult};
pub use splitter::split;
pub use validator::{validate, validate_all};

use site_store::SiteStore;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("Site split module initialized successfully");
    });
}

fn to_js_error(err: SiteError) -> JsValue {
    let body = serde_json::to_string(&err.to_response())
        .unwrap_or_else(|_| err.to_string());
    JsValue::from_str(&body)
}

fn parse_request(input_json: &str) -> Result<SiteRequest, SiteError> {
    let request: SiteRequest = serde_json::from_str(input_json)
        .map_err(|e| SiteError::Structural(format!("Invalid input JSON: {}", e)))?;
    request.site.check_structure()?;
    Ok(request)
}

/// Validate a site. Resolves to `true`, or rejects with a
/// `{ status_code, detail }` JSON string naming the violation.
#[wasm_bindgen]
pub fn validate_site(input_json: &str) -> Result<JsValue, JsValue> {
    let request = parse_request(input_json).map_err(to_js_error)?;
    processing::check_site(&request.site, request.tolerance, request.validation_mode)
        .map_err(to_js_error)?;
    Ok(JsValue::TRUE)
}

/// Split a site without validating it. Returns the results keyed by
/// building id as a JSON string.
#[wasm_bindgen]
pub fn split_site(input_json: &str) -> Result<String, JsValue> {
    let request = parse_request(input_json).map_err(to_js_error)?;
    let results = split(
        &request.project_name,
        &request.site.buildings,
        &request.site.plateaus,
    );
    serde_json::to_string(&results)
        .map_err(|e| to_js_error(SiteError::from(e)))
}

/// Validate, split and save a site under its project name, replacing any
/// results saved for that project before.
#[wasm_bindgen]
pub fn split_save_project_data(input_json: &str) -> Result<JsValue, JsValue> {
    let request = parse_request(input_json).map_err(to_js_error)?;
    let outcome = processing::process_site_global(&request).map_err(to_js_error)?;
    Ok(to_value(&outcome)?)
}

#[wasm_bindgen]
pub fn get_building_data(project_name: &str, building_id: usize) -> Result<JsValue, JsValue> {
    let found = SiteStore::with_mut(|store| store.get_building(project_name, building_id).cloned());
    match found {
        Some(result) => Ok(to_value(&result)?),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen]
pub fn delete_project_data(project_name: &str) -> usize {
    SiteStore::with_mut(|store| store.remove_project(project_name))
}

// Function to get store statistics
#[wasm_bindgen]
pub fn get_store_stats() -> Result<JsValue, JsValue> {
    let stats = SiteStore::with(|store| store.stats());
    Ok(to_value(&stats)?)
}

#[wasm_bindgen]
pub fn clear_store() -> bool {
    SiteStore::with_mut(|store| store.clear());
    true
}
