//! WebAssembly bindings for the planner.
//!
//! Provides a thin wrapper around `PlannerApp` for a browser front end. The
//! front end owns the DOM; it reads state through these getters and redraws
//! after every call.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::{
    app::PlannerApp,
    client::{FetchTransport, SolverClient},
    export,
    schema::{Catalog, CatalogField, ParamField, RunParameters},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// Delay before the download's object URL is released.
const REVOKE_DELAY_MS: i32 = 1_000;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// WebAssembly wrapper for the planner state and solver client.
#[wasm_bindgen]
pub struct WasmPlanner {
    app: Rc<RefCell<PlannerApp>>,
    client: Rc<SolverClient<FetchTransport>>,
}

impl Default for WasmPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmPlanner {
    /// Planner with the built-in catalog and default parameters.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmPlanner {
        WasmPlanner {
            app: Rc::new(RefCell::new(PlannerApp::default())),
            client: Rc::new(SolverClient::new(FetchTransport)),
        }
    }

    /// Planner from JSON catalog and parameters.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(catalog_json: &str, params_json: &str) -> Result<WasmPlanner, JsValue> {
        let catalog: Catalog = serde_json::from_str(catalog_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid catalog JSON: {e}")))?;
        let params: RunParameters = serde_json::from_str(params_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid params JSON: {e}")))?;

        Ok(WasmPlanner {
            app: Rc::new(RefCell::new(PlannerApp::new(catalog, params))),
            client: Rc::new(SolverClient::new(FetchTransport)),
        })
    }

    /// Solver endpoint used for runs.
    #[wasm_bindgen(js_name = getEndpoint)]
    pub fn get_endpoint(&self) -> String {
        self.client.base_url().to_string()
    }

    #[wasm_bindgen(js_name = getCatalog)]
    pub fn get_catalog(&self) -> Result<JsValue, JsValue> {
        to_js(self.app.borrow().catalog())
    }

    #[wasm_bindgen(js_name = getParams)]
    pub fn get_params(&self) -> Result<JsValue, JsValue> {
        to_js(self.app.borrow().params())
    }

    /// Apply a form value to a catalog cell. `field` is a wire key such as `"area"`.
    #[wasm_bindgen(js_name = editCatalog)]
    pub fn edit_catalog(&self, index: usize, field: &str, value: &str) -> Result<(), JsValue> {
        let field: CatalogField = field.parse().map_err(js_err)?;
        self.app
            .borrow_mut()
            .edit_catalog(index, field, value)
            .map_err(js_err)
    }

    /// Apply a form value to a run parameter. `field` is a wire key such as `"pc"`.
    #[wasm_bindgen(js_name = editParam)]
    pub fn edit_param(&self, field: &str, value: &str) -> Result<(), JsValue> {
        let field: ParamField = field.parse().map_err(js_err)?;
        self.app.borrow_mut().edit_param(field, value).map_err(js_err)
    }

    /// Replace all run parameters from JSON. Missing fields take their defaults.
    #[wasm_bindgen(js_name = setParams)]
    pub fn set_params(&self, params_json: &str) -> Result<(), JsValue> {
        let params: RunParameters = serde_json::from_str(params_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid params JSON: {e}")))?;
        self.app.borrow_mut().set_params(params);
        Ok(())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.app.borrow().is_running()
    }

    /// Start a run. Resolves once the result is stored; rejects with the
    /// failure notice (endpoint and error text) otherwise.
    #[wasm_bindgen]
    pub fn run(&self) -> Promise {
        let request = match self.app.borrow_mut().begin_run() {
            Ok(request) => request,
            Err(e) => return Promise::reject(&js_err(e)),
        };

        let app = Rc::clone(&self.app);
        let client = Rc::clone(&self.client);
        future_to_promise(async move {
            let outcome = client.submit_run(&request.catalog, &request.params).await;
            app.borrow_mut().finish_run(outcome).map_err(js_err)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Message from the last failed run, if any.
    #[wasm_bindgen(js_name = getNotice)]
    pub fn get_notice(&self) -> Option<String> {
        self.app.borrow().notice().map(str::to_string)
    }

    #[wasm_bindgen(js_name = getResult)]
    pub fn get_result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.app.borrow().result())
    }

    /// Summary, allocation list, grid, legend and chart series for the current result.
    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.app.borrow().view())
    }

    /// Grid cell colors as CSS hex strings, row-major.
    #[wasm_bindgen(js_name = getGridColors)]
    pub fn get_grid_colors(&self) -> Array {
        let app = self.app.borrow();
        let grid = match app.result() {
            Some(result) => crate::compute::render_grid(&result.selected),
            None => crate::compute::PackedGrid::empty(),
        };
        grid.cells
            .iter()
            .map(|c| JsValue::from_str(&c.hex()))
            .collect()
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        export::current_to_json(self.app.borrow().result()).map_err(js_err)
    }

    /// Offer the current result as a JSON file download.
    #[wasm_bindgen(js_name = downloadJson)]
    pub fn download_json(&self) -> Result<(), JsValue> {
        let json = self.export_json()?;

        let parts = Array::of1(&JsValue::from_str(&json));
        let options = BlobPropertyBag::new();
        options.set_type("application/json");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(export::EXPORT_FILE_NAME);
        anchor.click();

        // Revoking inside the click handler cancels the download in some browsers.
        let revoke = Closure::once_into_js(move || {
            let _ = Url::revoke_object_url(&url);
        });
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            REVOKE_DELAY_MS,
        )?;
        Ok(())
    }
}
