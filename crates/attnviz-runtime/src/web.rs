//! WebAssembly bindings for browser usage
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::{CellRef, ChangeListener, Error, MatrixId, Session, VisualizerConfig};

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A `setInterval` registration, cleared on drop
struct IntervalHandle {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    fn start(interval_ms: u32, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let closure = Closure::<dyn FnMut()>::new(callback);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms as i32,
        )?;
        Ok(Self { id, _closure: closure })
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

type Callback = ChangeListener<js_sys::Function>;

fn notify(callback: &Callback) {
    if let Some(Err(e)) = callback.notify(|f| f.call0(&JsValue::NULL)) {
        log::error!("change callback failed: {:?}", e);
    }
}

/// JavaScript-facing session wrapper.
///
/// Dropping it (or calling `free()` from JS) clears the wiggle timer.
#[wasm_bindgen]
pub struct WasmSession {
    inner: Rc<RefCell<Session>>,
    on_change: Callback,
    timer: Option<IntervalHandle>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session; `config_json` may override any subset of the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmSession, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => VisualizerConfig::from_json(&json).map_err(js_error)?,
            None => VisualizerConfig::default(),
        };
        Self::from_config(config)
    }

    /// Session with the 10-token, 6-dimension layout
    pub fn documented() -> Result<WasmSession, JsValue> {
        console_error_panic_hook::set_once();
        Self::from_config(VisualizerConfig::documented())
    }

    fn from_config(config: VisualizerConfig) -> Result<WasmSession, JsValue> {
        let session = Session::new(config).map_err(js_error)?;
        Ok(WasmSession {
            inner: Rc::new(RefCell::new(session)),
            on_change: ChangeListener::new(),
            timer: None,
        })
    }

    /// Register a function called after every timer-driven update
    pub fn on_change(&mut self, callback: Option<js_sys::Function>) {
        self.on_change.set(callback);
    }

    /// Current view state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.inner.borrow().snapshot().to_json().map_err(js_error)
    }

    pub fn randomize(&mut self) -> Result<(), JsValue> {
        self.inner.borrow_mut().randomize().map_err(js_error)?;
        self.sync_timer()
    }

    /// Select a cell by matrix key (e.g. "embeddings", "w1", "b2")
    pub fn select(&mut self, matrix: &str, row: usize, col: usize) -> Result<(), JsValue> {
        let id: MatrixId = matrix.parse().map_err(js_error)?;
        self.inner.borrow_mut().select(CellRef::new(id, row, col)).map_err(js_error)?;
        self.sync_timer()
    }

    pub fn deselect(&mut self) -> Result<(), JsValue> {
        self.inner.borrow_mut().deselect();
        self.sync_timer()
    }

    /// Slider input; returns the value stored after clamping and snapping
    pub fn set_value(&mut self, value: f64) -> Result<f64, JsValue> {
        self.inner.borrow_mut().set_selected_value(value).map_err(js_error)
    }

    pub fn set_wiggle(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.inner.borrow_mut().set_wiggle(enabled);
        self.sync_timer()
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.inner.borrow_mut().set_show_labels(show);
    }

    pub fn set_show_values(&mut self, show: bool) {
        self.inner.borrow_mut().set_show_values(show);
    }

    /// Stop the wiggle and drop the selection, for when the view goes away
    pub fn teardown(&mut self) {
        self.timer = None;
        let mut session = self.inner.borrow_mut();
        session.set_wiggle(false);
        session.deselect();
    }

    /// Start or stop the interval so it runs exactly while the session wiggles
    fn sync_timer(&mut self) -> Result<(), JsValue> {
        let wiggling = self.inner.borrow().is_wiggling();
        match (wiggling, self.timer.is_some()) {
            (true, false) => {
                let session = Rc::clone(&self.inner);
                let on_change = self.on_change.clone();
                let interval_ms = session.borrow().config().wiggle.interval_ms;

                self.timer = Some(IntervalHandle::start(interval_ms, move || {
                    let now = Duration::from_secs_f64(js_sys::Date::now() / 1000.0);
                    let result = session.borrow_mut().tick(now);
                    match result {
                        Ok(true) => notify(&on_change),
                        Ok(false) => {}
                        Err(e) => log::error!("wiggle tick failed: {}", e),
                    }
                })?);
                log::debug!("wiggle timer started ({} ms)", interval_ms);
            }
            (false, true) => {
                self.timer = None;
                log::debug!("wiggle timer stopped");
            }
            _ => {}
        }
        Ok(())
    }
}
