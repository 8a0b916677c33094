//! Host bridge adapters for the browser.
//!
//! A native host (desktop wrapper, extension, ...) announces itself by
//! installing `window.hostBridge` with two promise-returning methods:
//!
//! ```text
//! identity()             -> { homedir, hostname }
//! execute(command, cwd)  -> { success, stdout, stderr, exitCode, transportError }
//! ```

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::HOST_BRIDGE_GLOBAL;
use crate::core::error::BridgeError;
use crate::core::{Delay, HostBridge};
use crate::models::{ExecRequest, ExecResponse, HostIdentity};
use crate::utils::dom;

/// `window.hostBridge` accessed through `Reflect`.
pub struct JsHostBridge {
    bridge: Object,
}

impl JsHostBridge {
    /// Look up the global bridge object, if the page has one.
    pub fn detect() -> Option<Self> {
        let window = dom::window()?;
        let value = Reflect::get(&window, &HOST_BRIDGE_GLOBAL.into()).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        value.dyn_into::<Object>().ok().map(|bridge| Self { bridge })
    }

    /// Call `bridge[method](...args)` and await the result.
    async fn call(&self, method: &str, args: &Array) -> Result<JsValue, BridgeError> {
        let function = Reflect::get(&self.bridge, &method.into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(BridgeError::Unavailable)?;

        let value = function
            .apply(&self.bridge, args)
            .map_err(|e| BridgeError::Transport(describe(&e)))?;

        // Accept plain values as well as promises
        JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(|e| BridgeError::Transport(describe(&e)))
    }
}

#[async_trait(?Send)]
impl HostBridge for JsHostBridge {
    async fn identity(&self) -> Result<HostIdentity, BridgeError> {
        let value = self.call("identity", &Array::new()).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| BridgeError::Identity(e.to_string()))
    }

    async fn execute(&self, request: ExecRequest) -> Result<ExecResponse, BridgeError> {
        let cwd = request.cwd.map(JsValue::from).unwrap_or(JsValue::NULL);
        let args = Array::of2(&JsValue::from(request.command), &cwd);

        let value = self.call("execute", &args).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| BridgeError::Transport(format!("malformed reply: {}", e)))
    }
}

/// Timer backed by `setTimeout`.
pub struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// The page's host bridge paired with a browser timer.
pub fn detect() -> Option<(Rc<dyn HostBridge>, Rc<dyn Delay>)> {
    let bridge: Rc<dyn HostBridge> = Rc::new(JsHostBridge::detect()?);
    let delay: Rc<dyn Delay> = Rc::new(GlooDelay);
    debug!("found window.{}", HOST_BRIDGE_GLOBAL);
    Some((bridge, delay))
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}
