//! Browser idle scheduling through `requestIdleCallback`.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::IdleConfig;
use crate::scheduler::{CancelToken, IdleScheduler, IdleTask};

/// Runs tasks in browser idle periods, or after a timer where
/// `requestIdleCallback` is unavailable.
#[derive(Debug, Clone, Default)]
pub struct BrowserIdleScheduler {
    idle_timeout_ms: Option<u32>,
    fallback_delay_ms: i32,
}

impl BrowserIdleScheduler {
    /// Create a scheduler from the idle configuration.
    pub fn new(config: &IdleConfig) -> Self {
        Self {
            idle_timeout_ms: config
                .idle_timeout_ms
                .map(|ms| u32::try_from(ms).unwrap_or(u32::MAX)),
            fallback_delay_ms: i32::try_from(config.fallback_delay_ms).unwrap_or(i32::MAX),
        }
    }
}

fn supports_idle_callback(window: &web_sys::Window) -> bool {
    Reflect::has(window, &JsValue::from_str("requestIdleCallback")).unwrap_or(false)
}

impl IdleScheduler for BrowserIdleScheduler {
    fn schedule(&self, task: IdleTask) -> CancelToken {
        let token = CancelToken::new();
        let Some(window) = web_sys::window() else {
            log::warn!("No window available, idle task dropped");
            return token;
        };

        let guard = token.clone();
        let callback = Closure::once_into_js(move || {
            if !guard.is_cancelled() {
                task();
            }
        });
        let function: &js_sys::Function = callback.unchecked_ref();

        let scheduled = if supports_idle_callback(&window) {
            let options = web_sys::IdleRequestOptions::new();
            if let Some(timeout) = self.idle_timeout_ms {
                options.set_timeout(timeout);
            }
            window
                .request_idle_callback_with_options(function, &options)
                .map(|_| ())
        } else {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    function,
                    self.fallback_delay_ms,
                )
                .map(|_| ())
        };

        if let Err(err) = scheduled {
            log::warn!("Failed to schedule idle task: {:?}", err);
        }
        token
    }
}
