//! Browser tick source built on `requestAnimationFrame`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::clock::TickSource;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Schedules one animation frame per [`TickSource::arm`].
///
/// The frame handler is installed once with [`AnimationFrameClock::install`]; it
/// clears the pending request before running, so the handler may re-arm.
#[derive(Clone, Default)]
pub struct AnimationFrameClock {
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function run on every delivered frame
    pub fn install(&self, mut handler: impl FnMut() + 'static) {
        let pending = self.pending.clone();
        let closure = Closure::wrap(Box::new(move |_ts: f64| {
            pending.set(None);
            handler();
        }) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(closure);
    }
}

impl TickSource for AnimationFrameClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn timestamp_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn arm(&mut self) {
        if self.pending.get().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            log::warn!("Frame handler not installed");
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.pending.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn is_armed(&self) -> bool {
        self.pending.get().is_some()
    }
}
