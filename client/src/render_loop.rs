use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Coalesces repaint requests into one `requestAnimationFrame` callback.
///
/// Hover and selection can change several times between frames; the map is
/// painted at most once per vsync with whatever state is current then.
pub struct RepaintScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl RepaintScheduler {
    pub fn new(paint: impl Fn() + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            pending: Cell::new(None),
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            inner_cb.pending.set(None);
            paint();
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Ask for a repaint on the next frame. No-op if one is already queued.
    pub fn request(&self) {
        if self.inner.pending.get().is_some() {
            return;
        }
        let Some(window) = self.inner.window.as_ref() else {
            return;
        };
        let cb_ref = self.inner.callback.borrow();
        let Some(cb) = cb_ref.as_ref() else {
            return;
        };
        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            self.inner.pending.set(Some(id));
        }
    }
}

impl Drop for RepaintScheduler {
    fn drop(&mut self) {
        if let Some(id) = self.inner.pending.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(id);
        }
        // Break the callback->inner reference cycle on teardown.
        self.inner.callback.borrow_mut().take();
    }
}
