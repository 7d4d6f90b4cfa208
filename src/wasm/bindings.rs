//! JavaScript bindings for the page
//!
//! [`PageSession`] is the JSON-in/JSON-out surface a browser host talks to.
//! It compiles on every platform so it can be tested natively; the
//! wasm-bindgen wrapper [`PageHandle`] only exists on wasm32.

use std::cell::RefCell;

use crate::models::ProjectUpdate;
use crate::page::{Effect, Host, InputEvent, Page, PageOptions};
use crate::store::{ProjectQuery, ProjectStore};
use crate::{Error, Result};

/// A page plus a guard against re-entrant calls.
///
/// Host callbacks (confirmation, bounds) run while an event is being
/// handled; a callback that calls back into the session gets an error
/// instead of a second mutable borrow.
#[derive(Debug)]
pub struct PageSession {
    page: RefCell<Page>,
}

impl PageSession {
    pub fn new(store: ProjectStore, options: PageOptions) -> Self {
        Self {
            page: RefCell::new(Page::new(store, options)),
        }
    }

    /// Session over a JSON dataset, or the bundled one when `dataset` is `None`.
    pub fn from_json(dataset: Option<&str>, options: PageOptions) -> Result<Self> {
        let store = match dataset {
            Some(json) => ProjectStore::from_json(json)?,
            None => ProjectStore::bundled()?,
        };
        Ok(Self::new(store, options))
    }

    fn busy() -> Error {
        Error::Other("page is busy: re-entrant call from a host callback".to_string())
    }

    pub fn handle(&self, event: InputEvent, host: &mut dyn Host) -> Result<Vec<Effect>> {
        let mut page = self.page.try_borrow_mut().map_err(|_| Self::busy())?;
        page.handle(event, host)
    }

    /// Handle one JSON event and return the effects as a JSON array.
    pub fn handle_json(&self, event: &str, host: &mut dyn Host) -> Result<String> {
        let event: InputEvent = serde_json::from_str(event)?;
        let effects = self.handle(event, host)?;
        Ok(serde_json::to_string(&effects)?)
    }

    pub fn render_html(&self) -> Result<String> {
        let page = self.page.try_borrow().map_err(|_| Self::busy())?;
        Ok(page.to_html())
    }

    pub fn summary_json(&self) -> Result<String> {
        let page = self.page.try_borrow().map_err(|_| Self::busy())?;
        Ok(serde_json::to_string(&page.cards().summary())?)
    }

    /// Run a store query given as JSON (all fields optional).
    pub fn query_json(&self, query: &str) -> Result<String> {
        let query: ProjectQuery = if query.trim().is_empty() {
            ProjectQuery::default()
        } else {
            serde_json::from_str(query)?
        };
        let page = self.page.try_borrow().map_err(|_| Self::busy())?;
        Ok(serde_json::to_string(&page.store().query(&query))?)
    }

    pub fn stats_json(&self) -> Result<String> {
        let page = self.page.try_borrow().map_err(|_| Self::busy())?;
        Ok(serde_json::to_string(&page.store().stats())?)
    }

    /// Apply a JSON patch to a store record and return the updated record.
    pub fn update_json(&self, id: &str, patch: &str) -> Result<String> {
        let patch: ProjectUpdate = serde_json::from_str(patch)?;
        let mut page = self.page.try_borrow_mut().map_err(|_| Self::busy())?;
        let project = page.store_mut().update(id, patch)?;
        Ok(serde_json::to_string(project)?)
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod js {
    use std::cell::RefCell;

    use js_sys::{Array, Function};
    use wasm_bindgen::prelude::*;

    use super::PageSession;
    use crate::cards::CardKey;
    use crate::page::{Bounds, Host, PageOptions};

    /// Host backed by JavaScript callbacks.
    #[derive(Default)]
    struct JsHost {
        confirm: Option<Function>,
        bounds: Option<Function>,
        share: bool,
        viewport_height: Option<f64>,
    }

    impl Host for JsHost {
        fn confirm(&mut self, message: &str) -> bool {
            self.confirm
                .as_ref()
                .and_then(|f| f.call1(&JsValue::NULL, &JsValue::from_str(message)).ok())
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        }

        fn supports_share(&self) -> bool {
            self.share
        }

        fn card_bounds(&self, card: CardKey) -> Option<Bounds> {
            let value = self
                .bounds
                .as_ref()?
                .call1(&JsValue::NULL, &JsValue::from(card.0))
                .ok()?;
            let pair = Array::from(&value);
            Some(Bounds {
                top: pair.get(0).as_f64()?,
                bottom: pair.get(1).as_f64()?,
            })
        }

        fn viewport_height(&self) -> f64 {
            self.viewport_height.unwrap_or(f64::INFINITY)
        }
    }

    fn to_js(e: crate::Error) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    #[wasm_bindgen]
    pub struct PageHandle {
        session: PageSession,
        host: RefCell<JsHost>,
    }

    #[wasm_bindgen]
    impl PageHandle {
        /// Build a page over a JSON dataset, or the bundled one when omitted.
        #[wasm_bindgen(constructor)]
        pub fn new(dataset: Option<String>) -> Result<PageHandle, JsValue> {
            super::super::init_panic_hook();
            let session = PageSession::from_json(dataset.as_deref(), PageOptions::default()).map_err(to_js)?;
            Ok(PageHandle {
                session,
                host: RefCell::new(JsHost::default()),
            })
        }

        /// `confirm(message) -> bool`, called for destructive actions.
        #[wasm_bindgen(js_name = setConfirm)]
        pub fn set_confirm(&self, callback: Function) -> Result<(), JsValue> {
            self.host_mut()?.confirm = Some(callback);
            Ok(())
        }

        /// `bounds(card) -> [top, bottom]`, used to decide scroll-into-view.
        #[wasm_bindgen(js_name = setBounds)]
        pub fn set_bounds(&self, callback: Function) -> Result<(), JsValue> {
            self.host_mut()?.bounds = Some(callback);
            Ok(())
        }

        #[wasm_bindgen(js_name = setShareSupported)]
        pub fn set_share_supported(&self, supported: bool) -> Result<(), JsValue> {
            self.host_mut()?.share = supported;
            Ok(())
        }

        #[wasm_bindgen(js_name = setViewportHeight)]
        pub fn set_viewport_height(&self, height: f64) -> Result<(), JsValue> {
            self.host_mut()?.viewport_height = Some(height);
            Ok(())
        }

        /// Handle one JSON event; returns the effects as a JSON array.
        pub fn handle(&self, event: &str) -> Result<String, JsValue> {
            let mut host = self.host_mut()?;
            self.session.handle_json(event, &mut *host).map_err(to_js)
        }

        pub fn render(&self) -> Result<String, JsValue> {
            self.session.render_html().map_err(to_js)
        }

        pub fn summary(&self) -> Result<String, JsValue> {
            self.session.summary_json().map_err(to_js)
        }

        pub fn query(&self, query: &str) -> Result<String, JsValue> {
            self.session.query_json(query).map_err(to_js)
        }

        pub fn stats(&self) -> Result<String, JsValue> {
            self.session.stats_json().map_err(to_js)
        }

        pub fn update(&self, id: &str, patch: &str) -> Result<String, JsValue> {
            self.session.update_json(id, patch).map_err(to_js)
        }
    }

    impl PageHandle {
        fn host_mut(&self) -> Result<std::cell::RefMut<'_, JsHost>, JsValue> {
            self.host
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("page is busy: re-entrant call from a host callback"))
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use js::PageHandle;
