//! WASM module for driving the page from a browser
//!
//! The browser owns the real DOM; this module owns the state. JavaScript
//! forwards DOM events as JSON, applies the returned effects, and answers
//! host queries (confirmation, card bounds) through callbacks.
//!
//! ```text
//!  JavaScript                      WASM
//!  ----------                      ----
//!  DOM event  --- JSON event --->  PageHandle.handle()
//!                                     |  confirm()/bounds() callbacks
//!  apply      <-- JSON effects ---    v
//!  render()   <-- HTML ----------  Page::render()
//! ```
//!
//! # Usage
//!
//! Built with `wasm-pack build --target web --features wasm`:
//!
//! ```javascript
//! import init, { PageHandle } from './folio.js';
//!
//! await init();
//! const page = new PageHandle();
//! page.setConfirm((message) => window.confirm(message));
//! const effects = JSON.parse(page.handle('{"type":"key","key":"ArrowDown"}'));
//! ```

// Bindings module - the session works on all platforms, the wasm_bindgen
// handle only on wasm32
mod bindings;

pub use bindings::*;

/// Initialize WASM panic hook for better error messages in browser console
///
/// This should be called once at startup to convert Rust panics into
/// readable JavaScript errors with stack traces.
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
