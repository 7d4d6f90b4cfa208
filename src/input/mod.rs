//! Keyboard input: normalized key events and the dispatch table mapping
//! them to page commands.

pub mod dispatch;
pub mod keys;

pub use dispatch::{Binding, Command, FocusContext, Keymap, Scope};
pub use keys::{Key, KeyEvent, Modifiers};
