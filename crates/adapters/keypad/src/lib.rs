//! # mediacenter-adapter-keypad
//!
//! Reads key presses from a Linux input event device (the USB numeric keypad,
//! symlinked to `/dev/input/keypad` by a udev rule) through `evdev`, and
//! forwards the names of pressed keys (`KEY_KP7`, `KEY_ESC`, …) on an mpsc
//! channel.
//!
//! Only key-down events are forwarded; repeats, releases and `KEY_NUMLOCK`
//! are dropped. Mapping names to actions is the keymap's job, not this
//! crate's.
//!
//! ## Dependency rule
//!
//! Depends on `mediacenter-domain` only.

mod error;
mod event;
mod reader;

pub use error::KeypadError;
pub use event::key_press;
pub use reader::{DEFAULT_DEVICE, KeypadReader, forward_key_presses};
