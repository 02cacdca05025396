//! Key-down extraction from evdev events.

use evdev::{EventSummary, InputEvent, KeyCode};

const KEY_DOWN: i32 = 1;

/// Name of the key pressed by `event` (`KEY_KP7`, `KEY_ESC`, …).
///
/// Returns `None` for anything but a key-down: releases, autorepeat,
/// non-key events and `KEY_NUMLOCK`, which the keypad sends on its own.
#[must_use]
pub fn key_press(event: &InputEvent) -> Option<String> {
    let EventSummary::Key(_, code, KEY_DOWN) = event.destructure() else {
        return None;
    };
    if code == KeyCode::KEY_NUMLOCK {
        return None;
    }
    let name = format!("{code:?}");
    name.starts_with("KEY_").then_some(name)
}
