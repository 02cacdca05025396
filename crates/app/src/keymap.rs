//! Keypad key names to command-table actions.

use std::collections::BTreeMap;

use mediacenter_domain::action::Action;
use mediacenter_domain::error::ValidationError;

/// Layout of the numeric keypad mounted next to the media center.
pub const DEFAULT_BINDINGS: [(&str, Action); 12] = [
    ("KEY_KP7", Action::TvOn),
    ("KEY_KP4", Action::TvOff),
    ("KEY_KP8", Action::TurntableOn),
    ("KEY_KP5", Action::TurntableOff),
    ("KEY_KP9", Action::StreamingOn),
    ("KEY_KP6", Action::StreamingOff),
    ("KEY_KPMINUS", Action::PrinterOn),
    ("KEY_KPPLUS", Action::PrinterOff),
    ("KEY_KPENTER", Action::Off),
    ("KEY_KP1", Action::VolumeUp),
    ("KEY_KP0", Action::VolumeDown),
    ("KEY_ESC", Action::Shutdown),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<String, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .into_iter()
                .map(|(key, action)| (key.to_string(), action))
                .collect(),
        }
    }
}

impl Keymap {
    /// Default layout with `overrides` (key name to action name) applied on top.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAction`] for an override naming an
    /// action outside the command table.
    pub fn with_overrides<I, K, V>(overrides: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut keymap = Self::default();
        for (key, action) in overrides {
            keymap.bind(key, action.as_ref().parse()?);
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, key: impl Into<String>, action: Action) {
        self.bindings.insert(key.into(), action);
    }

    /// Action bound to `key`; `None` for keys the layout leaves free.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, Action)> {
        self.bindings.iter().map(|(key, action)| (key.as_str(), *action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_default_layout() {
        let keymap = Keymap::default();
        assert_eq!(keymap.resolve("KEY_KP7"), Some(Action::TvOn));
        assert_eq!(keymap.resolve("KEY_KPENTER"), Some(Action::Off));
        assert_eq!(keymap.resolve("KEY_ESC"), Some(Action::Shutdown));
        assert_eq!(keymap.bindings().count(), 12);
    }

    #[test]
    fn should_leave_unmapped_keys_unresolved() {
        let keymap = Keymap::default();
        assert_eq!(keymap.resolve("KEY_KP2"), None);
        assert_eq!(keymap.resolve("KEY_NUMLOCK"), None);
    }

    #[test]
    fn should_apply_overrides_on_top_of_defaults() {
        let keymap =
            Keymap::with_overrides([("KEY_KP2", "volume_up"), ("KEY_KP1", "printer_on")]).unwrap();

        assert_eq!(keymap.resolve("KEY_KP2"), Some(Action::VolumeUp));
        assert_eq!(keymap.resolve("KEY_KP1"), Some(Action::PrinterOn));
        assert_eq!(keymap.resolve("KEY_KP7"), Some(Action::TvOn));
    }

    #[test]
    fn should_reject_override_with_unknown_action() {
        let err = Keymap::with_overrides([("KEY_KP2", "self_destruct")]).unwrap_err();
        assert_eq!(err, ValidationError::UnknownAction("self_destruct".to_string()));
    }
}
