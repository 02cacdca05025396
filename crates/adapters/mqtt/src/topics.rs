//! Topic layout.
//!
//! Discovery configs go to `<discovery_prefix>/<component>/<unique_id>/config`,
//! entity state to `<base>/<object_id>/state`, and Home Assistant sends
//! commands on `<base>/<object_id>/set`.

use mediacenter_app::ports::home_assistant::{EntityDescriptor, EntityKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    discovery_prefix: String,
    base: String,
}

impl Topics {
    pub fn new(discovery_prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            discovery_prefix: discovery_prefix.into(),
            base: base.into(),
        }
    }

    #[must_use]
    pub fn discovery(&self, entity: &EntityDescriptor) -> String {
        format!(
            "{}/{}/{}/config",
            self.discovery_prefix,
            entity.key.component().as_str(),
            entity.unique_id
        )
    }

    #[must_use]
    pub fn state(&self, key: EntityKey) -> String {
        format!("{}/{key}/state", self.base)
    }

    #[must_use]
    pub fn command(&self, key: EntityKey) -> String {
        format!("{}/{key}/set", self.base)
    }

    /// Subscription filter matching every command topic.
    #[must_use]
    pub fn command_filter(&self) -> String {
        format!("{}/+/set", self.base)
    }

    /// Entity a command topic addresses, `None` for any other topic.
    #[must_use]
    pub fn parse_command(&self, topic: &str) -> Option<EntityKey> {
        topic
            .strip_prefix(self.base.as_str())?
            .strip_prefix('/')?
            .strip_suffix("/set")?
            .parse()
            .ok()
    }
}
