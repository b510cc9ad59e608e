//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in a plant has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered), so iteration over ID-keyed maps follows creation order
//! closely and ID generation never needs a central counter.
//!
//! IDs are assigned once at plant construction and never change; the
//! signal graph and the action adaptor both address slots through them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a plant (top-level simulation unit).
    PlantId
}

define_id! {
    /// Unique identifier for a module (named group of components).
    ModuleId
}

define_id! {
    /// Unique identifier for a component (named group of slots).
    ComponentId
}

define_id! {
    /// Unique identifier for a slot (actuator, sensor, or buffer state).
    SlotId
}

define_id! {
    /// Unique identifier for a learning agent interacting with a plant.
    AgentId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let slot = SlotId::new();
        let agent = AgentId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(slot.into_inner(), Uuid::nil());
        assert_ne!(agent.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = SlotId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<SlotId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = ComponentId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn v7_ids_are_time_ordered() {
        let first = SlotId::new();
        let second = SlotId::new();
        assert!(first <= second);
    }
}
