use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-issued identifiers are opaque strings (`"Actor.abc"`,
/// `"Compendium.pf2e.feats-srd.Item.xyz"`), so these wrap `String` rather
/// than `Uuid`.
macro_rules! define_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_ref!(
    /// Identity of an actor document in the host store.
    ActorId
);
define_ref!(
    /// Identity of an item embedded in an actor (feat, spell, entry).
    ItemId
);
define_ref!(
    /// Resolvable reference to a compendium document.
    DocumentRef
);
