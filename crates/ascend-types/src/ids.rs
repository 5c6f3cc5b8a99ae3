//! Type-safe identifier wrappers.
//!
//! Runtime entities (players, journal transactions) carry UUID v7 wrappers
//! generated by [`define_id!`]. Talent content is authored by designers and
//! addressed by human-readable keys, so talents and branches use string
//! wrappers generated by [`define_key!`]. Both kinds are distinct types so
//! a branch id can never be passed where a talent id is expected.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates an id type for runtime entities such as players and journal
/// rows.
///
/// Fresh ids are UUID v7, so journal rows minted later sort later. A game
/// host that already names its players by UUID wraps that value with
/// `From<Uuid>` instead of minting a new one.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh time-ordered id.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The wrapped UUID, for handing back to the host.
            pub const fn as_uuid(self) -> Uuid {
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
            fn from(host_id: Uuid) -> Self {
                Self(host_id)
            }
        }
    };
}

/// Generates a newtype wrapper around [`String`] for authored content keys.
///
/// The wrapper implements [`Borrow<str>`] so maps keyed by it can be
/// queried with a plain `&str`.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from anything convertible into a [`String`].
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return whether the key is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(String::from(key))
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player whose talents the engine tracks.
    PlayerId
}

define_id! {
    /// Unique identifier for a talent journal transaction.
    TransactionId
}

define_key! {
    /// Authored identifier of a talent node, unique across all branches.
    TalentId
}

define_key! {
    /// Authored identifier of a talent branch (a themed subtree).
    BranchId
}
