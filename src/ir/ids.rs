//! Newtype IDs for the records emitted into the COCO document.
//!
//! Image and annotation ids are zero-based counters. Category ids are the
//! registry's zero-based id shifted by one, since COCO reserves 0.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier of an image record.
    ImageId
);
define_id!(
    /// Identifier of an annotation record, unique across the whole run.
    AnnotationId
);
define_id!(
    /// Identifier of a category record as written to COCO (1-based).
    CategoryId
);

impl CategoryId {
    /// Maps a zero-based registry id onto the emitted COCO id.
    #[inline]
    pub fn from_registry(registry_id: u64) -> Self {
        Self(registry_id + 1)
    }
}

/// Hands out dense sequential ids starting at zero.
#[derive(Clone, Debug, Default)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value and advances the counter.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}
