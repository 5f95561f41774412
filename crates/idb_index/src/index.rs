//! Typed handles into the interface database.
//!
//! Every entity kind lives in its own index space. A handle is a one-based
//! position in that kind's table; the raw value `0` is reserved and never
//! names an entity, so `from_raw(0)` always resolves to nothing.

use core::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

/// Operations shared by every handle kind.
pub trait Handle: Copy + Eq + Display {
    /// Name of the index space, for diagnostics.
    const KIND: &'static str;

    fn from_slot(slot: usize) -> Self;
    fn slot(self) -> Option<usize>;
    fn raw(self) -> u32;
}

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// The reserved "nothing" handle.
            pub const NONE: Self = Self(0);

            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Handle for the zero-based table position `slot`.
            #[inline]
            pub fn from_slot(slot: usize) -> Self {
                Self(u32::try_from(slot).map_or(0, |slot| slot.saturating_add(1)))
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }

            /// Zero-based table position, `None` for the reserved handle.
            #[inline]
            pub fn slot(self) -> Option<usize> {
                self.0.checked_sub(1).map(|slot| slot as usize)
            }

            /// Shifts a module-local handle by `base` table positions.
            #[inline]
            pub fn offset(self, base: usize) -> Option<Self> {
                let slot = self.slot()?.checked_add(base)?;
                Some(Self::from_slot(slot))
            }
        }

        impl Handle for $name {
            const KIND: &'static str = $tag;

            #[inline]
            fn from_slot(slot: usize) -> Self {
                $name::from_slot(slot)
            }

            #[inline]
            fn slot(self) -> Option<usize> {
                $name::slot(self)
            }

            #[inline]
            fn raw(self) -> u32 {
                $name::raw(self)
            }
        }

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                write!(f, "{}#{}", $tag, self.0)
            }
        }
    };
}

define_index!(
    /// Handle of a named compile-time constant.
    ManifestIndex,
    "manifest"
);
define_index!(
    /// Handle of a data member or global variable.
    ElementIndex,
    "element"
);
define_index!(
    /// Handle of any type known to the database, wrapped types included.
    TypeIndex,
    "type"
);
define_index!(
    /// Handle of a logical function; overloads share a name but not a handle.
    FunctionIndex,
    "function"
);
define_index!(
    /// Handle of one callable variant of a function.
    WrapperIndex,
    "wrapper"
);
define_index!(MakeSeqIndex, "make_seq");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_handle_has_no_slot() {
        assert!(TypeIndex::NONE.is_none());
        assert_eq!(TypeIndex::from_raw(0).slot(), None);
        assert_eq!(TypeIndex::default(), TypeIndex::NONE);
    }

    #[test]
    fn slots_are_one_based() {
        let index = FunctionIndex::from_slot(0);
        assert_eq!(index.raw(), 1);
        assert_eq!(index.slot(), Some(0));
        assert_eq!(index.offset(10), Some(FunctionIndex::from_raw(11)));
        assert_eq!(FunctionIndex::NONE.offset(10), None);
    }

    #[test]
    fn display_names_the_namespace() {
        assert_eq!(WrapperIndex::from_raw(7).to_string(), "wrapper#7");
        assert_eq!(MakeSeqIndex::from_raw(2).to_string(), "make_seq#2");
    }
}
