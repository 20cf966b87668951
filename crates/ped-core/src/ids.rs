//! Typed indices into the floor grid and the scenario tables.
//!
//! Each ID wraps the narrowest integer that fits its table; `index()` widens
//! it back for `Vec` lookups and `TryFrom<usize>` narrows a table length into
//! the next free ID.

use std::fmt;

macro_rules! index_id {
    ($($(#[$doc:meta])* $name:ident: $repr:ty;)+) => {$(
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $repr);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(position: usize) -> Result<Self, Self::Error> {
                <$repr>::try_from(position).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    )+};
}

index_id! {
    /// A floor cell, numbered row-major from the grid origin.
    CellId: u32;
    /// An activity or main station, in registration order.
    ActivityId: u16;
    /// A sequence, in registration order.
    SequenceId: u16;
}
