//! Typed ID wrappers providing compile-time safety for library identifiers.
//!
//! Each ID type is a newtype over the SQLite integer row id, preventing
//! accidental misuse (e.g., passing an `AlbumId` where a `SongId` is
//! expected). Parsing only accepts plain decimal digits, so an ID that made it
//! through [`FromStr`] is always safe to use as a directory name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a valid library identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidId(pub String);

/// Generate a newtype ID wrapper over `i64`.
///
/// The macro produces a struct with:
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` (digits only)
/// - `From<i64>` and `Into<i64>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Return the inner row id.
                #[must_use]
                pub fn get(&self) -> i64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = InvalidId;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(InvalidId(s.to_string()));
                    }
                    s.parse::<i64>()
                        .map(Self)
                        .map_err(|_| InvalidId(s.to_string()))
                }
            }

            impl From<i64> for $name {
                fn from(id: i64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for i64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Identifier for a song.
    SongId,
    /// Identifier for an album.
    AlbumId,
    /// Identifier for an artist.
    ArtistId,
    /// Identifier for a genre.
    GenreId,
}
