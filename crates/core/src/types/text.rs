//! Length-bounded text columns.
//!
//! Every free-text column in the schema has a maximum length, and the
//! registration form enforces the same limits. The types here are the single
//! place those limits live.
//!
//! Parsing trims surrounding whitespace and counts characters, not bytes, so
//! `"Zürich"` is six characters long.

/// Errors that can occur when parsing bounded text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The input is empty or only whitespace.
    #[error("value cannot be empty")]
    Empty,
    /// The input is longer than the column allows.
    #[error("value must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// Macro to define a length-bounded, non-empty text wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `parse()` that trims, rejects empty input, and enforces `MAX_LENGTH`
/// - `Display`, `AsRef<str>`, `FromStr`, transparent serde
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `sqlite` feature)
///
/// # Example
///
/// ```rust
/// # use registration_core::define_bounded_text;
/// define_bounded_text!(Nickname, 8);
///
/// assert!(Nickname::parse("  ace ").is_ok());
/// assert!(Nickname::parse("far-too-long").is_err());
/// ```
#[macro_export]
macro_rules! define_bounded_text {
    ($name:ident, $max:expr) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters.
            pub const MAX_LENGTH: usize = $max;

            /// Parse from user input.
            ///
            /// # Errors
            ///
            /// Returns `TextError::Empty` for blank input and
            /// `TextError::TooLong` when the trimmed input exceeds `MAX_LENGTH`.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::TextError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::TextError::Empty);
                }
                if trimmed.chars().count() > Self::MAX_LENGTH {
                    return Err($crate::TextError::TooLong {
                        max: Self::MAX_LENGTH,
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the text as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::TextError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "sqlite")]
        impl ::sqlx::Type<::sqlx::Sqlite> for $name {
            fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
                <String as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &::sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Sqlite> for $name {
            fn decode(
                value: ::sqlx::sqlite::SqliteValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <String as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
                // Database values are assumed valid
                Ok(Self(s))
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'q> ::sqlx::Encode<'q, ::sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <::sqlx::Sqlite as ::sqlx::Database>::ArgumentBuffer<'q>,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<'q, ::sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_bounded_text!(PersonName, 70);
define_bounded_text!(AddressLine, 256);
define_bounded_text!(CityName, 50);
define_bounded_text!(StateName, 10);
// Longest official country name is 163 characters.
define_bounded_text!(CountryName, 256);
