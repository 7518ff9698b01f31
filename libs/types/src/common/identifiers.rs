//! # Typed Identifiers
//!
//! Zero-cost wrappers that keep pool ids and denoms from being confused with
//! other integers and strings.
//!
//! ```rust
//! use gamm_types::{Denom, PoolId};
//!
//! let pool = PoolId::new(1);
//! let uosmo = Denom::new("uosmo")?;
//! let ibc = Denom::new("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2")?;
//! # Ok::<(), gamm_types::ValidationError>(())
//! ```

use crate::common::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Macro for generating zero-cost typed u64 identifiers
///
/// # Examples
///
/// ```rust
/// use gamm_types::define_typed_id;
///
/// define_typed_id!(
///     /// Gauge identifier
///     GaugeId
/// );
///
/// let gauge = GaugeId::new(7);
/// assert_eq!(gauge.inner(), 7);
/// ```
#[macro_export]
macro_rules! define_typed_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new typed ID
            #[inline(always)]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Create a new typed ID, rejecting zero
            #[inline]
            pub fn new_validated(id: u64) -> Result<Self, $crate::common::errors::ValidationError> {
                if id == 0 {
                    return Err($crate::common::errors::ValidationError::NullId);
                }
                Ok(Self(id))
            }

            /// Extract the inner u64 value
            #[inline(always)]
            pub const fn inner(&self) -> u64 {
                self.0
            }

            /// Check if this is a null/zero ID
            #[inline(always)]
            pub fn is_null(&self) -> bool {
                self.0 == 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<u64> for $name {
            #[inline(always)]
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            #[inline(always)]
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        // Serializes as raw u64
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <u64 as serde::Deserialize>::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_typed_id!(
    /// On-chain pool number
    PoolId
);

/// Maximum denom length accepted by the chain's bank module
pub const MAX_DENOM_LEN: usize = 128;

/// Validated asset denomination (`uosmo`, `uion`, `ibc/<hash>`, `gamm/pool/1`)
///
/// Grammar: starts with an ASCII letter, followed by 2 to 127 characters from
/// letters, digits, `/`, `:`, `.`, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denom(String);

impl Denom {
    pub fn new(denom: impl Into<String>) -> Result<Self, ValidationError> {
        let denom = denom.into();
        if denom.is_empty() {
            return Err(ValidationError::EmptyDenom);
        }
        let first = denom.as_bytes()[0];
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::InvalidDenom {
                denom,
                reason: "must start with a letter",
            });
        }
        if denom.len() < 3 || denom.len() > MAX_DENOM_LEN {
            return Err(ValidationError::InvalidDenom {
                denom,
                reason: "length must be between 3 and 128",
            });
        }
        if !denom
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'))
        {
            return Err(ValidationError::InvalidDenom {
                denom,
                reason: "contains a character outside [a-zA-Z0-9/:._-]",
            });
        }
        Ok(Self(denom))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Denom {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Denom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Denom {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Denom {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Denom::new(s).map_err(serde::de::Error::custom)
    }
}
