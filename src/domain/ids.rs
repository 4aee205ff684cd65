//! Domain identifier types with validation
//!
//! Newtype wrappers keep project, estimate and file keys from being mixed up
//! during the join. Record keys are numeric on the wire; the company id is
//! free text typed by the user and must not be empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Company identifier newtype wrapper
///
/// The root segment of every output path.
///
/// # Examples
///
/// ```
/// use geodoc::domain::ids::CompanyId;
/// use std::str::FromStr;
///
/// let company = CompanyId::from_str("9").unwrap();
/// assert_eq!(company.as_str(), "9");
/// assert!(CompanyId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a new CompanyId, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Company ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the company ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompanyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw backend key
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw key
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| format!("Invalid {}: '{}' ({})", stringify!($name), s, e))
            }
        }
    };
}

record_id!(
    /// Project key (`geoProjects[].id`)
    ProjectId
);

record_id!(
    /// Estimate key (`geoEstimates[].id`)
    EstimateId
);

record_id!(
    /// File key (`geoFiles[].id`)
    FileId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_id_valid() {
        let id = CompanyId::new("acme").unwrap();
        assert_eq!(id.as_str(), "acme");
        assert_eq!(id.to_string(), "acme");
    }

    #[test]
    fn test_company_id_empty() {
        assert!(CompanyId::new("").is_err());
        assert!(CompanyId::new("   ").is_err());
    }

    #[test]
    fn test_record_ids_display_raw_value() {
        assert_eq!(ProjectId::new(1).to_string(), "1");
        assert_eq!(EstimateId::new(10).to_string(), "10");
        assert_eq!(FileId::new(-3).to_string(), "-3");
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!(ProjectId::from_str(" 42 ").unwrap(), ProjectId::new(42));
        assert!(FileId::from_str("abc").is_err());
    }

    #[test]
    fn test_record_id_serde_transparent() {
        let id: EstimateId = serde_json::from_str("10").unwrap();
        assert_eq!(id, EstimateId::new(10));
        assert_eq!(serde_json::to_string(&id).unwrap(), "10");
    }
}
