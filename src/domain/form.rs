//! User-entered export parameters
//!
//! The same five fields are posted as the body of both `/download` and
//! `/fetch-all-data`.

use super::errors::GeodocError;
use super::ids::CompanyId;
use super::result::Result;
use serde::{Deserialize, Serialize};

/// Export request form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportForm {
    pub company_id: String,

    /// Base directory on the backend host where results are written
    pub custom_path: String,

    pub start_range: String,
    pub end_range: String,

    /// Folder view
    pub is_checked: bool,
}

impl ExportForm {
    /// Validates the form before it is submitted
    ///
    /// All text fields are required and both range bounds must be
    /// non-negative integers ([`GeodocError::InvalidInput`]). An inverted
    /// range is a [`GeodocError::Validation`] error.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("companyId", &self.company_id),
            ("customPath", &self.custom_path),
            ("startRange", &self.start_range),
            ("endRange", &self.end_range),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GeodocError::InvalidInput(format!("{field} is required")));
            }
        }

        let start = parse_bound("startRange", &self.start_range)?;
        let end = parse_bound("endRange", &self.end_range)?;
        if start > end {
            return Err(GeodocError::Validation(format!(
                "startRange ({start}) must not be greater than endRange ({end})"
            )));
        }
        Ok(())
    }

    /// The validated company id used as the root path segment
    pub fn company_id(&self) -> Result<CompanyId> {
        CompanyId::new(self.company_id.trim()).map_err(GeodocError::InvalidInput)
    }

    /// Clears every user-entered field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_bound(field: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        GeodocError::InvalidInput(format!(
            "{field} must be a non-negative integer, got '{value}'"
        ))
    })
}
