//! Result type alias for geodoc

use super::errors::GeodocError;

/// Result type alias for geodoc operations
///
/// # Examples
///
/// ```
/// use geodoc::domain::result::Result;
/// use geodoc::domain::errors::GeodocError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GeodocError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeodocError>;
