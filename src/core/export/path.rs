//! Output path derivation
//!
//! Every merged document lands at
//! `company_<companyId>/project_<projectId>/estimate_<estimateId>/<fileName>`
//! below the user's custom base path.

use crate::domain::{GeodocError, OutputPath, Result};
use std::fmt::Display;

/// Derive the output path for one export unit
///
/// Pure: the same four inputs always yield the same path. Two units only
/// share a path when their file names collide under the same estimate; see
/// [`crate::core::export::join::path_collisions`].
///
/// # Errors
///
/// Returns [`GeodocError::InvalidInput`] if any segment is empty or
/// whitespace-only, since an empty segment silently collapses a level of the
/// hierarchy.
///
/// # Examples
///
/// ```
/// use geodoc::core::export::path::resolve;
///
/// let path = resolve("9", 1, 10, "a.pdf").unwrap();
/// assert_eq!(path.as_str(), "company_9/project_1/estimate_10/a.pdf");
/// assert!(resolve("9", 1, 10, "").is_err());
/// ```
pub fn resolve(
    company_id: impl Display,
    project_id: impl Display,
    estimate_id: impl Display,
    file_name: impl Display,
) -> Result<OutputPath> {
    let company_id = segment("companyId", company_id)?;
    let project_id = segment("projectId", project_id)?;
    let estimate_id = segment("estimateId", estimate_id)?;
    let file_name = segment("fileName", file_name)?;

    Ok(OutputPath::from_resolved(format!(
        "company_{company_id}/project_{project_id}/estimate_{estimate_id}/{file_name}"
    )))
}

fn segment(field: &str, value: impl Display) -> Result<String> {
    let value = value.to_string();
    if value.trim().is_empty() {
        return Err(GeodocError::InvalidInput(format!(
            "{field} cannot be empty when deriving an output path"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EstimateId, ProjectId};
    use test_case::test_case;

    #[test_case("9", "1", "10", "a.pdf", "company_9/project_1/estimate_10/a.pdf" ; "single unit")]
    #[test_case("acme", "7", "3", "plan v2.pdf", "company_acme/project_7/estimate_3/plan v2.pdf" ; "spaces kept verbatim")]
    #[test_case("1", "2", "3", "drawing.PDF", "company_1/project_2/estimate_3/drawing.PDF" ; "case preserved")]
    fn test_resolve_template(company: &str, project: &str, estimate: &str, file: &str, expected: &str) {
        assert_eq!(resolve(company, project, estimate, file).unwrap().as_str(), expected);
    }

    #[test_case("", "1", "10", "a.pdf" ; "empty company")]
    #[test_case("9", "", "10", "a.pdf" ; "empty project")]
    #[test_case("9", "1", "", "a.pdf" ; "empty estimate")]
    #[test_case("9", "1", "10", "" ; "empty file name")]
    #[test_case("9", "1", "10", "   " ; "whitespace file name")]
    fn test_resolve_rejects_empty(company: &str, project: &str, estimate: &str, file: &str) {
        let result = resolve(company, project, estimate, file);
        assert!(matches!(result, Err(GeodocError::InvalidInput(_))));
    }

    #[test]
    fn test_resolve_is_pure() {
        let first = resolve("9", ProjectId::new(1), EstimateId::new(10), "a.pdf").unwrap();
        let second = resolve("9", ProjectId::new(1), EstimateId::new(10), "a.pdf").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_triples_distinct_paths() {
        let a = resolve("9", 1, 10, "a.pdf").unwrap();
        let b = resolve("9", 1, 11, "a.pdf").unwrap();
        let c = resolve("9", 2, 10, "a.pdf").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
