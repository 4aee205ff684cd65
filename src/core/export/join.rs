//! Record join
//!
//! Rebuilds the project → estimate → file → annotation hierarchy from the
//! four flat record sets returned by the backend and flattens it into an
//! ordered sequence of export units.

use crate::core::export::path;
use crate::domain::{
    Annotation, CompanyId, Estimate, EstimateId, ExportUnit, FileId, FileRecord, OutputPath,
    Project, ProjectId,
};
use std::collections::{HashMap, HashSet};

/// Join flat record sets into export units
///
/// 1. File records without document content are dropped. A file whose name
///    is blank has no valid output path; its units are skipped and logged.
/// 2. For each project in input order, its estimates and surviving files are
///    taken in input order.
/// 3. Every (estimate, file) pair of a project yields one unit carrying the
///    annotations whose estimate and file keys both match, in input order.
///
/// The result holds exactly Σ |estimates(p)| × |surviving files(p)| units
/// over all projects. Empty inputs give an empty sequence; the join never
/// fails.
pub fn join(
    company_id: &CompanyId,
    projects: &[Project],
    files: &[FileRecord],
    estimates: &[Estimate],
    annotations: &[Annotation],
) -> Vec<ExportUnit> {
    let mut files_by_project: HashMap<ProjectId, Vec<&FileRecord>> = HashMap::new();
    let mut dropped = 0usize;
    for file in files {
        if file.has_document() {
            files_by_project.entry(file.geo_project_id).or_default().push(file);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped file records without exportable content");
    }

    let mut estimates_by_project: HashMap<ProjectId, Vec<&Estimate>> = HashMap::new();
    for estimate in estimates {
        estimates_by_project
            .entry(estimate.geo_project_id)
            .or_default()
            .push(estimate);
    }

    let mut overlays_by_pair: HashMap<(EstimateId, FileId), Vec<&Annotation>> = HashMap::new();
    for annotation in annotations {
        overlays_by_pair
            .entry((annotation.geo_estimate_id, annotation.file_id))
            .or_default()
            .push(annotation);
    }

    let mut units = Vec::new();
    for project in projects {
        let (Some(project_estimates), Some(project_files)) = (
            estimates_by_project.get(&project.id),
            files_by_project.get(&project.id),
        ) else {
            continue;
        };

        for estimate in project_estimates {
            for file in project_files {
                let Some(document) = file.document.clone() else {
                    continue;
                };

                let output_path =
                    match path::resolve(company_id, project.id, estimate.id, &file.name) {
                        Ok(p) => p,
                        Err(e) => {
                            tracing::warn!(
                                project_id = %project.id,
                                estimate_id = %estimate.id,
                                file_id = %file.id,
                                error = %e,
                                "Skipping unit with unresolvable output path"
                            );
                            continue;
                        }
                    };

                let overlays = overlays_by_pair
                    .get(&(estimate.id, file.id))
                    .map(|found| found.iter().map(|a| (*a).clone()).collect())
                    .unwrap_or_default();

                units.push(ExportUnit {
                    project_id: project.id,
                    estimate_id: estimate.id,
                    file_id: file.id,
                    document,
                    overlays,
                    output_path,
                    display_name: file.name.clone(),
                });
            }
        }
    }

    tracing::debug!(
        projects = projects.len(),
        units = units.len(),
        "Joined records into export units"
    );

    units
}

/// Output paths claimed by more than one unit
///
/// Units are processed in order, so the last unit with a given path wins at
/// the backend. Returned in order of first occurrence, each path once.
pub fn path_collisions(units: &[ExportUnit]) -> Vec<OutputPath> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut collisions = Vec::new();

    for unit in units {
        if !seen.insert(&unit.output_path) && reported.insert(&unit.output_path) {
            collisions.push(unit.output_path.clone());
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentContent;

    fn company() -> CompanyId {
        CompanyId::new("9").unwrap()
    }

    fn project(id: i64) -> Project {
        Project {
            id: ProjectId::new(id),
            company_id: Some("9".to_string()),
        }
    }

    fn estimate(id: i64, project: i64) -> Estimate {
        Estimate {
            id: EstimateId::new(id),
            geo_project_id: ProjectId::new(project),
        }
    }

    fn file(id: i64, project: i64, name: &str) -> FileRecord {
        FileRecord {
            id: FileId::new(id),
            geo_project_id: ProjectId::new(project),
            name: name.to_string(),
            document: Some(DocumentContent::from_bytes(b"%PDF-1.7")),
        }
    }

    fn annotation(estimate: i64, file: i64, markup: &str) -> Annotation {
        Annotation {
            geo_estimate_id: EstimateId::new(estimate),
            file_id: FileId::new(file),
            overlay_markup: markup.to_string(),
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_sequence() {
        assert!(join(&company(), &[], &[], &[], &[]).is_empty());
    }

    #[test]
    fn test_cross_product_per_project() {
        let projects = [project(1), project(2)];
        let estimates = [estimate(10, 1), estimate(11, 1), estimate(20, 2)];
        let files = [
            file(100, 1, "a.pdf"),
            file(101, 1, "b.pdf"),
            file(102, 1, "c.pdf"),
            file(200, 2, "d.pdf"),
        ];

        let units = join(&company(), &projects, &files, &estimates, &[]);
        // 2 estimates × 3 files + 1 estimate × 1 file
        assert_eq!(units.len(), 7);
    }

    #[test]
    fn test_order_is_project_then_estimate_then_file() {
        let projects = [project(2), project(1)];
        let estimates = [estimate(10, 1), estimate(20, 2), estimate(11, 1)];
        let files = [file(101, 1, "b.pdf"), file(100, 1, "a.pdf"), file(200, 2, "d.pdf")];

        let units = join(&company(), &projects, &files, &estimates, &[]);
        let order: Vec<(i64, i64)> = units
            .iter()
            .map(|u| (u.estimate_id.get(), u.file_id.get()))
            .collect();
        assert_eq!(
            order,
            vec![(20, 200), (10, 101), (10, 100), (11, 101), (11, 100)]
        );
    }

    #[test]
    fn test_overlays_match_both_keys_in_order() {
        let annotations = [
            annotation(10, 100, "first"),
            annotation(11, 100, "other estimate"),
            annotation(10, 101, "other file"),
            annotation(10, 100, "second"),
        ];
        let units = join(
            &company(),
            &[project(1)],
            &[file(100, 1, "a.pdf")],
            &[estimate(10, 1)],
            &annotations,
        );

        assert_eq!(units.len(), 1);
        let markups: Vec<&str> = units[0]
            .overlays
            .iter()
            .map(|a| a.overlay_markup.as_str())
            .collect();
        assert_eq!(markups, vec!["first", "second"]);
    }

    #[test]
    fn test_files_without_content_never_exported() {
        let mut empty = file(100, 1, "a.pdf");
        empty.document = Some(DocumentContent::new(""));
        let mut missing = file(101, 1, "b.pdf");
        missing.document = None;
        let annotations = [annotation(10, 100, "<xfdf/>"), annotation(10, 101, "<xfdf/>")];

        let units = join(
            &company(),
            &[project(1)],
            &[empty, missing],
            &[estimate(10, 1)],
            &annotations,
        );
        assert!(units.is_empty());
    }

    #[test]
    fn test_blank_file_name_units_are_skipped() {
        let files = [file(100, 1, "a.pdf"), file(101, 1, "  "), file(102, 1, "c.pdf")];
        let units = join(
            &company(),
            &[project(1)],
            &files,
            &[estimate(10, 1), estimate(11, 1)],
            &[],
        );

        let names: Vec<&str> = units.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf", "a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_foreign_project_records_are_ignored() {
        let units = join(
            &company(),
            &[project(1)],
            &[file(100, 2, "a.pdf")],
            &[estimate(10, 1)],
            &[],
        );
        assert!(units.is_empty());
    }

    #[test]
    fn test_path_collisions_reported_once() {
        let units = join(
            &company(),
            &[project(1)],
            &[file(100, 1, "a.pdf"), file(101, 1, "a.pdf"), file(102, 1, "a.pdf")],
            &[estimate(10, 1)],
            &[],
        );
        let collisions = path_collisions(&units);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].as_str(), "company_9/project_1/estimate_10/a.pdf");
    }

    #[test]
    fn test_no_collisions_for_distinct_names() {
        let units = join(
            &company(),
            &[project(1)],
            &[file(100, 1, "a.pdf"), file(101, 1, "b.pdf")],
            &[estimate(10, 1), estimate(11, 1)],
            &[],
        );
        assert!(path_collisions(&units).is_empty());
    }
}
