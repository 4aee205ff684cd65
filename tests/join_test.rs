//! Integration tests for output path derivation and the record join

mod common;

use common::{annotation, empty_file, estimate, file, project};
use geodoc::core::export::join::{join, path_collisions};
use geodoc::core::export::path::resolve;
use geodoc::domain::{CompanyId, ExportPayload};
use test_case::test_case;

fn company() -> CompanyId {
    CompanyId::new("9").unwrap()
}

#[test_case("9", 1, 10, "a.pdf", "company_9/project_1/estimate_10/a.pdf" ; "plain")]
#[test_case("ACME", 42, 7, "site plan.pdf", "company_ACME/project_42/estimate_7/site plan.pdf" ; "spaces kept")]
#[test_case("9", 1, 10, "scans/a.pdf", "company_9/project_1/estimate_10/scans/a.pdf" ; "slash kept verbatim")]
fn test_resolve(company: &str, project: i64, estimate: i64, name: &str, expected: &str) {
    assert_eq!(resolve(company, project, estimate, name).unwrap().as_str(), expected);
}

#[test_case("", 1, 10, "a.pdf" ; "empty company")]
#[test_case("9", 1, 10, "" ; "empty file name")]
#[test_case("9", 1, 10, "   " ; "blank file name")]
fn test_resolve_rejects_empty_segments(company: &str, project: i64, estimate: i64, name: &str) {
    assert!(resolve(company, project, estimate, name).is_err());
}

#[test]
fn test_resolve_is_pure() {
    let first = resolve("9", 1, 10, "a.pdf").unwrap();
    let second = resolve("9", 1, 10, "a.pdf").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_single_unit_scenario() {
    let units = join(
        &company(),
        &[project(1)],
        &[file(100, 1, "a.pdf")],
        &[estimate(10, 1)],
        &[annotation(10, 100, "<xfdf>note</xfdf>")],
    );

    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.output_path.as_str(), "company_9/project_1/estimate_10/a.pdf");
    assert_eq!(unit.display_name, "a.pdf");
    assert_eq!(unit.overlays.len(), 1);
    assert_eq!(unit.overlays[0].overlay_markup, "<xfdf>note</xfdf>");
}

#[test]
fn test_join_count_is_estimates_times_files_per_project() {
    let projects = [project(1), project(2), project(3)];
    let estimates = [
        estimate(10, 1),
        estimate(11, 1),
        estimate(20, 2),
        estimate(21, 2),
        estimate(22, 2),
    ];
    let files = [
        file(100, 1, "a.pdf"),
        file(101, 1, "b.pdf"),
        file(102, 1, "c.pdf"),
        file(200, 2, "d.pdf"),
        // project 3 has files but no estimates
        file(300, 3, "e.pdf"),
    ];

    let units = join(&company(), &projects, &files, &estimates, &[]);
    assert_eq!(units.len(), 2 * 3 + 3 * 1);
    assert!(units.iter().all(|u| u.project_id.get() != 3));
}

#[test]
fn test_join_order_follows_input_order() {
    let units = join(
        &company(),
        &[project(2), project(1)],
        &[file(100, 1, "a.pdf"), file(200, 2, "z.pdf"), file(101, 1, "b.pdf")],
        &[estimate(20, 2), estimate(10, 1), estimate(11, 1)],
        &[],
    );

    let paths: Vec<&str> = units.iter().map(|u| u.output_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "company_9/project_2/estimate_20/z.pdf",
            "company_9/project_1/estimate_10/a.pdf",
            "company_9/project_1/estimate_10/b.pdf",
            "company_9/project_1/estimate_11/a.pdf",
            "company_9/project_1/estimate_11/b.pdf",
        ]
    );
}

#[test]
fn test_files_without_content_are_never_exported() {
    let files = [
        file(100, 1, "a.pdf"),
        empty_file(101, 1, "missing.pdf"),
        file(102, 1, ""),
    ];
    let units = join(&company(), &[project(1)], &files, &[estimate(10, 1)], &[]);

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].display_name, "a.pdf");
}

#[test]
fn test_only_content_less_files_gives_no_units() {
    let units = join(
        &company(),
        &[project(1)],
        &[empty_file(100, 1, "a.pdf"), empty_file(101, 1, "b.pdf")],
        &[estimate(10, 1)],
        &[],
    );
    assert!(units.is_empty());
}

#[test]
fn test_empty_inputs_give_no_units() {
    assert!(join(&company(), &[], &[], &[], &[]).is_empty());
}

#[test]
fn test_annotations_match_both_estimate_and_file() {
    let units = join(
        &company(),
        &[project(1)],
        &[file(100, 1, "a.pdf"), file(101, 1, "b.pdf")],
        &[estimate(10, 1), estimate(11, 1)],
        &[
            annotation(10, 100, "first"),
            annotation(11, 100, "other estimate"),
            annotation(10, 101, "other file"),
            annotation(10, 100, "second"),
            annotation(99, 100, "orphan"),
        ],
    );

    let unit = units
        .iter()
        .find(|u| u.estimate_id.get() == 10 && u.file_id.get() == 100)
        .unwrap();
    let markup: Vec<&str> = unit.overlays.iter().map(|a| a.overlay_markup.as_str()).collect();
    assert_eq!(markup, vec!["first", "second"]);

    let total: usize = units.iter().map(|u| u.overlays.len()).sum();
    assert_eq!(total, 4);
}

#[test]
fn test_duplicate_file_names_are_reported_as_collisions() {
    let units = join(
        &company(),
        &[project(1)],
        &[file(100, 1, "a.pdf"), file(101, 1, "a.pdf")],
        &[estimate(10, 1)],
        &[],
    );

    assert_eq!(units.len(), 2);
    let collisions = path_collisions(&units);
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].as_str(), "company_9/project_1/estimate_10/a.pdf");
}

#[test]
fn test_join_from_wire_payload() {
    let payload: ExportPayload = serde_json::from_value(serde_json::json!({
        "geoProjects": [{"id": 1, "companyId": 9}],
        "geoFiles": [
            {"id": 100, "geoProjectId": 1, "name": "a.pdf", "base64File": "JVBERi0xLjc="},
            null,
            {"id": 101, "geoProjectId": 1, "name": "b.pdf", "base64File": null}
        ],
        "geoEstimates": [{"id": 10, "geoProjectId": 1}],
        "geoAnnotations": [{"geoEstimateId": 10, "fileId": 100, "xfdf": "<xfdf/>"}]
    }))
    .unwrap();

    assert_eq!(payload.files_without_content(), 1);

    let units = join(
        &company(),
        &payload.geo_projects,
        &payload.geo_files,
        &payload.geo_estimates,
        &payload.geo_annotations,
    );
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].document.decode().unwrap(), b"%PDF-1.7");
}
