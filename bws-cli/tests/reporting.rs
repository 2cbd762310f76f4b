use std::collections::HashSet;

use bws_cli::domain::{Probe, Verbosity};
use bws_cli::ports::{CallOutcome, ProbeResult, ResponseMetadata};
use bws_cli::proto::{
    FaceMatch, FaceSearchResponse, FaceTemplateStatus, ImageSearchResult, JobError, JobStatus,
    LivenessDetectionResponse,
};
use bws_cli::report::{Render, Reporter};
use pretty_assertions::assert_eq;

const TIERS: [Verbosity; 5] = [
    Verbosity::Quiet,
    Verbosity::Minimal,
    Verbosity::Normal,
    Verbosity::Detailed,
    Verbosity::Diagnostic,
];

fn metadata() -> ResponseMetadata {
    ResponseMetadata::new("HTTP/1.1 200 OK").with_pairs([
        ("content-type", "application/json"),
        ("x-trace", "a"),
        ("x-trace", "b"),
    ])
}

fn lines<R: Render>(verbosity: Verbosity, outcome: &CallOutcome<R>) -> HashSet<String> {
    let mut reporter = Reporter::new(verbosity, Vec::new(), Vec::new());
    reporter.render(outcome).unwrap();
    let (out, err) = reporter.into_sinks();
    [out, err]
        .into_iter()
        .flat_map(|sink| {
            String::from_utf8(sink)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn assert_monotonic<R: Render>(outcome: &CallOutcome<R>) {
    for pair in TIERS.windows(2) {
        let lower = lines(pair[0], outcome);
        let higher = lines(pair[1], outcome);
        assert!(
            lower.is_subset(&higher),
            "{:?} output is not contained in {:?}: {:?}",
            pair[0],
            pair[1],
            lower.difference(&higher).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_monotonic_for_succeeded_job() {
    let outcome = CallOutcome::new(
        FaceSearchResponse {
            results: vec![ImageSearchResult {
                matches: vec![FaceMatch {
                    class_id: 1,
                    score: 0.9,
                }],
            }],
            ..Default::default()
        },
        metadata(),
    );
    assert_monotonic(&outcome);
    assert_eq!(lines(Verbosity::Minimal, &outcome).len(), 1);
}

#[test]
fn test_monotonic_for_faulted_job() {
    let outcome = CallOutcome::new(
        LivenessDetectionResponse {
            status: JobStatus::Faulted as i32,
            errors: vec![
                JobError {
                    error_code: "NoFaceFound".to_string(),
                    message: "no face in image 1".to_string(),
                },
                JobError {
                    error_code: "MultipleFacesFound".to_string(),
                    message: "two faces in image 2".to_string(),
                },
            ],
            ..Default::default()
        },
        metadata(),
    );
    assert_monotonic(&outcome);

    let normal = lines(Verbosity::Normal, &outcome);
    assert!(normal.contains("Job status: FAULTED"));
    assert!(!normal.contains("No errors reported."));
}

#[test]
fn test_monotonic_for_payload_without_job() {
    let outcome = CallOutcome::new(
        FaceTemplateStatus {
            class_id: 5,
            available: true,
            tags: vec!["a".to_string()],
            ..Default::default()
        },
        ResponseMetadata::new("OK"),
    );
    assert_monotonic(&outcome);

    let detailed = lines(Verbosity::Detailed, &outcome);
    assert!(detailed.contains("Metadata: (none)"));
    assert!(!detailed.iter().any(|line| line.starts_with("Job status")));
}

#[test]
fn test_health_minimal_prints_one_line_per_probe() {
    let results: Vec<ProbeResult> = Probe::ALL
        .into_iter()
        .map(|probe| ProbeResult {
            probe,
            healthy: probe == Probe::Liveness,
            status: if probe == Probe::Liveness {
                "SERVING".to_string()
            } else {
                "NOT_SERVING".to_string()
            },
            metadata: metadata(),
        })
        .collect();

    let mut reporter = Reporter::new(Verbosity::Minimal, Vec::new(), Vec::new());
    reporter.render_health(&results).unwrap();
    let (out, err) = reporter.into_sinks();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(out.lines().collect::<Vec<_>>(), vec!["Liveness: SERVING", "Readiness: NOT_SERVING"]);
    assert!(err.is_empty());

    let mut reporter = Reporter::new(Verbosity::Detailed, Vec::new(), Vec::new());
    reporter.render_health(&results).unwrap();
    let (out, _) = reporter.into_sinks();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Liveness response status: HTTP/1.1 200 OK"));
    assert!(out.contains("  x-trace: a, b"));
}

#[test]
fn test_health_normal_includes_probe_metadata() {
    let results = vec![ProbeResult {
        probe: Probe::Readiness,
        healthy: true,
        status: "Healthy".to_string(),
        metadata: metadata(),
    }];

    let mut reporter = Reporter::new(Verbosity::Normal, Vec::new(), Vec::new());
    reporter.render_health(&results).unwrap();
    let (out, _) = reporter.into_sinks();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Readiness response status: HTTP/1.1 200 OK"));
    assert!(out.contains("Readiness metadata:"));
    assert!(out.contains("content-type: application/json"));
    assert!(!out.contains("Payload:"));
}
