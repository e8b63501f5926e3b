use std::fs;

use tempfile::TempDir;

use panorama_core::error::EtlError;
use panorama_core::pipeline;
use panorama_core::profile;

const OUTPUT_HEADER: &str = "date,post_id,reach,impressions,link_clicks,likes,comments,shares,\
engagements,views,visits,call_clicks,ctr,engagement_rate,visits_per_click,calls_per_click";

#[test]
fn run_produces_deterministic_output() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("posts.csv"),
        "Publicação,Data,Alcance,Impressões,Cliques no link\n\
         P1,2024-01-05,100,200,10\n\
         P2,2024-01-06,50,80,4\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("daily.csv"),
        "Data,Alcance\n2024-01-05,40\n",
    )
    .unwrap();
    let out = dir.path().join("final_insights.csv");

    let summary = pipeline::run(dir.path(), &out).expect("pipeline run failed");
    assert_eq!(summary.files_ingested, 2);
    // (2024-01-05, P1), (2024-01-05, absent), (2024-01-06, P2)
    assert_eq!(summary.rows_written, 3);

    let first = fs::read(&out).unwrap();
    let text = String::from_utf8(first.clone()).unwrap();
    assert!(text.starts_with(OUTPUT_HEADER));
    assert!(text.contains("absent"));
    assert!(text.contains("2024-01-05"));

    let again = pipeline::run(dir.path(), &out).expect("second run failed");
    assert_eq!(again.rows_written, 3);
    let second = fs::read(&out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn date_only_grouping_when_no_identifiers() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("daily.csv"),
        "Data,Alcance\n2024-01-05,40\n2024-01-06,10\nsem data,5\n",
    )
    .unwrap();
    let out = dir.path().join("final_insights.csv");

    let summary = pipeline::run(dir.path(), &out).unwrap();
    assert_eq!(summary.rows_written, 3);

    let text = fs::read_to_string(&out).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("date,reach,"));
    assert!(!header.contains("post_id"));
    // the unparseable date forms its own group
    assert!(text.contains("undetermined"));
}

#[test]
fn run_without_inputs_is_fatal_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("final_insights.csv");

    let err = pipeline::run(dir.path(), &out).unwrap_err();
    assert!(matches!(err, EtlError::Processing(_)));
    assert!(!out.exists());
}

#[test]
fn failed_run_leaves_previous_output_untouched() {
    let empty = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("final_insights.csv");
    fs::write(&out, "stale contents").unwrap();

    pipeline::run(empty.path(), &out).unwrap_err();
    assert_eq!(fs::read_to_string(&out).unwrap(), "stale contents");
}

#[test]
fn rerun_overwrites_output_wholesale() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("daily.csv");
    fs::write(&input, "Data,Alcance\n2024-01-05,40\n2024-01-06,10\n").unwrap();
    let out = dir.path().join("final_insights.csv");

    let summary = pipeline::run(dir.path(), &out).unwrap();
    assert_eq!(summary.rows_written, 2);

    fs::write(&input, "Data,Alcance\n2024-01-07,1\n").unwrap();
    let summary = pipeline::run(dir.path(), &out).unwrap();
    assert_eq!(summary.rows_written, 1);

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("2024-01-07"));
    assert!(!text.contains("2024-01-05"));
}

#[test]
fn profiler_reports_shape_without_writing() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("posts.csv"),
        "Publicação,Data,Alcance\nP1,2024-01-05,100\nP2,2024-01-06,50\n",
    )
    .unwrap();

    let profiles = profile::profile_dir(dir.path(), 1).unwrap();
    assert_eq!(profiles.len(), 1);
    let p = &profiles[0];
    assert_eq!(p.file_name, "posts.csv");
    assert_eq!(p.rows, 2);
    assert_eq!(p.columns, vec!["Publicação", "Data", "Alcance"]);
    assert_eq!(p.sample.len(), 1);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name() != "posts.csv")
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn profiling_an_empty_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(profile::profile_dir(dir.path(), 3).is_err());
}
