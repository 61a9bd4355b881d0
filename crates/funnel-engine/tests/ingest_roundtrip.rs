use std::fs;

use funnel_engine::serde::{to_canonical_json_bytes, to_yaml_string};
use funnel_engine::{
    compute_snapshot, load_filters, load_records, DimensionFilter, ExperienceBucket,
    ExperienceFilter, FilterSpec, Stage,
};
use tempfile::tempdir;

const CSV: &str = "\
platform,assignTo,position,experienceYears,applyDate,applyDateTime,formFilled,voiceNoteSubmitted,eligibilityTaskSubmitted,joined,notes
LinkedIn,Asha,Designer,2,2024-01-03,2024-01-03 10:00:00,yes,yes,yes,yes,strong
Naukri,Ravi,Engineer,,2024-01-04,2024-01-04,yes,-,,,
Indeed,Ravi,Engineer,six,-,,,,,,
";

#[test]
fn csv_and_json_loads_agree() {
    let dir = tempdir().expect("tmp dir");
    let csv_path = dir.path().join("records.csv");
    fs::write(&csv_path, CSV).expect("write csv");
    let from_csv = load_records(&csv_path).expect("load csv");
    assert_eq!(from_csv.len(), 3);
    assert_eq!(from_csv[2].experience_years, None);

    let json_path = dir.path().join("records.json");
    fs::write(&json_path, serde_json::to_vec(&from_csv).expect("encode")).expect("write json");
    let from_json = load_records(&json_path).expect("load json");
    assert_eq!(from_json, from_csv);

    let snapshot = compute_snapshot(&from_csv, &FilterSpec::default());
    assert_eq!(snapshot.totals().get(Stage::Clicked), 2);
    assert_eq!(snapshot.totals().get(Stage::AudioSubmitted), 1);
    assert_eq!(snapshot.rates.click_to_form.to_string(), "100.0");
    assert_eq!(snapshot.rates.form_to_audio.to_string(), "50.0");
}

#[test]
fn filters_load_from_yaml_and_json() {
    let dir = tempdir().expect("tmp dir");
    let spec = FilterSpec {
        assign_to: DimensionFilter::equals("Ravi"),
        experience: ExperienceFilter::Bucket(ExperienceBucket::OneToThree),
        date_from: chrono::NaiveDate::from_ymd_opt(2024, 1, 4),
        ..FilterSpec::default()
    };

    let yaml_path = dir.path().join("filters.yaml");
    fs::write(&yaml_path, to_yaml_string(&spec).expect("yaml")).expect("write yaml");
    assert_eq!(load_filters(&yaml_path).expect("load yaml"), spec);

    let json_path = dir.path().join("filters.json");
    fs::write(&json_path, to_canonical_json_bytes(&spec).expect("json")).expect("write json");
    assert_eq!(load_filters(&json_path).expect("load json"), spec);
}

#[test]
fn missing_files_report_io_errors() {
    let dir = tempdir().expect("tmp dir");
    let err = load_records(&dir.path().join("absent.csv")).expect_err("missing");
    assert_eq!(err.code(), "funnel.ingest.open");
    assert!(err.info().context.contains_key("path"));
    let err = load_filters(&dir.path().join("absent.yaml")).expect_err("missing");
    assert_eq!(err.code(), "funnel.filters.read");
}

#[test]
fn malformed_json_reports_decode_error() {
    let dir = tempdir().expect("tmp dir");
    let path = dir.path().join("records.json");
    fs::write(&path, b"{\"not\": \"an array\"}").expect("write");
    let err = load_records(&path).expect_err("bad json");
    assert_eq!(err.code(), "funnel.json.deserialize");
}
