use std::fs;

use caseload_ingest::{load_rate_book, read_encounters, write_monthly_csv};
use caseload_domain::{EncounterStatus, MonthKey, MonthlyKpi, ServiceCode};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn reads_well_formed_encounter_rows() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("encounters.csv");
    fs::write(
        &path,
        "encounter_date,cpt_code,duration_min,is_billable,encounter_status\n\
         2023-06-01,T1015,60,true,completed\n\
         2023-06-15,t1015,10,1,Completed\n",
    )
    .expect("write fixture");

    let (records, report) = read_encounters(&path).expect("reads");
    assert_eq!(records.len(), 2);
    assert_eq!(report.rows_seen, 2);
    assert!(report.rejections.is_empty());

    assert_eq!(records[0].service_code, ServiceCode::new("T1015"));
    assert_eq!(records[0].duration_min, Some(dec!(60)));
    assert!(records[0].is_billable);
    assert_eq!(records[0].status, EncounterStatus::Completed);
    // Codes and flags normalize regardless of source casing.
    assert_eq!(records[1].service_code, ServiceCode::new("T1015"));
    assert!(records[1].is_billable);
}

#[test]
fn malformed_rows_are_recorded_not_silently_dropped() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("encounters.csv");
    fs::write(
        &path,
        "encounter_date,cpt_code,duration_min,is_billable,encounter_status\n\
         junk,T1015,60,true,completed\n\
         2023-06-02,,60,true,completed\n\
         2023-06-03,T1015,sixty,true,completed\n\
         2023-06-04,T1015,,true,completed\n\
         2023-06-05,T1015,30,maybe,completed\n",
    )
    .expect("write fixture");

    let (records, report) = read_encounters(&path).expect("reads");
    // Only the blank-duration row survives; duration stays None for the
    // validator to account for.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].duration_min, None);
    assert_eq!(report.rows_seen, 5);
    assert_eq!(report.rejections.len(), 4);

    let fields: Vec<&str> = report
        .rejections
        .iter()
        .map(|rejection| rejection.field.as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["encounter_date", "cpt_code", "duration_min", "is_billable"]
    );
    assert_eq!(report.rejections[0].line, 2);
}

#[test]
fn missing_column_is_a_hard_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("encounters.csv");
    fs::write(
        &path,
        "encounter_date,cpt_code,duration_min,encounter_status\n2023-06-01,T1015,60,completed\n",
    )
    .expect("write fixture");

    let err = read_encounters(&path).expect_err("is_billable column missing");
    assert!(err.to_string().contains("is_billable"));
}

#[test]
fn rate_book_loads_from_json_and_rejects_overlaps() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("rates.json");
    fs::write(
        &path,
        r#"[
            {
                "service_code": "H0004",
                "effective_start": "2023-01-01",
                "effective_end": "2023-12-31",
                "billing_method": "time_based",
                "rate": "26.50"
            },
            {
                "service_code": "H0004",
                "effective_start": "2024-01-01",
                "billing_method": "time_based",
                "rate": "29.50"
            }
        ]"#,
    )
    .expect("write fixture");

    let book = load_rate_book(&path).expect("valid table");
    assert_eq!(book.rule_count(), 2);

    fs::write(
        &path,
        r#"[
            {
                "service_code": "H0004",
                "effective_start": "2023-01-01",
                "billing_method": "time_based",
                "rate": "26.50"
            },
            {
                "service_code": "H0004",
                "effective_start": "2023-06-01",
                "billing_method": "time_based",
                "rate": "29.50"
            }
        ]"#,
    )
    .expect("write fixture");
    let err = load_rate_book(&path).expect_err("overlapping rules");
    assert!(err.to_string().contains("overlapping"));
}

#[test]
fn monthly_csv_leaves_undefined_ratios_blank() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("monthly.csv");

    let rows = vec![MonthlyKpi::empty(MonthKey::new(2023, 6))];
    write_monthly_csv(&path, &rows).expect("writes");

    let written = fs::read_to_string(&path).expect("readable");
    let mut lines = written.lines();
    assert!(lines.next().expect("header").starts_with("month,"));
    let row = lines.next().expect("one row");
    assert!(row.starts_with("2023-06,0,0,0,0,"));
    // revenue_per_hour, goal_attainment, roi stay empty.
    assert!(row.ends_with(",,"));
}
