//! Integration test: raw table loading and cleaning

use fruitqc::cleaning::Cleaner;
use fruitqc::data::{load_table, FEATURE_NAMES};
use fruitqc::FruitError;
use polars::prelude::*;
use std::io::Write;

fn raw_csv() -> &'static str {
    "A_id,Size,Weight,Sweetness,Crunchiness,Juiciness,Acidity,Ripeness,Quality\n\
     0,1.0,0.5,3.1,2.2,1.1,0.4,green,good\n\
     1,2.0,-,3.3,2.0,1.0,0.5,ripe,bad\n\
     2,3.0,1.5,-,2.1,1.2,0.6,medium,good\n\
     3,-,2.0,3.0,2.3,1.3,0.7,-,bad\n\
     4,2.5,1.0,3.2,2.4,1.4,0.8,ripe,mystery\n"
}

#[test]
fn test_load_and_clean_csv() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(raw_csv().as_bytes()).unwrap();

    let df = load_table(file.path()).unwrap();
    assert_eq!(df.height(), 5);

    let cleaned = Cleaner::new().clean(&df).unwrap();

    // One row had an unmappable label and is gone
    assert_eq!(cleaned.n_rows(), 4);
    assert_eq!(cleaned.n_features(), FEATURE_NAMES.len());

    // Everything left is finite, labels strictly binary
    assert!(cleaned.features.iter().all(|v| v.is_finite()));
    assert!(cleaned.labels.iter().all(|&l| l == 0.0 || l == 1.0));

    // Size had values [1, 2, 3, -, 2.5]; the sentinel imputes to their mean
    let expected_size = (1.0 + 2.0 + 3.0 + 2.5) / 4.0;
    assert!((cleaned.features[[3, 0]] - expected_size).abs() < 1e-10);

    // Ripeness knowns were [green, ripe, medium, ripe]; mode is ripe
    assert_eq!(cleaned.features[[3, 6]], 3.0);
}

#[test]
fn test_missing_input_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_file.csv");

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, FruitError::InputNotFound(_)));
}

#[test]
fn test_schema_error_on_missing_column() {
    // No Acidity column
    let df = df!(
        "Size" => &[1.0f64, 2.0],
        "Weight" => &[1.0f64, 2.0],
        "Sweetness" => &[1.0f64, 2.0],
        "Crunchiness" => &[1.0f64, 2.0],
        "Juiciness" => &[1.0f64, 2.0],
        "Ripeness" => &["green", "ripe"],
        "Quality" => &["good", "bad"],
    )
    .unwrap();

    let err = Cleaner::new().clean(&df).unwrap_err();
    assert!(matches!(err, FruitError::MissingColumn(ref c) if c == "Acidity"));
}

#[test]
fn test_imputation_ignores_label_availability() {
    // The row that will be dropped for its label still feeds the mean
    let df = df!(
        "Size" => &["1.0", "3.0", "-"],
        "Weight" => &[1.0f64, 1.0, 1.0],
        "Sweetness" => &[1.0f64, 1.0, 1.0],
        "Crunchiness" => &[1.0f64, 1.0, 1.0],
        "Juiciness" => &[1.0f64, 1.0, 1.0],
        "Acidity" => &[1.0f64, 1.0, 1.0],
        "Ripeness" => &["green", "green", "green"],
        "Quality" => &["good", "nope", "bad"],
    )
    .unwrap();

    let cleaned = Cleaner::new().clean(&df).unwrap();
    assert_eq!(cleaned.n_rows(), 2);
    // Mean over knowns [1.0, 3.0] = 2.0, including the dropped row's value
    assert!((cleaned.features[[1, 0]] - 2.0).abs() < 1e-10);
}
