use avocado_charts::charts::{
    ChartConfig, PRICE_BY_MONTH_FILE, PRICE_DEMAND_FILE, SIZE_BY_REGION_FILE, SIZE_BY_TYPE_FILE,
    TYPE_BY_REGION_FILE,
};
use avocado_charts::config::Config;
use avocado_charts::data::{AvocadoType, LoaderError, RecordLoader, TOTAL_US};
use avocado_charts::pipeline;
use avocado_charts::report::{write_summary, Summary};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Date,AveragePrice,Total Volume,4046,4225,4770,Total Bags,Small Bags,Large Bags,XLarge Bags,type,year,region";

fn write_csv(dir: &TempDir, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn load(path: &Path) -> Result<Vec<avocado_charts::data::Record>, LoaderError> {
    RecordLoader::new().load(path)
}

#[test]
fn test_loads_typed_records_and_drops_total_us() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "avocado.csv",
        &[
            "2015-12-27,1.33,64236.62,1036.74,54454.85,48.16,8696.87,8603.62,93.25,0.0,conventional,2015,Albany",
            "2015-12-27,1.52,73341.73,3058.5,40945.97,0.0,29337.26,29337.26,0.0,0.0,organic,2015,Albany",
            "2015-12-27,0.95,27297983.67,9626901.09,10197890.05,1184340.09,6288852.44,4850404.09,1252626.31,185822.04,conventional,2015,TotalUS",
            "2015-12-20,1.35,54876.98,674.28,44638.81,58.33,9505.56,9408.07,97.49,0.0,conventional,2015,Boston",
        ],
    );

    let records = load(&path).expect("Failed to load records");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.region != TOTAL_US));

    let organic = &records[1];
    assert_eq!(organic.date.to_string(), "2015-12-27");
    assert_eq!(organic.avocado_type, AvocadoType::Organic);
    assert_eq!(organic.year, 2015);
    assert_eq!(organic.region, "Albany");
    assert!((organic.average_price - 1.52).abs() < 1e-12);
    assert!((organic.sizes.plu_4225 - 40945.97).abs() < 1e-6);
    assert!((organic.total_bags - 29337.26).abs() < 1e-6);
    assert_eq!(records[0].avocado_type, AvocadoType::Conventional);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoaderError::NotFound(_)));
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_region.csv");
    fs::write(
        &path,
        "Date,AveragePrice,Total Volume,4046,4225,4770,Total Bags,Small Bags,Large Bags,XLarge Bags,type,year\n\
         2015-12-27,1.33,64236.62,1036.74,54454.85,48.16,8696.87,8603.62,93.25,0.0,conventional,2015\n",
    )
    .unwrap();

    match load(&path).unwrap_err() {
        LoaderError::MissingColumn(name) => assert_eq!(name, "region"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_number_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "bad_price.csv",
        &[
            "2015-12-27,1.33,100.0,1.0,2.0,3.0,0.0,0.0,0.0,0.0,conventional,2015,Albany",
            "2015-12-20,n/a,100.0,1.0,2.0,3.0,0.0,0.0,0.0,0.0,conventional,2015,Albany",
        ],
    );

    match load(&path).unwrap_err() {
        LoaderError::MalformedField { column, row } => {
            assert_eq!(column, "AveragePrice");
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_date_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "bad_date.csv",
        &["27/12/2015,1.33,100.0,1.0,2.0,3.0,0.0,0.0,0.0,0.0,organic,2015,Albany"],
    );

    assert!(matches!(
        load(&path).unwrap_err(),
        LoaderError::InvalidDate { row: 1, .. }
    ));
}

#[test]
fn test_custom_separator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avocado.tsv");
    let content = format!(
        "{}\n{}\n",
        HEADER.replace(',', ";"),
        "2016-01-03;1.10;500.0;100.0;200.0;50.0;150.0;100.0;50.0;0.0;organic;2016;Denver"
    );
    fs::write(&path, content).unwrap();

    let records = RecordLoader::new().with_separator(b';').load(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].region, "Denver");
    assert_eq!(records[0].year, 2016);
}

#[test]
fn test_summary_from_loaded_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "avocado.csv",
        &[
            "2015-01-04,1.00,100.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,conventional,2015,Albany",
            "2015-01-04,2.00,300.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,organic,2015,Boston",
            "2015-01-04,5.00,9999.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,conventional,2015,TotalUS",
            "2015-02-01,1.50,50.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,organic,2015,Albany",
        ],
    );

    let records = load(&path).unwrap();
    let summary = Summary::from_records(&records);

    assert_eq!(summary.record_count, 3);
    let first_day = &summary.volume_price_by_date[0];
    assert!((first_day.total_volume - 400.0).abs() < 1e-9);
    assert!((first_day.weighted_price.unwrap() - 1.75).abs() < 1e-9);

    let regions: Vec<&str> = summary
        .type_volume_by_region
        .iter()
        .map(|r| r.region.as_str())
        .collect();
    assert_eq!(regions, vec!["Albany", "Boston"]);

    let months: Vec<String> = summary
        .price_by_month
        .iter()
        .map(|m| m.month.to_string())
        .collect();
    assert_eq!(months, vec!["2015-01", "2015-02"]);

    let organic = summary.mean_size_by_type.organic.unwrap();
    assert_eq!(organic.as_array(), [10.0, 20.0, 30.0]);

    let out = dir.path().join("reports").join("summary.json");
    write_summary(&out, &summary).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["record_count"], 3);
    assert_eq!(json["price_by_month"][1]["season"], "winter");
}

#[test]
fn test_decimal_after_many_integer_rows() {
    let dir = TempDir::new().unwrap();
    let mut rows: Vec<String> = (0..10_001)
        .map(|_| "2015-01-04,1,100,10,20,30,0,0,0,0,conventional,2015,Albany".to_string())
        .collect();
    rows.push("2015-01-11,1.5,100.5,10.25,20,30,0,0,0,0,organic,2015,Albany".to_string());
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let path = write_csv(&dir, "long.csv", &refs);

    let records = load(&path).expect("Failed to load records");
    assert_eq!(records.len(), 10_002);
    let last = records.last().unwrap();
    assert!((last.average_price - 1.5).abs() < 1e-12);
    assert!((last.total_volume - 100.5).abs() < 1e-12);
    assert!((last.sizes.plu_4046 - 10.25).abs() < 1e-12);
    assert_eq!(records[0].year, 2015);
}

#[test]
fn test_leading_index_column_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("indexed.csv");
    let content = format!(
        ",{}\n0,{}\n1,{}\n",
        HEADER,
        "2015-12-27,1.33,64236.62,1036.74,54454.85,48.16,8696.87,8603.62,93.25,0.0,conventional,2015,Albany",
        "2015-12-20,1.35,54876.98,674.28,44638.81,58.33,9505.56,9408.07,97.49,0.0,organic,2015,Boston"
    );
    fs::write(&path, content).unwrap();

    let records = load(&path).expect("Failed to load records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].region, "Albany");
    assert!((records[0].average_price - 1.33).abs() < 1e-12);
    assert_eq!(records[1].avocado_type, AvocadoType::Organic);
}

#[test]
fn test_empty_type_is_conventional() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "no_type.csv",
        &["2015-12-27,1.33,100.0,1.0,2.0,3.0,0.0,0.0,0.0,0.0,,2015,Albany"],
    );

    let records = load(&path).expect("Failed to load records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].avocado_type, AvocadoType::Conventional);
}

#[test]
fn test_run_writes_charts_and_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        &dir,
        "avocado.csv",
        &[
            "2015-01-04,1.00,100.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,conventional,2015,Albany",
            "2015-01-04,2.00,300.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,organic,2015,Boston",
            "2015-06-07,1.50,50.0,10.0,20.0,30.0,0.0,0.0,0.0,0.0,organic,2015,Albany",
        ],
    );
    let out_dir = dir.path().join("charts");
    let summary_path = dir.path().join("summary.json");
    let config = Config {
        input,
        separator: b',',
        charts: ChartConfig {
            out_dir: out_dir.clone(),
            width: 800,
            height: 400,
        },
        summary: Some(summary_path.clone()),
        open: false,
    };

    let report = pipeline::run(&config).expect("Pipeline run failed");
    assert_eq!(report.record_count, 3);
    assert_eq!(report.summary, Some(summary_path.clone()));

    let expected: Vec<PathBuf> = [
        PRICE_DEMAND_FILE,
        TYPE_BY_REGION_FILE,
        PRICE_BY_MONTH_FILE,
        SIZE_BY_TYPE_FILE,
        SIZE_BY_REGION_FILE,
    ]
    .iter()
    .map(|name| out_dir.join(name))
    .collect();
    assert_eq!(report.charts, expected);
    for chart in &expected {
        let size = fs::metadata(chart).expect("Chart not written").len();
        assert!(size > 0, "{} is empty", chart.display());
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(json["record_count"], 3);
    assert_eq!(json["price_by_month"][1]["season"], "summer");
}

#[test]
fn test_run_fails_on_missing_input() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        input: dir.path().join("missing.csv"),
        separator: b',',
        charts: ChartConfig {
            out_dir: dir.path().join("charts"),
            ..ChartConfig::default()
        },
        summary: None,
        open: false,
    };

    assert!(pipeline::run(&config).is_err());
    assert!(!dir.path().join("charts").exists());
}
