use aq_explorer::analyzers::{
    build_dashboard, correlation_matrix, filter_by_weekday, hourly_mean, weekday_mean,
    DashboardRequest, DatasetAnalyzer,
};
use aq_explorer::models::{Measurement, Pollutant, WeekdaySet};
use aq_explorer::processors::DatasetCleaner;
use aq_explorer::readers::StationFileReader;
use aq_explorer::writers::JsonWriter;
use aq_explorer::{load_and_clean, DatasetCache, ProcessingError};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str =
    "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

/// Two days of hourly rows starting Friday 2013-03-01, with a leading PM2.5 gap, an
/// interior NO2 gap and a trailing O3 gap.
fn station_csv() -> String {
    let mut lines = vec![HEADER.to_string()];
    let mut no = 1;
    for day in 1..=2 {
        for hour in 0..24 {
            let i = (day - 1) * 24 + hour;
            let pm25 = if i == 0 { "NA".to_string() } else { format!("{}", 10 + i * 2) };
            let no2 = if (5..8).contains(&i) { "NA".to_string() } else { format!("{}", 30 + i) };
            let o3 = if i >= 46 { "NA".to_string() } else { format!("{}", 60 - i) };
            let wspm = format!("{:.1}", 0.5 + (i % 7) as f64 * 0.3);
            lines.push(format!(
                "{no},2013,3,{day},{hour},{pm25},{pm10},4,{no2},300,{o3},1.5,1020,-10,0,NW,{wspm},Nongzhanguan",
                pm10 = 20 + i,
            ));
            no += 1;
        }
    }
    lines.join("\n") + "\n"
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write CSV");
    file.flush().expect("Failed to flush CSV");
    file
}

#[test]
fn test_cleaned_table_invariants() {
    let file = write_csv(&station_csv());
    let raw = StationFileReader::new().read_table(file.path()).unwrap();
    let raw_rows = raw.len();
    assert!(raw.total_missing() > 0);

    let table = load_and_clean(file.path()).unwrap();

    assert_eq!(table.len(), raw_rows);
    assert_eq!(table.measurements().len(), 11);
    for record in &table {
        assert!(record.hour <= 23);
        assert!(record.day_of_week <= 6);
        assert_eq!(record.values.len(), 11);
        assert!(record.values.values().all(|v| v.is_finite()));
    }

    let timestamps: Vec<_> = table.iter().map(|r| r.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_gap_repair_end_to_end() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();

    let pm25 = table.column(Measurement::Pm25).unwrap();
    let known: Vec<f64> = (1..48).map(|i| (10 + i * 2) as f64).collect();
    let known_mean = known.iter().sum::<f64>() / known.len() as f64;
    assert_eq!(pm25[0], known_mean);

    let no2 = table.column(Measurement::No2).unwrap();
    assert_eq!(&no2[4..9], &[34.0, 35.0, 36.0, 37.0, 38.0]);

    // Trailing gap carries the last known value (row 45: 60 - 45)
    let o3 = table.column(Measurement::O3).unwrap();
    assert_eq!(&o3[44..], &[16.0, 15.0, 15.0, 15.0]);
}

#[test]
fn test_trailing_gap_carried_forward_end_to_end() {
    let csv = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,WSPM\n\
               2013,3,1,0,10,1,1,1,1,1,1\n\
               2013,3,1,1,NA,1,1,1,1,1,1\n\
               2013,3,1,2,30,1,1,1,1,1,1\n\
               2013,3,1,3,NA,1,1,1,1,1,1\n";
    let file = write_csv(csv);

    let table = load_and_clean(file.path()).unwrap();
    assert_eq!(
        table.column(Measurement::Pm25).unwrap(),
        vec![10.0, 20.0, 30.0, 30.0]
    );
}

#[test]
fn test_documented_leading_gap_scenario() {
    let csv = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,WSPM\n\
               2013,3,1,0,NaN,10,1,1,1,1,1\n\
               2013,3,1,1,20,10,1,1,1,1,1\n\
               2013,3,1,2,40,10,1,1,1,1,1\n";
    let file = write_csv(csv);

    let table = load_and_clean(file.path()).unwrap();
    assert_eq!(table.column(Measurement::Pm25).unwrap(), vec![30.0, 20.0, 40.0]);
}

#[test]
fn test_month_13_fails_to_load() {
    let csv = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,WSPM\n\
               2013,13,1,0,1,1,1,1,1,1,1\n";
    let file = write_csv(csv);

    match load_and_clean(file.path()) {
        Err(ProcessingError::MalformedTimestamp { row, .. }) => assert_eq!(row, 1),
        other => panic!("expected malformed timestamp, got {:?}", other),
    }
}

#[test]
fn test_missing_required_column_fails_to_load() {
    let csv = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3\n2013,3,1,0,1,1,1,1,1,1\n";
    let file = write_csv(csv);

    let err = load_and_clean(file.path()).unwrap_err();
    assert!(matches!(err, ProcessingError::Schema { ref column } if column == "WSPM"));
}

#[test]
fn test_recleaning_is_identity() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();

    let again = DatasetCleaner::new().clean(table.to_raw().unwrap()).unwrap();
    assert_eq!(again, table);
}

#[test]
fn test_weekday_filters() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();

    let everything = filter_by_weekday(&table, &WeekdaySet::default());
    assert_eq!(everything.len(), table.len());
    assert!(everything
        .iter()
        .zip(table.iter())
        .all(|(a, b)| std::ptr::eq(a, b)));

    let nothing = filter_by_weekday(&table, &WeekdaySet::empty());
    assert!(nothing.is_empty());
    assert_eq!(hourly_mean(&nothing, Pollutant::Pm25), BTreeMap::new());

    // 2013-03-01 is a Friday (4), 2013-03-02 a Saturday (5)
    let saturday = filter_by_weekday(&table, &"sat".parse().unwrap());
    assert_eq!(saturday.len(), 24);
    let weekly = weekday_mean(&saturday, Pollutant::Pm10);
    assert_eq!(weekly.keys().copied().collect::<Vec<_>>(), vec![5]);
    let expected = (24..48).map(|i| (20 + i) as f64).sum::<f64>() / 24.0;
    assert_eq!(weekly[&5], expected);

    let hourly = hourly_mean(&everything, Pollutant::Pm10);
    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly[&0], (20.0 + 44.0) / 2.0);
}

#[test]
fn test_correlation_over_full_table() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();

    let columns = [
        Measurement::Wspm,
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::So2,
        Measurement::No2,
        Measurement::Co,
        Measurement::O3,
    ];
    let matrix = correlation_matrix(&table, &columns).unwrap();

    assert!(matrix.is_symmetric());
    for c in columns {
        assert_eq!(matrix.get(c, c), Some(1.0));
    }
    // SO2 is constant in the fixture
    assert!(matrix.get(Measurement::So2, Measurement::Pm25).unwrap().is_nan());
    assert!(matrix.get(Measurement::Pm10, Measurement::No2).unwrap() > 0.99);
}

#[test]
fn test_cache_reuses_cleaned_table() {
    let file = write_csv(&station_csv());
    let mut cache = DatasetCache::new();

    let first = cache.get_or_load(file.path()).unwrap();
    let second = cache.get_or_load(file.path()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.hits(), 1);
    assert_eq!(first.report.column(Measurement::Pm25).unwrap().mean_filled, 1);
    assert_eq!(first.report.column(Measurement::No2).unwrap().interpolated, 3);
    let o3 = first.report.column(Measurement::O3).unwrap();
    assert_eq!((o3.interpolated, o3.mean_filled), (2, 0));
}

#[test]
fn test_dashboard_report_written_as_json() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();
    let request = DashboardRequest::new(Pollutant::Pm25, WeekdaySet::from_days([4]).unwrap());
    let report = build_dashboard(&table, &request).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dashboard.json");
    JsonWriter::new().write_to_path(&report, &path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(Path::new(&path)).unwrap()).unwrap();
    assert_eq!(json["pollutant"], "PM2.5");
    assert_eq!(json["weekdays"], serde_json::json!([4]));
    assert_eq!(json["selected_records"], 24);
    assert_eq!(json["hourly_mean"].as_object().unwrap().len(), 24);
    assert_eq!(json["scatter"]["x"], "WSPM");
    assert_eq!(json["scatter"]["points"].as_array().unwrap().len(), 48);
}

#[test]
fn test_dataset_statistics() {
    let file = write_csv(&station_csv());
    let table = load_and_clean(file.path()).unwrap();
    let stats = DatasetAnalyzer::new().analyze(&table).unwrap();

    assert_eq!(stats.total_records, 48);
    assert_eq!(stats.stations, vec!["Nongzhanguan".to_string()]);
    assert_eq!(stats.column(Measurement::Pm10).unwrap().max, 67.0);
    assert!(stats.summary().contains("Nongzhanguan"));
}
