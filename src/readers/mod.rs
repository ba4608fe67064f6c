pub mod station_file_reader;

pub use station_file_reader::{parse_measurement, ColumnLayout, StationFileReader};
