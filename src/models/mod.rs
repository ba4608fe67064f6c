pub mod measurement;
pub mod record;
pub mod table;
pub mod weekday;

pub use measurement::{Measurement, Pollutant};
pub use record::{RawRecord, RawTable};
pub use table::{CleanedRecord, CleanedTable};
pub use weekday::{weekday_name, WeekdaySet};
