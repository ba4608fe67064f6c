pub mod cleaner;
pub mod cleaning_report;
pub mod imputation;
pub mod interpolation;

pub use cleaner::{derive_timestamp, DatasetCleaner};
pub use cleaning_report::{CleaningReport, ColumnRepair};
pub use imputation::{column_mean, fill_with_mean, MeanFill};
pub use interpolation::interpolate_forward;
