pub mod correlation;
pub mod dashboard;
pub mod dataset_analyzer;
pub mod views;

pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use dashboard::{build_dashboard, default_correlation_columns, DashboardReport, DashboardRequest};
pub use dataset_analyzer::{ColumnStats, DatasetAnalyzer, DatasetStatistics};
pub use views::{
    filter_by_weekday, group_mean, hourly_mean, scatter_pairs, weekday_mean, ScatterSeries,
    TableView,
};
