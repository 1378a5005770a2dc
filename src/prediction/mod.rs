//! Expense predictions pushed by an external forecast service: the month
//! index codec, the series reconstruction for charting, snapshot storage, and
//! the page and import endpoint built on them.

pub(crate) mod core;
mod import_endpoint;
mod month_index;
mod predictions_page;
mod series;

pub use self::core::{create_prediction_snapshot_table, load_snapshot, save_snapshot};
pub use import_endpoint::{ImportPredictionsState, import_predictions_endpoint};
pub use month_index::{decode_month_index, encode_month_index};
pub use predictions_page::{PredictionsViewState, get_predictions_page};
pub use series::{
    ChartSeries, Dataset, PredictionPoint, RawPredictionPoint, build_chart_series,
    group_by_month, parse_snapshot, well_formed_points,
};
