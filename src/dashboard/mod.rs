//! Dashboard module
//!
//! Provides an overview page showing account cards, recent transactions, and
//! a current-month expense breakdown chart.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use handlers::{DashboardQuery, DashboardState, get_dashboard_page};

pub(crate) use charts::{ChartConfig, activity_chart, chart_container};
