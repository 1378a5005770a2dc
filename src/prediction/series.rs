//! Rebuilds per-category monthly series from the raw prediction snapshot.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::Error;

use super::month_index::decode_month_index;

/// One element of the snapshot pushed by the prediction service.
///
/// All fields are optional: the service has shipped partial points before,
/// and one bad point must not blank the whole chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPredictionPoint {
    /// The month the prediction is for, in the service's integer encoding.
    #[serde(default)]
    pub month_index: Option<i64>,
    /// The expense category the prediction is for.
    #[serde(default)]
    pub category: Option<String>,
    /// The predicted spend for that category and month.
    #[serde(default)]
    pub predicted_monthly_expense: Option<f64>,
}

/// A complete, well-formed prediction point.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPoint {
    /// The month the prediction is for.
    pub month_index: i64,
    /// The expense category the prediction is for.
    pub category: String,
    /// The predicted spend for that category and month.
    pub predicted_monthly_expense: f64,
}

/// One line of the predictions chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The category the line is for.
    pub label: String,
    /// One entry per month label, `None` where this category has no
    /// prediction. Gaps stay gaps: `None` renders as a break in the line
    /// rather than a false zero.
    pub data: Vec<Option<f64>>,
}

/// The reconstructed chart input: a shared month axis and one dense series
/// per category.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// The sorted `"YYYY-MM"` month labels.
    pub labels: Vec<String>,
    /// One dataset per category, in first-seen order.
    pub datasets: Vec<Dataset>,
}

/// Parse the stored snapshot payload into individual points.
///
/// The payload must be a JSON array; elements that fail to parse are skipped
/// with a warning rather than failing the whole snapshot.
///
/// # Errors
/// Returns [Error::InvalidSnapshot] if the payload is not a JSON array at
/// all.
pub fn parse_snapshot(payload: &str) -> Result<Vec<RawPredictionPoint>, Error> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(payload).map_err(|error| Error::InvalidSnapshot(error.to_string()))?;

    let points = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(point) => Some(point),
            Err(error) => {
                tracing::warn!("skipping unparseable prediction point {value}: {error}");
                None
            }
        })
        .collect();

    Ok(points)
}

/// Drop malformed points, logging each skip.
///
/// A point is malformed when its month index is missing or non-positive, or
/// when its category or predicted value is missing.
pub fn well_formed_points(points: &[RawPredictionPoint]) -> Vec<PredictionPoint> {
    points
        .iter()
        .filter_map(|point| {
            let (Some(month_index), Some(category), Some(predicted_monthly_expense)) = (
                point.month_index,
                point.category.as_ref(),
                point.predicted_monthly_expense,
            ) else {
                tracing::warn!("skipping malformed prediction point: {point:?}");
                return None;
            };

            if month_index <= 0 {
                tracing::warn!("skipping prediction point with month index {month_index}");
                return None;
            }

            Some(PredictionPoint {
                month_index,
                category: category.clone(),
                predicted_monthly_expense,
            })
        })
        .collect()
}

/// Reconstruct the chart series from raw snapshot points.
///
/// Month labels are decoded from the distinct month indices in ascending
/// order (index order is chronological order). Categories keep the order they
/// first appear in the snapshot. Every dataset is dense over the whole month
/// axis, with `None` standing in for months without a prediction.
pub fn build_chart_series(points: &[RawPredictionPoint]) -> ChartSeries {
    let points = well_formed_points(points);

    let months: BTreeSet<i64> = points.iter().map(|point| point.month_index).collect();
    let labels: Vec<String> = months.iter().map(|&index| decode_month_index(index)).collect();

    let mut categories: Vec<&str> = Vec::new();
    for point in &points {
        if !categories.contains(&point.category.as_str()) {
            categories.push(&point.category);
        }
    }

    let datasets = categories
        .iter()
        .map(|&category| {
            let mut by_month: HashMap<i64, f64> = HashMap::new();
            for point in &points {
                if point.category == category {
                    by_month.insert(point.month_index, point.predicted_monthly_expense);
                }
            }

            Dataset {
                label: category.to_owned(),
                data: months
                    .iter()
                    .map(|index| by_month.get(index).copied())
                    .collect(),
            }
        })
        .collect();

    ChartSeries { labels, datasets }
}

/// Group well-formed points by month for the listing under the chart.
///
/// Months come back in chronological order; the points within a month keep
/// their snapshot order.
pub fn group_by_month(points: &[RawPredictionPoint]) -> Vec<(String, Vec<PredictionPoint>)> {
    let points = well_formed_points(points);

    let months: BTreeSet<i64> = points.iter().map(|point| point.month_index).collect();

    months
        .into_iter()
        .map(|index| {
            let in_month: Vec<PredictionPoint> = points
                .iter()
                .filter(|point| point.month_index == index)
                .cloned()
                .collect();

            (decode_month_index(index), in_month)
        })
        .collect()
}
