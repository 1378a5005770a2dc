//! Defines the page showing predicted monthly expenses per category.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, JsFunction, LineStyle, LineStyleType, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{ChartConfig, chart_container},
    endpoints,
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
};

use super::{
    core::load_snapshot,
    series::{ChartSeries, PredictionPoint, build_chart_series, group_by_month, parse_snapshot},
};

/// The state needed for the predictions page.
#[derive(Debug, Clone)]
pub struct PredictionsViewState {
    /// The database connection for reading the stored snapshot.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PredictionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page with the prediction chart and the per-month listing.
///
/// A missing or unreadable snapshot renders an empty state rather than an
/// error: predictions are a nicety, and the rest of the app should not look
/// broken because the external service has not pushed yet.
pub async fn get_predictions_page(
    State(state): State<PredictionsViewState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let snapshot = load_snapshot(&connection)
        .inspect_err(|error| tracing::error!("could not load prediction snapshot: {error}"))?;

    let content = match snapshot {
        None => predictions_content(None),
        Some((payload, imported_on)) => match parse_snapshot(&payload) {
            Ok(points) => {
                let series = build_chart_series(&points);
                let grouped = group_by_month(&points);

                predictions_content(Some((series, grouped, imported_on)))
            }
            Err(error) => {
                tracing::warn!("stored prediction snapshot is unreadable: {error}");
                predictions_content(None)
            }
        },
    };

    Ok(base(
        "Predictions",
        &[HeadElement::ScriptLink("/static/echarts.min.js".to_owned())],
        &content,
    )
    .into_response())
}

type PageData = (ChartSeries, Vec<(String, Vec<PredictionPoint>)>, Date);

fn predictions_content(data: Option<PageData>) -> Markup {
    let nav_bar = NavBar::new(endpoints::PREDICTIONS_VIEW).into_html();

    html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                h1 class="text-xl font-bold" { "Monthly Expense Predictions" }

                @match data {
                    None => {
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "No predicted expenses available yet. \
                            Predictions appear here once the forecast service has \
                            processed your transactions."
                        }
                    }
                    Some((series, grouped, imported_on)) => {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Last updated " (imported_on)
                        }

                        @if series.labels.is_empty() {
                            p class="text-gray-500 dark:text-gray-400"
                            {
                                "The latest snapshot contained no usable predictions."
                            }
                        } @else {
                            section class=(CARD_STYLE)
                            {
                                (chart_container(&ChartConfig::new(
                                    "predictions-chart",
                                    &predictions_chart(&series),
                                )))
                            }

                            (grouped_listing(&grouped))
                        }
                    }
                }
            }
        }
    )
}

fn grouped_listing(grouped: &[(String, Vec<PredictionPoint>)]) -> Markup {
    html!(
        section class="space-y-6"
        {
            h2 class="text-lg font-semibold" { "Predicted Expenses by Month" }

            @for (label, points) in grouped {
                div data-prediction-month=(label)
                {
                    h3 class="text-base font-medium mb-2" { (label) }

                    ul class="space-y-2"
                    {
                        @for point in points {
                            li class={(CARD_STYLE) " flex justify-between items-center"}
                            {
                                span class="font-medium capitalize" { (point.category) }

                                span class="text-red-700 dark:text-red-300"
                                {
                                    (format_currency(point.predicted_monthly_expense))
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

/// One dashed line per category over the shared month axis. Months without a
/// prediction stay as gaps in the line.
fn predictions_chart(series: &ChartSeries) -> Chart {
    let mut chart = Chart::new()
        .title(Title::new().text("Predicted Monthly Expenses"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("12%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for dataset in &series.datasets {
        chart = chart.series(
            Line::new()
                .name(&dataset.label)
                .line_style(LineStyle::new().type_(LineStyleType::Dashed))
                .data(dataset.data.clone()),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{db::initialize, prediction::core::save_snapshot};

    use super::{PredictionsViewState, get_predictions_page};

    fn get_test_state() -> PredictionsViewState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        PredictionsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn page_shows_empty_state_without_a_snapshot() {
        let state = get_test_state();

        let response = get_predictions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No predicted expenses available yet."));
    }

    #[tokio::test]
    async fn page_renders_chart_and_monthly_listing() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            save_snapshot(
                r#"[
                    {"month_index": 24293, "category": "groceries", "predicted_monthly_expense": 120.0},
                    {"month_index": 24294, "category": "groceries", "predicted_monthly_expense": 130.0}
                ]"#,
                date!(2024 - 06 - 01),
                &connection,
            )
            .unwrap();
        }

        let response = get_predictions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let chart_selector = Selector::parse("#predictions-chart").unwrap();
        assert!(html.select(&chart_selector).next().is_some());

        let month_selector = Selector::parse("[data-prediction-month]").unwrap();
        assert_eq!(html.select(&month_selector).count(), 2);
    }

    #[tokio::test]
    async fn unreadable_snapshot_falls_back_to_the_empty_state() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            save_snapshot("not json at all", date!(2024 - 06 - 01), &connection).unwrap();
        }

        let response = get_predictions_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No predicted expenses available yet."));
    }
}
