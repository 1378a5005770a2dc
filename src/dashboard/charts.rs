//! Chart builders for the dashboard and account pages.
//!
//! Charts are built as ECharts configurations, serialized to JSON, and
//! initialized by a small inline script next to their container. The script
//! runs both on a full page load and when htmx swaps a chart section in.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{account::activity::DayActivity, transaction::category_label};

const DAY_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none]");

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct ChartConfig {
    /// The HTML element ID to use for the chart (kebab-case).
    pub id: &'static str,
    /// The ECharts configuration as a JSON string.
    pub options: String,
}

impl ChartConfig {
    pub(crate) fn new(id: &'static str, chart: &Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Render a chart container and the script that initializes it.
///
/// The script initializes immediately when the document is already loaded,
/// which is the case when htmx swaps the chart in, and waits for
/// `DOMContentLoaded` otherwise.
pub(crate) fn chart_container(config: &ChartConfig) -> Markup {
    let script = format!(
        r#"(function() {{
            const init = function() {{
                const chartDom = document.getElementById("{id}");
                if (chartDom === null) {{
                    return;
                }}
                const chart = echarts.init(chartDom);
                chart.setOption({options});

                window.addEventListener('resize', chart.resize);

                const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                const updateTheme = () => {{
                    chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                }};
                darkModeMediaQuery.addEventListener('change', updateTheme);
                updateTheme();
            }};

            if (document.readyState === 'loading') {{
                document.addEventListener('DOMContentLoaded', init);
            }} else {{
                init();
            }}
        }})();"#,
        id = config.id,
        options = config.options
    );

    html!(
        div id=(config.id) class="min-h-[320px] rounded dark:bg-gray-100" {}

        script { (PreEscaped(script)) }
    )
}

/// A bar chart of an account's daily income and expenses.
pub(crate) fn activity_chart(days: &[DayActivity]) -> Chart {
    let labels: Vec<String> = days
        .iter()
        .map(|day| {
            day.date
                .format(DAY_LABEL_FORMAT)
                .unwrap_or_else(|_| day.date.to_string())
        })
        .collect();
    let income: Vec<f64> = days.iter().map(|day| day.income).collect();
    let expense: Vec<f64> = days.iter().map(|day| day.expense).collect();

    Chart::new()
        .title(Title::new().text("Activity"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expense")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expense),
        )
}

/// A pie chart of the current month's expenses grouped by category.
pub(crate) fn expense_breakdown_chart(expenses_by_category: &[(String, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = expenses_by_category
        .iter()
        .map(|(category, total)| (*total, category_label(category)))
        .collect();

    Chart::new()
        .title(Title::new().text("This Month's Expenses"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "65%"])
                .data(data),
        )
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

/// Creates a tooltip configuration for currency values.
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
