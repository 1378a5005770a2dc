//! Defines the page showing a single account: its balance, an activity chart,
//! and the account's transactions as a filterable table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxTarget;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::{ChartConfig, activity_chart, chart_container},
    endpoints,
    html::{
        CARD_STYLE, FORM_SELECT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    pagination::PaginationConfig,
    timezone::current_local_date,
    transaction::{
        get_transactions_for_account, render_table_partial,
        table::{TableOptions, TableQuery},
    },
};

use super::{
    activity::{DayActivity, PeriodTotals, RangePreset, daily_activity, period_totals},
    core::{Account, AccountId, get_account},
};

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    /// The database connection for reading the account and its transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Query parameters for the activity chart's date range.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    /// The selected range preset, defaulting to all time.
    pub range: Option<RangePreset>,
}

/// Render the page for a single account. Responds with a 404 page when the
/// account does not exist.
///
/// The chart's range selector and the transaction table each swap only their
/// own section; the `HX-Target` header tells us which one asked.
pub async fn get_account_page(
    State(state): State<AccountPageState>,
    Path(account_id): Path<AccountId>,
    HxTarget(hx_target): HxTarget,
    Query(activity_query): Query<ActivityQuery>,
    Query(table_query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)?;

    let mut options = TableOptions::from_query(table_query);
    options.account_id = Some(account_id);

    if hx_target.as_deref() == Some("transaction-table") {
        let table = render_table_partial(options, &connection, &state.pagination_config)?;
        return Ok(table.into_response());
    }

    let transactions = get_transactions_for_account(account_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let today = current_local_date(&state.local_timezone)?;
    let range = activity_query.range.unwrap_or_default();
    let days = daily_activity(&transactions, range, today);
    let totals = period_totals(&days);

    let chart_section = activity_section(account_id, range, &days, totals);

    if hx_target.as_deref() == Some("account-chart") {
        return Ok(chart_section.into_response());
    }

    let table = render_table_partial(options, &connection, &state.pagination_config)?;
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                (account_header(&account))

                (chart_section)

                (table)
            }
        }
    );

    Ok(base(
        &account.name,
        &[HeadElement::ScriptLink("/static/echarts.min.js".to_owned())],
        &content,
    )
    .into_response())
}

fn account_header(account: &Account) -> Markup {
    html!(
        header class="flex justify-between flex-wrap items-end"
        {
            div
            {
                h1 class="text-xl font-bold capitalize" { (account.name) }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (account.kind.label()) " Account"

                    @if account.is_default {
                        " · Default"
                    }
                }
            }

            div class="text-right"
            {
                p class="text-2xl font-bold" { (format_currency(account.balance)) }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                {
                    "Create Transaction"
                }
            }
        }
    )
}

fn activity_section(
    account_id: AccountId,
    range: RangePreset,
    days: &[DayActivity],
    totals: PeriodTotals,
) -> Markup {
    let route = endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account_id);
    let net_class = if totals.net() < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    };
    let chart = ChartConfig::new("account-activity-chart", &activity_chart(days));

    html!(
        section id="account-chart" class=(CARD_STYLE)
        {
            div class="flex items-center justify-between mb-4"
            {
                h2 class="text-base font-medium" { "Transaction Overview" }

                select
                    name="range"
                    aria-label="Select date range"
                    class=(FORM_SELECT_STYLE)
                    hx-get=(route)
                    hx-target="#account-chart"
                    hx-swap="outerHTML"
                    hx-trigger="change"
                {
                    @for preset in RangePreset::all() {
                        option value=(preset.as_query_value()) selected[preset == range]
                        {
                            (preset.label())
                        }
                    }
                }
            }

            div class="flex justify-around mb-4 text-sm"
            {
                div class="text-center"
                {
                    p class="text-gray-500 dark:text-gray-400" { "Total Income" }

                    p class="text-lg font-bold text-green-700 dark:text-green-300"
                    {
                        (format_currency(totals.income))
                    }
                }

                div class="text-center"
                {
                    p class="text-gray-500 dark:text-gray-400" { "Total Expenses" }

                    p class="text-lg font-bold text-red-700 dark:text-red-300"
                    {
                        (format_currency(totals.expense))
                    }
                }

                div class="text-center"
                {
                    p class="text-gray-500 dark:text-gray-400" { "Net" }

                    p class={"text-lg font-bold " (net_class)}
                    {
                        (format_currency(totals.net()))
                    }
                }
            }

            @if days.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400 py-8"
                {
                    "No transactions in this range."
                }
            } @else {
                (chart_container(&chart))
            }
        }
    )
}
