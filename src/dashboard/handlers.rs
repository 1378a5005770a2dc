//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxTarget;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_all_accounts, get_total_account_balance},
    dashboard::{
        aggregation::{expenses_by_category, recent_transactions},
        cards::account_cards,
        charts::{ChartConfig, chart_container, expense_breakdown_chart},
    },
    endpoints,
    html::{
        CARD_STYLE, FORM_SELECT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    timezone::current_local_date,
    transaction::{Transaction, TransactionKind, get_transactions_for_account},
};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// How many transactions the recent-transactions card lists.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The account to show in the overview section. Falls back to the default
    /// account, then the first account by name.
    pub account_id: Option<AccountId>,
}

/// Display a page with an overview of the user's accounts and recent
/// activity.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxTarget(hx_target): HxTarget,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    if accounts.is_empty() {
        return Ok(dashboard_empty_view(nav_bar).into_response());
    }

    let selected = select_account(&accounts, query.account_id);
    let transactions = get_transactions_for_account(selected.id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let today = current_local_date(&state.local_timezone)?;

    let overview = overview_section(&accounts, selected, &transactions, today);

    // The account selector swaps just the overview section.
    if hx_target.as_deref() == Some("dashboard-overview") {
        return Ok(overview.into_response());
    }

    let total_balance = get_total_account_balance(&connection)
        .inspect_err(|error| tracing::error!("could not get total balance: {error}"))?;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Dashboard" }

                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Net worth: " (format_currency(total_balance))
                        }
                    }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Create Account"
                    }
                }

                (account_cards(&accounts))

                (overview)
            }
        }
    );

    Ok(base(
        "Dashboard",
        &[HeadElement::ScriptLink("/static/echarts.min.js".to_owned())],
        &content,
    )
    .into_response())
}

/// Pick the account the overview should show.
fn select_account(accounts: &[Account], requested: Option<AccountId>) -> &Account {
    requested
        .and_then(|id| accounts.iter().find(|account| account.id == id))
        .or_else(|| accounts.iter().find(|account| account.is_default))
        .unwrap_or(&accounts[0])
}

fn overview_section(
    accounts: &[Account],
    selected: &Account,
    transactions: &[Transaction],
    today: Date,
) -> Markup {
    let recent = recent_transactions(transactions, RECENT_TRANSACTION_COUNT);
    let breakdown = expenses_by_category(transactions, today);
    let breakdown_chart = ChartConfig::new(
        "expense-breakdown-chart",
        &expense_breakdown_chart(&breakdown),
    );

    html!(
        section id="dashboard-overview" class="grid gap-4 md:grid-cols-2 w-full"
        {
            div class=(CARD_STYLE)
            {
                div class="flex items-center justify-between mb-4"
                {
                    h2 class="text-base font-medium" { "Recent Transactions" }

                    select
                        name="account_id"
                        aria-label="Select account"
                        class=(FORM_SELECT_STYLE)
                        hx-get=(endpoints::DASHBOARD_VIEW)
                        hx-target="#dashboard-overview"
                        hx-swap="outerHTML"
                        hx-trigger="change"
                    {
                        @for account in accounts {
                            option value=(account.id) selected[account.id == selected.id]
                            {
                                (account.name)
                            }
                        }
                    }
                }

                @if recent.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400 py-4"
                    {
                        "No recent transactions"
                    }
                } @else {
                    ul class="space-y-3"
                    {
                        @for transaction in &recent {
                            li class="flex items-center justify-between"
                            {
                                div
                                {
                                    p class="text-sm font-medium"
                                    {
                                        @if transaction.description.is_empty() {
                                            "Untitled Transaction"
                                        } @else {
                                            (transaction.description)
                                        }
                                    }

                                    p class="text-sm text-gray-500 dark:text-gray-400"
                                    {
                                        (transaction
                                            .date
                                            .format(DATE_FORMAT)
                                            .unwrap_or_else(|_| transaction.date.to_string()))
                                    }
                                }

                                @match transaction.kind {
                                    TransactionKind::Expense => {
                                        span class="text-red-700 dark:text-red-300 font-medium"
                                        {
                                            "-" (format_currency(transaction.amount))
                                        }
                                    }
                                    TransactionKind::Income => {
                                        span class="text-green-700 dark:text-green-300 font-medium"
                                        {
                                            "+" (format_currency(transaction.amount))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div class=(CARD_STYLE)
            {
                @if breakdown.is_empty() {
                    h2 class="text-base font-medium mb-4" { "This Month's Expenses" }

                    p class="text-center text-gray-500 dark:text-gray-400 py-4"
                    {
                        "No expenses this month"
                    }
                } @else {
                    (chart_container(&breakdown_chart))
                }
            }
        }
    )
}

fn dashboard_empty_view(nav_bar: Markup) -> Markup {
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="text-center space-y-4"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                p
                {
                    "Create an account to start tracking your finances."
                }

                a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                {
                    "Create Account"
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}
