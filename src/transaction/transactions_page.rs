//! Defines the route handler for the page that displays transactions as a
//! table.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    pagination::PaginationConfig,
};

use super::{
    core::{get_transactions, get_transactions_for_account},
    table::{TableOptions, TableQuery, build_table_view},
    view::transaction_table,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Rebuild the table section from a fresh database snapshot.
///
/// Loads the source list (scoped to `options.account_id` when set), prunes the
/// selection down to ids that still exist, derives the visible rows, and
/// renders the section against the route the table lives on.
pub(crate) fn render_table_partial(
    mut options: TableOptions,
    connection: &Connection,
    pagination_config: &PaginationConfig,
) -> Result<Markup, Error> {
    let (route, transactions) = match options.account_id {
        Some(account_id) => (
            endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account_id),
            get_transactions_for_account(account_id, connection)?,
        ),
        None => (
            endpoints::TRANSACTIONS_VIEW.to_owned(),
            get_transactions(connection)?,
        ),
    };

    let known: HashSet<_> = transactions.iter().map(|transaction| transaction.id).collect();
    options.selected.retain_known(&known);

    let view = build_table_view(
        &transactions,
        &options,
        pagination_config.default_page_size,
    );

    Ok(transaction_table(&route, &options, &view))
}

/// Render an overview of the user's transactions across all accounts.
///
/// htmx requests (filter changes, sorting, paging, selection changes) get just
/// the table section back; everything else gets the full page.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut options = TableOptions::from_query(query);
    // This page always shows every account; scoped tables live on the account
    // pages.
    options.account_id = None;

    let table = render_table_partial(options, &connection, &state.pagination_config)?;

    if is_htmx {
        return Ok(table.into_response());
    }

    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full"
            {
                header class="flex justify-between flex-wrap items-end lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Transaction"
                    }
                }

                (table)
            }
        }
    );

    Ok(base("Transactions", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use axum_extra::extract::Query;
    use axum_htmx::HxRequest;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
        pagination::PaginationConfig,
        transaction::{
            Transaction, TransactionKind, create_transaction,
            table::TableQuery,
        },
    };

    use super::{TransactionsViewState, get_transactions_page};

    fn get_test_state() -> TransactionsViewState {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account(
            &NewAccount {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: true,
            },
            &mut conn,
        )
        .unwrap();

        for i in 1..=25 {
            let kind = if i % 2 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            create_transaction(
                Transaction::build(
                    account.id,
                    i as f64,
                    date!(2024 - 01 - 01) + time::Duration::days(i),
                    &format!("transaction #{i}"),
                )
                .kind(kind),
                &conn,
            )
            .unwrap();
        }

        TransactionsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
        }
    }

    async fn parse_html(response: Response) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("Could not get response body");
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    fn count_rows(html: &Html) -> usize {
        let row_selector = Selector::parse("tbody tr[data-transaction-row='true']").unwrap();
        html.select(&row_selector).count()
    }

    #[tokio::test]
    async fn first_page_shows_ten_rows() {
        let state = get_test_state();

        let response = get_transactions_page(
            State(state),
            HxRequest(false),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        assert_eq!(count_rows(&html), 10);

        let current_page = Selector::parse("[aria-current='page']").unwrap();
        let current = html
            .select(&current_page)
            .next()
            .expect("pagination should mark the current page");
        assert_eq!(current.text().collect::<String>().trim(), "1");
    }

    #[tokio::test]
    async fn kind_filter_reduces_the_row_count() {
        let state = get_test_state();

        let response = get_transactions_page(
            State(state),
            HxRequest(false),
            Query(TableQuery {
                kind: Some(TransactionKind::Income),
                ..TableQuery::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        // 12 income transactions, page size 10.
        assert_eq!(count_rows(&html), 10);
        let summary_selector = Selector::parse("nav[aria-label='Pagination'] p").unwrap();
        let summary = html
            .select(&summary_selector)
            .next()
            .expect("pagination summary missing")
            .text()
            .collect::<String>();
        assert!(
            summary.contains("(12 transactions)"),
            "want 12 filtered transactions in summary, got {summary:?}"
        );
    }

    #[tokio::test]
    async fn stale_page_numbers_clamp_to_the_last_page() {
        let state = get_test_state();

        let response = get_transactions_page(
            State(state),
            HxRequest(false),
            Query(TableQuery {
                page: Some(9),
                ..TableQuery::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        assert_valid_html(&html);
        assert_eq!(count_rows(&html), 5, "the last page holds the remainder");
    }

    #[tokio::test]
    async fn htmx_requests_get_only_the_table_section() {
        let state = get_test_state();

        let response = get_transactions_page(
            State(state),
            HxRequest(true),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let nav_selector = Selector::parse("nav[aria-label='Primary']").unwrap();
        assert!(
            html.select(&nav_selector).next().is_none(),
            "partial responses must not include the page chrome"
        );
        assert_eq!(count_rows(&html), 10);
    }

    #[tokio::test]
    async fn selection_from_the_query_is_rendered_checked() {
        let state = get_test_state();

        let response = get_transactions_page(
            State(state),
            HxRequest(true),
            Query(TableQuery {
                selected: vec![1, 2, 999],
                ..TableQuery::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html(response).await;
        let hidden_selector =
            Selector::parse("#transaction-filters input[type='hidden'][name='selected']").unwrap();
        let hidden_values: Vec<String> = html
            .select(&hidden_selector)
            .filter_map(|input| input.value().attr("value").map(str::to_owned))
            .collect();

        // 999 does not exist, so the selection invariant prunes it.
        assert_eq!(hidden_values, ["1", "2"]);

        let delete_selector = Selector::parse("button[data-bulk-delete='true']").unwrap();
        let button_text = html
            .select(&delete_selector)
            .next()
            .expect("bulk delete button should show for a non-empty selection")
            .text()
            .collect::<String>();
        assert!(button_text.contains("(2)"));
    }
}
