//! Defines the page that lists all accounts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_LINK_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
};

use super::core::{Account, get_all_accounts};

/// The state needed for the accounts page.
#[derive(Debug, Clone)]
pub struct AccountsViewState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the list of accounts as a swap-friendly section.
///
/// The set-default and delete endpoints re-render this section after a
/// successful mutation.
pub(crate) fn accounts_list(accounts: &[Account]) -> Markup {
    html!(
        section id="accounts-list" class="space-y-4 w-full lg:max-w-3xl lg:mx-auto"
        {
            @if accounts.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400 py-4"
                {
                    "No accounts yet."
                }
            }

            @for account in accounts {
                article class={(CARD_STYLE) " flex flex-wrap items-center justify-between gap-4"} data-account-row="true"
                {
                    div
                    {
                        h2 class="font-medium"
                        {
                            (account.name)

                            @if account.is_default {
                                span class="ml-2 text-xs font-semibold text-blue-700 dark:text-blue-300"
                                {
                                    "Default"
                                }
                            }
                        }

                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (account.kind.label()) " Account · " (format_currency(account.balance))
                        }
                    }

                    div class="flex items-center gap-4"
                    {
                        a
                            href=(endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account.id))
                            class=(LINK_STYLE)
                        {
                            "View"
                        }

                        @if !account.is_default {
                            button
                                type="button"
                                class=(LINK_STYLE)
                                hx-put=(endpoints::format_endpoint(endpoints::DEFAULT_ACCOUNT, account.id))
                                hx-target="#accounts-list"
                                hx-swap="outerHTML"
                                hx-target-error="#alert-container"
                            {
                                "Make Default"
                            }
                        }

                        button
                            type="button"
                            class=(BUTTON_DELETE_LINK_STYLE)
                            hx-delete=(endpoints::format_endpoint(endpoints::ACCOUNT, account.id))
                            hx-target="#accounts-list"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            hx-confirm={
                                "Delete the account \"" (account.name)
                                "\" and all of its transactions? This cannot be undone."
                            }
                        {
                            "Delete"
                        }
                    }
                }
            }
        }
    )
}

/// Render the page listing every account.
pub async fn get_accounts_page(
    State(state): State<AccountsViewState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 w-full"
            {
                header class="flex justify-between flex-wrap items-end lg:max-w-3xl lg:w-full lg:mx-auto"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE)
                    {
                        "Create Account"
                    }
                }

                (accounts_list(&accounts))
            }
        }
    );

    Ok(base("Accounts", &[], &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, response::Response};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        account::{AccountKind, NewAccount, create_account},
        db::initialize,
    };

    use super::{AccountsViewState, get_accounts_page};

    async fn parse_html(response: Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }

    #[tokio::test]
    async fn lists_every_account() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account(
            &NewAccount {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 100.0,
                is_default: true,
            },
            &mut conn,
        )
        .unwrap();
        create_account(
            &NewAccount {
                name: "Rainy Day".to_owned(),
                kind: AccountKind::Savings,
                balance: 2500.0,
                is_default: false,
            },
            &mut conn,
        )
        .unwrap();
        let state = AccountsViewState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        let html = parse_html(response).await;
        let row_selector = Selector::parse("[data-account-row='true']").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);

        // The default account should not offer a "Make Default" button.
        let make_default_selector = Selector::parse("button[hx-put]").unwrap();
        assert_eq!(html.select(&make_default_selector).count(), 1);
    }
}
