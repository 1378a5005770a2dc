//! Everything for managing accounts: the data model and queries, the account
//! list and detail pages, and the account endpoints.

mod account_page;
mod accounts_page;
pub mod activity;
mod core;
mod create_endpoint;
mod create_page;
mod default_endpoint;
mod delete_endpoint;

pub use account_page::{AccountPageState, ActivityQuery, get_account_page};
pub use accounts_page::{AccountsViewState, get_accounts_page};
pub use self::core::{
    Account, AccountId, AccountKind, NewAccount, create_account, create_account_table,
    get_account, get_all_accounts, get_default_account, get_total_account_balance,
    map_row_to_account, set_default_account,
};
pub use create_endpoint::{AccountForm, CreateAccountState, create_account_endpoint};
pub use create_page::get_create_account_page;
pub use default_endpoint::{DefaultAccountState, set_default_account_endpoint};
pub use delete_endpoint::{DeleteAccountState, delete_account_endpoint};
