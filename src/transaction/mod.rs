//! Everything for recording and displaying transactions: the data model and
//! queries, the table view-model engine, and the pages and endpoints built on
//! them.

mod bulk_delete_endpoint;
mod categories;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod models;
pub mod table;
mod transactions_page;
mod view;

pub use bulk_delete_endpoint::{BulkDeleteState, bulk_delete_transactions_endpoint};
pub use categories::{CATEGORIES, Category, category_color, category_label, get_category};
pub use self::core::{
    create_transaction, create_transaction_table, delete_transaction, delete_transactions,
    get_transaction, get_transactions, get_transactions_for_account, update_transaction,
};
pub use create_endpoint::{CreateTransactionState, TransactionForm, create_transaction_endpoint};
pub use create_page::{CreateTransactionPageState, get_create_transaction_page};
pub use delete_endpoint::{DeleteTransactionState, delete_transaction_endpoint};
pub use edit_endpoint::{EditTransactionState, edit_transaction_endpoint};
pub use edit_page::{EditTransactionPageState, get_edit_transaction_page};
pub use models::{
    RecurringInterval, Transaction, TransactionBuilder, TransactionId, TransactionKind,
};
pub use transactions_page::{TransactionsViewState, get_transactions_page};

pub(crate) use transactions_page::render_table_partial;
