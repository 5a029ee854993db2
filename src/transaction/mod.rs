//! Income and expense records.
//!
//! This module contains the `Transaction` model, the database functions for
//! storing and querying transactions, and the JSON endpoints that expose them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod request;

pub use core::{
    NewTransaction, Transaction, TransactionFilter, TransactionState, TransactionType,
    create_transaction, create_transaction_table, delete_transaction, get_transaction_for_user,
    get_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use request::TransactionRequest;
