//! The transaction data model: [`Transaction`], [`Input`], and [`Output`].

mod input;
mod output;
mod transaction;

pub use input::{Input, DEFAULT_SEQUENCE};
pub use output::{Output, Value, BLANKED_VALUE};
pub use transaction::Transaction;
