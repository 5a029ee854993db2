//! Summaries of a user's income and spending.

mod aggregation;
mod handlers;
mod period;

pub use handlers::{get_category_insights, get_overview, get_spending_trends};
