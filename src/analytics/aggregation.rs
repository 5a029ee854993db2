//! Summaries of a user's transactions.
//!
//! The functions here are pure, the handlers load the transactions for the
//! window and pass them in.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    analytics::period::month_start,
    transaction::{Transaction, TransactionType},
};

/// Income and expense totals over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    /// Net savings as a whole percentage of income, zero without income.
    pub savings_rate: i64,
    pub transaction_count: usize,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// The month name in capitals, e.g. "MARCH".
    pub month: String,
    pub year: i32,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInsight {
    pub category: String,
    pub amount: f64,
    /// The whole percentage of all expenses in the period.
    pub percentage: i64,
}

/// Round to the nearest integer with halves rounded up, e.g. -2.5 becomes -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn sum_by_type(transactions: &[&Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Total the income and expenses of `transactions`.
pub fn overview(transactions: &[Transaction]) -> Overview {
    let transactions: Vec<&Transaction> = transactions.iter().collect();
    let total_income = sum_by_type(&transactions, TransactionType::Income);
    let total_expenses = sum_by_type(&transactions, TransactionType::Expense);
    let net_savings = total_income - total_expenses;

    let savings_rate = if total_income > 0.0 {
        round_half_up(net_savings / total_income * 100.0)
    } else {
        0
    };

    Overview {
        total_income,
        total_expenses,
        net_savings,
        savings_rate,
        transaction_count: transactions.len(),
    }
}

/// Total income and expenses for each month in `months`, given as the first
/// day of each month.
///
/// The result has one entry per month in the same order, months without
/// transactions have zero totals.
pub fn monthly_trends(transactions: &[Transaction], months: &[Date]) -> Vec<MonthlyTrend> {
    let mut transactions_by_month: HashMap<Date, Vec<&Transaction>> = HashMap::new();

    for transaction in transactions {
        transactions_by_month
            .entry(month_start(transaction.date))
            .or_default()
            .push(transaction);
    }

    months
        .iter()
        .map(|month| {
            let month_transactions = transactions_by_month
                .get(month)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let income = sum_by_type(month_transactions, TransactionType::Income);
            let expenses = sum_by_type(month_transactions, TransactionType::Expense);

            MonthlyTrend {
                month: month.month().to_string().to_uppercase(),
                year: month.year(),
                income,
                expenses,
                savings: income - expenses,
            }
        })
        .collect()
}

/// Total the expenses in `transactions` by category, largest first.
///
/// Categories with the same total are sorted by name.
pub fn category_insights(transactions: &[Transaction]) -> Vec<CategoryInsight> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
    {
        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
    }

    let total_expenses: f64 = totals.values().sum();

    let mut insights: Vec<CategoryInsight> = totals
        .into_iter()
        .map(|(category, amount)| CategoryInsight {
            category: category.to_owned(),
            amount,
            percentage: if total_expenses > 0.0 {
                round_half_up(amount / total_expenses * 100.0)
            } else {
                0
            },
        })
        .collect();

    insights.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    insights
}
