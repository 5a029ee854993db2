//! Date windows for the analytics endpoints.

use time::{Date, Duration};

/// How far back the analytics look from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The last seven days.
    Week,
    /// From the first of the current month.
    Month,
    /// The last year.
    Year,
}

impl Period {
    /// Parse the `period` query parameter. Anything other than "week" or "year" means a month.
    pub fn from_query(period: Option<&str>) -> Self {
        match period.map(str::trim) {
            Some("week") => Period::Week,
            Some("year") => Period::Year,
            _ => Period::Month,
        }
    }

    /// The first day of the window ending on `today`.
    pub fn start_date(self, today: Date) -> Date {
        match self {
            Period::Week => today - Duration::weeks(1),
            Period::Month => month_start(today),
            // 29 February has no counterpart in the previous year, use the 28th instead.
            Period::Year => today
                .replace_year(today.year() - 1)
                .unwrap_or_else(|_| today - Duration::days(366)),
        }
    }

    /// The inclusive date range of the window ending on `today`.
    pub fn date_range(self, today: Date) -> (Date, Date) {
        (self.start_date(today), today)
    }
}

/// The first day of the month containing `date`.
pub fn month_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The last day of the month containing `date`.
pub fn month_end(date: Date) -> Date {
    // 31 days after the first of any month is always in the next month.
    let next_month = month_start(month_start(date) + Duration::days(31));

    next_month - Duration::days(1)
}

/// The first day of each of the last `count` months up to and including the month of `today`,
/// oldest first.
pub fn last_months(today: Date, count: u32) -> Vec<Date> {
    let mut months = Vec::with_capacity(count as usize);
    let mut month = month_start(today);

    for _ in 0..count {
        months.push(month);
        month = month_start(month - Duration::days(1));
    }

    months.reverse();
    months
}
