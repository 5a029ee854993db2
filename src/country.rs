//! The countries and currencies users can pick during onboarding.

use axum::Json;
use serde::Serialize;

/// A country with its currency code and flag emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    /// An ISO 4217 currency code, e.g. "NZD".
    pub currency: &'static str,
    pub flag: &'static str,
}

const fn country(name: &'static str, currency: &'static str, flag: &'static str) -> Country {
    Country {
        name,
        currency,
        flag,
    }
}

/// Sorted by name.
pub const COUNTRIES: &[Country] = &[
    country("Afghanistan", "AFN", "🇦🇫"),
    country("Albania", "ALL", "🇦🇱"),
    country("Algeria", "DZD", "🇩🇿"),
    country("Argentina", "ARS", "🇦🇷"),
    country("Australia", "AUD", "🇦🇺"),
    country("Austria", "EUR", "🇦🇹"),
    country("Bangladesh", "BDT", "🇧🇩"),
    country("Belgium", "EUR", "🇧🇪"),
    country("Brazil", "BRL", "🇧🇷"),
    country("Canada", "CAD", "🇨🇦"),
    country("Chile", "CLP", "🇨🇱"),
    country("China", "CNY", "🇨🇳"),
    country("Colombia", "COP", "🇨🇴"),
    country("Czech Republic", "CZK", "🇨🇿"),
    country("Denmark", "DKK", "🇩🇰"),
    country("Egypt", "EGP", "🇪🇬"),
    country("Finland", "EUR", "🇫🇮"),
    country("France", "EUR", "🇫🇷"),
    country("Germany", "EUR", "🇩🇪"),
    country("Ghana", "GHS", "🇬🇭"),
    country("Greece", "EUR", "🇬🇷"),
    country("Hong Kong", "HKD", "🇭🇰"),
    country("Hungary", "HUF", "🇭🇺"),
    country("India", "INR", "🇮🇳"),
    country("Indonesia", "IDR", "🇮🇩"),
    country("Ireland", "EUR", "🇮🇪"),
    country("Israel", "ILS", "🇮🇱"),
    country("Italy", "EUR", "🇮🇹"),
    country("Japan", "JPY", "🇯🇵"),
    country("Kenya", "KES", "🇰🇪"),
    country("Malaysia", "MYR", "🇲🇾"),
    country("Mexico", "MXN", "🇲🇽"),
    country("Nepal", "NPR", "🇳🇵"),
    country("Netherlands", "EUR", "🇳🇱"),
    country("New Zealand", "NZD", "🇳🇿"),
    country("Nigeria", "NGN", "🇳🇬"),
    country("Norway", "NOK", "🇳🇴"),
    country("Pakistan", "PKR", "🇵🇰"),
    country("Peru", "PEN", "🇵🇪"),
    country("Philippines", "PHP", "🇵🇭"),
    country("Poland", "PLN", "🇵🇱"),
    country("Portugal", "EUR", "🇵🇹"),
    country("Romania", "RON", "🇷🇴"),
    country("Russia", "RUB", "🇷🇺"),
    country("Saudi Arabia", "SAR", "🇸🇦"),
    country("Singapore", "SGD", "🇸🇬"),
    country("South Africa", "ZAR", "🇿🇦"),
    country("South Korea", "KRW", "🇰🇷"),
    country("Spain", "EUR", "🇪🇸"),
    country("Sri Lanka", "LKR", "🇱🇰"),
    country("Sweden", "SEK", "🇸🇪"),
    country("Switzerland", "CHF", "🇨🇭"),
    country("Taiwan", "TWD", "🇹🇼"),
    country("Thailand", "THB", "🇹🇭"),
    country("Turkey", "TRY", "🇹🇷"),
    country("Ukraine", "UAH", "🇺🇦"),
    country("United Arab Emirates", "AED", "🇦🇪"),
    country("United Kingdom", "GBP", "🇬🇧"),
    country("United States", "USD", "🇺🇸"),
    country("Vietnam", "VND", "🇻🇳"),
];

/// A route handler for listing the supported countries. Does not require a token.
pub async fn get_countries() -> Json<&'static [Country]> {
    Json(COUNTRIES)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{country::COUNTRIES, endpoints, test_utils::get_test_server};

    #[test]
    fn countries_are_sorted_and_unique() {
        let names: Vec<&str> = COUNTRIES.iter().map(|country| country.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();

        assert_eq!(names, sorted);
    }

    #[test]
    fn currency_codes_are_three_capital_letters() {
        for country in COUNTRIES {
            assert_eq!(country.currency.len(), 3, "{}", country.name);
            assert!(
                country.currency.chars().all(|c| c.is_ascii_uppercase()),
                "{}",
                country.name
            );
        }
    }

    #[tokio::test]
    async fn countries_are_public() {
        let server = get_test_server();

        let response = server.get(endpoints::COUNTRIES).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body.as_array().unwrap().len(), COUNTRIES.len());
        assert!(body.as_array().unwrap().contains(&json!({
            "name": "New Zealand",
            "currency": "NZD",
            "flag": "\u{1F1F3}\u{1F1FF}",
        })));
    }
}
