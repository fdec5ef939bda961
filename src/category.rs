//! Recurrence frequencies and the suggested option lists shown to clients.
//!
//! Expense categories and payment methods are free-form strings, the lists
//! here are only suggestions. Frequencies are a closed set.

use std::{fmt::Display, str::FromStr};

use axum::Json;
use rusqlite::{Row, types::Type};
use serde::{Deserialize, Serialize};

/// The expense categories suggested to clients.
pub const EXPENSE_CATEGORIES: [&str; 14] = [
    "Housing",
    "Transportation",
    "Food",
    "Utilities",
    "Insurance",
    "Healthcare",
    "Education",
    "Entertainment",
    "Personal Care",
    "Clothing",
    "Savings",
    "Debt Payments",
    "Gifts/Donations",
    "Miscellaneous",
];

/// The payment methods suggested to clients.
pub const PAYMENT_METHODS: [&str; 6] = [
    "Cash",
    "Credit Card",
    "Debit Card",
    "Bank Transfer",
    "Mobile Payment",
    "Other",
];

/// How often a recurring income or expense repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every week.
    Weekly,
    /// Every second week.
    Biweekly,
    /// Every month.
    Monthly,
    /// Every three months.
    Quarterly,
    /// Every year.
    Annually,
}

impl Frequency {
    /// Every frequency, from most to least often.
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annually,
    ];

    /// The text used for the frequency in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text did not name a known [Frequency].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown frequency \"{0}\"")]
pub struct UnknownFrequency(String);

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == text)
            .ok_or_else(|| UnknownFrequency(text.to_owned()))
    }
}

/// Read an optional frequency stored as text at column `index` of `row`.
pub(crate) fn get_optional_frequency(
    row: &Row,
    index: usize,
) -> Result<Option<Frequency>, rusqlite::Error> {
    let text: Option<String> = row.get(index)?;

    text.map(|text| {
        Frequency::from_str(&text).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
        })
    })
    .transpose()
}

/// The option lists returned by the categories endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptions {
    /// Suggested expense and budget categories.
    pub expense_categories: Vec<&'static str>,
    /// Suggested expense payment methods.
    pub payment_methods: Vec<&'static str>,
    /// The accepted recurrence frequencies.
    pub frequencies: Vec<Frequency>,
}

/// Return the suggested categories, payment methods and frequencies.
pub async fn get_categories_endpoint() -> Json<CategoryOptions> {
    Json(CategoryOptions {
        expense_categories: EXPENSE_CATEGORIES.to_vec(),
        payment_methods: PAYMENT_METHODS.to_vec(),
        frequencies: Frequency::ALL.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{EXPENSE_CATEGORIES, Frequency, get_categories_endpoint};

    #[test]
    fn frequency_text_round_trips() {
        for frequency in Frequency::ALL {
            assert_eq!(Frequency::from_str(frequency.as_str()), Ok(frequency));
        }
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert!(Frequency::from_str("fortnightly").is_err());
        assert!(Frequency::from_str("Weekly").is_err());
    }

    #[test]
    fn frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Biweekly).unwrap();

        assert_eq!(json, "\"biweekly\"");
    }

    #[tokio::test]
    async fn categories_endpoint_lists_all_options() {
        let options = get_categories_endpoint().await.0;

        assert_eq!(options.expense_categories, EXPENSE_CATEGORIES.to_vec());
        assert_eq!(options.payment_methods.len(), 6);
        assert_eq!(options.frequencies, Frequency::ALL.to_vec());
    }
}
