//! Sums transaction amounts by category.
//!
//! The totals remember the order in which each category was first seen, which
//! the dashboard relies on to break ties between equally large categories.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

/// A record that carries a category label and an amount, e.g. an expense.
pub trait Categorized {
    /// The category label, compared exactly (case and whitespace sensitive).
    fn category(&self) -> &str;
    /// The amount of money recorded.
    fn amount(&self) -> Decimal;
}

/// The summed amount for a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the amounts recorded against the category.
    pub total: Decimal,
}

/// A mapping from category to summed amount, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    totals: Vec<CategoryTotal>,
    positions: HashMap<String, usize>,
}

impl CategoryTotals {
    /// Add `amount` to the running total for `category`.
    pub fn add(&mut self, category: &str, amount: Decimal) {
        if let Some(&position) = self.positions.get(category) {
            self.totals[position].total += amount;
            return;
        }

        self.positions.insert(category.to_owned(), self.totals.len());
        self.totals.push(CategoryTotal {
            category: category.to_owned(),
            total: amount,
        });
    }

    /// The total for `category`, or `None` if nothing was recorded against it.
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.positions
            .get(category)
            .map(|&position| self.totals[position].total)
    }

    /// The number of distinct categories.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether no amounts have been recorded.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Iterate over the totals in the order each category was first seen.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.totals.iter()
    }

    /// The sum over all categories.
    pub fn grand_total(&self) -> Decimal {
        self.totals.iter().map(|total| total.total).sum()
    }

    /// Consume the totals and return them sorted from largest to smallest.
    ///
    /// Categories with equal totals keep their first-seen order.
    pub fn into_sorted_desc(self) -> Vec<CategoryTotal> {
        let mut totals = self.totals;
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }
}

/// Sum the amounts of `records` by their exact category label.
///
/// An empty input produces empty totals.
pub fn aggregate_by_category<'a, T, I>(records: I) -> CategoryTotals
where
    T: Categorized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut totals = CategoryTotals::default();

    for record in records {
        totals.add(record.category(), record.amount());
    }

    totals
}
