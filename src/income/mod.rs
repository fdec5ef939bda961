//! Recording, listing and editing income.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Income, IncomeFilter, IncomeUpdate, NewIncome, create_income, create_income_table,
    get_incomes, get_incomes_in_period,
};
pub use create_endpoint::create_income_endpoint;
pub use delete_endpoint::delete_income_endpoint;
pub use edit_endpoint::edit_income_endpoint;
pub use list_endpoint::{get_income_endpoint, list_incomes_endpoint};

#[cfg(test)]
pub(crate) use core::test_helpers::must_create_income;
