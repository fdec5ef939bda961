//! Savings goals and progress towards them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate, create_goal, create_goal_table};
pub use create_endpoint::create_goal_endpoint;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::{edit_goal_endpoint, update_goal_amount_endpoint};
pub use list_endpoint::{get_goal_endpoint, list_goals_endpoint};
