//! Savings goals and contributions towards them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod request;

pub use core::{
    Goal, GoalProgress, GoalState, GoalStatus, NewGoal, create_goal, create_goal_table,
    delete_goal, get_goal_for_user, get_goals, update_goal,
};
pub use create_endpoint::create_goal_endpoint;
pub use delete_endpoint::delete_goal_endpoint;
pub use edit_endpoint::{contribute_to_goal_endpoint, edit_goal_endpoint};
pub use list_endpoint::{get_goal_endpoint, goal_progress_endpoint, list_goals_endpoint};
pub use request::GoalRequest;
