use serde::Deserialize;

use crate::{
    Error,
    goal::{Goal, GoalStatus, NewGoal},
    user::UserId,
    validation::{
        parse_optional_date, require, validate_non_negative, validate_not_blank, validate_positive,
    },
};

/// The JSON body for creating or editing a goal.
///
/// Creating a goal requires the name and target amount. An empty `deadline` means no deadline.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub category: Option<String>,
    /// A date like "2025-12-31".
    pub deadline: Option<String>,
    /// Only used when editing.
    pub status: Option<GoalStatus>,
}

impl GoalRequest {
    /// Validate the request as a new goal for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::Validation] naming the first missing or invalid field.
    pub fn into_new_goal(self, user_id: UserId) -> Result<NewGoal, Error> {
        let name = validate_not_blank(&require(self.name, "name")?, "name")?;
        let target_amount = validate_positive(
            require(self.target_amount, "targetAmount")?,
            "targetAmount",
        )?;
        let current_amount = self
            .current_amount
            .map(|amount| validate_non_negative(amount, "currentAmount"))
            .transpose()?
            .unwrap_or(0.0);
        let deadline = parse_optional_date(self.deadline.as_deref(), "deadline")?;

        Ok(NewGoal {
            user_id,
            name,
            description: self.description,
            target_amount,
            current_amount,
            category: self.category,
            deadline,
        })
    }

    /// Overwrite the fields of `goal` present in the request, then re-check
    /// whether the goal is achieved.
    ///
    /// An empty `deadline` leaves the deadline unchanged.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a supplied field is invalid, in which case
    /// `goal` is left unchanged.
    pub fn apply(self, goal: &mut Goal) -> Result<(), Error> {
        let name = self
            .name
            .map(|name| validate_not_blank(&name, "name"))
            .transpose()?;
        let target_amount = self
            .target_amount
            .map(|amount| validate_positive(amount, "targetAmount"))
            .transpose()?;
        let current_amount = self
            .current_amount
            .map(|amount| validate_non_negative(amount, "currentAmount"))
            .transpose()?;
        let deadline = parse_optional_date(self.deadline.as_deref(), "deadline")?;

        if let Some(name) = name {
            goal.name = name;
        }
        if self.description.is_some() {
            goal.description = self.description;
        }
        if let Some(target_amount) = target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(current_amount) = current_amount {
            goal.current_amount = current_amount;
        }
        if self.category.is_some() {
            goal.category = self.category;
        }
        if deadline.is_some() {
            goal.deadline = deadline;
        }
        if let Some(status) = self.status {
            goal.status = status;
        }

        goal.apply_auto_achieve();

        Ok(())
    }
}
