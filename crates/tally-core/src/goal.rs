//! # Reinvestment Goals
//!
//! At most one goal is active. Activating a goal, by creating it active or
//! by [`LedgerState::activate_goal`], deactivates every other goal.
//! Progress is computed in [`crate::report`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::{new_id, now};
use crate::state::{Collection, LedgerState};
use crate::types::ReinvestmentGoal;
use crate::validation::{normalize_text, validate_date_range, validate_target_bps, validate_text};

/// Input for a new goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// Target share of period revenue, in basis points.
    pub target_bps: u32,
    #[ts(as = "String")]
    pub starts_on: NaiveDate,
    #[ts(as = "String")]
    pub ends_on: NaiveDate,
    pub active: bool,
    pub notes: Option<String>,
}

impl LedgerState {
    pub fn create_goal(&mut self, input: NewGoal) -> CoreResult<ReinvestmentGoal> {
        validate_target_bps(input.target_bps)?;
        validate_date_range("goal period", input.starts_on, input.ends_on)?;
        validate_text("notes", input.notes.as_deref())?;

        if input.active {
            self.deactivate_all_goals();
        }

        let goal = ReinvestmentGoal {
            id: new_id(),
            target_bps: input.target_bps,
            starts_on: input.starts_on,
            ends_on: input.ends_on,
            active: input.active,
            notes: normalize_text(input.notes),
            created_at: now(),
        };

        self.goals.insert(0, goal.clone());
        self.touch(Collection::ReinvestmentGoals);
        Ok(goal)
    }

    /// Makes this goal the only active one.
    pub fn activate_goal(&mut self, goal_id: &str) -> CoreResult<ReinvestmentGoal> {
        let index = self.goal_index(goal_id)?;
        self.deactivate_all_goals();

        let goal = &mut self.goals[index];
        goal.active = true;

        let updated = goal.clone();
        self.touch(Collection::ReinvestmentGoals);
        Ok(updated)
    }

    pub fn deactivate_goal(&mut self, goal_id: &str) -> CoreResult<ReinvestmentGoal> {
        let index = self.goal_index(goal_id)?;

        let goal = &mut self.goals[index];
        goal.active = false;

        let updated = goal.clone();
        self.touch(Collection::ReinvestmentGoals);
        Ok(updated)
    }

    pub fn remove_goal(&mut self, goal_id: &str) -> CoreResult<ReinvestmentGoal> {
        let index = self.goal_index(goal_id)?;
        let removed = self.goals.remove(index);
        self.touch(Collection::ReinvestmentGoals);
        Ok(removed)
    }

    pub fn active_goal(&self) -> Option<&ReinvestmentGoal> {
        self.goals.iter().find(|g| g.active)
    }

    fn deactivate_all_goals(&mut self) {
        for goal in self.goals.iter_mut() {
            goal.active = false;
        }
    }

    fn goal_index(&self, goal_id: &str) -> CoreResult<usize> {
        self.goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| CoreError::GoalNotFound(goal_id.to_string()))
    }
}
