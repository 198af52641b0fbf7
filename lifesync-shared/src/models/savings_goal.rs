/// Savings goals
///
/// Contributions go through [`SavingsGoal::contribute`], which increments
/// `current_amount` atomically and marks the goal completed once the target
/// is reached. A completed goal stays completed if money is later withdrawn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::AmountChange;
use crate::period::flexible_date;
use crate::summary::{capped_progress, percent_of, round_to_cents};
use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: Option<DateTime<Utc>>,
    pub category: String,
    pub priority: String,
    pub is_completed: bool,
    pub notes: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Percentage of the target saved, capped at 100
    pub fn progress(&self) -> f64 {
        capped_progress(self.current_amount, self.target_amount)
    }
}

/// Savings goal as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct SavingsGoalView {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub progress: f64,
}

impl From<SavingsGoal> for SavingsGoalView {
    fn from(goal: SavingsGoal) -> Self {
        Self {
            progress: goal.progress(),
            goal,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavingsGoal {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Target amount cannot be negative"))]
    pub target_amount: f64,

    #[validate(range(min = 0.0, message = "Current amount cannot be negative"))]
    pub current_amount: Option<f64>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub target_date: Option<DateTime<Utc>>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(length(max = 50))]
    pub priority: Option<String>,

    pub is_completed: Option<bool>,
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSavingsGoal {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Target amount cannot be negative"))]
    pub target_amount: Option<f64>,

    #[validate(range(min = 0.0, message = "Current amount cannot be negative"))]
    pub current_amount: Option<f64>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub target_date: Option<DateTime<Utc>>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(length(max = 50))]
    pub priority: Option<String>,

    pub is_completed: Option<bool>,
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SavingsGoalFilter {
    pub category: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<String>,
}

/// Totals over the goals still in progress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub active_goals: usize,
    pub total_target: f64,
    pub total_saved: f64,
    pub overall_progress: f64,
}

impl SavingsSummary {
    /// Summarizes non-completed goals; completed ones are ignored
    pub fn from_goals(goals: &[SavingsGoal]) -> Self {
        let active: Vec<&SavingsGoal> = goals.iter().filter(|g| !g.is_completed).collect();

        let total_target: f64 = active.iter().map(|g| g.target_amount).sum();
        let total_saved: f64 = active.iter().map(|g| g.current_amount).sum();

        Self {
            active_goals: active.len(),
            total_target,
            total_saved,
            overall_progress: round_to_cents(percent_of(total_saved, total_target)),
        }
    }
}

impl SavingsGoal {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateSavingsGoal,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, SavingsGoal>(
            r#"
            INSERT INTO savings_goals (family_id, created_by, name, target_amount, current_amount,
                                       target_date, category, priority, is_completed, notes, color)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, COALESCE($7, 'Other'),
                    COALESCE($8, 'Medium'), COALESCE($9, FALSE), $10, COALESCE($11, '#6C63FF'))
            RETURNING *
            "#,
        )
        .bind(family_id)
        .bind(created_by)
        .bind(data.name.trim())
        .bind(data.target_amount)
        .bind(data.current_amount)
        .bind(data.target_date)
        .bind(data.category)
        .bind(data.priority)
        .bind(data.is_completed)
        .bind(data.notes)
        .bind(data.color)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, SavingsGoal>(
            "SELECT * FROM savings_goals WHERE id = $1 AND family_id = $2",
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists goals by target date, undated goals last
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &SavingsGoalFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM savings_goals WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(is_completed) = filter.is_completed {
            query.push(" AND is_completed = ").push_bind(is_completed);
        }
        if let Some(priority) = &filter.priority {
            query.push(" AND priority = ").push_bind(priority.clone());
        }

        query.push(" ORDER BY target_date ASC NULLS LAST, created_at DESC");

        query.build_query_as::<SavingsGoal>().fetch_all(pool).await
    }

    /// Goals that are not completed yet
    pub async fn list_active(pool: &PgPool, family_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SavingsGoal>(
            "SELECT * FROM savings_goals WHERE family_id = $1 AND is_completed = FALSE",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateSavingsGoal,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE savings_goals SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(target) = data.target_amount {
            query.push(", target_amount = ").push_bind(target);
        }
        if let Some(current) = data.current_amount {
            query.push(", current_amount = ").push_bind(current);
        }
        if let Some(target_date) = data.target_date {
            query.push(", target_date = ").push_bind(target_date);
        }
        if let Some(category) = data.category {
            query.push(", category = ").push_bind(category);
        }
        if let Some(priority) = data.priority {
            query.push(", priority = ").push_bind(priority);
        }
        if let Some(is_completed) = data.is_completed {
            query.push(", is_completed = ").push_bind(is_completed);
        }
        if let Some(notes) = data.notes {
            query.push(", notes = ").push_bind(notes);
        }
        if let Some(color) = data.color {
            query.push(", color = ").push_bind(color);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<SavingsGoal>().fetch_optional(pool).await
    }

    /// Adds `amount` (possibly negative) to the saved total
    ///
    /// The goal is marked completed in the same statement once the new total
    /// reaches the target.
    pub async fn contribute(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        amount: f64,
    ) -> Result<AmountChange<Self>, sqlx::Error> {
        let updated = sqlx::query_as::<_, SavingsGoal>(
            r#"
            UPDATE savings_goals
            SET current_amount = current_amount + $3,
                is_completed = is_completed OR current_amount + $3 >= target_amount,
                updated_at = NOW()
            WHERE id = $1 AND family_id = $2 AND current_amount + $3 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(family_id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(goal) => Ok(AmountChange::Applied(goal)),
            None if Self::find_by_id(pool, family_id, id).await?.is_some() => {
                Ok(AmountChange::WouldBeNegative)
            }
            None => Ok(AmountChange::NotFound),
        }
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM savings_goals WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
