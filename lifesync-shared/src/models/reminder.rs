/// Bill and event reminders
///
/// The kind of reminder is stored in `reminder_type` and exposed on the wire
/// as `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::flexible_date;
use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub title: String,

    #[serde(rename = "type")]
    pub reminder_type: String,

    pub due_date: DateTime<Utc>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub is_recurring: bool,
    pub recurring_type: Option<String>,
    pub notification_enabled: bool,
    pub notification_days_before: i32,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: String,

    #[serde(rename = "type")]
    #[validate(length(max = 50))]
    pub reminder_type: Option<String>,

    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub due_date: DateTime<Utc>,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: Option<f64>,

    pub description: Option<String>,
    pub is_recurring: Option<bool>,

    #[validate(length(max = 50))]
    pub recurring_type: Option<String>,

    pub notification_enabled: Option<bool>,

    #[validate(range(min = 0, max = 365))]
    pub notification_days_before: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminder {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(max = 50))]
    pub reminder_type: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: Option<f64>,

    pub description: Option<String>,
    pub is_recurring: Option<bool>,

    #[validate(length(max = 50))]
    pub recurring_type: Option<String>,

    pub notification_enabled: Option<bool>,

    #[validate(range(min = 0, max = 365))]
    pub notification_days_before: Option<i32>,

    pub is_paid: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub is_paid: Option<bool>,
    pub reminder_type: Option<String>,
}

impl Reminder {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateReminder,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (family_id, created_by, title, reminder_type, due_date, amount,
                                   description, is_recurring, recurring_type,
                                   notification_enabled, notification_days_before)
            VALUES ($1, $2, $3, COALESCE($4, 'Bill'), $5, $6, $7, COALESCE($8, FALSE), $9,
                    COALESCE($10, TRUE), COALESCE($11, 1))
            RETURNING *
            "#,
        )
        .bind(family_id)
        .bind(created_by)
        .bind(data.title.trim())
        .bind(data.reminder_type)
        .bind(data.due_date)
        .bind(data.amount)
        .bind(data.description)
        .bind(data.is_recurring)
        .bind(data.recurring_type)
        .bind(data.notification_enabled)
        .bind(data.notification_days_before)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists reminders by due date
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &ReminderFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM reminders WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(is_paid) = filter.is_paid {
            query.push(" AND is_paid = ").push_bind(is_paid);
        }
        if let Some(reminder_type) = &filter.reminder_type {
            query.push(" AND reminder_type = ").push_bind(reminder_type.clone());
        }

        query.push(" ORDER BY due_date ASC");

        query.build_query_as::<Reminder>().fetch_all(pool).await
    }

    /// Unpaid reminders by due date
    pub async fn list_pending(pool: &PgPool, family_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE family_id = $1 AND is_paid = FALSE ORDER BY due_date ASC",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
    }

    /// Unpaid reminders already past due at `now`
    pub async fn list_overdue(
        pool: &PgPool,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE family_id = $1 AND is_paid = FALSE AND due_date < $2
            ORDER BY due_date ASC
            "#,
        )
        .bind(family_id)
        .bind(now)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateReminder,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE reminders SET updated_at = NOW()");

        if let Some(title) = data.title {
            query.push(", title = ").push_bind(title.trim().to_string());
        }
        if let Some(reminder_type) = data.reminder_type {
            query.push(", reminder_type = ").push_bind(reminder_type);
        }
        if let Some(due_date) = data.due_date {
            query.push(", due_date = ").push_bind(due_date);
        }
        if let Some(amount) = data.amount {
            query.push(", amount = ").push_bind(amount);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(is_recurring) = data.is_recurring {
            query.push(", is_recurring = ").push_bind(is_recurring);
        }
        if let Some(recurring_type) = data.recurring_type {
            query.push(", recurring_type = ").push_bind(recurring_type);
        }
        if let Some(enabled) = data.notification_enabled {
            query.push(", notification_enabled = ").push_bind(enabled);
        }
        if let Some(days) = data.notification_days_before {
            query.push(", notification_days_before = ").push_bind(days);
        }
        match data.is_paid {
            Some(true) => {
                query.push(", is_paid = TRUE, paid_date = COALESCE(paid_date, NOW())");
            }
            Some(false) => {
                query.push(", is_paid = FALSE, paid_date = NULL");
            }
            None => {}
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<Reminder>().fetch_optional(pool).await
    }

    /// Marks a reminder paid now
    pub async fn mark_paid(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders
            SET is_paid = TRUE, paid_date = NOW(), updated_at = NOW()
            WHERE id = $1 AND family_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
