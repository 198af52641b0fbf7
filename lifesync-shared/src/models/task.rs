/// Household tasks
///
/// Tasks can be assigned to a family member profile (`assigned_to`); the
/// assignee name is resolved within the same family.
///
/// Lists are ordered by due date (undated last) and then by priority rank,
/// where High > Medium > Low and any other value ranks lowest.
///
/// # Example
///
/// ```no_run
/// use lifesync_shared::models::task::Task;
/// use chrono::Utc;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, family_id: Uuid) -> Result<(), sqlx::Error> {
/// let today = Task::list_due_today(&pool, family_id, Utc::now()).await?;
/// let overdue = Task::list_overdue(&pool, family_id, Utc::now()).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::{day_range, flexible_date};
use crate::validation::not_blank;

/// Status a task is moved to when completed
pub const STATUS_COMPLETED: &str = "Completed";

const WITH_ASSIGNEE_NAME: &str = " SELECT t.*, fm.name AS assigned_to_name FROM t \
     LEFT JOIN family_members fm ON fm.id = t.assigned_to AND fm.family_id = t.family_id";

const PRIORITY_RANK: &str =
    "CASE t.priority WHEN 'High' THEN 3 WHEN 'Medium' THEN 2 WHEN 'Low' THEN 1 ELSE 0 END";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: String,
    pub status: String,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,

    /// Family member profile the task is assigned to
    pub assigned_to: Option<Uuid>,

    #[sqlx(default)]
    pub assigned_to_name: Option<String>,

    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 50))]
    pub priority: Option<String>,

    #[validate(length(max = 50))]
    pub status: Option<String>,

    pub is_completed: Option<bool>,
    pub assigned_to: Option<Uuid>,

    #[validate(length(max = 100))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 50))]
    pub priority: Option<String>,

    #[validate(length(max = 50))]
    pub status: Option<String>,

    pub is_completed: Option<bool>,
    pub assigned_to: Option<Uuid>,

    #[validate(length(max = 100))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub is_completed: Option<bool>,
    pub category: Option<String>,
}

impl Task {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            WITH t AS (
                INSERT INTO tasks (family_id, created_by, title, description, due_date, priority,
                                   status, is_completed, completed_at, assigned_to, category)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Medium'), COALESCE($7, 'Pending'),
                        COALESCE($8, FALSE), CASE WHEN $8 THEN NOW() END, $9,
                        COALESCE($10, 'Other'))
                RETURNING *
            )
            {}
            "#,
            WITH_ASSIGNEE_NAME
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(family_id)
            .bind(created_by)
            .bind(data.title.trim())
            .bind(data.description)
            .bind(data.due_date)
            .bind(data.priority)
            .bind(data.status)
            .bind(data.is_completed)
            .bind(data.assigned_to)
            .bind(data.category)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "WITH t AS (SELECT * FROM tasks WHERE id = $1 AND family_id = $2) {}",
            WITH_ASSIGNEE_NAME
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists tasks by due date, then priority
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH t AS (SELECT * FROM tasks WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(status) = &filter.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(priority) = &filter.priority {
            query.push(" AND priority = ").push_bind(priority.clone());
        }
        if let Some(is_completed) = filter.is_completed {
            query.push(" AND is_completed = ").push_bind(is_completed);
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }

        query.push(")").push(WITH_ASSIGNEE_NAME);
        query.push(format!(
            " ORDER BY t.due_date ASC NULLS LAST, {} DESC, t.created_at DESC",
            PRIORITY_RANK
        ));

        query.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Incomplete tasks due on the UTC day containing `now`, highest priority first
    pub async fn list_due_today(
        pool: &PgPool,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (start, end) = day_range(now);
        let sql = format!(
            r#"
            WITH t AS (
                SELECT * FROM tasks
                WHERE family_id = $1 AND is_completed = FALSE
                  AND due_date >= $2 AND due_date < $3
            )
            {} ORDER BY {} DESC, t.due_date ASC
            "#,
            WITH_ASSIGNEE_NAME, PRIORITY_RANK
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(family_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Incomplete tasks due before the start of today, oldest first
    pub async fn list_overdue(
        pool: &PgPool,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (start_of_today, _) = day_range(now);
        let sql = format!(
            r#"
            WITH t AS (
                SELECT * FROM tasks
                WHERE family_id = $1 AND is_completed = FALSE AND due_date < $2
            )
            {} ORDER BY t.due_date ASC
            "#,
            WITH_ASSIGNEE_NAME
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(family_id)
            .bind(start_of_today)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// Setting `isCompleted` stamps `completed_at` (kept if already set);
    /// clearing it removes the stamp.
    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH t AS (UPDATE tasks SET updated_at = NOW()");

        if let Some(title) = data.title {
            query.push(", title = ").push_bind(title.trim().to_string());
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(due_date) = data.due_date {
            query.push(", due_date = ").push_bind(due_date);
        }
        if let Some(priority) = data.priority {
            query.push(", priority = ").push_bind(priority);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }
        match data.is_completed {
            Some(true) => {
                query.push(", is_completed = TRUE, completed_at = COALESCE(completed_at, NOW())");
            }
            Some(false) => {
                query.push(", is_completed = FALSE, completed_at = NULL");
            }
            None => {}
        }
        if let Some(assigned_to) = data.assigned_to {
            query.push(", assigned_to = ").push_bind(assigned_to);
        }
        if let Some(category) = data.category {
            query.push(", category = ").push_bind(category);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *)")
            .push(WITH_ASSIGNEE_NAME);

        query.build_query_as::<Task>().fetch_optional(pool).await
    }

    /// Marks a task completed now
    pub async fn complete(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH t AS (
                UPDATE tasks
                SET is_completed = TRUE, completed_at = NOW(), status = $3, updated_at = NOW()
                WHERE id = $1 AND family_id = $2
                RETURNING *
            )
            {}
            "#,
            WITH_ASSIGNEE_NAME
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(family_id)
            .bind(STATUS_COMPLETED)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
