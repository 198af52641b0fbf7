/// Household expenses
///
/// Expenses may be attributed to a family member profile. The member name is
/// resolved on read and only when the profile belongs to the same family.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE expenses (
///     id UUID PRIMARY KEY,
///     family_id UUID NOT NULL,
///     created_by UUID,
///     description VARCHAR(500) NOT NULL,
///     amount DOUBLE PRECISION NOT NULL CHECK (amount >= 0),
///     category VARCHAR(100) NOT NULL,
///     date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     payment_method VARCHAR(100) NOT NULL DEFAULT 'Cash',
///     notes TEXT,
///     family_member_id UUID REFERENCES family_members(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::{flexible_date, EndBound};
use crate::summary::grand_total;
use crate::validation::not_blank;

const WITH_MEMBER_NAME: &str = " SELECT e.*, fm.name AS family_member_name FROM e \
     LEFT JOIN family_members fm ON fm.id = e.family_member_id AND fm.family_id = e.family_id";

/// Expense record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub payment_method: String,
    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,

    /// Name of the attributed family member, resolved within the family
    #[sqlx(default)]
    pub family_member_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an expense
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpense {
    #[validate(
        custom(function = "not_blank"),
        length(max = 500, message = "Description must be at most 500 characters")
    )]
    pub description: String,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub category: String,

    /// Defaults to now
    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    /// Defaults to "Cash"
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,

    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,
}

/// Request body for a partial update; absent or null fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpense {
    #[validate(custom(function = "not_blank"), length(max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: Option<f64>,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    #[validate(length(max = 100))]
    pub payment_method: Option<String>,

    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,
}

/// List filters
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<EndBound>,
    pub limit: Option<i64>,
}

/// Total spent in one category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: i64,
}

/// Expenses of one calendar month grouped by category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseSummary {
    pub expenses: Vec<CategoryTotal>,
    pub total_amount: f64,
}

impl MonthlyExpenseSummary {
    pub fn from_totals(expenses: Vec<CategoryTotal>) -> Self {
        let total_amount = grand_total(expenses.iter().map(|c| c.total));
        Self {
            expenses,
            total_amount,
        }
    }
}

impl Expense {
    /// Inserts an expense for a family
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateExpense,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            WITH e AS (
                INSERT INTO expenses (family_id, created_by, description, amount, category,
                                      date, payment_method, notes, family_member_id)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), COALESCE($7, 'Cash'), $8, $9)
                RETURNING *
            )
            {}
            "#,
            WITH_MEMBER_NAME
        );

        sqlx::query_as::<_, Expense>(&sql)
            .bind(family_id)
            .bind(created_by)
            .bind(data.description.trim())
            .bind(data.amount)
            .bind(data.category.trim())
            .bind(data.date)
            .bind(data.payment_method)
            .bind(data.notes)
            .bind(data.family_member_id)
            .fetch_one(pool)
            .await
    }

    /// Finds an expense within a family
    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "WITH e AS (SELECT * FROM expenses WHERE id = $1 AND family_id = $2) {}",
            WITH_MEMBER_NAME
        );

        sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a family's expenses, newest first
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH e AS (SELECT * FROM expenses WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(start) = filter.start_date {
            query.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND date").push(end.operator()).push_bind(end.instant());
        }

        query.push(")").push(WITH_MEMBER_NAME);
        query.push(" ORDER BY e.date DESC, e.created_at DESC");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        query.build_query_as::<Expense>().fetch_all(pool).await
    }

    /// Applies a partial update; `None` if the expense is not in the family
    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateExpense,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH e AS (UPDATE expenses SET updated_at = NOW()");

        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description.trim().to_string());
        }
        if let Some(amount) = data.amount {
            query.push(", amount = ").push_bind(amount);
        }
        if let Some(category) = data.category {
            query.push(", category = ").push_bind(category.trim().to_string());
        }
        if let Some(date) = data.date {
            query.push(", date = ").push_bind(date);
        }
        if let Some(payment_method) = data.payment_method {
            query.push(", payment_method = ").push_bind(payment_method);
        }
        if let Some(notes) = data.notes {
            query.push(", notes = ").push_bind(notes);
        }
        if let Some(member) = data.family_member_id {
            query.push(", family_member_id = ").push_bind(member);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *)")
            .push(WITH_MEMBER_NAME);

        query.build_query_as::<Expense>().fetch_optional(pool).await
    }

    /// Deletes an expense within a family
    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-category totals over `[start, end)`, largest first
    pub async fn totals_by_category(
        pool: &PgPool,
        family_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        sqlx::query_as::<_, CategoryTotal>(
            r#"
            SELECT category, SUM(amount) AS total, COUNT(*) AS count
            FROM expenses
            WHERE family_id = $1 AND date >= $2 AND date < $3
            GROUP BY category
            ORDER BY total DESC
            "#,
        )
        .bind(family_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }
}
