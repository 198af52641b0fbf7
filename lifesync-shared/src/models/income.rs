/// Household income
///
/// Mirrors [`super::expense`]: family-scoped, optionally attributed to a
/// family member, summarized per source for a calendar month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::{flexible_date, EndBound};
use crate::summary::grand_total;
use crate::validation::not_blank;

const WITH_MEMBER_NAME: &str = " SELECT i.*, fm.name AS family_member_name FROM i \
     LEFT JOIN family_members fm ON fm.id = i.family_member_id AND fm.family_id = i.family_id";

/// Income record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub description: String,
    pub amount: f64,
    pub source: String,
    pub date: DateTime<Utc>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,
    #[sqlx(default)]
    pub family_member_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncome {
    #[validate(custom(function = "not_blank"), length(max = 500))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub source: String,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_recurring: bool,

    #[validate(length(max = 50))]
    pub recurring_frequency: Option<String>,

    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncome {
    #[validate(custom(function = "not_blank"), length(max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: Option<f64>,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    pub is_recurring: Option<bool>,

    #[validate(length(max = 50))]
    pub recurring_frequency: Option<String>,

    pub notes: Option<String>,
    pub family_member_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct IncomeFilter {
    pub source: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<EndBound>,
    pub limit: Option<i64>,
}

/// Total received from one source
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SourceTotal {
    pub source: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncomeSummary {
    pub incomes: Vec<SourceTotal>,
    pub total_amount: f64,
}

impl MonthlyIncomeSummary {
    pub fn from_totals(incomes: Vec<SourceTotal>) -> Self {
        let total_amount = grand_total(incomes.iter().map(|s| s.total));
        Self {
            incomes,
            total_amount,
        }
    }
}

impl Income {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateIncome,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            WITH i AS (
                INSERT INTO incomes (family_id, created_by, description, amount, source, date,
                                     is_recurring, recurring_frequency, notes, family_member_id)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8, $9, $10)
                RETURNING *
            )
            {}
            "#,
            WITH_MEMBER_NAME
        );

        sqlx::query_as::<_, Income>(&sql)
            .bind(family_id)
            .bind(created_by)
            .bind(data.description.trim())
            .bind(data.amount)
            .bind(data.source.trim())
            .bind(data.date)
            .bind(data.is_recurring)
            .bind(data.recurring_frequency)
            .bind(data.notes)
            .bind(data.family_member_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "WITH i AS (SELECT * FROM incomes WHERE id = $1 AND family_id = $2) {}",
            WITH_MEMBER_NAME
        );

        sqlx::query_as::<_, Income>(&sql)
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a family's income, newest first
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &IncomeFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH i AS (SELECT * FROM incomes WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(source) = &filter.source {
            query.push(" AND source = ").push_bind(source.clone());
        }
        if let Some(start) = filter.start_date {
            query.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND date").push(end.operator()).push_bind(end.instant());
        }

        query.push(")").push(WITH_MEMBER_NAME);
        query.push(" ORDER BY i.date DESC, i.created_at DESC");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        query.build_query_as::<Income>().fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateIncome,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("WITH i AS (UPDATE incomes SET updated_at = NOW()");

        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description.trim().to_string());
        }
        if let Some(amount) = data.amount {
            query.push(", amount = ").push_bind(amount);
        }
        if let Some(source) = data.source {
            query.push(", source = ").push_bind(source.trim().to_string());
        }
        if let Some(date) = data.date {
            query.push(", date = ").push_bind(date);
        }
        if let Some(is_recurring) = data.is_recurring {
            query.push(", is_recurring = ").push_bind(is_recurring);
        }
        if let Some(frequency) = data.recurring_frequency {
            query.push(", recurring_frequency = ").push_bind(frequency);
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

        query.build_query_as::<Income>().fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-source totals over `[start, end)`, largest first
    pub async fn totals_by_source(
        pool: &PgPool,
        family_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SourceTotal>, sqlx::Error> {
        sqlx::query_as::<_, SourceTotal>(
            r#"
            SELECT source, SUM(amount) AS total, COUNT(*) AS count
            FROM incomes
            WHERE family_id = $1 AND date >= $2 AND date < $3
            GROUP BY source
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_income_defaults() {
        let body: CreateIncome = serde_json::from_str(
            r#"{"description":"Salary","amount":5000,"source":"Employer"}"#,
        )
        .unwrap();

        assert!(body.validate().is_ok());
        assert!(!body.is_recurring);
        assert!(body.date.is_none());
    }

    #[test]
    fn test_create_income_blank_source() {
        let body: CreateIncome =
            serde_json::from_str(r#"{"description":"Gift","amount":10,"source":""}"#).unwrap();

        assert!(body.validate().unwrap_err().field_errors().contains_key("source"));
    }

    #[test]
    fn test_monthly_income_summary() {
        let summary = MonthlyIncomeSummary::from_totals(vec![
            SourceTotal { source: "Salary".into(), total: 4000.0, count: 1 },
            SourceTotal { source: "Freelance".into(), total: 650.5, count: 2 },
        ]);

        assert_eq!(summary.total_amount, 4650.5);
        assert!(MonthlyIncomeSummary::from_totals(vec![]).total_amount == 0.0);
    }
}
