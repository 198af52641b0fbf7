/// Monthly category budgets
///
/// A budget allocates an amount to one category for one calendar month.
/// Spending is recorded with [`Budget::spend`], an atomic increment that
/// never lets `spent_amount` drop below zero. Reads go through
/// [`BudgetView`], which adds the usage percentage and alert flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::AmountChange;
use crate::summary::{percent_of, round_to_cents};
use crate::validation::not_blank;

/// Budget record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub category: String,
    pub allocated_amount: f64,
    pub spent_amount: f64,
    pub month: i32,
    pub year: i32,
    pub is_active: bool,

    /// Usage percentage at which the budget starts alerting
    pub alert_threshold: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Spent as a percentage of allocated, two decimals; 0 when nothing is allocated
    pub fn usage_percent(&self) -> f64 {
        round_to_cents(percent_of(self.spent_amount, self.allocated_amount))
    }

    pub fn is_alerting(&self) -> bool {
        self.usage_percent() >= f64::from(self.alert_threshold)
    }
}

/// Budget as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    #[serde(flatten)]
    pub budget: Budget,
    pub usage_percent: f64,
    pub is_alerting: bool,
}

impl From<Budget> for BudgetView {
    fn from(budget: Budget) -> Self {
        Self {
            usage_percent: budget.usage_percent(),
            is_alerting: budget.is_alerting(),
            budget,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudget {
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub category: String,

    #[validate(range(min = 0.0, message = "Allocated amount cannot be negative"))]
    pub allocated_amount: f64,

    #[validate(range(min = 0.0, message = "Spent amount cannot be negative"))]
    pub spent_amount: Option<f64>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,

    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, max = 100, message = "Alert threshold must be between 0 and 100"))]
    pub alert_threshold: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudget {
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub category: Option<String>,

    #[validate(range(min = 0.0, message = "Allocated amount cannot be negative"))]
    pub allocated_amount: Option<f64>,

    #[validate(range(min = 0.0, message = "Spent amount cannot be negative"))]
    pub spent_amount: Option<f64>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<i32>,

    #[validate(range(min = 1900, max = 9999))]
    pub year: Option<i32>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, max = 100, message = "Alert threshold must be between 0 and 100"))]
    pub alert_threshold: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub is_active: Option<bool>,
}

impl Budget {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateBudget,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (family_id, created_by, category, allocated_amount, spent_amount,
                                 month, year, is_active, alert_threshold)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, COALESCE($8, TRUE), COALESCE($9, 80))
            RETURNING *
            "#,
        )
        .bind(family_id)
        .bind(created_by)
        .bind(data.category.trim())
        .bind(data.allocated_amount)
        .bind(data.spent_amount)
        .bind(data.month)
        .bind(data.year)
        .bind(data.is_active)
        .bind(data.alert_threshold)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Budget>("SELECT * FROM budgets WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a family's budgets ordered by category
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &BudgetFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM budgets WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(month) = filter.month {
            query.push(" AND month = ").push_bind(month);
        }
        if let Some(year) = filter.year {
            query.push(" AND year = ").push_bind(year);
        }
        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }

        query.push(" ORDER BY category ASC, year DESC, month DESC");

        query.build_query_as::<Budget>().fetch_all(pool).await
    }

    /// Active budgets of one month
    pub async fn list_active_for_period(
        pool: &PgPool,
        family_id: Uuid,
        month: i32,
        year: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT * FROM budgets
            WHERE family_id = $1 AND month = $2 AND year = $3 AND is_active = TRUE
            ORDER BY category ASC
            "#,
        )
        .bind(family_id)
        .bind(month)
        .bind(year)
        .fetch_all(pool)
        .await
    }

    /// Active budgets of one month whose spending reached the allocation
    pub async fn list_over_budget(
        pool: &PgPool,
        family_id: Uuid,
        month: i32,
        year: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT * FROM budgets
            WHERE family_id = $1 AND month = $2 AND year = $3 AND is_active = TRUE
              AND spent_amount >= allocated_amount
            ORDER BY category ASC
            "#,
        )
        .bind(family_id)
        .bind(month)
        .bind(year)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateBudget,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE budgets SET updated_at = NOW()");

        if let Some(category) = data.category {
            query.push(", category = ").push_bind(category.trim().to_string());
        }
        if let Some(allocated) = data.allocated_amount {
            query.push(", allocated_amount = ").push_bind(allocated);
        }
        if let Some(spent) = data.spent_amount {
            query.push(", spent_amount = ").push_bind(spent);
        }
        if let Some(month) = data.month {
            query.push(", month = ").push_bind(month);
        }
        if let Some(year) = data.year {
            query.push(", year = ").push_bind(year);
        }
        if let Some(is_active) = data.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }
        if let Some(threshold) = data.alert_threshold {
            query.push(", alert_threshold = ").push_bind(threshold);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<Budget>().fetch_optional(pool).await
    }

    /// Adds `amount` (possibly negative) to `spent_amount`
    ///
    /// The increment happens in one statement, so concurrent spends never
    /// lose updates. A change that would make the total negative is refused.
    pub async fn spend(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        amount: f64,
    ) -> Result<AmountChange<Self>, sqlx::Error> {
        let updated = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET spent_amount = spent_amount + $3, updated_at = NOW()
            WHERE id = $1 AND family_id = $2 AND spent_amount + $3 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(family_id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(budget) => Ok(AmountChange::Applied(budget)),
            None if Self::find_by_id(pool, family_id, id).await?.is_some() => {
                Ok(AmountChange::WouldBeNegative)
            }
            None => Ok(AmountChange::NotFound),
        }
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(allocated: f64, spent: f64, threshold: i32) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            created_by: None,
            category: "Groceries".to_string(),
            allocated_amount: allocated,
            spent_amount: spent,
            month: 3,
            year: 2025,
            is_active: true,
            alert_threshold: threshold,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_usage_and_alerting() {
        let b = budget(300.0, 100.0, 80);
        assert_eq!(b.usage_percent(), 33.33);
        assert!(!b.is_alerting());

        let b = budget(300.0, 250.0, 80);
        assert_eq!(b.usage_percent(), 83.33);
        assert!(b.is_alerting());

        let b = budget(300.0, 300.0, 100);
        assert_eq!(b.usage_percent(), 100.0);
        assert!(b.is_alerting());
    }

    #[test]
    fn test_zero_allocation() {
        let b = budget(0.0, 50.0, 80);
        assert_eq!(b.usage_percent(), 0.0);
        assert!(!b.is_alerting());
    }

    #[test]
    fn test_view_serialization() {
        let view = BudgetView::from(budget(200.0, 170.0, 80));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["allocatedAmount"], 200.0);
        assert_eq!(json["spentAmount"], 170.0);
        assert_eq!(json["usagePercent"], 85.0);
        assert_eq!(json["isAlerting"], true);
        assert_eq!(json["alertThreshold"], 80);
    }

    #[test]
    fn test_create_budget_validation() {
        let body: CreateBudget = serde_json::from_str(
            r#"{"category":"Food","allocatedAmount":500,"month":13,"year":2025,"alertThreshold":120}"#,
        )
        .unwrap();

        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("month"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_create_budget_minimal() {
        let body: CreateBudget = serde_json::from_str(
            r#"{"category":"Food","allocatedAmount":500,"month":1,"year":2025}"#,
        )
        .unwrap();

        assert!(body.validate().is_ok());
        assert!(body.spent_amount.is_none());
        assert!(body.alert_threshold.is_none());
    }
}
