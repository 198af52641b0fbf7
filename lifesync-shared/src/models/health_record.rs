/// Health records kept per family member name

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::flexible_date;
use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub member_name: String,
    pub record_type: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub doctor_name: Option<String>,
    pub medication: Option<String>,
    pub next_visit: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthRecord {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub member_name: String,

    #[validate(length(max = 100))]
    pub record_type: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub doctor_name: Option<String>,

    pub medication: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub next_visit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHealthRecord {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub member_name: Option<String>,

    #[validate(length(max = 100))]
    pub record_type: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date: Option<DateTime<Utc>>,

    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub doctor_name: Option<String>,

    pub medication: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub next_visit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct HealthRecordFilter {
    pub member_name: Option<String>,
    pub record_type: Option<String>,
}

impl HealthRecord {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateHealthRecord,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(
            r#"
            INSERT INTO health_records (family_id, created_by, member_name, record_type, date,
                                        description, doctor_name, medication, next_visit)
            VALUES ($1, $2, $3, COALESCE($4, 'Checkup'), COALESCE($5, NOW()), $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(family_id)
        .bind(created_by)
        .bind(data.member_name.trim())
        .bind(data.record_type)
        .bind(data.date)
        .bind(data.description)
        .bind(data.doctor_name)
        .bind(data.medication)
        .bind(data.next_visit)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(
            "SELECT * FROM health_records WHERE id = $1 AND family_id = $2",
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists records, newest first
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &HealthRecordFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM health_records WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(member_name) = &filter.member_name {
            query.push(" AND member_name = ").push_bind(member_name.clone());
        }
        if let Some(record_type) = &filter.record_type {
            query.push(" AND record_type = ").push_bind(record_type.clone());
        }

        query.push(" ORDER BY date DESC, created_at DESC");

        query.build_query_as::<HealthRecord>().fetch_all(pool).await
    }

    /// Records with a next visit at or after `now`, soonest first
    pub async fn list_upcoming_visits(
        pool: &PgPool,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(
            r#"
            SELECT * FROM health_records
            WHERE family_id = $1 AND next_visit >= $2
            ORDER BY next_visit ASC
            "#,
        )
        .bind(family_id)
        .bind(now)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_member(
        pool: &PgPool,
        family_id: Uuid,
        member_name: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        Self::list(
            pool,
            family_id,
            &HealthRecordFilter {
                member_name: Some(member_name.to_string()),
                record_type: None,
            },
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateHealthRecord,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE health_records SET updated_at = NOW()");

        if let Some(member_name) = data.member_name {
            query.push(", member_name = ").push_bind(member_name.trim().to_string());
        }
        if let Some(record_type) = data.record_type {
            query.push(", record_type = ").push_bind(record_type);
        }
        if let Some(date) = data.date {
            query.push(", date = ").push_bind(date);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(doctor_name) = data.doctor_name {
            query.push(", doctor_name = ").push_bind(doctor_name);
        }
        if let Some(medication) = data.medication {
            query.push(", medication = ").push_bind(medication);
        }
        if let Some(next_visit) = data.next_visit {
            query.push(", next_visit = ").push_bind(next_visit);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<HealthRecord>().fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM health_records WHERE id = $1 AND family_id = $2")
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

    #[test]
    fn test_create_health_record() {
        let body: CreateHealthRecord = serde_json::from_str(
            r#"{"memberName":"Grandma","recordType":"Vaccination","nextVisit":"2025-10-01"}"#,
        )
        .unwrap();

        assert!(body.validate().is_ok());
        assert!(body.date.is_none());
        assert!(body.next_visit.is_some());
    }

    #[test]
    fn test_member_name_required() {
        let result: Result<CreateHealthRecord, _> = serde_json::from_str(r#"{"recordType":"Checkup"}"#);
        assert!(result.is_err());
    }
}
