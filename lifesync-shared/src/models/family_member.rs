/// Family member profiles
///
/// Contact profiles for people in the household. These are not login
/// accounts; expenses, incomes and tasks reference them for attribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::period::flexible_date;
use crate::validation::{normalize_email, not_blank, valid_blood_group};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub name: String,
    pub relation: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub blood_group: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub avatar_color: String,
    pub is_emergency_contact: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyMember {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: String,

    #[validate(length(max = 100))]
    pub relation: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date_of_birth: Option<DateTime<Utc>>,

    #[validate(custom(function = "valid_blood_group"))]
    pub blood_group: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub avatar_color: Option<String>,

    pub is_emergency_contact: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFamilyMember {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub relation: Option<String>,

    #[serde(default, deserialize_with = "flexible_date::option")]
    pub date_of_birth: Option<DateTime<Utc>>,

    #[validate(custom(function = "valid_blood_group"))]
    pub blood_group: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub avatar_color: Option<String>,

    pub is_emergency_contact: Option<bool>,
}

impl FamilyMember {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateFamilyMember,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FamilyMember>(
            r#"
            INSERT INTO family_members (family_id, created_by, name, relation, date_of_birth,
                                        blood_group, phone, email, avatar_color,
                                        is_emergency_contact)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, '#6C63FF'), COALESCE($10, FALSE))
            RETURNING *
            "#,
        )
        .bind(family_id)
        .bind(created_by)
        .bind(data.name.trim())
        .bind(data.relation)
        .bind(data.date_of_birth)
        .bind(data.blood_group)
        .bind(data.phone)
        .bind(data.email.as_deref().map(normalize_email))
        .bind(data.avatar_color)
        .bind(data.is_emergency_contact)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FamilyMember>(
            "SELECT * FROM family_members WHERE id = $1 AND family_id = $2",
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists profiles, newest first
    pub async fn list(pool: &PgPool, family_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, FamilyMember>(
            "SELECT * FROM family_members WHERE family_id = $1 ORDER BY created_at DESC",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateFamilyMember,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE family_members SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(relation) = data.relation {
            query.push(", relation = ").push_bind(relation);
        }
        if let Some(date_of_birth) = data.date_of_birth {
            query.push(", date_of_birth = ").push_bind(date_of_birth);
        }
        if let Some(blood_group) = data.blood_group {
            query.push(", blood_group = ").push_bind(blood_group);
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(email) = data.email {
            query.push(", email = ").push_bind(normalize_email(&email));
        }
        if let Some(color) = data.avatar_color {
            query.push(", avatar_color = ").push_bind(color);
        }
        if let Some(emergency) = data.is_emergency_contact {
            query.push(", is_emergency_contact = ").push_bind(emergency);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<FamilyMember>().fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM family_members WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
