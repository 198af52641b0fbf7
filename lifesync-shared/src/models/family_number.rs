/// Family phone book
///
/// Entries are listed primary-first and then alphabetically. Several
/// entries can be imported at once with [`FamilyNumber::create_many`], which
/// inserts all of them or none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyNumber {
    pub id: Uuid,
    pub family_id: Uuid,
    pub created_by: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub relation: String,
    pub category: String,
    pub is_emergency: bool,
    pub is_primary: bool,
    pub notes: Option<String>,
    pub avatar_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyNumber {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: String,

    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub phone: String,

    #[validate(length(max = 100))]
    pub relation: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub is_emergency: Option<bool>,
    pub is_primary: Option<bool>,
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    pub avatar_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFamilyNumber {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub relation: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub is_emergency: Option<bool>,
    pub is_primary: Option<bool>,
    pub notes: Option<String>,

    #[validate(length(max = 20))]
    pub avatar_color: Option<String>,
}

/// Body of the bulk import endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(transparent)]
pub struct BulkFamilyNumbers {
    #[validate(length(min = 1, message = "At least one entry is required"), nested)]
    pub entries: Vec<CreateFamilyNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyNumberFilter {
    pub category: Option<String>,
    pub is_emergency: Option<bool>,
}

const INSERT: &str = r#"
    INSERT INTO family_numbers (family_id, created_by, name, phone, relation, category,
                                is_emergency, is_primary, notes, avatar_color)
    VALUES ($1, $2, $3, $4, COALESCE($5, 'Other'), COALESCE($6, 'Family'),
            COALESCE($7, FALSE), COALESCE($8, FALSE), $9, COALESCE($10, '#6C63FF'))
    RETURNING *
"#;

impl FamilyNumber {
    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        data: CreateFamilyNumber,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FamilyNumber>(INSERT)
            .bind(family_id)
            .bind(created_by)
            .bind(data.name.trim())
            .bind(data.phone.trim())
            .bind(data.relation)
            .bind(data.category)
            .bind(data.is_emergency)
            .bind(data.is_primary)
            .bind(data.notes)
            .bind(data.avatar_color)
            .fetch_one(pool)
            .await
    }

    /// Inserts every entry in one transaction
    ///
    /// If any insert fails the transaction is rolled back on drop and nothing
    /// is stored.
    pub async fn create_many(
        pool: &PgPool,
        family_id: Uuid,
        created_by: Uuid,
        entries: Vec<CreateFamilyNumber>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(entries.len());

        for data in entries {
            let number = sqlx::query_as::<_, FamilyNumber>(INSERT)
                .bind(family_id)
                .bind(created_by)
                .bind(data.name.trim())
                .bind(data.phone.trim())
                .bind(data.relation)
                .bind(data.category)
                .bind(data.is_emergency)
                .bind(data.is_primary)
                .bind(data.notes)
                .bind(data.avatar_color)
                .fetch_one(&mut *tx)
                .await?;
            created.push(number);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, FamilyNumber>(
            "SELECT * FROM family_numbers WHERE id = $1 AND family_id = $2",
        )
        .bind(id)
        .bind(family_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists entries, primary first then by name
    pub async fn list(
        pool: &PgPool,
        family_id: Uuid,
        filter: &FamilyNumberFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM family_numbers WHERE family_id = ");
        query.push_bind(family_id);

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(is_emergency) = filter.is_emergency {
            query.push(" AND is_emergency = ").push_bind(is_emergency);
        }

        query.push(" ORDER BY is_primary DESC, name ASC");

        query.build_query_as::<FamilyNumber>().fetch_all(pool).await
    }

    pub async fn list_emergency(pool: &PgPool, family_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        Self::list(
            pool,
            family_id,
            &FamilyNumberFilter {
                category: None,
                is_emergency: Some(true),
            },
        )
        .await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        family_id: Uuid,
        category: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        Self::list(
            pool,
            family_id,
            &FamilyNumberFilter {
                category: Some(category.to_string()),
                is_emergency: None,
            },
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        family_id: Uuid,
        id: Uuid,
        data: UpdateFamilyNumber,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE family_numbers SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone.trim().to_string());
        }
        if let Some(relation) = data.relation {
            query.push(", relation = ").push_bind(relation);
        }
        if let Some(category) = data.category {
            query.push(", category = ").push_bind(category);
        }
        if let Some(is_emergency) = data.is_emergency {
            query.push(", is_emergency = ").push_bind(is_emergency);
        }
        if let Some(is_primary) = data.is_primary {
            query.push(", is_primary = ").push_bind(is_primary);
        }
        if let Some(notes) = data.notes {
            query.push(", notes = ").push_bind(notes);
        }
        if let Some(color) = data.avatar_color {
            query.push(", avatar_color = ").push_bind(color);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND family_id = ")
            .push_bind(family_id)
            .push(" RETURNING *");

        query.build_query_as::<FamilyNumber>().fetch_optional(pool).await
    }

    pub async fn delete(pool: &PgPool, family_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM family_numbers WHERE id = $1 AND family_id = $2")
            .bind(id)
            .bind(family_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
