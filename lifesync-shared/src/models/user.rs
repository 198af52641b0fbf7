/// User accounts and family membership
///
/// Every household has one `owner` account. Member accounts provisioned by
/// the owner point back at it through `parent_user_id` and share its
/// `family_id`. An owner that never provisioned anyone may have no stored
/// `family_id`; its family scope is then its own id (see [`User::family_scope`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(50),
///     avatar VARCHAR(512),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     last_login TIMESTAMPTZ,
///     role user_role NOT NULL DEFAULT 'owner',
///     parent_user_id UUID REFERENCES users(id),
///     family_id UUID REFERENCES users(id),
///     relation VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use lifesync_shared::models::user::{CreateUser, User, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let owner = User::create(
///     &pool,
///     CreateUser::owner("Jane".into(), "jane@example.com".into(), "$argon2id$...".into(), None),
/// )
/// .await?;
///
/// assert_eq!(owner.role, UserRole::Owner);
/// assert_eq!(owner.family_scope(), owner.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Household owner; may provision member accounts
    Owner,

    /// Account created by an owner
    Member,
}

/// User account
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Argon2id hash in PHC format
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub role: UserRole,

    /// Owner that provisioned this account
    pub parent_user_id: Option<Uuid>,

    /// Stored family identifier, if any
    pub family_id: Option<Uuid>,

    pub relation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The identifier that scopes this user's household data
    pub fn family_scope(&self) -> Uuid {
        self.family_id.unwrap_or(self.id)
    }

    /// Whether this account may provision and manage member accounts
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }
}

/// Input for creating a user
///
/// `email` must already be normalized and `password_hash` must be a hash,
/// never plaintext.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub parent_user_id: Option<Uuid>,
    pub family_id: Option<Uuid>,
    pub relation: Option<String>,
}

impl CreateUser {
    /// A self-registered household owner
    pub fn owner(name: String, email: String, password_hash: String, phone: Option<String>) -> Self {
        Self {
            name,
            email,
            password_hash,
            phone,
            role: UserRole::Owner,
            parent_user_id: None,
            family_id: None,
            relation: None,
        }
    }
}

/// Profile fields a user may change on their own account
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Fields an owner may change on a member account
#[derive(Debug, Clone, Default)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub relation: Option<String>,
    pub is_active: Option<bool>,
}

impl User {
    /// Inserts a new account
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` when the email is
    /// already registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, phone, role,
                               parent_user_id, family_id, relation)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone)
        .bind(data.role)
        .bind(data.parent_user_id)
        .bind(data.family_id)
        .bind(data.relation)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by normalized email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether an email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial profile update
    ///
    /// Returns `None` if the user does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(avatar) = data.avatar {
            query.push(", avatar = ").push_bind(avatar);
        }

        query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        query.build_query_as::<User>().fetch_optional(pool).await
    }

    /// Applies a partial update to a member account
    pub async fn update_member(
        pool: &PgPool,
        id: Uuid,
        data: UpdateMember,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = NOW()");

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(relation) = data.relation {
            query.push(", relation = ").push_bind(relation);
        }
        if let Some(is_active) = data.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }

        query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        query.build_query_as::<User>().fetch_optional(pool).await
    }

    /// Replaces the stored password hash
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stores the family identifier on an account
    pub async fn set_family_id(pool: &PgPool, id: Uuid, family_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET family_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(family_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Stamps the last successful login
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Lists every account of a family except `exclude`, newest first
    ///
    /// The owner of a family without a stored `family_id` is matched by id.
    pub async fn list_family(
        pool: &PgPool,
        family_id: Uuid,
        exclude: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE (family_id = $1 OR id = $1) AND id <> $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(family_id)
        .bind(exclude)
        .fetch_all(pool)
        .await
    }

    /// Deletes an account
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_user(role: UserRole, family_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            phone: None,
            avatar: None,
            is_active: true,
            last_login: None,
            role,
            parent_user_id: None,
            family_id,
            relation: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_family_scope_defaults_to_own_id() {
        let owner = sample_user(UserRole::Owner, None);
        assert_eq!(owner.family_scope(), owner.id);

        let family = Uuid::new_v4();
        let member = sample_user(UserRole::Member, Some(family));
        assert_eq!(member.family_scope(), family);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = sample_user(UserRole::Owner, None);
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "owner");
        assert_eq!(json["isActive"], true);
        assert!(json.get("familyId").is_some());
    }

    #[test]
    fn test_is_owner() {
        assert!(sample_user(UserRole::Owner, None).is_owner());
        assert!(!sample_user(UserRole::Member, None).is_owner());
    }
}
