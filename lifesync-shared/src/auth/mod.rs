/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer token authentication and family-scope resolution
/// - [`authorization`]: Permission checks for account management
///
/// # Example
///
/// ```no_run
/// use lifesync_shared::auth::password::{hash_password, verify_password};
/// use lifesync_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4()), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
