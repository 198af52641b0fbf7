/// Database models for LifeSync
///
/// Every household record carries the `family_id` of the family that owns
/// it, and every query on those records takes that id as an argument.
/// Records are never looked up by id alone.
///
/// # Models
///
/// - `user`: Login accounts (owners and provisioned members)
/// - `expense`, `income`: Money in and out, with monthly summaries
/// - `budget`: Monthly category allocations
/// - `savings_goal`: Savings targets and contributions
/// - `task`: Household to-dos
/// - `reminder`: Bills and other due dates
/// - `health_record`: Medical history per family member
/// - `family_member`: Contact profiles used for attribution
/// - `family_number`: Family phone book
///
/// # Example
///
/// ```no_run
/// use lifesync_shared::models::expense::{Expense, ExpenseFilter};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, family_id: Uuid) -> Result<(), sqlx::Error> {
/// let recent = Expense::list(
///     &pool,
///     family_id,
///     &ExpenseFilter { limit: Some(10), ..Default::default() },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

use serde::Deserialize;
use validator::Validate;

pub mod budget;
pub mod expense;
pub mod family_member;
pub mod family_number;
pub mod health_record;
pub mod income;
pub mod reminder;
pub mod savings_goal;
pub mod task;
pub mod user;

/// Outcome of an atomic increment on a running total
#[derive(Debug, Clone, PartialEq)]
pub enum AmountChange<T> {
    /// The total was updated
    Applied(T),

    /// No such record in the family
    NotFound,

    /// The change would make the total negative; nothing was written
    WouldBeNegative,
}

/// Body of the spend and contribute endpoints
///
/// Negative amounts are allowed and reverse earlier changes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AmountRequest {
    pub amount: f64,
}
