/// Custom field validators for request bodies
///
/// Used through `validator`'s `custom(function = "...")` attribute, plus
/// [`trimmed`] for fields that must be cleaned up before they are validated.

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Blood groups accepted on family member profiles
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Rejects empty or whitespace-only text
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts one of [`BLOOD_GROUPS`]
pub fn valid_blood_group(value: &str) -> Result<(), ValidationError> {
    if BLOOD_GROUPS.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("blood_group");
        err.message = Some(format!("must be one of {}", BLOOD_GROUPS.join(", ")).into());
        Err(err)
    }
}

/// Deserializes a string with surrounding whitespace removed
///
/// Use with `#[serde(deserialize_with = "trimmed")]` so validators see the
/// cleaned value.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Trims and lowercases an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
