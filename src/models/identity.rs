use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user's profile record.
///
/// `id` and `email` are fixed for the lifetime of a session; everything else
/// changes only through [`ProfileUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's phone number.
    pub phone: Option<String>,
    /// The professional registration number (CRM or equivalent).
    pub registration_number: Option<String>,
    /// The user's medical specialty.
    pub specialty: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A partial identity payload.
///
/// Fields left as `None` are retained on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub specialty: Option<String>,
}

impl ProfileUpdate {
    /// Returns `true` when no field would be overwritten.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.registration_number.is_none()
            && self.specialty.is_none()
    }
}

impl Identity {
    /// Shallow-merges `update` into this identity and bumps `updated_at`.
    ///
    /// The new `updated_at` is always strictly greater than the previous one,
    /// even when the clock has not advanced between two updates.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(registration_number) = update.registration_number {
            self.registration_number = Some(registration_number);
        }
        if let Some(specialty) = update.specialty {
            self.specialty = Some(specialty);
        }
        self.updated_at = next_timestamp(self.updated_at);
    }
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}
