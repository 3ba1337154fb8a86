//! Customer record, its server-generated identifier, and the create/update inputs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque record identifier. Generated by the server, never parsed or interpreted by clients.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// New random identifier (UUID v4, 32 lowercase hex chars).
    pub fn generate() -> Self {
        CustomerId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        CustomerId(s)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        CustomerId(s.to_string())
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored customer as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub member_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Build a fresh record; `created_at` and `updated_at` are both `now`.
    pub fn new(id: CustomerId, input: NewCustomer, now: DateTime<Utc>) -> Self {
        Customer {
            id,
            name: input.name,
            date_of_birth: input.date_of_birth,
            member_number: input.member_number,
            interests: input.interests,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply supplied fields in place and refresh `updated_at`. `updated_at` never moves backwards.
    pub fn apply(&mut self, patch: &CustomerPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(dob) = patch.date_of_birth {
            self.date_of_birth = dob;
        }
        if let Some(n) = patch.member_number {
            self.member_number = n;
        }
        if let Some(interests) = &patch.interests {
            self.interests = interests.clone();
        }
        self.updated_at = now.max(self.updated_at);
    }
}

/// Validated input for Create.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub member_number: i64,
    pub interests: Option<String>,
}

/// Validated input for Update. `None` leaves a field untouched; `interests: Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub member_number: Option<i64>,
    pub interests: Option<Option<String>>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.member_number.is_none()
            && self.interests.is_none()
    }
}
