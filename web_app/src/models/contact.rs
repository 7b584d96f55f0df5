use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;

/// The two people a pet record points at. Both share the same shape and the
/// same identity rule: an exact `(name, contact_number)` match.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    #[display("owner")]
    Owner,
    #[display("vet")]
    Vet,
}

#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
