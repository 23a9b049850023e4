use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::age;

/// A child under assessment — the aggregate root every response, summary,
/// and report hangs off. Name and date of birth are PHI and never leave
/// the process toward the text-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Child {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub gender: Gender,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Child {
    /// Whole-month age at `today` (calendar arithmetic, see [`age::age_in_months`]).
    pub fn age_months(&self, today: Date) -> i32 {
        age::age_in_months(self.date_of_birth, today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}
