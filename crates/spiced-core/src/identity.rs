//! The identity every derived name and tag is keyed on.

use serde::{Deserialize, Serialize};

/// Cohort and full name of a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpicedlingIdentity {
    pub cohort: String,
    pub first_name: String,
    pub last_name: String,
}

impl SpicedlingIdentity {
    pub fn new(
        cohort: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            cohort: cohort.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
