use serde::{Deserialize, Serialize};

/// Input ceiling checked before any scheduling work starts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub max_courses: usize,
    pub max_students: usize,
    pub max_faculty: usize,
    pub max_days: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_courses: 5_000,
            max_students: 200_000,
            max_faculty: 5_000,
            max_days: 60,
        }
    }
}
