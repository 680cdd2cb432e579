//! Per-run user data
//!
//! Only lives in memory; nothing is persisted between runs.

use serde::{Deserialize, Serialize};

/// The person playing and their running score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub name: String,
    pub points: u32,
}

impl UserData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: 0,
        }
    }

    /// One point per enemy killed
    pub fn increase_points(&mut self) {
        self.points += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_points() {
        let mut user = UserData::new("ash");
        assert_eq!(user.points, 0);
        user.increase_points();
        user.increase_points();
        assert_eq!(user.points, 2);
        assert_eq!(user.name, "ash");
    }
}
