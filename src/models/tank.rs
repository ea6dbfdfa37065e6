//! Fuel tank inventory state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tank {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub capacity: f64,
    /// Current level in liters.
    #[serde(default, deserialize_with = "super::zero_if_null")]
    pub current_level: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_missing_level_defaults_to_zero() {
        let tank: Tank = serde_json::from_str(r#"{"id": "t1", "name": "Tank A"}"#).unwrap();
        assert_eq!(tank.current_level, 0.0);
        assert_eq!(tank.capacity, 0.0);
        assert!(tank.fuel_type.is_none());
    }
}
