//! Domain entities exchanged with the station API and the dashboard UI.

pub mod dashboard;
pub mod expense;
pub mod financial;
pub mod fuel_supply;
pub mod sale;
pub mod tank;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` in a numeric field the same as an absent one.
pub(crate) fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
