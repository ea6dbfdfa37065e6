//! Fuel-supply report export.

use chrono::{DateTime, NaiveDate};

use crate::errors::AppError;
use crate::models::fuel_supply::FuelSupply;

const CSV_HEADERS: [&str; 9] = [
    "Delivery Date",
    "Provider",
    "Tank",
    "Fuel Type",
    "Quantity (L)",
    "Price/L",
    "Total Cost",
    "Payment Status",
    "Comments",
];

/// Aggregate figures printed beneath a supply report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SupplyTotals {
    pub total_quantity: f64,
    pub total_cost: f64,
}

pub fn supply_totals(supplies: &[FuelSupply]) -> SupplyTotals {
    supplies.iter().fold(SupplyTotals::default(), |acc, s| SupplyTotals {
        total_quantity: acc.total_quantity + s.quantity_liters,
        total_cost: acc.total_cost + s.total_cost,
    })
}

/// Render supplies as CSV with a header row.
pub fn supplies_to_csv(supplies: &[FuelSupply]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_supplies(&mut writer, supplies)?;
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV buffer flush failed: {e}")))
}

/// Write the CSV report to any sink.
pub fn write_supplies<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    supplies: &[FuelSupply],
) -> Result<(), AppError> {
    let csv_err = |e: csv::Error| AppError::Internal(format!("CSV write failed: {e}"));

    writer.write_record(CSV_HEADERS).map_err(csv_err)?;
    for supply in supplies {
        writer.write_record(supply_row(supply)).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))
}

fn supply_row(supply: &FuelSupply) -> [String; 9] {
    let provider = supply
        .provider
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let (tank, fuel_type) = supply
        .tank
        .as_ref()
        .map(|t| (t.name.clone(), t.fuel_type.clone().unwrap_or_default()))
        .unwrap_or_default();

    [
        format_delivery_date(&supply.delivery_date),
        provider,
        tank,
        fuel_type,
        supply.quantity_liters.to_string(),
        format!("{:.2}", supply.price_per_liter),
        format!("{:.2}", supply.total_cost),
        supply.payment_status.clone().unwrap_or_default(),
        supply.comments.clone().unwrap_or_default(),
    ]
}

/// Normalize an API date or timestamp to `YYYY-MM-DD`; unparseable input is kept as-is.
pub fn format_delivery_date(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// `{prefix}-{YYYY-MM-DD}.{extension}`, with anything outside `[A-Za-z0-9_-]` in the prefix replaced.
pub fn export_filename(prefix: &str, extension: &str, date: NaiveDate) -> String {
    let cleaned: String = prefix
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let prefix = if cleaned.is_empty() {
        "export"
    } else {
        cleaned.as_str()
    };
    format!("{prefix}-{}.{extension}", date.format("%Y-%m-%d"))
}
