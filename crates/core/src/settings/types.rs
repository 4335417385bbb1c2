//! Company settings resolved from the global settings table.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Setting key for the company target margin.
pub const KEY_TARGET_MARGIN: &str = "targetMargin";
/// Setting key for standard working hours per month.
pub const KEY_HOURS_PER_MONTH: &str = "hoursPerMonth";
/// Setting key for the default target utilization.
pub const KEY_TARGET_UTILIZATION: &str = "targetUtilization";
/// Setting key for the default monthly cost per person.
pub const KEY_COST_PER_PERSON: &str = "costPerPersonPerMonth";
/// Setting key for the overhead (non-billable) headcount.
pub const KEY_OVERHEAD_PEOPLE: &str = "overheadPeople";

/// Errors resolving company settings.
///
/// An absent key falls back to its default; a key that is present but
/// unparsable fails loudly so configuration errors are not masked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A stored setting value could not be parsed.
    #[error("Malformed setting {key}: {value:?}")]
    Malformed {
        /// Setting key.
        key: String,
        /// Stored raw value.
        value: String,
    },
}

/// Resolved company-wide parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySettings {
    /// Target profit margin as a fraction (0..1).
    pub target_margin: Decimal,
    /// Standard working hours per person per month.
    pub hours_per_month: Decimal,
    /// Default target utilization as a fraction (0..1).
    pub target_utilization: Decimal,
    /// Default monthly cost of one person.
    pub cost_per_person_per_month: Decimal,
    /// Headcount not attributable to any billable department.
    pub overhead_people: i32,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            target_margin: Decimal::new(3, 1),               // 0.3
            hours_per_month: Decimal::from(160),
            target_utilization: Decimal::new(65, 2),         // 0.65
            cost_per_person_per_month: Decimal::from(2200),
            overhead_people: 6,
        }
    }
}

impl CompanySettings {
    /// Resolves settings from raw key/value rows.
    ///
    /// Missing keys take their documented default. Present-but-malformed
    /// values are rejected, never silently defaulted.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Malformed` for an unparsable stored value.
    pub fn from_rows(rows: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            target_margin: parse_decimal(rows, KEY_TARGET_MARGIN, defaults.target_margin)?,
            hours_per_month: parse_decimal(rows, KEY_HOURS_PER_MONTH, defaults.hours_per_month)?,
            target_utilization: parse_decimal(
                rows,
                KEY_TARGET_UTILIZATION,
                defaults.target_utilization,
            )?,
            cost_per_person_per_month: parse_decimal(
                rows,
                KEY_COST_PER_PERSON,
                defaults.cost_per_person_per_month,
            )?,
            overhead_people: parse_int(rows, KEY_OVERHEAD_PEOPLE, defaults.overhead_people)?,
        })
    }

    /// The keys this resolver understands, with their default values as
    /// strings (used by the seeder).
    #[must_use]
    pub fn default_rows() -> Vec<(&'static str, String, &'static str)> {
        let d = Self::default();
        vec![
            (
                KEY_TARGET_MARGIN,
                d.target_margin.to_string(),
                "Target profit margin (fraction)",
            ),
            (
                KEY_HOURS_PER_MONTH,
                d.hours_per_month.to_string(),
                "Standard working hours per month",
            ),
            (
                KEY_TARGET_UTILIZATION,
                d.target_utilization.to_string(),
                "Default target utilization (fraction)",
            ),
            (
                KEY_COST_PER_PERSON,
                d.cost_per_person_per_month.to_string(),
                "Default monthly cost per person",
            ),
            (
                KEY_OVERHEAD_PEOPLE,
                d.overhead_people.to_string(),
                "Overhead (non-billable) headcount",
            ),
        ]
    }
}

fn parse_decimal(
    rows: &HashMap<String, String>,
    key: &str,
    default: Decimal,
) -> Result<Decimal, SettingsError> {
    match rows.get(key) {
        None => Ok(default),
        Some(raw) => Decimal::from_str(raw.trim()).map_err(|_| SettingsError::Malformed {
            key: key.to_string(),
            value: raw.clone(),
        }),
    }
}

fn parse_int(
    rows: &HashMap<String, String>,
    key: &str,
    default: i32,
) -> Result<i32, SettingsError> {
    match rows.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| SettingsError::Malformed {
            key: key.to_string(),
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_when_empty() {
        let settings = CompanySettings::from_rows(&HashMap::new()).unwrap();
        assert_eq!(settings.target_margin, dec!(0.3));
        assert_eq!(settings.hours_per_month, dec!(160));
        assert_eq!(settings.target_utilization, dec!(0.65));
        assert_eq!(settings.cost_per_person_per_month, dec!(2200));
        assert_eq!(settings.overhead_people, 6);
    }

    #[test]
    fn test_stored_values_override_defaults() {
        let mut rows = HashMap::new();
        rows.insert(KEY_TARGET_MARGIN.to_string(), "0.35".to_string());
        rows.insert(KEY_OVERHEAD_PEOPLE.to_string(), "4".to_string());

        let settings = CompanySettings::from_rows(&rows).unwrap();
        assert_eq!(settings.target_margin, dec!(0.35));
        assert_eq!(settings.overhead_people, 4);
        // Untouched keys keep their defaults.
        assert_eq!(settings.hours_per_month, dec!(160));
    }

    #[test]
    fn test_malformed_value_fails_loudly() {
        let mut rows = HashMap::new();
        rows.insert(KEY_HOURS_PER_MONTH.to_string(), "not-a-number".to_string());

        let err = CompanySettings::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            SettingsError::Malformed {
                key: KEY_HOURS_PER_MONTH.to_string(),
                value: "not-a-number".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_int_fails_loudly() {
        let mut rows = HashMap::new();
        rows.insert(KEY_OVERHEAD_PEOPLE.to_string(), "6.5".to_string());
        assert!(CompanySettings::from_rows(&rows).is_err());
    }

    #[test]
    fn test_default_rows_roundtrip() {
        let rows: HashMap<String, String> = CompanySettings::default_rows()
            .into_iter()
            .map(|(k, v, _)| (k.to_string(), v))
            .collect();
        assert_eq!(
            CompanySettings::from_rows(&rows).unwrap(),
            CompanySettings::default()
        );
    }
}
