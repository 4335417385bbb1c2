//! Strict internal types for Odoo responses.
//!
//! `read_group` answers vary in shape (arrays of structs, structs wrapping
//! a `groups` array, missing departments, ints where doubles are
//! expected). Everything is normalized here, immediately after the RPC
//! call; the rest of the system only ever sees these types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OdooError;
use crate::xmlrpc::Value;

/// Billing classification of analytic lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    /// Fixed-price project work.
    FixedPrice,
    /// Time-and-materials timesheet work.
    Timesheet,
    /// Milestone-billed work.
    Milestone,
    /// Manually classified work.
    Manual,
}

impl BillingType {
    /// The `timesheet_invoice_type` selection value in Odoo.
    #[must_use]
    pub const fn odoo_value(self) -> &'static str {
        match self {
            Self::FixedPrice => "billable_fixed",
            Self::Timesheet => "billable_time",
            Self::Milestone => "billable_milestones",
            Self::Manual => "billable_manual",
        }
    }
}

/// A department row from `hr.department`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OdooDepartment {
    /// Odoo record id.
    pub id: i64,
    /// Department name.
    pub name: String,
}

/// One department's aggregated billable hours for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursGroup {
    /// Odoo department id.
    pub department_id: i64,
    /// Odoo department name.
    pub department_name: String,
    /// Summed billable hours; always strictly positive after
    /// normalization.
    pub hours: Decimal,
}

/// Normalizes a `search_read` result on `hr.department`.
///
/// # Errors
///
/// Returns `OdooError::UnexpectedResponse` when the value is not an array
/// of `{id, name}` structs.
pub fn normalize_departments(value: &Value) -> Result<Vec<OdooDepartment>, OdooError> {
    let rows = value
        .as_array()
        .ok_or_else(|| OdooError::UnexpectedResponse("search_read did not return an array".into()))?;

    let mut departments = Vec::with_capacity(rows.len());
    for row in rows {
        let members = row.as_struct().ok_or_else(|| {
            OdooError::UnexpectedResponse("department row is not a struct".into())
        })?;
        let id = members
            .get("id")
            .and_then(Value::as_int)
            .ok_or_else(|| OdooError::UnexpectedResponse("department row without id".into()))?;
        let name = members
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| OdooError::UnexpectedResponse("department row without name".into()))?
            .to_string();
        departments.push(OdooDepartment { id, name });
    }
    Ok(departments)
}

/// Normalizes a `read_group` result into hour groups.
///
/// Accepts both the plain-array shape and the `{groups: [...]}` wrapper.
/// Groups without a department (`department_id = false`) and groups with
/// non-positive summed hours are discarded: a department that billed
/// nothing in the period must not appear at all.
///
/// # Errors
///
/// Returns `OdooError::UnexpectedResponse` when no group list can be found.
pub fn normalize_hours_groups(value: &Value) -> Result<Vec<HoursGroup>, OdooError> {
    let rows = match value {
        Value::Array(items) => items.as_slice(),
        Value::Struct(members) => members
            .get("groups")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                OdooError::UnexpectedResponse("read_group struct without groups array".into())
            })?,
        _ => {
            return Err(OdooError::UnexpectedResponse(
                "read_group did not return groups".into(),
            ));
        }
    };

    let mut groups = Vec::new();
    for row in rows {
        let Some(members) = row.as_struct() else {
            // Odd group shapes are skipped, not fatal.
            continue;
        };

        // department_id is either [id, name] or boolean false.
        let Some(dept) = members.get("department_id").and_then(Value::as_array) else {
            continue;
        };
        let (Some(id), Some(name)) = (
            dept.first().and_then(Value::as_int),
            dept.get(1).and_then(|v| v.as_str()),
        ) else {
            continue;
        };

        let hours = members
            .get("unit_amount")
            .and_then(Value::as_decimal)
            .unwrap_or(Decimal::ZERO);
        if hours <= Decimal::ZERO {
            continue;
        }

        groups.push(HoursGroup {
            department_id: id,
            department_name: name.to_string(),
            hours,
        });
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlrpc::Value;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn group(dept: Value, hours: Value) -> Value {
        let mut members = BTreeMap::new();
        members.insert("department_id".to_string(), dept);
        members.insert("unit_amount".to_string(), hours);
        Value::Struct(members)
    }

    fn dept(id: i64, name: &str) -> Value {
        Value::Array(vec![Value::Int(id), Value::string(name)])
    }

    #[test]
    fn test_normalize_plain_array() {
        let value = Value::Array(vec![
            group(dept(3, "Design"), Value::Double(dec!(120.5))),
            group(dept(5, "Dev"), Value::Int(80)),
        ]);
        let groups = normalize_hours_groups(&value).unwrap();
        assert_eq!(
            groups,
            vec![
                HoursGroup {
                    department_id: 3,
                    department_name: "Design".into(),
                    hours: dec!(120.5),
                },
                HoursGroup {
                    department_id: 5,
                    department_name: "Dev".into(),
                    hours: dec!(80),
                },
            ]
        );
    }

    #[test]
    fn test_normalize_groups_wrapper() {
        let mut wrapper = BTreeMap::new();
        wrapper.insert(
            "groups".to_string(),
            Value::Array(vec![group(dept(3, "Design"), Value::Double(dec!(9.25)))]),
        );
        wrapper.insert("length".to_string(), Value::Int(1));

        let groups = normalize_hours_groups(&Value::Struct(wrapper)).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hours, dec!(9.25));
    }

    #[test]
    fn test_missing_department_discarded() {
        let value = Value::Array(vec![
            group(Value::Bool(false), Value::Double(dec!(40))),
            group(dept(5, "Dev"), Value::Double(dec!(10))),
        ]);
        let groups = normalize_hours_groups(&value).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].department_name, "Dev");
    }

    #[test]
    fn test_non_positive_hours_discarded() {
        let value = Value::Array(vec![
            group(dept(1, "Idle"), Value::Double(dec!(0))),
            group(dept(2, "Refund"), Value::Double(dec!(-3))),
            group(dept(3, "Busy"), Value::Double(dec!(1))),
        ]);
        let groups = normalize_hours_groups(&value).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].department_id, 3);
    }

    #[test]
    fn test_not_an_array_is_an_error() {
        assert!(normalize_hours_groups(&Value::Int(3)).is_err());
    }

    #[test]
    fn test_normalize_departments() {
        let mut row = BTreeMap::new();
        row.insert("id".to_string(), Value::Int(7));
        row.insert("name".to_string(), Value::string("Studio"));
        let value = Value::Array(vec![Value::Struct(row)]);

        let departments = normalize_departments(&value).unwrap();
        assert_eq!(
            departments,
            vec![OdooDepartment {
                id: 7,
                name: "Studio".into(),
            }]
        );
    }

    #[test]
    fn test_billing_type_values() {
        assert_eq!(BillingType::FixedPrice.odoo_value(), "billable_fixed");
        assert_eq!(BillingType::Timesheet.odoo_value(), "billable_time");
        assert_eq!(BillingType::Milestone.odoo_value(), "billable_milestones");
        assert_eq!(BillingType::Manual.odoo_value(), "billable_manual");
    }
}
