//! Model row schema
//!
//! The 22 named columns the model was trained against, in training order.
//! Names, order and value types are the compatibility contract with the
//! artifact; they are not negotiable at runtime.

use crate::features::DerivedFeatureSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of model columns
pub const FEATURE_COUNT: usize = 22;

/// Value type of a model column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Real or integer value
    Numeric,
    /// Option label
    Categorical,
}

/// A model column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: &'static str,
    /// Value type
    pub kind: ColumnKind,
}

const fn numeric(name: &'static str) -> ColumnSpec {
    ColumnSpec { name, kind: ColumnKind::Numeric }
}

const fn categorical(name: &'static str) -> ColumnSpec {
    ColumnSpec { name, kind: ColumnKind::Categorical }
}

/// Model columns in training order
pub const FEATURE_COLUMNS: [ColumnSpec; FEATURE_COUNT] = [
    numeric("Tenure"),
    categorical("PreferredLoginDevice"),
    numeric("CityTier"),
    numeric("WarehouseToHome"),
    categorical("PreferredPaymentMode"),
    categorical("Gender"),
    numeric("HourSpendOnApp"),
    numeric("NumberOfDeviceRegistered"),
    categorical("PreferedOrderCat"),
    numeric("SatisfactionScore"),
    categorical("MaritalStatus"),
    numeric("NumberOfAddress"),
    numeric("Complain"),
    numeric("OrderAmountHikeFromlastYear"),
    numeric("CouponUsed"),
    numeric("OrderCount"),
    numeric("DaySinceLastOrder"),
    numeric("CashbackAmount"),
    numeric("RecencyRatio"),
    numeric("IsActiveUser"),
    numeric("UnhappyCustomer"),
    categorical("TenureGroup"),
];

/// A single cell of a model row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    /// Numeric cell
    Number(f64),
    /// Categorical cell
    Category(&'static str),
}

impl FeatureValue {
    fn flag(b: bool) -> Self {
        FeatureValue::Number(if b { 1.0 } else { 0.0 })
    }

    /// Column kind this value fits
    pub fn kind(&self) -> ColumnKind {
        match self {
            FeatureValue::Number(_) => ColumnKind::Numeric,
            FeatureValue::Category(_) => ColumnKind::Categorical,
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Number(n) => serializer.serialize_f64(*n),
            FeatureValue::Category(c) => serializer.serialize_str(c),
        }
    }
}

/// One model input row: values aligned with [`FEATURE_COLUMNS`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: [FeatureValue; FEATURE_COUNT],
}

impl FeatureRow {
    /// Row from values in column order
    pub fn new(values: [FeatureValue; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in column order
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Value by column name
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| c.name == name)
            .map(|i| self.values[i])
    }

    /// `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static ColumnSpec, &FeatureValue)> {
        FEATURE_COLUMNS.iter().zip(self.values.iter())
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column.name, value)?;
        }
        map.end()
    }
}

impl DerivedFeatureSet {
    /// Package the record into the row the model expects
    pub fn to_row(&self) -> FeatureRow {
        use FeatureValue::{Category, Number};
        let r = &self.record;

        FeatureRow::new([
            Number(r.tenure as f64),
            Category(r.preferred_login_device.as_str()),
            Number(r.city_tier.number() as f64),
            Number(r.warehouse_to_home),
            Category(r.preferred_payment_mode.as_str()),
            Category(r.gender.as_str()),
            Number(r.hour_spend_on_app),
            Number(r.number_of_device_registered as f64),
            Category(r.preferred_order_cat.as_str()),
            Number(r.satisfaction_score as f64),
            Category(r.marital_status.as_str()),
            Number(r.number_of_address as f64),
            FeatureValue::flag(r.complain),
            Number(r.order_amount_hike),
            Number(r.coupon_used as f64),
            Number(r.order_count as f64),
            Number(r.day_since_last_order as f64),
            Number(r.cashback_amount as f64),
            Number(self.recency_ratio),
            FeatureValue::flag(self.is_active_user),
            FeatureValue::flag(self.unhappy_customer),
            Category(self.tenure_group.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive;
    use crate::record::*;

    #[test]
    fn test_row_kinds_match_columns() {
        let row = derive(CustomerRecord::default()).to_row();
        for (column, value) in row.iter() {
            assert_eq!(column.kind, value.kind(), "column {}", column.name);
        }
    }

    #[test]
    fn test_row_values() {
        let record = CustomerRecord {
            tenure: 2,
            day_since_last_order: 45,
            complain: true,
            satisfaction_score: 1,
            city_tier: CityTier::Tier3,
            preferred_payment_mode: PaymentMode::CashOnDelivery,
            ..Default::default()
        };
        let row = derive(record).to_row();

        assert_eq!(row.get("TenureGroup"), Some(FeatureValue::Category("New")));
        assert_eq!(row.get("RecencyRatio"), Some(FeatureValue::Number(15.0)));
        assert_eq!(row.get("IsActiveUser"), Some(FeatureValue::Number(0.0)));
        assert_eq!(row.get("UnhappyCustomer"), Some(FeatureValue::Number(1.0)));
        assert_eq!(row.get("Complain"), Some(FeatureValue::Number(1.0)));
        assert_eq!(row.get("CityTier"), Some(FeatureValue::Number(3.0)));
        assert_eq!(row.get("PreferredPaymentMode"), Some(FeatureValue::Category("Cash on Delivery")));
        assert_eq!(row.get("Churn"), None);
    }

    #[test]
    fn test_column_names_are_unique() {
        for (i, a) in FEATURE_COLUMNS.iter().enumerate() {
            assert!(FEATURE_COLUMNS[i + 1..].iter().all(|b| b.name != a.name), "duplicate {}", a.name);
        }
    }

    #[test]
    fn test_row_serializes_in_order() {
        let json = serde_json::to_string(&derive(CustomerRecord::default()).to_row()).unwrap();
        assert!(json.starts_with(r#"{"Tenure":12.0,"PreferredLoginDevice":"Mobile Phone","CityTier":1.0"#));
        assert!(json.ends_with(r#""TenureGroup":"MidTerm"}"#));
    }
}
