//! Input Collector
//!
//! Turns a loosely-typed form submission into a well-formed [`CustomerRecord`].
//! Numeric fields are clamped into their bounds and missing fields take their
//! defaults. Enumerated fields must match an option exactly.

use crate::error::{CollectError, CollectResult};
use crate::record::*;
use serde::{Deserialize, Serialize};

/// Form section, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    /// Tenure, app usage, devices, recency
    Engagement,
    /// City tier, gender, marital status
    Profile,
    /// Device, payment, category, distance, addresses
    Behavior,
    /// Orders, coupons, cashback, satisfaction, complaints
    Transactions,
}

impl Section {
    /// All sections in display order
    pub const ALL: [Section; 4] = [
        Section::Engagement,
        Section::Profile,
        Section::Behavior,
        Section::Transactions,
    ];

    /// Section heading
    pub const fn title(&self) -> &'static str {
        match self {
            Section::Engagement => "Customer Engagement",
            Section::Profile => "Customer Profile",
            Section::Behavior => "Behavioral Preferences",
            Section::Transactions => "Transactions and Feedback",
        }
    }
}

/// Input constraints of a form field
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Whole number in `min..=max`
    Integer { min: i64, max: i64, default: i64 },
    /// Real number in `min..=max`
    Float { min: f64, max: f64, default: f64, step: f64 },
    /// One of a fixed set of labels; the first is the default
    Choice { options: &'static [&'static str] },
    /// Yes/No
    Flag { default: bool },
}

/// A form field: its name on the wire, its label, the model column it feeds,
/// and its constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Form/JSON key
    pub key: &'static str,
    /// Human label
    pub label: &'static str,
    /// Model column name
    pub column: &'static str,
    /// Form section
    pub section: Section,
    /// Constraints
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn integer(
        key: &'static str,
        label: &'static str,
        column: &'static str,
        section: Section,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self { key, label, column, section, kind: FieldKind::Integer { min, max, default } }
    }

    const fn float(
        key: &'static str,
        label: &'static str,
        column: &'static str,
        section: Section,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self { key, label, column, section, kind: FieldKind::Float { min, max, default, step } }
    }

    const fn choice(
        key: &'static str,
        label: &'static str,
        column: &'static str,
        section: Section,
        options: &'static [&'static str],
    ) -> Self {
        Self { key, label, column, section, kind: FieldKind::Choice { options } }
    }

    /// Clamp an integer input into bounds, or take the default when missing
    pub fn clamp_int(&self, value: Option<i64>) -> i64 {
        match self.kind {
            FieldKind::Integer { min, max, default } => {
                value.map_or(default, |v| v.clamp(min, max))
            }
            _ => 0,
        }
    }

    /// Clamp a real input into bounds, or take the default when missing or not finite
    pub fn clamp_float(&self, value: Option<f64>) -> f64 {
        match self.kind {
            FieldKind::Float { min, max, default, .. } => match value {
                Some(v) if v.is_finite() => v.clamp(min, max),
                _ => default,
            },
            _ => 0.0,
        }
    }
}

/// Tenure (months)
pub const TENURE: FieldSpec = FieldSpec::integer(
    "tenure",
    "Tenure (months)",
    "Tenure",
    Section::Engagement,
    0,
    60,
    12,
);
/// Weekly hours on the app
pub const HOUR_SPEND_ON_APP: FieldSpec = FieldSpec::float(
    "hour_spend_on_app",
    "Hours on App/Week",
    "HourSpendOnApp",
    Section::Engagement,
    0.0,
    5.0,
    1.0,
    0.01,
);
/// Devices registered
pub const NUMBER_OF_DEVICE_REGISTERED: FieldSpec = FieldSpec::integer(
    "number_of_device_registered",
    "Devices Registered",
    "NumberOfDeviceRegistered",
    Section::Engagement,
    1,
    10,
    2,
);
/// Days since last order
pub const DAY_SINCE_LAST_ORDER: FieldSpec = FieldSpec::integer(
    "day_since_last_order",
    "Days Since Last Order",
    "DaySinceLastOrder",
    Section::Engagement,
    0,
    100,
    10,
);
/// City tier
pub const CITY_TIER: FieldSpec = FieldSpec::choice(
    "city_tier",
    "City Tier",
    "CityTier",
    Section::Profile,
    &["1",
    "2",
    "3"],
);
/// Gender
pub const GENDER: FieldSpec = FieldSpec::choice(
    "gender",
    "Gender",
    "Gender",
    Section::Profile,
    Gender::LABELS,
);
/// Marital status
pub const MARITAL_STATUS: FieldSpec = FieldSpec::choice(
    "marital_status",
    "Marital Status",
    "MaritalStatus",
    Section::Profile,
    MaritalStatus::LABELS,
);
/// Login device
pub const PREFERRED_LOGIN_DEVICE: FieldSpec = FieldSpec::choice(
    "preferred_login_device",
    "Login Device",
    "PreferredLoginDevice",
    Section::Behavior,
    LoginDevice::LABELS,
);
/// Payment mode
pub const PREFERRED_PAYMENT_MODE: FieldSpec = FieldSpec::choice(
    "preferred_payment_mode",
    "Payment Mode",
    "PreferredPaymentMode",
    Section::Behavior,
    PaymentMode::LABELS,
);
/// Preferred category
pub const PREFERRED_ORDER_CAT: FieldSpec = FieldSpec::choice(
    "preferred_order_cat",
    "Preferred Category",
    "PreferedOrderCat",
    Section::Behavior,
    OrderCategory::LABELS,
);
/// Warehouse distance
pub const WAREHOUSE_TO_HOME: FieldSpec = FieldSpec::float(
    "warehouse_to_home",
    "Distance to Warehouse (km)",
    "WarehouseToHome",
    Section::Behavior,
    0.0,
    100.0,
    10.0,
    0.1,
);
/// Number of addresses
pub const NUMBER_OF_ADDRESS: FieldSpec = FieldSpec::integer(
    "number_of_address",
    "Number of Addresses",
    "NumberOfAddress",
    Section::Behavior,
    1,
    10,
    1,
);
/// Order count
pub const ORDER_COUNT: FieldSpec = FieldSpec::integer(
    "order_count",
    "Order Count",
    "OrderCount",
    Section::Transactions,
    0,
    50,
    1,
);
/// Order amount hike
pub const ORDER_AMOUNT_HIKE: FieldSpec = FieldSpec::float(
    "order_amount_hike",
    "Order Amount Hike (%)",
    "OrderAmountHikeFromlastYear",
    Section::Transactions,
    0.0,
    100.0,
    10.0,
    0.1,
);
/// Coupons used
pub const COUPON_USED: FieldSpec = FieldSpec::integer(
    "coupon_used",
    "Coupons Used",
    "CouponUsed",
    Section::Transactions,
    0,
    20,
    0,
);
/// Cashback amount
pub const CASHBACK_AMOUNT: FieldSpec = FieldSpec::integer(
    "cashback_amount",
    "Cashback Amount",
    "CashbackAmount",
    Section::Transactions,
    0,
    500,
    0,
);
/// Satisfaction score
pub const SATISFACTION_SCORE: FieldSpec = FieldSpec::integer(
    "satisfaction_score",
    "Satisfaction Score",
    "SatisfactionScore",
    Section::Transactions,
    1,
    5,
    3,
);
/// Complaint flag
pub const COMPLAIN: FieldSpec = FieldSpec {
    key: "complain",
    label: "Has Complaints?",
    column: "Complain",
    section: Section::Transactions,
    kind: FieldKind::Flag { default: false },
};

/// Every raw field, in form order
pub const FIELDS: [FieldSpec; 18] = [
    TENURE,
    HOUR_SPEND_ON_APP,
    NUMBER_OF_DEVICE_REGISTERED,
    DAY_SINCE_LAST_ORDER,
    CITY_TIER,
    GENDER,
    MARITAL_STATUS,
    PREFERRED_LOGIN_DEVICE,
    PREFERRED_PAYMENT_MODE,
    PREFERRED_ORDER_CAT,
    WAREHOUSE_TO_HOME,
    NUMBER_OF_ADDRESS,
    ORDER_COUNT,
    ORDER_AMOUNT_HIKE,
    COUPON_USED,
    CASHBACK_AMOUNT,
    SATISFACTION_SCORE,
    COMPLAIN,
];

/// Yes/No input. HTML forms send text, JSON clients may send a bool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    /// JSON boolean
    Bool(bool),
    /// Text such as `Yes`, `No`, `true`, `on`
    Text(String),
}

impl Flag {
    fn parse(&self, field: &'static str) -> CollectResult<bool> {
        match self {
            Flag::Bool(b) => Ok(*b),
            Flag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" | "on" => Ok(true),
                "no" | "false" | "0" | "off" => Ok(false),
                _ => Err(CollectError::InvalidOption { field, value: s.clone() }),
            },
        }
    }
}

/// Raw form submission. Every field is optional; keys match [`FIELDS`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub tenure: Option<i64>,
    pub hour_spend_on_app: Option<f64>,
    pub number_of_device_registered: Option<i64>,
    pub day_since_last_order: Option<i64>,
    pub city_tier: Option<i64>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub preferred_login_device: Option<String>,
    pub preferred_payment_mode: Option<String>,
    pub preferred_order_cat: Option<String>,
    pub warehouse_to_home: Option<f64>,
    pub number_of_address: Option<i64>,
    pub order_count: Option<i64>,
    pub order_amount_hike: Option<f64>,
    pub coupon_used: Option<i64>,
    pub cashback_amount: Option<i64>,
    pub satisfaction_score: Option<i64>,
    pub complain: Option<Flag>,
}

fn choice<T: Default>(
    value: Option<&str>,
    field: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> CollectResult<T> {
    match value {
        None => Ok(T::default()),
        Some(v) => parse(v.trim()).ok_or_else(|| CollectError::InvalidOption {
            field,
            value: v.to_string(),
        }),
    }
}

impl CustomerForm {
    /// Validate the submission into a record
    pub fn collect(&self) -> CollectResult<CustomerRecord> {
        let city_tier = match self.city_tier {
            None => CityTier::default(),
            Some(n) => CityTier::from_number(n).ok_or(CollectError::InvalidCityTier(n))?,
        };
        let complain = match &self.complain {
            None => false,
            Some(flag) => flag.parse(COMPLAIN.key)?,
        };

        let record = CustomerRecord {
            tenure: TENURE.clamp_int(self.tenure) as u32,
            hour_spend_on_app: HOUR_SPEND_ON_APP.clamp_float(self.hour_spend_on_app),
            number_of_device_registered: NUMBER_OF_DEVICE_REGISTERED
                .clamp_int(self.number_of_device_registered)
                as u32,
            day_since_last_order: DAY_SINCE_LAST_ORDER.clamp_int(self.day_since_last_order) as u32,
            city_tier,
            gender: choice(self.gender.as_deref(), GENDER.key, Gender::from_label)?,
            marital_status: choice(
                self.marital_status.as_deref(),
                MARITAL_STATUS.key,
                MaritalStatus::from_label,
            )?,
            preferred_login_device: choice(
                self.preferred_login_device.as_deref(),
                PREFERRED_LOGIN_DEVICE.key,
                LoginDevice::from_label,
            )?,
            preferred_payment_mode: choice(
                self.preferred_payment_mode.as_deref(),
                PREFERRED_PAYMENT_MODE.key,
                PaymentMode::from_label,
            )?,
            preferred_order_cat: choice(
                self.preferred_order_cat.as_deref(),
                PREFERRED_ORDER_CAT.key,
                OrderCategory::from_label,
            )?,
            warehouse_to_home: WAREHOUSE_TO_HOME.clamp_float(self.warehouse_to_home),
            number_of_address: NUMBER_OF_ADDRESS.clamp_int(self.number_of_address) as u32,
            order_count: ORDER_COUNT.clamp_int(self.order_count) as u32,
            order_amount_hike: ORDER_AMOUNT_HIKE.clamp_float(self.order_amount_hike),
            coupon_used: COUPON_USED.clamp_int(self.coupon_used) as u32,
            cashback_amount: CASHBACK_AMOUNT.clamp_int(self.cashback_amount) as u32,
            satisfaction_score: SATISFACTION_SCORE.clamp_int(self.satisfaction_score) as u8,
            complain,
        };

        tracing::debug!(
            tenure = record.tenure,
            days = record.day_since_last_order,
            "collected customer record"
        );
        Ok(record)
    }

    /// Form pre-filled with a record's values
    pub fn from_record(record: &CustomerRecord) -> Self {
        Self {
            tenure: Some(record.tenure as i64),
            hour_spend_on_app: Some(record.hour_spend_on_app),
            number_of_device_registered: Some(record.number_of_device_registered as i64),
            day_since_last_order: Some(record.day_since_last_order as i64),
            city_tier: Some(record.city_tier.number() as i64),
            gender: Some(record.gender.to_string()),
            marital_status: Some(record.marital_status.to_string()),
            preferred_login_device: Some(record.preferred_login_device.to_string()),
            preferred_payment_mode: Some(record.preferred_payment_mode.to_string()),
            preferred_order_cat: Some(record.preferred_order_cat.to_string()),
            warehouse_to_home: Some(record.warehouse_to_home),
            number_of_address: Some(record.number_of_address as i64),
            order_count: Some(record.order_count as i64),
            order_amount_hike: Some(record.order_amount_hike),
            coupon_used: Some(record.coupon_used as i64),
            cashback_amount: Some(record.cashback_amount as i64),
            satisfaction_score: Some(record.satisfaction_score as i64),
            complain: Some(Flag::Text(if record.complain { "Yes" } else { "No" }.into())),
        }
    }
}
