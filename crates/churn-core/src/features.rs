//! Feature Deriver
//!
//! Pure mapping from a [`CustomerRecord`] to the record plus the four
//! engineered features the model was trained with.

use crate::record::CustomerRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orders older than this many days make a customer inactive
pub const ACTIVE_WINDOW_DAYS: u32 = 30;

/// Satisfaction at or below this, together with a complaint, marks an unhappy customer
pub const UNHAPPY_SATISFACTION_MAX: u8 = 2;

/// Loyalty bin based on tenure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenureGroup {
    /// 0-3 months
    New,
    /// 4-9 months
    Early,
    /// 10-15 months
    MidTerm,
    /// More than 15 months
    LongTerm,
}

impl TenureGroup {
    /// All groups, shortest tenure first
    pub const ALL: [TenureGroup; 4] = [
        TenureGroup::New,
        TenureGroup::Early,
        TenureGroup::MidTerm,
        TenureGroup::LongTerm,
    ];

    /// Bucket a tenure in months. Each bucket includes its upper bound.
    pub const fn from_tenure(tenure: u32) -> Self {
        match tenure {
            0..=3 => TenureGroup::New,
            4..=9 => TenureGroup::Early,
            10..=15 => TenureGroup::MidTerm,
            _ => TenureGroup::LongTerm,
        }
    }

    /// Label as seen by the model
    pub const fn as_str(&self) -> &'static str {
        match self {
            TenureGroup::New => "New",
            TenureGroup::Early => "Early",
            TenureGroup::MidTerm => "MidTerm",
            TenureGroup::LongTerm => "LongTerm",
        }
    }
}

impl fmt::Display for TenureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `days / (tenure + 1)`. Lower means more active.
pub fn recency_ratio(day_since_last_order: u32, tenure: u32) -> f64 {
    day_since_last_order as f64 / (tenure as f64 + 1.0)
}

/// Ordered within the last 30 days (exclusive)
pub const fn is_active_user(day_since_last_order: u32) -> bool {
    day_since_last_order < ACTIVE_WINDOW_DAYS
}

/// Complained and rated satisfaction 2 or lower
pub const fn is_unhappy_customer(complain: bool, satisfaction_score: u8) -> bool {
    complain && satisfaction_score <= UNHAPPY_SATISFACTION_MAX
}

/// Customer record plus engineered features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatureSet {
    /// Raw inputs
    #[serde(flatten)]
    pub record: CustomerRecord,
    /// Loyalty bin
    pub tenure_group: TenureGroup,
    /// Inactivity normalized by tenure
    pub recency_ratio: f64,
    /// Ordered within the active window
    pub is_active_user: bool,
    /// Complaint with low satisfaction
    pub unhappy_customer: bool,
}

impl DerivedFeatureSet {
    /// Recency ratio as shown to users
    pub fn recency_ratio_display(&self) -> String {
        format!("{:.2}", self.recency_ratio)
    }
}

/// Derive the engineered features. Total and pure.
pub fn derive(raw: CustomerRecord) -> DerivedFeatureSet {
    DerivedFeatureSet {
        tenure_group: TenureGroup::from_tenure(raw.tenure),
        recency_ratio: recency_ratio(raw.day_since_last_order, raw.tenure),
        is_active_user: is_active_user(raw.day_since_last_order),
        unhappy_customer: is_unhappy_customer(raw.complain, raw.satisfaction_score),
        record: raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::*;
    use proptest::prelude::*;

    fn round2(x: f64) -> f64 {
        (x * 100.0).round() / 100.0
    }

    #[test]
    fn test_tenure_group_boundaries() {
        let cases = [
            (0, TenureGroup::New),
            (3, TenureGroup::New),
            (4, TenureGroup::Early),
            (9, TenureGroup::Early),
            (10, TenureGroup::MidTerm),
            (15, TenureGroup::MidTerm),
            (16, TenureGroup::LongTerm),
            (60, TenureGroup::LongTerm),
        ];
        for (tenure, group) in cases {
            assert_eq!(TenureGroup::from_tenure(tenure), group, "tenure {}", tenure);
        }
    }

    #[test]
    fn test_recency_ratio() {
        assert_eq!(round2(recency_ratio(10, 12)), 0.77);
        assert_eq!(recency_ratio(0, 0), 0.0);
        assert_eq!(recency_ratio(5, 0), 5.0);
    }

    #[test]
    fn test_active_user_boundary() {
        assert!(is_active_user(29));
        assert!(!is_active_user(30));
        assert!(is_active_user(0));
    }

    #[test]
    fn test_unhappy_customer() {
        assert!(is_unhappy_customer(true, 2));
        assert!(is_unhappy_customer(true, 1));
        assert!(!is_unhappy_customer(true, 3));
        assert!(!is_unhappy_customer(false, 1));
    }

    #[test]
    fn test_derive_reference_customer() {
        let raw = CustomerRecord {
            tenure: 12,
            hour_spend_on_app: 1.0,
            number_of_device_registered: 2,
            day_since_last_order: 10,
            city_tier: CityTier::Tier1,
            gender: Gender::Female,
            marital_status: MaritalStatus::Single,
            ..Default::default()
        };
        let features = derive(raw.clone());

        assert_eq!(features.record, raw);
        assert_eq!(features.tenure_group, TenureGroup::MidTerm);
        assert_eq!(features.recency_ratio_display(), "0.77");
        assert!(features.is_active_user);
        assert!(!features.unhappy_customer);
    }

    #[test]
    fn test_derive_serializes_flat() {
        let value = serde_json::to_value(derive(CustomerRecord::default())).unwrap();
        assert_eq!(value["tenure"], 12);
        assert_eq!(value["tenure_group"], "MidTerm");
        assert_eq!(value["is_active_user"], true);
    }

    fn arb_record() -> impl Strategy<Value = CustomerRecord> {
        (0u32..=60, 0u32..=100, 1u8..=5, any::<bool>(), 0.0f64..=5.0).prop_map(
            |(tenure, days, score, complain, hours)| CustomerRecord {
                tenure,
                day_since_last_order: days,
                satisfaction_score: score,
                complain,
                hour_spend_on_app: hours,
                ..Default::default()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_derive_is_deterministic(record in arb_record()) {
            prop_assert_eq!(derive(record.clone()), derive(record));
        }

        #[test]
        fn prop_recency_ratio_matches_formula(record in arb_record()) {
            let features = derive(record.clone());
            let expected = record.day_since_last_order as f64 / (record.tenure as f64 + 1.0);
            prop_assert!(features.recency_ratio >= 0.0);
            prop_assert_eq!(features.recency_ratio, expected);
        }

        #[test]
        fn prop_flags_follow_rules(record in arb_record()) {
            let features = derive(record.clone());
            prop_assert_eq!(features.is_active_user, record.day_since_last_order < 30);
            prop_assert_eq!(
                features.unhappy_customer,
                record.complain && record.satisfaction_score <= 2
            );
        }

        #[test]
        fn prop_tenure_group_is_monotone(a in 0u32..=60, b in 0u32..=60) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let rank = |g: TenureGroup| TenureGroup::ALL.iter().position(|x| *x == g);
            prop_assert!(rank(TenureGroup::from_tenure(lo)) <= rank(TenureGroup::from_tenure(hi)));
        }
    }
}
