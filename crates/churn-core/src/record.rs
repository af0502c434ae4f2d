//! Raw customer record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a categorical field whose options are fixed strings the model was
/// trained on. The first option is the default.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => $label:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All options in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Option labels in display order
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Label as seen by the model
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse an exact option label
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            /// First option, as preselected on the form
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Customer gender
    Gender {
        Female => "Female",
        Male => "Male",
    }
}

choice_enum! {
    /// Marital status
    MaritalStatus {
        Single => "Single",
        Divorced => "Divorced",
        Married => "Married",
    }
}

choice_enum! {
    /// Preferred login device
    LoginDevice {
        MobilePhone => "Mobile Phone",
        Computer => "Computer",
    }
}

choice_enum! {
    /// Preferred payment mode
    PaymentMode {
        DebitCard => "Debit Card",
        Upi => "UPI",
        CreditCard => "Credit Card",
        CashOnDelivery => "Cash on Delivery",
        EWallet => "E wallet",
    }
}

choice_enum! {
    /// Preferred order category last month
    OrderCategory {
        LaptopAndAccessory => "Laptop & Accessory",
        MobilePhone => "Mobile Phone",
        Others => "Others",
        Fashion => "Fashion",
        Grocery => "Grocery",
    }
}

/// City tier (1 = largest cities)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CityTier {
    /// Tier 1
    #[default]
    Tier1 = 1,
    /// Tier 2
    Tier2 = 2,
    /// Tier 3
    Tier3 = 3,
}

impl CityTier {
    /// All tiers in display order
    pub const ALL: &'static [CityTier] = &[CityTier::Tier1, CityTier::Tier2, CityTier::Tier3];

    /// Numeric tier as fed to the model
    pub const fn number(&self) -> u8 {
        *self as u8
    }

    /// Tier from its number
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(CityTier::Tier1),
            2 => Some(CityTier::Tier2),
            3 => Some(CityTier::Tier3),
            _ => None,
        }
    }
}

impl TryFrom<u8> for CityTier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n as i64).ok_or_else(|| format!("invalid city tier {}", n))
    }
}

impl From<CityTier> for u8 {
    fn from(tier: CityTier) -> u8 {
        tier.number()
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Raw customer attributes for one prediction request.
///
/// Values are expected to be within the collector's bounds; nothing downstream
/// re-validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    // Engagement
    /// Months since signup
    pub tenure: u32,
    /// Average weekly hours on the app
    pub hour_spend_on_app: f64,
    /// Devices registered to the account
    pub number_of_device_registered: u32,
    /// Days since the most recent order
    pub day_since_last_order: u32,

    // Profile
    /// City tier
    pub city_tier: CityTier,
    /// Gender
    pub gender: Gender,
    /// Marital status
    pub marital_status: MaritalStatus,

    // Behavior
    /// Preferred login device
    pub preferred_login_device: LoginDevice,
    /// Preferred payment mode
    pub preferred_payment_mode: PaymentMode,
    /// Preferred order category
    pub preferred_order_cat: OrderCategory,
    /// Warehouse to home distance (km)
    pub warehouse_to_home: f64,
    /// Addresses on file
    pub number_of_address: u32,

    // Transactions and feedback
    /// Orders placed last month
    pub order_count: u32,
    /// Order amount increase from last year (%)
    pub order_amount_hike: f64,
    /// Coupons used last month
    pub coupon_used: u32,
    /// Cashback received last month
    pub cashback_amount: u32,
    /// Satisfaction score, 1 (low) to 5 (high)
    pub satisfaction_score: u8,
    /// Complaint filed last month
    pub complain: bool,
}

impl Default for CustomerRecord {
    fn default() -> Self {
        Self {
            tenure: 12,
            hour_spend_on_app: 1.0,
            number_of_device_registered: 2,
            day_since_last_order: 10,
            city_tier: CityTier::default(),
            gender: Gender::default(),
            marital_status: MaritalStatus::default(),
            preferred_login_device: LoginDevice::default(),
            preferred_payment_mode: PaymentMode::default(),
            preferred_order_cat: OrderCategory::default(),
            warehouse_to_home: 10.0,
            number_of_address: 1,
            order_count: 1,
            order_amount_hike: 10.0,
            coupon_used: 0,
            cashback_amount: 0,
            satisfaction_score: 3,
            complain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_labels_round_trip() {
        for mode in PaymentMode::ALL {
            assert_eq!(PaymentMode::from_label(mode.as_str()), Some(*mode));
        }
        assert_eq!(PaymentMode::from_label("Cash on Delivery"), Some(PaymentMode::CashOnDelivery));
        assert_eq!(PaymentMode::from_label("COD"), None);
        assert_eq!(OrderCategory::LABELS.len(), 5);
    }

    #[test]
    fn test_serde_uses_model_labels() {
        let json = serde_json::to_string(&OrderCategory::LaptopAndAccessory).unwrap();
        assert_eq!(json, "\"Laptop & Accessory\"");

        let tier: CityTier = serde_json::from_str("3").unwrap();
        assert_eq!(tier, CityTier::Tier3);
        assert!(serde_json::from_str::<CityTier>("4").is_err());
    }

    #[test]
    fn test_default_record() {
        let record = CustomerRecord::default();
        assert_eq!(record.tenure, 12);
        assert_eq!(record.city_tier.number(), 1);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.preferred_login_device.as_str(), "Mobile Phone");
        assert!(!record.complain);
    }
}
