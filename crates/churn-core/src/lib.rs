//! Churn Core - Customer Records and Feature Derivation
//!
//! Everything that happens to a customer record before it reaches the model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CHURN CORE                                     │
//! │                                                                         │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────────┐  │
//! │  │   Collector  │───▶│   Deriver    │───▶│        Row Schema        │  │
//! │  │ clamp | enum │    │ 4 engineered │    │ 22 named model columns   │  │
//! │  │   defaults   │    │   features   │    │   in training order      │  │
//! │  └──────────────┘    └──────────────┘    └──────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod collector;
pub mod error;
pub mod features;
pub mod record;
pub mod schema;

pub use collector::{CustomerForm, FieldKind, FieldSpec, Flag, Section, FIELDS};
pub use error::CollectError;
pub use features::{derive, DerivedFeatureSet, TenureGroup};
pub use record::{CityTier, CustomerRecord, Gender, LoginDevice, MaritalStatus, OrderCategory, PaymentMode};
pub use schema::{ColumnKind, ColumnSpec, FeatureRow, FeatureValue, FEATURE_COLUMNS, FEATURE_COUNT};
