//! Physics Engine Module
//!
//! Deterministic calculations for centrifugal pump diagnosis.
//! All math here is closed-form engineering formulas - no ML involved.
//!
//! ## Hydraulic (API 610 §6.3.3, Annex L)
//! - `calculate_npsha()` - Net positive suction head available
//! - `calculate_differential_head()` - Pump head from pressures
//! - `calculate_flow_ratio()` / `classify_flow()` - Operating region vs BEP
//!
//! ## Electrical (IEC 60034-1 §4.2)
//! - `calculate_imbalance()` - Voltage/current three-phase imbalance
//! - `calculate_load_pct()` - Motor load vs FLA
//! - `calculate_slip()` / `classify_slip()` - Motor slip bands
//!
//! ## Vibration (ISO 10816-3)
//! - `classify_zone()` - Severity zone from RMS velocity

pub mod pump_models;

pub use pump_models::{
    calculate_differential_head, calculate_flow_ratio, calculate_imbalance, calculate_load_pct,
    calculate_npsha, calculate_slip, classify_flow, classify_imbalance, classify_load,
    classify_slip, classify_zone, round_to,
};
