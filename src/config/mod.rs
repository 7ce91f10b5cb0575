//! Pump Configuration Module
//!
//! Provides fleet configuration loaded from TOML files. Every threshold and
//! lookup table used by the diagnosis pipeline is operator-tunable.
//!
//! ## Loading Order
//!
//! 1. `PUMP_CBM_CONFIG` environment variable (path to TOML file)
//! 2. `pump_config.toml` in the current working directory
//! 3. Built-in defaults (standard-derived values)
//!
//! ## Usage
//!
//! The config is passed explicitly to the engine; there is no global.
//!
//! ```ignore
//! let config = PumpConfig::load();
//! let engine = DiagnosisEngine::new(config);
//! let report = engine.diagnose(&snapshot);
//! ```

mod pump_config;
pub mod defaults;
pub mod validation;

pub use pump_config::*;
