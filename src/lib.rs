//! Pump CBM: condition-based maintenance diagnosis for centrifugal pumps
//!
//! Fuses one snapshot of hydraulic, electrical, vibration, thermal and
//! (optionally) FFT measurements into a single root-cause diagnosis and a
//! scored, prioritised maintenance plan.
//!
//! ## Architecture
//!
//! - **Evaluators**: four independent domain evaluators, one report each
//! - **Spectral matcher**: FFT peaks to shaft-order fault hypotheses
//! - **Causal resolver**: fixed precedence HYDRAULIC > ELECTRICAL > MECHANICAL > THERMAL
//! - **Advisory**: risk score, ordered actions and executive summary
//! - **Report**: flattened audit table with CSV export
//!
//! ## Example
//!
//! ```no_run
//! use pump_cbm::{DiagnosisEngine, MeasurementSnapshot, PumpConfig};
//!
//! let engine = DiagnosisEngine::new(PumpConfig::load());
//! let report = engine.diagnose(&MeasurementSnapshot::default());
//! println!("{}", report.summary.headline);
//! ```

pub mod config;
pub mod types;
pub mod physics_engine;
pub mod evaluators;
pub mod spectral;
pub mod causal;
pub mod advisory;
pub mod pipeline;
pub mod report;

// Re-export configuration
pub use config::{ConfigError, PumpConfig};

// Re-export commonly used types
pub use types::{
    ActionItem, ActionPlan, ActionPriority, DiagnosisResult, Domain, DomainReport, DomainStatus,
    MeasurementSnapshot, PrimaryDomain, RiskLevel,
};

// Re-export the pipeline
pub use advisory::DiagnosisSummary;
pub use pipeline::{DiagnosisEngine, DiagnosisReport};
pub use report::{audit_rows, render_csv, AuditRow, ReportError};
