//! Shared data structures for pump condition-based maintenance
//!
//! This module defines the core types for the diagnosis pipeline:
//! - Input: MeasurementSnapshot (one inspection round)
//! - Evaluators: DomainReport with typed ReportDetail metrics
//! - Resolver: DiagnosisResult (root-cause domain and secondary notes)
//! - Advisory: ActionPlan (risk score and prioritized actions)

mod snapshot;
mod report;
mod diagnosis;
mod action;

pub use snapshot::*;
pub use report::*;
pub use diagnosis::*;
pub use action::*;
