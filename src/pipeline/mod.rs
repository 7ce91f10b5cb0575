//! Diagnosis Pipeline Module
//!
//! ## One-way flow per snapshot
//!
//! ```text
//! STAGE 1: Domain evaluators (hydraulic, electrical, mechanical, thermal)
//! STAGE 2: Spectral fault matcher (only when FFT peaks are supplied)
//! STAGE 3: Causal priority resolver
//! STAGE 4: Risk & action synthesizer
//! STAGE 5: Executive summary
//! ```
//!
//! No stage feeds back into an earlier one, and nothing is retained between runs.

mod engine;

pub use engine::{DiagnosisEngine, DiagnosisReport};
