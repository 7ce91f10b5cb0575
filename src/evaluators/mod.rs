//! Domain evaluators for pump condition-based diagnosis
//!
//! Each evaluator reads one immutable snapshot and produces a `DomainReport`
//! for its domain. Evaluators are pure: no shared state, no I/O.
//!
//! ## Evaluators
//!
//! 1. **Hydraulic** - NPSHa margin, BEP flow ratio, HF cavitation band
//! 2. **Electrical** - Voltage/current imbalance, motor load, slip
//! 3. **Mechanical** - ISO 10816-3 zones, fault attribution, demodulation
//! 4. **Thermal** - Bearing temperature and rise, seal override
//!
//! The spectral fault matcher lives in `crate::spectral` and reports under
//! the mechanical domain.

pub mod hydraulic;
pub mod electrical;
pub mod mechanical;
pub mod thermal;

pub use hydraulic::HydraulicEvaluator;
pub use electrical::ElectricalEvaluator;
pub use mechanical::MechanicalEvaluator;
pub use thermal::ThermalEvaluator;

use crate::config::PumpConfig;
use crate::types::{Domain, DomainReport, MeasurementSnapshot};

/// Trait for domain evaluators
pub trait DomainEvaluator: Send + Sync {
    /// Evaluator name (e.g., "Hydraulic", "Electrical")
    fn name(&self) -> &str;

    /// Domain this evaluator reports under
    fn domain(&self) -> Domain;

    /// Evaluate the snapshot. Never fails: unusable inputs yield an INVALID report.
    fn evaluate(&self, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> DomainReport;
}

/// Create the default set of 4 evaluators, in causal precedence order
pub fn default_evaluators() -> Vec<Box<dyn DomainEvaluator>> {
    vec![
        Box::new(HydraulicEvaluator),
        Box::new(ElectricalEvaluator),
        Box::new(MechanicalEvaluator),
        Box::new(ThermalEvaluator),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_evaluators_follow_precedence() {
        let domains: Vec<Domain> = default_evaluators().iter().map(|e| e.domain()).collect();
        assert_eq!(domains, Domain::PRECEDENCE.to_vec());
    }

    #[test]
    fn test_reports_carry_their_domain() {
        let snapshot = MeasurementSnapshot::default();
        let config = PumpConfig::default();
        for evaluator in default_evaluators() {
            let report = evaluator.evaluate(&snapshot, &config);
            assert_eq!(report.domain(), evaluator.domain(), "{}", evaluator.name());
        }
    }
}
