//! Diagnosis engine: evaluators → spectral matcher → resolver → synthesizer.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisory::{summarize, synthesize, DiagnosisSummary};
use crate::causal::resolve;
use crate::config::PumpConfig;
use crate::evaluators::{default_evaluators, DomainEvaluator};
use crate::types::{ActionPlan, DiagnosisResult, DomainReport, MeasurementSnapshot};

/// Everything produced for one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisReport {
    /// Evaluator reports in precedence order, spectral (when present) last
    pub analyses: Vec<DomainReport>,
    pub diagnosis: DiagnosisResult,
    pub action_plan: ActionPlan,
    pub summary: DiagnosisSummary,
}

impl DiagnosisReport {
    pub fn spectral(&self) -> Option<&DomainReport> {
        self.analyses.iter().find(|r| r.is_spectral())
    }
}

/// Stateless diagnosis engine. Safe to share across threads; every call is
/// independent and returns identical output for identical input.
pub struct DiagnosisEngine {
    config: PumpConfig,
    evaluators: Vec<Box<dyn DomainEvaluator>>,
}

impl DiagnosisEngine {
    pub fn new(config: PumpConfig) -> Self {
        Self { config, evaluators: default_evaluators() }
    }

    pub const fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Run the full one-way diagnosis for one snapshot. Never fails.
    pub fn diagnose(&self, snapshot: &MeasurementSnapshot) -> DiagnosisReport {
        let mut analyses: Vec<DomainReport> = self
            .evaluators
            .iter()
            .map(|e| e.evaluate(snapshot, &self.config))
            .collect();
        analyses.extend(crate::spectral::evaluate(snapshot, &self.config));

        let diagnosis = resolve(&analyses, &self.config);
        let action_plan = synthesize(&diagnosis, &analyses, snapshot, &self.config);
        let summary = summarize(&diagnosis, &action_plan);

        info!(
            pump_tag = %snapshot.metadata.pump_tag,
            primary = %diagnosis.primary_domain,
            issues = diagnosis.all_issues.len(),
            requires_validation = diagnosis.requires_validation,
            risk_score = action_plan.risk_score,
            risk_level = %action_plan.risk_level,
            actions = action_plan.actions.len(),
            "Diagnosis complete"
        );

        DiagnosisReport { analyses, diagnosis, action_plan, summary }
    }
}

impl Default for DiagnosisEngine {
    fn default() -> Self {
        Self::new(PumpConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, PrimaryDomain};

    #[test]
    fn test_default_snapshot_runs_without_panicking() {
        let report = DiagnosisEngine::default().diagnose(&MeasurementSnapshot::default());
        // Zero currents make the electrical report INVALID; zero flow is recirculation
        assert_eq!(report.analyses.len(), 4);
        assert_eq!(report.analyses[1].status, crate::types::DomainStatus::Invalid);
        assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Hydraulic);
        assert_eq!(report.action_plan.risk_score, 9);
        assert!(report.spectral().is_none());
    }

    #[test]
    fn test_analyses_follow_precedence() {
        let report = DiagnosisEngine::default().diagnose(&MeasurementSnapshot::default());
        let domains: Vec<Domain> = report.analyses.iter().map(DomainReport::domain).collect();
        assert_eq!(domains, Domain::PRECEDENCE.to_vec());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let engine = DiagnosisEngine::default();
        let mut snapshot = MeasurementSnapshot::default();
        snapshot.electrical.currents_a = [28.0, 30.0, 27.0];
        snapshot.actual_rpm = Some(2700.0);
        let a = serde_json::to_string(&engine.diagnose(&snapshot)).unwrap();
        let b = serde_json::to_string(&engine.diagnose(&snapshot)).unwrap();
        assert_eq!(a, b);
    }
}
