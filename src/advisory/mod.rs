//! Risk & Action Synthesizer
//!
//! Turns a resolved diagnosis into a scored, prioritised maintenance plan.
//!
//! ## Flow
//!
//! 1. NORMAL ⇒ risk 0, LOW, single ROUTINE monitoring action.
//! 2. Otherwise score = product factor × primary-domain multiplier × age factor,
//!    clamped to `max_score`.
//! 3. Collect the primary domain's actions, stable-sort by priority, then
//!    append the ROUTINE asset-register action once when the score is positive.
//! 4. Risk level follows the most urgent action.
//! 5. Stamp `due_by` on every action when the inspection date is known.

pub mod actions;
pub mod risk;
pub mod summary;

pub use actions::{ASSET_REGISTER_ACTION, POWER_OFF_PROCEDURE, ROUTINE_MONITORING_ACTION};
pub use risk::{age_factor, installation_age, risk_score, severity_multiplier};
pub use summary::{summarize, DiagnosisSummary};

use tracing::debug;

use crate::config::PumpConfig;
use crate::types::{ActionPlan, DiagnosisResult, DomainReport, MeasurementSnapshot, RiskLevel};

/// Build the action plan for a resolved diagnosis.
///
/// `analyses` holds every evaluator report for the snapshot (spectral included).
pub fn synthesize(
    diagnosis: &DiagnosisResult,
    analyses: &[DomainReport],
    snapshot: &MeasurementSnapshot,
    config: &PumpConfig,
) -> ActionPlan {
    let age_years = installation_age(snapshot, config);
    let age_factor = age_factor(age_years, &config.risk);

    if diagnosis.is_normal() {
        let mut plan = ActionPlan {
            risk_score: 0,
            risk_level: RiskLevel::Low,
            age_years,
            age_factor,
            actions: vec![actions::routine_monitoring()],
        };
        stamp_due_dates(&mut plan, snapshot);
        return plan;
    }

    let product = config.product(snapshot.specification.product_type);
    let multiplier = severity_multiplier(diagnosis, analyses, &config.risk);
    let risk_score = risk_score(product.risk_factor, multiplier, age_factor, config.risk.max_score);

    let mut items = actions::domain_actions(diagnosis, analyses, snapshot, config);
    items.sort_by_key(|a| a.priority);
    if risk_score > 0 && !items.iter().any(|a| a.description == ASSET_REGISTER_ACTION) {
        items.push(actions::asset_register_update());
    }

    let risk_level = items
        .first()
        .map_or(RiskLevel::Low, |a| RiskLevel::from_priority(a.priority));

    debug!(
        risk_factor = product.risk_factor,
        multiplier = multiplier,
        age_factor = age_factor,
        risk_score = risk_score,
        actions = items.len(),
        "Action plan synthesized"
    );

    let mut plan = ActionPlan { risk_score, risk_level, age_years, age_factor, actions: items };
    stamp_due_dates(&mut plan, snapshot);
    plan
}

fn stamp_due_dates(plan: &mut ActionPlan, snapshot: &MeasurementSnapshot) {
    if let Some(date) = snapshot.metadata.inspection_date {
        for action in &mut plan.actions {
            action.due_by = action.timeline.due_date(date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::causal::resolve;
    use crate::evaluators::default_evaluators;
    use crate::types::{ActionPriority, AxisReading, ProductType, Timeline};
    use chrono::NaiveDate;

    fn plan_for(snapshot: &MeasurementSnapshot) -> (DiagnosisResult, ActionPlan) {
        let config = PumpConfig::default();
        let mut analyses: Vec<DomainReport> =
            default_evaluators().iter().map(|e| e.evaluate(snapshot, &config)).collect();
        analyses.extend(crate::spectral::evaluate(snapshot, &config));
        let diagnosis = resolve(&analyses, &config);
        let plan = synthesize(&diagnosis, &analyses, snapshot, &config);
        (diagnosis, plan)
    }

    fn healthy() -> MeasurementSnapshot {
        let mut s = MeasurementSnapshot::default();
        s.electrical.currents_a = [28.0; 3];
        s.operational.suction_pressure_kpa = 150.0;
        s.operational.discharge_pressure_kpa = 600.0;
        s.operational.flow_rate_m3h = 100.0;
        s
    }

    #[test]
    fn test_normal_plan_is_single_routine_action() {
        let (diagnosis, plan) = plan_for(&healthy());
        assert!(diagnosis.is_normal());
        assert_eq!(plan.risk_score, 0);
        assert_eq!(plan.risk_level, RiskLevel::Low);
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].description, ROUTINE_MONITORING_ACTION);
    }

    #[test]
    fn test_confirmed_cavitation_on_gasoline() {
        let mut s = healthy();
        s.specification.product_type = ProductType::Gasoline;
        s.operational.suction_pressure_kpa = -40.0;
        s.vibration.driven.hf_de_g = 0.45;
        let (diagnosis, plan) = plan_for(&s);

        // Gasoline 5 × confirmed 5 × age 1.0 (2026 − 2018 = 8 years)
        assert_eq!(plan.risk_score, 25);
        assert_eq!(plan.risk_level, RiskLevel::Critical);
        assert!(diagnosis.secondary_note.is_some());
        let priorities: Vec<_> = plan.actions.iter().map(|a| a.priority).collect();
        assert_eq!(
            priorities,
            vec![ActionPriority::Critical, ActionPriority::Immediate, ActionPriority::High, ActionPriority::Routine]
        );
        assert_eq!(plan.actions[1].timeline, Timeline::WithinHours(4));
        assert!(plan.actions[1].description.contains("5.5 m"));
    }

    #[test]
    fn test_zone_d_with_clean_electrical_requires_power_off_test() {
        let mut s = healthy();
        s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
        let (diagnosis, plan) = plan_for(&s);
        assert!(diagnosis.requires_validation);
        // Diesel 3 × zone D 4
        assert_eq!(plan.risk_score, 12);
        assert_eq!(plan.actions[0].priority, ActionPriority::Immediate);
        let power_off = plan
            .actions
            .iter()
            .find(|a| a.timeline == Timeline::BeforeMechanicalRepair)
            .unwrap();
        assert!(power_off.validation_procedure.as_ref().unwrap().contains("coast-down"));
        assert_eq!(plan.actions.last().unwrap().description, ASSET_REGISTER_ACTION);
    }

    #[test]
    fn test_asset_register_action_never_duplicated() {
        let mut s = healthy();
        s.thermal.pump_de_c = Some(99.0);
        let (_, plan) = plan_for(&s);
        let count = plan.actions.iter().filter(|a| a.description == ASSET_REGISTER_ACTION).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_old_pump_scores_higher() {
        let mut s = healthy();
        s.thermal.pump_de_c = Some(99.0);
        let (_, new_plan) = plan_for(&s);
        s.specification.installation_year = 2005;
        let (_, old_plan) = plan_for(&s);
        assert_eq!(new_plan.risk_score, 12);
        assert_eq!(old_plan.risk_score, 18);
        assert!(old_plan.age_factor > new_plan.age_factor);
    }

    #[test]
    fn test_due_dates_follow_inspection_date() {
        let mut s = healthy();
        s.thermal.pump_de_c = Some(99.0);
        s.metadata.inspection_date = NaiveDate::from_ymd_opt(2026, 3, 10);
        let (_, plan) = plan_for(&s);
        assert_eq!(plan.actions[0].due_by, NaiveDate::from_ymd_opt(2026, 3, 11));
        assert_eq!(plan.actions.last().unwrap().due_by, None);
    }
}
