//! Domain-specific maintenance actions
//!
//! One builder per primary domain. Each returns its actions in emission order;
//! the plan sorts them by priority afterwards (stable, so ties keep this order).

use crate::config::defaults::{
    REF_ALIGNMENT, REF_ASSET_MANAGEMENT, REF_BALANCING, REF_BEARING_DAMAGE, REF_BEARING_TEMPERATURE,
    REF_ELECTRICAL, REF_INSULATION, REF_NPSH, REF_OPERATING_REGION, REF_POWER_OFF_TEST,
    REF_SEAL_MONITORING, REF_SPECTRAL, REF_VIBRATION_DIAGNOSIS, REF_VIBRATION_ZONES,
};
use crate::config::{ProductProperties, PumpConfig};
use crate::types::{
    ActionItem, ActionPriority, CavitationState, DiagnosisResult, Domain, DomainReport, DomainStatus,
    FaultHypothesis, Grade, IsoZone, MeasurementSnapshot, ResponsibleParty, SlipStatus, Timeline,
};

pub const ASSET_REGISTER_ACTION: &str = "Update asset register & schedule follow-up inspection";
pub const ROUTINE_MONITORING_ACTION: &str = "Continue routine monitoring";

/// Coast-down procedure separating electrical from mechanical unbalance.
pub const POWER_OFF_PROCEDURE: &str = "1. Measure vibration while motor running\n\
2. Shut down motor safely\n\
3. Measure vibration during coast-down (2-3 min)\n\
4. Interpret:\n\
   - Gradual decay with RPM: MECHANICAL unbalance\n\
   - Immediate drop to <1.0 mm/s: ELECTRICAL unbalance\n\
   - Persists after shutdown: bearing defect/looseness";

pub fn routine_monitoring() -> ActionItem {
    ActionItem::new(
        ActionPriority::Routine,
        ROUTINE_MONITORING_ACTION,
        Timeline::NextScheduledInspection,
        ResponsibleParty::MaintenanceTeam,
        REF_ASSET_MANAGEMENT,
    )
}

pub fn asset_register_update() -> ActionItem {
    ActionItem::new(
        ActionPriority::Routine,
        ASSET_REGISTER_ACTION,
        Timeline::AfterCompletion,
        ResponsibleParty::ReliabilityEngineer,
        REF_ASSET_MANAGEMENT,
    )
}

/// Actions for the primary domain of `diagnosis`. Empty for NORMAL.
pub fn domain_actions(
    diagnosis: &DiagnosisResult,
    analyses: &[DomainReport],
    snapshot: &MeasurementSnapshot,
    config: &PumpConfig,
) -> Vec<ActionItem> {
    let Some(report) = diagnosis.primary_report.as_ref() else {
        return Vec::new();
    };
    match report.domain() {
        Domain::Hydraulic => hydraulic_actions(report, snapshot, config),
        Domain::Electrical => electrical_actions(report),
        Domain::Mechanical => mechanical_actions(diagnosis, analyses),
        Domain::Thermal => thermal_actions(report),
    }
}

// ============================================================================
// Hydraulic
// ============================================================================

fn hydraulic_actions(report: &DomainReport, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> Vec<ActionItem> {
    let Some(h) = report.as_hydraulic() else {
        return Vec::new();
    };
    let product_type = snapshot.specification.product_type;
    let product: &ProductProperties = config.product(product_type);
    let margin = config.thresholds.hydraulic.npsh_safety_margin_m;
    let mut actions = Vec::new();

    let confirmed = h.cavitation == CavitationState::Confirmed;
    if confirmed {
        if product.volatile {
            actions.push(ActionItem::new(
                ActionPriority::Critical,
                format!("VOLATILE PRODUCT ({product_type}): Monitor seal temperature continuously - risk of seal failure"),
                Timeline::Continuous,
                ResponsibleParty::OperationsTeam,
                REF_SEAL_MONITORING,
            ));
        }
        actions.push(ActionItem::new(
            ActionPriority::Immediate,
            format!(
                "Increase suction pressure or tank level to achieve NPSHa > {:.1} m",
                h.npshr_m + margin
            ),
            Timeline::WithinHours(if product.volatile { 4 } else { 24 }),
            ResponsibleParty::OperationsTeam,
            REF_NPSH,
        ));
        actions.push(ActionItem::new(
            ActionPriority::High,
            "MANDATORY RE-MEASURE: Re-measure vibration after hydraulic correction before mechanical intervention",
            Timeline::BetweenHours(24, 48),
            ResponsibleParty::VibrationAnalyst,
            REF_POWER_OFF_TEST,
        ));
    }

    if h.flow_issue() {
        let th = &config.thresholds.hydraulic;
        actions.push(ActionItem::new(
            ActionPriority::High,
            format!(
                "Adjust flow to {:.0}-{:.0}% BEP ({:.0} - {:.0} m³/h)",
                th.flow_ratio_min * 100.0,
                th.flow_ratio_max * 100.0,
                th.flow_ratio_min * h.bep_flow_m3h,
                th.flow_ratio_max * h.bep_flow_m3h
            ),
            Timeline::WithinHours(24),
            ResponsibleParty::OperationsTeam,
            REF_OPERATING_REGION,
        ));
        if !confirmed {
            actions.push(ActionItem::new(
                ActionPriority::Medium,
                "MANDATORY RE-MEASURE: Re-measure vibration after flow adjustment",
                Timeline::WithinDays(7),
                ResponsibleParty::VibrationAnalyst,
                REF_POWER_OFF_TEST,
            ));
        }
    }

    if matches!(h.cavitation, CavitationState::Suspected | CavitationState::Potential) {
        actions.push(ActionItem::new(
            ActionPriority::Medium,
            format!(
                "Verify suction conditions (strainer, tank level, suction valve) - NPSHa margin {:.2} m, HF max {:.2} g",
                h.npsh_margin_m,
                h.hf.max()
            ),
            Timeline::WithinDays(7),
            ResponsibleParty::OperationsTeam,
            REF_NPSH,
        ));
    }

    actions
}

// ============================================================================
// Electrical
// ============================================================================

fn electrical_actions(report: &DomainReport) -> Vec<ActionItem> {
    let mut actions = Vec::new();
    match report.status {
        DomainStatus::Critical => {
            actions.push(ActionItem::new(
                ActionPriority::Immediate,
                "Shut down motor - electrical imbalance or overload detected",
                Timeline::WithinHours(2),
                ResponsibleParty::ElectricalTeam,
                REF_ELECTRICAL,
            ));
            actions.push(ActionItem::new(
                ActionPriority::High,
                "Check power supply quality & motor winding",
                Timeline::WithinHours(24),
                ResponsibleParty::ElectricalTeam,
                REF_INSULATION,
            ));
        }
        DomainStatus::Warning | DomainStatus::Alarm | DomainStatus::Abnormal => {
            actions.push(ActionItem::new(
                ActionPriority::High,
                "Investigate voltage/current imbalance or slip abnormality",
                Timeline::WithinHours(72),
                ResponsibleParty::ElectricalTeam,
                REF_ELECTRICAL,
            ));
            actions.push(ActionItem::new(
                ActionPriority::Medium,
                "MANDATORY RE-MEASURE: Re-measure vibration after electrical correction",
                Timeline::WithinDays(7),
                ResponsibleParty::VibrationAnalyst,
                REF_ELECTRICAL,
            ));
        }
        DomainStatus::Normal | DomainStatus::Invalid => {}
    }

    if report
        .as_electrical()
        .is_some_and(|e| e.slip.status == SlipStatus::Abnormal)
    {
        actions.push(ActionItem::new(
            ActionPriority::High,
            "Actual RPM above rated: verify tachometer calibration, check discharge check valve for backflow and grid frequency",
            Timeline::WithinHours(24),
            ResponsibleParty::VibrationAnalyst,
            REF_ELECTRICAL,
        ));
    }

    actions
}

// ============================================================================
// Mechanical
// ============================================================================

fn correction_standard(fault: FaultHypothesis) -> &'static str {
    match fault {
        FaultHypothesis::Misalignment | FaultHypothesis::UnbalanceWithMisalignment => REF_ALIGNMENT,
        FaultHypothesis::Unbalance => REF_BALANCING,
        _ => REF_VIBRATION_DIAGNOSIS,
    }
}

fn mechanical_actions(diagnosis: &DiagnosisResult, analyses: &[DomainReport]) -> Vec<ActionItem> {
    let mut actions = Vec::new();

    if diagnosis.requires_validation {
        actions.push(
            ActionItem::new(
                ActionPriority::Medium,
                "POWER-OFF TEST REQUIRED: Differentiate electrical vs mechanical unbalance",
                Timeline::BeforeMechanicalRepair,
                ResponsibleParty::VibrationAnalyst,
                REF_POWER_OFF_TEST,
            )
            .with_validation(POWER_OFF_PROCEDURE),
        );
    }

    let spectral = diagnosis
        .issues_in(Domain::Mechanical)
        .find_map(DomainReport::as_spectral);

    if let Some(analysis) = spectral {
        let mut significant: Vec<_> = analysis
            .findings
            .iter()
            .filter(|f| f.confidence >= Grade::Medium)
            .collect();
        significant.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        for f in significant {
            let high = f.confidence == Grade::High;
            actions.push(ActionItem::new(
                if high { ActionPriority::High } else { ActionPriority::Medium },
                format!(
                    "FFT peak {:.1} Hz ({:.2}x RPM) on {}: {} - {} ({})",
                    f.frequency_hz,
                    f.ratio,
                    f.component,
                    f.hypothesis.signature(),
                    f.hypothesis,
                    f.hypothesis.likely_cause()
                ),
                Timeline::WithinDays(if high { 7 } else { 14 }),
                ResponsibleParty::VibrationAnalyst,
                REF_SPECTRAL,
            ));
        }
    }

    let vibration = analyses.iter().find_map(DomainReport::as_mechanical);

    if spectral.is_none() {
        if let Some((v, fault)) = vibration.and_then(|v| v.fault.map(|f| (v, f))) {
            let name = fault.to_string().to_lowercase();
            match v.overall_zone {
                IsoZone::D => {
                    actions.push(ActionItem::new(
                        ActionPriority::Immediate,
                        format!("Schedule shutdown - {name} detected ({})", fault.likely_cause()),
                        Timeline::WithinHours(72),
                        ResponsibleParty::MaintenanceTeam,
                        format!("{REF_VIBRATION_ZONES} Zone D"),
                    ));
                    actions.push(ActionItem::new(
                        ActionPriority::High,
                        format!("Perform {name} correction"),
                        Timeline::WithinDays(7),
                        ResponsibleParty::MaintenanceTeam,
                        correction_standard(fault),
                    ));
                }
                IsoZone::C => actions.push(ActionItem::new(
                    ActionPriority::High,
                    format!("Schedule {name} correction"),
                    Timeline::WithinDays(14),
                    ResponsibleParty::MaintenanceTeam,
                    format!("{REF_VIBRATION_ZONES} Zone C"),
                )),
                IsoZone::A | IsoZone::B => actions.push(ActionItem::new(
                    ActionPriority::Medium,
                    format!("Trend vibration and plan {name} check at next opportunity"),
                    Timeline::WithinDays(30),
                    ResponsibleParty::VibrationAnalyst,
                    REF_VIBRATION_DIAGNOSIS,
                )),
            }
        }
    }

    if let Some(v) = vibration.filter(|v| v.bearing_defect_risk >= Grade::Medium) {
        actions.push(ActionItem::new(
            ActionPriority::High,
            format!(
                "Inspect bearings - demodulation {:.2} g indicates {} defect risk",
                v.demod_max_g, v.bearing_defect_risk
            ),
            Timeline::WithinDays(7),
            ResponsibleParty::MaintenanceTeam,
            REF_BEARING_DAMAGE,
        ));
    }

    actions
}

// ============================================================================
// Thermal
// ============================================================================

fn thermal_actions(report: &DomainReport) -> Vec<ActionItem> {
    match report.status {
        DomainStatus::Critical => vec![
            ActionItem::new(
                ActionPriority::Immediate,
                "Shut down pump - bearing seizure imminent",
                Timeline::WithinHours(2),
                ResponsibleParty::OperationsTeam,
                REF_BEARING_TEMPERATURE,
            ),
            ActionItem::new(
                ActionPriority::High,
                "Inspect & replace bearing if necessary",
                Timeline::WithinHours(24),
                ResponsibleParty::MaintenanceTeam,
                REF_BEARING_DAMAGE,
            ),
        ],
        DomainStatus::Alarm | DomainStatus::Warning => vec![ActionItem::new(
            ActionPriority::High,
            "Check bearing lubrication & cooling",
            Timeline::WithinHours(72),
            ResponsibleParty::MaintenanceTeam,
            REF_BEARING_TEMPERATURE,
        )],
        _ => Vec::new(),
    }
}
