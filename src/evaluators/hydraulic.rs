//! Hydraulic Evaluator - NPSHa margin, BEP flow ratio, HF cavitation band
//!
//! ## Algorithm
//!
//! 1. NPSHa from suction pressure and product properties; margin against
//!    NPSHr plus the safety margin.
//! 2. HF (5–16 kHz) maximum across the four bearing locations against the
//!    product's cavitation threshold.
//! 3. Fuse: HF high AND margin thin ⇒ confirmed; HF high alone ⇒ suspected;
//!    negative margin alone ⇒ potential.
//! 4. Flow ratio outside the BEP window flags recirculation or overload
//!    independently. It never raises the cavitation state.

use tracing::debug;

use super::DomainEvaluator;
use crate::config::defaults::{REF_NPSH, REF_OPERATING_REGION, REF_SEAL_MONITORING};
use crate::config::PumpConfig;
use crate::physics_engine::{
    calculate_differential_head, calculate_flow_ratio, calculate_npsha, classify_flow, round_to,
};
use crate::types::{
    CavitationState, Domain, DomainReport, DomainStatus, FlowStatus, HfReadings, HydraulicMetrics,
    MeasurementSnapshot, ProductType, PumpSize, ReportDetail,
};

/// Everything the hydraulic evaluator reads from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HydraulicInput {
    pub suction_kpa: f64,
    pub discharge_kpa: f64,
    pub flow_m3h: f64,
    pub product: ProductType,
    pub pump_size: PumpSize,
    pub hf: HfReadings,
}

impl HydraulicInput {
    pub fn from_snapshot(snapshot: &MeasurementSnapshot) -> Self {
        let v = &snapshot.vibration;
        Self {
            suction_kpa: snapshot.operational.suction_pressure_kpa,
            discharge_kpa: snapshot.operational.discharge_pressure_kpa,
            flow_m3h: snapshot.operational.flow_rate_m3h,
            product: snapshot.specification.product_type,
            pump_size: snapshot.specification.pump_size,
            hf: HfReadings {
                motor_de_g: v.driver.hf_de_g,
                motor_nde_g: v.driver.hf_nde_g,
                pump_de_g: v.driven.hf_de_g,
                pump_nde_g: v.driven.hf_nde_g,
            },
        }
    }
}

pub struct HydraulicEvaluator;

impl DomainEvaluator for HydraulicEvaluator {
    fn name(&self) -> &str {
        "Hydraulic"
    }

    fn domain(&self) -> Domain {
        Domain::Hydraulic
    }

    fn evaluate(&self, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> DomainReport {
        evaluate(&HydraulicInput::from_snapshot(snapshot), config)
    }
}

/// Evaluate hydraulic condition (API 610 §6.3.3, Annex L).
pub fn evaluate(input: &HydraulicInput, config: &PumpConfig) -> DomainReport {
    let th = &config.thresholds.hydraulic;
    let product = config.product(input.product);
    let size = config.pump_size(input.pump_size);
    let standard_ref = format!("{REF_NPSH}, {REF_SEAL_MONITORING}");

    let (Some(npsha), Some(head), Some(flow_ratio)) = (
        calculate_npsha(input.suction_kpa, product.vapor_pressure_kpa, product.density_kg_m3, th),
        calculate_differential_head(input.discharge_kpa, input.suction_kpa, product.density_kg_m3, th),
        calculate_flow_ratio(input.flow_m3h, size.bep_flow_m3h),
    ) else {
        return invalid_report(input, config, standard_ref);
    };

    let npsh_margin = npsha - (size.npshr_m + th.npsh_safety_margin_m);
    let hf_max = input.hf.max();
    let hf_high = hf_max > product.hf_cavitation_threshold_g;

    let cavitation = if hf_high && npsh_margin < th.confirmed_cavitation_margin_m {
        CavitationState::Confirmed
    } else if hf_high {
        CavitationState::Suspected
    } else if npsh_margin < 0.0 {
        CavitationState::Potential
    } else {
        CavitationState::None
    };

    let flow_status = classify_flow(flow_ratio, th);

    let mut findings = Vec::new();
    match cavitation {
        CavitationState::Confirmed => findings.push(format!(
            "CONFIRMED CAVITATION: HF {hf_max:.2} g > {:.2} g with NPSHa margin {npsh_margin:.2} m",
            product.hf_cavitation_threshold_g
        )),
        CavitationState::Suspected => findings.push(format!(
            "SUSPECTED CAVITATION: HF {hf_max:.2} g > {:.2} g, NPSHa margin {npsh_margin:.2} m adequate - verify suction conditions",
            product.hf_cavitation_threshold_g
        )),
        CavitationState::Potential => findings.push(format!(
            "Low NPSHa margin ({npsh_margin:.2} m): NPSHa {npsha:.2} m vs NPSHr {:.1} m + {:.1} m safety margin",
            size.npshr_m, th.npsh_safety_margin_m
        )),
        CavitationState::None => {}
    }
    match flow_status {
        FlowStatus::RecirculationRisk => findings.push(format!(
            "Flow {:.0}% of BEP < {:.0}% - risk of recirculation and vibration ({REF_OPERATING_REGION})",
            flow_ratio * 100.0,
            th.flow_ratio_min * 100.0
        )),
        FlowStatus::OverloadCavitationRisk => findings.push(format!(
            "Flow {:.0}% of BEP > {:.0}% - risk of cavitation and overload ({REF_OPERATING_REGION})",
            flow_ratio * 100.0,
            th.flow_ratio_max * 100.0
        )),
        FlowStatus::Normal => {}
    }

    let flow_issue = flow_status != FlowStatus::Normal;
    let status = match cavitation {
        CavitationState::Confirmed => DomainStatus::Critical,
        CavitationState::Suspected | CavitationState::Potential => DomainStatus::Alarm,
        CavitationState::None if flow_issue => DomainStatus::Warning,
        CavitationState::None => DomainStatus::Normal,
    };
    let has_issue = cavitation != CavitationState::None || flow_issue;

    if !has_issue {
        findings.push(format!(
            "NPSHa adequate ({npsha:.2} m, margin {npsh_margin:.2} m), HF {hf_max:.2} g normal, flow {:.0}% of BEP",
            flow_ratio * 100.0
        ));
    }

    debug!(
        npsha = npsha,
        npsh_margin = npsh_margin,
        flow_ratio = flow_ratio,
        hf_max = hf_max,
        cavitation = ?cavitation,
        "Hydraulic evaluation"
    );

    DomainReport {
        status,
        has_issue,
        findings,
        standard_ref,
        detail: ReportDetail::Hydraulic(HydraulicMetrics {
            npsha_m: round_to(npsha, 2),
            npshr_m: size.npshr_m,
            npsh_margin_m: round_to(npsh_margin, 2),
            differential_head_m: round_to(head, 1),
            flow_rate_m3h: input.flow_m3h,
            bep_flow_m3h: size.bep_flow_m3h,
            flow_ratio: round_to(flow_ratio, 2),
            flow_status,
            hf: input.hf,
            hf_threshold_g: product.hf_cavitation_threshold_g,
            hf_high,
            cavitation,
            volatile_product: product.volatile,
        }),
    }
}

/// Non-positive density or BEP flow: nothing can be computed.
fn invalid_report(input: &HydraulicInput, config: &PumpConfig, standard_ref: String) -> DomainReport {
    let product = config.product(input.product);
    let size = config.pump_size(input.pump_size);
    DomainReport {
        status: DomainStatus::Invalid,
        has_issue: false,
        findings: vec![format!(
            "Hydraulic inputs invalid: density {:.0} kg/m³, BEP flow {:.0} m³/h",
            product.density_kg_m3, size.bep_flow_m3h
        )],
        standard_ref,
        detail: ReportDetail::Hydraulic(HydraulicMetrics {
            npsha_m: 0.0,
            npshr_m: size.npshr_m,
            npsh_margin_m: 0.0,
            differential_head_m: 0.0,
            flow_rate_m3h: input.flow_m3h,
            bep_flow_m3h: size.bep_flow_m3h,
            flow_ratio: 0.0,
            flow_status: FlowStatus::Normal,
            hf: input.hf,
            hf_threshold_g: product.hf_cavitation_threshold_g,
            hf_high: false,
            cavitation: CavitationState::None,
            volatile_product: product.volatile,
        }),
    }
}
