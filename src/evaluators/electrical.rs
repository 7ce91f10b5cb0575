//! Electrical Evaluator - supply imbalance, motor load, slip (IEC 60034-1 §4.2)
//!
//! ## Status
//!
//! | Condition | Status |
//! |---|---|
//! | voltage imbalance > 5 %, current imbalance > 10 %, load > 125 % | CRITICAL |
//! | any intermediate band, underload, high slip | WARNING |
//! | negative slip beyond tolerance (and nothing else) | ABNORMAL |
//! | zero voltage/current average or zero FLA | INVALID |
//!
//! ABNORMAL counts as an issue; INVALID does not and is excluded by the resolver.

use tracing::debug;

use super::DomainEvaluator;
use crate::config::defaults::REF_ELECTRICAL;
use crate::config::PumpConfig;
use crate::physics_engine::{
    calculate_imbalance, calculate_load_pct, calculate_slip, classify_imbalance, classify_load,
    classify_slip, round_to,
};
use crate::types::{
    Domain, DomainReport, DomainStatus, ElectricalMetrics, LoadStatus, MeasurementSnapshot,
    MetricStatus, PhaseImbalance, PumpSize, ReportDetail, SlipMetrics, SlipStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ElectricalInput {
    pub voltages_v: [f64; 3],
    pub currents_a: [f64; 3],
    pub pump_size: PumpSize,
    pub rated_rpm: f64,
    pub actual_rpm: Option<f64>,
}

impl ElectricalInput {
    pub fn from_snapshot(snapshot: &MeasurementSnapshot) -> Self {
        Self {
            voltages_v: snapshot.electrical.voltages_v,
            currents_a: snapshot.electrical.currents_a,
            pump_size: snapshot.specification.pump_size,
            rated_rpm: snapshot.specification.rated_rpm,
            actual_rpm: snapshot.actual_rpm,
        }
    }
}

pub struct ElectricalEvaluator;

impl DomainEvaluator for ElectricalEvaluator {
    fn name(&self) -> &str {
        "Electrical"
    }

    fn domain(&self) -> Domain {
        Domain::Electrical
    }

    fn evaluate(&self, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> DomainReport {
        evaluate(&ElectricalInput::from_snapshot(snapshot), config)
    }
}

pub fn evaluate(input: &ElectricalInput, config: &PumpConfig) -> DomainReport {
    let th = &config.thresholds.electrical;
    let fla = config.pump_size(input.pump_size).fla_a;

    let voltage = calculate_imbalance(input.voltages_v);
    let current = calculate_imbalance(input.currents_a);
    let load = current.and_then(|(avg, _)| calculate_load_pct(avg, fla));

    let voltage = phase_metrics(voltage, th.voltage_imbalance_warning_pct, th.voltage_imbalance_critical_pct);
    let current = phase_metrics(current, th.current_imbalance_warning_pct, th.current_imbalance_critical_pct);
    let (load_pct, load_status) = load.map_or((0.0, LoadStatus::Invalid), |pct| (pct, classify_load(pct, th)));
    let slip = slip_metrics(input, config);

    let mut findings = Vec::new();

    if voltage.status == MetricStatus::Invalid
        || current.status == MetricStatus::Invalid
        || load_status == LoadStatus::Invalid
    {
        findings.push(format!(
            "Electrical readings invalid: voltage avg {:.1} V, current avg {:.1} A, FLA {fla:.1} A - cannot evaluate",
            voltage.average, current.average
        ));
        return report(DomainStatus::Invalid, false, findings, voltage, current, fla, load_pct, load_status, slip);
    }

    let critical = voltage.status == MetricStatus::Alarm
        || current.status == MetricStatus::Alarm
        || load_status == LoadStatus::OverloadAlarm;
    let warning = voltage.status == MetricStatus::Warning
        || current.status == MetricStatus::Warning
        || matches!(load_status, LoadStatus::OverloadWarning | LoadStatus::Underload)
        || matches!(slip.status, SlipStatus::HighSlip | SlipStatus::CriticalOverload);

    let status = if critical {
        DomainStatus::Critical
    } else if warning {
        DomainStatus::Warning
    } else if slip.status == SlipStatus::Abnormal {
        DomainStatus::Abnormal
    } else {
        DomainStatus::Normal
    };

    if voltage.status != MetricStatus::Normal {
        findings.push(format!(
            "Voltage imbalance {:.1}% > {:.0}% - check power supply quality",
            voltage.imbalance_pct, th.voltage_imbalance_warning_pct
        ));
    }
    if current.status != MetricStatus::Normal {
        findings.push(format!(
            "Current imbalance {:.1}% > {:.0}% - check winding and connections",
            current.imbalance_pct, th.current_imbalance_warning_pct
        ));
    }
    match load_status {
        LoadStatus::OverloadAlarm => findings.push(format!(
            "CRITICAL: Motor load {load_pct:.1}% > {:.0}% FLA - immediate action required",
            th.load_critical_pct
        )),
        LoadStatus::OverloadWarning => findings.push(format!(
            "Motor load {load_pct:.1}% > {:.0}% FLA - check pump head and impeller",
            th.load_warning_pct
        )),
        LoadStatus::Underload => findings.push(format!(
            "Motor underload {load_pct:.1}% < {:.0}% FLA - check if pump is operating below BEP",
            th.load_underload_pct
        )),
        LoadStatus::Normal | LoadStatus::Invalid => {}
    }
    if let Some(finding) = slip_finding(&slip, input) {
        findings.push(finding);
    }

    let has_issue = status != DomainStatus::Normal;
    if !has_issue {
        findings.insert(
            0,
            format!("Electrical parameters within normal range (load {load_pct:.1}% FLA)"),
        );
    }

    debug!(
        voltage_imbalance = voltage.imbalance_pct,
        current_imbalance = current.imbalance_pct,
        load_pct = load_pct,
        slip = ?slip.slip_pct,
        status = %status,
        "Electrical evaluation"
    );

    report(status, has_issue, findings, voltage, current, fla, load_pct, load_status, slip)
}

fn phase_metrics(computed: Option<(f64, f64)>, warning: f64, critical: f64) -> PhaseImbalance {
    match computed {
        Some((average, imbalance_pct)) => PhaseImbalance {
            average: round_to(average, 1),
            imbalance_pct: round_to(imbalance_pct, 1),
            status: classify_imbalance(imbalance_pct, warning, critical),
        },
        None => PhaseImbalance {
            average: 0.0,
            imbalance_pct: 0.0,
            status: MetricStatus::Invalid,
        },
    }
}

fn slip_metrics(input: &ElectricalInput, config: &PumpConfig) -> SlipMetrics {
    let Some(actual) = input.actual_rpm else {
        return SlipMetrics { slip_pct: None, slip_rpm: None, status: SlipStatus::NotMeasured };
    };
    match calculate_slip(input.rated_rpm, actual) {
        Some((pct, rpm)) => SlipMetrics {
            slip_pct: Some(round_to(pct, 2)),
            slip_rpm: Some(round_to(rpm, 1)),
            status: classify_slip(pct, &config.thresholds.electrical),
        },
        None => SlipMetrics { slip_pct: None, slip_rpm: None, status: SlipStatus::Invalid },
    }
}

fn slip_finding(slip: &SlipMetrics, input: &ElectricalInput) -> Option<String> {
    let pct = slip.slip_pct.unwrap_or(0.0);
    match slip.status {
        SlipStatus::CriticalOverload => Some(format!(
            "CRITICAL OVERLOAD: Slip {pct:.2}% - check pump head, cavitation, or mechanical binding"
        )),
        SlipStatus::HighSlip => Some(format!(
            "HIGH SLIP ({pct:.2}%) - possible hydraulic overload or cavitation, verify NPSHa and discharge pressure"
        )),
        SlipStatus::Abnormal => Some(format!(
            "Actual RPM ({:.0}) > rated RPM ({:.0}) - verify tachometer calibration or check for backflow (check valve failure)",
            input.actual_rpm.unwrap_or(0.0),
            input.rated_rpm
        )),
        SlipStatus::LowSlip => Some(format!("Motor slip low - light load condition ({pct:.2}%)")),
        SlipStatus::Invalid => Some(format!(
            "Invalid rated RPM ({:.0}) - cannot calculate slip",
            input.rated_rpm
        )),
        SlipStatus::Normal | SlipStatus::NotMeasured => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn report(
    status: DomainStatus,
    has_issue: bool,
    findings: Vec<String>,
    voltage: PhaseImbalance,
    current: PhaseImbalance,
    full_load_amps: f64,
    load_pct: f64,
    load_status: LoadStatus,
    slip: SlipMetrics,
) -> DomainReport {
    DomainReport {
        status,
        has_issue,
        findings,
        standard_ref: REF_ELECTRICAL.to_string(),
        detail: ReportDetail::Electrical(ElectricalMetrics {
            voltage,
            current,
            full_load_amps,
            load_pct: round_to(load_pct, 1),
            load_status,
            slip,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced_input() -> ElectricalInput {
        ElectricalInput {
            voltages_v: [380.0, 380.0, 380.0],
            currents_a: [28.0, 28.0, 28.0],
            pump_size: PumpSize::Medium,
            rated_rpm: 2950.0,
            actual_rpm: None,
        }
    }

    #[test]
    fn test_balanced_supply_is_normal() {
        let report = evaluate(&balanced_input(), &PumpConfig::default());
        let m = report.as_electrical().unwrap();
        assert_eq!(m.voltage.imbalance_pct, 0.0);
        assert_eq!(m.current.imbalance_pct, 0.0);
        assert_eq!(m.load_pct, 93.3);
        assert_eq!(m.slip.status, SlipStatus::NotMeasured);
        assert_eq!(report.status, DomainStatus::Normal);
        assert!(!report.has_issue);
    }

    #[test]
    fn test_slip_above_critical_band_is_warning_issue() {
        let mut input = balanced_input();
        input.actual_rpm = Some(2700.0);
        let report = evaluate(&input, &PumpConfig::default());
        let m = report.as_electrical().unwrap();
        assert_eq!(m.slip.slip_pct, Some(8.47));
        assert_eq!(m.slip.status, SlipStatus::CriticalOverload);
        assert_eq!(report.status, DomainStatus::Warning);
        assert!(report.has_issue);
    }

    #[test]
    fn test_negative_slip_is_abnormal_issue() {
        let mut input = balanced_input();
        input.actual_rpm = Some(3000.0);
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.as_electrical().unwrap().slip.status, SlipStatus::Abnormal);
        assert_eq!(report.status, DomainStatus::Abnormal);
        assert!(report.has_issue);
        assert!(report.findings.iter().any(|f| f.contains("tachometer")));
    }

    #[test]
    fn test_voltage_imbalance_above_five_is_critical() {
        let mut input = balanced_input();
        input.voltages_v = [400.0, 380.0, 370.0];
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.as_electrical().unwrap().voltage.status, MetricStatus::Alarm);
        assert_eq!(report.status, DomainStatus::Critical);
    }

    #[test]
    fn test_underload_is_warning() {
        let mut input = balanced_input();
        input.currents_a = [20.0, 20.0, 20.0];
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.as_electrical().unwrap().load_status, LoadStatus::Underload);
        assert_eq!(report.status, DomainStatus::Warning);
    }

    #[test]
    fn test_zero_current_is_invalid_not_issue() {
        let mut input = balanced_input();
        input.currents_a = [0.0; 3];
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.status, DomainStatus::Invalid);
        assert!(!report.has_issue);
    }

    #[test]
    fn test_negative_current_is_invalid_not_underload() {
        let mut input = balanced_input();
        input.currents_a = [-28.0; 3];
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.status, DomainStatus::Invalid);
        assert!(!report.has_issue);
        assert_eq!(report.as_electrical().unwrap().load_status, LoadStatus::Invalid);
    }

    #[test]
    fn test_negative_voltage_is_invalid() {
        let mut input = balanced_input();
        input.voltages_v = [-380.0; 3];
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.status, DomainStatus::Invalid);
        assert!(!report.has_issue);
    }

    #[test]
    fn test_non_positive_rated_rpm_invalidates_slip_only() {
        let mut input = balanced_input();
        input.rated_rpm = 0.0;
        input.actual_rpm = Some(2900.0);
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.as_electrical().unwrap().slip.status, SlipStatus::Invalid);
        assert_eq!(report.status, DomainStatus::Normal);
    }
}
