//! Causal Priority Resolver (API 610 Annex L.3.2)
//!
//! Picks the primary domain from the evaluator reports using the fixed
//! causal precedence HYDRAULIC > ELECTRICAL > MECHANICAL > THERMAL.
//! Hydraulic instability and electrical faults both show up as vibration,
//! so they must be ruled out before a mechanical diagnosis is accepted.
//!
//! ## Algorithm
//!
//! 1. Drop INVALID reports (logged, never an issue).
//! 2. Keep reports with `has_issue`, stably ordered by domain precedence.
//!    Within MECHANICAL the spectral report sorts before the zone report.
//! 3. None left ⇒ NORMAL. Otherwise the first report is primary.
//! 4. Attach a secondary note when the primary may be masking symptoms.
//! 5. A MECHANICAL primary with electrical readings inside every normal band
//!    requires a power-off coast-down test before any mechanical repair.

use tracing::{info, warn};

use crate::config::defaults::{REF_ELECTRICAL, REF_POWER_OFF_TEST};
use crate::config::{PumpConfig, ValidationGateConfig};
use crate::types::{DiagnosisResult, Domain, DomainReport, DomainStatus, PrimaryDomain, SlipStatus};

/// Resolve the primary domain from all evaluator reports (spectral included).
pub fn resolve(reports: &[DomainReport], config: &PumpConfig) -> DiagnosisResult {
    for report in reports.iter().filter(|r| r.status == DomainStatus::Invalid) {
        warn!(
            domain = %report.domain(),
            kind = report.detail.label(),
            "Excluding INVALID report from resolution: {}",
            report.headline()
        );
    }

    let mut issues: Vec<DomainReport> = reports
        .iter()
        .filter(|r| r.has_issue && r.status != DomainStatus::Invalid)
        .cloned()
        .collect();
    issues.sort_by_key(|r| (r.domain(), !r.is_spectral()));

    let Some(primary) = issues.first().cloned() else {
        info!("No domain reports an issue: NORMAL");
        return DiagnosisResult::normal();
    };
    let primary_domain = primary.domain();

    let secondary_note = secondary_note(primary_domain, reports, &issues);
    let requires_validation =
        primary_domain == Domain::Mechanical && electrical_within_gate(reports, &config.validation);

    info!(
        primary = %primary_domain,
        issues = issues.len(),
        requires_validation = requires_validation,
        "Causal resolution complete"
    );

    DiagnosisResult {
        primary_domain: PrimaryDomain::from(primary_domain),
        primary_report: Some(primary),
        secondary_note,
        requires_validation,
        all_issues: issues,
    }
}

fn secondary_note(primary: Domain, reports: &[DomainReport], issues: &[DomainReport]) -> Option<String> {
    match primary {
        Domain::Hydraulic => Some(format!(
            "{REF_POWER_OFF_TEST}: Mechanical vibration symptoms may be secondary to hydraulic instability. \
             Fix hydraulic issue first, then re-measure vibration before mechanical intervention."
        )),
        Domain::Electrical if issues.iter().any(|r| r.domain() == Domain::Mechanical) => {
            let abnormal_slip = reports
                .iter()
                .filter_map(DomainReport::as_electrical)
                .any(|e| e.slip.status == SlipStatus::Abnormal);
            if abnormal_slip {
                Some(format!(
                    "{REF_ELECTRICAL}: Mechanical vibration symptoms may be secondary to RPM abnormality. \
                     Verify tachometer calibration, check for backflow (check valve), or grid frequency issue. \
                     Fix electrical issue first, then re-measure vibration."
                ))
            } else {
                Some(format!(
                    "{REF_ELECTRICAL}: Mechanical vibration symptoms may be secondary to electrical issue. \
                     Fix electrical issue first, then re-measure vibration."
                ))
            }
        }
        _ => None,
    }
}

/// True when the electrical report is valid and every metric sits inside the
/// power-off test gate. An unmeasured slip does not block the gate.
pub fn electrical_within_gate(reports: &[DomainReport], gate: &ValidationGateConfig) -> bool {
    let Some((report, e)) = reports.iter().find_map(|r| r.as_electrical().map(|e| (r, e))) else {
        return false;
    };
    if report.status == DomainStatus::Invalid {
        return false;
    }

    let slip_ok = e
        .slip
        .slip_pct
        .map_or(true, |s| (gate.slip_min_pct..=gate.slip_max_pct).contains(&s));

    e.voltage.imbalance_pct <= gate.voltage_imbalance_max_pct
        && e.current.imbalance_pct <= gate.current_imbalance_max_pct
        && e.load_pct <= gate.load_max_pct
        && slip_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::{hydraulic, mechanical};
    use crate::types::{
        ElectricalMetrics, LoadStatus, Lubricant, MeasurementSnapshot, MetricStatus, PhaseImbalance,
        ReportDetail, SlipMetrics, SpectralAnalysis, ThermalMetrics,
    };

    fn thermal(has_issue: bool) -> DomainReport {
        DomainReport {
            status: if has_issue { DomainStatus::Critical } else { DomainStatus::Normal },
            has_issue,
            findings: vec!["thermal".to_string()],
            standard_ref: String::new(),
            detail: ReportDetail::Thermal(ThermalMetrics {
                lubricant: Lubricant::Grease,
                ambient_c: 30.0,
                bearings: Vec::new(),
                max_temperature_c: 30.0,
                max_rise_c: 0.0,
                pump_de_nde_delta_c: 0.0,
                misalignment_suspected: false,
                seal_override: false,
            }),
        }
    }

    fn spectral(has_issue: bool) -> DomainReport {
        DomainReport {
            status: if has_issue { DomainStatus::Warning } else { DomainStatus::Normal },
            has_issue,
            findings: vec!["spectral".to_string()],
            standard_ref: String::new(),
            detail: ReportDetail::Spectral(SpectralAnalysis { rpm: 2950.0, shaft_frequency_hz: 49.17, findings: Vec::new() }),
        }
    }

    fn electrical(status: DomainStatus, voltage_pct: f64, slip_pct: Option<f64>, slip_status: SlipStatus) -> DomainReport {
        let phase = |pct| PhaseImbalance { average: 1.0, imbalance_pct: pct, status: MetricStatus::Normal };
        DomainReport {
            status,
            has_issue: !matches!(status, DomainStatus::Normal | DomainStatus::Invalid),
            findings: vec!["electrical".to_string()],
            standard_ref: String::new(),
            detail: ReportDetail::Electrical(ElectricalMetrics {
                voltage: phase(voltage_pct),
                current: phase(0.0),
                full_load_amps: 30.0,
                load_pct: 93.3,
                load_status: LoadStatus::Normal,
                slip: SlipMetrics { slip_pct, slip_rpm: None, status: slip_status },
            }),
        }
    }

    fn flagged(mut report: DomainReport, has_issue: bool) -> DomainReport {
        report.has_issue = has_issue;
        report.status = if has_issue { DomainStatus::Warning } else { DomainStatus::Normal };
        report
    }

    #[test]
    fn test_precedence_over_every_flag_combination() {
        let config = PumpConfig::default();
        let snapshot = MeasurementSnapshot::default();
        let hydraulic_report = hydraulic::evaluate(&hydraulic::HydraulicInput::from_snapshot(&snapshot), &config);
        let vibration_report = mechanical::evaluate(&mechanical::MechanicalInput::from_snapshot(&snapshot), &config);

        for mask in 0u8..16 {
            let [hyd, elec, mech, therm] = [0, 1, 2, 3].map(|bit| mask & (1 << bit) != 0);
            for via_spectral in [false, true] {
                let electrical_report = if elec {
                    electrical(DomainStatus::Warning, 2.5, None, SlipStatus::NotMeasured)
                } else {
                    electrical(DomainStatus::Normal, 0.0, Some(1.7), SlipStatus::Normal)
                };
                let mechanical_report = if via_spectral {
                    spectral(mech)
                } else {
                    flagged(vibration_report.clone(), mech)
                };
                let reports = [
                    flagged(hydraulic_report.clone(), hyd),
                    electrical_report,
                    mechanical_report,
                    thermal(therm),
                ];

                let expected = Domain::PRECEDENCE
                    .into_iter()
                    .zip([hyd, elec, mech, therm])
                    .find_map(|(domain, on)| on.then_some(PrimaryDomain::from(domain)))
                    .unwrap_or(PrimaryDomain::Normal);

                let result = resolve(&reports, &config);
                assert_eq!(result.primary_domain, expected, "mask {mask:04b} spectral={via_spectral}");
                assert_eq!(
                    result.requires_validation,
                    expected == PrimaryDomain::Mechanical && !elec,
                    "mask {mask:04b} spectral={via_spectral}"
                );
                assert_eq!(result.all_issues.len(), mask.count_ones() as usize);
            }
        }
    }

    #[test]
    fn test_no_issues_is_normal() {
        let result = resolve(&[thermal(false), spectral(false)], &PumpConfig::default());
        assert!(result.is_normal());
        assert!(result.primary_report.is_none());
        assert!(!result.requires_validation);
    }

    #[test]
    fn test_thermal_only_has_no_note_or_validation() {
        let result = resolve(&[thermal(true)], &PumpConfig::default());
        assert_eq!(result.primary_domain, PrimaryDomain::Thermal);
        assert!(result.secondary_note.is_none());
        assert!(!result.requires_validation);
    }

    #[test]
    fn test_mechanical_beats_thermal_and_spectral_counts_as_mechanical() {
        let reports = [thermal(true), spectral(true), electrical(DomainStatus::Normal, 0.0, Some(1.7), SlipStatus::Normal)];
        let result = resolve(&reports, &PumpConfig::default());
        assert_eq!(result.primary_domain, PrimaryDomain::Mechanical);
        assert!(result.primary_report.as_ref().unwrap().is_spectral());
        assert!(result.requires_validation, "clean electrical readings require the coast-down test");
        assert_eq!(result.all_issues.len(), 2);
    }

    #[test]
    fn test_electrical_beats_mechanical_with_slip_note() {
        let reports = [spectral(true), electrical(DomainStatus::Abnormal, 0.0, Some(-1.7), SlipStatus::Abnormal)];
        let result = resolve(&reports, &PumpConfig::default());
        assert_eq!(result.primary_domain, PrimaryDomain::Electrical);
        assert!(result.secondary_note.as_ref().unwrap().contains("tachometer"));
        assert!(!result.requires_validation);
    }

    #[test]
    fn test_electrical_primary_without_mechanical_has_no_note() {
        let reports = [electrical(DomainStatus::Critical, 6.0, None, SlipStatus::NotMeasured)];
        let result = resolve(&reports, &PumpConfig::default());
        assert_eq!(result.primary_domain, PrimaryDomain::Electrical);
        assert!(result.secondary_note.is_none());
    }

    #[test]
    fn test_gate_rejects_imbalance_and_invalid() {
        let gate = ValidationGateConfig::default();
        assert!(!electrical_within_gate(&[electrical(DomainStatus::Warning, 2.5, None, SlipStatus::NotMeasured)], &gate));
        assert!(!electrical_within_gate(&[electrical(DomainStatus::Invalid, 0.0, None, SlipStatus::NotMeasured)], &gate));
        assert!(!electrical_within_gate(&[electrical(DomainStatus::Warning, 0.0, Some(8.5), SlipStatus::CriticalOverload)], &gate));
        assert!(electrical_within_gate(&[electrical(DomainStatus::Normal, 2.0, None, SlipStatus::NotMeasured)], &gate));
        assert!(!electrical_within_gate(&[], &gate));
    }

    #[test]
    fn test_invalid_report_never_selected() {
        let mut invalid = thermal(true);
        invalid.status = DomainStatus::Invalid;
        let result = resolve(&[invalid], &PumpConfig::default());
        assert!(result.is_normal());
    }
}
