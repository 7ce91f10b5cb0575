//! Mechanical Evaluator - ISO 10816-3 severity, fault attribution, bearing demodulation
//!
//! ## Algorithm
//!
//! 1. Per machine, average DE and NDE on each axis; the largest average sets
//!    that machine's zone. The overall zone is the worse of the two.
//! 2. Above the attribution ceiling (zone A upper bound for the foundation),
//!    classify the harmonic pattern of the primary machine's peaks; with no
//!    pattern, fall back to the dominant axis (H ⇒ unbalance, V ⇒ looseness,
//!    A ⇒ misalignment).
//! 3. At or below the ceiling no fault is named. The only way to raise an
//!    issue there is bearing demodulation above the medium threshold.

use tracing::debug;

use super::DomainEvaluator;
use crate::config::defaults::{REF_BEARING_DAMAGE, REF_SPECTRAL, REF_VIBRATION_ZONES};
use crate::config::PumpConfig;
use crate::physics_engine::{classify_zone, round_to};
use crate::spectral::harmonics::classify_pattern;
use crate::types::{
    DirectionalAverages, Domain, DomainReport, DomainStatus, FaultHypothesis, FftPeak,
    FoundationType, Grade, IsoZone, Machine, MachineSeverity, MachineVibration, MeasurementSnapshot,
    MechanicalMetrics, ReportDetail, VibrationData,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MechanicalInput {
    pub vibration: VibrationData,
    pub foundation: FoundationType,
    pub peaks: Vec<FftPeak>,
    /// Actual RPM when measured, else rated
    pub rpm: f64,
}

impl MechanicalInput {
    pub fn from_snapshot(snapshot: &MeasurementSnapshot) -> Self {
        Self {
            vibration: snapshot.vibration.clone(),
            foundation: snapshot.specification.foundation_type,
            peaks: snapshot.fft_peaks.clone(),
            rpm: snapshot.actual_rpm.unwrap_or(snapshot.specification.rated_rpm),
        }
    }
}

pub struct MechanicalEvaluator;

impl DomainEvaluator for MechanicalEvaluator {
    fn name(&self) -> &str {
        "Mechanical"
    }

    fn domain(&self) -> Domain {
        Domain::Mechanical
    }

    fn evaluate(&self, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> DomainReport {
        evaluate(&MechanicalInput::from_snapshot(snapshot), config)
    }
}

fn directional_averages(machine: &MachineVibration) -> DirectionalAverages {
    DirectionalAverages {
        horizontal: machine.horizontal.average(),
        vertical: machine.vertical.average(),
        axial: machine.axial.average(),
    }
}

fn severity(machine: Machine, data: &MachineVibration, config: &PumpConfig, foundation: FoundationType) -> MachineSeverity {
    let averages = directional_averages(data);
    MachineSeverity {
        machine,
        zone: classify_zone(averages.max(), config.zone_limits(foundation)),
        averages,
    }
}

pub fn evaluate(input: &MechanicalInput, config: &PumpConfig) -> DomainReport {
    let th = &config.thresholds.mechanical;
    let driver = severity(Machine::Driver, &input.vibration.driver, config, input.foundation);
    let driven = severity(Machine::Driven, &input.vibration.driven, config, input.foundation);

    let (primary, primary_component) = if driven.averages.max() > driver.averages.max() {
        (&driven, Machine::Driven)
    } else {
        (&driver, Machine::Driver)
    };
    let overall_zone = driver.zone.max(driven.zone);
    let max_velocity = primary.averages.max();
    let dominant_direction = primary.averages.dominant();
    let ceiling = config.zone_limits(input.foundation).zone_a_max;

    let demod_max = input.vibration.driver.demod_max().max(input.vibration.driven.demod_max());
    let bearing_defect_risk = if demod_max > th.demod_high_g {
        Grade::High
    } else if demod_max > th.demod_medium_g {
        Grade::Medium
    } else {
        Grade::Low
    };

    let mut findings = Vec::new();
    let mut status = DomainStatus::Normal;
    let mut fault = None;
    let mut fault_confidence = Grade::Low;

    let above_ceiling = max_velocity > ceiling;
    if above_ceiling {
        for m in [&driver, &driven] {
            if m.zone >= IsoZone::C {
                findings.push(format!(
                    "{} vibration {:.2} mm/s - {}",
                    m.machine,
                    m.averages.max(),
                    m.zone.description()
                ));
            }
        }

        let pattern = classify_pattern(
            input.peaks.iter().filter(|p| p.component == primary_component),
            input.rpm,
            th,
            &config.thresholds.spectral,
        );
        let (hypothesis, confidence) = pattern.unwrap_or((
            FaultHypothesis::from_dominant_direction(dominant_direction),
            Grade::Low,
        ));
        fault = Some(hypothesis);
        fault_confidence = confidence;
        findings.push(format!(
            "Primary fault: {hypothesis} on {primary_component} ({}, {dominant_direction}-dominant {max_velocity:.2} mm/s)",
            hypothesis.likely_cause()
        ));

        status = match overall_zone {
            IsoZone::D => DomainStatus::Critical,
            IsoZone::C => DomainStatus::Alarm,
            IsoZone::A | IsoZone::B => DomainStatus::Warning,
        };
    } else {
        findings.push(format!(
            "Mechanical vibration within acceptable limits ({max_velocity:.2} mm/s <= {ceiling:.1} mm/s, {})",
            overall_zone.description()
        ));
    }

    if bearing_defect_risk >= Grade::Medium {
        findings.insert(
            0,
            format!(
                "Bearing defect risk ({bearing_defect_risk}): demodulation {demod_max:.2} g - schedule bearing inspection within 7 days ({REF_BEARING_DAMAGE})"
            ),
        );
        status = status.escalate(if bearing_defect_risk == Grade::High {
            DomainStatus::Alarm
        } else {
            DomainStatus::Warning
        });
    }

    let has_issue = above_ceiling || bearing_defect_risk >= Grade::Medium;

    debug!(
        overall_zone = %overall_zone,
        max_velocity = max_velocity,
        demod_max = demod_max,
        fault = ?fault,
        "Mechanical evaluation"
    );

    DomainReport {
        status,
        has_issue,
        findings,
        standard_ref: format!("{REF_VIBRATION_ZONES}, {REF_SPECTRAL}, {REF_BEARING_DAMAGE}"),
        detail: ReportDetail::Vibration(MechanicalMetrics {
            driver: rounded(driver.clone()),
            driven: rounded(driven.clone()),
            primary_component,
            dominant_direction,
            overall_zone,
            max_velocity_mm_s: round_to(max_velocity, 2),
            attribution_ceiling_mm_s: ceiling,
            fault,
            fault_confidence,
            demod_max_g: round_to(demod_max, 2),
            bearing_defect_risk,
        }),
    }
}

fn rounded(mut severity: MachineSeverity) -> MachineSeverity {
    severity.averages = DirectionalAverages {
        horizontal: round_to(severity.averages.horizontal, 2),
        vertical: round_to(severity.averages.vertical, 2),
        axial: round_to(severity.averages.axial, 2),
    };
    severity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxisReading, Direction};

    fn input_with_pump(h: f64, v: f64, a: f64) -> MechanicalInput {
        let mut vibration = VibrationData::default();
        vibration.driven.horizontal = AxisReading::new(h, h);
        vibration.driven.vertical = AxisReading::new(v, v);
        vibration.driven.axial = AxisReading::new(a, a);
        MechanicalInput {
            vibration,
            foundation: FoundationType::Rigid,
            peaks: Vec::new(),
            rpm: 2950.0,
        }
    }

    #[test]
    fn test_zero_vibration_names_no_fault() {
        let report = evaluate(&input_with_pump(0.0, 0.0, 0.0), &PumpConfig::default());
        let m = report.as_mechanical().unwrap();
        assert!(m.fault.is_none());
        assert_eq!(m.overall_zone, IsoZone::A);
        assert!(!report.has_issue);
        assert_eq!(report.status, DomainStatus::Normal);
    }

    #[test]
    fn test_reading_at_ceiling_names_no_fault() {
        let report = evaluate(&input_with_pump(2.8, 1.0, 1.0), &PumpConfig::default());
        assert!(report.as_mechanical().unwrap().fault.is_none());
        assert!(!report.has_issue);
    }

    #[test]
    fn test_zone_d_horizontal_falls_back_to_unbalance() {
        let report = evaluate(&input_with_pump(8.0, 3.0, 2.0), &PumpConfig::default());
        let m = report.as_mechanical().unwrap();
        assert_eq!(m.overall_zone, IsoZone::D);
        assert_eq!(m.primary_component, Machine::Driven);
        assert_eq!(m.fault, Some(FaultHypothesis::Unbalance));
        assert_eq!(m.fault_confidence, Grade::Low);
        assert_eq!(report.status, DomainStatus::Critical);
        assert!(report.has_issue);
    }

    #[test]
    fn test_axial_dominant_zone_c_is_misalignment() {
        let report = evaluate(&input_with_pump(2.0, 2.0, 5.0), &PumpConfig::default());
        let m = report.as_mechanical().unwrap();
        assert_eq!(m.overall_zone, IsoZone::C);
        assert_eq!(m.fault, Some(FaultHypothesis::Misalignment));
        assert_eq!(report.status, DomainStatus::Alarm);
    }

    #[test]
    fn test_harmonic_pattern_overrides_direction_map() {
        let mut input = input_with_pump(5.0, 2.0, 2.0);
        input.peaks = vec![
            FftPeak { component: Machine::Driven, direction: Direction::Vertical, frequency_hz: 49.2, amplitude_mm_s: 2.5 },
            FftPeak { component: Machine::Driven, direction: Direction::Vertical, frequency_hz: 147.5, amplitude_mm_s: 1.2 },
        ];
        let report = evaluate(&input, &PumpConfig::default());
        let m = report.as_mechanical().unwrap();
        assert_eq!(m.fault, Some(FaultHypothesis::MechanicalLooseness));
        assert_eq!(m.fault_confidence, Grade::High);
    }

    #[test]
    fn test_demodulation_raises_issue_in_zone_a() {
        let mut input = input_with_pump(1.0, 1.0, 1.0);
        input.vibration.driver.demod_de_g = 0.35;
        let report = evaluate(&input, &PumpConfig::default());
        let m = report.as_mechanical().unwrap();
        assert!(m.fault.is_none());
        assert_eq!(m.bearing_defect_risk, Grade::Medium);
        assert!(report.has_issue);
        assert_eq!(report.status, DomainStatus::Warning);
        assert!(report.findings[0].contains("Bearing defect risk"));
    }

    #[test]
    fn test_flexible_foundation_raises_ceiling() {
        let mut input = input_with_pump(4.0, 1.0, 1.0);
        input.foundation = FoundationType::Flexible;
        let report = evaluate(&input, &PumpConfig::default());
        assert_eq!(report.as_mechanical().unwrap().attribution_ceiling_mm_s, 4.5);
        assert!(!report.has_issue);
    }
}
