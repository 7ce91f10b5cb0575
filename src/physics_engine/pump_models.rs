//! Pump physics calculations
//!
//! Hydraulic, electrical and vibration-severity formulas used by the domain
//! evaluators. Every function is pure; thresholds are passed in explicitly.
//! Functions that divide return `None` instead of producing NaN/Inf.

use crate::config::{ElectricalThresholds, HydraulicThresholds, ZoneLimits};
use crate::types::{FlowStatus, IsoZone, LoadStatus, MetricStatus, SlipStatus};

/// Round to a fixed number of decimals for reporting.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Hydraulic
// ============================================================================

/// Net positive suction head available (m)
///
/// Formula: NPSHa = (Ps + Patm − Pv) / (ρ × k)
///
/// Where:
/// - Ps = suction gauge pressure (kPa)
/// - Patm = atmospheric pressure (kPa)
/// - Pv = product vapour pressure (kPa)
/// - ρ = density (kg/m³)
/// - k = head conversion factor (0.00981 kPa per kg/m³·m)
///
/// Velocity head is ignored (< 0.5 m at terminal suction velocities).
pub fn calculate_npsha(
    suction_kpa: f64,
    vapor_pressure_kpa: f64,
    density_kg_m3: f64,
    hydraulic: &HydraulicThresholds,
) -> Option<f64> {
    let divisor = density_kg_m3 * hydraulic.head_conversion_factor;
    if divisor <= 0.0 {
        return None;
    }
    Some((suction_kpa + hydraulic.atmospheric_pressure_kpa - vapor_pressure_kpa) / divisor)
}

/// Differential head across the pump (m)
///
/// Formula: H = (Pd − Ps) / (ρ × k)
pub fn calculate_differential_head(
    discharge_kpa: f64,
    suction_kpa: f64,
    density_kg_m3: f64,
    hydraulic: &HydraulicThresholds,
) -> Option<f64> {
    let divisor = density_kg_m3 * hydraulic.head_conversion_factor;
    if divisor <= 0.0 {
        return None;
    }
    Some((discharge_kpa - suction_kpa) / divisor)
}

/// Flow as a fraction of best-efficiency-point flow.
pub fn calculate_flow_ratio(flow_m3h: f64, bep_flow_m3h: f64) -> Option<f64> {
    (bep_flow_m3h > 0.0).then(|| flow_m3h / bep_flow_m3h)
}

/// API 610 Annex L preferred operating region. Boundaries are inside the region.
pub fn classify_flow(flow_ratio: f64, hydraulic: &HydraulicThresholds) -> FlowStatus {
    if flow_ratio < hydraulic.flow_ratio_min {
        FlowStatus::RecirculationRisk
    } else if flow_ratio > hydraulic.flow_ratio_max {
        FlowStatus::OverloadCavitationRisk
    } else {
        FlowStatus::Normal
    }
}

// ============================================================================
// Electrical
// ============================================================================

/// Three-phase imbalance (%) and average.
///
/// Formula: imbalance = (max − min) / avg × 100
///
/// Returns `None` for a non-positive average.
pub fn calculate_imbalance(phases: [f64; 3]) -> Option<(f64, f64)> {
    let avg = phases.iter().sum::<f64>() / 3.0;
    if avg <= 0.0 || !avg.is_finite() {
        return None;
    }
    let max = phases.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = phases.iter().copied().fold(f64::INFINITY, f64::min);
    Some((avg, (max - min) / avg * 100.0))
}

/// Strictly-greater-than escalation: `> critical` is Alarm, `> warning` is Warning.
pub fn classify_imbalance(imbalance_pct: f64, warning: f64, critical: f64) -> MetricStatus {
    if imbalance_pct > critical {
        MetricStatus::Alarm
    } else if imbalance_pct > warning {
        MetricStatus::Warning
    } else {
        MetricStatus::Normal
    }
}

/// Motor load as percentage of full load amps.
pub fn calculate_load_pct(current_avg: f64, fla: f64) -> Option<f64> {
    (fla > 0.0).then(|| current_avg / fla * 100.0)
}

pub fn classify_load(load_pct: f64, electrical: &ElectricalThresholds) -> LoadStatus {
    if load_pct > electrical.load_critical_pct {
        LoadStatus::OverloadAlarm
    } else if load_pct > electrical.load_warning_pct {
        LoadStatus::OverloadWarning
    } else if load_pct < electrical.load_underload_pct {
        LoadStatus::Underload
    } else {
        LoadStatus::Normal
    }
}

/// Motor slip (%) and slip (rpm).
///
/// Formula: slip = (rated − actual) / rated × 100
///
/// Returns `None` for a non-positive rated speed.
pub fn calculate_slip(rated_rpm: f64, actual_rpm: f64) -> Option<(f64, f64)> {
    if rated_rpm <= 0.0 || !rated_rpm.is_finite() {
        return None;
    }
    let slip_rpm = rated_rpm - actual_rpm;
    Some((slip_rpm / rated_rpm * 100.0, slip_rpm))
}

/// Slip bands (IEC 60034-1 §4.2).
///
/// Negative slip means the shaft turns faster than rated, which a motor
/// driving a pump cannot do. Within `negative_slip_tolerance_pct` it is
/// reported as LOW_SLIP, beyond it as ABNORMAL.
pub fn classify_slip(slip_pct: f64, electrical: &ElectricalThresholds) -> SlipStatus {
    if slip_pct > electrical.slip_critical_pct {
        SlipStatus::CriticalOverload
    } else if slip_pct > electrical.slip_high_pct {
        SlipStatus::HighSlip
    } else if slip_pct < -electrical.negative_slip_tolerance_pct {
        SlipStatus::Abnormal
    } else if slip_pct < 0.0 {
        SlipStatus::LowSlip
    } else {
        SlipStatus::Normal
    }
}

// ============================================================================
// Vibration Severity
// ============================================================================

/// ISO 10816-3 zone. A reading equal to a ceiling stays in the lower zone.
pub fn classify_zone(velocity_mm_s: f64, limits: &ZoneLimits) -> IsoZone {
    if velocity_mm_s <= limits.zone_a_max {
        IsoZone::A
    } else if velocity_mm_s <= limits.zone_b_max {
        IsoZone::B
    } else if velocity_mm_s <= limits.zone_c_max {
        IsoZone::C
    } else {
        IsoZone::D
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PumpConfig;

    #[test]
    fn test_npsha_gasoline() {
        let cfg = PumpConfig::default();
        // (50 + 101.3 − 55) / (740 × 0.00981) = 96.3 / 7.2594 = 13.27 m
        let npsha = calculate_npsha(50.0, 55.0, 740.0, &cfg.thresholds.hydraulic).unwrap();
        assert!((npsha - 13.27).abs() < 0.01, "NPSHa should be ~13.27 m, got {npsha}");
    }

    #[test]
    fn test_npsha_zero_density_is_none() {
        let cfg = PumpConfig::default();
        assert!(calculate_npsha(50.0, 55.0, 0.0, &cfg.thresholds.hydraulic).is_none());
    }

    #[test]
    fn test_differential_head_diesel() {
        let cfg = PumpConfig::default();
        // (400 − 50) / (840 × 0.00981) = 350 / 8.2404 = 42.47 m
        let head = calculate_differential_head(400.0, 50.0, 840.0, &cfg.thresholds.hydraulic).unwrap();
        assert!((head - 42.47).abs() < 0.01, "head should be ~42.47 m, got {head}");
    }

    #[test]
    fn test_flow_ratio_boundaries_are_normal() {
        let cfg = PumpConfig::default();
        let h = &cfg.thresholds.hydraulic;
        assert_eq!(classify_flow(calculate_flow_ratio(120.0, 100.0).unwrap(), h), FlowStatus::Normal);
        assert_eq!(classify_flow(calculate_flow_ratio(60.0, 100.0).unwrap(), h), FlowStatus::Normal);
        assert_eq!(classify_flow(0.59, h), FlowStatus::RecirculationRisk);
        assert_eq!(classify_flow(1.21, h), FlowStatus::OverloadCavitationRisk);
    }

    #[test]
    fn test_imbalance_balanced_supply() {
        let (avg, imbalance) = calculate_imbalance([380.0, 380.0, 380.0]).unwrap();
        assert_eq!(avg, 380.0);
        assert_eq!(imbalance, 0.0);
    }

    #[test]
    fn test_imbalance_zero_average_is_none() {
        assert!(calculate_imbalance([0.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_imbalance_negative_average_is_none() {
        assert!(calculate_imbalance([-28.0, -28.0, -28.0]).is_none());
        assert!(calculate_imbalance([10.0, -20.0, 5.0]).is_none());
        assert!(calculate_imbalance([f64::NAN, 28.0, 28.0]).is_none());
    }

    #[test]
    fn test_imbalance_classification() {
        // (390 − 370) / 380 × 100 = 5.26% → above the 5% critical band
        let (_, imbalance) = calculate_imbalance([390.0, 380.0, 370.0]).unwrap();
        assert_eq!(classify_imbalance(imbalance, 2.0, 5.0), MetricStatus::Alarm);
        assert_eq!(classify_imbalance(2.0, 2.0, 5.0), MetricStatus::Normal);
        assert_eq!(classify_imbalance(3.0, 2.0, 5.0), MetricStatus::Warning);
    }

    #[test]
    fn test_load_medium_pump() {
        let cfg = PumpConfig::default();
        let load = calculate_load_pct(28.0, 30.0).unwrap();
        assert!((round_to(load, 1) - 93.3).abs() < 1e-9);
        assert_eq!(classify_load(load, &cfg.thresholds.electrical), LoadStatus::Normal);
        assert_eq!(classify_load(79.9, &cfg.thresholds.electrical), LoadStatus::Underload);
        assert_eq!(classify_load(126.0, &cfg.thresholds.electrical), LoadStatus::OverloadAlarm);
        assert!(calculate_load_pct(28.0, 0.0).is_none());
    }

    #[test]
    fn test_slip_2950_to_2700() {
        let cfg = PumpConfig::default();
        let (slip_pct, slip_rpm) = calculate_slip(2950.0, 2700.0).unwrap();
        assert!((round_to(slip_pct, 2) - 8.47).abs() < 1e-9);
        assert_eq!(slip_rpm, 250.0);
        assert_eq!(classify_slip(slip_pct, &cfg.thresholds.electrical), SlipStatus::CriticalOverload);
    }

    #[test]
    fn test_slip_invalid_rated() {
        assert!(calculate_slip(0.0, 2900.0).is_none());
        assert!(calculate_slip(-10.0, 2900.0).is_none());
    }

    #[test]
    fn test_negative_slip_tolerance() {
        let mut cfg = PumpConfig::default();
        assert_eq!(classify_slip(-1.0, &cfg.thresholds.electrical), SlipStatus::Abnormal);
        cfg.thresholds.electrical.negative_slip_tolerance_pct = 2.0;
        assert_eq!(classify_slip(-1.0, &cfg.thresholds.electrical), SlipStatus::LowSlip);
        assert_eq!(classify_slip(-2.5, &cfg.thresholds.electrical), SlipStatus::Abnormal);
    }

    #[test]
    fn test_zone_boundaries_rigid() {
        let cfg = PumpConfig::default();
        let rigid = &cfg.vibration_limits.rigid;
        assert_eq!(classify_zone(2.8, rigid), IsoZone::A);
        assert_eq!(classify_zone(2.81, rigid), IsoZone::B);
        assert_eq!(classify_zone(4.5, rigid), IsoZone::B);
        assert_eq!(classify_zone(7.1, rigid), IsoZone::C);
        assert_eq!(classify_zone(7.2, rigid), IsoZone::D);
    }
}
