//! Thermal Evaluator - bearing temperature and rise above ambient (API 610 §11.3)
//!
//! Missing bearing readings are substituted with ambient, so they contribute
//! zero rise and never trip a threshold. Volatile products get an extra
//! CRITICAL override on the pump NDE bearing (mechanical seal side).

use tracing::debug;

use super::DomainEvaluator;
use crate::config::defaults::{REF_ALIGNMENT, REF_BEARING_TEMPERATURE, REF_SEAL_MONITORING};
use crate::config::{LubricantLimits, PumpConfig};
use crate::physics_engine::round_to;
use crate::types::{
    BearingLocation, BearingTemperature, Domain, DomainReport, DomainStatus, Lubricant,
    MeasurementSnapshot, MetricStatus, ProductType, ReportDetail, ThermalData, ThermalMetrics,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ThermalInput {
    pub temperatures: ThermalData,
    pub lubricant: Lubricant,
    pub product: ProductType,
}

impl ThermalInput {
    pub const fn from_snapshot(snapshot: &MeasurementSnapshot) -> Self {
        Self {
            temperatures: snapshot.thermal,
            lubricant: snapshot.specification.lubricant,
            product: snapshot.specification.product_type,
        }
    }
}

pub struct ThermalEvaluator;

impl DomainEvaluator for ThermalEvaluator {
    fn name(&self) -> &str {
        "Thermal"
    }

    fn domain(&self) -> Domain {
        Domain::Thermal
    }

    fn evaluate(&self, snapshot: &MeasurementSnapshot, config: &PumpConfig) -> DomainReport {
        evaluate(&ThermalInput::from_snapshot(snapshot), config)
    }
}

fn bearing(location: BearingLocation, reading: Option<f64>, ambient: f64, limits: &LubricantLimits) -> BearingTemperature {
    let temperature_c = reading.unwrap_or(ambient);
    let rise_c = temperature_c - ambient;
    let status = if temperature_c > limits.alarm_temp_c || rise_c > limits.alarm_rise_c {
        MetricStatus::Alarm
    } else if temperature_c > limits.warning_temp_c || rise_c > limits.warning_rise_c {
        MetricStatus::Warning
    } else {
        MetricStatus::Normal
    };
    BearingTemperature {
        location,
        temperature_c,
        rise_c: round_to(rise_c, 1),
        measured: reading.is_some(),
        status,
    }
}

pub fn evaluate(input: &ThermalInput, config: &PumpConfig) -> DomainReport {
    let th = &config.thresholds.thermal;
    let limits = config.lubricant_limits(input.lubricant);
    let volatile = config.product(input.product).volatile;
    let t = &input.temperatures;
    let ambient = t.ambient_c;

    let bearings: Vec<BearingTemperature> = BearingLocation::ALL
        .into_iter()
        .zip([t.motor_de_c, t.motor_nde_c, t.pump_de_c, t.pump_nde_c])
        .map(|(location, reading)| bearing(location, reading, ambient, limits))
        .collect();

    let max_temp = bearings.iter().map(|b| b.temperature_c).fold(ambient, f64::max);
    let max_rise = max_temp - ambient;
    let pump_de = t.pump_de_c.unwrap_or(ambient);
    let pump_nde = t.pump_nde_c.unwrap_or(ambient);
    let pump_nde_rise = pump_nde - ambient;
    let delta = (pump_de - pump_nde).abs();

    let mut findings = Vec::new();
    let mut status = DomainStatus::Normal;

    let seal_override = volatile && pump_nde_rise > th.volatile_nde_rise_critical_c;
    if seal_override {
        status = DomainStatus::Critical;
        findings.push(format!(
            "CRITICAL: Pump NDE bearing rise {pump_nde_rise:.1}°C > {:.0}°C for volatile product {} - seal failure imminent, shutdown required within 2 hours ({REF_SEAL_MONITORING})",
            th.volatile_nde_rise_critical_c, input.product
        ));
    }

    if max_temp > limits.alarm_temp_c || max_rise > limits.alarm_rise_c {
        status = DomainStatus::Critical;
        findings.push(format!(
            "CRITICAL: Max temperature {max_temp:.1}°C > {:.0}°C or rise {max_rise:.1}°C > {:.0}°C - bearing seizure imminent, shutdown required within 2 hours",
            limits.alarm_temp_c, limits.alarm_rise_c
        ));
    } else if max_temp > limits.warning_temp_c || max_rise > limits.warning_rise_c {
        status = status.escalate(DomainStatus::Alarm);
        findings.push(format!(
            "WARNING: Max temperature {max_temp:.1}°C > {:.0}°C or rise {max_rise:.1}°C > {:.0}°C - check bearing lubrication and cooling within 72 hours",
            limits.warning_temp_c, limits.warning_rise_c
        ));
    }

    let misalignment_suspected = delta > th.differential_alarm_c;
    if misalignment_suspected {
        findings.push(format!(
            "Pump DE-NDE temperature difference {delta:.1}°C > {:.0}°C - possible misalignment, check coupling alignment ({REF_ALIGNMENT})",
            th.differential_alarm_c
        ));
    } else if delta > th.differential_monitor_c {
        findings.push(format!(
            "Pump DE-NDE temperature difference {delta:.1}°C > {:.0}°C - monitor for misalignment development",
            th.differential_monitor_c
        ));
    }

    let has_issue = status != DomainStatus::Normal;
    if findings.is_empty() {
        findings.push(format!("Bearing temperatures within normal limits ({REF_BEARING_TEMPERATURE})"));
    }

    debug!(
        max_temp = max_temp,
        max_rise = max_rise,
        delta = delta,
        seal_override = seal_override,
        status = %status,
        "Thermal evaluation"
    );

    DomainReport {
        status,
        has_issue,
        findings,
        standard_ref: format!("{REF_BEARING_TEMPERATURE}, {REF_SEAL_MONITORING}"),
        detail: ReportDetail::Thermal(ThermalMetrics {
            lubricant: input.lubricant,
            ambient_c: ambient,
            bearings,
            max_temperature_c: round_to(max_temp, 1),
            max_rise_c: round_to(max_rise, 1),
            pump_de_nde_delta_c: round_to(delta, 1),
            misalignment_suspected,
            seal_override,
        }),
    }
}
