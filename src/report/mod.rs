//! Audit table
//!
//! Flattens a [`DiagnosisReport`] into one row per evaluated metric and one
//! row per action, for export to a spreadsheet. `to_csv` renders the rows
//! into an in-memory string with a header line taken from the field names.

use serde::Serialize;
use thiserror::Error;

use crate::config::defaults::{
    REF_ALIGNMENT, REF_BEARING_DAMAGE, REF_BEARING_TEMPERATURE, REF_ELECTRICAL, REF_NPSH,
    REF_OPERATING_REGION, REF_POWER_OFF_TEST, REF_SPECTRAL, REF_VIBRATION_ZONES,
};
use crate::pipeline::DiagnosisReport;
use crate::types::{
    ActionPlan, CavitationState, DiagnosisResult, DomainReport, ElectricalMetrics, FlowStatus, Grade,
    HydraulicMetrics, IsoZone, MachineSeverity, MechanicalMetrics, SpectralAnalysis,
    ThermalMetrics,
};

const NO_ACTION: &str = "None";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush error: {0}")]
    IntoInner(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One line of the audit table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuditRow {
    pub category: String,
    pub parameter: String,
    pub value: String,
    pub status: String,
    pub recommendation: String,
    pub standard_ref: String,
}

impl AuditRow {
    fn new(
        category: &str,
        parameter: impl Into<String>,
        value: impl Into<String>,
        status: impl ToString,
        recommendation: impl Into<String>,
        standard_ref: impl Into<String>,
    ) -> Self {
        Self {
            category: category.to_string(),
            parameter: parameter.into(),
            value: value.into(),
            status: status.to_string(),
            recommendation: recommendation.into(),
            standard_ref: standard_ref.into(),
        }
    }
}

// ============================================================================
// Row builders
// ============================================================================

fn hydraulic_rows(m: &HydraulicMetrics) -> Vec<AuditRow> {
    const CAT: &str = "Hydraulic";
    let margin_status = if m.npsh_margin_m < 0.0 { "LOW" } else { "OK" };
    let flow_advice = match m.flow_status {
        FlowStatus::Normal => NO_ACTION,
        FlowStatus::RecirculationRisk => "Increase flow towards BEP",
        FlowStatus::OverloadCavitationRisk => "Throttle discharge towards BEP",
    };
    let cavitation = match m.cavitation {
        CavitationState::None => "NONE",
        CavitationState::Potential => "POTENTIAL",
        CavitationState::Suspected => "SUSPECTED",
        CavitationState::Confirmed => "CONFIRMED",
    };

    vec![
        AuditRow::new(
            CAT,
            "NPSHa",
            format!("{:.2} m (NPSHr {:.2} m)", m.npsha_m, m.npshr_m),
            margin_status,
            NO_ACTION,
            REF_NPSH,
        ),
        AuditRow::new(
            CAT,
            "NPSHa margin",
            format!("{:.2} m", m.npsh_margin_m),
            margin_status,
            if m.npsh_margin_m < 0.0 { "Raise suction pressure" } else { NO_ACTION },
            REF_NPSH,
        ),
        AuditRow::new(
            CAT,
            "Flow ratio",
            format!("{:.2} x BEP ({:.1} m3/h)", m.flow_ratio, m.flow_rate_m3h),
            m.flow_status,
            flow_advice,
            REF_OPERATING_REGION,
        ),
        AuditRow::new(
            CAT,
            "HF acceleration max",
            format!("{:.2} g (limit {:.2} g)", m.hf.max(), m.hf_threshold_g),
            if m.hf_high { "HIGH" } else { "NORMAL" },
            NO_ACTION,
            REF_NPSH,
        ),
        AuditRow::new(
            CAT,
            "Cavitation risk",
            cavitation,
            m.cavitation_risk(),
            if m.cavitation == CavitationState::None { NO_ACTION } else { "Verify suction conditions" },
            REF_NPSH,
        ),
    ]
}

fn electrical_rows(m: &ElectricalMetrics) -> Vec<AuditRow> {
    const CAT: &str = "Electrical";
    let slip_value = m
        .slip
        .slip_pct
        .map_or_else(|| "not measured".to_string(), |pct| format!("{pct:.2}%"));

    vec![
        AuditRow::new(
            CAT,
            "Voltage imbalance",
            format!("{:.2}% (avg {:.1} V)", m.voltage.imbalance_pct, m.voltage.average),
            m.voltage.status,
            NO_ACTION,
            REF_ELECTRICAL,
        ),
        AuditRow::new(
            CAT,
            "Current imbalance",
            format!("{:.2}% (avg {:.1} A)", m.current.imbalance_pct, m.current.average),
            m.current.status,
            NO_ACTION,
            REF_ELECTRICAL,
        ),
        AuditRow::new(
            CAT,
            "Motor load",
            format!("{:.1}% of {:.1} A FLA", m.load_pct, m.full_load_amps),
            m.load_status,
            NO_ACTION,
            REF_ELECTRICAL,
        ),
        AuditRow::new(CAT, "Slip", slip_value, m.slip.status, NO_ACTION, REF_ELECTRICAL),
    ]
}

fn zone_advice(zone: IsoZone) -> &'static str {
    match zone {
        IsoZone::A | IsoZone::B => NO_ACTION,
        IsoZone::C => "Plan corrective maintenance",
        IsoZone::D => "Schedule shutdown",
    }
}

fn machine_row(severity: &MachineSeverity) -> AuditRow {
    AuditRow::new(
        "Mechanical",
        format!("{} velocity", severity.machine),
        format!("{:.2} mm/s", severity.averages.max()),
        severity.zone.description(),
        zone_advice(severity.zone),
        REF_VIBRATION_ZONES,
    )
}

fn mechanical_rows(m: &MechanicalMetrics) -> Vec<AuditRow> {
    let mut rows = vec![machine_row(&m.driver), machine_row(&m.driven)];
    if let Some(fault) = m.fault {
        rows.push(AuditRow::new(
            "Mechanical",
            "Fault hypothesis",
            format!("{fault} ({})", m.dominant_direction),
            m.fault_confidence,
            fault.likely_cause(),
            REF_VIBRATION_ZONES,
        ));
    }
    rows.push(AuditRow::new(
        "Mechanical",
        "Demodulation",
        format!("{:.2} g", m.demod_max_g),
        m.bearing_defect_risk,
        if m.bearing_defect_risk > Grade::Low { "Inspect bearings" } else { NO_ACTION },
        REF_BEARING_DAMAGE,
    ));
    rows
}

fn thermal_rows(m: &ThermalMetrics) -> Vec<AuditRow> {
    const CAT: &str = "Thermal";
    let mut rows: Vec<AuditRow> = m
        .bearings
        .iter()
        .map(|b| {
            let value = if b.measured {
                format!("{:.1} °C (rise {:.1} °C)", b.temperature_c, b.rise_c)
            } else {
                "not measured".to_string()
            };
            AuditRow::new(CAT, b.location.to_string(), value, b.status, NO_ACTION, REF_BEARING_TEMPERATURE)
        })
        .collect();

    rows.push(AuditRow::new(
        CAT,
        "Max temperature rise",
        format!("{:.1} °C over {:.1} °C ambient ({})", m.max_rise_c, m.ambient_c, m.lubricant),
        if m.seal_override { "SEAL LIMIT" } else { "-" },
        if m.seal_override { "Monitor mechanical seal" } else { NO_ACTION },
        REF_BEARING_TEMPERATURE,
    ));
    rows.push(AuditRow::new(
        CAT,
        "Pump DE-NDE differential",
        format!("{:.1} °C", m.pump_de_nde_delta_c),
        if m.misalignment_suspected { "MISALIGNMENT SUSPECTED" } else { "NORMAL" },
        if m.misalignment_suspected { "Check shaft alignment" } else { NO_ACTION },
        REF_ALIGNMENT,
    ));
    rows
}

fn spectral_rows(s: &SpectralAnalysis) -> Vec<AuditRow> {
    s.findings
        .iter()
        .map(|f| {
            AuditRow::new(
                "Spectral",
                format!("{} {} {:.2} Hz", f.component, f.direction, f.frequency_hz),
                format!("{:.2}x RPM, {:.2} mm/s", f.ratio, f.amplitude_mm_s),
                f.confidence,
                format!("{} - {}", f.hypothesis, f.hypothesis.likely_cause()),
                REF_SPECTRAL,
            )
        })
        .collect()
}

fn domain_rows(report: &DomainReport) -> Vec<AuditRow> {
    if let Some(m) = report.as_hydraulic() {
        hydraulic_rows(m)
    } else if let Some(m) = report.as_electrical() {
        electrical_rows(m)
    } else if let Some(m) = report.as_mechanical() {
        mechanical_rows(m)
    } else if let Some(m) = report.as_thermal() {
        thermal_rows(m)
    } else if let Some(s) = report.as_spectral() {
        spectral_rows(s)
    } else {
        Vec::new()
    }
}

fn diagnosis_rows(diagnosis: &DiagnosisResult, plan: &ActionPlan) -> Vec<AuditRow> {
    let primary_ref = diagnosis
        .primary_report
        .as_ref()
        .map_or_else(|| "-".to_string(), |r| r.standard_ref.clone());
    vec![
        AuditRow::new(
            "Diagnosis",
            "Primary domain",
            diagnosis.primary_domain.to_string(),
            format!("{} (score {})", plan.risk_level, plan.risk_score),
            diagnosis.secondary_note.clone().unwrap_or_else(|| NO_ACTION.to_string()),
            primary_ref,
        ),
        AuditRow::new(
            "Diagnosis",
            "Power-off validation",
            if diagnosis.requires_validation { "REQUIRED" } else { "NOT REQUIRED" },
            if diagnosis.requires_validation { "PENDING" } else { "-" },
            if diagnosis.requires_validation {
                "Perform coast-down test before mechanical repair"
            } else {
                NO_ACTION
            },
            REF_POWER_OFF_TEST,
        ),
    ]
}

fn action_rows(plan: &ActionPlan) -> Vec<AuditRow> {
    plan.actions
        .iter()
        .map(|a| {
            let value = match a.due_by {
                Some(date) => format!("{} (due {date})", a.timeline),
                None => a.timeline.to_string(),
            };
            AuditRow::new(
                "Action",
                a.priority.to_string(),
                value,
                a.responsible_party,
                a.description.clone(),
                a.standard_ref.clone(),
            )
        })
        .collect()
}

/// Flatten a diagnosis into audit rows: evaluator metrics in analysis order,
/// then the diagnosis verdict, then the action plan.
pub fn audit_rows(report: &DiagnosisReport) -> Vec<AuditRow> {
    let mut rows: Vec<AuditRow> = report.analyses.iter().flat_map(domain_rows).collect();
    rows.extend(diagnosis_rows(&report.diagnosis, &report.action_plan));
    rows.extend(action_rows(&report.action_plan));
    rows
}

/// Render rows as CSV with a header line.
pub fn to_csv(rows: &[AuditRow]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::IntoInner(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn render_csv(report: &DiagnosisReport) -> Result<String, ReportError> {
    to_csv(&audit_rows(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DiagnosisEngine;
    use crate::types::{AxisReading, Direction, FftPeak, Machine, MeasurementSnapshot};

    fn healthy() -> MeasurementSnapshot {
        let mut s = MeasurementSnapshot::default();
        s.electrical.currents_a = [28.0; 3];
        s.operational.suction_pressure_kpa = 150.0;
        s.operational.discharge_pressure_kpa = 600.0;
        s.operational.flow_rate_m3h = 100.0;
        s
    }

    fn count(rows: &[AuditRow], category: &str) -> usize {
        rows.iter().filter(|r| r.category == category).count()
    }

    #[test]
    fn test_healthy_pump_row_layout() {
        let report = DiagnosisEngine::default().diagnose(&healthy());
        let rows = audit_rows(&report);

        assert_eq!(count(&rows, "Hydraulic"), 5);
        assert_eq!(count(&rows, "Electrical"), 4);
        // Driver, driven, demodulation: no fault below the ceiling
        assert_eq!(count(&rows, "Mechanical"), 3);
        assert_eq!(count(&rows, "Thermal"), 6);
        assert_eq!(count(&rows, "Spectral"), 0);
        assert_eq!(count(&rows, "Diagnosis"), 2);
        assert_eq!(count(&rows, "Action"), 1);

        let primary = rows.iter().find(|r| r.parameter == "Primary domain").unwrap();
        assert_eq!(primary.value, "NORMAL");
    }

    #[test]
    fn test_zone_d_adds_fault_row_and_validation() {
        let mut s = healthy();
        s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
        let report = DiagnosisEngine::default().diagnose(&s);
        let rows = audit_rows(&report);

        let fault = rows.iter().find(|r| r.parameter == "Fault hypothesis").unwrap();
        assert!(fault.value.starts_with("Unbalance"));
        let pump = rows.iter().find(|r| r.parameter == "Driven (Pump) velocity").unwrap();
        assert_eq!(pump.status, "Zone D (Unacceptable)");
        let gate = rows.iter().find(|r| r.parameter == "Power-off validation").unwrap();
        assert_eq!(gate.value, "REQUIRED");
        assert_eq!(count(&rows, "Action"), report.action_plan.actions.len());
    }

    #[test]
    fn test_one_row_per_spectral_finding() {
        let mut s = healthy();
        s.fft_peaks = vec![
            FftPeak { component: Machine::Driven, direction: Direction::Horizontal, frequency_hz: 49.2, amplitude_mm_s: 3.1 },
            FftPeak { component: Machine::Driven, direction: Direction::Axial, frequency_hz: 98.4, amplitude_mm_s: 1.2 },
        ];
        let report = DiagnosisEngine::default().diagnose(&s);
        let rows = audit_rows(&report);
        let expected = report.spectral().and_then(DomainReport::as_spectral).unwrap().findings.len();
        assert_eq!(expected, 2);
        assert_eq!(count(&rows, "Spectral"), expected);
    }

    #[test]
    fn test_csv_has_header_and_one_line_per_row() {
        let report = DiagnosisEngine::default().diagnose(&healthy());
        let rows = audit_rows(&report);
        let csv = to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("category,parameter,value,status,recommendation,standard_ref")
        );
        assert_eq!(lines.count(), rows.len());
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let row = AuditRow::new("Action", "HIGH", "< 24 hours", "Operator", "Stop, then inspect", "API 610");
        let csv = to_csv(&[row]).unwrap();
        assert!(csv.contains("\"Stop, then inspect\""));
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }
}
