//! Diagnosis Regression Tests
//!
//! Runs complete snapshots through `DiagnosisEngine` and pins the root-cause
//! selection, power-off gate, risk bounds and audit export. Snapshots are
//! built from JSON the way field tablets submit them.

use pump_cbm::types::{
    AxisReading, FaultHypothesis, LoadStatus, MetricStatus, ProductType, SlipStatus,
};
use pump_cbm::{
    audit_rows, render_csv, DiagnosisEngine, Domain, DomainStatus, MeasurementSnapshot,
    PrimaryDomain, PumpConfig, RiskLevel,
};

fn engine() -> DiagnosisEngine {
    DiagnosisEngine::new(PumpConfig::default())
}

/// A pump running cleanly at BEP with balanced supply and cool bearings.
fn healthy_json() -> &'static str {
    r#"{
        "metadata": { "pump_tag": "P-101A", "location": "Tank farm 2", "inspection_date": "2026-03-10" },
        "specification": { "product_type": "Diesel", "pump_size": "Medium", "installation_year": 2018 },
        "vibration": {
            "driver": { "horizontal": { "de": 1.2, "nde": 1.0 }, "vertical": { "de": 0.9, "nde": 0.8 }, "axial": { "de": 0.7, "nde": 0.6 } },
            "driven": { "horizontal": { "de": 1.4, "nde": 1.1 }, "vertical": { "de": 1.0, "nde": 0.9 }, "axial": { "de": 0.8, "nde": 0.7 } }
        },
        "operational": { "suction_pressure_kpa": 150.0, "discharge_pressure_kpa": 600.0, "flow_rate_m3h": 100.0 },
        "electrical": { "voltages_v": [380.0, 380.0, 380.0], "currents_a": [28.0, 28.0, 28.0] },
        "thermal": { "motor_de_c": 55.0, "motor_nde_c": 52.0, "pump_de_c": 58.0, "pump_nde_c": 56.0, "ambient_c": 30.0 },
        "actual_rpm": 2900.0
    }"#
}

fn healthy() -> MeasurementSnapshot {
    serde_json::from_str(healthy_json()).expect("fixture must parse")
}

// ============================================================================
// Normal operation
// ============================================================================

#[test]
fn healthy_pump_is_normal_with_zero_risk() {
    let report = engine().diagnose(&healthy());
    for analysis in &report.analyses {
        assert!(!analysis.has_issue, "{} flagged: {:?}", analysis.domain(), analysis.findings);
    }
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Normal);
    assert!(report.diagnosis.secondary_note.is_none());
    assert!(!report.diagnosis.requires_validation);
    assert_eq!(report.action_plan.risk_score, 0);
    assert_eq!(report.action_plan.risk_level, RiskLevel::Low);
    assert_eq!(report.action_plan.actions.len(), 1);
}

#[test]
fn balanced_supply_at_93_percent_load_is_normal() {
    let mut s = healthy();
    s.actual_rpm = None;
    let report = engine().diagnose(&s);
    let electrical = report.analyses[1].as_electrical().expect("electrical detail");
    assert!(electrical.voltage.imbalance_pct.abs() < f64::EPSILON);
    assert!(electrical.current.imbalance_pct.abs() < f64::EPSILON);
    assert_eq!(electrical.current.status, MetricStatus::Normal);
    assert!((electrical.load_pct - 93.3).abs() < 0.05);
    assert_eq!(electrical.load_status, LoadStatus::Normal);
    assert_eq!(electrical.slip.status, SlipStatus::NotMeasured);
    assert!(!report.analyses[1].has_issue);
}

#[test]
fn flow_at_120_percent_of_bep_is_still_normal() {
    let mut s = healthy();
    s.specification.product_type = ProductType::Gasoline;
    s.operational.suction_pressure_kpa = 50.0;
    s.operational.discharge_pressure_kpa = 400.0;
    s.operational.flow_rate_m3h = 120.0;
    let report = engine().diagnose(&s);
    let hydraulic = report.analyses[0].as_hydraulic().expect("hydraulic detail");
    assert!((hydraulic.flow_ratio - 1.2).abs() < f64::EPSILON);
    assert!(!hydraulic.flow_issue());
    assert!(!hydraulic.hf_high);
    // Only the NPSHa margin can raise a hydraulic issue here
    assert_eq!(report.analyses[0].has_issue, hydraulic.npsh_margin_m < 0.0);
}

#[test]
fn negative_phase_currents_are_invalid_not_underload() {
    let mut s = healthy();
    s.electrical.currents_a = [-28.0; 3];
    let report = engine().diagnose(&s);
    assert_eq!(report.analyses[1].status, DomainStatus::Invalid);
    assert!(!report.analyses[1].has_issue);
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Normal);
    assert_eq!(report.action_plan.risk_score, 0);
}

// ============================================================================
// Root-cause precedence
// ============================================================================

#[test]
fn high_slip_is_an_electrical_issue() {
    let mut s = healthy();
    s.actual_rpm = Some(2700.0);
    let report = engine().diagnose(&s);
    let slip = report.analyses[1].as_electrical().expect("electrical detail").slip;
    assert!((slip.slip_pct.expect("slip measured") - 8.47).abs() < 0.01);
    assert!(matches!(slip.status, SlipStatus::HighSlip | SlipStatus::CriticalOverload));
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Electrical);
}

#[test]
fn thermal_only_fault_has_no_secondary_note() {
    let mut s = healthy();
    s.thermal.pump_de_c = Some(99.0);
    let report = engine().diagnose(&s);
    assert_eq!(report.analyses[3].status, DomainStatus::Critical);
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Thermal);
    assert!(report.diagnosis.secondary_note.is_none());
    assert!(!report.diagnosis.requires_validation);
}

#[test]
fn hydraulic_outranks_mechanical_and_thermal() {
    let mut s = healthy();
    s.operational.flow_rate_m3h = 40.0;
    s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
    s.thermal.pump_de_c = Some(99.0);
    let report = engine().diagnose(&s);

    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Hydraulic);
    assert!(report.diagnosis.secondary_note.is_some());
    assert!(!report.diagnosis.requires_validation);
    let domains: Vec<Domain> = report.diagnosis.all_issues.iter().map(|r| r.domain()).collect();
    assert_eq!(domains, vec![Domain::Hydraulic, Domain::Mechanical, Domain::Thermal]);
}

#[test]
fn electrical_outranks_mechanical_and_mentions_it() {
    let mut s = healthy();
    s.electrical.currents_a = [28.0, 31.0, 25.0];
    s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
    let report = engine().diagnose(&s);
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Electrical);
    assert!(report.diagnosis.secondary_note.is_some());
    assert!(!report.diagnosis.requires_validation);
}

#[test]
fn clean_electrical_mechanical_fault_requires_power_off_test() {
    let mut s = healthy();
    s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
    let report = engine().diagnose(&s);
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Mechanical);
    assert!(report.diagnosis.requires_validation);
    let mechanical = report.analyses[2].as_mechanical().expect("vibration detail");
    assert_eq!(mechanical.fault, Some(FaultHypothesis::Unbalance));
    assert!(report.summary.headline.contains("POWER-OFF TEST REQUIRED"));
}

#[test]
fn low_vibration_never_names_a_fault_without_demodulation() {
    let report = engine().diagnose(&healthy());
    let mechanical = report.analyses[2].as_mechanical().expect("vibration detail");
    assert!(mechanical.fault.is_none());
    assert!(!report.analyses[2].has_issue);

    let mut s = healthy();
    s.vibration.driven.demod_de_g = 0.35;
    let report = engine().diagnose(&s);
    let mechanical = report.analyses[2].as_mechanical().expect("vibration detail");
    assert!(mechanical.fault.is_none());
    assert!(report.analyses[2].has_issue, "demodulation alone flags the bearing");
    assert_eq!(report.diagnosis.primary_domain, PrimaryDomain::Mechanical);
}

// ============================================================================
// Spectral
// ============================================================================

#[test]
fn one_x_peak_is_classified_as_unbalance() {
    let mut s = healthy();
    s.actual_rpm = None;
    s.fft_peaks = serde_json::from_str(
        r#"[{ "component": "Driven", "direction": "H", "frequency_hz": 49.2, "amplitude_mm_s": 3.0 }]"#,
    )
    .expect("peaks parse");
    let report = engine().diagnose(&s);
    let spectral = report
        .spectral()
        .and_then(|r| r.as_spectral())
        .expect("spectral report present");
    assert!((spectral.shaft_frequency_hz - 49.17).abs() < f64::EPSILON);
    assert_eq!(spectral.findings.len(), 1);
    assert!((spectral.findings[0].ratio - 1.0006).abs() < 0.001);
    assert_eq!(spectral.findings[0].hypothesis, FaultHypothesis::Unbalance);
}

// ============================================================================
// Risk
// ============================================================================

#[test]
fn risk_score_bounded_and_monotonic_in_age() {
    fn low_flow(s: &mut MeasurementSnapshot) {
        s.operational.flow_rate_m3h = 30.0;
    }
    fn phase_imbalance(s: &mut MeasurementSnapshot) {
        s.electrical.currents_a = [20.0, 31.0, 25.0];
    }
    fn axial_vibration(s: &mut MeasurementSnapshot) {
        s.vibration.driven.axial = AxisReading::new(9.0, 9.0);
    }
    fn hot_motor_bearing(s: &mut MeasurementSnapshot) {
        s.thermal.motor_nde_c = Some(101.0);
    }
    fn naphtha_cavitation(s: &mut MeasurementSnapshot) {
        s.specification.product_type = ProductType::Naphtha;
        s.operational.suction_pressure_kpa = -60.0;
        s.vibration.driven.hf_de_g = 2.0;
    }
    let scenarios: [fn(&mut MeasurementSnapshot); 5] =
        [low_flow, phase_imbalance, axial_vibration, hot_motor_bearing, naphtha_cavitation];

    for apply in &scenarios {
        let mut previous = 0;
        for year in [2024, 2012, 1990] {
            let mut s = healthy();
            apply(&mut s);
            s.specification.installation_year = year;
            let score = engine().diagnose(&s).action_plan.risk_score;
            assert!(score <= 100);
            assert!(score >= previous, "risk must not fall as the pump ages");
            previous = score;
        }
        assert!(previous > 0);
    }
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn audit_csv_matches_rows() {
    let mut s = healthy();
    s.vibration.driven.horizontal = AxisReading::new(8.0, 8.0);
    let report = engine().diagnose(&s);
    let rows = audit_rows(&report);
    let csv = render_csv(&report).expect("csv renders");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().expect("csv parses");
    assert_eq!(records.len(), rows.len());
    let gate = records
        .iter()
        .find(|r| &r[1] == "Power-off validation")
        .expect("gate row present");
    assert_eq!(&gate[2], "REQUIRED");
    assert_eq!(
        records.iter().filter(|r| &r[0] == "Action").count(),
        report.action_plan.actions.len()
    );
}

#[test]
fn identical_snapshots_give_identical_reports() {
    let a = serde_json::to_string(&engine().diagnose(&healthy())).expect("serialize");
    let b = serde_json::to_string(&engine().diagnose(&healthy())).expect("serialize");
    assert_eq!(a, b);
}
