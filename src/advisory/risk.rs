//! Risk scoring (ISO 55001 §8.2)
//!
//! `risk_score = round(min(product_risk_factor × severity_multiplier × age_factor, max_score))`
//!
//! The product risk factor (1..5) comes from the product table, the severity
//! multiplier (2..5) from the worst sub-condition of the primary domain, and
//! the age factor from the installation age.

use crate::config::{PumpConfig, RiskConfig};
use crate::types::{
    CavitationState, DiagnosisResult, Domain, DomainReport, DomainStatus, IsoZone, MeasurementSnapshot,
};

/// Installation age in years, measured against the inspection date when
/// known, otherwise against the fleet reference year.
pub fn installation_age(snapshot: &MeasurementSnapshot, config: &PumpConfig) -> i32 {
    use chrono::Datelike;

    let year = snapshot
        .metadata
        .inspection_date
        .map_or(config.fleet.reference_year, |d| d.year());
    year - snapshot.specification.installation_year
}

pub fn age_factor(age_years: i32, risk: &RiskConfig) -> f64 {
    if age_years > risk.age_old_years {
        risk.age_factor_old
    } else if age_years > risk.age_moderate_years {
        risk.age_factor_moderate
    } else {
        1.0
    }
}

fn zone_multiplier(zone: IsoZone, risk: &RiskConfig) -> u8 {
    let m = &risk.multipliers;
    match zone {
        IsoZone::D => m.mechanical_zone_d,
        IsoZone::C => m.mechanical_zone_c,
        IsoZone::A | IsoZone::B => m.baseline,
    }
}

/// Multiplier for the primary domain's worst sub-condition.
///
/// `analyses` holds every evaluator report, so the zone of the vibration
/// report is available even when only the spectral report raised the issue.
pub fn severity_multiplier(diagnosis: &DiagnosisResult, analyses: &[DomainReport], risk: &RiskConfig) -> u8 {
    let m = &risk.multipliers;
    let Some(report) = diagnosis.primary_report.as_ref() else {
        return 0;
    };

    match report.domain() {
        Domain::Hydraulic => match report.as_hydraulic() {
            Some(h) if h.cavitation == CavitationState::Confirmed => m.hydraulic_confirmed_cavitation,
            Some(h) if h.flow_issue() => m.hydraulic_flow,
            _ => m.baseline,
        },
        Domain::Electrical => match report.status {
            DomainStatus::Critical => m.electrical_critical,
            DomainStatus::Warning | DomainStatus::Alarm | DomainStatus::Abnormal => m.electrical_warning,
            DomainStatus::Normal | DomainStatus::Invalid => m.baseline,
        },
        Domain::Mechanical => {
            let zone = analyses
                .iter()
                .find_map(DomainReport::as_mechanical)
                .map_or(m.baseline, |v| zone_multiplier(v.overall_zone, risk));
            let spectral_issue = diagnosis
                .issues_in(Domain::Mechanical)
                .any(DomainReport::is_spectral);
            if spectral_issue {
                zone.max(m.mechanical_spectral)
            } else {
                zone
            }
        }
        Domain::Thermal => match report.status {
            DomainStatus::Critical => m.thermal_critical,
            DomainStatus::Alarm | DomainStatus::Warning => m.thermal_warning,
            _ => m.baseline,
        },
    }
}

/// Clamped, rounded risk score.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn risk_score(risk_factor: u8, multiplier: u8, age_factor: f64, max_score: u8) -> u8 {
    let raw = f64::from(risk_factor) * f64::from(multiplier) * age_factor;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.min(f64::from(max_score)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_age_bands() {
        let risk = RiskConfig::default();
        assert_eq!(age_factor(8, &risk), 1.0);
        assert_eq!(age_factor(10, &risk), 1.0);
        assert_eq!(age_factor(11, &risk), 1.2);
        assert_eq!(age_factor(15, &risk), 1.2);
        assert_eq!(age_factor(16, &risk), 1.5);
    }

    #[test]
    fn test_age_uses_inspection_year_when_known() {
        let config = PumpConfig::default();
        let mut snapshot = MeasurementSnapshot::default();
        snapshot.specification.installation_year = 2010;
        assert_eq!(installation_age(&snapshot, &config), 16);

        snapshot.metadata.inspection_date = NaiveDate::from_ymd_opt(2030, 6, 1);
        assert_eq!(installation_age(&snapshot, &config), 20);
    }

    #[test]
    fn test_score_examples() {
        // Gasoline (5) with confirmed cavitation (×5) on a 16-year-old pump
        assert_eq!(risk_score(5, 5, 1.5, 100), 38);
        // Diesel (3), zone C (×3), new pump
        assert_eq!(risk_score(3, 3, 1.0, 100), 9);
        // Diesel (3), electrical warning (×3), 12 years: 10.8 rounds up
        assert_eq!(risk_score(3, 3, 1.2, 100), 11);
    }

    #[test]
    fn test_score_is_clamped_and_monotonic_in_age() {
        assert_eq!(risk_score(5, 5, 1.5, 30), 30);
        let mut last = 0;
        for factor in [1.0, 1.2, 1.5] {
            let score = risk_score(4, 4, factor, 100);
            assert!(score >= last);
            last = score;
        }
        assert_eq!(risk_score(5, 5, f64::NAN, 100), 0);
    }

    #[test]
    fn test_normal_diagnosis_has_no_multiplier() {
        assert_eq!(severity_multiplier(&DiagnosisResult::normal(), &[], &RiskConfig::default()), 0);
    }
}
