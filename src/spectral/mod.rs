//! Spectral Fault Matcher (ISO 13373-3 §6.2.2)
//!
//! Classifies each supplied FFT peak by its ratio to shaft speed. Findings
//! keep the order the peaks were supplied in.
//!
//! ## Bands (inclusive, configurable)
//!
//! | Ratio | Hypothesis | Confidence |
//! |---|---|---|
//! | 0.95–1.05 | Unbalance (1×) | HIGH if amplitude > 2.0 mm/s, else MEDIUM |
//! | 1.95–2.05 | Misalignment (2×) | HIGH if amplitude > 2.0 mm/s, else MEDIUM |
//! | 0.35–0.45 | Outer race defect (BPFO) | MEDIUM |
//! | 0.55–0.65 | Inner race defect (BPFI) | MEDIUM |
//! | 6.0–8.0 | Vane pass instability | MEDIUM |
//! | anything else | Unclassified | LOW |
//!
//! Peaks at or below the noise floor (0.5 mm/s) or the minimum frequency are
//! dropped. A non-positive RPM yields no findings at all.

pub mod harmonics;

use tracing::{debug, warn};

use crate::config::defaults::REF_SPECTRAL;
use crate::config::{PumpConfig, SpectralThresholds};
use crate::physics_engine::round_to;
use crate::types::{
    DomainReport, DomainStatus, FaultHypothesis, FftPeak, Grade, MeasurementSnapshot, ReportDetail,
    SpectralAnalysis, SpectralFinding,
};

/// Match a single peak against the ratio bands.
fn classify_ratio(ratio: f64, amplitude: f64, th: &SpectralThresholds) -> (FaultHypothesis, Grade) {
    let running_speed_confidence = if amplitude > th.high_confidence_amplitude_mm_s {
        Grade::High
    } else {
        Grade::Medium
    };

    if th.unbalance.contains(ratio) {
        (FaultHypothesis::Unbalance, running_speed_confidence)
    } else if th.misalignment.contains(ratio) {
        (FaultHypothesis::Misalignment, running_speed_confidence)
    } else if th.outer_race.contains(ratio) {
        (FaultHypothesis::OuterRaceDefect, Grade::Medium)
    } else if th.inner_race.contains(ratio) {
        (FaultHypothesis::InnerRaceDefect, Grade::Medium)
    } else if th.vane_pass.contains(ratio) {
        (FaultHypothesis::VanePassInstability, Grade::Medium)
    } else {
        (FaultHypothesis::Unclassified, Grade::Low)
    }
}

/// Classify every peak above the noise floor at the given shaft speed.
pub fn analyze(peaks: &[FftPeak], rpm: f64, th: &SpectralThresholds) -> SpectralAnalysis {
    if rpm <= 0.0 || !rpm.is_finite() {
        return SpectralAnalysis { rpm, shaft_frequency_hz: 0.0, findings: Vec::new() };
    }
    let shaft_hz = rpm / 60.0;

    let findings = peaks
        .iter()
        .filter(|p| p.frequency_hz > th.min_frequency_hz && p.amplitude_mm_s > th.noise_floor_mm_s)
        .map(|p| {
            let ratio = p.frequency_hz / shaft_hz;
            let (hypothesis, confidence) = classify_ratio(ratio, p.amplitude_mm_s, th);
            SpectralFinding {
                component: p.component,
                direction: p.direction,
                frequency_hz: p.frequency_hz,
                amplitude_mm_s: p.amplitude_mm_s,
                ratio,
                hypothesis,
                confidence,
            }
        })
        .collect();

    SpectralAnalysis { rpm, shaft_frequency_hz: round_to(shaft_hz, 2), findings }
}

/// Spectral report for a snapshot, or `None` when no peaks were supplied.
///
/// Uses the measured RPM when present, otherwise rated RPM.
pub fn evaluate(snapshot: &MeasurementSnapshot, config: &PumpConfig) -> Option<DomainReport> {
    if snapshot.fft_peaks.is_empty() {
        return None;
    }
    let rpm = snapshot.actual_rpm.unwrap_or(snapshot.specification.rated_rpm);
    let analysis = analyze(&snapshot.fft_peaks, rpm, &config.thresholds.spectral);

    if rpm <= 0.0 || !rpm.is_finite() {
        warn!(rpm = rpm, "Spectral analysis skipped: RPM invalid");
        return Some(DomainReport {
            status: DomainStatus::Invalid,
            has_issue: false,
            findings: vec![format!("FFT peaks supplied but RPM {rpm:.0} is invalid - spectral analysis skipped")],
            standard_ref: REF_SPECTRAL.to_string(),
            detail: ReportDetail::Spectral(analysis),
        });
    }

    let top = analysis.findings.iter().map(|f| f.confidence).max();
    let status = match top {
        Some(Grade::High) => DomainStatus::Alarm,
        Some(Grade::Medium) => DomainStatus::Warning,
        Some(Grade::Low) | None => DomainStatus::Normal,
    };
    let has_issue = top.is_some_and(|g| g >= Grade::Medium);

    let mut findings: Vec<String> = analysis
        .findings
        .iter()
        .map(|f| {
            format!(
                "FFT peak {:.1} Hz ({:.2}x RPM) on {} {}: {} - {} [{}]",
                f.frequency_hz,
                f.ratio,
                f.component,
                f.direction.code(),
                f.hypothesis.signature(),
                f.hypothesis.likely_cause(),
                f.confidence
            )
        })
        .collect();
    if findings.is_empty() {
        findings.push(format!(
            "No FFT peaks above the {:.1} mm/s noise floor",
            config.thresholds.spectral.noise_floor_mm_s
        ));
    }

    debug!(
        rpm = rpm,
        findings = analysis.findings.len(),
        status = %status,
        "Spectral evaluation"
    );

    Some(DomainReport {
        status,
        has_issue,
        findings,
        standard_ref: REF_SPECTRAL.to_string(),
        detail: ReportDetail::Spectral(analysis),
    })
}
