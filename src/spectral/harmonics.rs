//! Harmonic pattern classifier (ISO 13373-3 Table 2)
//!
//! Groups peaks into shaft-speed orders 1×..4× and reads the fault from the
//! pattern of orders present rather than from any single peak.
//!
//! ## Rules (first match wins)
//!
//! 1. 3× present with 1× or 2× ⇒ mechanical looseness (HIGH)
//! 2. axial 2× with 2× present ⇒ misalignment (HIGH)
//! 3. horizontal 1× with 1× present and no 2× ⇒ unbalance (HIGH)
//! 4. 1× and 2× present ⇒ unbalance with misalignment (MEDIUM)
//! 5. otherwise no pattern

use crate::config::defaults::{HARMONIC_RATIO_MAX, HARMONIC_RATIO_MIN};
use crate::config::{MechanicalThresholds, SpectralThresholds};
use crate::types::{Direction, FaultHypothesis, FftPeak, Grade};

/// A peak assigned to a shaft-speed order.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedPeak {
    order: u8,
    ratio: f64,
    amplitude: f64,
    direction: Direction,
}

/// Classify the harmonic pattern of `peaks` at `rpm`.
///
/// Returns `None` when the RPM is invalid, no peak survives the noise floor,
/// or no rule matches.
pub fn classify_pattern<'a>(
    peaks: impl IntoIterator<Item = &'a FftPeak>,
    rpm: f64,
    mechanical: &MechanicalThresholds,
    spectral: &SpectralThresholds,
) -> Option<(FaultHypothesis, Grade)> {
    if rpm <= 0.0 || !rpm.is_finite() {
        return None;
    }
    let shaft_hz = rpm / 60.0;

    let ordered: Vec<OrderedPeak> = peaks
        .into_iter()
        .filter(|p| p.frequency_hz > spectral.min_frequency_hz && p.amplitude_mm_s > spectral.noise_floor_mm_s)
        .filter_map(|p| {
            let ratio = p.frequency_hz / shaft_hz;
            (HARMONIC_RATIO_MIN..=HARMONIC_RATIO_MAX).contains(&ratio).then(|| OrderedPeak {
                order: order_of(ratio),
                ratio,
                amplitude: p.amplitude_mm_s,
                direction: p.direction,
            })
        })
        .collect();

    if ordered.is_empty() {
        return None;
    }

    let max_amp = |order: u8| {
        ordered
            .iter()
            .filter(|p| p.order == order)
            .map(|p| p.amplitude)
            .fold(None, |acc: Option<f64>, a| Some(acc.map_or(a, |m| m.max(a))))
    };
    let present = |order: u8, min: f64| max_amp(order).is_some_and(|a| a > min);

    let has_1x = present(1, mechanical.harmonic_one_x_min_mm_s);
    let has_2x = present(2, mechanical.harmonic_two_x_min_mm_s);
    let has_3x = present(3, mechanical.harmonic_three_x_min_mm_s);

    let tol = mechanical.harmonic_order_tolerance;
    let axial_2x = ordered
        .iter()
        .any(|p| p.order == 2 && p.direction == Direction::Axial && (p.ratio - 2.0).abs() < tol);
    let horizontal_1x = ordered
        .iter()
        .any(|p| p.order == 1 && p.direction == Direction::Horizontal && (p.ratio - 1.0).abs() < tol);

    if has_3x && (has_1x || has_2x) {
        Some((FaultHypothesis::MechanicalLooseness, Grade::High))
    } else if axial_2x && has_2x {
        Some((FaultHypothesis::Misalignment, Grade::High))
    } else if horizontal_1x && has_1x && !has_2x {
        Some((FaultHypothesis::Unbalance, Grade::High))
    } else if has_1x && has_2x {
        Some((FaultHypothesis::UnbalanceWithMisalignment, Grade::Medium))
    } else {
        None
    }
}

/// Nearest integer order. Ratios are within [0.95, 4.05] so this is 1..=4.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn order_of(ratio: f64) -> u8 {
    ratio.round().clamp(1.0, 4.0) as u8
}
