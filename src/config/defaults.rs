//! System-wide default constants.
//!
//! Standard clause references and fixed analysis bounds that are not
//! operator-tunable. Grouped by subsystem for easy discovery.

// ============================================================================
// Standard References
// ============================================================================

pub const REF_NPSH: &str = "API 610 §6.3.3";
pub const REF_OPERATING_REGION: &str = "API 610 Annex L";
pub const REF_POWER_OFF_TEST: &str = "API 610 Annex L.3.2";
pub const REF_BEARING_TEMPERATURE: &str = "API 610 §11.3";
pub const REF_SEAL_MONITORING: &str = "API 682 §5.4.2";
pub const REF_ALIGNMENT: &str = "API 686 Chapter 7";
pub const REF_ELECTRICAL: &str = "IEC 60034-1 §4.2";
pub const REF_INSULATION: &str = "IEEE 43";
pub const REF_BALANCING: &str = "ISO 1940-1";
pub const REF_VIBRATION_ZONES: &str = "ISO 10816-3 Table 2";
pub const REF_VIBRATION_DIAGNOSIS: &str = "ISO 13373-1 §5.3.2";
pub const REF_SPECTRAL: &str = "ISO 13373-3 §6.2.2";
pub const REF_BEARING_DAMAGE: &str = "ISO 15243 §5.2";
pub const REF_ASSET_MANAGEMENT: &str = "ISO 55001 §8.2";

/// Clauses listed in every summary's compliance section.
pub const COMPLIANCE_REFERENCES: &[&str] = &[
    REF_NPSH,
    REF_POWER_OFF_TEST,
    REF_VIBRATION_DIAGNOSIS,
    REF_ELECTRICAL,
    REF_BEARING_DAMAGE,
    REF_ASSET_MANAGEMENT,
];

// ============================================================================
// Harmonic Analysis
// ============================================================================

/// Peaks below this ratio to shaft speed are not harmonics (sub-synchronous).
pub const HARMONIC_RATIO_MIN: f64 = 0.95;

/// Peaks above this ratio are beyond 4× and not used for pattern analysis.
pub const HARMONIC_RATIO_MAX: f64 = 4.05;

// ============================================================================
// Summary
// ============================================================================

/// Number of actions listed as "key actions" in the diagnosis summary.
pub const SUMMARY_KEY_ACTIONS: usize = 3;
