//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use crate::types::{ProductType, PumpSize};

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

const PRODUCT_FIELDS: &[&str] = &[
    "density_kg_m3",
    "vapor_pressure_kpa",
    "risk_factor",
    "hf_cavitation_threshold_g",
    "volatile",
    "description",
];

const PUMP_SIZE_FIELDS: &[&str] = &["npshr_m", "bep_flow_m3h", "fla_a", "typical_head_m"];

const ZONE_FIELDS: &[&str] = &["zone_a_max", "zone_b_max", "zone_c_max"];

const LUBRICANT_FIELDS: &[&str] = &["warning_temp_c", "alarm_temp_c", "warning_rise_c", "alarm_rise_c"];

const SPECTRAL_BANDS: &[&str] = &["unbalance", "misalignment", "outer_race", "inner_race", "vane_pass"];

/// Returns the complete set of valid dotted key paths for `PumpConfig`.
///
/// Maintained by hand to match the struct hierarchy in pump_config.rs.
/// Lookup-table entries are expanded from the field lists above.
pub fn known_config_keys() -> HashSet<String> {
    let fixed: &[&str] = &[
        // [fleet]
        "fleet",
        "fleet.name",
        "fleet.site",
        "fleet.reference_year",
        // lookup tables
        "products",
        "pump_sizes",
        "vibration_limits",
        // [thresholds]
        "thresholds",
        // [thresholds.hydraulic]
        "thresholds.hydraulic",
        "thresholds.hydraulic.npsh_safety_margin_m",
        "thresholds.hydraulic.confirmed_cavitation_margin_m",
        "thresholds.hydraulic.flow_ratio_min",
        "thresholds.hydraulic.flow_ratio_max",
        "thresholds.hydraulic.atmospheric_pressure_kpa",
        "thresholds.hydraulic.head_conversion_factor",
        // [thresholds.electrical]
        "thresholds.electrical",
        "thresholds.electrical.voltage_imbalance_warning_pct",
        "thresholds.electrical.voltage_imbalance_critical_pct",
        "thresholds.electrical.current_imbalance_warning_pct",
        "thresholds.electrical.current_imbalance_critical_pct",
        "thresholds.electrical.load_underload_pct",
        "thresholds.electrical.load_warning_pct",
        "thresholds.electrical.load_critical_pct",
        "thresholds.electrical.slip_high_pct",
        "thresholds.electrical.slip_critical_pct",
        "thresholds.electrical.negative_slip_tolerance_pct",
        // [thresholds.mechanical]
        "thresholds.mechanical",
        "thresholds.mechanical.demod_medium_g",
        "thresholds.mechanical.demod_high_g",
        "thresholds.mechanical.harmonic_one_x_min_mm_s",
        "thresholds.mechanical.harmonic_two_x_min_mm_s",
        "thresholds.mechanical.harmonic_three_x_min_mm_s",
        "thresholds.mechanical.harmonic_order_tolerance",
        // [thresholds.thermal]
        "thresholds.thermal",
        "thresholds.thermal.volatile_nde_rise_critical_c",
        "thresholds.thermal.differential_monitor_c",
        "thresholds.thermal.differential_alarm_c",
        // [thresholds.spectral]
        "thresholds.spectral",
        "thresholds.spectral.noise_floor_mm_s",
        "thresholds.spectral.min_frequency_hz",
        "thresholds.spectral.high_confidence_amplitude_mm_s",
        // [validation]
        "validation",
        "validation.voltage_imbalance_max_pct",
        "validation.current_imbalance_max_pct",
        "validation.load_max_pct",
        "validation.slip_min_pct",
        "validation.slip_max_pct",
        // [risk]
        "risk",
        "risk.age_moderate_years",
        "risk.age_old_years",
        "risk.age_factor_moderate",
        "risk.age_factor_old",
        "risk.max_score",
        "risk.multipliers",
        "risk.multipliers.hydraulic_confirmed_cavitation",
        "risk.multipliers.hydraulic_flow",
        "risk.multipliers.electrical_critical",
        "risk.multipliers.electrical_warning",
        "risk.multipliers.mechanical_zone_d",
        "risk.multipliers.mechanical_zone_c",
        "risk.multipliers.mechanical_spectral",
        "risk.multipliers.thermal_critical",
        "risk.multipliers.thermal_warning",
        "risk.multipliers.baseline",
    ];

    let mut keys: HashSet<String> = fixed.iter().map(|k| (*k).to_string()).collect();

    let mut add_entry = |section: &str, entry: &str, fields: &[&str]| {
        let base = format!("{section}.{entry}");
        for field in fields {
            keys.insert(format!("{base}.{field}"));
        }
        keys.insert(base);
    };

    for product in ProductType::ALL {
        add_entry("products", product.key(), PRODUCT_FIELDS);
    }
    for size in PumpSize::ALL {
        add_entry("pump_sizes", size.key(), PUMP_SIZE_FIELDS);
    }
    for foundation in ["rigid", "flexible"] {
        add_entry("vibration_limits", foundation, ZONE_FIELDS);
    }
    for lubricant in ["grease", "oil"] {
        add_entry("thresholds.thermal", lubricant, LUBRICANT_FIELDS);
    }
    for band in SPECTRAL_BANDS {
        add_entry("thresholds.spectral", band, &["min", "max"]);
    }

    keys
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the lexicographically smaller key so the suggestion is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.clone())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed `PumpConfig`.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent a diagnosis run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::PumpConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for product in ProductType::ALL {
        let p = config.product(product);

        // Liquid hydrocarbons sit between roughly 500 and 1100 kg/m³
        if p.density_kg_m3 > 0.0 && !(500.0..=1100.0).contains(&p.density_kg_m3) {
            warnings.push(ValidationWarning {
                field: format!("products.{}.density_kg_m3", product.key()),
                message: format!(
                    "products.{}.density_kg_m3 = {:.0} is outside typical range (500-1100 kg/m³)",
                    product.key(),
                    p.density_kg_m3
                ),
                suggestion: None,
            });
        }

        if p.vapor_pressure_kpa < 0.0 {
            errors.push(format!(
                "products.{}.vapor_pressure_kpa = {:.1} cannot be negative",
                product.key(),
                p.vapor_pressure_kpa
            ));
        }

        if p.hf_cavitation_threshold_g <= 0.0 {
            errors.push(format!(
                "products.{}.hf_cavitation_threshold_g = {:.2} must be > 0",
                product.key(),
                p.hf_cavitation_threshold_g
            ));
        }
    }

    // Absolute pressure: sites run from sea level to roughly 4000 m altitude
    let atm = config.thresholds.hydraulic.atmospheric_pressure_kpa;
    if !(60.0..=110.0).contains(&atm) {
        warnings.push(ValidationWarning {
            field: "thresholds.hydraulic.atmospheric_pressure_kpa".to_string(),
            message: format!(
                "atmospheric_pressure_kpa = {atm:.1} is outside typical range (60-110 kPa)"
            ),
            suggestion: None,
        });
    }

    if config.thresholds.spectral.noise_floor_mm_s < 0.0 {
        errors.push(format!(
            "thresholds.spectral.noise_floor_mm_s = {:.2} cannot be negative",
            config.thresholds.spectral.noise_floor_mm_s
        ));
    }

    let year = config.fleet.reference_year;
    if !(1950..=2100).contains(&year) {
        warnings.push(ValidationWarning {
            field: "fleet.reference_year".to_string(),
            message: format!("fleet.reference_year = {year} is outside typical range (1950-2100)"),
            suggestion: None,
        });
    }

    for size in PumpSize::ALL {
        let d = config.pump_size(size);
        if d.typical_head_m < 0.0 {
            errors.push(format!(
                "pump_sizes.{}.typical_head_m = {:.1} cannot be negative",
                size.key(),
                d.typical_head_m
            ));
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
