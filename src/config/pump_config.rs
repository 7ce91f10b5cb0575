//! Pump Configuration - standard-derived thresholds and lookup tables as TOML values
//!
//! Every threshold used by the evaluators, the resolver, and the risk synthesizer
//! lives in this module. Each struct implements `Default` with the values taken
//! from the referenced standards (API 610, API 682, IEC 60034-1, ISO 10816-3,
//! ISO 13373-3, ISO 15243, ISO 55001), so an absent file reproduces the
//! built-in behaviour.
//!
//! Lookup tables (`products`, `pump_sizes`, `vibration_limits`, thermal
//! lubricant limits) are keyed by fixed entries. A section may be omitted, but
//! an entry that is present must be complete.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{FoundationType, Lubricant, ProductType, PumpSize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PUMP_CBM_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "pump_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a pump fleet.
///
/// Load with `PumpConfig::load()` which searches:
/// 1. `$PUMP_CBM_CONFIG`
/// 2. `./pump_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PumpConfig {
    #[serde(default)]
    pub fleet: FleetInfo,

    /// Product properties (density, vapour pressure, volatility)
    #[serde(default)]
    pub products: ProductTable,

    /// Pump size class defaults (NPSHr, BEP, FLA)
    #[serde(default)]
    pub pump_sizes: PumpSizeTable,

    /// ISO 10816-3 zone ceilings per foundation type
    #[serde(default)]
    pub vibration_limits: VibrationLimitTable,

    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Electrical normal bands for the power-off test gate
    #[serde(default)]
    pub validation: ValidationGateConfig,

    #[serde(default)]
    pub risk: RiskConfig,
}

impl PumpConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), fleet = %config.fleet.name, "Loaded pump config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(fleet = %config.fleet.name, "Loaded pump config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents)
            .map_err(|e| match e {
                ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
                other => other,
            })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys only produce warnings; parse and validation failures are errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Pump config saved");
        Ok(())
    }

    pub fn product(&self, product: ProductType) -> &ProductProperties {
        match product {
            ProductType::Gasoline => &self.products.gasoline,
            ProductType::Diesel => &self.products.diesel,
            ProductType::Avtur => &self.products.avtur,
            ProductType::Naphtha => &self.products.naphtha,
        }
    }

    pub fn pump_size(&self, size: PumpSize) -> &PumpSizeDefaults {
        match size {
            PumpSize::Small => &self.pump_sizes.small,
            PumpSize::Medium => &self.pump_sizes.medium,
            PumpSize::Large => &self.pump_sizes.large,
        }
    }

    pub fn zone_limits(&self, foundation: FoundationType) -> &ZoneLimits {
        match foundation {
            FoundationType::Rigid => &self.vibration_limits.rigid,
            FoundationType::Flexible => &self.vibration_limits.flexible,
        }
    }

    pub fn lubricant_limits(&self, lubricant: Lubricant) -> &LubricantLimits {
        match lubricant {
            Lubricant::Grease => &self.thresholds.thermal.grease,
            Lubricant::Oil => &self.thresholds.thermal.oil,
        }
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Critical thresholds must be >= warning thresholds
    /// - Zone ceilings must be strictly increasing A < B < C
    /// - Ratio bands must have min < max
    /// - Product risk factors within 1..=5, severity multipliers within 2..=5
    /// - Divisors (density, BEP flow, FLA) must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let mut errors: Vec<String> = Vec::new();

        // Electrical escalation
        let e = &t.electrical;
        Self::check_escalation(
            e.voltage_imbalance_warning_pct,
            e.voltage_imbalance_critical_pct,
            "electrical.voltage_imbalance",
            &mut errors,
        );
        Self::check_escalation(
            e.current_imbalance_warning_pct,
            e.current_imbalance_critical_pct,
            "electrical.current_imbalance",
            &mut errors,
        );
        Self::check_escalation(e.load_warning_pct, e.load_critical_pct, "electrical.load", &mut errors);
        Self::check_escalation(e.slip_high_pct, e.slip_critical_pct, "electrical.slip", &mut errors);
        if e.load_underload_pct >= e.load_warning_pct {
            errors.push(format!(
                "electrical.load_underload_pct ({:.1}) must be less than load_warning_pct ({:.1})",
                e.load_underload_pct, e.load_warning_pct
            ));
        }
        if e.negative_slip_tolerance_pct < 0.0 {
            errors.push("electrical.negative_slip_tolerance_pct must be >= 0".to_string());
        }

        // Hydraulic
        let h = &t.hydraulic;
        if h.flow_ratio_min >= h.flow_ratio_max {
            errors.push(format!(
                "hydraulic.flow_ratio_min ({:.2}) must be less than flow_ratio_max ({:.2})",
                h.flow_ratio_min, h.flow_ratio_max
            ));
        }
        if h.head_conversion_factor <= 0.0 {
            errors.push("hydraulic.head_conversion_factor must be > 0 (used as divisor)".to_string());
        }

        // Mechanical
        Self::check_escalation(
            t.mechanical.demod_medium_g,
            t.mechanical.demod_high_g,
            "mechanical.demod",
            &mut errors,
        );

        // Thermal
        for (name, limits) in [("thermal.grease", &t.thermal.grease), ("thermal.oil", &t.thermal.oil)] {
            Self::check_escalation(limits.warning_temp_c, limits.alarm_temp_c, &format!("{name}.temp"), &mut errors);
            Self::check_escalation(limits.warning_rise_c, limits.alarm_rise_c, &format!("{name}.rise"), &mut errors);
        }
        Self::check_escalation(
            t.thermal.differential_monitor_c,
            t.thermal.differential_alarm_c,
            "thermal.differential",
            &mut errors,
        );

        // Spectral bands
        let s = &t.spectral;
        for (name, band) in s.named_bands() {
            if !(band.min.is_finite() && band.max.is_finite()) || band.min >= band.max {
                errors.push(format!(
                    "spectral.{name}: min ({:.2}) must be less than max ({:.2})",
                    band.min, band.max
                ));
            }
        }

        // Zone ordering
        for (name, z) in [("rigid", &self.vibration_limits.rigid), ("flexible", &self.vibration_limits.flexible)] {
            if !(z.zone_a_max < z.zone_b_max && z.zone_b_max < z.zone_c_max) {
                errors.push(format!(
                    "vibration_limits.{name}: zone ceilings must increase (A={:.1}, B={:.1}, C={:.1})",
                    z.zone_a_max, z.zone_b_max, z.zone_c_max
                ));
            }
        }

        // Products
        for product in ProductType::ALL {
            let p = self.product(product);
            if !(1..=5).contains(&p.risk_factor) {
                errors.push(format!("products.{}: risk_factor {} must be within 1..=5", product.key(), p.risk_factor));
            }
            if p.density_kg_m3 <= 0.0 {
                errors.push(format!("products.{}: density_kg_m3 must be > 0 (used as divisor)", product.key()));
            }
        }

        // Pump sizes
        for size in PumpSize::ALL {
            let d = self.pump_size(size);
            if d.bep_flow_m3h <= 0.0 {
                errors.push(format!("pump_sizes.{}: bep_flow_m3h must be > 0 (used as divisor)", size.key()));
            }
            if d.fla_a <= 0.0 {
                errors.push(format!("pump_sizes.{}: fla_a must be > 0 (used as divisor)", size.key()));
            }
            if d.npshr_m < 0.0 {
                errors.push(format!("pump_sizes.{}: npshr_m cannot be negative", size.key()));
            }
        }

        // Power-off gate bands
        let v = &self.validation;
        if v.slip_min_pct >= v.slip_max_pct {
            errors.push(format!(
                "validation.slip_min_pct ({:.1}) must be less than slip_max_pct ({:.1})",
                v.slip_min_pct, v.slip_max_pct
            ));
        }

        // Risk
        let r = &self.risk;
        if r.age_moderate_years > r.age_old_years {
            errors.push(format!(
                "risk.age_moderate_years ({}) must be <= age_old_years ({})",
                r.age_moderate_years, r.age_old_years
            ));
        }
        if !(1.0 <= r.age_factor_moderate && r.age_factor_moderate <= r.age_factor_old) {
            errors.push(format!(
                "risk age factors must satisfy 1.0 <= moderate ({:.2}) <= old ({:.2})",
                r.age_factor_moderate, r.age_factor_old
            ));
        }
        for (name, value) in r.multipliers.named() {
            if !(2..=5).contains(&value) {
                errors.push(format!("risk.multipliers.{name} = {value} must be within 2..=5"));
            }
        }
        if r.max_score == 0 || r.max_score > 100 {
            errors.push(format!("risk.max_score = {} must be within 1..=100", r.max_score));
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Reject NaN/Inf in any config value (sweep all f64 fields via serialization)
        if let Ok(ref s) = toml::to_string(self) {
            let non_finite = s.lines().filter_map(|l| l.split_once(" = ")).any(|(_, v)| {
                matches!(v.trim(), "nan" | "+nan" | "-nan" | "inf" | "+inf" | "-inf")
            });
            if non_finite {
                errors.push("Config contains NaN or Inf values — all thresholds must be finite numbers".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(warning: f64, critical: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass — catch them explicitly
        if !warning.is_finite() || !critical.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got warning={warning}, critical={critical})"
            ));
            return;
        }
        if critical < warning {
            errors.push(format!(
                "{name}: critical ({critical:.3}) must be >= warning ({warning:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Fleet Info
// ============================================================================

/// Identification metadata, plus the year used for age when a snapshot
/// carries no inspection date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleetInfo {
    #[serde(default = "default_fleet_name")]
    pub name: String,

    #[serde(default)]
    pub site: String,

    #[serde(default = "default_reference_year")]
    pub reference_year: i32,
}

fn default_fleet_name() -> String {
    "DEFAULT".to_string()
}
fn default_reference_year() -> i32 {
    2026
}

impl Default for FleetInfo {
    fn default() -> Self {
        Self {
            name: default_fleet_name(),
            site: String::new(),
            reference_year: default_reference_year(),
        }
    }
}

// ============================================================================
// Product Properties (API 682 §5.4.2)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductProperties {
    pub density_kg_m3: f64,
    /// Vapour pressure at 25 °C (kPa)
    pub vapor_pressure_kpa: f64,
    /// Product volatility factor used by the risk score (1..=5)
    pub risk_factor: u8,
    /// HF 5–16 kHz level above which cavitation is likely (g)
    pub hf_cavitation_threshold_g: f64,
    /// Volatile products get seal-failure precautions
    pub volatile: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductTable {
    #[serde(default = "default_gasoline")]
    pub gasoline: ProductProperties,
    #[serde(default = "default_diesel")]
    pub diesel: ProductProperties,
    #[serde(default = "default_avtur")]
    pub avtur: ProductProperties,
    #[serde(default = "default_naphtha")]
    pub naphtha: ProductProperties,
}

fn default_gasoline() -> ProductProperties {
    ProductProperties {
        density_kg_m3: 740.0,
        vapor_pressure_kpa: 55.0,
        risk_factor: 5,
        hf_cavitation_threshold_g: 0.3,
        volatile: true,
        description: "High volatility - cavitation critical (API 682 §5.4.2)".to_string(),
    }
}
fn default_diesel() -> ProductProperties {
    ProductProperties {
        density_kg_m3: 840.0,
        vapor_pressure_kpa: 0.5,
        risk_factor: 3,
        hf_cavitation_threshold_g: 0.5,
        volatile: false,
        description: "Low volatility - bearing wear dominant".to_string(),
    }
}
fn default_avtur() -> ProductProperties {
    ProductProperties {
        density_kg_m3: 780.0,
        vapor_pressure_kpa: 15.0,
        risk_factor: 4,
        hf_cavitation_threshold_g: 0.3,
        volatile: true,
        description: "Medium volatility - seal integrity critical (API 682 §5.4.2)".to_string(),
    }
}
fn default_naphtha() -> ProductProperties {
    ProductProperties {
        density_kg_m3: 700.0,
        vapor_pressure_kpa: 60.0,
        risk_factor: 5,
        hf_cavitation_threshold_g: 0.3,
        volatile: true,
        description: "Very high volatility - extreme cavitation risk (API 682 §5.4.2)".to_string(),
    }
}

impl Default for ProductTable {
    fn default() -> Self {
        Self {
            gasoline: default_gasoline(),
            diesel: default_diesel(),
            avtur: default_avtur(),
            naphtha: default_naphtha(),
        }
    }
}

// ============================================================================
// Pump Size Defaults
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpSizeDefaults {
    pub npshr_m: f64,
    pub bep_flow_m3h: f64,
    /// Motor full load amps
    pub fla_a: f64,
    pub typical_head_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpSizeTable {
    #[serde(default = "default_small")]
    pub small: PumpSizeDefaults,
    #[serde(default = "default_medium")]
    pub medium: PumpSizeDefaults,
    #[serde(default = "default_large")]
    pub large: PumpSizeDefaults,
}

fn default_small() -> PumpSizeDefaults {
    PumpSizeDefaults { npshr_m: 3.0, bep_flow_m3h: 30.0, fla_a: 15.0, typical_head_m: 25.0 }
}
fn default_medium() -> PumpSizeDefaults {
    PumpSizeDefaults { npshr_m: 4.5, bep_flow_m3h: 100.0, fla_a: 30.0, typical_head_m: 50.0 }
}
fn default_large() -> PumpSizeDefaults {
    PumpSizeDefaults { npshr_m: 6.0, bep_flow_m3h: 250.0, fla_a: 60.0, typical_head_m: 80.0 }
}

impl Default for PumpSizeTable {
    fn default() -> Self {
        Self { small: default_small(), medium: default_medium(), large: default_large() }
    }
}

// ============================================================================
// ISO 10816-3 Zone Limits (mm/s RMS, Class III)
// ============================================================================

/// Upper bound of zones A, B and C. Anything above `zone_c_max` is zone D.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneLimits {
    pub zone_a_max: f64,
    pub zone_b_max: f64,
    pub zone_c_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VibrationLimitTable {
    #[serde(default = "default_rigid_limits")]
    pub rigid: ZoneLimits,
    #[serde(default = "default_flexible_limits")]
    pub flexible: ZoneLimits,
}

fn default_rigid_limits() -> ZoneLimits {
    ZoneLimits { zone_a_max: 2.8, zone_b_max: 4.5, zone_c_max: 7.1 }
}
fn default_flexible_limits() -> ZoneLimits {
    ZoneLimits { zone_a_max: 4.5, zone_b_max: 7.1, zone_c_max: 11.2 }
}

impl Default for VibrationLimitTable {
    fn default() -> Self {
        Self { rigid: default_rigid_limits(), flexible: default_flexible_limits() }
    }
}

// ============================================================================
// Threshold Config
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub hydraulic: HydraulicThresholds,
    #[serde(default)]
    pub electrical: ElectricalThresholds,
    #[serde(default)]
    pub mechanical: MechanicalThresholds,
    #[serde(default)]
    pub thermal: ThermalThresholds,
    #[serde(default)]
    pub spectral: SpectralThresholds,
}

// ============================================================================
// Hydraulic Thresholds (API 610 §6.3.3, Annex L)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydraulicThresholds {
    /// Margin added to NPSHr before comparing with NPSHa (m).
    #[serde(default = "default_npsh_safety_margin")]
    pub npsh_safety_margin_m: f64,

    /// HF-high combined with an NPSHa margin below this confirms cavitation (m).
    #[serde(default = "default_confirmed_cavitation_margin")]
    pub confirmed_cavitation_margin_m: f64,

    /// Below this fraction of BEP flow the pump risks recirculation.
    #[serde(default = "default_flow_ratio_min")]
    pub flow_ratio_min: f64,

    /// Above this fraction of BEP flow the pump risks overload/cavitation.
    #[serde(default = "default_flow_ratio_max")]
    pub flow_ratio_max: f64,

    /// Added to gauge suction pressure to get absolute pressure (kPa).
    #[serde(default = "default_atmospheric_pressure")]
    pub atmospheric_pressure_kpa: f64,

    /// kPa per (kg/m³ · m): head = ΔP / (ρ · factor).
    #[serde(default = "default_head_conversion")]
    pub head_conversion_factor: f64,
}

fn default_npsh_safety_margin() -> f64 { 1.0 }
fn default_confirmed_cavitation_margin() -> f64 { 1.0 }
fn default_flow_ratio_min() -> f64 { 0.6 }
fn default_flow_ratio_max() -> f64 { 1.2 }
fn default_atmospheric_pressure() -> f64 { 101.3 }
fn default_head_conversion() -> f64 { 0.00981 }

impl Default for HydraulicThresholds {
    fn default() -> Self {
        Self {
            npsh_safety_margin_m: default_npsh_safety_margin(),
            confirmed_cavitation_margin_m: default_confirmed_cavitation_margin(),
            flow_ratio_min: default_flow_ratio_min(),
            flow_ratio_max: default_flow_ratio_max(),
            atmospheric_pressure_kpa: default_atmospheric_pressure(),
            head_conversion_factor: default_head_conversion(),
        }
    }
}

// ============================================================================
// Electrical Thresholds (IEC 60034-1 §4.2)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricalThresholds {
    #[serde(default = "default_voltage_imbalance_warning")]
    pub voltage_imbalance_warning_pct: f64,
    #[serde(default = "default_voltage_imbalance_critical")]
    pub voltage_imbalance_critical_pct: f64,
    #[serde(default = "default_current_imbalance_warning")]
    pub current_imbalance_warning_pct: f64,
    #[serde(default = "default_current_imbalance_critical")]
    pub current_imbalance_critical_pct: f64,

    /// Load below this percentage of FLA is reported as underload.
    #[serde(default = "default_load_underload")]
    pub load_underload_pct: f64,
    #[serde(default = "default_load_warning")]
    pub load_warning_pct: f64,
    #[serde(default = "default_load_critical")]
    pub load_critical_pct: f64,

    #[serde(default = "default_slip_high")]
    pub slip_high_pct: f64,
    #[serde(default = "default_slip_critical")]
    pub slip_critical_pct: f64,

    /// Negative slip within this magnitude is reported as LOW_SLIP instead of
    /// ABNORMAL. Zero means any negative slip is abnormal.
    #[serde(default)]
    pub negative_slip_tolerance_pct: f64,
}

fn default_voltage_imbalance_warning() -> f64 { 2.0 }
fn default_voltage_imbalance_critical() -> f64 { 5.0 }
fn default_current_imbalance_warning() -> f64 { 5.0 }
fn default_current_imbalance_critical() -> f64 { 10.0 }
fn default_load_underload() -> f64 { 80.0 }
fn default_load_warning() -> f64 { 110.0 }
fn default_load_critical() -> f64 { 125.0 }
fn default_slip_high() -> f64 { 5.0 }
fn default_slip_critical() -> f64 { 8.0 }

impl Default for ElectricalThresholds {
    fn default() -> Self {
        Self {
            voltage_imbalance_warning_pct: default_voltage_imbalance_warning(),
            voltage_imbalance_critical_pct: default_voltage_imbalance_critical(),
            current_imbalance_warning_pct: default_current_imbalance_warning(),
            current_imbalance_critical_pct: default_current_imbalance_critical(),
            load_underload_pct: default_load_underload(),
            load_warning_pct: default_load_warning(),
            load_critical_pct: default_load_critical(),
            slip_high_pct: default_slip_high(),
            slip_critical_pct: default_slip_critical(),
            negative_slip_tolerance_pct: 0.0,
        }
    }
}

// ============================================================================
// Mechanical Thresholds (ISO 13373-3, ISO 15243)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MechanicalThresholds {
    /// Demodulation level for MEDIUM bearing-defect risk (g).
    #[serde(default = "default_demod_medium")]
    pub demod_medium_g: f64,

    /// Demodulation level for HIGH bearing-defect risk (g).
    #[serde(default = "default_demod_high")]
    pub demod_high_g: f64,

    /// Minimum 1× amplitude for the harmonic pattern classifier (mm/s).
    #[serde(default = "default_one_x_min")]
    pub harmonic_one_x_min_mm_s: f64,

    #[serde(default = "default_two_x_min")]
    pub harmonic_two_x_min_mm_s: f64,

    #[serde(default = "default_three_x_min")]
    pub harmonic_three_x_min_mm_s: f64,

    /// Maximum |ratio − order| for a directional 1×/2× match.
    #[serde(default = "default_order_tolerance")]
    pub harmonic_order_tolerance: f64,
}

fn default_demod_medium() -> f64 { 0.3 }
fn default_demod_high() -> f64 { 0.5 }
fn default_one_x_min() -> f64 { 1.0 }
fn default_two_x_min() -> f64 { 1.5 }
fn default_three_x_min() -> f64 { 0.7 }
fn default_order_tolerance() -> f64 { 0.05 }

impl Default for MechanicalThresholds {
    fn default() -> Self {
        Self {
            demod_medium_g: default_demod_medium(),
            demod_high_g: default_demod_high(),
            harmonic_one_x_min_mm_s: default_one_x_min(),
            harmonic_two_x_min_mm_s: default_two_x_min(),
            harmonic_three_x_min_mm_s: default_three_x_min(),
            harmonic_order_tolerance: default_order_tolerance(),
        }
    }
}

// ============================================================================
// Thermal Thresholds (API 610 §11.3)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LubricantLimits {
    pub warning_temp_c: f64,
    pub alarm_temp_c: f64,
    pub warning_rise_c: f64,
    pub alarm_rise_c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalThresholds {
    #[serde(default = "default_grease_limits")]
    pub grease: LubricantLimits,

    #[serde(default = "default_oil_limits")]
    pub oil: LubricantLimits,

    /// Pump NDE rise above which volatile products are CRITICAL (°C).
    #[serde(default = "default_volatile_nde_rise")]
    pub volatile_nde_rise_critical_c: f64,

    /// Pump DE–NDE difference worth monitoring (°C).
    #[serde(default = "default_differential_monitor")]
    pub differential_monitor_c: f64,

    /// Pump DE–NDE difference indicating possible misalignment (°C).
    #[serde(default = "default_differential_alarm")]
    pub differential_alarm_c: f64,
}

fn default_grease_limits() -> LubricantLimits {
    LubricantLimits { warning_temp_c: 85.0, alarm_temp_c: 95.0, warning_rise_c: 40.0, alarm_rise_c: 55.0 }
}
fn default_oil_limits() -> LubricantLimits {
    LubricantLimits { warning_temp_c: 95.0, alarm_temp_c: 105.0, warning_rise_c: 50.0, alarm_rise_c: 65.0 }
}
fn default_volatile_nde_rise() -> f64 { 40.0 }
fn default_differential_monitor() -> f64 { 10.0 }
fn default_differential_alarm() -> f64 { 15.0 }

impl Default for ThermalThresholds {
    fn default() -> Self {
        Self {
            grease: default_grease_limits(),
            oil: default_oil_limits(),
            volatile_nde_rise_critical_c: default_volatile_nde_rise(),
            differential_monitor_c: default_differential_monitor(),
            differential_alarm_c: default_differential_alarm(),
        }
    }
}

// ============================================================================
// Spectral Thresholds (ISO 13373-3 §6.2.2)
// ============================================================================

/// Inclusive band of frequency-to-shaft-speed ratios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatioBand {
    pub min: f64,
    pub max: f64,
}

impl RatioBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, ratio: f64) -> bool {
        (self.min..=self.max).contains(&ratio)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectralThresholds {
    /// Peaks at or below this amplitude are ignored (mm/s).
    #[serde(default = "default_noise_floor")]
    pub noise_floor_mm_s: f64,

    /// Peaks at or below this frequency are treated as unset (Hz).
    #[serde(default = "default_min_frequency")]
    pub min_frequency_hz: f64,

    /// 1×/2× peaks above this amplitude get HIGH confidence (mm/s).
    #[serde(default = "default_high_confidence_amplitude")]
    pub high_confidence_amplitude_mm_s: f64,

    #[serde(default = "default_unbalance_band")]
    pub unbalance: RatioBand,
    #[serde(default = "default_misalignment_band")]
    pub misalignment: RatioBand,
    #[serde(default = "default_outer_race_band")]
    pub outer_race: RatioBand,
    #[serde(default = "default_inner_race_band")]
    pub inner_race: RatioBand,
    #[serde(default = "default_vane_pass_band")]
    pub vane_pass: RatioBand,
}

fn default_noise_floor() -> f64 { 0.5 }
fn default_min_frequency() -> f64 { 0.5 }
fn default_high_confidence_amplitude() -> f64 { 2.0 }
fn default_unbalance_band() -> RatioBand { RatioBand::new(0.95, 1.05) }
fn default_misalignment_band() -> RatioBand { RatioBand::new(1.95, 2.05) }
fn default_outer_race_band() -> RatioBand { RatioBand::new(0.35, 0.45) }
fn default_inner_race_band() -> RatioBand { RatioBand::new(0.55, 0.65) }
fn default_vane_pass_band() -> RatioBand { RatioBand::new(6.0, 8.0) }

impl SpectralThresholds {
    pub fn named_bands(&self) -> [(&'static str, RatioBand); 5] {
        [
            ("unbalance", self.unbalance),
            ("misalignment", self.misalignment),
            ("outer_race", self.outer_race),
            ("inner_race", self.inner_race),
            ("vane_pass", self.vane_pass),
        ]
    }
}

impl Default for SpectralThresholds {
    fn default() -> Self {
        Self {
            noise_floor_mm_s: default_noise_floor(),
            min_frequency_hz: default_min_frequency(),
            high_confidence_amplitude_mm_s: default_high_confidence_amplitude(),
            unbalance: default_unbalance_band(),
            misalignment: default_misalignment_band(),
            outer_race: default_outer_race_band(),
            inner_race: default_inner_race_band(),
            vane_pass: default_vane_pass_band(),
        }
    }
}

// ============================================================================
// Power-off Test Gate (API 610 Annex L.3.2)
// ============================================================================

/// Electrical readings inside all of these bands count as "clean", which is
/// when a mechanical diagnosis must be confirmed by a coast-down test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationGateConfig {
    #[serde(default = "default_gate_voltage")]
    pub voltage_imbalance_max_pct: f64,
    #[serde(default = "default_gate_current")]
    pub current_imbalance_max_pct: f64,
    #[serde(default = "default_gate_load")]
    pub load_max_pct: f64,
    #[serde(default = "default_gate_slip_min")]
    pub slip_min_pct: f64,
    #[serde(default = "default_gate_slip_max")]
    pub slip_max_pct: f64,
}

fn default_gate_voltage() -> f64 { 2.0 }
fn default_gate_current() -> f64 { 5.0 }
fn default_gate_load() -> f64 { 110.0 }
fn default_gate_slip_min() -> f64 { -2.0 }
fn default_gate_slip_max() -> f64 { 5.0 }

impl Default for ValidationGateConfig {
    fn default() -> Self {
        Self {
            voltage_imbalance_max_pct: default_gate_voltage(),
            current_imbalance_max_pct: default_gate_current(),
            load_max_pct: default_gate_load(),
            slip_min_pct: default_gate_slip_min(),
            slip_max_pct: default_gate_slip_max(),
        }
    }
}

// ============================================================================
// Risk Config (ISO 55001 §8.2)
// ============================================================================

/// Domain severity multipliers applied to the product volatility factor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeverityMultipliers {
    #[serde(default = "default_mult_5")]
    pub hydraulic_confirmed_cavitation: u8,
    #[serde(default = "default_mult_3")]
    pub hydraulic_flow: u8,
    #[serde(default = "default_mult_4")]
    pub electrical_critical: u8,
    #[serde(default = "default_mult_3")]
    pub electrical_warning: u8,
    #[serde(default = "default_mult_4")]
    pub mechanical_zone_d: u8,
    #[serde(default = "default_mult_3")]
    pub mechanical_zone_c: u8,
    #[serde(default = "default_mult_3")]
    pub mechanical_spectral: u8,
    #[serde(default = "default_mult_4")]
    pub thermal_critical: u8,
    #[serde(default = "default_mult_3")]
    pub thermal_warning: u8,
    /// Applied when the primary domain has an issue but no sub-condition above.
    #[serde(default = "default_mult_2")]
    pub baseline: u8,
}

fn default_mult_2() -> u8 { 2 }
fn default_mult_3() -> u8 { 3 }
fn default_mult_4() -> u8 { 4 }
fn default_mult_5() -> u8 { 5 }

impl SeverityMultipliers {
    pub fn named(&self) -> [(&'static str, u8); 10] {
        [
            ("hydraulic_confirmed_cavitation", self.hydraulic_confirmed_cavitation),
            ("hydraulic_flow", self.hydraulic_flow),
            ("electrical_critical", self.electrical_critical),
            ("electrical_warning", self.electrical_warning),
            ("mechanical_zone_d", self.mechanical_zone_d),
            ("mechanical_zone_c", self.mechanical_zone_c),
            ("mechanical_spectral", self.mechanical_spectral),
            ("thermal_critical", self.thermal_critical),
            ("thermal_warning", self.thermal_warning),
            ("baseline", self.baseline),
        ]
    }
}

impl Default for SeverityMultipliers {
    fn default() -> Self {
        Self {
            hydraulic_confirmed_cavitation: 5,
            hydraulic_flow: 3,
            electrical_critical: 4,
            electrical_warning: 3,
            mechanical_zone_d: 4,
            mechanical_zone_c: 3,
            mechanical_spectral: 3,
            thermal_critical: 4,
            thermal_warning: 3,
            baseline: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskConfig {
    /// Ages up to this many years use factor 1.0.
    #[serde(default = "default_age_moderate")]
    pub age_moderate_years: i32,

    /// Ages up to this many years use `age_factor_moderate`, older use `age_factor_old`.
    #[serde(default = "default_age_old")]
    pub age_old_years: i32,

    #[serde(default = "default_age_factor_moderate")]
    pub age_factor_moderate: f64,

    #[serde(default = "default_age_factor_old")]
    pub age_factor_old: f64,

    #[serde(default = "default_max_score")]
    pub max_score: u8,

    #[serde(default)]
    pub multipliers: SeverityMultipliers,
}

fn default_age_moderate() -> i32 { 10 }
fn default_age_old() -> i32 { 15 }
fn default_age_factor_moderate() -> f64 { 1.2 }
fn default_age_factor_old() -> f64 { 1.5 }
fn default_max_score() -> u8 { 100 }

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            age_moderate_years: default_age_moderate(),
            age_old_years: default_age_old(),
            age_factor_moderate: default_age_factor_moderate(),
            age_factor_old: default_age_factor_old(),
            max_score: default_max_score(),
            multipliers: SeverityMultipliers::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
