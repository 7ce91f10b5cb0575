//! Measurement snapshot: one inspection round of a single pump set.
//!
//! Every field carries a serde default so a partial JSON document still
//! deserializes. Absent readings are zero, absent bearing temperatures are
//! `None` (treated as ambient).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Specification Enums
// ============================================================================

/// Pumped product. Drives density, vapour pressure and volatility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProductType {
    Gasoline,
    #[default]
    Diesel,
    Avtur,
    Naphtha,
}

impl ProductType {
    pub const ALL: [Self; 4] = [Self::Gasoline, Self::Diesel, Self::Avtur, Self::Naphtha];

    /// Config table key, e.g. `products.gasoline`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Gasoline => "gasoline",
            Self::Diesel => "diesel",
            Self::Avtur => "avtur",
            Self::Naphtha => "naphtha",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gasoline => write!(f, "Gasoline"),
            Self::Diesel => write!(f, "Diesel"),
            Self::Avtur => write!(f, "Avtur"),
            Self::Naphtha => write!(f, "Naphtha"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PumpSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PumpSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl std::fmt::Display for PumpSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "Small (<50 m³/h)"),
            Self::Medium => write!(f, "Medium (50-200 m³/h)"),
            Self::Large => write!(f, "Large (>200 m³/h)"),
        }
    }
}

/// ISO 10816-3 foundation class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FoundationType {
    #[default]
    Rigid,
    Flexible,
}

impl std::fmt::Display for FoundationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rigid => write!(f, "Rigid"),
            Self::Flexible => write!(f, "Flexible"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Lubricant {
    #[default]
    Grease,
    Oil,
}

impl std::fmt::Display for Lubricant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grease => write!(f, "Grease"),
            Self::Oil => write!(f, "Oil"),
        }
    }
}

/// Which half of the pump set a reading belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Machine {
    /// Motor
    #[default]
    Driver,
    /// Pump
    Driven,
}

impl std::fmt::Display for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driver => write!(f, "Driver (Motor)"),
            Self::Driven => write!(f, "Driven (Pump)"),
        }
    }
}

/// Measurement axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Direction {
    #[default]
    #[serde(rename = "H", alias = "Horizontal")]
    Horizontal,
    #[serde(rename = "V", alias = "Vertical")]
    Vertical,
    #[serde(rename = "A", alias = "Axial")]
    Axial,
}

impl Direction {
    pub const ALL: [Self; 3] = [Self::Horizontal, Self::Vertical, Self::Axial];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Horizontal => "H",
            Self::Vertical => "V",
            Self::Axial => "A",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Pump Specification & Metadata
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpSpecification {
    #[serde(default)]
    pub product_type: ProductType,
    #[serde(default)]
    pub pump_size: PumpSize,
    #[serde(default)]
    pub foundation_type: FoundationType,
    #[serde(default)]
    pub lubricant: Lubricant,
    #[serde(default = "default_installation_year")]
    pub installation_year: i32,
    #[serde(default = "default_rated_rpm")]
    pub rated_rpm: f64,
}

fn default_installation_year() -> i32 {
    2018
}
fn default_rated_rpm() -> f64 {
    2950.0
}

impl Default for PumpSpecification {
    fn default() -> Self {
        Self {
            product_type: ProductType::default(),
            pump_size: PumpSize::default(),
            foundation_type: FoundationType::default(),
            lubricant: Lubricant::default(),
            installation_year: default_installation_year(),
            rated_rpm: default_rated_rpm(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetMetadata {
    #[serde(default)]
    pub pump_tag: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub inspector: String,
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,
}

// ============================================================================
// Vibration
// ============================================================================

/// Drive-end and non-drive-end readings on one axis (mm/s RMS).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AxisReading {
    #[serde(default)]
    pub de: f64,
    #[serde(default)]
    pub nde: f64,
}

impl AxisReading {
    pub const fn new(de: f64, nde: f64) -> Self {
        Self { de, nde }
    }

    pub fn average(&self) -> f64 {
        (self.de + self.nde) / 2.0
    }
}

/// Velocity, high-frequency acceleration and demodulation readings for one machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MachineVibration {
    #[serde(default)]
    pub horizontal: AxisReading,
    #[serde(default)]
    pub vertical: AxisReading,
    #[serde(default)]
    pub axial: AxisReading,
    /// Acceleration 5–16 kHz, drive end (g)
    #[serde(default)]
    pub hf_de_g: f64,
    #[serde(default)]
    pub hf_nde_g: f64,
    /// Envelope demodulation, drive end (g)
    #[serde(default)]
    pub demod_de_g: f64,
    #[serde(default)]
    pub demod_nde_g: f64,
}

impl MachineVibration {
    pub const fn axis(&self, direction: Direction) -> AxisReading {
        match direction {
            Direction::Horizontal => self.horizontal,
            Direction::Vertical => self.vertical,
            Direction::Axial => self.axial,
        }
    }

    pub fn hf_max(&self) -> f64 {
        self.hf_de_g.max(self.hf_nde_g)
    }

    pub fn demod_max(&self) -> f64 {
        self.demod_de_g.max(self.demod_nde_g)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VibrationData {
    #[serde(default)]
    pub driver: MachineVibration,
    #[serde(default)]
    pub driven: MachineVibration,
}

impl VibrationData {
    pub const fn machine(&self, machine: Machine) -> &MachineVibration {
        match machine {
            Machine::Driver => &self.driver,
            Machine::Driven => &self.driven,
        }
    }
}

/// One operator-entered spectrum peak.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FftPeak {
    #[serde(default)]
    pub component: Machine,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub frequency_hz: f64,
    #[serde(default)]
    pub amplitude_mm_s: f64,
}

// ============================================================================
// Operational, Electrical, Thermal
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationalData {
    /// Gauge pressure (kPa)
    #[serde(default)]
    pub suction_pressure_kpa: f64,
    #[serde(default)]
    pub discharge_pressure_kpa: f64,
    #[serde(default)]
    pub flow_rate_m3h: f64,
}

/// Three-phase supply readings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElectricalData {
    #[serde(default = "default_voltages")]
    pub voltages_v: [f64; 3],
    #[serde(default)]
    pub currents_a: [f64; 3],
}

fn default_voltages() -> [f64; 3] {
    [380.0; 3]
}

impl Default for ElectricalData {
    fn default() -> Self {
        Self {
            voltages_v: default_voltages(),
            currents_a: [0.0; 3],
        }
    }
}

/// Bearing housing temperatures (°C). `None` means not measured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThermalData {
    #[serde(default)]
    pub motor_de_c: Option<f64>,
    #[serde(default)]
    pub motor_nde_c: Option<f64>,
    #[serde(default)]
    pub pump_de_c: Option<f64>,
    #[serde(default)]
    pub pump_nde_c: Option<f64>,
    #[serde(default = "default_ambient")]
    pub ambient_c: f64,
}

fn default_ambient() -> f64 {
    30.0
}

impl Default for ThermalData {
    fn default() -> Self {
        Self {
            motor_de_c: None,
            motor_nde_c: None,
            pump_de_c: None,
            pump_nde_c: None,
            ambient_c: default_ambient(),
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Complete input for one diagnosis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasurementSnapshot {
    #[serde(default)]
    pub metadata: AssetMetadata,
    #[serde(default)]
    pub specification: PumpSpecification,
    #[serde(default)]
    pub vibration: VibrationData,
    #[serde(default)]
    pub operational: OperationalData,
    #[serde(default)]
    pub electrical: ElectricalData,
    #[serde(default)]
    pub thermal: ThermalData,
    #[serde(default)]
    pub fft_peaks: Vec<FftPeak>,
    /// Measured shaft speed. Required for slip; spectral analysis falls back to rated.
    #[serde(default)]
    pub actual_rpm: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let snapshot: MeasurementSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.specification.rated_rpm, 2950.0);
        assert_eq!(snapshot.specification.installation_year, 2018);
        assert_eq!(snapshot.electrical.voltages_v, [380.0; 3]);
        assert_eq!(snapshot.thermal.ambient_c, 30.0);
        assert!(snapshot.actual_rpm.is_none());
        assert!(snapshot.fft_peaks.is_empty());
    }

    #[test]
    fn direction_accepts_codes_and_names() {
        let peak: FftPeak = serde_json::from_str(
            r#"{"component":"Driven","direction":"A","frequency_hz":98.3,"amplitude_mm_s":2.4}"#,
        )
        .unwrap();
        assert_eq!(peak.direction, Direction::Axial);
        let peak: FftPeak = serde_json::from_str(r#"{"direction":"Vertical"}"#).unwrap();
        assert_eq!(peak.direction, Direction::Vertical);
    }

    #[test]
    fn axis_average_is_de_nde_mean() {
        assert!((AxisReading::new(3.0, 4.0).average() - 3.5).abs() < 1e-12);
    }
}
