//! Domain reports: the uniform output of every evaluator.
//!
//! A `DomainReport` carries the shared verdict (status, issue flag, findings,
//! standard reference) and a typed `ReportDetail` with the metrics that the
//! resolver, risk synthesizer and audit table read.

use serde::{Deserialize, Serialize};

use super::snapshot::{Direction, Lubricant, Machine};

// ============================================================================
// Domain & Status
// ============================================================================

/// Diagnostic domain. Declaration order is resolution precedence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Domain {
    Hydraulic,
    Electrical,
    Mechanical,
    Thermal,
}

impl Domain {
    /// Highest precedence first.
    pub const PRECEDENCE: [Self; 4] = [Self::Hydraulic, Self::Electrical, Self::Mechanical, Self::Thermal];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hydraulic => "HYDRAULIC",
            Self::Electrical => "ELECTRICAL",
            Self::Mechanical => "MECHANICAL",
            Self::Thermal => "THERMAL",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall verdict of one domain report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    Normal,
    Warning,
    Alarm,
    Critical,
    /// Unphysical readings that still warrant attention (e.g. negative slip)
    Abnormal,
    /// Inputs could not be evaluated (zero supply averages, zero FLA)
    Invalid,
}

impl DomainStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Alarm => "ALARM",
            Self::Critical => "CRITICAL",
            Self::Abnormal => "ABNORMAL",
            Self::Invalid => "INVALID",
        }
    }

    /// Escalation rank. Invalid ranks with Normal.
    pub const fn severity(self) -> u8 {
        match self {
            Self::Normal | Self::Invalid => 0,
            Self::Abnormal => 1,
            Self::Warning => 2,
            Self::Alarm => 3,
            Self::Critical => 4,
        }
    }

    /// The more severe of the two. Ties keep `self`.
    #[must_use]
    pub const fn escalate(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three-level grade used for cavitation risk, bearing-defect risk and
/// spectral confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Status of a single sub-metric (an imbalance, a bearing temperature).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricStatus {
    Normal,
    Warning,
    Alarm,
    Critical,
    Invalid,
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Alarm => write!(f, "ALARM"),
            Self::Critical => write!(f, "CRITICAL"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

// ============================================================================
// Fault Hypotheses
// ============================================================================

/// Mechanical fault mechanism named by the vibration or spectral evaluator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultHypothesis {
    Unbalance,
    Misalignment,
    MechanicalLooseness,
    UnbalanceWithMisalignment,
    OuterRaceDefect,
    InnerRaceDefect,
    VanePassInstability,
    Unclassified,
}

impl FaultHypothesis {
    /// Fault implied by the dominant velocity axis alone.
    pub const fn from_dominant_direction(direction: Direction) -> Self {
        match direction {
            Direction::Horizontal => Self::Unbalance,
            Direction::Vertical => Self::MechanicalLooseness,
            Direction::Axial => Self::Misalignment,
        }
    }

    /// Likely physical cause, as reported to maintenance.
    pub const fn likely_cause(self) -> &'static str {
        match self {
            Self::Unbalance => "Impeller erosion/fouling",
            Self::Misalignment => "Coupling wear/pipe strain",
            Self::MechanicalLooseness => "Foundation/bolt loosening",
            Self::UnbalanceWithMisalignment => "Combined unbalance and coupling misalignment",
            Self::OuterRaceDefect => "Bearing outer race damage",
            Self::InnerRaceDefect => "Bearing inner race damage",
            Self::VanePassInstability => "Hydraulic instability at impeller vanes",
            Self::Unclassified => "Unclassified spectral component",
        }
    }

    /// Spectral signature label (e.g. "1x RPM").
    pub const fn signature(self) -> &'static str {
        match self {
            Self::Unbalance => "1x RPM",
            Self::Misalignment => "2x RPM",
            Self::MechanicalLooseness => "3x RPM",
            Self::UnbalanceWithMisalignment => "1x + 2x RPM",
            Self::OuterRaceDefect => "BPFO",
            Self::InnerRaceDefect => "BPFI",
            Self::VanePassInstability => "Vane pass",
            Self::Unclassified => "Unmatched",
        }
    }

    pub const fn is_misalignment(self) -> bool {
        matches!(self, Self::Misalignment | Self::UnbalanceWithMisalignment)
    }

    pub const fn is_bearing_defect(self) -> bool {
        matches!(self, Self::OuterRaceDefect | Self::InnerRaceDefect)
    }
}

impl std::fmt::Display for FaultHypothesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unbalance => "Unbalance",
            Self::Misalignment => "Misalignment",
            Self::MechanicalLooseness => "Mechanical looseness",
            Self::UnbalanceWithMisalignment => "Unbalance with misalignment",
            Self::OuterRaceDefect => "Outer race bearing defect",
            Self::InnerRaceDefect => "Inner race bearing defect",
            Self::VanePassInstability => "Vane pass hydraulic instability",
            Self::Unclassified => "Unclassified",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Hydraulic Metrics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStatus {
    Normal,
    RecirculationRisk,
    OverloadCavitationRisk,
}

impl std::fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::RecirculationRisk => write!(f, "RECIRCULATION_RISK"),
            Self::OverloadCavitationRisk => write!(f, "OVERLOAD_CAVITATION_RISK"),
        }
    }
}

/// How strongly the evidence points at cavitation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CavitationState {
    None,
    /// NPSHa margin negative, HF not elevated
    Potential,
    /// HF elevated, NPSHa margin adequate
    Suspected,
    /// HF elevated and NPSHa margin thin
    Confirmed,
}

impl CavitationState {
    pub const fn risk(self) -> Grade {
        match self {
            Self::None => Grade::Low,
            Self::Potential | Self::Suspected => Grade::Medium,
            Self::Confirmed => Grade::High,
        }
    }
}

/// HF acceleration readings per bearing location (g).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct HfReadings {
    pub motor_de_g: f64,
    pub motor_nde_g: f64,
    pub pump_de_g: f64,
    pub pump_nde_g: f64,
}

impl HfReadings {
    pub fn max(&self) -> f64 {
        self.motor_de_g
            .max(self.motor_nde_g)
            .max(self.pump_de_g)
            .max(self.pump_nde_g)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydraulicMetrics {
    pub npsha_m: f64,
    pub npshr_m: f64,
    /// NPSHa − (NPSHr + safety margin)
    pub npsh_margin_m: f64,
    pub differential_head_m: f64,
    pub flow_rate_m3h: f64,
    pub bep_flow_m3h: f64,
    pub flow_ratio: f64,
    pub flow_status: FlowStatus,
    pub hf: HfReadings,
    pub hf_threshold_g: f64,
    pub hf_high: bool,
    pub cavitation: CavitationState,
    pub volatile_product: bool,
}

impl HydraulicMetrics {
    pub const fn cavitation_risk(&self) -> Grade {
        self.cavitation.risk()
    }

    pub fn flow_issue(&self) -> bool {
        self.flow_status != FlowStatus::Normal
    }
}

// ============================================================================
// Electrical Metrics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Normal,
    Underload,
    OverloadWarning,
    OverloadAlarm,
    Invalid,
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Underload => write!(f, "UNDERLOAD"),
            Self::OverloadWarning => write!(f, "OVERLOAD_WARNING"),
            Self::OverloadAlarm => write!(f, "OVERLOAD_ALARM"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlipStatus {
    Normal,
    LowSlip,
    HighSlip,
    CriticalOverload,
    Abnormal,
    Invalid,
    NotMeasured,
}

impl SlipStatus {
    /// Slip states that count as an electrical issue.
    pub const fn is_issue(self) -> bool {
        matches!(self, Self::HighSlip | Self::CriticalOverload | Self::Abnormal)
    }
}

impl std::fmt::Display for SlipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::LowSlip => write!(f, "LOW_SLIP"),
            Self::HighSlip => write!(f, "HIGH_SLIP"),
            Self::CriticalOverload => write!(f, "CRITICAL_OVERLOAD"),
            Self::Abnormal => write!(f, "ABNORMAL"),
            Self::Invalid => write!(f, "INVALID"),
            Self::NotMeasured => write!(f, "NOT_MEASURED"),
        }
    }
}

/// Imbalance of one three-phase quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhaseImbalance {
    pub average: f64,
    pub imbalance_pct: f64,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SlipMetrics {
    pub slip_pct: Option<f64>,
    pub slip_rpm: Option<f64>,
    pub status: SlipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricalMetrics {
    pub voltage: PhaseImbalance,
    pub current: PhaseImbalance,
    pub full_load_amps: f64,
    pub load_pct: f64,
    pub load_status: LoadStatus,
    pub slip: SlipMetrics,
}

// ============================================================================
// Mechanical (Vibration) Metrics
// ============================================================================

/// ISO 10816-3 severity zone. Ordered A (best) to D (worst).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IsoZone {
    A,
    B,
    C,
    D,
}

impl IsoZone {
    pub const fn description(self) -> &'static str {
        match self {
            Self::A => "Zone A (Good)",
            Self::B => "Zone B (Acceptable)",
            Self::C => "Zone C (Unsatisfactory)",
            Self::D => "Zone D (Unacceptable)",
        }
    }
}

impl std::fmt::Display for IsoZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        write!(f, "{letter}")
    }
}

/// DE/NDE averaged velocity per axis for one machine (mm/s).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DirectionalAverages {
    pub horizontal: f64,
    pub vertical: f64,
    pub axial: f64,
}

impl DirectionalAverages {
    pub const fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Horizontal => self.horizontal,
            Direction::Vertical => self.vertical,
            Direction::Axial => self.axial,
        }
    }

    pub fn max(&self) -> f64 {
        self.horizontal.max(self.vertical).max(self.axial)
    }

    /// Axis with the largest average. Ties resolve H, then V, then A.
    pub fn dominant(&self) -> Direction {
        let mut best = Direction::Horizontal;
        for direction in [Direction::Vertical, Direction::Axial] {
            if self.get(direction) > self.get(best) {
                best = direction;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineSeverity {
    pub machine: Machine,
    pub averages: DirectionalAverages,
    pub zone: IsoZone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MechanicalMetrics {
    pub driver: MachineSeverity,
    pub driven: MachineSeverity,
    /// Machine with the larger overall velocity (ties go to the driver)
    pub primary_component: Machine,
    pub dominant_direction: Direction,
    pub overall_zone: IsoZone,
    pub max_velocity_mm_s: f64,
    /// Velocity above which a fault is attributed (zone A ceiling)
    pub attribution_ceiling_mm_s: f64,
    pub fault: Option<FaultHypothesis>,
    pub fault_confidence: Grade,
    pub demod_max_g: f64,
    pub bearing_defect_risk: Grade,
}

// ============================================================================
// Thermal Metrics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BearingLocation {
    MotorDe,
    MotorNde,
    PumpDe,
    PumpNde,
}

impl BearingLocation {
    pub const ALL: [Self; 4] = [Self::MotorDe, Self::MotorNde, Self::PumpDe, Self::PumpNde];
}

impl std::fmt::Display for BearingLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MotorDe => write!(f, "Motor DE"),
            Self::MotorNde => write!(f, "Motor NDE"),
            Self::PumpDe => write!(f, "Pump DE"),
            Self::PumpNde => write!(f, "Pump NDE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BearingTemperature {
    pub location: BearingLocation,
    pub temperature_c: f64,
    pub rise_c: f64,
    /// False when the reading was absent and ambient was substituted
    pub measured: bool,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalMetrics {
    pub lubricant: Lubricant,
    pub ambient_c: f64,
    pub bearings: Vec<BearingTemperature>,
    pub max_temperature_c: f64,
    pub max_rise_c: f64,
    /// Absolute pump DE–NDE difference
    pub pump_de_nde_delta_c: f64,
    pub misalignment_suspected: bool,
    /// Volatile product with pump NDE rise above the seal limit
    pub seal_override: bool,
}

// ============================================================================
// Spectral Metrics
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectralFinding {
    pub component: Machine,
    pub direction: Direction,
    pub frequency_hz: f64,
    pub amplitude_mm_s: f64,
    pub ratio: f64,
    pub hypothesis: FaultHypothesis,
    pub confidence: Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectralAnalysis {
    pub rpm: f64,
    pub shaft_frequency_hz: f64,
    pub findings: Vec<SpectralFinding>,
}

impl SpectralAnalysis {
    /// Highest-confidence finding. Earlier findings win ties.
    pub fn strongest(&self) -> Option<&SpectralFinding> {
        self.findings
            .iter()
            .rev()
            .max_by_key(|f| f.confidence)
    }
}

// ============================================================================
// Domain Report
// ============================================================================

/// Typed per-domain metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportDetail {
    Hydraulic(HydraulicMetrics),
    Electrical(ElectricalMetrics),
    Vibration(MechanicalMetrics),
    Spectral(SpectralAnalysis),
    Thermal(ThermalMetrics),
}

impl ReportDetail {
    pub const fn domain(&self) -> Domain {
        match self {
            Self::Hydraulic(_) => Domain::Hydraulic,
            Self::Electrical(_) => Domain::Electrical,
            Self::Vibration(_) | Self::Spectral(_) => Domain::Mechanical,
            Self::Thermal(_) => Domain::Thermal,
        }
    }

    /// Short label used in summaries and audit rows.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hydraulic(_) => "Hydraulic",
            Self::Electrical(_) => "Electrical",
            Self::Vibration(_) => "Vibration",
            Self::Spectral(_) => "Spectral",
            Self::Thermal(_) => "Thermal",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainReport {
    pub status: DomainStatus,
    pub has_issue: bool,
    pub findings: Vec<String>,
    pub standard_ref: String,
    pub detail: ReportDetail,
}

impl DomainReport {
    pub const fn domain(&self) -> Domain {
        self.detail.domain()
    }

    pub const fn is_spectral(&self) -> bool {
        matches!(self.detail, ReportDetail::Spectral(_))
    }

    pub const fn as_hydraulic(&self) -> Option<&HydraulicMetrics> {
        match &self.detail {
            ReportDetail::Hydraulic(m) => Some(m),
            _ => None,
        }
    }

    pub const fn as_electrical(&self) -> Option<&ElectricalMetrics> {
        match &self.detail {
            ReportDetail::Electrical(m) => Some(m),
            _ => None,
        }
    }

    pub const fn as_mechanical(&self) -> Option<&MechanicalMetrics> {
        match &self.detail {
            ReportDetail::Vibration(m) => Some(m),
            _ => None,
        }
    }

    pub const fn as_spectral(&self) -> Option<&SpectralAnalysis> {
        match &self.detail {
            ReportDetail::Spectral(m) => Some(m),
            _ => None,
        }
    }

    pub const fn as_thermal(&self) -> Option<&ThermalMetrics> {
        match &self.detail {
            ReportDetail::Thermal(m) => Some(m),
            _ => None,
        }
    }

    /// First finding, or the status when there are none.
    pub fn headline(&self) -> String {
        self.findings
            .first()
            .cloned()
            .unwrap_or_else(|| self.status.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_order_is_precedence() {
        let mut domains = vec![Domain::Thermal, Domain::Hydraulic, Domain::Mechanical, Domain::Electrical];
        domains.sort();
        assert_eq!(domains, Domain::PRECEDENCE.to_vec());
    }

    #[test]
    fn dominant_direction_prefers_horizontal_on_tie() {
        let avg = DirectionalAverages { horizontal: 3.0, vertical: 3.0, axial: 2.0 };
        assert_eq!(avg.dominant(), Direction::Horizontal);
        let avg = DirectionalAverages { horizontal: 1.0, vertical: 2.0, axial: 4.0 };
        assert_eq!(avg.dominant(), Direction::Axial);
    }

    #[test]
    fn strongest_spectral_finding_keeps_first_on_tie() {
        let finding = |hypothesis, confidence| SpectralFinding {
            component: Machine::Driven,
            direction: Direction::Horizontal,
            frequency_hz: 49.2,
            amplitude_mm_s: 1.0,
            ratio: 1.0,
            hypothesis,
            confidence,
        };
        let analysis = SpectralAnalysis {
            rpm: 2950.0,
            shaft_frequency_hz: 49.17,
            findings: vec![
                finding(FaultHypothesis::OuterRaceDefect, Grade::Medium),
                finding(FaultHypothesis::Unbalance, Grade::High),
                finding(FaultHypothesis::Misalignment, Grade::High),
            ],
        };
        assert_eq!(analysis.strongest().map(|f| f.hypothesis), Some(FaultHypothesis::Unbalance));
    }

    #[test]
    fn spectral_detail_belongs_to_mechanical() {
        let detail = ReportDetail::Spectral(SpectralAnalysis { rpm: 0.0, shaft_frequency_hz: 0.0, findings: vec![] });
        assert_eq!(detail.domain(), Domain::Mechanical);
    }
}
