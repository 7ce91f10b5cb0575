//! Maintenance action plan types.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Action urgency. Declaration order is execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    Critical,
    Immediate,
    High,
    Medium,
    Low,
    Routine,
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::Immediate => write!(f, "IMMEDIATE"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
            Self::Routine => write!(f, "ROUTINE"),
        }
    }
}

/// Plan-level risk, derived from the most urgent action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn from_priority(priority: ActionPriority) -> Self {
        match priority {
            ActionPriority::Critical | ActionPriority::Immediate => Self::Critical,
            ActionPriority::High => Self::High,
            ActionPriority::Medium => Self::Medium,
            ActionPriority::Low | ActionPriority::Routine => Self::Low,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponsibleParty {
    OperationsTeam,
    MaintenanceTeam,
    ElectricalTeam,
    VibrationAnalyst,
    ReliabilityEngineer,
}

impl std::fmt::Display for ResponsibleParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperationsTeam => write!(f, "Operations Team"),
            Self::MaintenanceTeam => write!(f, "Maintenance Team"),
            Self::ElectricalTeam => write!(f, "Electrical Team"),
            Self::VibrationAnalyst => write!(f, "Vibration Analyst"),
            Self::ReliabilityEngineer => write!(f, "Reliability Engineer"),
        }
    }
}

/// When an action must be done.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Continuous,
    WithinHours(u32),
    /// Not before the first bound, not after the second
    BetweenHours(u32, u32),
    WithinDays(u32),
    BeforeMechanicalRepair,
    AfterCompletion,
    NextScheduledInspection,
}

impl Timeline {
    /// Latest allowed completion, in hours from inspection.
    pub const fn deadline_hours(self) -> Option<u32> {
        match self {
            Self::WithinHours(h) | Self::BetweenHours(_, h) => Some(h),
            Self::WithinDays(d) => Some(d * 24),
            _ => None,
        }
    }

    /// Calendar due date counted from the inspection date, rounded up to whole days.
    pub fn due_date(self, from: NaiveDate) -> Option<NaiveDate> {
        let hours = self.deadline_hours()?;
        from.checked_add_days(Days::new(u64::from(hours.div_ceil(24))))
    }
}

impl std::fmt::Display for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous => write!(f, "Continuous"),
            Self::WithinHours(h) => write!(f, "< {h} hours"),
            Self::BetweenHours(lo, hi) => write!(f, "{lo}-{hi} hours"),
            Self::WithinDays(d) => write!(f, "< {d} days"),
            Self::BeforeMechanicalRepair => write!(f, "Before mechanical repair"),
            Self::AfterCompletion => write!(f, "After completion"),
            Self::NextScheduledInspection => write!(f, "Next scheduled inspection"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionItem {
    pub priority: ActionPriority,
    pub description: String,
    pub timeline: Timeline,
    pub responsible_party: ResponsibleParty,
    pub standard_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_procedure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_by: Option<NaiveDate>,
}

impl ActionItem {
    pub fn new(
        priority: ActionPriority,
        description: impl Into<String>,
        timeline: Timeline,
        responsible_party: ResponsibleParty,
        standard_ref: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            description: description.into(),
            timeline,
            responsible_party,
            standard_ref: standard_ref.into(),
            validation_procedure: None,
            due_by: None,
        }
    }

    #[must_use]
    pub fn with_validation(mut self, procedure: impl Into<String>) -> Self {
        self.validation_procedure = Some(procedure.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionPlan {
    /// 0..=100, product risk factor × severity multiplier × age factor
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub age_years: i32,
    pub age_factor: f64,
    pub actions: Vec<ActionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_display_matches_work_order_wording() {
        assert_eq!(Timeline::WithinHours(4).to_string(), "< 4 hours");
        assert_eq!(Timeline::BetweenHours(24, 48).to_string(), "24-48 hours");
        assert_eq!(Timeline::WithinDays(7).to_string(), "< 7 days");
    }

    #[test]
    fn due_date_rounds_up_to_whole_days() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(Timeline::WithinHours(4).due_date(date), NaiveDate::from_ymd_opt(2026, 3, 11));
        assert_eq!(Timeline::BetweenHours(24, 48).due_date(date), NaiveDate::from_ymd_opt(2026, 3, 12));
        assert_eq!(Timeline::WithinDays(14).due_date(date), NaiveDate::from_ymd_opt(2026, 3, 24));
        assert_eq!(Timeline::Continuous.due_date(date), None);
    }

    #[test]
    fn risk_level_follows_priority() {
        assert_eq!(RiskLevel::from_priority(ActionPriority::Immediate), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_priority(ActionPriority::Routine), RiskLevel::Low);
        assert!(ActionPriority::Critical < ActionPriority::Routine);
    }
}
