//! Executive summary of one diagnosis run.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{COMPLIANCE_REFERENCES, SUMMARY_KEY_ACTIONS};
use crate::types::{ActionPlan, DiagnosisResult, Grade, PrimaryDomain, ReportDetail, RiskLevel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisSummary {
    pub headline: String,
    pub primary_domain: PrimaryDomain,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub action_count: usize,
    pub requires_validation: bool,
    /// First few actions of the plan, in plan order
    pub key_actions: Vec<String>,
    pub compliance_references: Vec<String>,
}

fn headline(diagnosis: &DiagnosisResult) -> String {
    let Some(report) = diagnosis.primary_report.as_ref() else {
        return "All systems normal - continue routine monitoring".to_string();
    };

    let detail = match &report.detail {
        ReportDetail::Hydraulic(_) | ReportDetail::Thermal(_) => report.headline(),
        ReportDetail::Electrical(_) => format!("{} condition detected", report.status),
        ReportDetail::Vibration(v) => match v.fault {
            Some(fault) => format!("Zone {} vibration, {fault}", v.overall_zone),
            None => report.headline(),
        },
        ReportDetail::Spectral(s) => format!(
            "{} significant FFT peak(s) detected",
            s.findings.iter().filter(|f| f.confidence >= Grade::Medium).count()
        ),
    };

    let mut line = format!(
        "PRIMARY ISSUE: {} ({}) - {detail} [{}]",
        diagnosis.primary_domain, report.detail.label(), report.standard_ref
    );
    if diagnosis.requires_validation {
        line.push_str(" - POWER-OFF TEST REQUIRED before mechanical repair");
    }
    line
}

pub fn summarize(diagnosis: &DiagnosisResult, plan: &ActionPlan) -> DiagnosisSummary {
    DiagnosisSummary {
        headline: headline(diagnosis),
        primary_domain: diagnosis.primary_domain,
        risk_level: plan.risk_level,
        risk_score: plan.risk_score,
        action_count: plan.actions.len(),
        requires_validation: diagnosis.requires_validation,
        key_actions: plan
            .actions
            .iter()
            .take(SUMMARY_KEY_ACTIONS)
            .map(|a| format!("[{}] {} ({})", a.priority, a.description, a.timeline))
            .collect(),
        compliance_references: COMPLIANCE_REFERENCES.iter().map(ToString::to_string).collect(),
    }
}
