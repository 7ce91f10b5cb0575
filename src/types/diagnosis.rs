//! Resolver output: the single root cause plus everything else that was found.

use serde::{Deserialize, Serialize};

use super::report::{Domain, DomainReport};

/// Root-cause domain, or `Normal` when no report carries an issue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryDomain {
    Hydraulic,
    Electrical,
    Mechanical,
    Thermal,
    Normal,
}

impl PrimaryDomain {
    pub const fn domain(self) -> Option<Domain> {
        match self {
            Self::Hydraulic => Some(Domain::Hydraulic),
            Self::Electrical => Some(Domain::Electrical),
            Self::Mechanical => Some(Domain::Mechanical),
            Self::Thermal => Some(Domain::Thermal),
            Self::Normal => None,
        }
    }
}

impl From<Domain> for PrimaryDomain {
    fn from(domain: Domain) -> Self {
        match domain {
            Domain::Hydraulic => Self::Hydraulic,
            Domain::Electrical => Self::Electrical,
            Domain::Mechanical => Self::Mechanical,
            Domain::Thermal => Self::Thermal,
        }
    }
}

impl std::fmt::Display for PrimaryDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.domain() {
            Some(domain) => write!(f, "{domain}"),
            None => write!(f, "NORMAL"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisResult {
    pub primary_domain: PrimaryDomain,
    /// The report that decided the primary domain
    pub primary_report: Option<DomainReport>,
    pub secondary_note: Option<String>,
    /// Electrical is clean and the root cause is mechanical: confirm with a coast-down test
    pub requires_validation: bool,
    /// Every report with an issue, ordered by domain precedence
    pub all_issues: Vec<DomainReport>,
}

impl DiagnosisResult {
    pub fn normal() -> Self {
        Self {
            primary_domain: PrimaryDomain::Normal,
            primary_report: None,
            secondary_note: None,
            requires_validation: false,
            all_issues: Vec::new(),
        }
    }

    pub fn is_normal(&self) -> bool {
        self.primary_domain == PrimaryDomain::Normal
    }

    pub fn issues_in(&self, domain: Domain) -> impl Iterator<Item = &DomainReport> {
        self.all_issues.iter().filter(move |r| r.domain() == domain)
    }
}
