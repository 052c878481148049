use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Competence rating held by personnel or required by a project.
///
/// Variants are declared in rank order, so the derived `Ord` is the
/// Beginner < Intermediate < Advanced < Expert ordering used by matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
        ProficiencyLevel::Expert,
    ];

    pub fn rank(self) -> u8 {
        match self {
            ProficiencyLevel::Beginner => 1,
            ProficiencyLevel::Intermediate => 2,
            ProficiencyLevel::Advanced => 3,
            ProficiencyLevel::Expert => 4,
        }
    }

    /// True when a holder at `self` satisfies a `minimum` requirement.
    pub fn meets(self, minimum: ProficiencyLevel) -> bool {
        self.rank() >= minimum.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
            ProficiencyLevel::Expert => "Expert",
        }
    }

    /// Cycles forward through the levels, used by the console pickers.
    pub fn next(self) -> Self {
        match self {
            ProficiencyLevel::Beginner => ProficiencyLevel::Intermediate,
            ProficiencyLevel::Intermediate => ProficiencyLevel::Advanced,
            ProficiencyLevel::Advanced => ProficiencyLevel::Expert,
            ProficiencyLevel::Expert => ProficiencyLevel::Beginner,
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProficiencyLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid proficiency level: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Junior,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
    ];

    pub fn rank(self) -> u8 {
        match self {
            ExperienceLevel::Junior => 1,
            ExperienceLevel::MidLevel => 2,
            ExperienceLevel::Senior => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::Senior => "Senior",
        }
    }

    /// Steps through unset, Junior, Mid-Level, Senior and back to unset.
    pub fn cycle(level: Option<Self>) -> Option<Self> {
        match level {
            None => Some(ExperienceLevel::Junior),
            Some(ExperienceLevel::Junior) => Some(ExperienceLevel::MidLevel),
            Some(ExperienceLevel::MidLevel) => Some(ExperienceLevel::Senior),
            Some(ExperienceLevel::Senior) => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid experience level: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
    Cancelled,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Planning,
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
        ProjectStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Cancelled => "Cancelled",
            ProjectStatus::Archived => "Archived",
        }
    }

    pub fn next(self) -> Self {
        let i = ProjectStatus::ALL
            .iter()
            .position(|status| *status == self)
            .unwrap_or(0);
        ProjectStatus::ALL[(i + 1) % ProjectStatus::ALL.len()]
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid project status: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiency_order_is_total() {
        assert!(ProficiencyLevel::Beginner < ProficiencyLevel::Intermediate);
        assert!(ProficiencyLevel::Intermediate < ProficiencyLevel::Advanced);
        assert!(ProficiencyLevel::Advanced < ProficiencyLevel::Expert);
        assert!(ProficiencyLevel::Expert.meets(ProficiencyLevel::Expert));
        assert!(ProficiencyLevel::Advanced.meets(ProficiencyLevel::Intermediate));
        assert!(!ProficiencyLevel::Beginner.meets(ProficiencyLevel::Intermediate));
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("Mid-Level".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::MidLevel);
        assert_eq!("On Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!("Expert".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Expert);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!("Guru".parse::<ProficiencyLevel>(), Err(Error::InvalidInput(_))));
        assert!(matches!("mid-level".parse::<ExperienceLevel>(), Err(Error::InvalidInput(_))));
        assert!(matches!("Done".parse::<ProjectStatus>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let level: ExperienceLevel = serde_json::from_str("\"Mid-Level\"").unwrap();
        assert_eq!(level, ExperienceLevel::MidLevel);
    }

    #[test]
    fn status_cycles_through_all_values() {
        let mut status = ProjectStatus::Planning;
        for _ in 0..ProjectStatus::ALL.len() {
            status = status.next();
        }
        assert_eq!(status, ProjectStatus::Planning);
    }

    #[test]
    fn experience_cycle_returns_to_unset() {
        let mut level = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            level = ExperienceLevel::cycle(level);
            seen.push(level);
        }
        assert_eq!(
            seen,
            vec![
                Some(ExperienceLevel::Junior),
                Some(ExperienceLevel::MidLevel),
                Some(ExperienceLevel::Senior),
                None
            ]
        );
    }
}
