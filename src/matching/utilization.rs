use std::cmp::Reverse;

use serde::Serialize;

use crate::matching::CoverageIndex;
use crate::models::{name_order, ExperienceLevel, Personnel, Project, ProjectStatus};

/// Percentage points credited per active matching project.
///
/// A linear proxy kept as-is; four active matches saturate at 100.
pub const UTILIZATION_PER_ACTIVE_PROJECT: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelUtilization {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub project_count: u32,
    pub active_project_count: u32,
    pub planning_project_count: u32,
    pub completed_project_count: u32,
    pub utilization_percentage: u32,
}

pub fn utilization_percentage(active_project_count: u32) -> u32 {
    active_project_count
        .saturating_mul(UTILIZATION_PER_ACTIVE_PROJECT)
        .min(100)
}

/// Per-person counts of exactly covered projects, busiest first.
pub fn aggregate_utilization(
    index: &CoverageIndex,
    personnel: &[Personnel],
    projects: &[Project],
) -> Vec<PersonnelUtilization> {
    let mut rows: Vec<PersonnelUtilization> = personnel
        .iter()
        .map(|person| {
            let mut row = PersonnelUtilization {
                id: person.id,
                name: person.name.clone(),
                email: person.email.clone(),
                role: person.role.clone(),
                experience_level: person.experience_level,
                project_count: 0,
                active_project_count: 0,
                planning_project_count: 0,
                completed_project_count: 0,
                utilization_percentage: 0,
            };

            for project in projects.iter().filter(|p| index.satisfies(person.id, p.id)) {
                row.project_count += 1;
                match project.status {
                    ProjectStatus::Active => row.active_project_count += 1,
                    ProjectStatus::Planning => row.planning_project_count += 1,
                    ProjectStatus::Completed => row.completed_project_count += 1,
                    _ => {}
                }
            }

            row.utilization_percentage = utilization_percentage(row.active_project_count);
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        Reverse(a.project_count)
            .cmp(&Reverse(b.project_count))
            .then_with(|| name_order(&a.name, &b.name))
    });
    rows
}
