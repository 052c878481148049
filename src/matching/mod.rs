//! Skill matching engine.
//!
//! The engine is read-only: each call loads the rows it needs through the
//! injected [`Store`], builds a [`CoverageIndex`] and computes its answer from
//! that single snapshot.

mod coverage;
mod search;
mod utilization;

pub use coverage::{covers, CoverageIndex};
pub use search::{filter_personnel, PersonnelSearch};
pub use utilization::{
    aggregate_utilization, utilization_percentage, PersonnelUtilization,
    UTILIZATION_PER_ACTIVE_PROJECT,
};

use std::cmp::Reverse;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::db::Store;
use crate::error::{Error, Result};
use crate::models::{name_order, ExperienceLevel, Personnel};

/// Reported for every match. Only full coverage is ever returned, so there is
/// no partial score to compute.
pub const MATCH_PERCENTAGE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPersonnel {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    /// `skill:level` pairs, alphabetical by skill, joined with ", ".
    pub matched_skills: String,
    pub match_percentage: u8,
}

/// Personnel exactly covering `project_id`, most experienced first, then by name.
pub fn rank_matches(
    index: &CoverageIndex,
    personnel: &[Personnel],
    project_id: i32,
) -> Vec<MatchedPersonnel> {
    if index.required_count(project_id) == 0 {
        return Vec::new();
    }

    let mut matched: Vec<&Personnel> = personnel
        .iter()
        .filter(|person| index.satisfies(person.id, project_id))
        .collect();

    matched.sort_by(|a, b| {
        let rank = |p: &Personnel| Reverse(p.experience_level.map_or(0, ExperienceLevel::rank));
        rank(*a)
            .cmp(&rank(*b))
            .then_with(|| name_order(&a.name, &b.name))
    });

    matched
        .into_iter()
        .map(|person| MatchedPersonnel {
            id: person.id,
            name: person.name.clone(),
            email: person.email.clone(),
            role: person.role.clone(),
            experience_level: person.experience_level,
            matched_skills: index
                .matched_skills(person.id, project_id)
                .into_iter()
                .map(|(skill, level)| format!("{skill}:{level}"))
                .collect::<Vec<_>>()
                .join(", "),
            match_percentage: MATCH_PERCENTAGE,
        })
        .collect()
}

/// Runs matching, search and utilization against a repository.
#[derive(Clone)]
pub struct MatchingEngine {
    store: Store,
    timeout: Option<Duration>,
}

impl MatchingEngine {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(budget) => tokio::time::timeout(budget, operation)
                .await
                .map_err(|_| Error::Timeout(budget))?,
            None => operation.await,
        }
    }

    pub async fn match_project(&self, project_id: i32) -> Result<Vec<MatchedPersonnel>> {
        self.bounded(async {
            let requirements = self.store.list_project_requirements(project_id).await?;
            if requirements.is_empty() {
                debug!(project_id, "project has no required skills, nothing to match");
                return Ok(Vec::new());
            }

            let holdings = self.store.list_all_personnel_skills().await?;
            let personnel = self.store.list_personnel().await?;
            let index = CoverageIndex::new(&holdings, &requirements);

            let matches = rank_matches(&index, &personnel, project_id);
            debug!(
                project_id,
                required = requirements.len(),
                matched = matches.len(),
                "matched personnel"
            );
            Ok(matches)
        })
        .await
    }

    pub async fn search_personnel(&self, search: &PersonnelSearch) -> Result<Vec<Personnel>> {
        self.bounded(async {
            let personnel = self.store.list_personnel().await?;
            let holdings = if search.needs_holdings() {
                self.store.list_all_personnel_skills().await?
            } else {
                Vec::new()
            };

            Ok(filter_personnel(personnel, &holdings, search))
        })
        .await
    }

    pub async fn utilization(&self) -> Result<Vec<PersonnelUtilization>> {
        self.bounded(async {
            let personnel = self.store.list_personnel().await?;
            let projects = self.store.list_projects().await?;
            let holdings = self.store.list_all_personnel_skills().await?;
            let requirements = self.store.list_all_requirements().await?;
            let index = CoverageIndex::new(&holdings, &requirements);

            Ok(aggregate_utilization(&index, &personnel, &projects))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{NewPersonnel, NewProject, NewSkill, ProficiencyLevel, ProjectStatus};
    use std::sync::Arc;

    struct Fixture {
        engine: MatchingEngine,
        store: Store,
        skill_a: i32,
        project: i32,
    }

    async fn fixture() -> Fixture {
        let store = db::in_memory();
        let skill_a = store
            .create_skill(NewSkill::new("SkillA".into(), None, None).unwrap())
            .await
            .unwrap()
            .id;
        let skill_b = store
            .create_skill(NewSkill::new("SkillB".into(), None, None).unwrap())
            .await
            .unwrap()
            .id;
        let project = store
            .create_project(
                NewProject::new("P1".into(), None, None, None, Some(ProjectStatus::Active)).unwrap(),
            )
            .await
            .unwrap()
            .id;
        store.add_requirement(project, skill_a, ProficiencyLevel::Intermediate).await.unwrap();
        store.add_requirement(project, skill_b, ProficiencyLevel::Beginner).await.unwrap();

        let people = [
            ("X", Some(ExperienceLevel::Junior), vec![(skill_a, ProficiencyLevel::Advanced), (skill_b, ProficiencyLevel::Beginner)]),
            ("W", Some(ExperienceLevel::Senior), vec![(skill_a, ProficiencyLevel::Expert), (skill_b, ProficiencyLevel::Expert)]),
            ("V", None, vec![(skill_a, ProficiencyLevel::Intermediate), (skill_b, ProficiencyLevel::Advanced)]),
            ("Y", Some(ExperienceLevel::Senior), vec![(skill_a, ProficiencyLevel::Advanced)]),
            ("Z", Some(ExperienceLevel::Senior), vec![(skill_a, ProficiencyLevel::Beginner), (skill_b, ProficiencyLevel::Expert)]),
        ];
        for (name, level, skills) in people {
            let person = store
                .create_personnel(
                    NewPersonnel::new(name.into(), format!("{name}@example.com"), None, level).unwrap(),
                )
                .await
                .unwrap();
            for (skill, proficiency) in skills {
                store.assign_skill(person.id, skill, proficiency).await.unwrap();
            }
        }

        Fixture {
            engine: MatchingEngine::new(Arc::clone(&store)),
            store,
            skill_a,
            project,
        }
    }

    #[tokio::test]
    async fn matches_only_full_coverage_ordered_by_experience() {
        let f = fixture().await;
        let matches = f.engine.match_project(f.project).await.unwrap();

        let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["W", "X", "V"]);
        assert_eq!(matches[1].matched_skills, "SkillA:Advanced, SkillB:Beginner");
        assert!(matches.iter().all(|m| m.match_percentage == 100));
    }

    #[tokio::test]
    async fn unknown_project_is_empty() {
        let f = fixture().await;
        assert!(f.engine.match_project(9999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_last_requirement_empties_matches() {
        let f = fixture().await;
        assert!(f.store.delete_skill(f.skill_a).await.unwrap());
        // SkillB alone still has holders.
        assert_eq!(f.engine.match_project(f.project).await.unwrap().len(), 4);

        let remaining = f.store.list_project_requirements(f.project).await.unwrap();
        for requirement in remaining {
            f.store.delete_skill(requirement.skill_id).await.unwrap();
        }
        assert!(f.engine.match_project(f.project).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn utilization_agrees_with_matcher() {
        let f = fixture().await;
        let matched: Vec<i32> = f
            .engine
            .match_project(f.project)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();

        for row in f.engine.utilization().await.unwrap() {
            let expected = u32::from(matched.contains(&row.id));
            assert_eq!(row.project_count, expected, "{}", row.name);
            assert_eq!(row.active_project_count, expected);
            assert_eq!(row.utilization_percentage, expected * 25);
        }
    }

    #[tokio::test]
    async fn search_goes_through_store() {
        let f = fixture().await;
        let search = PersonnelSearch {
            skill_id: Some(f.skill_a),
            min_proficiency: Some(ProficiencyLevel::Advanced),
            ..Default::default()
        };
        let mut names: Vec<String> = f
            .engine
            .search_personnel(&search)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["W", "X", "Y"]);
    }

    #[tokio::test]
    async fn budget_expiry_is_a_timeout() {
        let engine = MatchingEngine::new(db::in_memory())
            .with_timeout(Some(Duration::from_millis(10)));
        let result = engine
            .bounded(std::future::pending::<Result<()>>())
            .await;
        assert!(matches!(result, Err(Error::Timeout(_))));

        let unbounded = MatchingEngine::new(db::in_memory());
        assert!(unbounded.utilization().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn equal_experience_sorts_names_ignoring_case() {
        let store = db::in_memory();
        let skill = store
            .create_skill(NewSkill::new("Rust".into(), None, None).unwrap())
            .await
            .unwrap()
            .id;
        let project = store
            .create_project(
                NewProject::new("P".into(), None, None, None, Some(ProjectStatus::Active)).unwrap(),
            )
            .await
            .unwrap()
            .id;
        store.add_requirement(project, skill, ProficiencyLevel::Beginner).await.unwrap();
        for name in ["Carol", "bob"] {
            let person = store
                .create_personnel(
                    NewPersonnel::new(
                        name.into(),
                        format!("{name}@example.com"),
                        None,
                        Some(ExperienceLevel::Senior),
                    )
                    .unwrap(),
                )
                .await
                .unwrap();
            store.assign_skill(person.id, skill, ProficiencyLevel::Expert).await.unwrap();
        }
        let engine = MatchingEngine::new(store);

        let matched: Vec<String> = engine
            .match_project(project)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(matched, vec!["bob", "Carol"]);

        let utilization: Vec<String> = engine
            .utilization()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(utilization, vec!["bob", "Carol"]);
    }
}
