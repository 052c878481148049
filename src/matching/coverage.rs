use std::collections::{BTreeMap, HashMap};

use crate::models::{name_order, PersonnelSkill, ProficiencyLevel, ProjectRequiredSkill};

/// In-memory join of personnel holdings and project requirements.
///
/// Every "does this person match this project" question in the crate goes
/// through [`CoverageIndex::satisfies`].
#[derive(Debug, Default, Clone)]
pub struct CoverageIndex {
    // personnel_id -> skill_id -> held level
    holdings: HashMap<i32, HashMap<i32, ProficiencyLevel>>,
    // project_id -> skill_id -> minimum level
    requirements: HashMap<i32, BTreeMap<i32, ProficiencyLevel>>,
    skill_names: HashMap<i32, String>,
}

impl CoverageIndex {
    pub fn new(holdings: &[PersonnelSkill], requirements: &[ProjectRequiredSkill]) -> Self {
        let mut index = CoverageIndex::default();

        for holding in holdings {
            index
                .holdings
                .entry(holding.personnel_id)
                .or_default()
                .insert(holding.skill_id, holding.proficiency_level);
            index
                .skill_names
                .entry(holding.skill_id)
                .or_insert_with(|| holding.skill_name.clone());
        }

        for requirement in requirements {
            index
                .requirements
                .entry(requirement.project_id)
                .or_default()
                .insert(requirement.skill_id, requirement.minimum_proficiency_level);
            index
                .skill_names
                .entry(requirement.skill_id)
                .or_insert_with(|| requirement.skill_name.clone());
        }

        index
    }

    /// Number of distinct skills the project requires.
    pub fn required_count(&self, project_id: i32) -> usize {
        self.requirements.get(&project_id).map_or(0, BTreeMap::len)
    }

    /// Exact coverage: the person meets every one of the project's minimums.
    ///
    /// A project without requirements is satisfied by nobody.
    pub fn satisfies(&self, personnel_id: i32, project_id: i32) -> bool {
        let Some(required) = self.requirements.get(&project_id) else {
            return false;
        };
        match self.holdings.get(&personnel_id) {
            Some(held) => covers(held, required),
            None => false,
        }
    }

    /// The person's levels on the project's required skills, by skill name.
    pub fn matched_skills(&self, personnel_id: i32, project_id: i32) -> Vec<(&str, ProficiencyLevel)> {
        let (Some(required), Some(held)) = (
            self.requirements.get(&project_id),
            self.holdings.get(&personnel_id),
        ) else {
            return Vec::new();
        };

        let mut matched: Vec<(&str, ProficiencyLevel)> = required
            .iter()
            .filter_map(|(skill_id, minimum)| {
                held.get(skill_id)
                    .filter(|level| level.meets(*minimum))
                    .map(|level| (self.skill_name(*skill_id), *level))
            })
            .collect();
        matched.sort_by(|a, b| name_order(a.0, b.0));
        matched
    }

    pub fn skill_name(&self, skill_id: i32) -> &str {
        self.skill_names
            .get(&skill_id)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Counts the required skills met at or above their minimum and checks the
/// count equals the number of requirements.
pub fn covers(
    held: &HashMap<i32, ProficiencyLevel>,
    required: &BTreeMap<i32, ProficiencyLevel>,
) -> bool {
    let total_required = required.len();
    if total_required == 0 {
        return false;
    }

    let matched = required
        .iter()
        .filter(|(skill_id, minimum)| {
            held.get(*skill_id)
                .is_some_and(|level| level.meets(**minimum))
        })
        .count();

    matched == total_required
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProficiencyLevel::*;

    const SKILL_A: i32 = 1;
    const SKILL_B: i32 = 2;
    const P1: i32 = 100;
    const X: i32 = 10;
    const Y: i32 = 11;
    const Z: i32 = 12;

    fn holding(personnel_id: i32, skill_id: i32, level: ProficiencyLevel) -> PersonnelSkill {
        PersonnelSkill {
            personnel_id,
            skill_id,
            skill_name: if skill_id == SKILL_A { "SkillA" } else { "SkillB" }.to_string(),
            proficiency_level: level,
        }
    }

    fn requirement(project_id: i32, skill_id: i32, minimum: ProficiencyLevel) -> ProjectRequiredSkill {
        ProjectRequiredSkill {
            project_id,
            skill_id,
            skill_name: if skill_id == SKILL_A { "SkillA" } else { "SkillB" }.to_string(),
            minimum_proficiency_level: minimum,
        }
    }

    fn scenario() -> CoverageIndex {
        let holdings = vec![
            holding(X, SKILL_A, Advanced),
            holding(X, SKILL_B, Beginner),
            holding(Y, SKILL_A, Advanced),
            holding(Z, SKILL_A, Beginner),
            holding(Z, SKILL_B, Expert),
        ];
        let requirements = vec![
            requirement(P1, SKILL_A, Intermediate),
            requirement(P1, SKILL_B, Beginner),
        ];
        CoverageIndex::new(&holdings, &requirements)
    }

    #[test]
    fn full_coverage_matches() {
        assert!(scenario().satisfies(X, P1));
    }

    #[test]
    fn missing_skill_excludes() {
        assert!(!scenario().satisfies(Y, P1));
    }

    #[test]
    fn below_minimum_excludes() {
        assert!(!scenario().satisfies(Z, P1));
    }

    #[test]
    fn project_without_requirements_matches_nobody() {
        let index = CoverageIndex::new(&[holding(X, SKILL_A, Expert)], &[]);
        assert!(!index.satisfies(X, P1));
        assert_eq!(index.required_count(P1), 0);
        assert!(!covers(&HashMap::from([(SKILL_A, Expert)]), &BTreeMap::new()));
    }

    #[test]
    fn unknown_person_matches_nothing() {
        assert!(!scenario().satisfies(999, P1));
    }

    #[test]
    fn matched_skills_sorted_by_name() {
        let index = scenario();
        assert_eq!(
            index.matched_skills(X, P1),
            vec![("SkillA", Advanced), ("SkillB", Beginner)]
        );
        assert_eq!(index.required_count(P1), 2);
    }
}
