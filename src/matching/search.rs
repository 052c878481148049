use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::{non_blank, ExperienceLevel, Personnel, PersonnelSkill, ProficiencyLevel};

/// Conjunctive personnel filters. Every `None` is "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonnelSearch {
    pub experience_level: Option<ExperienceLevel>,
    pub skill_id: Option<i32>,
    /// Only consulted together with `skill_id`.
    pub min_proficiency: Option<ProficiencyLevel>,
}

impl PersonnelSearch {
    /// Validates raw filter values; blanks are treated as absent.
    pub fn from_params(
        experience_level: Option<String>,
        skill_id: Option<String>,
        min_proficiency: Option<String>,
    ) -> Result<Self> {
        let experience_level = non_blank(experience_level)
            .map(|raw| raw.parse::<ExperienceLevel>())
            .transpose()?;
        let skill_id = non_blank(skill_id)
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| Error::InvalidInput(format!("Invalid skillId: {raw}")))
            })
            .transpose()?;
        let min_proficiency = non_blank(min_proficiency)
            .map(|raw| raw.parse::<ProficiencyLevel>())
            .transpose()?;

        Ok(Self {
            experience_level,
            skill_id,
            min_proficiency,
        })
    }

    pub fn needs_holdings(&self) -> bool {
        self.skill_id.is_some()
    }

    fn accepts(&self, person: &Personnel, held: Option<&HashMap<i32, ProficiencyLevel>>) -> bool {
        if let Some(level) = self.experience_level {
            if person.experience_level != Some(level) {
                return false;
            }
        }

        if let Some(skill_id) = self.skill_id {
            let Some(level) = held.and_then(|skills| skills.get(&skill_id)) else {
                return false;
            };
            if let Some(minimum) = self.min_proficiency {
                if !level.meets(minimum) {
                    return false;
                }
            }
        }

        true
    }
}

/// Keeps the personnel accepted by `search`, preserving input order.
pub fn filter_personnel(
    personnel: Vec<Personnel>,
    holdings: &[PersonnelSkill],
    search: &PersonnelSearch,
) -> Vec<Personnel> {
    let mut by_person: HashMap<i32, HashMap<i32, ProficiencyLevel>> = HashMap::new();
    for holding in holdings {
        by_person
            .entry(holding.personnel_id)
            .or_default()
            .insert(holding.skill_id, holding.proficiency_level);
    }

    personnel
        .into_iter()
        .filter(|person| search.accepts(person, by_person.get(&person.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn person(id: i32, level: Option<ExperienceLevel>) -> Personnel {
        Personnel {
            id,
            name: format!("Person {id}"),
            email: format!("p{id}@example.com"),
            role: None,
            experience_level: level,
            created_at: Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap(),
        }
    }

    fn holding(personnel_id: i32, skill_id: i32, level: ProficiencyLevel) -> PersonnelSkill {
        PersonnelSkill {
            personnel_id,
            skill_id,
            skill_name: format!("Skill {skill_id}"),
            proficiency_level: level,
        }
    }

    fn ids(personnel: &[Personnel]) -> Vec<i32> {
        personnel.iter().map(|p| p.id).collect()
    }

    fn roster() -> (Vec<Personnel>, Vec<PersonnelSkill>) {
        // newest first, the order the repository hands them over in
        let personnel = vec![
            person(3, Some(ExperienceLevel::Senior)),
            person(2, Some(ExperienceLevel::Junior)),
            person(1, None),
        ];
        let holdings = vec![
            holding(1, 7, ProficiencyLevel::Intermediate),
            holding(2, 7, ProficiencyLevel::Advanced),
            holding(3, 8, ProficiencyLevel::Expert),
        ];
        (personnel, holdings)
    }

    #[test]
    fn no_filters_returns_everyone_in_order() {
        let (personnel, holdings) = roster();
        let found = filter_personnel(personnel, &holdings, &PersonnelSearch::default());
        assert_eq!(ids(&found), vec![3, 2, 1]);
    }

    #[test]
    fn skill_without_minimum_accepts_any_level() {
        let (personnel, holdings) = roster();
        let search = PersonnelSearch::from_params(None, Some("7".into()), None).unwrap();
        assert_eq!(ids(&filter_personnel(personnel, &holdings, &search)), vec![2, 1]);
    }

    #[test]
    fn minimum_excludes_lower_levels() {
        let (personnel, holdings) = roster();
        let search =
            PersonnelSearch::from_params(None, Some("7".into()), Some("Advanced".into())).unwrap();
        assert_eq!(ids(&filter_personnel(personnel, &holdings, &search)), vec![2]);
    }

    #[test]
    fn experience_level_is_anded() {
        let (personnel, holdings) = roster();
        let search =
            PersonnelSearch::from_params(Some("Senior".into()), Some("7".into()), None).unwrap();
        assert!(filter_personnel(personnel.clone(), &holdings, &search).is_empty());

        let search = PersonnelSearch::from_params(Some("Senior".into()), None, None).unwrap();
        assert_eq!(ids(&filter_personnel(personnel, &holdings, &search)), vec![3]);
    }

    #[test]
    fn minimum_alone_is_ignored() {
        let (personnel, holdings) = roster();
        let search = PersonnelSearch::from_params(None, None, Some("Expert".into())).unwrap();
        assert_eq!(ids(&filter_personnel(personnel, &holdings, &search)), vec![3, 2, 1]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            PersonnelSearch::from_params(None, None, Some("Wizard".into())),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PersonnelSearch::from_params(None, Some("seven".into()), None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PersonnelSearch::from_params(Some("Lead".into()), None, None),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(
            PersonnelSearch::from_params(Some(String::new()), Some(" ".into()), None).unwrap(),
            PersonnelSearch::default()
        );
    }
}
