use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::{Repository, StoreHealth};
use crate::error::{Error, Result};
use crate::models::{
    name_order, AssignOutcome, NewPersonnel, NewProject, NewSkill, Personnel, PersonnelPatch,
    PersonnelSkill, ProficiencyLevel, Project, ProjectPatch, ProjectRequiredSkill, Skill,
    SkillPatch,
};

#[derive(Default)]
struct Tables {
    next_id: i32,
    skills: BTreeMap<i32, Skill>,
    personnel: BTreeMap<i32, Personnel>,
    projects: BTreeMap<i32, Project>,
    // (personnel_id, skill_id) -> level
    personnel_skills: BTreeMap<(i32, i32), ProficiencyLevel>,
    // (project_id, skill_id) -> minimum
    requirements: BTreeMap<(i32, i32), ProficiencyLevel>,
}

impl Tables {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn skill_name(&self, skill_id: i32) -> String {
        self.skills
            .get(&skill_id)
            .map(|skill| skill.name.clone())
            .unwrap_or_default()
    }

    fn email_taken(&self, email: &str, except_id: Option<i32>) -> bool {
        self.personnel
            .values()
            .any(|p| p.email == email && Some(p.id) != except_id)
    }

    fn skill_name_taken(&self, name: &str, except_id: Option<i32>) -> bool {
        self.skills
            .values()
            .any(|s| s.name == name && Some(s.id) != except_id)
    }

    fn holding(&self, personnel_id: i32, skill_id: i32, level: ProficiencyLevel) -> PersonnelSkill {
        PersonnelSkill {
            personnel_id,
            skill_id,
            skill_name: self.skill_name(skill_id),
            proficiency_level: level,
        }
    }

    fn requirement(&self, project_id: i32, skill_id: i32, minimum: ProficiencyLevel) -> ProjectRequiredSkill {
        ProjectRequiredSkill {
            project_id,
            skill_id,
            skill_name: self.skill_name(skill_id),
            minimum_proficiency_level: minimum,
        }
    }
}

/// In-process repository with the same ordering, uniqueness and cascade rules
/// as the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i32)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn by_skill_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| name_order(name(a), name(b)));
}

#[async_trait]
impl Repository for MemoryStore {
    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let tables = self.tables.read().await;
        let mut skills: Vec<Skill> = tables.skills.values().cloned().collect();
        by_skill_name(&mut skills, |s| s.name.as_str());
        Ok(skills)
    }

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>> {
        Ok(self.tables.read().await.skills.get(&id).cloned())
    }

    async fn create_skill(&self, skill: NewSkill) -> Result<Skill> {
        let mut tables = self.tables.write().await;
        if tables.skill_name_taken(&skill.name, None) {
            return Err(Error::Conflict("Skill name already exists".to_string()));
        }

        let skill = Skill {
            id: tables.allocate_id(),
            name: skill.name,
            category: skill.category,
            description: skill.description,
            created_at: Utc::now(),
        };
        tables.skills.insert(skill.id, skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: i32, patch: SkillPatch) -> Result<Option<Skill>> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &patch.name {
            if tables.skill_name_taken(name, Some(id)) {
                return Err(Error::Conflict("Skill name already exists".to_string()));
            }
        }

        Ok(tables.skills.get_mut(&id).map(|skill| {
            patch.apply(skill);
            skill.clone()
        }))
    }

    async fn delete_skill(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.personnel_skills.retain(|(_, skill_id), _| *skill_id != id);
        tables.requirements.retain(|(_, skill_id), _| *skill_id != id);
        Ok(tables.skills.remove(&id).is_some())
    }

    async fn list_personnel(&self) -> Result<Vec<Personnel>> {
        let tables = self.tables.read().await;
        let mut personnel: Vec<Personnel> = tables.personnel.values().cloned().collect();
        newest_first(&mut personnel, |p| (p.created_at, p.id));
        Ok(personnel)
    }

    async fn get_personnel(&self, id: i32) -> Result<Option<Personnel>> {
        Ok(self.tables.read().await.personnel.get(&id).cloned())
    }

    async fn create_personnel(&self, personnel: NewPersonnel) -> Result<Personnel> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&personnel.email, None) {
            return Err(Error::Conflict("Email already exists".to_string()));
        }

        let personnel = Personnel {
            id: tables.allocate_id(),
            name: personnel.name,
            email: personnel.email,
            role: personnel.role,
            experience_level: personnel.experience_level,
            created_at: Utc::now(),
        };
        tables.personnel.insert(personnel.id, personnel.clone());
        Ok(personnel)
    }

    async fn update_personnel(&self, id: i32, patch: PersonnelPatch) -> Result<Option<Personnel>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &patch.email {
            if tables.email_taken(email, Some(id)) {
                return Err(Error::Conflict("Email already exists".to_string()));
            }
        }

        Ok(tables.personnel.get_mut(&id).map(|personnel| {
            patch.apply(personnel);
            personnel.clone()
        }))
    }

    async fn delete_personnel(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.personnel_skills.retain(|(personnel_id, _), _| *personnel_id != id);
        Ok(tables.personnel.remove(&id).is_some())
    }

    async fn list_personnel_skills(&self, personnel_id: i32) -> Result<Vec<PersonnelSkill>> {
        let tables = self.tables.read().await;
        let mut skills: Vec<PersonnelSkill> = tables
            .personnel_skills
            .iter()
            .filter(|((pid, _), _)| *pid == personnel_id)
            .map(|(&(pid, sid), &level)| tables.holding(pid, sid, level))
            .collect();
        by_skill_name(&mut skills, |s| s.skill_name.as_str());
        Ok(skills)
    }

    async fn list_all_personnel_skills(&self) -> Result<Vec<PersonnelSkill>> {
        let tables = self.tables.read().await;
        Ok(tables
            .personnel_skills
            .iter()
            .map(|(&(pid, sid), &level)| tables.holding(pid, sid, level))
            .collect())
    }

    async fn assign_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<AssignOutcome> {
        let mut tables = self.tables.write().await;
        if !tables.personnel.contains_key(&personnel_id) || !tables.skills.contains_key(&skill_id) {
            return Err(Error::NotFound("Referenced record not found".to_string()));
        }

        let outcome = match tables.personnel_skills.insert((personnel_id, skill_id), level) {
            Some(_) => AssignOutcome::Updated,
            None => AssignOutcome::Created,
        };
        Ok(outcome)
    }

    async fn update_personnel_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(match tables.personnel_skills.get_mut(&(personnel_id, skill_id)) {
            Some(current) => {
                *current = level;
                true
            }
            None => false,
        })
    }

    async fn remove_personnel_skill(&self, personnel_id: i32, skill_id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.personnel_skills.remove(&(personnel_id, skill_id)).is_some())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables.projects.values().cloned().collect();
        newest_first(&mut projects, |p| (p.created_at, p.id));
        Ok(projects)
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let mut tables = self.tables.write().await;
        let project = Project {
            id: tables.allocate_id(),
            name: project.name,
            description: project.description,
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: i32, patch: ProjectPatch) -> Result<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.get_mut(&id).map(|project| {
            patch.apply(project);
            project.clone()
        }))
    }

    async fn delete_project(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.requirements.retain(|(project_id, _), _| *project_id != id);
        Ok(tables.projects.remove(&id).is_some())
    }

    async fn list_project_requirements(&self, project_id: i32) -> Result<Vec<ProjectRequiredSkill>> {
        let tables = self.tables.read().await;
        let mut requirements: Vec<ProjectRequiredSkill> = tables
            .requirements
            .iter()
            .filter(|((pid, _), _)| *pid == project_id)
            .map(|(&(pid, sid), &minimum)| tables.requirement(pid, sid, minimum))
            .collect();
        by_skill_name(&mut requirements, |r| r.skill_name.as_str());
        Ok(requirements)
    }

    async fn list_all_requirements(&self) -> Result<Vec<ProjectRequiredSkill>> {
        let tables = self.tables.read().await;
        Ok(tables
            .requirements
            .iter()
            .map(|(&(pid, sid), &minimum)| tables.requirement(pid, sid, minimum))
            .collect())
    }

    async fn add_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&project_id) || !tables.skills.contains_key(&skill_id) {
            return Err(Error::NotFound("Referenced record not found".to_string()));
        }
        if tables.requirements.contains_key(&(project_id, skill_id)) {
            return Err(Error::Conflict("Requirement already exists".to_string()));
        }

        tables.requirements.insert((project_id, skill_id), minimum);
        Ok(())
    }

    async fn update_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(match tables.requirements.get_mut(&(project_id, skill_id)) {
            Some(current) => {
                *current = minimum;
                true
            }
            None => false,
        })
    }

    async fn remove_requirement(&self, project_id: i32, skill_id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.requirements.remove(&(project_id, skill_id)).is_some())
    }

    async fn health(&self) -> Result<StoreHealth> {
        Ok(StoreHealth {
            connected: true,
            version: format!("memory {}", env!("CARGO_PKG_VERSION")),
            name: "memory".to_string(),
            time: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn skill(store: &MemoryStore, name: &str) -> Skill {
        store
            .create_skill(NewSkill::new(name.to_string(), None, None).unwrap())
            .await
            .unwrap()
    }

    async fn person(store: &MemoryStore, name: &str) -> Personnel {
        let email = format!("{}@example.com", name.to_lowercase());
        store
            .create_personnel(NewPersonnel::new(name.to_string(), email, None, None).unwrap())
            .await
            .unwrap()
    }

    async fn project(store: &MemoryStore, name: &str) -> Project {
        store
            .create_project(NewProject::new(name.to_string(), None, None, None, None).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn deleting_skill_cascades_to_both_join_tables() {
        let store = MemoryStore::new();
        let rust = skill(&store, "Rust").await;
        let sql = skill(&store, "SQL").await;
        let ada = person(&store, "Ada").await;
        let apollo = project(&store, "Apollo").await;

        store.assign_skill(ada.id, rust.id, ProficiencyLevel::Expert).await.unwrap();
        store.assign_skill(ada.id, sql.id, ProficiencyLevel::Beginner).await.unwrap();
        store.add_requirement(apollo.id, rust.id, ProficiencyLevel::Advanced).await.unwrap();

        assert!(store.delete_skill(rust.id).await.unwrap());

        let holdings = store.list_personnel_skills(ada.id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].skill_name, "SQL");
        assert!(store.list_project_requirements(apollo.id).await.unwrap().is_empty());
        assert!(!store.delete_skill(rust.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_personnel_and_projects_removes_join_rows() {
        let store = MemoryStore::new();
        let rust = skill(&store, "Rust").await;
        let ada = person(&store, "Ada").await;
        let apollo = project(&store, "Apollo").await;
        store.assign_skill(ada.id, rust.id, ProficiencyLevel::Expert).await.unwrap();
        store.add_requirement(apollo.id, rust.id, ProficiencyLevel::Advanced).await.unwrap();

        assert!(store.delete_personnel(ada.id).await.unwrap());
        assert!(store.delete_project(apollo.id).await.unwrap());

        assert!(store.list_all_personnel_skills().await.unwrap().is_empty());
        assert!(store.list_all_requirements().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_must_be_unique() {
        let store = MemoryStore::new();
        let ada = person(&store, "Ada").await;
        let grace = person(&store, "Grace").await;

        let duplicate = NewPersonnel::new("Ada Two".into(), ada.email.clone(), None, None).unwrap();
        assert!(matches!(store.create_personnel(duplicate).await, Err(Error::Conflict(_))));

        let patch = PersonnelPatch::new(None, Some(ada.email.clone()), None, None);
        assert!(matches!(store.update_personnel(grace.id, patch).await, Err(Error::Conflict(_))));

        // Re-saving your own email is fine.
        let patch = PersonnelPatch::new(None, Some(ada.email.clone()), None, None);
        assert!(store.update_personnel(ada.id, patch).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn patch_keeps_unset_fields() {
        let store = MemoryStore::new();
        let created = store
            .create_personnel(
                NewPersonnel::new(
                    "Ada".into(),
                    "ada@example.com".into(),
                    Some("Engineer".into()),
                    Some(crate::models::ExperienceLevel::Senior),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let patch = PersonnelPatch::new(Some("Ada L.".into()), None, Some("  ".into()), None);
        let updated = store.update_personnel(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.role.as_deref(), Some("Engineer"));
        assert_eq!(updated.experience_level, created.experience_level);
    }

    #[tokio::test]
    async fn assign_is_an_upsert() {
        let store = MemoryStore::new();
        let rust = skill(&store, "Rust").await;
        let ada = person(&store, "Ada").await;

        let first = store.assign_skill(ada.id, rust.id, ProficiencyLevel::Beginner).await.unwrap();
        let second = store.assign_skill(ada.id, rust.id, ProficiencyLevel::Expert).await.unwrap();

        assert_eq!(first, AssignOutcome::Created);
        assert_eq!(second, AssignOutcome::Updated);
        let holdings = store.list_personnel_skills(ada.id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].proficiency_level, ProficiencyLevel::Expert);
    }

    #[tokio::test]
    async fn duplicate_requirement_conflicts() {
        let store = MemoryStore::new();
        let rust = skill(&store, "Rust").await;
        let apollo = project(&store, "Apollo").await;

        store.add_requirement(apollo.id, rust.id, ProficiencyLevel::Beginner).await.unwrap();
        let again = store.add_requirement(apollo.id, rust.id, ProficiencyLevel::Expert).await;
        assert!(matches!(again, Err(Error::Conflict(_))));

        assert!(store.update_requirement(apollo.id, rust.id, ProficiencyLevel::Expert).await.unwrap());
        assert!(!store.update_requirement(apollo.id, 999, ProficiencyLevel::Expert).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_references_are_not_found() {
        let store = MemoryStore::new();
        let ada = person(&store, "Ada").await;

        let result = store.assign_skill(ada.id, 42, ProficiencyLevel::Beginner).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn lists_are_ordered() {
        let store = MemoryStore::new();
        skill(&store, "SQL").await;
        skill(&store, "Go").await;
        let first = person(&store, "Ada").await;
        let second = person(&store, "Grace").await;

        let names: Vec<String> = store.list_skills().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Go", "SQL"]);

        let ids: Vec<i32> = store.list_personnel().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn skill_names_sort_ignoring_case() {
        let store = MemoryStore::new();
        skill(&store, "kubernetes").await;
        skill(&store, "Docker").await;
        skill(&store, "Go").await;
        let ada = person(&store, "Ada").await;
        for s in store.list_skills().await.unwrap() {
            store.assign_skill(ada.id, s.id, ProficiencyLevel::Beginner).await.unwrap();
        }

        let names: Vec<String> = store.list_skills().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Docker", "Go", "kubernetes"]);

        let held: Vec<String> = store
            .list_personnel_skills(ada.id)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.skill_name)
            .collect();
        assert_eq!(held, vec!["Docker", "Go", "kubernetes"]);
    }
}
