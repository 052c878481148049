use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{non_blank, required};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: i32,
    #[sqlx(rename = "skill_name")]
    #[serde(rename = "skill_name")]
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl NewSkill {
    pub fn new(name: String, category: Option<String>, description: Option<String>) -> Result<Self> {
        Ok(Self {
            name: required("skill_name", name)?,
            category: non_blank(category),
            description: non_blank(description),
        })
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl SkillPatch {
    pub fn new(name: Option<String>, category: Option<String>, description: Option<String>) -> Self {
        Self {
            name: non_blank(name),
            category: non_blank(category),
            description: non_blank(description),
        }
    }

    pub fn apply(self, skill: &mut Skill) {
        if let Some(name) = self.name {
            skill.name = name;
        }
        if let Some(category) = self.category {
            skill.category = Some(category);
        }
        if let Some(description) = self.description {
            skill.description = Some(description);
        }
    }
}
