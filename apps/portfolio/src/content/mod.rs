//! Page copy model: the single record every renderer and the personalization
//! round trip agree on.
//!
//! Decoding is strict: unknown or missing fields anywhere in the tree reject
//! the whole record. A record that decodes is then shape-checked
//! (`validate`) before anyone is allowed to adopt it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod defaults;

pub use defaults::default_content;

/// Highest allowed skill level.
pub const MAX_SKILL_LEVEL: u8 = 100;

#[derive(Debug, Error)]
pub enum ContentShapeError {
    #[error("content is not a valid record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("skill '{name}' has level {level}, expected 0-100")]
    LevelOutOfRange { name: String, level: u8 },

    #[error("project id '{0}' appears more than once")]
    DuplicateProjectId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentRecord {
    pub hero: HeroSection,
    pub skills: SkillsSection,
    pub projects: ProjectsSection,
    pub contact: ContactSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillsSection {
    pub title: String,
    pub description: String,
    pub skillset: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub name: String,
    /// Proficiency, 0-100.
    pub level: u8,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectsSection {
    pub title: String,
    pub description: String,
    pub project_list: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Unique within `ProjectsSection::project_list`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSection {
    pub title: String,
    pub description: String,
}

impl ContentRecord {
    /// Decodes and shape-checks a JSON-encoded record.
    pub fn from_json(text: &str) -> Result<Self, ContentShapeError> {
        let record: ContentRecord = serde_json::from_str(text)?;
        record.validate()?;
        Ok(record)
    }

    /// Same as `from_json`, for an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ContentShapeError> {
        let record: ContentRecord = serde_json::from_value(value)?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Checks the invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), ContentShapeError> {
        if let Some(skill) = self
            .skills
            .skillset
            .iter()
            .find(|s| s.level > MAX_SKILL_LEVEL)
        {
            return Err(ContentShapeError::LevelOutOfRange {
                name: skill.name.clone(),
                level: skill.level,
            });
        }

        let mut seen = HashSet::new();
        for project in &self.projects.project_list {
            if !seen.insert(project.id.as_str()) {
                return Err(ContentShapeError::DuplicateProjectId(project.id.clone()));
            }
        }

        Ok(())
    }
}
