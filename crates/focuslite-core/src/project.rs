//! Projects and the project registry.

use serde::{Deserialize, Serialize};

use crate::session::new_id;

/// Id of the project that always exists and cannot be deleted.
pub const DEFAULT_PROJECT_ID: &str = "p_default";

/// Label shown for a session whose project no longer resolves.
pub const UNRESOLVED_PROJECT_LABEL: &str = "Project";

/// Display colors, assigned round-robin by project count.
pub const PALETTE: [&str; 5] = ["#93C5FD", "#FCA5A5", "#A7F3D0", "#FBCFE8", "#FDBA74"];

/// A named bucket sessions are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Project {
    pub fn default_project() -> Self {
        Self {
            id: DEFAULT_PROJECT_ID.to_string(),
            name: "General".to_string(),
            color: Some(PALETTE[0].to_string()),
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_PROJECT_ID
    }
}

/// Project list plus the active selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    active_id: String,
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new(vec![Project::default_project()], None)
    }
}

impl ProjectRegistry {
    /// Build a registry from persisted parts.
    ///
    /// Without a stored selection the first project becomes active. The
    /// default project is restored if the stored list lost it.
    pub fn new(mut projects: Vec<Project>, active_id: Option<String>) -> Self {
        if !projects.iter().any(Project::is_default) {
            projects.insert(0, Project::default_project());
        }
        let active_id = active_id.unwrap_or_else(|| {
            projects
                .first()
                .map(|p| p.id.clone())
                .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string())
        });
        Self { projects, active_id }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active project, or the first project if the selection is stale.
    pub fn active(&self) -> Option<&Project> {
        self.get(&self.active_id).or_else(|| self.projects.first())
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Project name, or a placeholder when the id no longer resolves.
    pub fn display_name(&self, id: &str) -> &str {
        self.get(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNRESOLVED_PROJECT_LABEL)
    }

    /// Create and select a project. Blank names are ignored.
    pub fn add(&mut self, name: &str) -> Option<&Project> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let color = PALETTE[self.projects.len() % PALETTE.len()];
        let project = Project {
            id: new_id("p"),
            name: name.to_string(),
            color: Some(color.to_string()),
        };
        self.active_id = project.id.clone();
        self.projects.push(project);
        self.projects.last()
    }

    /// Remove a project. The default project is never removed.
    ///
    /// Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if id == DEFAULT_PROJECT_ID {
            return false;
        }
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.active_id == id {
            self.active_id = DEFAULT_PROJECT_ID.to_string();
        }
        self.projects.len() != before
    }

    /// Select a project by id. Unknown ids are accepted; see [`Self::active`].
    pub fn select(&mut self, id: &str) {
        self.active_id = id.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_general() {
        let reg = ProjectRegistry::default();
        assert_eq!(reg.projects().len(), 1);
        assert_eq!(reg.active_id(), DEFAULT_PROJECT_ID);
        assert_eq!(reg.active().unwrap().name, "General");
        assert_eq!(reg.active().unwrap().color.as_deref(), Some(PALETTE[0]));
    }

    #[test]
    fn add_trims_selects_and_cycles_palette() {
        let mut reg = ProjectRegistry::default();
        let id = reg.add("  Reading ").unwrap().id.clone();
        assert!(id.starts_with("p_"));
        assert_eq!(reg.active_id(), id);
        assert_eq!(reg.active().unwrap().name, "Reading");
        assert_eq!(reg.active().unwrap().color.as_deref(), Some(PALETTE[1]));

        for name in ["a", "b", "c", "d"] {
            reg.add(name);
        }
        // Six projects: the sixth was added at count 5 and wraps to the first color.
        assert_eq!(reg.projects()[5].color.as_deref(), Some(PALETTE[0]));
    }

    #[test]
    fn blank_name_is_noop() {
        let mut reg = ProjectRegistry::default();
        assert!(reg.add("").is_none());
        assert!(reg.add("   \t").is_none());
        assert_eq!(reg.projects().len(), 1);
        assert_eq!(reg.active_id(), DEFAULT_PROJECT_ID);
    }

    #[test]
    fn default_project_cannot_be_deleted() {
        let mut reg = ProjectRegistry::default();
        for _ in 0..5 {
            assert!(!reg.delete(DEFAULT_PROJECT_ID));
        }
        assert!(reg.get(DEFAULT_PROJECT_ID).is_some());
    }

    #[test]
    fn deleting_active_falls_back_to_default() {
        let mut reg = ProjectRegistry::default();
        let id = reg.add("Writing").unwrap().id.clone();
        assert!(reg.delete(&id));
        assert_eq!(reg.active_id(), DEFAULT_PROJECT_ID);
        assert!(!reg.delete(&id));
    }

    #[test]
    fn deleting_inactive_keeps_selection() {
        let mut reg = ProjectRegistry::default();
        let a = reg.add("A").unwrap().id.clone();
        let b = reg.add("B").unwrap().id.clone();
        assert!(reg.delete(&a));
        assert_eq!(reg.active_id(), b);
    }

    #[test]
    fn stale_selection_resolves_to_first_project() {
        let mut reg = ProjectRegistry::default();
        reg.add("Other");
        reg.select("p_missing");
        assert_eq!(reg.active_id(), "p_missing");
        assert_eq!(reg.active().unwrap().id, DEFAULT_PROJECT_ID);
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let reg = ProjectRegistry::default();
        assert_eq!(reg.display_name(DEFAULT_PROJECT_ID), "General");
        assert_eq!(reg.display_name("p_gone"), UNRESOLVED_PROJECT_LABEL);
    }

    #[test]
    fn restores_missing_default_project() {
        let other = Project {
            id: "p_x".into(),
            name: "X".into(),
            color: None,
        };
        let reg = ProjectRegistry::new(vec![other], Some("p_x".into()));
        assert_eq!(reg.projects()[0].id, DEFAULT_PROJECT_ID);
        assert_eq!(reg.active().unwrap().id, "p_x");
    }
}
