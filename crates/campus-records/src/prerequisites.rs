//! The directed "course requires course" relation.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::RecordsError;
use crate::model::{Course, EntityKind, PrerequisiteDepth};
use crate::store::{EdgeInsert, RecordStore};

/// Edge acceptance rules for the prerequisite graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisitePolicy {
    /// Reject edges that would close a cycle. Self-edges are rejected regardless.
    pub reject_cycles: bool,
}

impl Default for PrerequisitePolicy {
    fn default() -> Self {
        Self {
            reject_cycles: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteChange {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteRemoval {
    Removed,
    Absent,
}

pub struct PrerequisiteGraph<'a, S: ?Sized> {
    store: &'a S,
    policy: PrerequisitePolicy,
}

impl<'a, S> PrerequisiteGraph<'a, S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: &'a S, policy: PrerequisitePolicy) -> Self {
        Self { store, policy }
    }

    /// Makes `prerequisite_code` a direct prerequisite of `course_code`. Idempotent.
    #[instrument(skip(self))]
    pub async fn add_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
    ) -> Result<PrerequisiteChange, RecordsError> {
        let course = self.load(course_code).await?;

        if course_code == prerequisite_code {
            warn!("Rejected self prerequisite");
            return Err(RecordsError::SelfPrerequisite(course_code.to_string()));
        }

        self.load(prerequisite_code).await?;

        if course.requires(prerequisite_code) {
            return Ok(PrerequisiteChange::AlreadyPresent);
        }

        match self
            .store
            .insert_prerequisite(course_code, prerequisite_code, self.policy.reject_cycles)
            .await?
        {
            EdgeInsert::Added => {
                info!("Prerequisite added");
                Ok(PrerequisiteChange::Added)
            }
            EdgeInsert::AlreadyPresent => Ok(PrerequisiteChange::AlreadyPresent),
            EdgeInsert::WouldCycle => {
                warn!("Rejected cycle-closing prerequisite");
                Err(RecordsError::CyclicPrerequisite {
                    course: course_code.to_string(),
                    prerequisite: prerequisite_code.to_string(),
                })
            }
        }
    }

    /// Adds each code in order and returns the course re-read with its direct prerequisites.
    /// Stops at the first rejected code; edges added before it stay.
    pub async fn add_prerequisites(
        &self,
        course_code: &str,
        prerequisite_codes: &[String],
    ) -> Result<Course, RecordsError> {
        for prerequisite_code in prerequisite_codes {
            self.add_prerequisite(course_code, prerequisite_code).await?;
        }

        self.load(course_code).await
    }

    #[instrument(skip(self))]
    pub async fn remove_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
    ) -> Result<PrerequisiteRemoval, RecordsError> {
        self.load(course_code).await?;

        let removal = if self
            .store
            .delete_prerequisite(course_code, prerequisite_code)
            .await?
        {
            info!("Prerequisite removed");
            PrerequisiteRemoval::Removed
        } else {
            PrerequisiteRemoval::Absent
        };

        Ok(removal)
    }

    async fn load(&self, code: &str) -> Result<Course, RecordsError> {
        self.store
            .find_course(code, PrerequisiteDepth::Direct)
            .await?
            .ok_or_else(|| RecordsError::not_found(EntityKind::Course, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn catalog() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_course(Course::new("CUR-001", "Programming I"));
        store.insert_course(Course::new("CUR-002", "Programming II"));
        store.insert_course(Course::new("CUR-003", "Data Structures"));
        store
    }

    #[tokio::test]
    async fn test_add_prerequisite_is_idempotent() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy::default());

        let first = graph.add_prerequisite("CUR-002", "CUR-001").await.unwrap();
        let second = graph.add_prerequisite("CUR-002", "CUR-001").await.unwrap();

        assert_eq!(first, PrerequisiteChange::Added);
        assert_eq!(second, PrerequisiteChange::AlreadyPresent);
        assert_eq!(store.prerequisite_codes("CUR-002").await.unwrap(), ["CUR-001"]);
    }

    #[tokio::test]
    async fn test_add_prerequisite_requires_both_courses() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy::default());

        let missing_course = graph.add_prerequisite("CUR-404", "CUR-001").await;
        assert!(matches!(
            missing_course,
            Err(RecordsError::NotFound { entity: EntityKind::Course, ref key }) if key == "CUR-404"
        ));

        let missing_prerequisite = graph.add_prerequisite("CUR-002", "CUR-404").await;
        assert!(matches!(missing_prerequisite, Err(RecordsError::NotFound { .. })));
        assert!(store.prerequisite_codes("CUR-002").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_self_prerequisite_rejected_under_any_policy() {
        let store = catalog();

        for reject_cycles in [true, false] {
            let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy { reject_cycles });
            let result = graph.add_prerequisite("CUR-001", "CUR-001").await;
            assert!(matches!(result, Err(RecordsError::SelfPrerequisite(code)) if code == "CUR-001"));
        }
    }

    #[tokio::test]
    async fn test_cycle_closing_edge_rejected() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy::default());

        graph.add_prerequisite("CUR-002", "CUR-001").await.unwrap();
        graph.add_prerequisite("CUR-003", "CUR-002").await.unwrap();

        let result = graph.add_prerequisite("CUR-001", "CUR-003").await;

        assert!(matches!(result, Err(RecordsError::CyclicPrerequisite { .. })));
        assert!(store.prerequisite_codes("CUR-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_permissive_policy_allows_cycles() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(
            &store,
            PrerequisitePolicy {
                reject_cycles: false,
            },
        );

        graph.add_prerequisite("CUR-002", "CUR-001").await.unwrap();
        let result = graph.add_prerequisite("CUR-001", "CUR-002").await.unwrap();

        assert_eq!(result, PrerequisiteChange::Added);
    }

    #[tokio::test]
    async fn test_add_prerequisites_returns_course_ordered_by_code() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy::default());

        let course = graph
            .add_prerequisites("CUR-003", &["CUR-002".to_string(), "CUR-001".to_string()])
            .await
            .unwrap();

        let names: Vec<_> = course.prerequisites.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Programming I", "Programming II"]);
    }

    #[tokio::test]
    async fn test_remove_prerequisite() {
        let store = catalog();
        let graph = PrerequisiteGraph::new(&store, PrerequisitePolicy::default());
        graph.add_prerequisite("CUR-002", "CUR-001").await.unwrap();

        let removed = graph.remove_prerequisite("CUR-002", "CUR-001").await.unwrap();
        let absent = graph.remove_prerequisite("CUR-002", "CUR-001").await.unwrap();
        let missing = graph.remove_prerequisite("CUR-404", "CUR-001").await;

        assert_eq!(removed, PrerequisiteRemoval::Removed);
        assert_eq!(absent, PrerequisiteRemoval::Absent);
        assert!(matches!(missing, Err(RecordsError::NotFound { .. })));
    }
}
