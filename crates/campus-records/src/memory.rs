//! In-process [`RecordStore`] used by tests.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::allocator::{Namespace, parse_sequence};
use crate::model::{Course, EntityKind, Enrollment, NewEnrollment, PrerequisiteDepth, Student};
use crate::store::{EdgeInsert, RecordStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    courses: BTreeMap<String, Course>,
    prerequisites: BTreeMap<String, BTreeSet<String>>,
    students: BTreeMap<String, Student>,
    enrollments: Vec<Enrollment>,
    next_enrollment_id: i64,
    identifiers: HashMap<EntityKind, BTreeSet<String>>,
    sequences: HashMap<String, u64>,
}

impl Tables {
    fn course(&self, code: &str, depth: PrerequisiteDepth) -> Option<Course> {
        let mut course = self.courses.get(code)?.clone();

        course.prerequisites = self
            .prerequisites
            .get(code)
            .into_iter()
            .flatten()
            .filter_map(|prerequisite| match depth {
                PrerequisiteDepth::Direct => self.courses.get(prerequisite).cloned(),
                PrerequisiteDepth::Nested => self.course(prerequisite, PrerequisiteDepth::Direct),
            })
            .collect();

        Some(course)
    }

    /// Breadth-first walk over prerequisite edges starting at `from`.
    fn reaches(&self, from: &str, target: &str) -> bool {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(code) = queue.pop_front() {
            for next in self.prerequisites.get(code).into_iter().flatten() {
                if next == target {
                    return true;
                }
                if seen.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }

        false
    }

    fn register(&mut self, kind: EntityKind, key: &str) {
        self.identifiers
            .entry(kind)
            .or_default()
            .insert(key.to_string());
    }
}

/// A [`RecordStore`] backed by in-memory tables behind a mutex.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    available: Mutex<bool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_enrollment_id: 1,
                ..Tables::default()
            }),
            available: Mutex::new(true),
        }
    }

    /// While unavailable every store call fails with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        if let Ok(mut flag) = self.available.lock() {
            *flag = available;
        }
    }

    pub fn insert_student(&self, id: &str, name: &str) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.students.insert(
                id.to_string(),
                Student {
                    id: id.to_string(),
                    name: name.to_string(),
                    birth_date: None,
                },
            );
            tables.register(EntityKind::Student, id);
        }
    }

    /// Inserts or replaces a course. Its `prerequisites` become direct edges.
    pub fn insert_course(&self, course: Course) {
        if let Ok(mut tables) = self.tables.lock() {
            let edges: BTreeSet<String> =
                course.prerequisites.iter().map(|p| p.code.clone()).collect();
            let code = course.code.clone();

            tables.register(EntityKind::Course, &code);
            tables.prerequisites.insert(code.clone(), edges);
            tables.courses.insert(
                code,
                Course {
                    prerequisites: Vec::new(),
                    ..course
                },
            );
        }
    }

    /// Records an attempt dated today with the given final grade.
    pub fn insert_enrollment(
        &self,
        student_id: &str,
        course_code: &str,
        final_grade: Option<f64>,
    ) -> Option<Enrollment> {
        let mut tables = self.tables.lock().ok()?;
        let enrollment = Enrollment {
            id: tables.next_enrollment_id,
            student_id: student_id.to_string(),
            course_code: course_code.to_string(),
            enrollment_date: Utc::now().date_naive(),
            final_grade,
        };
        tables.next_enrollment_id += 1;
        tables.enrollments.push(enrollment.clone());
        Some(enrollment)
    }

    /// Marks `key` as taken in the namespace of `kind` without creating a record.
    pub fn register_identifier(&self, kind: EntityKind, key: &str) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.register(kind, key);
        }
    }

    pub fn enrollments(&self) -> Vec<Enrollment> {
        self.tables
            .lock()
            .map(|tables| tables.enrollments.clone())
            .unwrap_or_default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        let available = self
            .available
            .lock()
            .map(|flag| *flag)
            .map_err(|_| StoreError::unavailable("availability flag poisoned"))?;

        if !available {
            return Err(StoreError::unavailable("memory store is offline"));
        }

        self.tables
            .lock()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_course(
        &self,
        code: &str,
        depth: PrerequisiteDepth,
    ) -> Result<Option<Course>, StoreError> {
        Ok(self.tables()?.course(code, depth))
    }

    async fn prerequisite_codes(&self, course_code: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables()?
            .prerequisites
            .get(course_code)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_student(&self, id: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.tables()?.students.get(id).cloned())
    }

    async fn find_enrollments(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self
            .tables()?
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id && e.course_code == course_code)
            .cloned()
            .collect())
    }

    async fn save_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, StoreError> {
        let mut tables = self.tables()?;
        let saved = Enrollment {
            id: tables.next_enrollment_id,
            student_id: enrollment.student_id,
            course_code: enrollment.course_code,
            enrollment_date: enrollment.enrollment_date,
            final_grade: None,
        };
        tables.next_enrollment_id += 1;
        tables.enrollments.push(saved.clone());
        Ok(saved)
    }

    async fn insert_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
        reject_cycles: bool,
    ) -> Result<EdgeInsert, StoreError> {
        let mut tables = self.tables()?;

        if reject_cycles && tables.reaches(prerequisite_code, course_code) {
            return Ok(EdgeInsert::WouldCycle);
        }

        let added = tables
            .prerequisites
            .entry(course_code.to_string())
            .or_default()
            .insert(prerequisite_code.to_string());

        Ok(if added {
            EdgeInsert::Added
        } else {
            EdgeInsert::AlreadyPresent
        })
    }

    async fn delete_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .prerequisites
            .get_mut(course_code)
            .is_some_and(|codes| codes.remove(prerequisite_code)))
    }

    async fn next_sequence(&self, namespace: &Namespace) -> Result<u64, StoreError> {
        let mut tables = self.tables()?;

        let floor = namespace
            .entity()
            .and_then(|kind| tables.identifiers.get(&kind))
            .into_iter()
            .flatten()
            .filter_map(|key| parse_sequence(key, namespace.prefix()))
            .max()
            .unwrap_or(0);

        let counter = tables
            .sequences
            .entry(namespace.prefix().to_string())
            .or_insert(0);
        *counter = (*counter).max(floor) + 1;

        Ok(*counter)
    }
}
