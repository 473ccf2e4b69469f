//! PostgreSQL implementation of [`RecordStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use campus_records::{
    Course, EdgeInsert, EntityKind, Enrollment, Namespace, NewEnrollment, PrerequisiteDepth,
    RecordStore, StoreError, Student,
};
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

/// Advisory lock key shared by every prerequisite edge insert.
const PREREQUISITE_LOCK_KEY: i64 = 0x0043_5552_5052_4551;

#[derive(Debug, FromRow)]
struct CourseRow {
    code: String,
    name: String,
    description: String,
    teacher_id: Option<String>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            code: row.code,
            name: row.name,
            description: row.description,
            teacher_id: row.teacher_id,
            prerequisites: Vec::new(),
        }
    }
}

#[derive(Debug, FromRow)]
struct PrerequisiteRow {
    parent_code: String,
    code: String,
    name: String,
    description: String,
    teacher_id: Option<String>,
}

#[derive(Debug, FromRow)]
struct StudentRow {
    id: String,
    name: String,
    birth_date: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
struct EnrollmentRow {
    id: i64,
    student_id: String,
    course_code: String,
    enrollment_date: NaiveDate,
    final_grade: Option<f64>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            id: row.id,
            student_id: row.student_id,
            course_code: row.course_code,
            enrollment_date: row.enrollment_date,
            final_grade: row.final_grade,
        }
    }
}

/// Table and key column holding the identifiers of `kind`.
pub fn identifier_column(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::Department => ("departments", "code"),
        EntityKind::Teacher => ("teachers", "id"),
        EntityKind::Course => ("courses", "code"),
        EntityKind::Student => ("students", "id"),
        EntityKind::Evaluation => ("evaluations", "id"),
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::unavailable(err.to_string())
        }
        other => StoreError::backend(other),
    }
}

#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn direct_prerequisites(&self, codes: &[String]) -> Result<Vec<PrerequisiteRow>, StoreError> {
        sqlx::query_as::<_, PrerequisiteRow>(
            r#"SELECT cp.course_code AS parent_code, c.code, c.name, c.description, c.teacher_id
               FROM course_prerequisites cp
               JOIN courses c ON c.code = cp.prerequisite_code
               WHERE cp.course_code = ANY($1)
               ORDER BY cp.course_code, c.code"#,
        )
        .bind(codes)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[instrument(skip(self))]
    async fn find_course(
        &self,
        code: &str,
        depth: PrerequisiteDepth,
    ) -> Result<Option<Course>, StoreError> {
        let Some(row) = sqlx::query_as::<_, CourseRow>(
            "SELECT code, name, description, teacher_id FROM courses WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?
        else {
            return Ok(None);
        };

        let mut course = Course::from(row);
        let direct = self.direct_prerequisites(&[course.code.clone()]).await?;

        let mut nested: HashMap<String, Vec<Course>> = HashMap::new();
        if depth == PrerequisiteDepth::Nested && !direct.is_empty() {
            let codes: Vec<String> = direct.iter().map(|p| p.code.clone()).collect();
            for row in self.direct_prerequisites(&codes).await? {
                nested.entry(row.parent_code).or_default().push(Course::from(CourseRow {
                    code: row.code,
                    name: row.name,
                    description: row.description,
                    teacher_id: row.teacher_id,
                }));
            }
        }

        course.prerequisites = direct
            .into_iter()
            .map(|row| {
                let prerequisites = nested.remove(&row.code).unwrap_or_default();
                Course {
                    code: row.code,
                    name: row.name,
                    description: row.description,
                    teacher_id: row.teacher_id,
                    prerequisites,
                }
            })
            .collect();

        Ok(Some(course))
    }

    async fn prerequisite_codes(&self, course_code: &str) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            r#"SELECT prerequisite_code FROM course_prerequisites
               WHERE course_code = $1
               ORDER BY prerequisite_code"#,
        )
        .bind(course_code)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_student(&self, id: &str) -> Result<Option<Student>, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, birth_date FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|row| Student {
            id: row.id,
            name: row.name,
            birth_date: row.birth_date,
        }))
    }

    async fn find_enrollments(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"SELECT id, student_id, course_code, enrollment_date, final_grade
               FROM enrollments
               WHERE student_id = $1 AND course_code = $2
               ORDER BY enrollment_date, id"#,
        )
        .bind(student_id)
        .bind(course_code)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    #[instrument(skip(self))]
    async fn save_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, StoreError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"INSERT INTO enrollments (student_id, course_code, enrollment_date)
               VALUES ($1, $2, $3)
               RETURNING id, student_id, course_code, enrollment_date, final_grade"#,
        )
        .bind(&enrollment.student_id)
        .bind(&enrollment.course_code)
        .bind(enrollment.enrollment_date)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.into())
    }

    /// Edge inserts take one transaction-scoped advisory lock, so the reachability walk and
    /// the insert see every edge committed by a concurrent request.
    #[instrument(skip(self))]
    async fn insert_prerequisite(
        &self,
        course_code: &str,
        prerequisite_code: &str,
        reject_cycles: bool,
    ) -> Result<EdgeInsert, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PREREQUISITE_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        if reject_cycles {
            let closes_cycle = sqlx::query_scalar::<_, bool>(
                r#"WITH RECURSIVE reachable(code) AS (
                       SELECT prerequisite_code FROM course_prerequisites WHERE course_code = $1
                       UNION
                       SELECT cp.prerequisite_code
                       FROM course_prerequisites cp
                       JOIN reachable r ON cp.course_code = r.code
                   )
                   SELECT EXISTS (SELECT 1 FROM reachable WHERE code = $2)"#,
            )
            .bind(prerequisite_code)
            .bind(course_code)
            .fetch_one(&mut *tx)
            .await
            .map_err(store_error)?;

            if closes_cycle {
                return Ok(EdgeInsert::WouldCycle);
            }
        }

        let result = sqlx::query(
            r#"INSERT INTO course_prerequisites (course_code, prerequisite_code)
               VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(course_code)
        .bind(prerequisite_code)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(if result.rows_affected() == 1 {
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
        let result = sqlx::query(
            "DELETE FROM course_prerequisites WHERE course_code = $1 AND prerequisite_code = $2",
        )
        .bind(course_code)
        .bind(prerequisite_code)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    /// One statement: the row lock on `id_sequences` serializes concurrent callers, and the
    /// counter is floored by the numeric maximum of existing keys in the entity's table.
    #[instrument(skip(self), fields(prefix = namespace.prefix()))]
    async fn next_sequence(&self, namespace: &Namespace) -> Result<u64, StoreError> {
        let value = match namespace.entity() {
            Some(kind) => {
                let (table, column) = identifier_column(kind);
                let sql = format!(
                    r#"WITH existing AS (
                           SELECT COALESCE(MAX(CAST(SUBSTRING({column} FROM '([0-9]+)$') AS BIGINT)), 0) AS floor
                           FROM {table}
                           WHERE {column} ~ $2
                       )
                       INSERT INTO id_sequences (namespace, last_value)
                       SELECT $1, floor + 1 FROM existing
                       ON CONFLICT (namespace) DO UPDATE
                       SET last_value = GREATEST(id_sequences.last_value, EXCLUDED.last_value - 1) + 1
                       RETURNING last_value"#
                );

                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(namespace.prefix())
                    .bind(namespace.identifier_pattern())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"INSERT INTO id_sequences (namespace, last_value)
                       VALUES ($1, 1)
                       ON CONFLICT (namespace) DO UPDATE
                       SET last_value = id_sequences.last_value + 1
                       RETURNING last_value"#,
                )
                .bind(namespace.prefix())
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(store_error)?;

        u64::try_from(value)
            .map_err(|_| StoreError::unavailable(format!("negative sequence value {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_records::{
        IdAllocator, PrerequisiteGraph, PrerequisitePolicy, RecordsError, enroll,
    };

    async fn insert_course(pool: &PgPool, code: &str, name: &str) {
        sqlx::query("INSERT INTO courses (code, name) VALUES ($1, $2)")
            .bind(code)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_next_sequence_floors_by_existing_ids(pool: PgPool) {
        for id in ["EST-007", "EST-099", "EST-100", "LEGACY-7"] {
            sqlx::query("INSERT INTO students (id, name) VALUES ($1, 'Seed')")
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let store = PgRecordStore::new(pool);
        let allocator = IdAllocator::default();

        assert_eq!(allocator.allocate(&store, "student").await.unwrap(), "EST-101");
        assert_eq!(allocator.allocate(&store, "student").await.unwrap(), "EST-102");
        assert_eq!(allocator.allocate(&store, "course").await.unwrap(), "CUR-001");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_next_sequence_skips_client_supplied_key(pool: PgPool) {
        let store = PgRecordStore::new(pool.clone());
        let allocator = IdAllocator::default();

        assert_eq!(allocator.allocate(&store, "course").await.unwrap(), "CUR-001");
        insert_course(&pool, "CUR-005", "Imported").await;
        assert_eq!(allocator.allocate(&store, "course").await.unwrap(), "CUR-006");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_allocations_are_distinct(pool: PgPool) {
        let store = PgRecordStore::new(pool);
        let allocator = IdAllocator::default();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator.allocate(&store, "evaluation").await.unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 8);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_opposite_edges_keep_graph_acyclic(pool: PgPool) {
        insert_course(&pool, "CUR-001", "Programming I").await;
        insert_course(&pool, "CUR-002", "Programming II").await;
        let store = PgRecordStore::new(pool.clone());

        let mut handles = Vec::new();
        for (course, prerequisite) in [("CUR-002", "CUR-001"), ("CUR-001", "CUR-002")] {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                PrerequisiteGraph::new(&store, PrerequisitePolicy::default())
                    .add_prerequisite(course, prerequisite)
                    .await
            }));
        }

        let mut added = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => added += 1,
                Err(err) => assert!(matches!(err, RecordsError::CyclicPrerequisite { .. })),
            }
        }

        let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_prerequisites")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(edges, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_course_nested(pool: PgPool) {
        insert_course(&pool, "CUR-001", "Programming I").await;
        insert_course(&pool, "CUR-002", "Programming II").await;
        insert_course(&pool, "CUR-003", "Data Structures").await;

        let store = PgRecordStore::new(pool);
        assert_eq!(
            store.insert_prerequisite("CUR-002", "CUR-001", true).await.unwrap(),
            EdgeInsert::Added
        );
        assert_eq!(
            store.insert_prerequisite("CUR-002", "CUR-001", true).await.unwrap(),
            EdgeInsert::AlreadyPresent
        );
        assert_eq!(
            store.insert_prerequisite("CUR-001", "CUR-002", true).await.unwrap(),
            EdgeInsert::WouldCycle
        );
        store.insert_prerequisite("CUR-003", "CUR-002", true).await.unwrap();

        let direct = store
            .find_course("CUR-003", PrerequisiteDepth::Direct)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(direct.prerequisites.len(), 1);
        assert!(direct.prerequisites[0].prerequisites.is_empty());

        let nested = store
            .find_course("CUR-003", PrerequisiteDepth::Nested)
            .await
            .unwrap()
            .unwrap();
        assert!(nested.prerequisites[0].requires("CUR-001"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_enroll_against_postgres(pool: PgPool) {
        insert_course(&pool, "CUR-001", "Calculus I").await;
        insert_course(&pool, "CUR-002", "Physics I").await;
        insert_course(&pool, "CUR-003", "Calculus II").await;
        sqlx::query("INSERT INTO students (id, name) VALUES ('EST-001', 'Ana Torres')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            r#"INSERT INTO enrollments (student_id, course_code, enrollment_date, final_grade)
               VALUES ('EST-001', 'CUR-001', '2024-02-01', 3.5)"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let store = PgRecordStore::new(pool.clone());
        store.insert_prerequisite("CUR-003", "CUR-001", true).await.unwrap();
        store.insert_prerequisite("CUR-003", "CUR-002", true).await.unwrap();

        let today = chrono::Utc::now().date_naive();
        let rejected = enroll(&store, "EST-001", "CUR-003", today).await;
        assert!(matches!(
            rejected,
            Err(campus_records::RecordsError::PrerequisitesNotMet { ref missing }) if missing == &["Physics I"]
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
