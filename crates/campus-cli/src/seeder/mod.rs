//! Fake catalog data for local development.
//!
//! Identifiers come from the same allocator the API uses, so seeded rows advance the
//! `DEP`/`PROF`/`CUR`/`EST` sequences and later API creates continue after them.

pub mod catalog;
pub mod models;
pub mod students;

use std::time::Instant;

use campus::store::PgRecordStore;
use campus_records::{EntityKind, IdAllocator, PrefixTable};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::Fake;
use fake::faker::chrono::en::DateTimeBetween;
use sqlx::PgPool;

pub use models::{PerDepartment, SeedConfig};

pub(crate) fn date_between(from_year: i32, to_year: i32) -> NaiveDate {
    let start = Utc
        .with_ymd_and_hms(from_year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let end = Utc
        .with_ymd_and_hms(to_year, 12, 31, 0, 0, 0)
        .single()
        .unwrap_or(start);
    DateTimeBetween(start, end).fake::<DateTime<Utc>>().date_naive()
}

/// Appends `rows` placeholder groups of `columns` parameters: `($1, $2), ($3, $4)`.
pub(crate) fn push_values(query: &mut String, rows: usize, columns: usize) {
    for row in 0..rows {
        if row > 0 {
            query.push_str(", ");
        }
        let params: Vec<String> = (1..=columns)
            .map(|c| format!("${}", row * columns + c))
            .collect();
        query.push('(');
        query.push_str(&params.join(", "));
        query.push(')');
    }
}

/// Allocates `count` identifiers for `kind`.
pub async fn allocate_many(
    db: &PgPool,
    kind: EntityKind,
    count: usize,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let store = PgRecordStore::new(db.clone());
    let allocator = IdAllocator::new(PrefixTable::standard());

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(allocator.allocate_for(&store, kind).await?);
    }
    Ok(ids)
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Seeding {} departments...", config.num_departments);
    let department_codes =
        allocate_many(db, EntityKind::Department, config.num_departments).await?;
    let departments = catalog::generate_departments(department_codes.clone());
    catalog::insert_departments(db, &departments).await?;

    let teacher_count = config.num_departments * config.per_department.teachers;
    println!("👩‍🏫 Seeding {teacher_count} teachers...");
    let teacher_ids = allocate_many(db, EntityKind::Teacher, teacher_count).await?;
    let teachers = if department_codes.is_empty() {
        Vec::new()
    } else {
        catalog::generate_teachers(teacher_ids.clone(), &department_codes)
    };
    catalog::insert_teachers(db, &teachers).await?;

    println!("📚 Seeding {} courses...", config.total_courses());
    let course_codes = allocate_many(db, EntityKind::Course, config.total_courses()).await?;
    let courses = catalog::generate_courses(course_codes, &teacher_ids);
    let edges = catalog::insert_courses(db, &courses, config.per_department.courses).await?;
    println!("   ✓ {edges} prerequisite edges");

    println!("🎓 Seeding {} students...", config.num_students);
    let student_ids = allocate_many(db, EntityKind::Student, config.num_students).await?;
    let students = students::generate_students(student_ids);
    students::insert_students(db, &students).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    Ok(())
}

/// Deletes every catalog row and resets the entity sequences. User accounts are kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing catalog data...");

    let mut tx = db.begin().await?;
    for table in [
        "grades",
        "schedules",
        "evaluations",
        "enrollments",
        "course_prerequisites",
        "courses",
        "students",
        "teachers",
        "departments",
    ] {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {table}: {deleted}");
    }
    sqlx::query("DELETE FROM id_sequences WHERE namespace <> 'USERREF'")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    println!("   Done in {:?}", start_time.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_values_numbers_parameters_row_major() {
        let mut query = String::from("VALUES ");
        push_values(&mut query, 2, 3);
        assert_eq!(query, "VALUES ($1, $2, $3), ($4, $5, $6)");
    }

    #[test]
    fn test_date_between_stays_in_range() {
        let date = date_between(2000, 2001);
        assert!(date >= NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert!(date <= NaiveDate::from_ymd_opt(2001, 12, 31).unwrap());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_seed_and_clear(pool: PgPool) {
        let config = SeedConfig::new(2)
            .with_per_department(PerDepartment {
                teachers: 2,
                courses: 3,
            })
            .with_students(5);

        seed_all(&pool, config).await.unwrap();

        let courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&pool)
            .await
            .unwrap();
        let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_prerequisites")
            .fetch_one(&pool)
            .await
            .unwrap();
        let last_student: String =
            sqlx::query_scalar("SELECT id FROM students ORDER BY id DESC LIMIT 1")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(courses, 6);
        assert_eq!(edges, 4);
        assert_eq!(last_student, "EST-005");

        clear_all(&pool).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
