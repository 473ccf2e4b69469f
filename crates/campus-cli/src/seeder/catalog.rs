//! Departments, teachers and courses.

use fake::Fake;
use fake::faker::company::en::Industry;
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{CourseSeed, DepartmentSeed, TeacherSeed};
use super::{date_between, push_values};

const BATCH_SIZE: usize = 500;

pub fn generate_departments(codes: Vec<String>) -> Vec<DepartmentSeed> {
    codes
        .into_par_iter()
        .map(|code| {
            let industry: String = Industry().fake();
            DepartmentSeed {
                name: format!("Department of {industry}").chars().take(100).collect(),
                code,
            }
        })
        .collect()
}

/// `ids` are spread round-robin over `department_codes`.
pub fn generate_teachers(ids: Vec<String>, department_codes: &[String]) -> Vec<TeacherSeed> {
    ids.into_par_iter()
        .enumerate()
        .map(|(i, id)| TeacherSeed {
            id,
            name: Name().fake(),
            hire_date: date_between(1995, 2024),
            department_code: department_codes[i % department_codes.len()].clone(),
        })
        .collect()
}

pub fn generate_courses(codes: Vec<String>, teacher_ids: &[String]) -> Vec<CourseSeed> {
    codes
        .into_par_iter()
        .enumerate()
        .map(|(i, code)| {
            let word: String = Word().fake();
            CourseSeed {
                name: format!("{} {}", capitalize(&word), i + 1),
                description: Sentence(4..10).fake(),
                teacher_id: teacher_ids.get(i % teacher_ids.len().max(1)).cloned(),
                code,
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn insert_departments(
    db: &PgPool,
    departments: &[DepartmentSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    for chunk in departments.chunks(BATCH_SIZE) {
        let mut query = String::from("INSERT INTO departments (code, name) VALUES ");
        push_values(&mut query, chunk.len(), 2);
        let mut q = sqlx::query(&query);
        for department in chunk {
            q = q.bind(&department.code).bind(&department.name);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn insert_teachers(
    db: &PgPool,
    teachers: &[TeacherSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    for chunk in teachers.chunks(BATCH_SIZE) {
        let mut query =
            String::from("INSERT INTO teachers (id, name, hire_date, department_code) VALUES ");
        push_values(&mut query, chunk.len(), 4);
        let mut q = sqlx::query(&query);
        for teacher in chunk {
            q = q
                .bind(&teacher.id)
                .bind(&teacher.name)
                .bind(teacher.hire_date)
                .bind(&teacher.department_code);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Inserts courses and chains each course to the previous one in the same group of
/// `chain_length`.
pub async fn insert_courses(
    db: &PgPool,
    courses: &[CourseSeed],
    chain_length: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    for chunk in courses.chunks(BATCH_SIZE) {
        let mut query =
            String::from("INSERT INTO courses (code, name, description, teacher_id) VALUES ");
        push_values(&mut query, chunk.len(), 4);
        let mut q = sqlx::query(&query);
        for course in chunk {
            q = q
                .bind(&course.code)
                .bind(&course.name)
                .bind(&course.description)
                .bind(&course.teacher_id);
        }
        q.execute(&mut *tx).await?;
    }

    let edges = insert_prerequisite_chains(&mut tx, courses, chain_length).await?;
    tx.commit().await?;
    Ok(edges)
}

async fn insert_prerequisite_chains(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
    chain_length: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let edges: Vec<(&str, &str)> = courses
        .chunks(chain_length.max(1))
        .flat_map(|chain| chain.windows(2))
        .map(|pair| (pair[1].code.as_str(), pair[0].code.as_str()))
        .collect();

    for chunk in edges.chunks(BATCH_SIZE) {
        let mut query =
            String::from("INSERT INTO course_prerequisites (course_code, prerequisite_code) VALUES ");
        push_values(&mut query, chunk.len(), 2);
        let mut q = sqlx::query(&query);
        for (course, prerequisite) in chunk {
            q = q.bind(*course).bind(*prerequisite);
        }
        q.execute(&mut **tx).await?;
    }

    Ok(edges.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teachers_spread_over_departments() {
        let departments = vec!["DEP-001".to_string(), "DEP-002".to_string()];
        let ids = (1..=4).map(|i| format!("PROF-00{i}")).collect();

        let teachers = generate_teachers(ids, &departments);

        assert_eq!(teachers.len(), 4);
        assert_eq!(teachers[0].department_code, "DEP-001");
        assert_eq!(teachers[1].department_code, "DEP-002");
        assert_eq!(teachers[2].department_code, "DEP-001");
    }

    #[test]
    fn test_courses_without_teachers() {
        let courses = generate_courses(vec!["CUR-001".to_string()], &[]);

        assert_eq!(courses[0].teacher_id, None);
        assert!(courses[0].name.len() >= 3);
    }
}
