//! Student seeding.

use fake::Fake;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::PgPool;

use super::models::StudentSeed;
use super::{date_between, push_values};

const BATCH_SIZE: usize = 1000;

pub fn generate_students(ids: Vec<String>) -> Vec<StudentSeed> {
    ids.into_par_iter()
        .map(|id| StudentSeed {
            id,
            name: Name().fake(),
            birth_date: date_between(1995, 2007),
        })
        .collect()
}

pub async fn insert_students(
    db: &PgPool,
    students: &[StudentSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    for chunk in students.chunks(BATCH_SIZE) {
        let mut query = String::from("INSERT INTO students (id, name, birth_date) VALUES ");
        push_values(&mut query, chunk.len(), 3);
        let mut q = sqlx::query(&query);
        for student in chunk {
            q = q
                .bind(&student.id)
                .bind(&student.name)
                .bind(student.birth_date);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
