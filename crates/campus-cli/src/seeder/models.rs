//! Seed records and the knobs that size a seeding run.

use chrono::NaiveDate;

pub struct DepartmentSeed {
    pub code: String,
    pub name: String,
}

pub struct TeacherSeed {
    pub id: String,
    pub name: String,
    pub hire_date: NaiveDate,
    pub department_code: String,
}

pub struct CourseSeed {
    pub code: String,
    pub name: String,
    pub description: String,
    pub teacher_id: Option<String>,
}

pub struct StudentSeed {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Per-department volume.
#[derive(Clone)]
pub struct PerDepartment {
    pub teachers: usize,
    /// Courses form a chain: each one requires the previous course of its department.
    pub courses: usize,
}

impl Default for PerDepartment {
    fn default() -> Self {
        Self {
            teachers: 3,
            courses: 4,
        }
    }
}

#[derive(Clone)]
pub struct SeedConfig {
    pub num_departments: usize,
    pub per_department: PerDepartment,
    pub num_students: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_departments: 0,
            per_department: PerDepartment::default(),
            num_students: 50,
        }
    }
}

impl SeedConfig {
    pub fn new(num_departments: usize) -> Self {
        Self {
            num_departments,
            ..Default::default()
        }
    }

    pub fn with_per_department(mut self, per_department: PerDepartment) -> Self {
        self.per_department = per_department;
        self
    }

    pub fn with_students(mut self, num_students: usize) -> Self {
        self.num_students = num_students;
        self
    }

    pub fn total_courses(&self) -> usize {
        self.num_departments * self.per_department.courses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = SeedConfig::new(2)
            .with_per_department(PerDepartment {
                teachers: 1,
                courses: 5,
            })
            .with_students(10);

        assert_eq!(config.total_courses(), 10);
        assert_eq!(config.num_students, 10);
    }
}
