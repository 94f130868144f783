//! Rows generated for the demo dataset.

use rollbook_models::TeacherId;

pub struct TeacherSeed {
    pub name: String,
    pub teacher_code: String,
    pub email: String,
}

pub struct StudentSeed {
    pub name: String,
    pub student_code: String,
    pub gender: &'static str,
    pub age: i32,
    pub email: String,
}

pub struct CourseSeed {
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    pub credits: f64,
    pub capacity: i32,
}

/// How much demo data to generate.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub teachers: usize,
    pub courses: usize,
    pub students: usize,
    /// Courses each student is enrolled in, capped by the number of courses.
    pub enrollments_per_student: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            courses: 20,
            students: 200,
            enrollments_per_student: 3,
        }
    }
}

impl DemoConfig {
    pub fn total_enrollments(&self) -> usize {
        self.students * self.enrollments_per_student.min(self.courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_enrollments_capped_by_courses() {
        let config = DemoConfig {
            teachers: 1,
            courses: 2,
            students: 10,
            enrollments_per_student: 5,
        };
        assert_eq!(config.total_enrollments(), 20);
    }
}
