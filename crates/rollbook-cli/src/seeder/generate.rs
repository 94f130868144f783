//! Fake row generation, parallelised with rayon.
//!
//! Codes embed the row index so repeated runs in one batch never collide;
//! a per-run prefix keeps separate runs apart.

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use rollbook_models::TeacherId;

use super::models::{CourseSeed, StudentSeed, TeacherSeed};

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Music",
    "Art",
    "Computer Science",
];

pub fn generate_teachers(run: &str, count: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| TeacherSeed {
            name: Name().fake(),
            teacher_code: format!("T{}{:04}", run, idx),
            email: SafeEmail().fake(),
        })
        .collect()
}

pub fn generate_students(run: &str, count: usize) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| StudentSeed {
            name: Name().fake(),
            student_code: format!("S{}{:05}", run, idx),
            gender: if idx % 2 == 0 { "female" } else { "male" },
            age: (10..19).fake(),
            email: SafeEmail().fake(),
        })
        .collect()
}

pub fn generate_courses(count: usize, teacher_ids: &[TeacherId]) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let subject = SUBJECTS[idx % SUBJECTS.len()];
            let level = idx / SUBJECTS.len() + 1;
            CourseSeed {
                name: format!("{} {}", subject, level),
                teacher_id: if teacher_ids.is_empty() {
                    None
                } else {
                    Some(teacher_ids[idx % teacher_ids.len()])
                },
                credits: (1..5).fake::<i32>() as f64,
                capacity: 50,
            }
        })
        .collect()
}

/// Index pairs `(student, course)`, each student taking consecutive courses
/// starting from an offset so enrollment is spread evenly.
pub fn enrollment_pairs(students: usize, courses: usize, per_student: usize) -> Vec<(usize, usize)> {
    if courses == 0 {
        return Vec::new();
    }
    let per_student = per_student.min(courses);

    (0..students)
        .into_par_iter()
        .flat_map_iter(|s| (0..per_student).map(move |k| (s, (s + k) % courses)))
        .collect()
}
