//! Built-in course catalog

use super::traits::{Course, CourseCatalog};

/// Fixed list of courses, optionally replaced from configuration
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    courses: Vec<Course>,
}

impl StaticCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            Course::new("math", "Mathematics"),
            Course::new("cs", "Computer Science"),
            Course::new("physics", "Physics"),
            Course::new("literature", "Literature"),
            Course::new("art", "Art & Design"),
        ])
    }

    /// Display label for a course id
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.courses
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.as_str())
    }

    /// Course id after `current`, wrapping around. An unknown id starts at the first course.
    pub fn next_id(&self, current: &str) -> Option<&str> {
        let pos = self.courses.iter().position(|c| c.id == current);
        let next = match pos {
            Some(i) => (i + 1) % self.courses.len(),
            None => 0,
        };
        self.courses.get(next).map(|c| c.id.as_str())
    }

    /// Course id before `current`, wrapping around. An unknown id starts at the last course.
    pub fn prev_id(&self, current: &str) -> Option<&str> {
        let pos = self.courses.iter().position(|c| c.id == current);
        let prev = match pos {
            Some(0) | None => self.courses.len().checked_sub(1)?,
            Some(i) => i - 1,
        };
        self.courses.get(prev).map(|c| c.id.as_str())
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CourseCatalog for StaticCatalog {
    fn list_courses(&self) -> Vec<Course> {
        self.courses.clone()
    }
}
