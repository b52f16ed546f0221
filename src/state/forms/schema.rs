//! Registration schema
//!
//! Maps a [`DraftRecord`] to either a [`RegistrationRecord`] or the full set of
//! field errors. Every field is checked on every call so that all problems are
//! reported together.

use super::field::{DraftRecord, FieldName, FieldValue};
use crate::backend::{Course, CourseCatalog};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const AGE_MIN: i64 = 16;
const AGE_MAX: i64 = 99;

const INVALID_VALUE: &str = "Invalid value";

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        // Dot-separated local atoms, then hyphen-inner labels ending in a TLD
        Regex::new(concat!(
            r"^[A-Za-z0-9_%+\-]+(\.[A-Za-z0-9_%+\-]+)*",
            r"@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
        ))
        .expect("valid regex")
    })
}

/// A registration that satisfied every schema constraint.
///
/// Only [`RegistrationSchema::validate`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    name: String,
    email: String,
    age: u8,
    course: String,
}

impl RegistrationRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn course(&self) -> &str {
        &self.course
    }
}

/// Field name to violation message. An absent field has no error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldName) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Constraints for a student registration
#[derive(Debug, Clone)]
pub struct RegistrationSchema {
    valid_courses: HashSet<String>,
}

impl RegistrationSchema {
    pub fn new(courses: &[Course]) -> Self {
        Self {
            valid_courses: courses.iter().map(|c| c.id.clone()).collect(),
        }
    }

    pub fn from_catalog(catalog: &dyn CourseCatalog) -> Self {
        Self::new(&catalog.list_courses())
    }

    /// Validate a draft, accumulating every violation
    pub fn validate(&self, draft: &DraftRecord) -> Result<RegistrationRecord, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = check(&mut errors, FieldName::Name, validate_name(&draft.name));
        let email = check(&mut errors, FieldName::Email, validate_email(&draft.email));
        let age = check(&mut errors, FieldName::Age, validate_age(&draft.age));
        let course = check(
            &mut errors,
            FieldName::Course,
            self.validate_course(&draft.course),
        );

        match (name, email, age, course) {
            (Some(name), Some(email), Some(age), Some(course)) if errors.is_empty() => {
                Ok(RegistrationRecord {
                    name,
                    email,
                    age,
                    course,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate a single field of the draft
    pub fn validate_field(&self, draft: &DraftRecord, field: FieldName) -> Option<String> {
        let value = draft.get(field);
        let result = match field {
            FieldName::Name => validate_name(value).map(|_| ()),
            FieldName::Email => validate_email(value).map(|_| ()),
            FieldName::Age => validate_age(value).map(|_| ()),
            FieldName::Course => self.validate_course(value).map(|_| ()),
        };
        result.err()
    }

    fn validate_course(&self, value: &FieldValue) -> Result<String, String> {
        let FieldValue::Text(id) = value else {
            return Err(INVALID_VALUE.to_string());
        };
        if self.valid_courses.contains(id) {
            Ok(id.clone())
        } else {
            Err("Please select a course".to_string())
        }
    }
}

fn check<T>(errors: &mut FieldErrors, field: FieldName, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

fn validate_name(value: &FieldValue) -> Result<String, String> {
    let FieldValue::Text(name) = value else {
        return Err(INVALID_VALUE.to_string());
    };
    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        Err(format!("Name must be at least {NAME_MIN_CHARS} characters"))
    } else if len > NAME_MAX_CHARS {
        Err(format!("Name must be at most {NAME_MAX_CHARS} characters"))
    } else {
        Ok(name.clone())
    }
}

fn validate_email(value: &FieldValue) -> Result<String, String> {
    let FieldValue::Text(email) = value else {
        return Err(INVALID_VALUE.to_string());
    };
    if email_pattern().is_match(email) {
        Ok(email.clone())
    } else {
        Err("Please enter a valid email address".to_string())
    }
}

fn validate_age(value: &FieldValue) -> Result<u8, String> {
    let FieldValue::Number(age) = *value else {
        return Err("Invalid age".to_string());
    };
    if age < AGE_MIN {
        Err(format!("You must be at least {AGE_MIN} years old"))
    } else if age > AGE_MAX {
        Err(format!("Age must be {AGE_MAX} or less"))
    } else {
        u8::try_from(age).map_err(|_| "Invalid age".to_string())
    }
}
