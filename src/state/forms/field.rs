//! Form field value objects

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Names of the registration form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Name,
    Email,
    Age,
    Course,
}

impl FieldName {
    /// All fields in display order
    pub const ALL: [FieldName; 4] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Age,
        FieldName::Course,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Course => "course",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email",
            Self::Age => "Age",
            Self::Course => "Course",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a field name does not belong to the registration form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct FieldParseError(pub String);

impl FromStr for FieldName {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "age" => Ok(Self::Age),
            "course" => Ok(Self::Course),
            other => Err(FieldParseError(other.to_string())),
        }
    }
}

/// Loosely typed field values. A draft may hold the wrong variant for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Get the text value (returns empty string for numeric values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Number(_) => "",
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(0) => String::new(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

/// Unvalidated user input shaped like a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    pub name: FieldValue,
    pub email: FieldValue,
    pub age: FieldValue,
    pub course: FieldValue,
}

impl Default for DraftRecord {
    fn default() -> Self {
        Self {
            name: FieldValue::Text(String::new()),
            email: FieldValue::Text(String::new()),
            age: FieldValue::Number(0),
            course: FieldValue::Text(String::new()),
        }
    }
}

impl DraftRecord {
    pub fn get(&self, field: FieldName) -> &FieldValue {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Age => &self.age,
            FieldName::Course => &self.course,
        }
    }

    pub fn set(&mut self, field: FieldName, value: FieldValue) {
        match field {
            FieldName::Name => self.name = value,
            FieldName::Email => self.email = value,
            FieldName::Age => self.age = value,
            FieldName::Course => self.course = value,
        }
    }
}
