use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::domain::{AnswerField, AssessmentAnswers};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static CONTACT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("contact pattern compiles"));

static CONTACT_FORMATTING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-()]").expect("formatting pattern compiles"));

/// Field-level messages rendered next to the offending inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<AnswerField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: AnswerField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: AnswerField) -> bool {
        self.0.contains_key(&field)
    }

    pub(crate) fn insert(&mut self, field: AnswerField, message: &str) {
        self.0.insert(field, message.to_string());
    }

    pub(crate) fn clear_field(&mut self, field: AnswerField) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnswerField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Accepts international numbers once spaces, dashes and parentheses are stripped.
pub fn is_valid_contact(contact: &str) -> bool {
    let digits = CONTACT_FORMATTING.replace_all(contact, "");
    CONTACT_PATTERN.is_match(&digits)
}

/// Checks the identity fields collected on the basic information step.
pub fn validate_basic_info(answers: &AssessmentAnswers) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if answers.name.trim().is_empty() {
        errors.insert(AnswerField::Name, "Name is required");
    }

    if answers.email.trim().is_empty() {
        errors.insert(AnswerField::Email, "Email is required");
    } else if !is_valid_email(&answers.email) {
        errors.insert(AnswerField::Email, "Please enter a valid email address");
    }

    if answers.contact.trim().is_empty() {
        errors.insert(AnswerField::Contact, "Contact number is required");
    } else if !is_valid_contact(&answers.contact) {
        errors.insert(AnswerField::Contact, "Please enter a valid contact number");
    }

    errors
}
