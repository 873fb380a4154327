//! crates/admin_dashboard_core/src/validation.rs
//!
//! Local, pre-request checks for the auth and product forms. A failed check is
//! reported per field and never reaches the network.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::ProductDraft;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Field-scoped validation messages, kept in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.entries.first().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !email_shape().is_match(email) {
        errors.push("email", "Email is invalid");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result()
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    if password != confirm_password {
        errors.push("confirmPassword", "Passwords do not match");
    }
    errors.into_result()
}

pub fn validate_product(draft: &ProductDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if draft.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if draft.description.trim().is_empty() {
        errors.push("description", "Description is required");
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        errors.push("price", "Valid price is required");
    }
    errors.into_result()
}
