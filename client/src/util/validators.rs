//! Login and registration input contracts.
//!
//! SYSTEM CONTEXT
//! ==============
//! Forms validate before any network call. Failures are reported per field so
//! the form can render messages inline and keep the entered values.

#[cfg(test)]
#[path = "validators_test.rs"]
mod validators_test;

use std::sync::LazyLock;

use regex::Regex;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_NEEDS_UPPER: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_NEEDS_LOWER: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NEEDS_DIGIT: &str = "Password must contain at least one number";
pub const PASSWORD_NEEDS_SPECIAL: &str = "Password must contain at least one special character";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const NAME_TOO_LONG: &str = "Name must be at most 100 characters";
pub const PHONE_INVALID: &str = "Invalid phone number format";

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern is valid: {e}"))
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap_or_else(|e| unreachable!("phone pattern is valid: {e}")));

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    Name,
    Phone,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Name => "name",
            Self::Phone => "phone",
        }
    }
}

/// Ordered validation failures, possibly several per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push((field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message for `field`, the one shown inline.
    pub fn first(&self, field: Field) -> Option<&'static str> {
        self.errors.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    /// Every message for `field`, in rule order.
    pub fn messages(&self, field: Field) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, m)| *m)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().copied()
    }

    /// Drop errors for `field`, e.g. once the user edits it.
    pub fn clear(&mut self, field: Field) {
        self.errors.retain(|(f, _)| *f != field);
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {message}", field.as_str()))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Trimmed, lower-cased email.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

fn check_email(raw: &str, errors: &mut FieldErrors) -> String {
    let email = normalize_email(raw);
    if email.is_empty() {
        errors.push(Field::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(&email) {
        errors.push(Field::Email, EMAIL_INVALID);
    }
    email
}

/// One message per unmet password rule, in rule order.
pub fn password_rule_failures(password: &str) -> Vec<&'static str> {
    let mut failures = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        failures.push(PASSWORD_TOO_SHORT);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        failures.push(PASSWORD_NEEDS_UPPER);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        failures.push(PASSWORD_NEEDS_LOWER);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        failures.push(PASSWORD_NEEDS_DIGIT);
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        failures.push(PASSWORD_NEEDS_SPECIAL);
    }
    failures
}

/// Validated login form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    /// # Errors
    ///
    /// Returns per-field errors when the email is missing/malformed or the
    /// password is empty.
    pub fn parse(email: &str, password: &str) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(email, &mut errors);
        if password.is_empty() {
            errors.push(Field::Password, PASSWORD_REQUIRED);
        }
        errors.into_result(Self { email, password: password.to_owned() })
    }
}

/// Validated registration form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

impl RegisterInput {
    /// A blank phone counts as absent.
    ///
    /// # Errors
    ///
    /// Returns every failed rule across all fields.
    pub fn parse(email: &str, password: &str, name: &str, phone: Option<&str>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(email, &mut errors);

        for failure in password_rule_failures(password) {
            errors.push(Field::Password, failure);
        }

        let name_len = name.chars().count();
        if name_len < MIN_NAME_LEN {
            errors.push(Field::Name, NAME_TOO_SHORT);
        } else if name_len > MAX_NAME_LEN {
            errors.push(Field::Name, NAME_TOO_LONG);
        }

        let phone = phone.map(str::trim).filter(|p| !p.is_empty()).map(str::to_owned);
        if let Some(p) = &phone {
            if !PHONE_RE.is_match(p) {
                errors.push(Field::Phone, PHONE_INVALID);
            }
        }

        errors.into_result(Self { email, password: password.to_owned(), name: name.to_owned(), phone })
    }
}
