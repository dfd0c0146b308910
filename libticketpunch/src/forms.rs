//! Declarative form validation
//!
//! Each form is a list of fields, each field a list of rules checked in
//! order; the first rule that fails supplies the field's message. Rules are
//! evaluated for one field when it loses focus (`FormState::blur`) and for
//! every field on submit (`FormState::submit`).
//!
//! Values are trimmed before checking, except for password fields, which
//! are checked as typed. Every submitted value comes back trimmed. A value
//! that is empty after trimming counts as missing; optional rules
//! (length, pattern) are skipped for missing values. Lengths count
//! characters, and a value of exactly the maximum length passes.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::TicketPunchError;

pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$")
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid email pattern: {}", e))
});

pub const TITLE_MAX: usize = 30;
pub const DESCRIPTION_MAX: usize = 140;
pub const PASSWORD_MIN: usize = 6;

/// One validation rule and the message shown when it fails
#[derive(Debug, Clone)]
pub enum Rule {
    Required(&'static str),
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
    Pattern(&'static Regex, &'static str),
}

impl Rule {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        match self {
            Rule::Required(msg) if value.trim().is_empty() => Err(*msg),
            Rule::MinLength(min, msg) if value.chars().count() < *min => Err(*msg),
            Rule::MaxLength(max, msg) if value.chars().count() > *max => Err(*msg),
            Rule::Pattern(re, msg) if !re.is_match(value) => Err(*msg),
            _ => Ok(()),
        }
    }

    fn is_required(&self) -> bool {
        matches!(self, Rule::Required(_))
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub rules: Vec<Rule>,
    /// Passwords are checked as typed
    pub trim_before_check: bool,
}

impl Field {
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            name,
            rules,
            trim_before_check: true,
        }
    }

    pub fn secret(name: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            name,
            rules,
            trim_before_check: false,
        }
    }

    /// First failing rule's message, if any
    pub fn validate(&self, value: &str) -> Option<&'static str> {
        let value = if self.trim_before_check {
            value.trim()
        } else {
            value
        };
        let missing = value.trim().is_empty();
        self.rules
            .iter()
            .filter(|rule| !missing || rule.is_required())
            .find_map(|rule| rule.check(value).err())
    }
}

#[derive(Debug, Clone)]
pub struct Form {
    pub name: &'static str,
    pub fields: Vec<Field>,
}

impl Form {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate one field; unknown fields always pass
    pub fn validate_field(&self, name: &str, value: &str) -> Option<&'static str> {
        self.field(name).and_then(|f| f.validate(value))
    }

    /// Validate every field, missing values treated as empty
    pub fn validate<'a>(
        &self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<FormValues, FieldErrors> {
        let given: BTreeMap<&str, &str> = values.into_iter().collect();
        let mut clean = FormValues::default();
        let mut errors = FieldErrors::default();

        for field in &self.fields {
            let raw = given.get(field.name).copied().unwrap_or("");
            match field.validate(raw) {
                Some(msg) => errors.0.push((field.name, msg)),
                None => {
                    clean
                        .0
                        .insert(field.name.to_string(), raw.trim().to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(clean)
        } else {
            Err(errors)
        }
    }
}

/// Validated, normalized form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Value of `field`, empty when the form has no such field
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Messages for every failing field, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, &'static str)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, m)| *m).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<FieldErrors> for TicketPunchError {
    fn from(errors: FieldErrors) -> Self {
        TicketPunchError::InvalidInput(errors.to_string())
    }
}

/// Inline error tracking for one form instance
#[derive(Debug, Clone)]
pub struct FormState {
    form: Form,
    errors: BTreeMap<&'static str, &'static str>,
}

impl FormState {
    pub fn new(form: Form) -> Self {
        Self {
            form,
            errors: BTreeMap::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Re-validate one field, replacing its inline error
    pub fn blur(&mut self, field: &str, value: &str) -> Option<&'static str> {
        let def = self.form.field(field)?;
        let name = def.name;
        match def.validate(value) {
            Some(msg) => {
                self.errors.insert(name, msg);
                Some(msg)
            }
            None => {
                self.errors.remove(name);
                None
            }
        }
    }

    /// Validate all fields; on success the inline errors are cleared
    pub fn submit<'a>(
        &mut self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<FormValues, FieldErrors> {
        let result = self.form.validate(values);
        self.errors = match &result {
            Ok(_) => BTreeMap::new(),
            Err(errors) => errors.iter().collect(),
        };
        result
    }

    pub fn error(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ============================================================================
// Forms
// ============================================================================

pub fn login_form() -> Form {
    Form {
        name: "login",
        fields: vec![
            Field::new(
                "email",
                vec![
                    Rule::Required("Please enter your email address"),
                    Rule::Pattern(&EMAIL_PATTERN, "Enter in the format: name@company.com"),
                ],
            ),
            Field::secret("password", vec![Rule::Required("Please enter your password")]),
        ],
    }
}

pub fn registration_form() -> Form {
    Form {
        name: "register",
        fields: vec![
            Field::new(
                "email",
                vec![
                    Rule::Required("Please enter a valid email address"),
                    Rule::Pattern(&EMAIL_PATTERN, "Enter in the format: name@company.com"),
                ],
            ),
            Field::secret(
                "password",
                vec![
                    Rule::Required("Please enter a password"),
                    Rule::MinLength(PASSWORD_MIN, "Passwords must be six or more characters"),
                ],
            ),
        ],
    }
}

pub fn project_form() -> Form {
    Form {
        name: "project",
        fields: vec![
            Field::new(
                "title",
                vec![
                    Rule::Required("Please enter the project title"),
                    Rule::MaxLength(TITLE_MAX, "Project titles must be less than 30 characters"),
                ],
            ),
            Field::new(
                "description",
                vec![
                    Rule::Required("Please enter the project description"),
                    Rule::MaxLength(
                        DESCRIPTION_MAX,
                        "Project descriptions must be less than 140 characters",
                    ),
                ],
            ),
        ],
    }
}

/// Editing a project only requires both fields to be present
pub fn project_edit_form() -> Form {
    Form {
        name: "project_edit",
        fields: vec![
            Field::new("title", vec![Rule::Required("Please enter the project title")]),
            Field::new(
                "description",
                vec![Rule::Required("Please enter the project description")],
            ),
        ],
    }
}

pub fn ticket_form() -> Form {
    Form {
        name: "ticket",
        fields: vec![
            Field::new(
                "title",
                vec![
                    Rule::Required("Please enter the ticket title"),
                    Rule::MaxLength(TITLE_MAX, "Ticket titles must be less than 30 characters"),
                ],
            ),
            Field::new(
                "description",
                vec![
                    Rule::Required("Please enter the ticket description"),
                    Rule::MaxLength(
                        DESCRIPTION_MAX,
                        "Ticket descriptions must be less than 140 characters",
                    ),
                ],
            ),
        ],
    }
}
