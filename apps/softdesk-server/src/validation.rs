//! Field-level validation of request bodies.

use api_protocol::FieldError;
use entities::{MINIMUM_USER_AGE, Project, UserId};

use crate::error::{ServerError, ServerResult};

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const NAME_MAX_LENGTH: usize = 200;
pub const DESCRIPTION_MAX_LENGTH: usize = 2048;

/// Collects field errors so a request reports every problem at once.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error on `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
        self
    }

    /// Requires a non-blank value of at most `max` characters.
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.0.push(FieldError::new(field, "This field may not be blank."));
        } else {
            self.max_length(field, value, max);
        }
        self
    }

    /// Allows an empty value but caps its length.
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.chars().count() <= max;
        self.check(
            ok,
            field,
            format!("Ensure this field has no more than {max} characters."),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails with a validation error listing every recorded field.
    pub fn finish(self) -> ServerResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        let message = match self.0.as_slice() {
            [single] => format!("{}: {}", single.field, single.message),
            many => format!("{} fields are invalid", many.len()),
        };
        Err(ServerError::Validation {
            message,
            fields: self.0,
        })
    }
}

/// Checks the profile fields shared by registration and update.
pub fn user_profile(errors: &mut FieldErrors, username: &str, age: u32) {
    errors
        .required_text("username", username, USERNAME_MAX_LENGTH)
        .check(
            username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)),
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )
        .check(
            entities::User::is_valid_age(age),
            "age",
            format!("Users must be at least {MINIMUM_USER_AGE} years old."),
        );
}

pub fn password(errors: &mut FieldErrors, password: &str) {
    errors.check(!password.is_empty(), "password", "This field may not be blank.");
}

pub fn project(errors: &mut FieldErrors, name: &str, description: &str) {
    errors
        .required_text("name", name, NAME_MAX_LENGTH)
        .max_length("description", description, DESCRIPTION_MAX_LENGTH);
}

pub fn issue(errors: &mut FieldErrors, name: &str, description: &str) {
    errors
        .required_text("name", name, NAME_MAX_LENGTH)
        .max_length("description", description, DESCRIPTION_MAX_LENGTH);
}

pub fn comment(errors: &mut FieldErrors, description: &str) {
    errors.required_text("description", description, DESCRIPTION_MAX_LENGTH);
}

/// An assignee must currently contribute to the issue's project.
pub fn assignee(errors: &mut FieldErrors, project: &Project, assigned_to: Option<UserId>) {
    if let Some(user_id) = assigned_to {
        errors.check(
            project.is_contributor(user_id),
            "assigned_to",
            format!("User {user_id} is not a contributor of this project."),
        );
    }
}
