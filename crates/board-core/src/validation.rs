//! Request field validation shared by every handler.

use crate::error::DomainError;

/// Longest username the `users` table accepts.
pub const USERNAME_MAX_LEN: usize = 50;
/// Longest email the `users` table accepts.
pub const EMAIL_MAX_LEN: usize = 100;
/// Longest post title the `posts` table accepts.
pub const TITLE_MAX_LEN: usize = 200;

/// Collects required fields and reports every missing one at once.
///
/// A field counts as missing when it is absent, empty, or whitespace only.
///
/// ```
/// use board_core::validation::RequiredFields;
///
/// let mut fields = RequiredFields::new();
/// let title = fields.take("title", Some("Hi".to_string()));
/// let content = fields.take("content", None);
/// assert!(fields.finish().is_err());
/// assert_eq!(title, "Hi");
/// assert!(content.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a field's value, recording it as missing when blank.
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingFields(self.missing))
        }
    }
}

/// Reject values longer than the column they are stored in.
pub fn ensure_max_len(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(())
}
