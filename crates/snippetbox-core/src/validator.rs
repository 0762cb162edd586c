//! Field-scoped validation for submitted forms.
//!
//! A [`Validator`] collects at most one error per field: the first failed
//! check for a field wins and later checks on the same field are ignored.
//! The predicate functions are pure and meant to be passed as the `ok`
//! argument of [`Validator::check_field`].
//!
//! ```
//! use snippetbox_core::validator::{Validator, max_chars, not_blank};
//!
//! let title = "   ";
//! let mut v = Validator::default();
//! v.check_field(not_blank(title), "title", "This field cannot be blank");
//! v.check_field(max_chars(title, 100), "title", "Too long");
//!
//! assert!(!v.valid());
//! assert_eq!(v.field_errors["title"], "This field cannot be blank");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated field errors for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    /// Error message per field name.
    pub field_errors: BTreeMap<String, String>,
}

impl Validator {
    /// True if no field has an error.
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// Record `message` for `key` unless the field already has an error.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `key` if `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    /// The error recorded for `key`, if any.
    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }
}

/// True if `value` contains something other than whitespace.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True if `value` has at most `n` characters (Unicode code points).
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// True if `value` is one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}
