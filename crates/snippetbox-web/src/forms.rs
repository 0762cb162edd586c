//! Form payloads decoded from request bodies.

use serde::{Deserialize, Serialize};
use snippetbox_core::Validator;
use snippetbox_core::validator::{max_chars, not_blank, permitted_value};

/// Expiry choices (in days) offered by the create form.
pub const PERMITTED_EXPIRES: [i64; 3] = [1, 7, 365];

/// Expiry pre-selected on a fresh create form.
pub const DEFAULT_EXPIRES: i64 = 365;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// `POST /snippet/create` body, echoed back to the template on validation failure.
///
/// Missing `title`/`content` decode as empty strings and are reported by
/// validation; a missing or non-numeric `expires` fails decoding.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: DEFAULT_EXPIRES,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    /// Run all field checks, recording failures in `self.validator`.
    ///
    /// Returns true if the form is valid.
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;

        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(
            not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        v.check_field(
            permitted_value(&self.expires, &PERMITTED_EXPIRES),
            "expires",
            "This field must equal 1, 7 or 365",
        );

        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str, expires: i64) -> SnippetCreateForm {
        SnippetCreateForm {
            title: title.to_string(),
            content: content.to_string(),
            expires,
            validator: Validator::default(),
        }
    }

    #[test]
    fn test_default_form() {
        let form = SnippetCreateForm::default();
        assert_eq!(form.expires, 365);
        assert!(form.title.is_empty());
        assert!(form.validator.valid());
    }

    #[test]
    fn test_valid_form() {
        for expires in PERMITTED_EXPIRES {
            let mut f = form("Valid Title", "Valid content", expires);
            assert!(f.validate(), "expires {expires}");
        }
    }

    #[test]
    fn test_blank_title_only() {
        let mut f = form("", "hello", 7);
        assert!(!f.validate());
        assert_eq!(
            f.validator.field_error("title"),
            Some("This field cannot be blank")
        );
        assert_eq!(f.validator.field_error("content"), None);
        assert_eq!(f.validator.field_error("expires"), None);
    }

    #[test]
    fn test_long_title() {
        let mut f = form(&"x".repeat(101), "hello", 7);
        assert!(!f.validate());
        assert_eq!(
            f.validator.field_error("title"),
            Some("This field cannot be more than 100 characters long")
        );
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let mut f = form(&"ü".repeat(100), "hello", 7);
        assert!(f.validate());
    }

    #[test]
    fn test_whitespace_content() {
        let mut f = form("t", " \n\t ", 1);
        assert!(!f.validate());
        assert_eq!(
            f.validator.field_error("content"),
            Some("This field cannot be blank")
        );
    }

    #[test]
    fn test_unpermitted_expires() {
        for expires in [0, 2, 30, 366, -7] {
            let mut f = form("t", "c", expires);
            assert!(!f.validate());
            assert_eq!(
                f.validator.field_error("expires"),
                Some("This field must equal 1, 7 or 365")
            );
        }
    }

    #[test]
    fn test_serialized_for_templates() {
        let mut f = form("", "c", 7);
        f.validate();

        let value = minijinja::Value::from_serialize(&f);
        let rendered = minijinja::Environment::new()
            .render_str(
                "{{ form.validator.field_errors.title }}|{{ form.expires }}",
                minijinja::context! { form => value },
            )
            .unwrap();
        assert_eq!(rendered, "This field cannot be blank|7");
    }
}
