//! HTML rendering for form fields.

use tera::escape_html;

use crate::forms::fields::{Field, FieldKind};

pub fn label(field: &Field) -> String {
    format!(
        r#"<label for="{}">{}</label>"#,
        escape_html(field.name()),
        escape_html(field.label())
    )
}

pub fn input(field: &Field) -> String {
    let name = escape_html(field.name());
    match field.kind() {
        FieldKind::TextArea => format!(
            r#"<textarea id="{name}" name="{name}">{}</textarea>"#,
            escape_html(field.value())
        ),
        FieldKind::Password => format!(r#"<input id="{name}" name="{name}" type="password" value="">"#),
        kind => format!(
            r#"<input id="{name}" name="{name}" type="{}" value="{}">"#,
            kind.input_type(),
            escape_html(field.value())
        ),
    }
}

/// Hidden input carrying a value that is not a declared field, e.g. the CSRF token.
pub fn hidden(name: &str, value: &str) -> String {
    let name = escape_html(name);
    format!(
        r#"<input id="{name}" name="{name}" type="hidden" value="{}">"#,
        escape_html(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::data::MultiDict;

    #[test]
    fn test_values_are_escaped() {
        let mut field = Field::text("name", "Your <name>");
        field.process(Some(&MultiDict::from_pairs([("name", r#""><script>"#)])));

        assert_eq!(label(&field), r#"<label for="name">Your &lt;name&gt;</label>"#);
        assert_eq!(
            input(&field),
            r#"<input id="name" name="name" type="text" value="&quot;&gt;&lt;script&gt;">"#
        );
    }

    #[test]
    fn test_password_is_never_echoed() {
        let mut field = Field::password("secret", "Secret");
        field.process(Some(&MultiDict::from_pairs([("secret", "hunter2")])));
        assert!(!input(&field).contains("hunter2"));
    }

    #[test]
    fn test_textarea() {
        let mut field = Field::textarea("message", "Message");
        field.process(Some(&MultiDict::from_pairs([("message", "a & b")])));
        assert_eq!(
            input(&field),
            r#"<textarea id="message" name="message">a &amp; b</textarea>"#
        );
    }

    #[test]
    fn test_hidden() {
        assert_eq!(
            hidden("csrf_token", "abc"),
            r#"<input id="csrf_token" name="csrf_token" type="hidden" value="abc">"#
        );
    }
}
