//! Form fields.

use crate::forms::data::MultiValueLookup;
use crate::forms::validators::Validator;
use crate::forms::widgets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    TextArea,
    Hidden,
}

impl FieldKind {
    /// `type` attribute for `<input>` based kinds.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text | Self::TextArea => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Hidden => "hidden",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    label: String,
    kind: FieldKind,
    default: Option<String>,
    data: Option<String>,
    validators: Vec<Validator>,
    errors: Vec<String>,
}

impl Field {
    pub fn new(kind: FieldKind, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default: None,
            data: None,
            validators: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, name, label)
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(FieldKind::Email, name, label)
    }

    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(FieldKind::Password, name, label)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(FieldKind::TextArea, name, label)
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Hidden, name, "")
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Take the first submitted value for this field, or fall back to the default.
    pub fn process(&mut self, formdata: Option<&dyn MultiValueLookup>) {
        self.errors.clear();
        self.data = formdata
            .and_then(|data| data.get_first(&self.name))
            .map(str::to_owned)
            .or_else(|| self.default.clone());
    }

    /// Run validators in order, collecting their messages.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        let value = self.data.as_deref().unwrap_or("");
        for validator in &self.validators {
            if let Err(e) = validator.check(value) {
                self.errors.push(e.message().to_owned());
                if e.stops_chain() {
                    break;
                }
            }
        }
        self.errors.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current value, empty when nothing was submitted and there is no default.
    pub fn value(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn label_html(&self) -> String {
        widgets::label(self)
    }

    pub fn input_html(&self) -> String {
        widgets::input(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::data::MultiDict;

    #[test]
    fn test_process_prefers_submitted_value() {
        let mut field = Field::text("name", "Name").default_value("anon");

        field.process(Some(&MultiDict::from_pairs([("name", "alice"), ("name", "bob")])));
        assert_eq!(field.value(), "alice");

        field.process(Some(&MultiDict::new()));
        assert_eq!(field.value(), "anon");

        field.process(None);
        assert_eq!(field.data(), Some("anon"));
    }

    #[test]
    fn test_required_stops_chain() {
        let mut field = Field::text("name", "Name")
            .validator(Validator::required())
            .validator(Validator::length(Some(3), None));

        field.process(None);
        assert!(!field.validate());
        assert_eq!(field.errors(), ["This field is required."]);

        field.process(Some(&MultiDict::from_pairs([("name", "al")])));
        assert!(!field.validate());
        assert_eq!(field.errors(), ["Field must be at least 3 characters long."]);

        field.process(Some(&MultiDict::from_pairs([("name", "alice")])));
        assert!(field.validate());
        assert!(field.errors().is_empty());
    }
}
