//! Template engine wrapper.

use std::sync::Arc;

use tera::{Context, Tera};

use crate::config::TemplatesConfig;

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("hello_world.html", include_str!("../../templates/hello_world.html")),
    ("contact.html", include_str!("../../templates/contact.html")),
];

/// Shared, read-only Tera instance.
#[derive(Clone)]
pub struct Templates {
    inner: Arc<Tera>,
}

impl Templates {
    /// Only the templates compiled into the binary.
    pub fn builtin() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)?;
        Ok(Self {
            inner: Arc::new(tera),
        })
    }

    /// Templates matching the configured glob, with built-ins filling any gaps.
    /// A file named like a built-in replaces it.
    pub fn from_config(config: &TemplatesConfig) -> Result<Self, tera::Error> {
        let Some(glob) = &config.glob else {
            return Self::builtin();
        };

        let mut tera = Tera::new(glob)?;
        let builtin = Self::builtin()?;
        tera.extend(&builtin.inner)?;
        tracing::info!(
            glob = %glob,
            templates = tera.get_template_names().count(),
            "Templates loaded"
        );

        Ok(Self {
            inner: Arc::new(tera),
        })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.inner.render(name, context)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.inner.get_template_names().any(|n| n == name)
    }
}
