//! Request-scoped variable bindings and template rendering.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::criteria::SearchCriteria;
use crate::errors::TemplateError;

/// Placeholders are single lowercase identifiers in braces, e.g.
/// `{industry}`. Multi-line brace blocks (JSON examples inside templates)
/// never match this shape.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("placeholder pattern is valid"))
}

/// The mutable variable map owned by a pipeline run.
///
/// Holds the user-supplied criteria plus derived presentation fields. The
/// runner is the only writer, and only between stages.
#[derive(Debug, Clone, Default)]
pub struct VariableBindings {
    values: HashMap<String, String>,
}

impl VariableBindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds bindings from search criteria.
    ///
    /// Every criteria field gets a binding (empty string when absent), and
    /// the derived `product_info` presentation line is added: either
    /// `"Product/Technology focus: <product>\n"` or the empty string.
    #[must_use]
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut bindings = Self {
            values: criteria.to_params(),
        };

        let product = bindings.get("product").unwrap_or("").to_string();
        let product_info = if product.is_empty() {
            String::new()
        } else {
            format!("Product/Technology focus: {product}\n")
        };
        bindings.set("product_info", product_info);
        bindings
    }

    /// Sets a binding, overwriting any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets a binding.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The bindings as a parameter map for capability invocation.
    #[must_use]
    pub fn as_params(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Renders a template by substituting every `{placeholder}`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] naming the first placeholder that has no
    /// binding. The caller checks this before any provider call is made.
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        let mut rendered = template.to_string();
        for (key, value) in &self.values {
            rendered = rendered.replace(&format!("{{{key}}}"), value);
        }

        if let Some(captures) = placeholder_re().captures(&rendered) {
            return Err(TemplateError::new(&captures[1]));
        }

        Ok(rendered)
    }
}
