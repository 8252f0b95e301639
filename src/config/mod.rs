//! Field-level and form-level user configuration
//!
//! Callers shape the generated UI through explicit configuration objects:
//! per-field overrides in a base scope (all variants) and in variant-specific
//! scopes, plus a form-wide label mapping function. Custom renderers are
//! injected functions, not ambient lookups.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::InputKind;
use crate::schema::VariantTag;

/// Custom control renderer injected by the caller.
///
/// Receives the field's current value (null when unset) and produces opaque
/// markup for the host to mount.
pub type FieldRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Field-name → display label mapping function.
pub type LabelMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Explicit control override for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayKind {
    Select,
    Textarea,
    Image,
    Datetime,
    Wysiwyg,
}

/// Concrete control resolved for rendering one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    Text,
    Number,
    Checkbox,
    Select,
    Datetime,
    Textarea,
    Image,
    Wysiwyg,
    /// A caller-supplied renderer replaces the default control
    Custom,
}

impl Control {
    /// Default control for a derived input kind
    pub fn for_kind(kind: InputKind) -> Self {
        match kind {
            InputKind::String => Control::Text,
            InputKind::Number => Control::Number,
            InputKind::Boolean => Control::Checkbox,
            InputKind::Select => Control::Select,
            InputKind::Datetime => Control::Datetime,
        }
    }

    fn for_display(display: DisplayKind) -> Self {
        match display {
            DisplayKind::Select => Control::Select,
            DisplayKind::Textarea => Control::Textarea,
            DisplayKind::Image => Control::Image,
            DisplayKind::Datetime => Control::Datetime,
            DisplayKind::Wysiwyg => Control::Wysiwyg,
        }
    }
}

/// Per-field override supplied by the caller.
///
/// All properties are optional; scopes merge property-wise with
/// variant-specific values taking precedence over base values.
#[derive(Clone, Default)]
pub struct FieldConfig {
    pub display: Option<DisplayKind>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub hidden: Option<bool>,
    pub renderer: Option<FieldRenderer>,
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("display", &self.display)
            .field("label", &self.label)
            .field("description", &self.description)
            .field("placeholder", &self.placeholder)
            .field("hidden", &self.hidden)
            .field("renderer", &self.renderer.as_ref().map(|_| "<renderer>"))
            .finish()
    }
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(mut self, display: DisplayKind) -> Self {
        self.display = Some(display);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn renderer(mut self, renderer: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }
}

/// Form-wide configuration: base overrides, variant overrides, label mapping
#[derive(Clone, Default)]
pub struct FormConfig {
    base: HashMap<String, FieldConfig>,
    variants: HashMap<VariantTag, HashMap<String, FieldConfig>>,
    label_mapper: Option<LabelMapper>,
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("base", &self.base)
            .field("variants", &self.variants)
            .field(
                "label_mapper",
                &self.label_mapper.as_ref().map(|_| "<mapper>"),
            )
            .finish()
    }
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a field in the base scope (applies to all variants)
    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.base.insert(name.into(), config);
        self
    }

    /// Override a field only while the given variant is selected
    pub fn variant_field(
        mut self,
        tag: impl Into<VariantTag>,
        name: impl Into<String>,
        config: FieldConfig,
    ) -> Self {
        self.variants
            .entry(tag.into())
            .or_default()
            .insert(name.into(), config);
        self
    }

    /// Fallback label derivation applied to raw field names
    pub fn label_mapper(mut self, mapper: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.label_mapper = Some(Arc::new(mapper));
        self
    }

    fn base_config(&self, field: &str) -> Option<&FieldConfig> {
        self.base.get(field)
    }

    fn variant_config(&self, tag: Option<&VariantTag>, field: &str) -> Option<&FieldConfig> {
        tag.and_then(|tag| self.variants.get(tag))
            .and_then(|scope| scope.get(field))
    }

    /// Resolve the control for a field.
    ///
    /// Precedence, highest first: variant renderer, base renderer, variant
    /// display override, base display override, kind-inferred default.
    pub fn resolve_control(
        &self,
        tag: Option<&VariantTag>,
        field: &str,
        kind: InputKind,
    ) -> Control {
        let variant = self.variant_config(tag, field);
        let base = self.base_config(field);

        if variant.is_some_and(|c| c.renderer.is_some()) || base.is_some_and(|c| c.renderer.is_some())
        {
            return Control::Custom;
        }
        if let Some(display) = variant.and_then(|c| c.display).or_else(|| base.and_then(|c| c.display))
        {
            return Control::for_display(display);
        }
        Control::for_kind(kind)
    }

    /// Resolve the custom renderer for a field, variant scope first.
    pub fn resolve_renderer(&self, tag: Option<&VariantTag>, field: &str) -> Option<&FieldRenderer> {
        self.variant_config(tag, field)
            .and_then(|c| c.renderer.as_ref())
            .or_else(|| self.base_config(field).and_then(|c| c.renderer.as_ref()))
    }

    /// Resolve the display label for a field.
    ///
    /// Precedence: variant label, base label, label mapper, raw field name.
    pub fn resolve_label(&self, tag: Option<&VariantTag>, field: &str) -> String {
        if let Some(label) = self.variant_config(tag, field).and_then(|c| c.label.clone()) {
            return label;
        }
        if let Some(label) = self.base_config(field).and_then(|c| c.label.clone()) {
            return label;
        }
        if let Some(mapper) = &self.label_mapper {
            return mapper(field);
        }
        field.to_string()
    }

    pub fn resolve_description(&self, tag: Option<&VariantTag>, field: &str) -> Option<String> {
        self.variant_config(tag, field)
            .and_then(|c| c.description.clone())
            .or_else(|| self.base_config(field).and_then(|c| c.description.clone()))
    }

    pub fn resolve_placeholder(&self, tag: Option<&VariantTag>, field: &str) -> Option<String> {
        self.variant_config(tag, field)
            .and_then(|c| c.placeholder.clone())
            .or_else(|| self.base_config(field).and_then(|c| c.placeholder.clone()))
    }

    /// Whether a field is excluded from visible rendering
    pub fn resolve_hidden(&self, tag: Option<&VariantTag>, field: &str) -> bool {
        self.variant_config(tag, field)
            .and_then(|c| c.hidden)
            .or_else(|| self.base_config(field).and_then(|c| c.hidden))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_control_precedence() {
        let config = FormConfig::new()
            .field("notes", FieldConfig::new().display(DisplayKind::Textarea))
            .variant_field("truck", "notes", FieldConfig::new().display(DisplayKind::Wysiwyg));

        let truck = VariantTag::from("truck");
        assert_eq!(
            config.resolve_control(Some(&truck), "notes", InputKind::String),
            Control::Wysiwyg
        );
        assert_eq!(
            config.resolve_control(None, "notes", InputKind::String),
            Control::Textarea
        );
        assert_eq!(
            config.resolve_control(None, "name", InputKind::String),
            Control::Text
        );
    }

    #[test]
    fn test_renderer_beats_display_override() {
        let config = FormConfig::new().field(
            "photo",
            FieldConfig::new()
                .display(DisplayKind::Image)
                .renderer(|value| format!("<img src={}>", value)),
        );

        assert_eq!(
            config.resolve_control(None, "photo", InputKind::String),
            Control::Custom
        );
        let rendered = config.resolve_renderer(None, "photo").unwrap()(&json!("x.png"));
        assert_eq!(rendered, "<img src=\"x.png\">");
    }

    #[test]
    fn test_label_precedence() {
        let config = FormConfig::new()
            .field("brand_name", FieldConfig::new().label("Brand"))
            .variant_field("truck", "brand_name", FieldConfig::new().label("Truck brand"))
            .label_mapper(|name| name.to_uppercase());

        let truck = VariantTag::from("truck");
        assert_eq!(config.resolve_label(Some(&truck), "brand_name"), "Truck brand");
        assert_eq!(config.resolve_label(None, "brand_name"), "Brand");
        assert_eq!(config.resolve_label(None, "model_name"), "MODEL_NAME");
    }

    #[test]
    fn test_variant_hidden_overrides_base() {
        let config = FormConfig::new()
            .field("internal_code", FieldConfig::new().hidden(true))
            .variant_field("car", "internal_code", FieldConfig::new().hidden(false));

        let car = VariantTag::from("car");
        assert!(config.resolve_hidden(None, "internal_code"));
        assert!(!config.resolve_hidden(Some(&car), "internal_code"));
    }
}
