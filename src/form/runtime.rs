//! Live editable form bound to schema metadata and configuration

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{Control, FormConfig};
use crate::fields::{DiscriminatedFieldMap, FieldMetadata, SelectOption, field_error_id};
use crate::schema::{SchemaError, SchemaNode, VariantTag};

use super::state::{FieldError, FormPhase, FormState};
use super::validate::validate_values;
use super::{FormError, SubmitHandler, SubmitOutcome};

/// Metadata source backing a form: plain object or discriminated union
#[derive(Debug, Clone)]
enum FormShape {
    Object(FieldMetadata),
    Union(DiscriminatedFieldMap),
}

/// Fully resolved rendering description of one visible field
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    pub control: Control,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub required: bool,
    pub options: Vec<SelectOption>,
    /// Stable identifier for this field's inline error message
    pub error_id: String,
    pub value: Option<Value>,
    /// Markup produced by a custom renderer, when one is configured
    pub rendered: Option<String>,
}

/// Live editable form over one object or discriminated-union schema.
///
/// Owns the value map and validation errors for a single render; create one
/// per mounted form and discard it after submit or unmount.
#[derive(Debug)]
pub struct FormRuntime {
    shape: FormShape,
    config: FormConfig,
    state: FormState,
}

impl FormRuntime {
    /// Build a form runtime over a schema.
    ///
    /// The runtime starts idle; [`FormRuntime::mount`] merges default values
    /// and opens it for editing.
    pub fn new(schema: &SchemaNode, config: FormConfig) -> Result<Self, SchemaError> {
        let shape = match schema {
            SchemaNode::Union(union) => FormShape::Union(DiscriminatedFieldMap::of_schema(union)?),
            other => FormShape::Object(FieldMetadata::of_object(other)?),
        };

        Ok(Self {
            shape,
            config,
            state: FormState::default(),
        })
    }

    /// Merge schema-derived defaults with caller-supplied default values and
    /// open the form for editing.
    ///
    /// Caller defaults win over schema defaults. For union schemas the
    /// selected variant is initialized from the default discriminator value
    /// when it matches a declared tag; otherwise the form stays unselected.
    pub fn mount(&mut self, defaults: Map<String, Value>) -> Result<(), FormError> {
        if self.state.phase != FormPhase::Idle {
            return Err(FormError::AlreadyMounted);
        }

        let mut values = self.schema_defaults();
        for (name, value) in defaults {
            values.insert(name, value);
        }

        if let FormShape::Union(map) = &self.shape {
            self.state.selected_variant = values
                .get(map.discriminator())
                .and_then(|value| map.tag_matching(value))
                .cloned();
        }

        self.state.values = values;
        self.state.phase = FormPhase::Editing;
        info!(fields = self.active_metadata().map_or(0, FieldMetadata::len), "form mounted");
        Ok(())
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.state.values
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.state.values.get(field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.state.errors
    }

    /// Error recorded for one field, addressed by name
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.state.errors.iter().find(|e| e.field == field)
    }

    pub fn selected_variant(&self) -> Option<&VariantTag> {
        self.state.selected_variant.as_ref()
    }

    /// Discriminator field name, for union-backed forms
    pub fn discriminator(&self) -> Option<&str> {
        match &self.shape {
            FormShape::Union(map) => Some(map.discriminator()),
            FormShape::Object(_) => None,
        }
    }

    /// Metadata of the currently active field set.
    ///
    /// For union-backed forms this is the selected variant's metadata; none
    /// while no variant is selected.
    pub fn active_metadata(&self) -> Option<&FieldMetadata> {
        match &self.shape {
            FormShape::Object(metadata) => Some(metadata),
            FormShape::Union(map) => self
                .state
                .selected_variant
                .as_ref()
                .and_then(|tag| map.get(tag)),
        }
    }

    /// Set one field's value. Only active fields are writable.
    pub fn set_value(&mut self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.ensure_editing()?;
        if self.active_metadata().is_none_or(|m| !m.contains(field)) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        self.state.values.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Clear a field to an explicit null.
    ///
    /// Only permitted for non-required (optional or nullable) fields; null is
    /// distinct from unset. Clearing twice equals clearing once.
    pub fn clear(&mut self, field: &str) -> Result<(), FormError> {
        self.ensure_editing()?;
        let Some(form_field) = self.active_metadata().and_then(|m| m.get(field)) else {
            return Err(FormError::UnknownField(field.to_string()));
        };
        if form_field.required {
            return Err(FormError::ClearNotAllowed(field.to_string()));
        }
        self.state.values.insert(field.to_string(), Value::Null);
        Ok(())
    }

    /// Select the active variant of a union-backed form.
    ///
    /// The rendered field set is recomputed from the discriminated map;
    /// values of fields absent from the new variant are retained in the value
    /// map (they resurface when the user switches back) but drop out of
    /// rendering, validation and submission. Re-selecting the current tag is
    /// a no-op.
    pub fn select_variant(&mut self, tag: impl Into<VariantTag>) -> Result<(), FormError> {
        self.ensure_editing()?;
        let tag = tag.into();

        let FormShape::Union(map) = &self.shape else {
            return Err(FormError::NotAUnion);
        };
        if map.get(&tag).is_none() {
            return Err(FormError::UnknownVariant(tag.to_string()));
        }
        if self.state.selected_variant.as_ref() == Some(&tag) {
            return Ok(());
        }

        let discriminator = map.discriminator().to_string();
        debug!(variant = %tag, "variant selected");
        self.state.values.insert(discriminator, tag.as_value());
        self.state.selected_variant = Some(tag);
        self.state.errors.clear();
        Ok(())
    }

    /// Resolve the currently rendered field set.
    ///
    /// Hidden fields and the discriminator are excluded; labels, controls and
    /// custom renderers follow the configured precedence.
    pub fn visible_fields(&self) -> Vec<ResolvedField> {
        let Some(metadata) = self.active_metadata() else {
            return Vec::new();
        };
        let tag = self.state.selected_variant.as_ref();

        metadata
            .iter()
            .filter(|(name, _)| !self.config.resolve_hidden(tag, name))
            .map(|(name, field)| {
                let value = self.state.values.get(name).cloned();
                let rendered = self
                    .config
                    .resolve_renderer(tag, name)
                    .map(|renderer| renderer(value.as_ref().unwrap_or(&Value::Null)));

                ResolvedField {
                    name: name.to_string(),
                    label: self.config.resolve_label(tag, name),
                    control: self.config.resolve_control(tag, name, field.kind),
                    description: self.config.resolve_description(tag, name),
                    placeholder: self.config.resolve_placeholder(tag, name),
                    required: field.required,
                    options: field.options.clone(),
                    error_id: field_error_id(name),
                    value,
                    rendered,
                }
            })
            .collect()
    }

    /// Validate and submit the active value set.
    ///
    /// Validation failure returns [`SubmitOutcome::Invalid`] with per-field
    /// errors recorded and the form back in editing. A rejected handler
    /// surfaces as [`FormError::Mutation`], also back in editing with values
    /// untouched. Success hands the payload to the handler verbatim and ends
    /// in the submitted phase.
    pub async fn submit<H: SubmitHandler + ?Sized>(
        &mut self,
        handler: &H,
    ) -> Result<SubmitOutcome, FormError> {
        self.ensure_editing()?;

        let Some(metadata) = self.active_metadata().cloned() else {
            // union form with nothing selected: the discriminator is the error
            if let FormShape::Union(map) = &self.shape {
                let error = FieldError::new(map.discriminator(), "select a variant");
                warn!(discriminator = map.discriminator(), "submit without a selected variant");
                self.state.errors = vec![error];
            }
            return Ok(SubmitOutcome::Invalid);
        };

        self.state.phase = FormPhase::Submitting;
        let errors = validate_values(&metadata, &self.state.values);
        if !errors.is_empty() {
            warn!(errors = errors.len(), "submit failed validation");
            self.state.errors = errors;
            self.state.phase = FormPhase::Editing;
            return Ok(SubmitOutcome::Invalid);
        }

        let payload = self.payload(&metadata);
        match handler.submit(payload).await {
            Ok(()) => {
                self.state.errors.clear();
                self.state.phase = FormPhase::Submitted;
                Ok(SubmitOutcome::Submitted)
            }
            Err(error) => {
                warn!(error = %error, "submit handler rejected the values");
                self.state.phase = FormPhase::Editing;
                Err(FormError::Mutation(error))
            }
        }
    }

    /// Full current value set for submission: discriminator (unions) plus
    /// every active field with a value, hidden-but-defaulted fields included,
    /// retained inactive values excluded.
    fn payload(&self, metadata: &FieldMetadata) -> Map<String, Value> {
        let mut payload = Map::new();

        if let (FormShape::Union(map), Some(tag)) = (&self.shape, &self.state.selected_variant) {
            payload.insert(map.discriminator().to_string(), tag.as_value());
        }

        for name in metadata.names() {
            if let Some(value) = self.state.values.get(name) {
                payload.insert(name.to_string(), value.clone());
            }
        }

        payload
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        if self.state.phase == FormPhase::Editing {
            Ok(())
        } else {
            Err(FormError::NotEditing(self.state.phase))
        }
    }

    /// Defaults declared on the schema itself. For unions this is the union
    /// of all variants' defaults; the first declaration wins on overlap.
    fn schema_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        let mut collect = |metadata: &FieldMetadata| {
            for (name, field) in metadata.iter() {
                if let Some(value) = &field.default {
                    if !defaults.contains_key(name) {
                        defaults.insert(name.to_string(), value.clone());
                    }
                }
            }
        };

        match &self.shape {
            FormShape::Object(metadata) => collect(metadata),
            FormShape::Union(map) => {
                for (_, metadata) in map.variants() {
                    collect(metadata);
                }
            }
        }

        defaults
    }
}
