//! Declarative DTO derivation.
//!
//! An entity declares, once, how each of its properties behaves in every request/response
//! context ([`DtoContext`]) by tagging it with a [`DtoDirective`]. [`DtoBuilder`] resolves that
//! table for one context and transposes it into a [`DtoShape`]: the set of properties a request
//! must carry, may carry, or never sees.
//!
//! ```
//! use uhura_core::dto::{DtoBuilder, DtoContext, DtoDirective, DtoEntity, DtoProperty};
//!
//! struct Crew;
//!
//! impl DtoEntity for Crew {
//!     const NAME: &'static str = "Crew";
//!
//!     fn dto_properties() -> Vec<DtoProperty> {
//!         use DtoContext::*;
//!         vec![
//!             DtoProperty::new("id").include([Get]).exclude([Post]),
//!             DtoProperty::new("name").require([Post]).include([Get]),
//!             DtoProperty::with_default("rank", DtoDirective::Allow),
//!         ]
//!     }
//! }
//!
//! let shape = DtoBuilder::from::<Crew>().use_context(DtoContext::Post).build();
//! assert_eq!(shape.name(), "CrewPostDto");
//! assert_eq!(shape.required(), vec!["name"]);
//! assert_eq!(shape.allowed(), vec!["rank"]);
//! assert_eq!(shape.excluded(), vec!["id"]);
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// CONTEXTS AND DIRECTIVES
// ============================================================================

/// Available DTO subtypes/contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DtoContext {
    GetMany,
    Get,
    Post,
    Put,
    Patch,
    Nested,
}

impl DtoContext {
    pub const ALL: [DtoContext; 6] = [
        DtoContext::GetMany,
        DtoContext::Get,
        DtoContext::Post,
        DtoContext::Put,
        DtoContext::Patch,
        DtoContext::Nested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DtoContext::GetMany => "getMany",
            DtoContext::Get => "get",
            DtoContext::Post => "post",
            DtoContext::Put => "put",
            DtoContext::Patch => "patch",
            DtoContext::Nested => "nested",
        }
    }

    /// Suffix used in derived shape names, e.g. `Post` in `NotePostDto`.
    fn type_suffix(&self) -> &'static str {
        match self {
            DtoContext::GetMany => "GetMany",
            DtoContext::Get => "Get",
            DtoContext::Post => "Post",
            DtoContext::Put => "Put",
            DtoContext::Patch => "Patch",
            DtoContext::Nested => "Nested",
        }
    }
}

impl fmt::Display for DtoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifies how a property is constrained for a given context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DtoDirective {
    /// Property can be present, and will be used if present.
    Allow,
    /// Property must be present.
    Require,
    /// Property is not part of the shape. Stripped from input, omitted from output.
    Exclude,
    /// Property can be present, and will be dropped.
    Ignore,
}

impl DtoDirective {
    /// Alias of [`DtoDirective::Require`], reads better on response contexts.
    pub const INCLUDE: DtoDirective = DtoDirective::Require;
}

// ============================================================================
// PROPERTY TABLE
// ============================================================================

/// Per-context directives for one entity property.
///
/// A property with no directive for a context, and no default, is absent from that context's
/// shape entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DtoProperty {
    name: &'static str,
    default: Option<DtoDirective>,
    contexts: BTreeMap<DtoContext, DtoDirective>,
}

impl DtoProperty {
    /// A property with no default directive.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            contexts: BTreeMap::new(),
        }
    }

    /// A property using `directive` for every context without an explicit override.
    pub fn with_default(name: &'static str, directive: DtoDirective) -> Self {
        Self::new(name).directive(directive, [])
    }

    /// Map `directive` to each of `contexts`. An empty context list sets the default instead.
    ///
    /// Later calls win over earlier ones for the same context.
    pub fn directive(
        mut self,
        directive: DtoDirective,
        contexts: impl IntoIterator<Item = DtoContext>,
    ) -> Self {
        let mut any = false;
        for context in contexts {
            self.contexts.insert(context, directive);
            any = true;
        }
        if !any {
            self.default = Some(directive);
        }
        self
    }

    pub fn allow(self, contexts: impl IntoIterator<Item = DtoContext>) -> Self {
        self.directive(DtoDirective::Allow, contexts)
    }

    pub fn require(self, contexts: impl IntoIterator<Item = DtoContext>) -> Self {
        self.directive(DtoDirective::Require, contexts)
    }

    pub fn include(self, contexts: impl IntoIterator<Item = DtoContext>) -> Self {
        self.directive(DtoDirective::INCLUDE, contexts)
    }

    pub fn exclude(self, contexts: impl IntoIterator<Item = DtoContext>) -> Self {
        self.directive(DtoDirective::Exclude, contexts)
    }

    pub fn ignore(self, contexts: impl IntoIterator<Item = DtoContext>) -> Self {
        self.directive(DtoDirective::Ignore, contexts)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The directive for `context`, falling back to the default. `None` context means
    /// "default only".
    pub fn resolve(&self, context: Option<DtoContext>) -> Option<DtoDirective> {
        context
            .and_then(|c| self.contexts.get(&c).copied())
            .or(self.default)
    }
}

/// An entity whose request/response shapes are derived from a property table.
pub trait DtoEntity {
    /// Entity name used as the prefix of derived shape names.
    const NAME: &'static str;

    /// The property table, in declaration order.
    fn dto_properties() -> Vec<DtoProperty>;
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds a [`DtoShape`] from an entity's property table.
#[derive(Clone, Debug)]
pub struct DtoBuilder {
    entity: &'static str,
    properties: Vec<DtoProperty>,
    context: Option<DtoContext>,
    config: Vec<(&'static str, DtoDirective)>,
}

impl DtoBuilder {
    /// Start a builder for `E` with an empty property→directive configuration.
    pub fn from<E: DtoEntity>() -> Self {
        Self {
            entity: E::NAME,
            properties: E::dto_properties(),
            context: None,
            config: Vec::new(),
        }
    }

    fn apply(&mut self, property: &'static str, directive: DtoDirective) {
        match self.config.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = directive,
            None => self.config.push((property, directive)),
        }
    }

    fn apply_all(mut self, directive: DtoDirective, properties: &[&'static str]) -> Self {
        for property in properties {
            self.apply(*property, directive);
        }
        self
    }

    /// Resolve every declared property for `context` (or defaults only, for `None`).
    ///
    /// Properties without a directive for the context are removed from the configuration.
    pub fn use_context(mut self, context: impl Into<Option<DtoContext>>) -> Self {
        let context = context.into();
        self.context = context;

        let resolved: Vec<_> = self
            .properties
            .iter()
            .map(|p| (p.name(), p.resolve(context)))
            .collect();

        for (name, directive) in resolved {
            match directive {
                Some(directive) => self.apply(name, directive),
                None => self.config.retain(|(n, _)| *n != name),
            }
        }
        self
    }

    /// Includes the properties, optional.
    pub fn allow(self, properties: &[&'static str]) -> Self {
        self.apply_all(DtoDirective::Allow, properties)
    }

    /// Includes the properties, required.
    pub fn require(self, properties: &[&'static str]) -> Self {
        self.apply_all(DtoDirective::Require, properties)
    }

    /// Accepts the properties but drops them.
    pub fn ignore(self, properties: &[&'static str]) -> Self {
        self.apply_all(DtoDirective::Ignore, properties)
    }

    /// Removes the properties from the shape.
    pub fn exclude(self, properties: &[&'static str]) -> Self {
        self.apply_all(DtoDirective::Exclude, properties)
    }

    /// Produce the derived shape.
    pub fn build(self) -> DtoShape {
        let suffix = self.context.map(|c| c.type_suffix()).unwrap_or("");
        let by_directive = transpose(self.config.iter().copied());

        DtoShape {
            name: format!("{}{}Dto", self.entity, suffix),
            context: self.context,
            fields: self.config,
            by_directive,
        }
    }
}

/// Invert a key→value mapping into value→keys, keeping key order within each value.
pub fn transpose<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> BTreeMap<V, Vec<K>>
where
    V: Ord,
{
    let mut out: BTreeMap<V, Vec<K>> = BTreeMap::new();
    for (key, value) in entries {
        out.entry(value).or_default().push(key);
    }
    out
}

// ============================================================================
// SHAPE
// ============================================================================

/// Errors raised when a payload does not fit a shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DtoError {
    #[error("{shape}: expected a JSON object")]
    NotAnObject { shape: String },
    #[error("{shape}: missing required properties: {}", .properties.join(", "))]
    MissingProperties {
        shape: String,
        properties: Vec<String>,
    },
}

/// A derived request/response shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DtoShape {
    name: String,
    context: Option<DtoContext>,
    fields: Vec<(&'static str, DtoDirective)>,
    by_directive: BTreeMap<DtoDirective, Vec<&'static str>>,
}

impl DtoShape {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> Option<DtoContext> {
        self.context
    }

    /// The directive a property resolved to, if it is part of the configuration at all.
    pub fn directive_of(&self, property: &str) -> Option<DtoDirective> {
        self.fields
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, d)| *d)
    }

    fn with(&self, directive: DtoDirective) -> Vec<&'static str> {
        self.by_directive
            .get(&directive)
            .cloned()
            .unwrap_or_default()
    }

    pub fn required(&self) -> Vec<&'static str> {
        self.with(DtoDirective::Require)
    }

    pub fn allowed(&self) -> Vec<&'static str> {
        self.with(DtoDirective::Allow)
    }

    pub fn excluded(&self) -> Vec<&'static str> {
        self.with(DtoDirective::Exclude)
    }

    pub fn ignored(&self) -> Vec<&'static str> {
        self.with(DtoDirective::Ignore)
    }

    /// Visible properties (allowed or required) in declaration order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|(_, d)| matches!(d, DtoDirective::Allow | DtoDirective::Require))
            .map(|(name, _)| *name)
            .collect()
    }

    fn is_visible(&self, property: &str) -> bool {
        matches!(
            self.directive_of(property),
            Some(DtoDirective::Allow | DtoDirective::Require)
        )
    }

    /// Check an incoming payload against the shape.
    ///
    /// Required properties must be present and non-null. Excluded, ignored and undeclared
    /// properties are dropped from the returned object.
    ///
    /// # Errors
    ///
    /// Returns `DtoError::NotAnObject` for non-object payloads and
    /// `DtoError::MissingProperties` listing every absent required property.
    pub fn accept(&self, payload: Value) -> Result<Map<String, Value>, DtoError> {
        let Value::Object(mut object) = payload else {
            return Err(DtoError::NotAnObject {
                shape: self.name.clone(),
            });
        };

        let missing: Vec<String> = self
            .required()
            .into_iter()
            .filter(|p| object.get(*p).map_or(true, Value::is_null))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DtoError::MissingProperties {
                shape: self.name.clone(),
                properties: missing,
            });
        }

        object.retain(|key, _| self.is_visible(key));
        Ok(object)
    }

    /// Restrict an outgoing value to the visible properties. Arrays are projected element-wise;
    /// scalars pass through untouched.
    pub fn project(&self, value: Value) -> Value {
        match value {
            Value::Object(mut object) => {
                object.retain(|key, _| self.is_visible(key));
                Value::Object(object)
            }
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.project(v)).collect())
            }
            other => other,
        }
    }
}
