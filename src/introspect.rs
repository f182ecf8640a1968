//! Opt-in property reflection for opaque payload values.
//!
//! A value that wants its properties listed by the generic analyzer
//! implements [`Introspect`]. Every property read may fail independently.

use crate::error::PropertyError;
use std::fmt;

/// Descriptor of one property exposed by an [`Introspect`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Whether the property has a getter.
    pub readable: bool,
    /// Whether reading the property requires index arguments.
    pub indexed: bool,
}

impl Property {
    /// A plain readable, non-indexed property.
    pub fn readable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            indexed: false,
        }
    }

    /// A property that cannot be read.
    pub fn write_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: false,
            indexed: false,
        }
    }

    /// An indexed property (e.g. `Item[int]`).
    pub fn indexed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            indexed: true,
        }
    }
}

/// A value whose properties can be enumerated and read by name.
pub trait Introspect: fmt::Debug {
    /// Name of the concrete type, as shown in reports.
    fn type_name(&self) -> &str;

    /// Short string representation of the value.
    fn describe(&self) -> String {
        self.type_name().to_string()
    }

    /// All properties in declaration order.
    fn properties(&self) -> Vec<Property>;

    /// Read one property, rendered as a string.
    fn property(&self, name: &str) -> Result<String, PropertyError>;
}

/// Ordered property set with per-property values or failures.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    type_name: String,
    entries: Vec<(Property, Result<String, PropertyError>)>,
}

impl PropertyBag {
    /// Create an empty bag for a type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: Vec::new(),
        }
    }

    /// Add a readable property with a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((Property::readable(name), Ok(value.into())));
        self
    }

    /// Add a readable property whose getter fails.
    #[must_use]
    pub fn with_failing(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.entries.push((
            Property::readable(name),
            Err(PropertyError::new(message)),
        ));
        self
    }

    /// Add an arbitrary descriptor with its outcome.
    #[must_use]
    pub fn with_property(
        mut self,
        property: Property,
        value: Result<String, PropertyError>,
    ) -> Self {
        self.entries.push((property, value));
        self
    }
}

impl Introspect for PropertyBag {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> Vec<Property> {
        self.entries.iter().map(|(p, _)| p.clone()).collect()
    }

    fn property(&self, name: &str) -> Result<String, PropertyError> {
        self.entries
            .iter()
            .find(|(p, _)| p.name == name)
            .map_or_else(|| Err(PropertyError::missing(name)), |(_, v)| v.clone())
    }
}
