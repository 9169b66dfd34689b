//! Purpose: Dispatch JSON documents to registered concrete types by discriminator value.
//! Exports: `Decoder`.
//! Role: Core pipeline: parse, descend, classify shape, look up, construct.
//! Invariants: The registry grows only through registration; decode calls never mutate it.
//! Invariants: Array decode is fail-fast and preserves document order.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::path;
use crate::json;

type Factory<T> = Box<dyn Fn(&Value) -> Result<T, Error> + Send + Sync>;

/// Decodes polymorphic JSON into a common result type `T`.
///
/// A decoder is configured once with the name of the discriminator field and
/// a registry mapping each expected discriminator value to a concrete
/// deserializable type. Decoding inspects the field, picks the matching
/// constructor, and structurally decodes the whole document into it.
///
/// ```
/// use polydec::Decoder;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Circle { radius: f64 }
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Square { side: f64 }
///
/// #[derive(Debug, PartialEq)]
/// enum Shape { Circle(Circle), Square(Square) }
///
/// impl From<Circle> for Shape { fn from(c: Circle) -> Self { Shape::Circle(c) } }
/// impl From<Square> for Shape { fn from(s: Square) -> Self { Shape::Square(s) } }
///
/// let decoder = Decoder::<Shape>::new("type")
///     .register::<Circle>("circle")
///     .register::<Square>("square");
///
/// let shape = decoder.decode_object(br#"{"type":"circle","radius":5}"#)?;
/// assert_eq!(shape, Shape::Circle(Circle { radius: 5.0 }));
/// # Ok::<(), polydec::Error>(())
/// ```
pub struct Decoder<T> {
    field: String,
    registry: HashMap<String, Factory<T>>,
}

impl<T> Decoder<T> {
    /// Create a decoder that selects concrete types by the string value of
    /// `field`. The field name must be non-empty; a decoder built with an
    /// empty name fails every decode with `MissingDiscriminator`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            registry: HashMap::new(),
        }
    }

    /// The configured discriminator field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether a constructor is registered for `value`.
    pub fn is_registered(&self, value: &str) -> bool {
        self.registry.contains_key(value)
    }

    /// Register `C` as the concrete type for discriminator `value`.
    ///
    /// Registering the same value again replaces the earlier entry. The
    /// `T: From<C>` bound makes the upcast a compile-time guarantee, so a
    /// registered entry can never fail to produce a `T` at decode time.
    pub fn register<C>(self, value: &str) -> Self
    where
        C: DeserializeOwned + 'static,
        T: From<C> + 'static,
    {
        self.register_with(value, T::from)
    }

    /// Register `C` for discriminator `value` with an explicit adapter from
    /// the decoded `C` to `T`. Used where no `From` impl exists, e.g. boxing
    /// into a trait object: `register_with("circle", |c: Circle| Box::new(c) as _)`.
    pub fn register_with<C, F>(mut self, value: &str, adapt: F) -> Self
    where
        C: DeserializeOwned + 'static,
        F: Fn(C) -> T + Send + Sync + 'static,
        T: 'static,
    {
        tracing::debug!(discriminator = value, "register decode target");
        let factory: Factory<T> = Box::new(move |node| {
            let concrete = C::deserialize(node).map_err(|err| {
                Error::new(ErrorKind::Deserialize)
                    .with_message("JSON does not fit the registered shape")
                    .with_source(err)
            })?;
            Ok(adapt(concrete))
        });
        self.registry.insert(value.to_string(), factory);
        self
    }

    /// Decode a single polymorphic object from `raw`.
    pub fn decode_object(&self, raw: &[u8]) -> Result<T, Error> {
        let root = parse(raw)?;
        self.object_from(&root)
    }

    /// Decode a single polymorphic object found at `path` inside `raw`.
    /// An empty path decodes the document root.
    pub fn decode_object_at(&self, path: &str, raw: &[u8]) -> Result<T, Error> {
        let root = parse(raw)?;
        self.object_from(self.descend(path, &root)?)
    }

    /// Decode an array of polymorphic objects from `raw`. An empty JSON
    /// array yields an empty `Vec`.
    pub fn decode_array(&self, raw: &[u8]) -> Result<Vec<T>, Error> {
        let root = parse(raw)?;
        self.array_from(&root)
    }

    /// Decode an array of polymorphic objects found at `path` inside `raw`.
    /// An empty path decodes the document root.
    pub fn decode_array_at(&self, path: &str, raw: &[u8]) -> Result<Vec<T>, Error> {
        let root = parse(raw)?;
        self.array_from(self.descend(path, &root)?)
    }

    fn descend<'doc>(&self, path: &str, root: &'doc Value) -> Result<&'doc Value, Error> {
        if path.is_empty() {
            return Ok(root);
        }
        path::lookup(root, path).ok_or_else(|| {
            Error::new(ErrorKind::PathNotFound)
                .with_message("no node at path")
                .with_path(path)
        })
    }

    fn object_from(&self, node: &Value) -> Result<T, Error> {
        if node.is_array() {
            return Err(
                Error::new(ErrorKind::IsAnArray).with_message("expected object, found array")
            );
        }
        let value = self.discriminator_of(node)?;
        let factory = self.registry.get(value).ok_or_else(|| {
            Error::new(ErrorKind::Unregistered)
                .with_message("no type registered for discriminator")
                .with_discriminator(value)
        })?;
        tracing::trace!(discriminator = %value, "dispatch to registered type");
        factory(node).map_err(|err| err.with_discriminator(value))
    }

    fn array_from(&self, node: &Value) -> Result<Vec<T>, Error> {
        let items = node
            .as_array()
            .ok_or_else(|| Error::new(ErrorKind::NotAnArray).with_message("expected array"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.object_from(item).map_err(|err| err.with_index(index)))
            .collect()
    }

    fn discriminator_of<'doc>(&self, node: &'doc Value) -> Result<&'doc str, Error> {
        match node.get(self.field.as_str()) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value),
            Some(Value::String(_)) | None => Err(Error::new(ErrorKind::MissingDiscriminator)
                .with_message("discriminator field missing or empty")
                .with_field(self.field.as_str())),
            Some(_) => Err(Error::new(ErrorKind::MissingDiscriminator)
                .with_message("discriminator field is not a string")
                .with_field(self.field.as_str())),
        }
    }
}

impl<T> fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        registered.sort_unstable();
        f.debug_struct("Decoder")
            .field("field", &self.field)
            .field("registered", &registered)
            .finish()
    }
}

fn parse(raw: &[u8]) -> Result<Value, Error> {
    json::parse::from_slice(raw).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("input is not valid JSON")
            .with_source(err)
    })
}
