//! Argument mapping: how a controller's positional arguments are pulled out of a request.

use crate::error::ConfigurationError;
use crate::request::RequestView;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Extractor function: request in, positional arguments out.
pub type Extractor = Arc<dyn Fn(&RequestView) -> Vec<Value> + Send + Sync>;

/// How to derive a controller's arguments from a request.
#[derive(Clone)]
pub enum MapRequestToArgs {
    /// One dotted path, one argument.
    Path(String),
    /// One argument per path, in order.
    Paths(Vec<String>),
    /// Arguments computed by a function; used verbatim.
    Extractor(Extractor),
}

impl MapRequestToArgs {
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    #[must_use]
    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn extractor<F>(extract: F) -> Self
    where
        F: Fn(&RequestView) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::Extractor(Arc::new(extract))
    }

    /// Resolve the argument list for `req`.
    ///
    /// Paths may be written with or without a leading `req.`. Paths that do not resolve
    /// produce `null` arguments.
    #[must_use]
    pub fn resolve(&self, req: &RequestView) -> Vec<Value> {
        match self {
            Self::Path(path) => vec![resolve_path(req, path)],
            Self::Paths(paths) => paths.iter().map(|path| resolve_path(req, path)).collect(),
            Self::Extractor(extract) => extract(req),
        }
    }
}

fn resolve_path(req: &RequestView, path: &str) -> Value {
    let path = path.strip_prefix("req.").unwrap_or(path);
    req.get(path).cloned().unwrap_or(Value::Null)
}

impl fmt::Debug for MapRequestToArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Paths(paths) => f.debug_tuple("Paths").field(paths).finish(),
            Self::Extractor(_) => f.write_str("Extractor(..)"),
        }
    }
}

/// Inputs accepted as an argument mapping.
///
/// Statically typed inputs (paths, path lists, [`MapRequestToArgs`]) always convert.
/// Dynamic inputs (`serde_json::Value`, e.g. read from a config file, or `Option`) are checked
/// and rejected with a [`ConfigurationError`] when they have any other shape.
pub trait IntoMapping {
    /// # Errors
    ///
    /// Returns an error if the input is not a path, a list of paths, or an extractor.
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError>;
}

impl IntoMapping for MapRequestToArgs {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(self)
    }
}

impl IntoMapping for &str {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::path(self))
    }
}

impl IntoMapping for String {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::Path(self))
    }
}

impl IntoMapping for Vec<String> {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::Paths(self))
    }
}

impl IntoMapping for Vec<&str> {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::paths(self))
    }
}

impl IntoMapping for &[&str] {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::paths(self.iter().copied()))
    }
}

impl<const N: usize> IntoMapping for [&str; N] {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        Ok(MapRequestToArgs::paths(self))
    }
}

impl<T: IntoMapping> IntoMapping for Option<T> {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        self.map_or_else(|| Err(ConfigurationError::new("nothing")), T::into_mapping)
    }
}

impl IntoMapping for Value {
    fn into_mapping(self) -> Result<MapRequestToArgs, ConfigurationError> {
        match self {
            Value::String(path) => Ok(MapRequestToArgs::Path(path)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(path) => Ok(path),
                    other => Err(ConfigurationError::new(format!(
                        "a list containing {}",
                        json_kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(MapRequestToArgs::Paths),
            other => Err(ConfigurationError::new(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
