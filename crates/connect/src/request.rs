//! Transport-independent view of an incoming request.
//!
//! The view is a JSON object with the fields `method`, `path`, `params`, `query`, `headers`
//! and `body`. Argument mappings address it with dotted paths (`params.id`, `body.items[0]`);
//! lookups never fail, a missing segment simply resolves to nothing.

use serde_json::map::Entry;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestView {
    root: Value,
}

impl RequestView {
    /// Wrap an arbitrary JSON value. Mostly useful for tests and non-HTTP callers.
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn builder() -> RequestViewBuilder {
        RequestViewBuilder::default()
    }

    /// Look up a dotted path.
    ///
    /// Segments index objects by key and arrays by position (`items.0` or `items[0]`).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        segments(path).try_fold(&self.root, |node, segment| match node {
            Value::Object(fields) => fields.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.root.get("method").and_then(Value::as_str)
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.root.get("path").and_then(Value::as_str)
    }
}

/// Split `a.b[0][1].c` into `a`, `b`, `0`, `1`, `c`.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').flat_map(|part| {
        let bracketed = part.contains('[');
        part.split(['[', ']'])
            .enumerate()
            .filter(move |(i, s)| !s.is_empty() || (*i == 0 && !bracketed))
            .map(|(_, s)| s)
    })
}

#[derive(Debug, Default)]
pub struct RequestViewBuilder {
    method: String,
    path: String,
    params: Map<String, Value>,
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Value,
}

impl RequestViewBuilder {
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Add a query pair. Repeated keys collect into an array.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        append(&mut self.query, name.into(), value.into());
        self
    }

    /// Add a header. Names are lowercased; repeated headers collect into an array.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        append(
            &mut self.headers,
            name.as_ref().to_ascii_lowercase(),
            value.into(),
        );
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn build(self) -> RequestView {
        let mut root = Map::new();
        root.insert("method".to_string(), Value::String(self.method));
        root.insert("path".to_string(), Value::String(self.path));
        root.insert("params".to_string(), Value::Object(self.params));
        root.insert("query".to_string(), Value::Object(self.query));
        root.insert("headers".to_string(), Value::Object(self.headers));
        root.insert("body".to_string(), self.body);
        RequestView::new(Value::Object(root))
    }
}

/// Insert `value` under `key`, turning repeated keys into an array of values.
pub(crate) fn append(fields: &mut Map<String, Value>, key: String, value: String) {
    match fields.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(Value::String(value));
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) => items.push(Value::String(value)),
            existing => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        },
    }
}
