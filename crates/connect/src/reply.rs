//! Response descriptions produced by the adapter.
//!
//! The adapter never touches the transport. It produces a [`Reply`] and a boundary shim
//! writes it through a [`ResponseSink`] (see [`crate::transport`] for the axum one).

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    /// Structured value, serialized as JSON.
    Json(Value),
    /// String passed through as-is.
    Text(String),
}

/// Status code plus optional body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<ReplyBody>,
}

impl Reply {
    #[must_use]
    pub fn status_only(status: u16) -> Self {
        Self { status, body: None }
    }

    #[must_use]
    pub fn with_body(status: u16, body: ReplyBody) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Reply for a controller's return value: status only when the value is empty, otherwise
    /// the value as body (strings as text, everything else as JSON).
    #[must_use]
    pub fn from_value(status: u16, value: Value) -> Self {
        if is_empty(&value) {
            return Self::status_only(status);
        }
        match value {
            Value::String(text) => Self::with_body(status, ReplyBody::Text(text)),
            other => Self::with_body(status, ReplyBody::Json(other)),
        }
    }

    /// Write through `sink`: `send_status` for status-only replies, `status` then `send`
    /// otherwise. Exactly one write call finishes the response.
    pub fn write_to<S: ResponseSink + ?Sized>(self, sink: &mut S) {
        match self.body {
            None => sink.send_status(self.status),
            Some(body) => {
                sink.status(self.status);
                sink.send(body);
            }
        }
    }
}

/// Response operations a transport has to offer.
pub trait ResponseSink {
    /// Set the status without finishing the response.
    fn status(&mut self, status: u16);

    /// Finish the response with a body.
    fn send(&mut self, body: ReplyBody);

    /// Finish the response with a status and no body.
    fn send_status(&mut self, status: u16);
}

/// `null`, empty strings, empty arrays and empty objects.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub(crate) calls: Vec<String>,
        pub(crate) status: Option<u16>,
        pub(crate) body: Option<ReplyBody>,
    }

    impl ResponseSink for RecordingSink {
        fn status(&mut self, status: u16) {
            self.calls.push(format!("status({status})"));
            self.status = Some(status);
        }

        fn send(&mut self, body: ReplyBody) {
            self.calls.push("send".to_string());
            self.body = Some(body);
        }

        fn send_status(&mut self, status: u16) {
            self.calls.push(format!("send_status({status})"));
            self.status = Some(status);
        }
    }

    #[test]
    fn empty_values_reply_with_status_only() {
        for empty in [json!(null), json!(""), json!([]), json!({})] {
            assert_eq!(Reply::from_value(200, empty), Reply::status_only(200));
        }
    }

    #[test]
    fn scalars_are_not_empty() {
        assert_eq!(
            Reply::from_value(200, json!(0)),
            Reply::with_body(200, ReplyBody::Json(json!(0)))
        );
        assert_eq!(
            Reply::from_value(200, json!(false)),
            Reply::with_body(200, ReplyBody::Json(json!(false)))
        );
    }

    #[test]
    fn strings_pass_through_as_text() {
        assert_eq!(
            Reply::from_value(201, json!("created")),
            Reply::with_body(201, ReplyBody::Text("created".to_string()))
        );
    }

    #[test]
    fn status_only_reply_uses_send_status_once() {
        let mut sink = RecordingSink::default();
        Reply::status_only(204).write_to(&mut sink);
        assert_eq!(sink.calls, vec!["send_status(204)"]);
        assert_eq!(sink.body, None);
    }

    #[test]
    fn body_reply_sets_status_then_sends() {
        let mut sink = RecordingSink::default();
        Reply::from_value(200, json!({"a": 1})).write_to(&mut sink);
        assert_eq!(sink.calls, vec!["status(200)", "send"]);
        assert_eq!(sink.body, Some(ReplyBody::Json(json!({"a": 1}))));
    }
}
