use std::collections::HashMap;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;
use tracing::field::Visit;
use tracing_core::Field;

/// Field names whose values never reach the log output.
const REDACTED_FIELDS: &[&str] = &["password"];
const REDACTED: &str = "<redacted>";

pub type SerializedRecordValuesInner = HashMap<&'static str, Value>;

/// Span and event fields, keeping numbers and booleans typed in JSON output.
#[derive(Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SerializedRecordValues(SerializedRecordValuesInner);

impl SerializedRecordValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a field and renders it as plain text.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.0.remove(name).map(|value| match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }
}

impl Deref for SerializedRecordValues {
    type Target = SerializedRecordValuesInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SerializedRecordValues {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

pub struct RecordVisitor<'a> {
    values: &'a mut SerializedRecordValues,
}

impl<'a> RecordVisitor<'a> {
    pub fn new(values: &'a mut SerializedRecordValues) -> Self {
        Self { values }
    }

    fn insert<V: Into<Value>>(&mut self, field: &Field, value: V) {
        let value = if REDACTED_FIELDS.contains(&field.name()) {
            REDACTED.into()
        } else {
            value.into()
        };
        self.values.insert(field.name(), value);
    }
}

impl Visit for RecordVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.insert(field, format!("{value:?}"));
    }
}
