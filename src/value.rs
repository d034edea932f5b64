use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Insertion-ordered object node.
pub type Map = IndexMap<String, Value>;

/// Opaque binary leaf, e.g. an uploaded file. Never subject to the
/// empty-string filter and serialized by name only.
#[derive(Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A raw entry value as collected from a form or flat mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Text(String),
    File(FileRef),
    Null,
}

impl RawValue {
    /// The canonical "skip empty" rule: only strings that are empty after
    /// trimming surrounding whitespace are filtered.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, RawValue::Text(text) if text.trim().is_empty())
    }

    pub fn into_value(self) -> Value {
        match self {
            RawValue::Text(text) => Value::Text(text),
            RawValue::File(file) => Value::File(file),
            RawValue::Null => Value::Null,
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        RawValue::Text(text)
    }
}

impl From<Option<String>> for RawValue {
    fn from(text: Option<String>) -> Self {
        match text {
            Some(text) => RawValue::Text(text),
            None => RawValue::Null,
        }
    }
}

impl From<FileRef> for RawValue {
    fn from(file: FileRef) -> Self {
        RawValue::File(file)
    }
}

/// A node in a nested value tree: primitive leaf, array, or object.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    File(FileRef),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Value::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::File(_) => "file",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Empty-after-trim strings are the only leaves considered empty.
pub(crate) fn is_empty_text(value: &Value) -> bool {
    matches!(value, Value::Text(text) if text.trim().is_empty())
}

/// An object none of whose properties carries a usable value. Non-objects
/// are never removable containers.
pub(crate) fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .values()
            .all(|value| value.is_null() || is_empty_text(value)),
        _ => false,
    }
}

/// Promote a numeric-keyed object into a contiguous array: numeric keys in
/// ascending order, values preserved, non-numeric keys dropped.
pub(crate) fn to_list(map: Map) -> Vec<Value> {
    let mut entries: Vec<(usize, Value)> = map
        .into_iter()
        .filter_map(|(key, value)| key.parse::<usize>().ok().map(|index| (index, value)))
        .collect();
    entries.sort_by_key(|(index, _)| *index);
    entries.into_iter().map(|(_, value)| value).collect()
}

/// Demote an array into an object keyed by decimal index.
pub(crate) fn to_object(items: Vec<Value>) -> Map {
    let mut buffer = itoa::Buffer::new();
    let mut map = Map::with_capacity(items.len());
    for (index, value) in items.into_iter().enumerate() {
        map.insert(buffer.format(index).to_string(), value);
    }
    map
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Text(text) => serializer.serialize_str(text),
            Value::File(file) => serializer.serialize_str(&file.name),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Text(text) => serde_json::Value::String(text),
            Value::File(file) => serde_json::Value::String(file.name),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (key, value) in map {
                    out.insert(key, value.into());
                }
                serde_json::Value::Object(out)
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}
