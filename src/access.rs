//! Path-based accessors over an already-built nested [`Value`].
//!
//! Unlike the builder, accessors validate their path strictly: an empty
//! path or a literal `..` raises [`Error::InvalidPath`], and a null root
//! raises [`Error::InvalidTarget`]. Those are the only failure modes.

use crate::path::{parse_path, Segment};
use crate::value::{to_list, to_object, Map, Value};
use crate::{Error, Result};

/// Read the value at `path`. `Ok(None)` when any step of the walk meets
/// a missing key, an out-of-range index, a non-container node, or when
/// the resolved value is null.
pub fn get_value<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let segments = parse_path(path)?;
    ensure_target(root)?;

    let mut node = root;
    for segment in &segments {
        match step(node, segment) {
            Some(child) => node = child,
            None => return Ok(None),
        }
    }
    Ok(if node.is_null() { None } else { Some(node) })
}

/// [`get_value`] with a caller-supplied fallback.
pub fn get_value_or<'a>(root: &'a Value, path: &str, default: &'a Value) -> Result<&'a Value> {
    Ok(get_value(root, path)?.unwrap_or(default))
}

/// True iff the value at `path` resolves to something non-null.
pub fn has_value(root: &Value, path: &str) -> Result<bool> {
    Ok(get_value(root, path)?.is_some())
}

/// Write `value` at `path`, materializing missing intermediate
/// containers on the way: an upcoming index segment creates an array
/// (padded with null holes), a name segment creates an object.
/// Containers of the wrong kind are converted in place, the same
/// promotion the builder applies. Mutates `root`.
pub fn set_value(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let segments = parse_path(path)?;
    ensure_target(root)?;

    let Some((last, walk)) = segments.split_last() else {
        return Ok(());
    };
    let mut node = root;
    for (position, segment) in walk.iter().enumerate() {
        let next_indexed = segments[position + 1].is_index();
        node = descend(node, segment, next_indexed);
    }
    assign(node, last, value);
    Ok(())
}

/// Remove the value at `path`. A missing or non-container intermediate
/// makes this a no-op, never an error. Deleting the last occupied index
/// of an array truncates it to that index; deleting an interior index
/// leaves a null hole, not a compacted array.
pub fn delete_value(root: &mut Value, path: &str) -> Result<()> {
    let segments = parse_path(path)?;
    ensure_target(root)?;

    let Some((last, walk)) = segments.split_last() else {
        return Ok(());
    };
    let mut node = root;
    for segment in walk {
        node = match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => match map.get_mut(key.as_str()) {
                Some(child) => child,
                None => return Ok(()),
            },
            (Value::Array(items), Segment::Index(index)) => match items.get_mut(*index) {
                Some(child) => child,
                None => return Ok(()),
            },
            _ => return Ok(()),
        };
    }
    match (node, last) {
        (Value::Object(map), Segment::Key(key)) => {
            map.shift_remove(key.as_str());
        }
        (Value::Array(items), Segment::Index(index)) => {
            if *index + 1 == items.len() {
                items.truncate(*index);
            } else if *index < items.len() {
                items[*index] = Value::Null;
            }
        }
        _ => {}
    }
    Ok(())
}

fn ensure_target(root: &Value) -> Result<()> {
    if root.is_null() {
        return Err(Error::InvalidTarget);
    }
    Ok(())
}

fn step<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key.as_str()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        // Numeric-keyed objects answer index segments by decimal key, so
        // not-yet-normalized trees read the same as normalized ones.
        (Value::Object(map), Segment::Index(index)) => {
            map.get(itoa::Buffer::new().format(*index))
        }
        _ => None,
    }
}

/// Align a container with the segment about to address it, converting
/// mismatched kinds through the shared promotions.
fn coerce_container(node: &mut Value, segment: &Segment) {
    match (&mut *node, segment) {
        (Value::Object(_), Segment::Key(_)) | (Value::Array(_), Segment::Index(_)) => {}
        (Value::Object(map), Segment::Index(_)) => {
            let map = std::mem::take(map);
            *node = Value::Array(to_list(map));
        }
        (Value::Array(items), Segment::Key(_)) => {
            let items = std::mem::take(items);
            *node = Value::Object(to_object(items));
        }
        _ => {
            *node = match segment {
                Segment::Index(_) => Value::Array(Vec::new()),
                Segment::Key(_) => Value::Object(Map::new()),
            };
        }
    }
}

fn descend<'a>(node: &'a mut Value, segment: &Segment, next_indexed: bool) -> &'a mut Value {
    coerce_container(node, segment);
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => {
            map.entry(key.to_string()).or_insert_with(|| {
                if next_indexed {
                    Value::Array(Vec::new())
                } else {
                    Value::Object(Map::new())
                }
            })
        }
        (Value::Array(items), Segment::Index(index)) => {
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
        _ => unreachable!("coerce_container aligned the node with the segment"),
    }
}

fn assign(node: &mut Value, segment: &Segment, value: Value) {
    coerce_container(node, segment);
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => {
            map.insert(key.to_string(), value);
        }
        (Value::Array(items), Segment::Index(index)) => {
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            items[*index] = value;
        }
        _ => unreachable!("coerce_container aligned the node with the segment"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn empty() -> Value {
        Value::Object(Map::new())
    }

    #[rstest]
    fn test_set_pads_with_null_holes() {
        let mut root = empty();
        set_value(&mut root, "tags[2]", text("c")).unwrap();
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({"tags": [null, null, "c"]})
        );
    }

    #[rstest]
    fn test_set_converts_object_to_array() {
        let mut root = empty();
        set_value(&mut root, "a.0x", text("ignored")).unwrap();
        set_value(&mut root, "a[0]", text("kept")).unwrap();
        assert_eq!(serde_json::to_value(&root).unwrap(), json!({"a": ["kept"]}));
    }

    #[rstest]
    fn test_get_reads_numeric_object_keys() {
        let mut inner = Map::new();
        inner.insert("0".to_string(), text("x"));
        let mut outer = Map::new();
        outer.insert("a".to_string(), Value::Object(inner));
        let root = Value::Object(outer);

        assert_eq!(get_value(&root, "a[0]").unwrap(), Some(&text("x")));
    }

    #[rstest]
    fn test_get_value_or_default() {
        let root = empty();
        let fallback = text("fallback");
        assert_eq!(
            get_value_or(&root, "missing.key", &fallback).unwrap(),
            &fallback
        );
    }

    #[rstest]
    fn test_delete_trims_trailing_then_keeps_holes() {
        let mut root = empty();
        set_value(&mut root, "tags[0]", text("a")).unwrap();
        set_value(&mut root, "tags[1]", text("b")).unwrap();
        set_value(&mut root, "tags[2]", text("c")).unwrap();

        delete_value(&mut root, "tags[2]").unwrap();
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({"tags": ["a", "b"]})
        );

        delete_value(&mut root, "tags[0]").unwrap();
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({"tags": [null, "b"]})
        );
    }

    #[rstest]
    fn test_delete_out_of_range_is_noop() {
        let mut root = empty();
        set_value(&mut root, "tags[0]", text("a")).unwrap();
        delete_value(&mut root, "tags[9]").unwrap();
        assert_eq!(serde_json::to_value(&root).unwrap(), json!({"tags": ["a"]}));
    }
}
