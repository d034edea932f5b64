//! Flat-key normalization: turns an ordered sequence of `(key, value)`
//! pairs whose keys encode nested paths (`profile[0].name`) into one
//! nested value per root key.
//!
//! Building is deliberately permissive and never fails. Keys that mix
//! array and object usage resolve via the last-applied shape, and values
//! that are empty after trimming are skipped outright.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::path::{has_path_syntax, split_key, Segment, Segments};
use crate::value::{is_empty_container, to_list, Map, RawValue, Value};

/// Build a nested mapping from flat path-encoded entries.
///
/// Keys without any `.` or `[` are copied through unchanged, empty
/// strings included. Every other key is split into `[root, rest...]`,
/// grouped by root, and assembled into a single nested value per group.
pub fn build<I>(entries: I) -> Map
where
    I: IntoIterator<Item = (String, RawValue)>,
{
    let mut output = Map::new();
    let mut groups: Vec<FieldGroup> = Vec::new();
    let mut group_lookup: HashMap<String, usize> = HashMap::new();

    for (key, value) in entries {
        if !has_path_syntax(&key) {
            output.insert(key, value.into_value());
            continue;
        }
        let mut segments = split_key(&key);
        if segments.is_empty() {
            // Nothing but separators; the value has nowhere to go.
            continue;
        }
        let root = root_key(segments.remove(0));
        if segments.is_empty() {
            // Degenerate keys like "a." carry no rest path and behave
            // as plain fields under their root.
            output.insert(root, value.into_value());
            continue;
        }
        let slot = match group_lookup.get(&root) {
            Some(slot) => *slot,
            None => {
                group_lookup.insert(root.clone(), groups.len());
                groups.push(FieldGroup {
                    root,
                    entries: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].entries.push((segments, value));
    }

    for group in groups {
        // On a root-key collision the path-derived value wins; the map
        // keeps the key's original position.
        output.insert(group.root, build_group(group.entries));
    }
    output
}

/// Recursively normalize a nested value: objects whose keys all parse as
/// non-negative integers become dense arrays (ascending numeric order,
/// gaps closed), properties whose normalized value vanished are dropped,
/// and an object left with no properties vanishes itself (`None`).
///
/// Already-normalized trees are fixed points.
pub fn normalize(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(normalize).collect(),
        )),
        Value::Object(map) => {
            if !map.is_empty() && map.keys().all(|key| key.parse::<usize>().is_ok()) {
                let items = to_list(map).into_iter().filter_map(normalize).collect();
                return Some(Value::Array(items));
            }
            let map: Map = map
                .into_iter()
                .filter_map(|(key, value)| normalize(value).map(|value| (key, value)))
                .collect();
            if map.is_empty() {
                None
            } else {
                Some(Value::Object(map))
            }
        }
        leaf => Some(leaf),
    }
}

/// Transient bucket of entries sharing one root key.
struct FieldGroup {
    root: String,
    entries: Vec<(Segments, RawValue)>,
}

fn root_key(segment: Segment) -> String {
    match segment {
        Segment::Key(name) => name.to_string(),
        Segment::Index(index) => itoa::Buffer::new().format(index).to_string(),
    }
}

fn build_group(entries: Vec<(Segments, RawValue)>) -> Value {
    // The root denotes a list only when every entry addresses it
    // numerically, skipped-empty entries included.
    let array_group = entries
        .iter()
        .all(|(segments, _)| segments.first().is_some_and(Segment::is_index));

    let mut root = Node::Object(IndexMap::new());
    for (segments, raw) in entries {
        if raw.is_empty_text() {
            continue;
        }
        insert(&mut root, &segments, raw.into_value());
    }

    match normalize_node(root) {
        Some(Value::Array(items)) if array_group => Value::Array(
            items
                .into_iter()
                .filter(|item| !is_empty_container(item))
                .collect(),
        ),
        Some(value) => value,
        // A fully filtered group still appears in the output.
        None if array_group => Value::Array(Vec::new()),
        None => Value::Object(Map::new()),
    }
}

/// Assembly node. Lists stay keyed by their original index until
/// normalization so sparse input never needs hole placeholders.
enum Node {
    Leaf(Value),
    Object(IndexMap<SmolStr, Node>),
    List(BTreeMap<usize, Node>),
}

impl Node {
    fn container(indexed: bool) -> Node {
        if indexed {
            Node::List(BTreeMap::new())
        } else {
            Node::Object(IndexMap::new())
        }
    }
}

fn insert(root: &mut Node, segments: &[Segment], value: Value) {
    let Some((last, _)) = segments.split_last() else {
        return;
    };
    let mut node = root;
    for window in segments.windows(2) {
        node = child(node, &window[0], window[1].is_index());
    }
    place(node, last, value);
}

/// Align a container with the segment about to address it. Objects hit
/// by an index promote their numeric keys to a list; lists hit by a name
/// demote to an object; leaves give way to a fresh container.
fn coerce(node: &mut Node, segment: &Segment) {
    match (&mut *node, segment) {
        (Node::Object(_), Segment::Key(_)) | (Node::List(_), Segment::Index(_)) => {}
        (Node::Object(map), Segment::Index(_)) => {
            let map = std::mem::take(map);
            *node = Node::List(object_to_list(map));
        }
        (Node::List(slots), Segment::Key(_)) => {
            let slots = std::mem::take(slots);
            *node = Node::Object(list_to_object(slots));
        }
        (Node::Leaf(_), _) => {
            *node = Node::container(segment.is_index());
        }
    }
}

fn child<'a>(node: &'a mut Node, segment: &Segment, next_indexed: bool) -> &'a mut Node {
    coerce(node, segment);
    match (node, segment) {
        (Node::Object(map), Segment::Key(key)) => map
            .entry(key.clone())
            .or_insert_with(|| Node::container(next_indexed)),
        (Node::List(slots), Segment::Index(index)) => slots
            .entry(*index)
            .or_insert_with(|| Node::container(next_indexed)),
        _ => unreachable!("coerce aligned the container with the segment"),
    }
}

fn place(node: &mut Node, segment: &Segment, value: Value) {
    coerce(node, segment);
    match (node, segment) {
        (Node::Object(map), Segment::Key(key)) => {
            map.insert(key.clone(), Node::Leaf(value));
        }
        (Node::List(slots), Segment::Index(index)) => {
            slots.insert(*index, Node::Leaf(value));
        }
        _ => unreachable!("coerce aligned the container with the segment"),
    }
}

fn object_to_list(map: IndexMap<SmolStr, Node>) -> BTreeMap<usize, Node> {
    map.into_iter()
        .filter_map(|(key, node)| key.parse::<usize>().ok().map(|index| (index, node)))
        .collect()
}

fn list_to_object(slots: BTreeMap<usize, Node>) -> IndexMap<SmolStr, Node> {
    let mut buffer = itoa::Buffer::new();
    slots
        .into_iter()
        .map(|(index, node)| (SmolStr::new(buffer.format(index)), node))
        .collect()
}

/// Bottom-up normalization of an assembly tree. Lists emit dense arrays
/// in ascending original-index order; an object whose keys turned all
/// numeric (after a list demotion) converts the same way.
fn normalize_node(node: Node) -> Option<Value> {
    match node {
        Node::Leaf(value) => Some(value),
        Node::List(slots) => {
            let items: Vec<Value> = slots.into_values().filter_map(normalize_node).collect();
            if items.is_empty() {
                None
            } else {
                Some(Value::Array(items))
            }
        }
        Node::Object(map) => {
            if !map.is_empty() && map.keys().all(|key| key.parse::<usize>().is_ok()) {
                return normalize_node(Node::List(object_to_list(map)));
            }
            let map: Map = map
                .into_iter()
                .filter_map(|(key, node)| normalize_node(node).map(|value| (key.to_string(), value)))
                .collect();
            if map.is_empty() {
                None
            } else {
                Some(Value::Object(map))
            }
        }
    }
}
