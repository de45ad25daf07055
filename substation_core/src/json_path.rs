// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dotted JSON Path Resolution
//!
//! Implements the capsule's path syntax: dotted segments (`a.b.c`), numeric
//! segments index arrays, and the segment `-1` means "append" when used as
//! the last segment of a `set` target. `get` on a missing path returns
//! `serde_json::Value::Null` rather than an error; `set` on a non-existent
//! parent creates intermediate objects (or arrays, for numeric/`-1`
//! segments).

use serde_json::Value;

/// Splits a dotted path into its segments. An empty path has zero segments
/// and refers to the whole value.
fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

/// Reads the value at `path` within `root`. Missing intermediate segments
/// (or a type mismatch along the way) resolve to `Value::Null`, never an
/// error — this matches the "missing keys return empty, not an error"
/// boundary behavior from the specification's testable properties.
pub fn get<'a>(root: &'a Value, path: &str) -> &'a Value {
    static NULL: Value = Value::Null;

    let mut current = root;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment).unwrap_or(&NULL),
            Value::Array(items) => match segment.parse::<usize>() {
                Ok(index) => items.get(index).unwrap_or(&NULL),
                Err(_) => &NULL,
            },
            _ => &NULL,
        };
        if current.is_null() {
            return &NULL;
        }
    }
    current
}

/// Writes `value` at `path` within `root`, creating intermediate objects (or
/// arrays, when a segment is numeric or `-1`) as needed. The final segment
/// `-1` appends `value` to the array found (or created) at the parent path.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let segs = segments(path);
    if segs.is_empty() {
        *root = value;
        return;
    }
    set_segments(root, &segs, value);
}

fn set_segments(current: &mut Value, segs: &[&str], value: Value) {
    let (head, rest) = (segs[0], &segs[1..]);

    if rest.is_empty() {
        write_leaf(current, head, value);
        return;
    }

    let child = ensure_container(current, head, rest[0]);
    set_segments(child, rest, value);
}

/// Writes a single leaf segment, appending when `segment == "-1"`.
fn write_leaf(current: &mut Value, segment: &str, value: Value) {
    if segment == "-1" {
        let array = ensure_array(current);
        array.push(value);
        return;
    }

    if let Ok(index) = segment.parse::<usize>() {
        let array = ensure_array(current);
        if index < array.len() {
            array[index] = value;
        } else {
            array.resize(index, Value::Null);
            array.push(value);
        }
        return;
    }

    let object = ensure_object(current);
    object.insert(segment.to_string(), value);
}

/// Ensures `current` has a child container reachable via `segment`, sized
/// appropriately for the shape implied by the *next* segment (`next`),
/// returning a mutable reference to that child.
fn ensure_container<'a>(current: &'a mut Value, segment: &str, next: &str) -> &'a mut Value {
    let next_is_array_index = next == "-1" || next.parse::<usize>().is_ok();

    if segment == "-1" {
        let array = ensure_array(current);
        array.push(if next_is_array_index { Value::Array(vec![]) } else { Value::Object(Default::default()) });
        let last = array.len() - 1;
        return &mut array[last];
    }

    if let Ok(index) = segment.parse::<usize>() {
        let array = ensure_array(current);
        if index >= array.len() {
            array.resize(index + 1, Value::Null);
        }
        if array[index].is_null() {
            array[index] = if next_is_array_index { Value::Array(vec![]) } else { Value::Object(Default::default()) };
        }
        return &mut array[index];
    }

    let object = ensure_object(current);
    object
        .entry(segment.to_string())
        .or_insert_with(|| if next_is_array_index { Value::Array(vec![]) } else { Value::Object(Default::default()) })
}

fn ensure_array(current: &mut Value) -> &mut Vec<Value> {
    if !current.is_array() {
        *current = Value::Array(vec![]);
    }
    current.as_array_mut().expect("just coerced to array")
}

fn ensure_object(current: &mut Value) -> &mut serde_json::Map<String, Value> {
    if !current.is_object() {
        *current = Value::Object(Default::default());
    }
    current.as_object_mut().expect("just coerced to object")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_whole_value_on_empty_path() {
        let root = json!({"a": 1});
        assert_eq!(get(&root, ""), &root);
    }

    #[test]
    fn get_nested_field() {
        let root = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get(&root, "a.b.c"), &json!(42));
    }

    #[test]
    fn get_missing_path_is_null_not_error() {
        let root = json!({"a": 1});
        assert_eq!(get(&root, "a.b.c"), &Value::Null);
        assert_eq!(get(&root, "missing"), &Value::Null);
    }

    #[test]
    fn get_array_index() {
        let root = json!({"a": [10, 20, 30]});
        assert_eq!(get(&root, "a.1"), &json!(20));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut root = json!({});
        set(&mut root, "a.b.c", json!(7));
        assert_eq!(root, json!({"a": {"b": {"c": 7}}}));
    }

    #[test]
    fn set_append_to_array() {
        let mut root = json!({"output": []});
        set(&mut root, "output.-1", json!("foo"));
        set(&mut root, "output.-1", json!("bar"));
        assert_eq!(root, json!({"output": ["foo", "bar"]}));
    }

    #[test]
    fn set_append_creates_array_when_missing() {
        let mut root = json!({});
        set(&mut root, "output.-1", json!("foo"));
        assert_eq!(root, json!({"output": ["foo"]}));
    }

    #[test]
    fn set_whole_value_on_empty_path() {
        let mut root = json!({"a": 1});
        set(&mut root, "", json!({"b": 2}));
        assert_eq!(root, json!({"b": 2}));
    }

    #[test]
    fn set_nested_append() {
        let mut root = json!({});
        set(&mut root, "foo.output.-1", json!("x"));
        assert_eq!(root, json!({"foo": {"output": ["x"]}}));
    }
}
