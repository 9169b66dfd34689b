//! Purpose: Resolve dotted sub-paths inside parsed JSON documents.
//! Exports: `lookup`.
//! Role: Navigation step run before object/array dispatch.
//! Invariants: Object steps match keys literally; array steps must parse as indices.
//! Invariants: Lookup borrows from the document and never mutates it.
//! Notes: Callers handle the empty path (whole document) before calling.

use serde_json::Value;

/// Descend `root` one dotted segment at a time: `"data.items.0"` selects the
/// first element of the `items` array under `data`. Returns `None` as soon as
/// a segment has no match.
pub fn lookup<'doc>(root: &'doc Value, path: &str) -> Option<&'doc Value> {
    let mut node = root;
    for segment in path.split('.') {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::lookup;
    use serde_json::json;

    #[test]
    fn finds_nested_object_keys() {
        let doc = json!({"data": {"inner": {"type": "circle"}}});
        let node = lookup(&doc, "data.inner").expect("node");
        assert_eq!(node, &json!({"type": "circle"}));
    }

    #[test]
    fn indexes_into_arrays() {
        let doc = json!({"items": [{"id": 1}, {"id": 2}]});
        let node = lookup(&doc, "items.1.id").expect("node");
        assert_eq!(node, &json!(2));
    }

    #[test]
    fn missing_key_is_none() {
        let doc = json!({"data": {}});
        assert!(lookup(&doc, "data.absent").is_none());
    }

    #[test]
    fn non_numeric_segment_on_array_is_none() {
        let doc = json!({"items": [1, 2, 3]});
        assert!(lookup(&doc, "items.first").is_none());
    }

    #[test]
    fn out_of_bounds_index_is_none() {
        let doc = json!({"items": [1]});
        assert!(lookup(&doc, "items.5").is_none());
    }

    #[test]
    fn descending_through_a_scalar_is_none() {
        let doc = json!({"count": 7});
        assert!(lookup(&doc, "count.value").is_none());
    }
}
