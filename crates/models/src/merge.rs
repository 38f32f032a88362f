//! Shallow merge used by PATCH.
//!
//! Each top-level key of the patch replaces the record's key wholesale;
//! nested objects are not merged. `id` is never overwritten.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

pub fn shallow_merge<T>(record: &T, patch: &Map<String, Value>) -> Result<T, ModelError>
where
    T: Serialize + DeserializeOwned,
{
    let mut fields = match serde_json::to_value(record).map_err(|e| ModelError::Encode(e.to_string()))? {
        Value::Object(map) => map,
        other => return Err(ModelError::Encode(format!("record is not an object: {other}"))),
    };
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        fields.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(fields)).map_err(|e| ModelError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Rec {
        id: u64,
        name: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    fn patch(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn overwrites_given_keys_and_keeps_the_rest() {
        let rec = Rec { id: 1, name: "a".into(), extra: patch(json!({"tags": ["x"]})) };
        let out = shallow_merge(&rec, &patch(json!({"name": "b"}))).unwrap();
        assert_eq!(out.name, "b");
        assert_eq!(out.extra["tags"], json!(["x"]));
    }

    #[test]
    fn nested_objects_are_replaced_not_merged() {
        let rec = Rec { id: 1, name: "a".into(), extra: patch(json!({"meta": {"a": 1, "b": 2}})) };
        let out = shallow_merge(&rec, &patch(json!({"meta": {"c": 3}}))).unwrap();
        assert_eq!(out.extra["meta"], json!({"c": 3}));
    }

    #[test]
    fn id_is_immutable() {
        let rec = Rec { id: 1, name: "a".into(), extra: Map::new() };
        let out = shallow_merge(&rec, &patch(json!({"id": 99}))).unwrap();
        assert_eq!(out.id, 1);
    }

    #[test]
    fn type_mismatch_is_a_validation_error() {
        let rec = Rec { id: 1, name: "a".into(), extra: Map::new() };
        let err = shallow_merge(&rec, &patch(json!({"name": 5}))).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }
}
