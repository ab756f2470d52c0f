//! Conversion between raw fetched files and structured entities.
//!
//! Decoding strips the transfer encoding, parses the content as JSON and
//! injects the entity id from the file's path. Encoding produces
//! pretty-printed JSON so that commit diffs stay human-readable.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

use crate::core::{Entity, FileRecord, Result, StoreError, TransferEncoding};

/// Decode a fetched file into an entity.
///
/// The entity id is always taken from the file's path; an `id` field stored
/// inside the content is overwritten and never trusted.
pub fn decode_entity(file: &FileRecord) -> Result<Entity> {
    let raw = match file.encoding {
        TransferEncoding::Base64 => {
            // The store wraps base64 payloads in newlines
            let compact: String = file.content.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64.decode(compact.as_bytes())?
        }
        TransferEncoding::Text => file.content.clone().into_bytes(),
    };

    let value: Value = serde_json::from_slice(&raw)?;
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(StoreError::Decode(format!(
                "entity file {} is not a JSON object: {}",
                file.path, other
            )))
        }
    };

    fields.insert("id".to_string(), Value::String(file.path.clone()));
    Ok(fields)
}

/// Serialize an entity to the text stored in the repository
pub fn encode_entity(entity: &Entity) -> Result<String> {
    Ok(serde_json::to_string_pretty(entity)?)
}

/// Recursively rename snake_case keys to camelCase.
///
/// Applied to records of the specialized read-only collections, whose
/// upstream payloads use snake_case field names the UI does not expect.
pub fn camel_case_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (camel_case(&key), camel_case_value(value)))
        .collect()
}

fn camel_case_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camel_case_keys(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(camel_case_value).collect()),
        other => other,
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn record(path: &str, content: &str, encoding: TransferEncoding) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
            encoding,
            blob_id: None,
            last_commit_id: None,
        }
    }

    #[test]
    fn decodes_base64_content() {
        let file = record(
            "data/users/u1.json",
            &BASE64.encode(b"{\"name\": \"ada\", \"active\": true}"),
            TransferEncoding::Base64,
        );

        let entity = decode_entity(&file).unwrap();
        assert_eq!(entity["name"], json!("ada"));
        assert_eq!(entity["active"], json!(true));
        assert_eq!(entity["id"], json!("data/users/u1.json"));
    }

    #[test]
    fn decodes_base64_wrapped_in_newlines() {
        let encoded = BASE64.encode(b"{\"name\": \"ada\"}");
        let wrapped = format!("{}\n{}\n", &encoded[..8], &encoded[8..]);
        let file = record("data/users/u1.json", &wrapped, TransferEncoding::Base64);

        let entity = decode_entity(&file).unwrap();
        assert_eq!(entity["name"], json!("ada"));
    }

    #[test]
    fn stored_id_is_never_trusted() {
        let file = record(
            "data/users/u1.json",
            "{\"id\": \"spoofed\", \"name\": \"ada\"}",
            TransferEncoding::Text,
        );

        let entity = decode_entity(&file).unwrap();
        assert_eq!(entity["id"], json!("data/users/u1.json"));
    }

    #[test]
    fn round_trip_forces_id_from_path() {
        let mut entity = Entity::new();
        entity.insert("id".to_string(), json!("data/users/abc"));
        entity.insert("name".to_string(), json!("ada"));
        entity.insert("active".to_string(), json!(false));

        let file = record(
            "data/users/abc",
            &encode_entity(&entity).unwrap(),
            TransferEncoding::Text,
        );
        assert_eq!(decode_entity(&file).unwrap(), entity);
    }

    #[test]
    fn encoded_entities_are_pretty_printed() {
        let mut entity = Entity::new();
        entity.insert("name".to_string(), json!("ada"));

        let text = encode_entity(&entity).unwrap();
        assert_eq!(text, "{\n  \"name\": \"ada\"\n}");
    }

    #[rstest]
    #[case("not json at all")]
    #[case("[1, 2, 3]")]
    #[case("\"bare string\"")]
    fn malformed_or_non_object_content_fails(#[case] content: &str) {
        let file = record("data/users/u1.json", content, TransferEncoding::Text);
        assert!(matches!(
            decode_entity(&file),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn invalid_base64_fails() {
        let file = record("data/users/u1.json", "%%%", TransferEncoding::Base64);
        assert!(matches!(decode_entity(&file), Err(StoreError::Decode(_))));
    }

    #[rstest]
    #[case("web_url", "webUrl")]
    #[case("created_at", "createdAt")]
    #[case("yaml_errors", "yamlErrors")]
    #[case("id", "id")]
    #[case("sha", "sha")]
    fn camel_cases_keys(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_case(input), expected);
    }

    #[test]
    fn camel_cases_nested_objects_and_arrays() {
        let record = json!({
            "web_url": "https://example.org",
            "user": { "avatar_url": "a", "id": 7 },
            "parent_ids": [ { "short_id": "x" } ],
        });
        let Value::Object(map) = record else { unreachable!() };

        let out = Value::Object(camel_case_keys(map));
        assert_eq!(
            out,
            json!({
                "webUrl": "https://example.org",
                "user": { "avatarUrl": "a", "id": 7 },
                "parentIds": [ { "shortId": "x" } ],
            })
        );
    }
}
