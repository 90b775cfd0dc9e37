use serde_json::Value;

use crate::{
    Result, SkyfetchError,
    pipeline::fetch::{ContentKind, Payload},
};

/// Delimiter written after every extracted DONKI-style record.
pub const RECORD_DELIMITER: &str = "\n------\n";

/// How a successful response becomes artifact content. Fixed per connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformMode {
    /// Raw bytes, unmodified.
    Binary,
    /// Raw response text, verbatim.
    Text,
    /// JSON re-encoded as a YAML document.
    Yaml,
    /// One field pulled out of every record, concatenated as delimited text.
    Extract(FieldExtraction),
}

/// Field-extraction-concatenation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExtraction {
    /// Field read from every record.
    pub field: String,
    /// Written after every extracted value.
    pub delimiter: String,
    /// Written before every extracted value.
    pub prefix: String,
    /// Set when records live inside named groups rather than a top-level array.
    pub grouping: Option<Grouping>,
}

/// Layout of a payload shaped `{groups_key: {label: {records_key: [records]}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    pub groups_key: String,
    pub records_key: String,
}

impl FieldExtraction {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            delimiter: RECORD_DELIMITER.to_string(),
            prefix: String::new(),
            grouping: None,
        }
    }

    pub fn delimiter(
        mut self,
        delimiter: &str,
    ) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    pub fn prefix(
        mut self,
        prefix: &str,
    ) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn grouped(
        mut self,
        groups_key: &str,
        records_key: &str,
    ) -> Self {
        self.grouping = Some(Grouping {
            groups_key: groups_key.to_string(),
            records_key: records_key.to_string(),
        });
        self
    }

    fn extract(
        &self,
        payload: &Value,
    ) -> std::result::Result<String, String> {
        let mut out = String::new();
        match &self.grouping {
            None => {
                let records = payload.as_array().ok_or_else(|| format!("expected a list of records, got {}", kind_of(payload)))?;
                self.write_records(&mut out, records);
            }
            Some(grouping) => {
                let groups = payload
                    .get(&grouping.groups_key)
                    .and_then(Value::as_object)
                    .ok_or_else(|| format!("expected '{}' to be a mapping of groups", grouping.groups_key))?;

                for (label, group) in groups {
                    let Some(group) = group.as_object() else {
                        continue;
                    };
                    out.push_str(label);
                    out.push('\n');
                    if let Some(records) = group.get(&grouping.records_key).and_then(Value::as_array) {
                        self.write_records(&mut out, records);
                    }
                }
            }
        }
        Ok(out)
    }

    fn write_records(
        &self,
        out: &mut String,
        records: &[Value],
    ) {
        for value in records.iter().filter_map(|record| record.get(&self.field)) {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.push_str(&self.prefix);
            out.push_str(&rendered);
            out.push_str(&self.delimiter);
        }
    }
}

impl TransformMode {
    /// Content kind the response has to be decoded as for this mode.
    pub fn content_kind(&self) -> ContentKind {
        match self {
            TransformMode::Binary => ContentKind::Binary,
            TransformMode::Text => ContentKind::Text,
            TransformMode::Yaml | TransformMode::Extract(_) => ContentKind::Json,
        }
    }

    /// Produce artifact content from a decoded payload.
    pub fn apply(
        &self,
        payload: &Payload,
        status_code: u16,
    ) -> Result<Vec<u8>> {
        let err = |message: String| SkyfetchError::Transform {
            status_code,
            message,
        };

        match (self, payload) {
            (TransformMode::Binary, Payload::Binary(bytes)) => Ok(bytes.clone()),
            (TransformMode::Text, Payload::Text(text)) => Ok(text.clone().into_bytes()),
            (TransformMode::Yaml, Payload::Json(value)) => Ok(serde_yaml::to_string(value).map_err(|e| err(e.to_string()))?.into_bytes()),
            (TransformMode::Extract(extraction), Payload::Json(value)) => Ok(extraction.extract(value).map_err(err)?.into_bytes()),
            (mode, payload) => Err(err(format!("{:?} transform cannot handle a {} payload", mode, payload_kind(payload).as_ref()))),
        }
    }
}

fn payload_kind(payload: &Payload) -> ContentKind {
    match payload {
        Payload::Json(_) => ContentKind::Json,
        Payload::Text(_) => ContentKind::Text,
        Payload::Binary(_) => ContentKind::Binary,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_extract_skips_records_without_field() {
        let payload = Payload::Json(json!([{"messageBody": "A"}, {"messageBody": "B"}, {"other": 1}]));
        let mode = TransformMode::Extract(FieldExtraction::new("messageBody"));
        assert_eq!(text(mode.apply(&payload, 200).unwrap()), "A\n------\nB\n------\n");
    }

    #[test]
    fn test_extract_renders_non_string_values() {
        let payload = Payload::Json(json!([{"v": 3}, {"v": null}, {"v": true}]));
        let mode = TransformMode::Extract(FieldExtraction::new("v").delimiter("\n"));
        assert_eq!(text(mode.apply(&payload, 200).unwrap()), "3\ntrue\n");
    }

    #[test]
    fn test_extract_requires_list() {
        let payload = Payload::Json(json!({"messageBody": "A"}));
        let mode = TransformMode::Extract(FieldExtraction::new("messageBody"));
        let err = mode.apply(&payload, 200).unwrap_err();
        assert_eq!(
            err,
            SkyfetchError::Transform {
                status_code: 200,
                message: "expected a list of records, got a mapping".to_string(),
            }
        );
    }

    #[test]
    fn test_grouped_extraction_writes_labels() {
        let payload = Payload::Json(json!({
            "studies": {
                "GLDS-87": {
                    "study_files": [
                        {"remote_url": "/genelab/static/media/dataset/a.txt"},
                        {"file_name": "no-url"},
                        {"remote_url": "/genelab/static/media/dataset/b.txt"}
                    ]
                },
                "GLDS-88": {"study_files": "broken"},
                "GLDS-89": "broken"
            }
        }));
        let mode = TransformMode::Extract(FieldExtraction::new("remote_url").delimiter("\n").prefix("https://host").grouped("studies", "study_files"));
        assert_eq!(
            text(mode.apply(&payload, 200).unwrap()),
            "GLDS-87\nhttps://host/genelab/static/media/dataset/a.txt\nhttps://host/genelab/static/media/dataset/b.txt\nGLDS-88\n"
        );
    }

    #[test]
    fn test_grouped_extraction_requires_groups() {
        let payload = Payload::Json(json!({"hits": []}));
        let mode = TransformMode::Extract(FieldExtraction::new("remote_url").grouped("studies", "study_files"));
        assert!(matches!(mode.apply(&payload, 200), Err(SkyfetchError::Transform { .. })));
    }

    #[test]
    fn test_yaml_keeps_every_value() {
        let value = json!({"element_count": 2, "near_earth_objects": {"2021-01-01": [{"name": "(2020 AB)", "hazardous": false}]}});
        let bytes = TransformMode::Yaml.apply(&Payload::Json(value.clone()), 200).unwrap();
        let back: Value = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_binary_passthrough() {
        let bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec();
        assert_eq!(TransformMode::Binary.apply(&Payload::Binary(bytes.clone()), 200).unwrap(), bytes);
    }

    #[test]
    fn test_text_passthrough() {
        let body = "{\"sol_keys\": []}\n";
        assert_eq!(text(TransformMode::Text.apply(&Payload::Text(body.to_string()), 200).unwrap()), body);
    }

    #[test]
    fn test_mismatched_payload() {
        let err = TransformMode::Binary.apply(&Payload::Json(json!({})), 201).unwrap_err();
        assert_eq!(err.status_code(), 201);
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(TransformMode::Yaml.content_kind(), ContentKind::Json);
        assert_eq!(TransformMode::Extract(FieldExtraction::new("x")).content_kind(), ContentKind::Json);
        assert_eq!(TransformMode::Text.content_kind(), ContentKind::Text);
        assert_eq!(TransformMode::Binary.content_kind(), ContentKind::Binary);
    }
}
