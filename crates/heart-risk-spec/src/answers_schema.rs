use serde_json::{Map, Value};

use crate::content::{ContentTables, LocalizedKind, LocalizedQuestion};
use crate::language::Language;

/// Generates the JSON schema of an answers object, with titles in `language`.
pub fn generate(tables: &ContentTables, language: Language) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for question in tables.questions(language) {
        properties.insert(question.key.clone(), question_schema(&question));
        required.push(Value::String(question.key));
    }

    let mut root = Map::new();
    root.insert("type".into(), Value::String("object".into()));
    root.insert(
        "title".into(),
        Value::String(tables.text(language, &tables.form().title)),
    );
    root.insert("properties".into(), Value::Object(properties));
    root.insert("required".into(), Value::Array(required));
    root.insert("additionalProperties".into(), Value::Bool(false));

    Value::Object(root)
}

fn question_schema(question: &LocalizedQuestion) -> Value {
    let mut schema = Map::new();
    schema.insert("title".into(), Value::String(question.label.clone()));
    match &question.kind {
        LocalizedKind::Numeric { range, .. } => {
            // Raw text is accepted and coerced during validation.
            schema.insert(
                "type".into(),
                Value::Array(vec![
                    Value::String("integer".into()),
                    Value::String("string".into()),
                ]),
            );
            schema.insert("minimum".into(), Value::Number(range.min.into()));
            schema.insert("maximum".into(), Value::Number(range.max.into()));
        }
        LocalizedKind::SingleChoice { options } => {
            // Option values may also arrive as their decimal text.
            let numbers = options
                .iter()
                .map(|option| Value::Number(option.value.into()))
                .collect();
            let texts = options
                .iter()
                .map(|option| Value::String(option.value.to_string()))
                .collect();
            schema.insert(
                "anyOf".into(),
                Value::Array(vec![
                    enum_schema("integer", numbers),
                    enum_schema("string", texts),
                ]),
            );
        }
    }
    Value::Object(schema)
}

fn enum_schema(kind: &str, values: Vec<Value>) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String(kind.into()));
    schema.insert("enum".into(), Value::Array(values));
    Value::Object(schema)
}
