use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// i18n text descriptor used by form and question display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct I18nText {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<BTreeMap<String, Value>>,
}

impl I18nText {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: None,
        }
    }

    /// Adds a `{name}` placeholder value used during interpolation.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Flat key -> text map for a single language.
pub type Catalog = BTreeMap<String, String>;

pub fn parse_catalog(raw: &str) -> Result<Catalog, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Resolves `text` against `catalog`, falling back to the key itself.
pub fn resolve(catalog: &Catalog, text: &I18nText) -> String {
    let Some(base) = catalog.get(&text.key) else {
        return text.key.clone();
    };
    interpolate_args(base, text.args.as_ref())
}

fn interpolate_args(template: &str, args: Option<&BTreeMap<String, Value>>) -> String {
    let Some(args) = args else {
        return template.to_string();
    };
    let mut output = template.to_string();
    for (name, value) in args {
        let token = format!("{{{}}}", name);
        let value_text = match value {
            Value::String(v) => v.clone(),
            _ => value.to_string(),
        };
        output = output.replace(&token, &value_text);
    }
    output
}
