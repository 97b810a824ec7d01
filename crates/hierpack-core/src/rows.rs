//! Conversion of generic tabular records into [`Row`]s.
//!
//! Hosts hand over records keyed by column name; a [`ColumnMapping`] says which column holds the
//! weight, the optional descriptive name and each hierarchy level.

use crate::hierarchy::{MAX_LEVELS, Row};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub weight: String,
    #[serde(default)]
    pub descriptive_name: Option<String>,
    pub levels: Vec<String>,
}

impl ColumnMapping {
    pub fn validate(&self) -> Result<()> {
        if self.levels.len() > MAX_LEVELS {
            return Err(Error::TooManyLevelColumns {
                count: self.levels.len(),
                max: MAX_LEVELS,
            });
        }
        Ok(())
    }

    pub fn row_from_record(&self, record: &Map<String, Value>) -> Row {
        Row {
            weight: record.get(&self.weight).and_then(weight_value),
            descriptive_name: self
                .descriptive_name
                .as_deref()
                .and_then(|col| record.get(col))
                .and_then(cell_text),
            levels: self
                .levels
                .iter()
                .map(|col| record.get(col).and_then(cell_text))
                .collect(),
        }
    }
}

/// Applies `mapping` to every record. Non-object records become rows with no levels.
pub fn rows_from_records(records: &[Value], mapping: &ColumnMapping) -> Result<Vec<Row>> {
    mapping.validate()?;
    let empty = Map::new();
    Ok(records
        .iter()
        .map(|record| mapping.row_from_record(record.as_object().unwrap_or(&empty)))
        .collect())
}

/// Parses a JSON array of records and applies `mapping`.
pub fn rows_from_json_records(text: &str, mapping: &ColumnMapping) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(records) = value else {
        return Err(Error::NotARecordArray {
            found: json_kind(&value),
        });
    };
    rows_from_records(&records, mapping)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn weight_value(v: &Value) -> Option<f64> {
    let w = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    w.is_finite().then_some(w)
}

fn cell_text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.trim().is_empty() { None } else { Some(s) }
}
