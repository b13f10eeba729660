//! Provider response envelope.
//!
//! Every command answers with the same outer shape:
//!
//! ```json
//! { "Code": "OK", "ErrorMessage": "", "DataTables": { "Results": { "Headers": {}, "Data": [] } } }
//! ```
//!
//! plus occasional top-level fields (e.g. `RecommendedIP`).

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error_handling::ProviderError;

/// Envelope `Code` of a successful command.
pub const CODE_OK: &str = "OK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(rename = "Headers", default)]
    pub headers: Value,
    #[serde(rename = "Data", default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: String,
    #[serde(rename = "DataTables", default)]
    pub data_tables: HashMap<String, DataTable>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Parses a response body.
    pub fn parse(body: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(body).map_err(|source| ProviderError::Decode {
            context: "response body".to_string(),
            source,
        })
    }

    /// Turns a non-`OK` code into [`ProviderError::Api`].
    pub fn check(self) -> Result<Self, ProviderError> {
        if self.code == CODE_OK {
            Ok(self)
        } else {
            Err(ProviderError::Api {
                code: self.code,
                message: self.error_message,
            })
        }
    }

    /// Removes a table and decodes its rows in order.
    pub fn take_rows<T: DeserializeOwned>(&mut self, table: &str) -> Result<Vec<T>, ProviderError> {
        let table_data = self
            .data_tables
            .remove(table)
            .ok_or_else(|| ProviderError::MissingTable(table.to_string()))?;
        table_data
            .data
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(row).map_err(|source| ProviderError::Decode {
                    context: format!("{table} row {index}"),
                    source,
                })
            })
            .collect()
    }

    /// Decodes a table's `Headers` object. Must be called before [`Envelope::take_rows`]
    /// removes the table.
    pub fn headers<H: DeserializeOwned + Default>(&self, table: &str) -> Result<H, ProviderError> {
        let table_data = self
            .data_tables
            .get(table)
            .ok_or_else(|| ProviderError::MissingTable(table.to_string()))?;
        if table_data.headers.is_null() {
            return Ok(H::default());
        }
        H::deserialize(&table_data.headers).map_err(|source| ProviderError::Decode {
            context: format!("{table} headers"),
            source,
        })
    }

    /// A top-level text field, empty when absent.
    pub fn field_str(&self, key: &str) -> String {
        match self.extra.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
