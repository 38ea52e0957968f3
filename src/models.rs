//! Core data structures for transformer lookup.
//!
//! Defines the search index, the transformer detail record and its client
//! entries, and the lenient field value used for every scalar column.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Mapping from normalized query key to detail record identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: HashMap<String, String>,
}

impl SearchIndex {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Exact-match lookup of an already normalized key
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A scalar column value from the generated JSON.
///
/// The generator writes strings, but spreadsheet columns can leak through as
/// numbers or `null`. Missing, `null`, `false`, `""` and numeric zero are all
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValue(Option<String>);

impl FieldValue {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Text of the value, or `placeholder` when absent
    pub fn or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.0.as_deref().unwrap_or(placeholder)
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self(None),
            Value::Bool(true) => Self(Some("true".to_string())),
            Value::String(s) if s.is_empty() => Self(None),
            Value::String(s) => Self(Some(s)),
            Value::Number(n) => Self(number_text(&n)),
            other => Self(Some(other.to_string())),
        }
    }
}

/// Integral floats print without a fractional part, zero is absent
fn number_text(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return (u != 0).then(|| u.to_string());
    }
    let f = n.as_f64()?;
    if f == 0.0 || f.is_nan() {
        None
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        Some(format!("{}", f as i64))
    } else {
        Some(f.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FieldValue::from_json)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::from_json(Value::String(s.to_string()))
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(s: Option<&str>) -> Self {
        s.map(FieldValue::from).unwrap_or_default()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.or(""))
    }
}

/// One transformer's detail record as written by the data generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(rename = "CODIGO_TRANSFORMADOR", default)]
    pub code: FieldValue,
    #[serde(rename = "MATRÍCULA CT", default)]
    pub ct_registration: FieldValue,
    #[serde(rename = "MATRÍCULA_TRANSFORMADOR", default)]
    pub trafo_registration: FieldValue,
    #[serde(rename = "MATRÍCULA_CENSO", default)]
    pub census_registration: FieldValue,
    #[serde(rename = "DIRECCIÓN TRAFO", default)]
    pub address: FieldValue,
    #[serde(rename = "POTENCIA_NOMINAL", default)]
    pub rated_power: FieldValue,
    #[serde(rename = "TOTAL_CLIENTES", default)]
    pub total_clients: FieldValue,
    #[serde(rename = "LEVANTAR_STATUS", default)]
    pub status: FieldValue,
    #[serde(rename = "LATITUD", default)]
    pub latitude: FieldValue,
    #[serde(rename = "LONGITUD", default)]
    pub longitude: FieldValue,
    #[serde(rename = "MODELO", default)]
    pub model: FieldValue,
    #[serde(rename = "TIPO CT", default)]
    pub ct_type: FieldValue,
    #[serde(rename = "TIPO CONEXION", default)]
    pub connection_type: FieldValue,
    #[serde(rename = "CLIENTES", default)]
    pub clients: Option<Vec<ClientEntry>>,
}

/// A client attached to a transformer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    #[serde(rename = "NOMBRE_CLIENTE", default)]
    pub name: FieldValue,
    #[serde(rename = "MEDIDOR", default)]
    pub meter: FieldValue,
    #[serde(rename = "NIU", default)]
    pub niu: FieldValue,
    #[serde(rename = "DIRECCION_CLIENTE", default)]
    pub address: FieldValue,
    #[serde(rename = "MATRÍCULA CT", default)]
    pub ct_registration: FieldValue,
    #[serde(rename = "NIS_RAD_1", default)]
    pub nis_rad: FieldValue,
    #[serde(rename = "NIC", default)]
    pub nic: FieldValue,
}

impl ClientEntry {
    /// Cell values in client table column order
    pub fn cells(&self) -> [&FieldValue; 7] {
        [
            &self.name,
            &self.meter,
            &self.niu,
            &self.address,
            &self.ct_registration,
            &self.nis_rad,
            &self.nic,
        ]
    }
}
