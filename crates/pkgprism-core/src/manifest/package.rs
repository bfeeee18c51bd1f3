//! `package.json` shape.
//!
//! Only the fields the exporter reports on are modeled; everything else in the
//! document is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Which dependency map an entry was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyClass {
    /// `dependencies`
    Regular,
    /// `devDependencies`
    Dev,
}

impl DependencyClass {
    /// Label value used for `package_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyClass::Regular => "dep",
            DependencyClass::Dev => "dev-dep",
        }
    }
}

/// npm accepts either `"Name <mail> (url)"` or a person object. Anything else
/// is kept as raw JSON rather than failing the whole manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Text(String),
    Person {
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    Other(serde_json::Value),
}

impl Author {
    pub fn name(&self) -> Option<&str> {
        match self {
            Author::Text(s) => Some(s.as_str()),
            Author::Person { name, .. } => Some(name.as_str()),
            Author::Other(_) => None,
        }
    }
}

/// Non-string values in metadata fields are dropped.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// SPDX string, or the legacy `{"type": "MIT", "url": ...}` object.
fn license_field<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Object(o)) => o.get("type").and_then(Value::as_str).map(str::to_string),
        _ => None,
    })
}

/// `null` reads as an empty map.
fn nullable_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(Option::<BTreeMap<String, String>>::deserialize(d)?.unwrap_or_default())
}

/// Parsed primary manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "license_field")]
    pub license: Option<String>,
    /// name -> declared version range
    #[serde(default, deserialize_with = "nullable_map")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies", deserialize_with = "nullable_map")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Number of declared entries across both maps (duplicates counted twice).
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }

    /// All declared entries as `(class, name, range)`, dev dependencies first.
    pub fn declared(&self) -> impl Iterator<Item = (DependencyClass, &str, &str)> + '_ {
        let dev = self
            .dev_dependencies
            .iter()
            .map(|(n, r)| (DependencyClass::Dev, n.as_str(), r.as_str()));
        let regular = self
            .dependencies
            .iter()
            .map(|(n, r)| (DependencyClass::Regular, n.as_str(), r.as_str()));
        dev.chain(regular)
    }
}
