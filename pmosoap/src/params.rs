//! Paramètres d'appel SOAP

use std::collections::{BTreeMap, btree_map};

use serde::Serialize;
use serde_json::Value;

use crate::SoapError;

/// Paramètres nommés d'une opération.
///
/// Les clés sont triées, ce qui rend l'enveloppe produite reproductible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Convertit une structure typée en paramètres.
    ///
    /// La structure doit se sérialiser en objet plat : les chaînes sont
    /// reprises telles quelles, les nombres et booléens via leur forme texte,
    /// les champs `null` sont omis. Tableaux et objets imbriqués sont refusés.
    ///
    /// ```
    /// use pmosoap::Params;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct GetUser {
    ///     id: u32,
    ///     verbose: bool,
    /// }
    ///
    /// let params = Params::from_serializable(&GetUser { id: 42, verbose: true }).unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    /// assert_eq!(params.get("verbose"), Some("true"));
    /// ```
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, SoapError> {
        let value =
            serde_json::to_value(value).map_err(|e| SoapError::InvalidParams(e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(SoapError::InvalidParams(
                "parameters must serialize to a flat structure".to_string(),
            ));
        };

        let mut params = Params::new();
        for (name, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(SoapError::InvalidParams(format!(
                        "parameter '{name}' is not a scalar value"
                    )));
                }
            };
            params.insert(name, text);
        }
        Ok(params)
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
