//! Keyword dictionaries for strategy coefficients.
//!
//! Strategies read their parameters key by key, the way a CFD case
//! dictionary is consumed: required keys via [`Dictionary::lookup`], optional
//! ones via [`Dictionary::lookup_or_default`] / [`Dictionary::read_if_present`].
//! The backing store is a YAML mapping.

use crate::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    name: String,
    entries: Mapping,
}

impl Dictionary {
    pub fn new(name: impl Into<String>, entries: Mapping) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn from_value(name: impl Into<String>, value: Value) -> ConfigResult<Self> {
        let name = name.into();
        match value {
            Value::Mapping(entries) => Ok(Self { name, entries }),
            Value::Null => Ok(Self {
                name,
                entries: Mapping::new(),
            }),
            _ => Err(ConfigError::NotADictionary { dict: name }),
        }
    }

    pub fn from_yaml_str(name: impl Into<String>, text: &str) -> ConfigResult<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(name, value)
    }

    /// Dotted path of this dictionary, used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn found(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Required entry.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey {
                dict: self.name.clone(),
                key: key.to_string(),
            })?;
        self.convert(key, value)
    }

    pub fn lookup_or_default<T: DeserializeOwned>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.entries.get(key) {
            Some(value) => self.convert(key, value),
            None => Ok(default),
        }
    }

    /// Overwrite `target` if `key` is present. Returns whether it was.
    pub fn read_if_present<T: DeserializeOwned>(&self, key: &str, target: &mut T) -> ConfigResult<bool> {
        match self.entries.get(key) {
            Some(value) => {
                *target = self.convert(key, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn sub_dict(&self, key: &str) -> ConfigResult<Dictionary> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey {
                dict: self.name.clone(),
                key: key.to_string(),
            })?;
        Self::from_value(self.child_name(key), value.clone())
    }

    /// The `<type_name>Coeffs` sub-dictionary, falling back to this dictionary
    /// when it is absent.
    pub fn optional_coeffs(&self, type_name: &str) -> ConfigResult<Dictionary> {
        let key = format!("{type_name}Coeffs");
        if self.found(&key) {
            self.sub_dict(&key)
        } else {
            Ok(self.clone())
        }
    }

    fn child_name(&self, key: &str) -> String {
        if self.name.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.name, key)
        }
    }

    fn convert<T: DeserializeOwned>(&self, key: &str, value: &Value) -> ConfigResult<T> {
        serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
            dict: self.name.clone(),
            key: key.to_string(),
            what: e.to_string(),
        })
    }
}
