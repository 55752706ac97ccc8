// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Per-script metadata declarations.
//!
//! A userscript `X.user.js` is described by the sibling data file
//! `X.meta.yaml` (`.meta.yml` and `.meta.json` are accepted as well). The
//! document is validated when loaded: `name` and `description` are required,
//! `features` lists README bullet points and every other key must be a
//! recognized metadata field with a scalar or list-of-scalars value.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};

use crate::{
    error::{self, Error},
    metadata::{MetadataField, MetadataValue},
};

/// File suffix identifying userscript entry modules.
pub const USERSCRIPT_SUFFIX: &str = ".user.js";
/// Declaration suffixes, probed in order.
pub const DECLARATION_SUFFIXES: &[&str] = &[".meta.yaml", ".meta.yml", ".meta.json"];

const FEATURES_KEY: &str = "features";

/// Validated declaration of one userscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    path:      PathBuf,
    features:  Vec<String>,
    overrides: Vec<(MetadataField, Option<MetadataValue>)>
}

impl Declaration {
    /// Loads the declaration belonging to the userscript at
    /// `userscript_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeclarationLoad`] when the path is not a userscript,
    /// no declaration file exists or the document violates the schema, and
    /// [`Error::Io`] when an existing file cannot be read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// use scriptsmith::Declaration;
    ///
    /// # fn main() -> Result<(), scriptsmith::Error> {
    /// let declaration = Declaration::load(Path::new("src/userscripts/example.user.js"))?;
    /// println!("{}", declaration.name());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(userscript_path: &Path) -> Result<Self, Error> {
        let path = find_declaration(userscript_path)?;
        let contents = fs::read_to_string(&path).map_err(|source| error::io_error(&path, source))?;
        Self::parse(&path, &contents)
    }

    /// Parses and validates a declaration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeclarationLoad`] describing the first violation.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, Error> {
        let document: Value = serde_yaml::from_str(contents)
            .map_err(|source| Error::declaration(path, source.to_string()))?;
        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            _ => return Err(Error::declaration(path, "expected a mapping of metadata fields"))
        };

        let declaration = Self::from_mapping(path, mapping)?;
        for field in [MetadataField::Name, MetadataField::Description] {
            let present = declaration
                .override_of(field)
                .and_then(MetadataValue::as_text)
                .is_some_and(|value| !value.trim().is_empty());
            if !present {
                return Err(Error::declaration(
                    path,
                    format!("required field '{field}' must be a non-empty string")
                ));
            }
        }

        Ok(declaration)
    }

    fn from_mapping(path: &Path, mapping: Mapping) -> Result<Self, Error> {
        let mut features = Vec::new();
        let mut overrides = Vec::with_capacity(mapping.len());

        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(Error::declaration(
                        path,
                        format!("field names must be strings, found {other:?}")
                    ));
                }
            };

            if key == FEATURES_KEY {
                features = convert_list(path, &key, value)?;
                continue;
            }

            let field = MetadataField::from_key(&key)
                .ok_or_else(|| Error::declaration(path, format!("unknown metadata field '{key}'")))?;
            overrides.push((field, convert_value(path, &key, value)?));
        }

        Ok(Self {
            path: path.to_path_buf(),
            features,
            overrides
        })
    }

    /// Location of the declaration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared script name.
    pub fn name(&self) -> &str {
        self.override_of(MetadataField::Name)
            .and_then(MetadataValue::as_text)
            .unwrap_or_default()
    }

    /// Declared description.
    pub fn description(&self) -> &str {
        self.override_of(MetadataField::Description)
            .and_then(MetadataValue::as_text)
            .unwrap_or_default()
    }

    /// README bullet points, verbatim.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Declared fields in document order. `None` clears a default.
    pub fn overrides(&self) -> impl Iterator<Item = (MetadataField, &Option<MetadataValue>)> {
        self.overrides.iter().map(|(field, value)| (*field, value))
    }

    fn override_of(&self, field: MetadataField) -> Option<&MetadataValue> {
        self.overrides
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == field)
            .and_then(|(_, value)| value.as_ref())
    }
}

/// Strips `.user.js` from a userscript file name.
pub fn userscript_base_name(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .strip_suffix(USERSCRIPT_SUFFIX)
        .filter(|base| !base.is_empty())
}

/// Returns the first existing declaration file next to the userscript.
///
/// # Errors
///
/// Returns [`Error::DeclarationLoad`] when the path is not a userscript or
/// none of the candidates exist.
pub fn find_declaration(userscript_path: &Path) -> Result<PathBuf, Error> {
    let base = userscript_base_name(userscript_path).ok_or_else(|| {
        Error::declaration(userscript_path, "not a userscript, expected a '.user.js' suffix")
    })?;

    DECLARATION_SUFFIXES
        .iter()
        .map(|suffix| userscript_path.with_file_name(format!("{base}{suffix}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Error::declaration(
                userscript_path,
                format!("no declaration found, expected {base}{}", DECLARATION_SUFFIXES[0])
            )
        })
}

fn convert_value(path: &Path, key: &str, value: Value) -> Result<Option<MetadataValue>, Error> {
    let converted = match value {
        Value::Null => None,
        Value::Bool(flag) => Some(MetadataValue::Flag(flag)),
        Value::Sequence(_) => Some(MetadataValue::List(convert_list(path, key, value)?)),
        scalar => Some(MetadataValue::Text(convert_scalar(path, key, scalar)?))
    };
    Ok(converted)
}

fn convert_list(path: &Path, key: &str, value: Value) -> Result<Vec<String>, Error> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| convert_scalar(path, key, item))
            .collect(),
        scalar => Ok(vec![convert_scalar(path, key, scalar)?])
    }
}

fn convert_scalar(path: &Path, key: &str, value: Value) -> Result<String, Error> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(Error::declaration(
            path,
            format!("field '{key}' must hold strings or numbers, found {other:?}")
        ))
    }
}
