// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Userscript metadata model.
//!
//! The recognized fields form a fixed, ordered table ([`METADATA_ORDER`])
//! that doubles as the output order of the rendered header. A final record is
//! produced by a three-phase pipeline:
//!
//! 1. [`compute_defaults`] derives per-script defaults from the repository,
//! 2. [`apply_overrides`] lays the declaration file on top (the declaration
//!    wins for every field it sets),
//! 3. [`compute_derived_fields`] fills the fields listed in
//!    [`DERIVED_FIELDS`], which declarations can never override.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::{
    config::NameFormat,
    declaration::Declaration,
    error::Error,
    repository::RepositoryReference,
};

/// A recognized metadata directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    /// `@name`
    Name,
    /// `@version`
    Version,
    /// `@namespace`
    Namespace,
    /// `@author`
    Author,
    /// `@description`
    Description,
    /// `@icon`
    Icon,
    /// `@homepageURL`
    HomepageUrl,
    /// `@downloadURL`
    DownloadUrl,
    /// `@updateURL`
    UpdateUrl,
    /// `@supportURL`
    SupportUrl,
    /// `@require`
    Require,
    /// `@resource`
    Resource,
    /// `@grant`
    Grant,
    /// `@connect`
    Connect,
    /// `@run-at`
    RunAt,
    /// `@sandbox`
    Sandbox,
    /// `@inject-into`
    InjectInto,
    /// `@noframes`
    Noframes,
    /// `@unwrap`
    Unwrap,
    /// `@match`
    Match,
    /// `@include`
    Include,
    /// `@exclude-match`
    ExcludeMatch,
    /// `@exclude`
    Exclude
}

/// Output order of the metadata block. Shared, read-only.
pub const METADATA_ORDER: [MetadataField; 23] = [
    MetadataField::Name,
    MetadataField::Version,
    MetadataField::Namespace,
    MetadataField::Author,
    MetadataField::Description,
    MetadataField::Icon,
    MetadataField::HomepageUrl,
    MetadataField::DownloadUrl,
    MetadataField::UpdateUrl,
    MetadataField::SupportUrl,
    MetadataField::Require,
    MetadataField::Resource,
    MetadataField::Grant,
    MetadataField::Connect,
    MetadataField::RunAt,
    MetadataField::Sandbox,
    MetadataField::InjectInto,
    MetadataField::Noframes,
    MetadataField::Unwrap,
    MetadataField::Match,
    MetadataField::Include,
    MetadataField::ExcludeMatch,
    MetadataField::Exclude
];

/// Fields computed after overrides are applied. Declarations cannot set them.
pub const DERIVED_FIELDS: &[MetadataField] = &[MetadataField::HomepageUrl];

/// Fields every final record must carry.
pub const REQUIRED_FIELDS: &[MetadataField] = &[MetadataField::Name, MetadataField::Description];

impl MetadataField {
    /// Directive name as written after `@`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Version => "version",
            Self::Namespace => "namespace",
            Self::Author => "author",
            Self::Description => "description",
            Self::Icon => "icon",
            Self::HomepageUrl => "homepageURL",
            Self::DownloadUrl => "downloadURL",
            Self::UpdateUrl => "updateURL",
            Self::SupportUrl => "supportURL",
            Self::Require => "require",
            Self::Resource => "resource",
            Self::Grant => "grant",
            Self::Connect => "connect",
            Self::RunAt => "run-at",
            Self::Sandbox => "sandbox",
            Self::InjectInto => "inject-into",
            Self::Noframes => "noframes",
            Self::Unwrap => "unwrap",
            Self::Match => "match",
            Self::Include => "include",
            Self::ExcludeMatch => "exclude-match",
            Self::Exclude => "exclude"
        }
    }

    /// Looks up a field by its directive name.
    pub fn from_key(key: &str) -> Option<Self> {
        METADATA_ORDER
            .iter()
            .copied()
            .find(|field| field.as_str() == key)
    }

    /// Whether the field is computed after overrides.
    pub fn is_derived(self) -> bool {
        DERIVED_FIELDS.contains(&self)
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a metadata field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// Single textual value.
    Text(String),
    /// Valueless directive such as `@noframes`; `false` is not rendered.
    Flag(bool),
    /// One output line per element, in order.
    List(Vec<String>)
}

impl MetadataValue {
    /// Values that produce an output line. Empty strings and `false` are
    /// dropped; a `true` flag yields a single empty value.
    pub fn rendered_values(&self) -> Vec<&str> {
        match self {
            Self::Text(value) if value.is_empty() => Vec::new(),
            Self::Text(value) => vec![value.as_str()],
            Self::Flag(true) => vec![""],
            Self::Flag(false) => Vec::new(),
            Self::List(values) => values
                .iter()
                .map(String::as_str)
                .filter(|value| !value.is_empty())
                .collect()
        }
    }

    /// Whether at least one output line would be produced.
    pub fn is_truthy(&self) -> bool {
        !self.rendered_values().is_empty()
    }

    /// Returns the text of a [`MetadataValue::Text`] value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Mapping from recognized fields to their values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    values: BTreeMap<MetadataField, MetadataValue>
}

impl MetadataRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, replacing any previous value.
    pub fn set<V>(&mut self, field: MetadataField, value: V)
    where
        V: Into<MetadataValue>
    {
        self.values.insert(field, value.into());
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with<V>(mut self, field: MetadataField, value: V) -> Self
    where
        V: Into<MetadataValue>
    {
        self.set(field, value);
        self
    }

    /// Removes `field` from the record.
    pub fn remove(&mut self, field: MetadataField) -> Option<MetadataValue> {
        self.values.remove(&field)
    }

    /// Returns the value of `field`.
    pub fn get(&self, field: MetadataField) -> Option<&MetadataValue> {
        self.values.get(&field)
    }

    /// Returns the text of `field` when it holds a single value.
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        self.get(field).and_then(MetadataValue::as_text)
    }

    /// Script name, empty when absent.
    pub fn name(&self) -> &str {
        self.text(MetadataField::Name).unwrap_or_default()
    }

    /// Script description, empty when absent.
    pub fn description(&self) -> &str {
        self.text(MetadataField::Description).unwrap_or_default()
    }

    /// Iterates fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &MetadataValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Number of fields set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Formats `date` as the `YYYY.M.D` version identifier.
pub fn version_from_date(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.year(), date.month(), date.day())
}

/// Phase one: per-script defaults derived from the repository.
pub fn compute_defaults(
    repository: &RepositoryReference,
    base_name: &str,
    date: NaiveDate
) -> MetadataRecord {
    let raw_url = repository.userscript_raw_url(base_name);

    MetadataRecord::new()
        .with(MetadataField::Author, repository.owner())
        .with(MetadataField::Namespace, repository.repo_url())
        .with(MetadataField::DownloadUrl, raw_url.clone())
        .with(MetadataField::UpdateUrl, raw_url)
        .with(MetadataField::SupportUrl, repository.support_url())
        .with(MetadataField::Version, version_from_date(date))
        .with(MetadataField::Grant, "none")
}

/// Phase two: lays the declaration over `record`.
///
/// A `null` in the declaration clears the default. Values for derived fields
/// are discarded with a warning.
pub fn apply_overrides(record: &mut MetadataRecord, declaration: &Declaration) {
    for (field, value) in declaration.overrides() {
        if field.is_derived() {
            warn!(
                "{}: ignoring declared @{field}, it is always derived from the README section",
                declaration.path().display()
            );
            continue;
        }

        match value {
            Some(value) => record.set(field, value.clone()),
            None => {
                record.remove(field);
            }
        }
    }
}

/// Phase three: computes the non-overridable fields.
pub fn compute_derived_fields(
    record: &mut MetadataRecord,
    repository: &RepositoryReference,
    base_name: &str,
    name_format: &NameFormat
) {
    let display_name = name_format.format(base_name, record);
    record.set(
        MetadataField::HomepageUrl,
        repository.readme_section_url(&display_name)
    );
}

/// Runs all three phases and checks the required fields.
///
/// # Errors
///
/// Returns [`Error::DeclarationLoad`] when the merged record lacks a
/// non-empty `name` or `description`.
pub fn merge(
    repository: &RepositoryReference,
    base_name: &str,
    declaration: &Declaration,
    name_format: &NameFormat,
    date: NaiveDate
) -> Result<MetadataRecord, Error> {
    let mut record = compute_defaults(repository, base_name, date);
    apply_overrides(&mut record, declaration);

    for field in REQUIRED_FIELDS {
        let present = record.get(*field).is_some_and(MetadataValue::is_truthy);
        if !present {
            return Err(Error::declaration(
                declaration.path(),
                format!("required field '{field}' is missing")
            ));
        }
    }

    compute_derived_fields(&mut record, repository, base_name, name_format);
    Ok(record)
}
