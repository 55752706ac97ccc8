// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Build pipeline for userscripts and bookmarklets.
//!
//! The library turns a directory of userscript entry modules, each paired
//! with a static metadata declaration, into distributable `*.user.js` files
//! headed by a `// ==UserScript==` block. Bookmarklets are bundled into
//! `javascript:` URIs, and a README documenting every script is assembled
//! from the metadata, the extracted source documentation and hand-written
//! Markdown fragments. Bundling and minification are delegated to external
//! programs behind the [`Bundler`] and [`Minifier`] traits.

mod bookmarklets;
mod branch;
mod build;
mod bundle;
mod casing;
mod config;
mod declaration;
mod discover;
mod docs;
mod error;
mod metadata;
mod readme;
mod render;
mod repository;
mod url_rule;
mod userscripts;

pub use bookmarklets::{
    BOOKMARKLET_SCHEME, Bookmarklet, Bookmarklets, build_bookmarklet, build_bookmarklets,
};
pub use branch::current_branch;
pub use build::{
    BuildReport, HEADER_FILE, build, build_with_tools, resolve_repository, userscript_metadata_block,
};
pub use bundle::{Bundler, CommandTool, INPUT_PLACEHOLDER, Minifier, ToolOptions};
pub use casing::{camel_to_title_case, slugify};
pub use config::{BuildOptions, CommandSpec, DEFAULT_CONFIG_FILE, NameFormat};
pub use declaration::{
    DECLARATION_SUFFIXES, Declaration, USERSCRIPT_SUFFIX, find_declaration, userscript_base_name,
};
pub use discover::{markdown_files, script_files};
pub use docs::{documentation_from_source, extract_documentation};
pub use error::{Error, io_error, write_error};
pub use metadata::{
    DERIVED_FIELDS, METADATA_ORDER, MetadataField, MetadataRecord, MetadataValue, REQUIRED_FIELDS,
    apply_overrides, compute_defaults, compute_derived_fields, merge, version_from_date,
};
pub use readme::{
    BookmarkletSection, DocFragment, ReadmeDocument, UserscriptSection, relevant_source_file,
    render_readme, write_readme,
};
pub use render::{
    BLOCK_END, BLOCK_START, render_metadata_block, render_with_schema, schema_width,
};
pub use repository::{
    DEFAULT_BRANCH, DEFAULT_DISTRIBUTION_PATH, RepositoryOptions, RepositoryReference,
};
pub use url_rule::{UrlRuleOptions, musicbrainz_url_rule, url_rule_regex};
pub use userscripts::{
    BuiltUserscript, ScriptMetadata, UserscriptContext, build_userscript, build_userscripts,
};
