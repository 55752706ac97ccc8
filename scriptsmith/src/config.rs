// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Build options describing where sources, documentation and outputs live.
//!
//! The types in this module mirror the structure of the optional
//! `scriptsmith.yaml` document. Every field has a default so an empty file is
//! a valid configuration; the CLI layers its flags on top of the loaded
//! values.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    metadata::MetadataRecord,
};

/// File name probed for build options when no path is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "scriptsmith.yaml";

/// Options driving a complete build.
///
/// # Examples
///
/// ```
/// use scriptsmith::BuildOptions;
///
/// let yaml = r#"
/// bookmarklet_source_path: src/bookmarklets
/// name_format: "MusicBrainz: {name}"
/// "#;
/// let options: BuildOptions = serde_yaml::from_str(yaml,).expect("valid options",);
/// assert_eq!(options.userscript_source_path.to_str(), Some("src/userscripts"));
/// assert!(options.bookmarklet_source_path.is_some());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions
{
    /// Directory containing `*.user.js` entry modules and their declarations.
    pub userscript_source_path:  PathBuf,
    /// Optional directory containing bookmarklet entry modules.
    pub bookmarklet_source_path: Option<PathBuf,>,
    /// Directory containing `_header.md` and additional documentation.
    pub doc_source_path:         PathBuf,
    /// Destination of the generated README.
    pub readme_path:             PathBuf,
    /// Repository-relative directory receiving the built userscripts.
    pub distribution_path:       String,
    /// `package.json` consulted when `repository` is not set.
    pub package_json_path:       PathBuf,
    /// Explicit repository URL, takes precedence over `package.json`.
    pub repository:              Option<String,>,
    /// Branch for raw links; the checked out branch is probed when absent.
    pub default_branch:          Option<String,>,
    /// Template for userscript display names.
    pub name_format:             NameFormat,
    /// Keep console output in bookmarklets and log bundle details.
    pub debug:                   bool,
    /// Command bundling an entry module into a single script.
    pub bundler:                 CommandSpec,
    /// Command minifying bundled bookmarklet code.
    pub minifier:                CommandSpec,
}

impl Default for BuildOptions
{
    fn default() -> Self
    {
        Self {
            userscript_source_path:  PathBuf::from("src/userscripts",),
            bookmarklet_source_path: None,
            doc_source_path:         PathBuf::from("doc",),
            readme_path:             PathBuf::from("README.md",),
            distribution_path:       "dist".to_owned(),
            package_json_path:       PathBuf::from("package.json",),
            repository:              None,
            default_branch:          None,
            name_format:             NameFormat::default(),
            debug:                   false,
            bundler:                 CommandSpec::default_bundler(),
            minifier:                CommandSpec::default_minifier(),
        }
    }
}

impl BuildOptions
{
    /// Loads options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Parse`] when the YAML is invalid or has unknown keys.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::parse(&contents,)
    }

    /// Parses options from a YAML document. Empty documents yield defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the YAML cannot be decoded.
    pub fn parse(contents: &str,) -> Result<Self, Error,>
    {
        if contents.trim().is_empty() {
            return Ok(Self::default(),);
        }
        Ok(serde_yaml::from_str(contents,)?,)
    }

    /// Loads `path` when given, else [`DEFAULT_CONFIG_FILE`] when it exists,
    /// else defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`load`](Self::load) failures. An explicitly named file
    /// that does not exist is an error.
    pub fn discover(path: Option<&Path,>,) -> Result<Self, Error,>
    {
        match path {
            Some(path,) => Self::load(path,),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE,);
                if fallback.is_file() { Self::load(fallback,) } else { Ok(Self::default(),) }
            }
        }
    }
}

/// Template turning a userscript into its display name.
///
/// `{name}` is replaced with the declared name and `{base_name}` with the
/// file name without `.user.js`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(transparent)]
pub struct NameFormat(String,);

impl Default for NameFormat
{
    fn default() -> Self
    {
        Self("{name}".to_owned(),)
    }
}

impl NameFormat
{
    /// Creates a format from a template string.
    pub fn new<T: Into<String,>,>(template: T,) -> Self
    {
        Self(template.into(),)
    }

    /// Template as configured.
    pub fn template(&self,) -> &str
    {
        &self.0
    }

    /// Formats the display name of a userscript.
    ///
    /// # Examples
    ///
    /// ```
    /// use scriptsmith::{MetadataField, MetadataRecord, NameFormat};
    ///
    /// let record = MetadataRecord::new().with(MetadataField::Name, "Batch Edit",);
    /// let format = NameFormat::new("MB: {name} ({base_name})",);
    /// assert_eq!(format.format("batchEdit", &record), "MB: Batch Edit (batchEdit)");
    /// ```
    pub fn format(&self, base_name: &str, metadata: &MetadataRecord,) -> String
    {
        self.0.replace("{base_name}", base_name,).replace("{name}", metadata.name(),)
    }
}

/// External program invocation. `{input}` in `args` is replaced with the
/// entry path; without it, input is piped through stdin.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec
{
    /// Executable name or path.
    pub program:      String,
    /// Arguments passed on every invocation.
    #[serde(default)]
    pub args:         Vec<String,>,
    /// Arguments appended when not building in debug mode.
    #[serde(default)]
    pub release_args: Vec<String,>,
}

impl CommandSpec
{
    /// `esbuild --bundle --format=iife {input}`, stripping `console.debug`.
    pub fn default_bundler() -> Self
    {
        Self {
            program:      "esbuild".to_owned(),
            args:         vec![
                "--bundle".to_owned(),
                "--format=iife".to_owned(),
                "--log-level=warning".to_owned(),
                "--pure:console.debug".to_owned(),
                "{input}".to_owned(),
            ],
            release_args: Vec::new(),
        }
    }

    /// `esbuild --minify` reading from stdin.
    pub fn default_minifier() -> Self
    {
        Self {
            program:      "esbuild".to_owned(),
            args:         vec![
                "--minify".to_owned(),
                "--charset=ascii".to_owned(),
                "--log-level=warning".to_owned(),
            ],
            release_args: vec!["--drop:console".to_owned()],
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::*;
    use crate::metadata::MetadataField;

    #[test]
    fn empty_document_yields_defaults()
    {
        let options = BuildOptions::parse("   \n",).expect("expected defaults",);
        assert_eq!(options, BuildOptions::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults()
    {
        let options = BuildOptions::parse(
            "readme_path: docs/README.md\ndistribution_path: test/dist\ndebug: true\n",
        )
        .expect("expected parse success",);

        assert_eq!(options.readme_path, PathBuf::from("docs/README.md"));
        assert_eq!(options.distribution_path, "test/dist");
        assert!(options.debug);
        assert_eq!(options.doc_source_path, PathBuf::from("doc"));
        assert_eq!(options.bundler, CommandSpec::default_bundler());
    }

    #[test]
    fn unknown_keys_are_rejected()
    {
        let result = BuildOptions::parse("readme: README.md\n",);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn custom_bundler_command_is_parsed()
    {
        let options = BuildOptions::parse(
            "bundler:\n  program: rollup\n  args: ['{input}', '--format', 'iife']\n",
        )
        .expect("expected parse success",);

        assert_eq!(options.bundler.program, "rollup");
        assert_eq!(options.bundler.args, ["{input}", "--format", "iife"]);
        assert!(options.bundler.release_args.is_empty());
    }

    #[test]
    fn load_reads_file_from_disk()
    {
        let mut file = tempfile::NamedTempFile::new().expect("expected temp file",);
        write!(file, "doc_source_path: documentation\n").expect("expected write to succeed",);

        let options = BuildOptions::load(file.path(),).expect("expected load to succeed",);
        assert_eq!(options.doc_source_path, PathBuf::from("documentation"));
    }

    #[test]
    fn discover_fails_for_missing_explicit_file()
    {
        let result = BuildOptions::discover(Some(Path::new("/nonexistent/scriptsmith.yaml",),),);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn name_format_defaults_to_declared_name()
    {
        let record = MetadataRecord::new().with(MetadataField::Name, "Example",);
        assert_eq!(NameFormat::default().format("example", &record), "Example");
    }

    #[test]
    fn name_format_deserializes_from_plain_string()
    {
        let options =
            BuildOptions::parse("name_format: 'MB: {name}'\n",).expect("expected parse success",);
        assert_eq!(options.name_format.template(), "MB: {name}");
    }
}
