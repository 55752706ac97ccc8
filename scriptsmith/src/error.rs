#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the build pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by the library and the CLI.
///
/// Configuration problems are always raised before the first artifact is
/// written. Declaration and external tool failures abort the build they
/// belong to and are never retried.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Project configuration is missing or malformed, including an unusable
    /// repository URL.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Human readable message describing the configuration problem.
        message: String
    },
    /// A userscript declaration file is missing or violates its schema.
    #[error("failed to load declaration {path:?}: {message}")]
    DeclarationLoad {
        /// Location of the declaration file (or of the userscript when no
        /// declaration was found).
        path:    PathBuf,
        /// Human readable message describing the failure.
        message: String
    },
    /// The bundler or minifier failed.
    #[error("{tool} failed: {message}")]
    ExternalTool {
        /// Program name of the failing tool.
        tool:    String,
        /// Diagnostic output reported by the tool.
        message: String
    },
    /// Wraps I/O errors that occur while reading inputs.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the input.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while writing artifacts or the README.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Location of the output being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors of the build options file.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON decoding errors of `package.json`.
    #[error("failed to parse package metadata: {source}")]
    PackageJson {
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// A concurrent build task could not be joined.
    #[error("build task failed: {message}")]
    Task {
        /// Description of the join failure.
        message: String
    }
}

impl Error {
    /// Constructs a configuration error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the configuration failure.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a declaration error for the file at `path`.
    pub fn declaration<M>(path: &Path, message: M) -> Self
    where
        M: Into<String>
    {
        Self::DeclarationLoad {
            path:    path.to_path_buf(),
            message: message.into()
        }
    }

    /// Constructs an external tool error.
    pub fn external_tool<T, M>(tool: T, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>
    {
        Self::ExternalTool {
            tool:    tool.into(),
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::PackageJson {
            source
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Task {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the input that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the output that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}
