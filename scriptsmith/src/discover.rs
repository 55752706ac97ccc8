// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Discovery of script modules and documentation fragments.
///
/// Listings are sorted by file name so that builds and the generated README
/// are reproducible across platforms.
use std::{fs, path::Path};

use tracing::debug;

use crate::error::{self, Error};

/// Extension of documentation fragments.
pub const MARKDOWN_EXTENSION: &str = ".md";
/// Fragments starting with this prefix are partials, never appended as-is.
pub const PARTIAL_PREFIX: char = '_';

/// Lists the names of regular files in `directory` ending with `suffix`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use scriptsmith::script_files;
///
/// # fn main() -> Result<(), scriptsmith::Error> {
/// for name in script_files(Path::new("src/userscripts"), ".user.js")? {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn script_files(directory: &Path, suffix: &str,) -> Result<Vec<String,>, Error,>
{
    let mut names = list_files(directory,)?
        .into_iter()
        .filter(|name| name.len() > suffix.len() && name.ends_with(suffix,),)
        .collect::<Vec<_,>>();
    names.sort();

    debug!("Found {} '{}' files in {}", names.len(), suffix, directory.display());
    Ok(names,)
}

/// Lists documentation fragments in `directory`, excluding partials such as
/// `_header.md`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed.
pub fn markdown_files(directory: &Path,) -> Result<Vec<String,>, Error,>
{
    let mut names = script_files(directory, MARKDOWN_EXTENSION,)?;
    names.retain(|name| !name.starts_with(PARTIAL_PREFIX,),);
    Ok(names,)
}

fn list_files(directory: &Path,) -> Result<Vec<String,>, Error,>
{
    let entries = fs::read_dir(directory,).map_err(|source| error::io_error(directory, source,),)?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| error::io_error(directory, source,),)?;
        let is_file = entry
            .file_type()
            .map_err(|source| error::io_error(&entry.path(), source,),)?
            .is_file();
        if !is_file {
            continue;
        }
        if let Some(name,) = entry.file_name().to_str() {
            names.push(name.to_owned(),);
        }
    }

    Ok(names,)
}
