// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Bookmarklet builds.
///
/// Every `*.js` module in the bookmarklet directory is bundled, minified and
/// turned into a `javascript:` URI.
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    bundle::{Bundler, Minifier, ToolOptions},
    discover::script_files,
    error::Error,
};

/// URI scheme prefix of every bookmarklet.
pub const BOOKMARKLET_SCHEME: &str = "javascript:";
/// Extension of bookmarklet entry modules.
pub const BOOKMARKLET_SUFFIX: &str = ".js";

/// A bundled and minified bookmarklet.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Bookmarklet
{
    /// Entry module the bookmarklet was built from.
    pub source_path: PathBuf,
    /// `javascript:` URI.
    pub code:        String,
}

impl Bookmarklet
{
    /// File name without the `.js` extension.
    pub fn base_name(&self,) -> &str
    {
        self.source_path
            .file_name()
            .and_then(|name| name.to_str(),)
            .map(|name| name.strip_suffix(BOOKMARKLET_SUFFIX,).unwrap_or(name,),)
            .unwrap_or_default()
    }
}

/// Bookmarklets keyed by entry file name, in discovery order.
pub type Bookmarklets = BTreeMap<String, Bookmarklet,>;

/// Bundles and minifies one module into a bookmarklet.
///
/// # Errors
///
/// Propagates [`Error::ExternalTool`] from the bundler or minifier.
pub async fn build_bookmarklet<B, M,>(
    bundler: &B,
    minifier: &M,
    module_path: &Path,
    options: ToolOptions,
) -> Result<Bookmarklet, Error,>
where
    B: Bundler,
    M: Minifier,
{
    let bundled = bundler.bundle(module_path, options,).await?;
    let minified = minifier.minify(&bundled, options,).await?;
    let code = format!("{BOOKMARKLET_SCHEME}{}", minified.trim_end());

    if options.debug {
        debug!("{} bytes for bookmarklet '{}'", code.len(), module_path.display());
    }

    Ok(Bookmarklet {
        source_path: module_path.to_path_buf(),
        code,
    },)
}

/// Builds a bookmarklet for every module in `source_dir`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed and the first
/// tool failure otherwise.
pub async fn build_bookmarklets<B, M,>(
    source_dir: &Path,
    bundler: &B,
    minifier: &M,
    options: ToolOptions,
) -> Result<Bookmarklets, Error,>
where
    B: Bundler,
    M: Minifier,
{
    let files = script_files(source_dir, BOOKMARKLET_SUFFIX,)?;
    info!("Building {} bookmarklets from {}", files.len(), source_dir.display());

    let mut bookmarklets = Bookmarklets::new();
    for file in files {
        let bookmarklet =
            build_bookmarklet(bundler, minifier, &source_dir.join(&file,), options,).await?;
        bookmarklets.insert(file, bookmarklet,);
    }

    Ok(bookmarklets,)
}
