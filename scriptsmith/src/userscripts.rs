// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Userscript builds.
///
/// Each `*.user.js` entry module is bundled and written to the distribution
/// directory behind its generated metadata block. Builds of different
/// scripts share no mutable state and run concurrently.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::{
    bundle::{Bundler, ToolOptions},
    config::NameFormat,
    declaration::{Declaration, USERSCRIPT_SUFFIX, userscript_base_name},
    discover::script_files,
    error::{self, Error},
    metadata::{MetadataRecord, merge},
    render::render_metadata_block,
    repository::RepositoryReference,
};

/// Shared, read-only inputs of every userscript build in one run.
#[derive(Debug, Clone,)]
pub struct UserscriptContext
{
    /// Repository distributing the scripts.
    pub repository:  RepositoryReference,
    /// Display name template.
    pub name_format: NameFormat,
    /// Directory receiving `{base}.user.js` outputs.
    pub output_dir:  PathBuf,
    /// Date used for the default version.
    pub date:        NaiveDate,
    /// Switches forwarded to the bundler.
    pub options:     ToolOptions,
}

/// Merged metadata of one userscript.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ScriptMetadata
{
    /// File name without `.user.js`.
    pub base_name:   String,
    /// Declaration the record was merged from.
    pub declaration: Declaration,
    /// Final metadata record.
    pub record:      MetadataRecord,
}

impl ScriptMetadata
{
    /// Loads the declaration of `userscript_path` and merges the final record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeclarationLoad`] when the path is not a userscript or
    /// its declaration is missing or invalid.
    pub fn load(userscript_path: &Path, context: &UserscriptContext,) -> Result<Self, Error,>
    {
        let base_name = userscript_base_name(userscript_path,).ok_or_else(|| {
            Error::declaration(userscript_path, "not a userscript, expected a '.user.js' suffix",)
        },)?;
        let declaration = Declaration::load(userscript_path,)?;
        let record = merge(
            &context.repository,
            base_name,
            &declaration,
            &context.name_format,
            context.date,
        )?;

        Ok(Self {
            base_name: base_name.to_owned(),
            declaration,
            record,
        },)
    }

    /// Rendered metadata block.
    pub fn block(&self,) -> String
    {
        render_metadata_block(&self.record,)
    }

    /// Display name used for README headings.
    pub fn display_name(&self, name_format: &NameFormat,) -> String
    {
        name_format.format(&self.base_name, &self.record,)
    }
}

/// A userscript written to the distribution directory.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct BuiltUserscript
{
    /// Metadata the header was rendered from.
    pub metadata:    ScriptMetadata,
    /// Location of the written userscript.
    pub output_path: PathBuf,
}

/// Builds a single userscript.
///
/// The metadata is resolved before the bundler runs so an invalid
/// declaration never reaches the external tool.
///
/// # Errors
///
/// Returns declaration errors, the bundler's [`Error::ExternalTool`] and
/// [`Error::Write`] when the output cannot be written.
pub async fn build_userscript<B,>(
    bundler: &B,
    source_path: &Path,
    context: &UserscriptContext,
) -> Result<BuiltUserscript, Error,>
where
    B: Bundler,
{
    let metadata = ScriptMetadata::load(source_path, context,)?;
    let code = bundler.bundle(source_path, context.options,).await?;

    let output_dir = context.output_dir.as_path();
    fs::create_dir_all(output_dir,).map_err(|source| error::write_error(output_dir, source,),)?;
    let output_path = output_dir.join(format!("{}{USERSCRIPT_SUFFIX}", metadata.base_name),);

    let mut contents = metadata.block();
    contents.push('\n',);
    contents.push_str(&code,);
    fs::write(&output_path, contents,)
        .map_err(|source| error::write_error(&output_path, source,),)?;

    info!("Built userscript {}", output_path.display());
    Ok(BuiltUserscript {
        metadata,
        output_path,
    },)
}

/// Builds every userscript in `source_dir` concurrently.
///
/// The result follows discovery order. When any build fails the remaining
/// builds still run to completion and the first error in discovery order is
/// returned.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed, the first
/// per-script failure, or [`Error::Task`] when a build task panicked.
pub async fn build_userscripts<B,>(
    source_dir: &Path,
    bundler: Arc<B,>,
    context: Arc<UserscriptContext,>,
) -> Result<Vec<BuiltUserscript,>, Error,>
where
    B: Bundler + 'static,
{
    let files = script_files(source_dir, USERSCRIPT_SUFFIX,)?;
    info!("Building {} userscripts from {}", files.len(), source_dir.display());

    let progress = ProgressBar::new(files.len() as u64,);
    if let Ok(style,) = ProgressStyle::default_bar().template("{spinner:.green} [{pos}/{len}] {msg}",)
    {
        progress.set_style(style,);
    }

    let mut tasks = JoinSet::new();
    for (index, file,) in files.iter().enumerate() {
        let source_path = source_dir.join(file,);
        let bundler = Arc::clone(&bundler,);
        let context = Arc::clone(&context,);
        tasks.spawn(async move {
            let result = build_userscript(bundler.as_ref(), &source_path, &context,).await;
            (index, result,)
        },);
    }

    let mut results: Vec<Option<Result<BuiltUserscript, Error,>,>,> =
        (0..files.len()).map(|_| None,).collect();
    while let Some(joined,) = tasks.join_next().await {
        let (index, result,) = joined?;
        debug!("Finished build of {}", files[index]);
        progress.set_message(files[index].clone(),);
        progress.inc(1,);
        results[index] = Some(result,);
    }
    progress.finish_and_clear();

    results
        .into_iter()
        .map(|result| result.unwrap_or_else(|| Err(Error::Task {
            message: "build task did not report a result".to_owned(),
        },),),)
        .collect()
}
