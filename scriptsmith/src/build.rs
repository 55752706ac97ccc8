// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end build pipeline.
//!
//! A build resolves the repository identity, builds every userscript and
//! bookmarklet and finally regenerates the README. The repository is resolved
//! before anything is written, so configuration problems never leave partial
//! output behind.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{
    bookmarklets::{Bookmarklets, build_bookmarklets},
    branch::current_branch,
    bundle::{Bundler, CommandTool, Minifier, ToolOptions},
    config::BuildOptions,
    discover::markdown_files,
    docs::extract_documentation,
    error::{self, Error},
    readme::{
        BookmarkletSection, DocFragment, ReadmeDocument, UserscriptSection, relevant_source_file,
        write_readme,
    },
    repository::{RepositoryOptions, RepositoryReference},
    userscripts::{BuiltUserscript, ScriptMetadata, UserscriptContext, build_userscripts},
};

/// Documentation fragment used as the README header.
pub const HEADER_FILE: &str = "_header.md";

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct BuildReport
{
    /// Base names of the built userscripts, in discovery order.
    pub userscripts:  Vec<String,>,
    /// File names of the built bookmarklets, in discovery order.
    pub bookmarklets: Vec<String,>,
    /// Location of the written README.
    pub readme_path:  PathBuf,
}

/// Resolves the repository identity for a build rooted at `root`.
///
/// An explicit `repository` option wins over `package.json`. Without a
/// configured branch the checked out branch is probed, falling back to the
/// default branch when git cannot tell.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when no usable repository URL exists and
/// read or decode errors of `package.json`.
pub fn resolve_repository(root: &Path, options: &BuildOptions,) -> Result<RepositoryReference, Error,>
{
    let repository_options = RepositoryOptions {
        default_branch:    options.default_branch.clone().or_else(|| current_branch(root,),),
        distribution_path: Some(options.distribution_path.clone(),),
    };

    match options.repository.as_deref() {
        Some(url,) => RepositoryReference::parse(url, repository_options,),
        None => RepositoryReference::from_package_metadata(
            &root.join(&options.package_json_path,),
            repository_options,
        ),
    }
}

/// Runs a complete build with the configured external tools.
///
/// # Errors
///
/// See [`build_with_tools`].
pub async fn build(root: &Path, options: &BuildOptions, date: NaiveDate,) -> Result<BuildReport, Error,>
{
    let bundler = Arc::new(CommandTool::new(options.bundler.clone(),),);
    let minifier = CommandTool::new(options.minifier.clone(),);
    build_with_tools(root, options, date, bundler, &minifier,).await
}

/// Runs a complete build with the given bundler and minifier.
///
/// Relative paths in `options` are resolved against `root`.
///
/// # Errors
///
/// Returns configuration errors before any output is written, then the first
/// userscript or bookmarklet failure, and finally read or write errors of the
/// documentation and README.
pub async fn build_with_tools<B, M,>(
    root: &Path,
    options: &BuildOptions,
    date: NaiveDate,
    bundler: Arc<B,>,
    minifier: &M,
) -> Result<BuildReport, Error,>
where
    B: Bundler + 'static,
    M: Minifier,
{
    let repository = resolve_repository(root, options,)?;
    info!("Building for {} on branch {}", repository.repo_url(), repository.default_branch());

    let doc_dir = root.join(&options.doc_source_path,);
    let header_path = doc_dir.join(HEADER_FILE,);
    let header =
        fs::read_to_string(&header_path,).map_err(|source| error::io_error(&header_path, source,),)?;

    let tool_options = ToolOptions {
        debug: options.debug,
    };
    let context = Arc::new(UserscriptContext {
        repository: repository.clone(),
        name_format: options.name_format.clone(),
        output_dir: root.join(&options.distribution_path,),
        date,
        options: tool_options,
    },);

    let userscripts =
        build_userscripts(&root.join(&options.userscript_source_path,), Arc::clone(&bundler,), context,)
            .await?;

    let bookmarklets = match options.bookmarklet_source_path.as_deref() {
        Some(directory,) => {
            build_bookmarklets(&root.join(directory,), bundler.as_ref(), minifier, tool_options,)
                .await?
        }
        None => Bookmarklets::new(),
    };

    let document = ReadmeDocument {
        header,
        userscripts: userscripts
            .iter()
            .map(|script| userscript_section(script, options,),)
            .collect(),
        bookmarklets: bookmarklet_sections(root, options, &bookmarklets,)?,
        fragments: doc_fragments(&doc_dir,)?,
    };

    let readme_path = root.join(&options.readme_path,);
    write_readme(&readme_path, &document, &repository,)?;

    let report = BuildReport {
        userscripts: userscripts
            .into_iter()
            .map(|script| script.metadata.base_name,)
            .collect(),
        bookmarklets: bookmarklets.into_keys().collect(),
        readme_path,
    };
    info!(
        "Built {} userscripts and {} bookmarklets",
        report.userscripts.len(),
        report.bookmarklets.len()
    );
    Ok(report,)
}

/// Renders the metadata block of a single userscript without bundling it.
///
/// # Errors
///
/// Returns repository configuration errors and declaration errors.
pub fn userscript_metadata_block(
    root: &Path,
    options: &BuildOptions,
    userscript_path: &Path,
    date: NaiveDate,
) -> Result<String, Error,>
{
    let context = UserscriptContext {
        repository: resolve_repository(root, options,)?,
        name_format: options.name_format.clone(),
        output_dir: root.join(&options.distribution_path,),
        date,
        options: ToolOptions {
            debug: options.debug,
        },
    };

    Ok(ScriptMetadata::load(userscript_path, &context,)?.block(),)
}

fn userscript_section(script: &BuiltUserscript, options: &BuildOptions,) -> UserscriptSection
{
    let metadata = &script.metadata;
    UserscriptSection {
        base_name:    metadata.base_name.clone(),
        display_name: metadata.display_name(&options.name_format,),
        description:  metadata.record.description().to_owned(),
        features:     metadata.declaration.features().to_vec(),
    }
}

fn bookmarklet_sections(
    root: &Path,
    options: &BuildOptions,
    bookmarklets: &Bookmarklets,
) -> Result<Vec<BookmarkletSection,>, Error,>
{
    let directory = options
        .bookmarklet_source_path
        .as_deref()
        .map(|path| path.to_string_lossy().into_owned(),)
        .unwrap_or_default();

    bookmarklets
        .iter()
        .map(|(file_name, bookmarklet,)| {
            Ok(BookmarkletSection {
                file_name:     file_name.clone(),
                source_link:   relevant_source_file(root, file_name, &directory,),
                documentation: extract_documentation(&bookmarklet.source_path,)?,
                code:          bookmarklet.code.clone(),
            },)
        },)
        .collect()
}

fn doc_fragments(doc_dir: &Path,) -> Result<Vec<DocFragment,>, Error,>
{
    markdown_files(doc_dir,)?
        .into_iter()
        .map(|file_name| {
            let path = doc_dir.join(&file_name,);
            debug!("Including documentation {}", path.display());
            let content =
                fs::read_to_string(&path,).map_err(|source| error::io_error(&path, source,),)?;
            Ok(DocFragment {
                file_name,
                content,
            },)
        },)
        .collect()
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;

    struct EchoBundler;

    impl Bundler for EchoBundler
    {
        async fn bundle(&self, entry: &Path, _options: ToolOptions,) -> Result<String, Error,>
        {
            fs::read_to_string(entry,).map_err(|source| error::io_error(entry, source,),)
        }
    }

    struct TrimMinifier;

    impl Minifier for TrimMinifier
    {
        async fn minify(&self, code: &str, _options: ToolOptions,) -> Result<String, Error,>
        {
            Ok(code.lines().filter(|line| !line.starts_with("/**",),).collect::<String>(),)
        }
    }

    fn date() -> NaiveDate
    {
        NaiveDate::from_ymd_opt(2024, 5, 6,).expect("valid date",)
    }

    fn options() -> BuildOptions
    {
        BuildOptions {
            bookmarklet_source_path: Some(PathBuf::from("src/bookmarklets",),),
            default_branch: Some("main".to_owned(),),
            ..BuildOptions::default()
        }
    }

    fn write(root: &Path, relative: &str, contents: &str,)
    {
        let path = root.join(relative,);
        if let Some(parent,) = path.parent() {
            fs::create_dir_all(parent,).expect("failed to create directory",);
        }
        fs::write(path, contents,).expect("failed to write fixture",);
    }

    fn project(root: &Path,)
    {
        write(root, "package.json", r#"{"repository": {"url": "git+https://github.com/octocat/scripts.git"}}"#,);
        write(root, "doc/_header.md", "# Scripts\n",);
        write(root, "doc/license.md", "## License\n",);
        write(root, "src/userscripts/alpha.user.js", "alpha();",);
        write(
            root,
            "src/userscripts/alpha.meta.yaml",
            "name: Alpha\ndescription: First script.\nfeatures:\n  - Does alpha\n",
        );
        write(root, "src/bookmarklets/alpha.js", "/** Alpha docs */\nalphaLite();",);
        write(root, "src/bookmarklets/betaTool.js", "/** Beta docs */\nbeta();",);
    }

    #[tokio::test]
    async fn build_writes_userscripts_and_readme()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        project(temp.path(),);

        let report =
            build_with_tools(temp.path(), &options(), date(), Arc::new(EchoBundler,), &TrimMinifier,)
                .await
                .expect("build succeeds",);

        assert_eq!(report.userscripts, ["alpha"]);
        assert_eq!(report.bookmarklets, ["alpha.js", "betaTool.js"]);

        let userscript =
            fs::read_to_string(temp.path().join("dist/alpha.user.js",),).expect("userscript written",);
        assert!(userscript.contains(
            "// @downloadURL   https://raw.github.com/octocat/scripts/main/dist/alpha.user.js\n"
        ));
        assert!(userscript.ends_with("// ==/UserScript==\n\nalpha();"));

        let readme = fs::read_to_string(&report.readme_path,).expect("readme written",);
        assert!(readme.starts_with("# Scripts\n\n## Userscripts\n\n### Alpha\n\nFirst script.\n- Does alpha\n"));
        assert!(readme.contains(
            "\nAlso available as a bookmarklet with less features:\nAlpha docs\n\n```js\njavascript:alphaLite();\n```\n"
        ));
        assert!(readme.contains("\n## Bookmarklets\n\n### [Beta Tool](src/bookmarklets/betaTool.js)\nBeta docs\n"));
        assert!(readme.ends_with("\n## License\n"));
    }

    #[tokio::test]
    async fn missing_repository_fails_before_output()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        project(temp.path(),);
        write(temp.path(), "package.json", "{}",);

        let error =
            build_with_tools(temp.path(), &options(), date(), Arc::new(EchoBundler,), &TrimMinifier,)
                .await
                .expect_err("repository is missing",);

        assert!(matches!(error, Error::Configuration { .. }));
        assert!(!temp.path().join("dist",).exists());
        assert!(!temp.path().join("README.md",).exists());
    }

    #[tokio::test]
    async fn missing_header_is_reported()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        project(temp.path(),);
        fs::remove_file(temp.path().join("doc/_header.md",),).expect("failed to remove header",);

        let error =
            build_with_tools(temp.path(), &options(), date(), Arc::new(EchoBundler,), &TrimMinifier,)
                .await
                .expect_err("header is missing",);

        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn explicit_repository_wins_over_package_json()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let options = BuildOptions {
            repository: Some("https://gitlab.com/team/tools".to_owned(),),
            default_branch: Some("develop".to_owned(),),
            ..BuildOptions::default()
        };

        let repository = resolve_repository(temp.path(), &options,).expect("repository resolves",);
        assert_eq!(repository.repo_url(), "https://gitlab.com/team/tools");
        assert_eq!(repository.default_branch(), "develop");
    }

    #[test]
    fn metadata_block_for_single_script()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        project(temp.path(),);

        let block = userscript_metadata_block(
            temp.path(),
            &options(),
            &temp.path().join("src/userscripts/alpha.user.js",),
            date(),
        )
        .expect("metadata renders",);

        assert!(block.starts_with("// ==UserScript==\n// @name          Alpha\n"));
        assert!(block.contains("// @version       2024.5.6\n"));
        assert!(block.contains("// @homepageURL   https://github.com/octocat/scripts#alpha\n"));
    }
}
