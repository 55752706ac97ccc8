// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the scriptsmith binary.
//!
//! The CLI exposes subcommands for running a complete build, printing the
//! metadata block of individual userscripts and composing URL rules for
//! `@include` directives.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use chrono::Local;
use clap::{ArgAction, Args, Parser, Subcommand};
use scriptsmith::{
    BuildOptions, Error, UrlRuleOptions, build, musicbrainz_url_rule, url_rule_regex,
    userscript_metadata_block,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for building userscripts and bookmarklets.
#[derive(Debug, Parser,)]
#[command(name = "scriptsmith", version, about = "Build userscripts, bookmarklets and their README")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Build all userscripts and bookmarklets and regenerate the README.
    Build(BuildArgs,),
    /// Print the metadata block of one or more userscripts.
    Metadata(MetadataArgs,),
    /// Print a URL rule for `@include` and `@exclude` directives.
    #[command(name = "url-rule")]
    UrlRule(UrlRuleArgs,),
}

/// Options shared by every command that reads the project configuration.
#[derive(Debug, Args, Default,)]
struct ProjectArgs
{
    /// Build options file, `scriptsmith.yaml` is used when present.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Repository URL, overrides `package.json`.
    #[arg(long = "repository", value_name = "URL")]
    repository: Option<String,>,

    /// Branch referenced by raw download links.
    #[arg(long = "branch", value_name = "NAME")]
    branch: Option<String,>,

    /// Directory holding the built userscripts.
    #[arg(long = "dist", value_name = "DIR")]
    dist: Option<String,>,
}

#[derive(Debug, Args, Default,)]
/// Arguments accepted by the `build` subcommand.
struct BuildArgs
{
    #[command(flatten)]
    project: ProjectArgs,

    /// Directory containing `*.user.js` entry modules.
    #[arg(long = "userscripts", value_name = "DIR")]
    userscripts: Option<PathBuf,>,

    /// Directory containing bookmarklet entry modules.
    #[arg(long = "bookmarklets", value_name = "DIR")]
    bookmarklets: Option<PathBuf,>,

    /// Directory containing `_header.md` and other documentation.
    #[arg(long = "docs", value_name = "DIR")]
    docs: Option<PathBuf,>,

    /// Destination of the generated README.
    #[arg(long = "readme", value_name = "PATH")]
    readme: Option<PathBuf,>,

    /// Keep console output in bookmarklets and log at debug level.
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `metadata` subcommand.
struct MetadataArgs
{
    #[command(flatten)]
    project: ProjectArgs,

    /// Userscript entry modules.
    #[arg(value_name = "USERSCRIPT", required = true)]
    userscripts: Vec<PathBuf,>,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `url-rule` subcommand.
struct UrlRuleArgs
{
    /// Domain and path as a regular expression.
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Treat the pattern as a path on MusicBrainz and its beta and test servers.
    #[arg(long = "musicbrainz", action = ArgAction::SetTrue)]
    musicbrainz: bool,

    /// Reject URLs with a query string.
    #[arg(long = "no-query", action = ArgAction::SetTrue)]
    no_query: bool,

    /// Reject URLs with a fragment.
    #[arg(long = "no-fragment", action = ArgAction::SetTrue)]
    no_fragment: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    let cli = Cli::parse();
    init_tracing(cli.debug_requested(),);

    if let Err(error,) = run(cli,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

impl Cli
{
    fn debug_requested(&self,) -> bool
    {
        matches!(&self.command, Command::Build(args) if args.debug)
    }
}

fn init_tracing(debug: bool,)
{
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level,),);

    tracing_subscriber::fmt()
        .with_env_filter(filter,)
        .with_target(false,)
        .with_writer(io::stderr,)
        .compact()
        .init();
}

/// Executes the parsed command.
///
/// # Errors
///
/// Propagates configuration, declaration, tool and I/O errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    match cli.command {
        Command::Build(args,) => run_build(args,).await,
        Command::Metadata(args,) => run_metadata(args,),
        Command::UrlRule(args,) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_url_rule(&mut handle, &args,)
        }
    }
}

async fn run_build(args: BuildArgs,) -> Result<(), Error,>
{
    let options = build_options(&args,)?;
    let report = build(Path::new(".",), &options, Local::now().date_naive(),).await?;
    println!("{}", report.readme_path.display());
    Ok((),)
}

fn run_metadata(args: MetadataArgs,) -> Result<(), Error,>
{
    let options = project_options(&args.project,)?;
    let today = Local::now().date_naive();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for userscript in &args.userscripts {
        let block = userscript_metadata_block(Path::new(".",), &options, userscript, today,)?;
        writeln!(handle, "{block}").map_err(|source| scriptsmith::write_error(Path::new("-",), source,),)?;
    }

    Ok((),)
}

/// Loads the options file and layers the project flags on top.
fn project_options(args: &ProjectArgs,) -> Result<BuildOptions, Error,>
{
    let mut options = BuildOptions::discover(args.config.as_deref(),)?;

    if let Some(repository,) = &args.repository {
        options.repository = Some(repository.clone(),);
    }
    if let Some(branch,) = &args.branch {
        options.default_branch = Some(branch.clone(),);
    }
    if let Some(dist,) = &args.dist {
        options.distribution_path = dist.clone();
    }

    Ok(options,)
}

/// Loads the options file and layers every `build` flag on top.
fn build_options(args: &BuildArgs,) -> Result<BuildOptions, Error,>
{
    let mut options = project_options(&args.project,)?;

    if let Some(userscripts,) = &args.userscripts {
        options.userscript_source_path = userscripts.clone();
    }
    if let Some(bookmarklets,) = &args.bookmarklets {
        options.bookmarklet_source_path = Some(bookmarklets.clone(),);
    }
    if let Some(docs,) = &args.docs {
        options.doc_source_path = docs.clone();
    }
    if let Some(readme,) = &args.readme {
        options.readme_path = readme.clone();
    }
    options.debug |= args.debug;

    Ok(options,)
}

fn write_url_rule<W: Write,>(writer: &mut W, args: &UrlRuleArgs,) -> Result<(), Error,>
{
    let rule = if args.musicbrainz {
        musicbrainz_url_rule(&args.pattern,)
    } else {
        url_rule_regex(
            &args.pattern,
            UrlRuleOptions {
                allow_query:    !args.no_query,
                allow_fragment: !args.no_fragment,
            },
        )
    };

    writeln!(writer, "{rule}").map_err(|source| scriptsmith::write_error(Path::new("-",), source,),)
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor, path::Path};

    use clap::Parser;
    use tempfile::tempdir;

    use super::{BuildArgs, Cli, Command, ProjectArgs, build_options, project_options, write_url_rule};

    fn parse(arguments: &[&str],) -> Command
    {
        let mut full = vec![env!("CARGO_PKG_NAME")];
        full.extend_from_slice(arguments,);
        Cli::try_parse_from(full,).expect("failed to parse CLI",).command
    }

    #[test]
    fn build_flags_override_options_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("scriptsmith.yaml",);
        fs::write(&config_path, "doc_source_path: documentation\ndistribution_path: out\n",)
            .expect("failed to write config",);

        let args = match parse(&[
            "build",
            "--config",
            config_path.to_str().expect("utf8",),
            "--dist",
            "public",
            "--bookmarklets",
            "src/bookmarklets",
            "--debug",
        ],) {
            Command::Build(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };

        let options = build_options(&args,).expect("options load",);
        assert_eq!(options.doc_source_path, Path::new("documentation"));
        assert_eq!(options.distribution_path, "public");
        assert_eq!(options.bookmarklet_source_path.as_deref(), Some(Path::new("src/bookmarklets")));
        assert!(options.debug);
    }

    #[test]
    fn build_debug_enables_debug_logging()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "build", "--debug"],)
            .expect("failed to parse CLI",);
        assert!(cli.debug_requested());

        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "url-rule", "example\\.com/"],)
            .expect("failed to parse CLI",);
        assert!(!cli.debug_requested());
    }

    #[test]
    fn missing_explicit_config_is_an_error()
    {
        let args = BuildArgs {
            project: ProjectArgs {
                config: Some(Path::new("/nonexistent/scriptsmith.yaml",).to_path_buf(),),
                ..ProjectArgs::default()
            },
            ..BuildArgs::default()
        };

        let error = build_options(&args,).expect_err("config file is missing",);
        assert!(matches!(error, scriptsmith::Error::Io { .. }));
    }

    #[test]
    fn repository_and_branch_flags_are_applied()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("empty.yaml",);
        fs::write(&config_path, "",).expect("failed to write config",);

        let args = ProjectArgs {
            config:     Some(config_path,),
            repository: Some("https://github.com/octocat/scripts".to_owned(),),
            branch:     Some("release".to_owned(),),
            dist:       None,
        };

        let options = project_options(&args,).expect("options load",);
        assert_eq!(options.repository.as_deref(), Some("https://github.com/octocat/scripts"));
        assert_eq!(options.default_branch.as_deref(), Some("release"));
        assert_eq!(options.distribution_path, "dist");
    }

    #[test]
    fn metadata_requires_a_userscript()
    {
        let result = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "metadata"],);
        assert!(result.is_err());
    }

    #[test]
    fn url_rule_respects_flags()
    {
        let args = match parse(&["url-rule", r"example\.com/item", "--no-query"],) {
            Command::UrlRule(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };

        let mut buffer = Cursor::new(Vec::new(),);
        write_url_rule(&mut buffer, &args,).expect("rule written",);
        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "/^https?://example\\.com/item(#.+?)?$/\n");
    }

    #[test]
    fn url_rule_for_musicbrainz()
    {
        let args = match parse(&["url-rule", "release/[0-9a-f-]{36}", "--musicbrainz"],) {
            Command::UrlRule(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };

        let mut buffer = Cursor::new(Vec::new(),);
        write_url_rule(&mut buffer, &args,).expect("rule written",);
        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.starts_with("/^https?://((beta|test)\\.)?musicbrainz\\.org/release/"));
    }
}
