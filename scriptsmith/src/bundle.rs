// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// External bundling and minification.
///
/// Module resolution, tree-shaking and minification are delegated to
/// external programs. The [`Bundler`] and [`Minifier`] traits are the seam;
/// [`CommandTool`] drives a configurable command line.
use std::{future::Future, path::Path, process::Stdio};

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

use crate::{config::CommandSpec, error::Error};

/// Placeholder in command arguments replaced with the entry module path.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Per-invocation switches shared by bundling and minification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct ToolOptions
{
    /// Keep debug output; release-only arguments are omitted.
    pub debug: bool,
}

/// Bundles an entry module and everything it imports into one script.
pub trait Bundler: Send + Sync
{
    /// Returns the bundled code for `entry`.
    fn bundle(
        &self,
        entry: &Path,
        options: ToolOptions,
    ) -> impl Future<Output = Result<String, Error,>,> + Send;
}

/// Minifies bundled code.
pub trait Minifier: Send + Sync
{
    /// Returns the minified form of `code`.
    fn minify(
        &self,
        code: &str,
        options: ToolOptions,
    ) -> impl Future<Output = Result<String, Error,>,> + Send;
}

/// Runs an external program described by a [`CommandSpec`].
///
/// Bundling passes the entry path through [`INPUT_PLACEHOLDER`] (or as the
/// last argument when no placeholder is present) and reads the bundle from
/// stdout. Minification pipes the code through stdin.
#[derive(Debug, Clone,)]
pub struct CommandTool
{
    spec: CommandSpec,
}

impl CommandTool
{
    /// Creates a tool from its command specification.
    pub fn new(spec: CommandSpec,) -> Self
    {
        Self {
            spec,
        }
    }

    fn arguments(&self, input: Option<&Path,>, options: ToolOptions,) -> Vec<String,>
    {
        let mut arguments = Vec::with_capacity(self.spec.args.len() + self.spec.release_args.len() + 1,);
        let mut substituted = false;

        for argument in &self.spec.args {
            match input {
                Some(path,) if argument.contains(INPUT_PLACEHOLDER,) => {
                    arguments.push(argument.replace(INPUT_PLACEHOLDER, &path.to_string_lossy(),),);
                    substituted = true;
                }
                _ => arguments.push(argument.clone(),),
            }
        }
        if !options.debug {
            arguments.extend(self.spec.release_args.iter().cloned(),);
        }
        if let Some(path,) = input
            && !substituted
        {
            arguments.push(path.to_string_lossy().into_owned(),);
        }

        arguments
    }

    async fn run(
        &self,
        input: Option<&Path,>,
        stdin: Option<&str,>,
        options: ToolOptions,
    ) -> Result<String, Error,>
    {
        let program = self.spec.program.as_str();
        let arguments = self.arguments(input, options,);
        debug!("Running {} {}", program, arguments.join(" "));

        let mut child = Command::new(program,)
            .args(&arguments,)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() },)
            .stdout(Stdio::piped(),)
            .stderr(Stdio::piped(),)
            .kill_on_drop(true,)
            .spawn()
            .map_err(|e| Error::external_tool(program, format!("failed to start: {e}"),),)?;

        let pipe = child.stdin.take();
        let write = async move {
            if let (Some(mut pipe,), Some(data,),) = (pipe, stdin,) {
                pipe.write_all(data.as_bytes(),).await?;
                pipe.shutdown().await?;
            }
            Ok::<(), std::io::Error,>((),)
        };

        let (written, output,) = tokio::join!(write, child.wait_with_output());
        let output =
            output.map_err(|e| Error::external_tool(program, format!("failed to run: {e}"),),)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr,);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                details => details.to_owned(),
            };
            return Err(Error::external_tool(program, message,),);
        }
        written.map_err(|e| Error::external_tool(program, format!("failed to write input: {e}"),),)?;

        String::from_utf8(output.stdout,)
            .map_err(|_| Error::external_tool(program, "produced non UTF-8 output",),)
    }
}

impl Bundler for CommandTool
{
    async fn bundle(&self, entry: &Path, options: ToolOptions,) -> Result<String, Error,>
    {
        self.run(Some(entry,), None, options,).await
    }
}

impl Minifier for CommandTool
{
    async fn minify(&self, code: &str, options: ToolOptions,) -> Result<String, Error,>
    {
        self.run(None, Some(code,), options,).await
    }
}
