// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Identity of the git repository that distributes the userscripts.
//!
//! A [`RepositoryReference`] is parsed once per build from the configured
//! repository URL and derives every canonical link that ends up in metadata
//! blocks and the README. All derivations are plain string composition.

use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::{
    casing::slugify,
    error::{self, Error},
};

/// Branch used for raw download links when none is supplied.
pub const DEFAULT_BRANCH: &str = "main";
/// Directory inside the repository that holds the built userscripts.
pub const DEFAULT_DISTRIBUTION_PATH: &str = "dist";

const INSTALL_BADGE_URL: &str =
    "https://img.shields.io/badge/Install-success.svg?style=for-the-badge&logo=tampermonkey";
const SOURCE_BADGE_URL: &str =
    "https://img.shields.io/badge/Source-grey.svg?style=for-the-badge&logo=github";

static REPO_PATH: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^/([^/]+)/([^/]+?)(?:\.git|$)",).expect("repository path pattern is valid",)
},);

/// Optional settings applied while parsing a repository URL.
#[derive(Debug, Clone, Default,)]
pub struct RepositoryOptions
{
    /// Branch used for raw links, [`DEFAULT_BRANCH`] when absent.
    pub default_branch:    Option<String,>,
    /// Distribution directory, [`DEFAULT_DISTRIBUTION_PATH`] when absent.
    pub distribution_path: Option<String,>,
}

/// Parsed repository identity. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RepositoryReference
{
    host:              String,
    owner:             String,
    name:              String,
    default_branch:    String,
    distribution_path: String,
}

impl RepositoryReference
{
    /// Parses a repository URL of the form `https://<host>/<owner>/<repo>[.git]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the value is not a URL or its
    /// path does not match `/owner/repo` with an optional `.git` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use scriptsmith::{RepositoryOptions, RepositoryReference};
    ///
    /// let repo = RepositoryReference::parse(
    ///     "https://github.com/octocat/userscripts.git",
    ///     RepositoryOptions::default(),
    /// )?;
    /// assert_eq!(repo.repo_url(), "https://github.com/octocat/userscripts");
    /// assert_eq!(repo.support_url(), "https://github.com/octocat/userscripts/issues");
    /// # Ok::<(), scriptsmith::Error>(())
    /// ```
    pub fn parse(url: &str, options: RepositoryOptions,) -> Result<Self, Error,>
    {
        let malformed = || Error::configuration(format!("malformed git repo URL {url}"),);

        let parsed = Url::parse(url.trim(),).map_err(|_| malformed(),)?;
        let host = match (parsed.host_str(), parsed.port(),) {
            (Some(host,), Some(port,),) => format!("{host}:{port}"),
            (Some(host,), None,) => host.to_owned(),
            (None, _,) => return Err(malformed(),),
        };

        let captures = REPO_PATH.captures(parsed.path(),).ok_or_else(malformed,)?;
        let owner = captures.get(1,).map(|value| value.as_str(),).unwrap_or_default();
        let name = captures.get(2,).map(|value| value.as_str(),).unwrap_or_default();
        if owner.is_empty() || name.is_empty() {
            return Err(malformed(),);
        }

        Ok(Self {
            host,
            owner: owner.to_owned(),
            name: name.to_owned(),
            default_branch: options
                .default_branch
                .filter(|branch| !branch.trim().is_empty(),)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_owned(),),
            distribution_path: options
                .distribution_path
                .unwrap_or_else(|| DEFAULT_DISTRIBUTION_PATH.to_owned(),),
        },)
    }

    /// Reads the repository URL from a `package.json` file and parses it.
    ///
    /// Both `"repository": "<url>"` and `"repository": { "url": "<url>" }`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read,
    /// [`Error::PackageJson`] when it is not valid JSON and
    /// [`Error::Configuration`] when the repository entry is missing or
    /// malformed.
    pub fn from_package_metadata(path: &Path, options: RepositoryOptions,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        let package: PackageMetadata = serde_json::from_str(&contents,)?;
        let url = package.repository.map(RepositoryField::into_url,).ok_or_else(|| {
            Error::configuration(format!("{} has no repository URL", path.display()),)
        },)?;

        Self::parse(&url, options,)
    }

    /// Host of the repository, including an explicit port.
    pub fn host(&self,) -> &str
    {
        &self.host
    }

    /// Account owning the repository.
    pub fn owner(&self,) -> &str
    {
        &self.owner
    }

    /// Repository name without a `.git` suffix.
    pub fn name(&self,) -> &str
    {
        &self.name
    }

    /// Branch referenced by raw download links.
    pub fn default_branch(&self,) -> &str
    {
        &self.default_branch
    }

    /// Directory holding built userscripts.
    pub fn distribution_path(&self,) -> &str
    {
        &self.distribution_path
    }

    /// Canonical web URL of the repository.
    pub fn repo_url(&self,) -> String
    {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }

    /// Issue tracker URL.
    pub fn support_url(&self,) -> String
    {
        format!("{}/issues", self.repo_url())
    }

    /// Repository-relative path of the built userscript.
    pub fn userscript_path(&self, base_name: &str,) -> String
    {
        let directory = self.distribution_path.trim_end_matches('/',);
        if directory.is_empty() || directory == "." {
            format!("{base_name}.user.js")
        } else {
            format!("{directory}/{base_name}.user.js")
        }
    }

    /// Raw content URL of the built userscript, used for installs and updates.
    pub fn userscript_raw_url(&self, base_name: &str,) -> String
    {
        format!(
            "https://raw.{}/{}/{}/{}/{}",
            self.host,
            self.owner,
            self.name,
            self.default_branch,
            self.userscript_path(base_name)
        )
    }

    /// Link to the README section whose heading is `display_name`.
    pub fn readme_section_url(&self, display_name: &str,) -> String
    {
        format!("{}#{}", self.repo_url(), slugify(display_name))
    }

    /// Markdown badge links to install the userscript and to view its source.
    ///
    /// The install link always precedes the source link.
    pub fn source_and_install_button(&self, base_name: &str,) -> String
    {
        let path = self.userscript_path(base_name,);
        format!(
            "\n[![Install]({INSTALL_BADGE_URL})]({path}?raw=1)\n[![Source]({SOURCE_BADGE_URL})]({path})\n"
        )
    }
}

#[derive(Debug, Deserialize,)]
struct PackageMetadata
{
    #[serde(default)]
    repository: Option<RepositoryField,>,
}

#[derive(Debug, Deserialize,)]
#[serde(untagged)]
enum RepositoryField
{
    Url(String,),
    Object
    {
        url: String,
    },
}

impl RepositoryField
{
    fn into_url(self,) -> String
    {
        match self {
            Self::Url(url,) => url,
            Self::Object {
                url,
            } => url,
        }
    }
}
