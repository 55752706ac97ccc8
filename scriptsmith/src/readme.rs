// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// README generation.
///
/// The document consists of the header fragment, one section per userscript
/// (optionally followed by its bookmarklet variant and matching documentation
/// fragments), a section for bookmarklets without a userscript and finally
/// every remaining documentation fragment.
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    casing::camel_to_title_case,
    error::{self, Error},
    repository::RepositoryReference,
};

/// Section describing one userscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserscriptSection {
    /// File name without `.user.js`.
    pub base_name:    String,
    /// Formatted heading.
    pub display_name: String,
    /// Description paragraph.
    pub description:  String,
    /// Bullet points, written verbatim.
    pub features:     Vec<String>
}

/// Section describing one bookmarklet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkletSection {
    /// Entry file name, e.g. `relateThis.js`.
    pub file_name:     String,
    /// Link target for the heading of a standalone bookmarklet.
    pub source_link:   String,
    /// Documentation extracted from the source.
    pub documentation: String,
    /// `javascript:` URI.
    pub code:          String
}

impl BookmarkletSection {
    fn base_name(&self) -> &str {
        self.file_name
            .strip_suffix(".js")
            .unwrap_or(&self.file_name)
    }
}

/// Additional Markdown document appended to the README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFragment {
    /// File name inside the documentation directory.
    pub file_name: String,
    /// Raw Markdown.
    pub content:   String
}

impl DocFragment {
    fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".md")
            .unwrap_or(&self.file_name)
    }
}

/// Everything needed to write the README, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeDocument {
    /// Contents of `_header.md`.
    pub header:       String,
    /// Userscript sections.
    pub userscripts:  Vec<UserscriptSection>,
    /// Built bookmarklets.
    pub bookmarklets: Vec<BookmarkletSection>,
    /// Documentation fragments.
    pub fragments:    Vec<DocFragment>
}

/// Writes the README to `path`.
///
/// The file handle is owned by this function and closed on every path.
///
/// # Errors
///
/// Returns [`Error::Write`] when the file cannot be created or written.
pub fn write_readme(
    path: &Path,
    document: &ReadmeDocument,
    repository: &RepositoryReference
) -> Result<(), Error> {
    info!("Writing README to {}", path.display());
    let file = File::create(path).map_err(|source| error::write_error(path, source))?;
    let mut writer = BufWriter::new(file);

    render_readme(&mut writer, document, repository)
        .and_then(|()| writer.flush())
        .map_err(|source| error::write_error(path, source))
}

/// Renders the README into `writer`.
///
/// # Errors
///
/// Propagates write failures of `writer`.
pub fn render_readme<W: Write>(
    writer: &mut W,
    document: &ReadmeDocument,
    repository: &RepositoryReference
) -> io::Result<()> {
    let mut bookmarklets: Vec<&BookmarkletSection> = document.bookmarklets.iter().collect();
    let mut fragments: Vec<&DocFragment> = document.fragments.iter().collect();

    writer.write_all(document.header.as_bytes())?;
    writer.write_all(b"\n## Userscripts\n")?;

    for script in &document.userscripts {
        write!(writer, "\n### {}\n", script.display_name)?;
        write!(writer, "\n{}\n", script.description)?;
        for feature in &script.features {
            writeln!(writer, "- {feature}")?;
        }
        writer.write_all(repository.source_and_install_button(&script.base_name).as_bytes())?;

        if let Some(index) = bookmarklets
            .iter()
            .position(|bookmarklet| bookmarklet.base_name() == script.base_name)
        {
            let bookmarklet = bookmarklets.remove(index);
            debug!("Nesting bookmarklet {} under {}", bookmarklet.file_name, script.base_name);
            writer.write_all(b"\nAlso available as a bookmarklet with less features:\n")?;
            writeln!(writer, "{}", bookmarklet.documentation)?;
            write_snippet(writer, &bookmarklet.code)?;
        }

        for fragment in take_fragments_of(&mut fragments, &script.base_name, &document.userscripts) {
            write!(writer, "\n{}", fragment.content)?;
        }
    }

    if !bookmarklets.is_empty() {
        writer.write_all(b"\n## Bookmarklets\n")?;

        for bookmarklet in bookmarklets {
            write!(
                writer,
                "\n### [{}]({})\n",
                camel_to_title_case(bookmarklet.base_name()),
                bookmarklet.source_link
            )?;
            writeln!(writer, "{}", bookmarklet.documentation)?;
            write_snippet(writer, &bookmarklet.code)?;
        }
    }

    for fragment in fragments {
        write!(writer, "\n{}", fragment.content)?;
    }

    Ok(())
}

fn write_snippet<W: Write>(writer: &mut W, code: &str) -> io::Result<()> {
    write!(writer, "\n```js\n{code}\n```\n")
}

/// Removes and returns the fragments belonging to `base_name`.
///
/// A fragment belongs to the userscript with the longest base name that
/// prefixes its file stem, so `editPlus-usage.md` is not claimed by `edit`.
fn take_fragments_of<'a>(
    fragments: &mut Vec<&'a DocFragment>,
    base_name: &str,
    userscripts: &[UserscriptSection]
) -> Vec<&'a DocFragment> {
    let owner_of = |fragment: &DocFragment| {
        userscripts
            .iter()
            .map(|script| script.base_name.as_str())
            .filter(|candidate| fragment.stem().starts_with(candidate))
            .max_by_key(|candidate| candidate.len())
            .map(str::to_owned)
    };

    let mut taken = Vec::new();
    fragments.retain(|fragment| {
        if owner_of(*fragment).as_deref() == Some(base_name) {
            taken.push(*fragment);
            false
        } else {
            true
        }
    });
    taken
}

/// Link target for a standalone bookmarklet heading.
///
/// Prefers the module of the same name under `{root}/src`, falling back to
/// the bookmarklet file itself.
pub fn relevant_source_file(root: &Path, file_name: &str, bookmarklet_dir: &str) -> String {
    if root.join("src").join(file_name).exists() {
        format!("src/{file_name}")
    } else {
        let directory = bookmarklet_dir.trim_end_matches('/');
        format!("{directory}/{file_name}")
    }
}
