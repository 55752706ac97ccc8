// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Extraction of Markdown documentation from script sources.
//!
//! A script documents itself with its leading comment: either a `/** ... */`
//! block or a run of `//` line comments. Decorative asterisks and the comment
//! markers are removed; the remaining text is used verbatim as Markdown.

use std::{fs, path::Path};

use crate::error::{self, Error};

/// Reads `path` and returns its leading documentation comment.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read.
pub fn extract_documentation(path: &Path) -> Result<String, Error> {
    let source = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    Ok(documentation_from_source(&source))
}

/// Returns the leading documentation comment of `source`, or an empty string.
///
/// # Example
///
/// ```
/// use scriptsmith::documentation_from_source;
///
/// let source = "/**\n * Adds a *button*.\n * - Works offline\n */\nmain();\n";
/// assert_eq!(documentation_from_source(source), "Adds a *button*.\n- Works offline");
/// ```
pub fn documentation_from_source(source: &str) -> String {
    let body = source.trim_start_matches('\u{feff}').trim_start();

    let lines = if let Some(rest) = body.strip_prefix("/*") {
        let Some(end) = rest.find("*/") else {
            return String::new();
        };
        rest[..end]
            .trim_start_matches('*')
            .lines()
            .map(strip_block_decoration)
            .collect::<Vec<_>>()
    } else {
        body.lines()
            .map(str::trim_start)
            .take_while(|line| line.starts_with("//"))
            .map(strip_line_marker)
            .collect::<Vec<_>>()
    };

    trim_blank_lines(&lines).join("\n")
}

fn strip_block_decoration(line: &str) -> &str {
    let trimmed = line.trim_start();
    let content = match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed
    };
    content.trim_end()
}

fn strip_line_marker(line: &str) -> &str {
    let rest = line.trim_start_matches('/');
    rest.strip_prefix(' ').unwrap_or(rest).trim_end()
}

fn trim_blank_lines<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |index| index + 1);
    &lines[start..end]
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn block_comment_is_unwrapped() {
        let source = "/**\n * First line.\n *\n * - item\n *   nested\n */\nconsole.log(1);";
        assert_eq!(
            documentation_from_source(source),
            "First line.\n\n- item\n  nested"
        );
    }

    #[test]
    fn single_line_block_comment() {
        assert_eq!(documentation_from_source("/** Short doc. */ run();"), "Short doc.");
    }

    #[test]
    fn line_comments_are_collected_until_code() {
        let source = "// Title\n// more text\nconst x = 1;\n// not docs";
        assert_eq!(documentation_from_source(source), "Title\nmore text");
    }

    #[test]
    fn source_without_leading_comment_has_no_docs() {
        assert_eq!(documentation_from_source("run();\n/** late */"), "");
    }

    #[test]
    fn unterminated_block_yields_empty_docs() {
        assert_eq!(documentation_from_source("/** never closed"), "");
    }

    #[test]
    fn extract_reads_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("tool.js");
        fs::write(&path, "/** Tool docs */\n").expect("failed to write file");
        assert_eq!(extract_documentation(&path).expect("readable"), "Tool docs");
    }

    #[test]
    fn extract_reports_missing_file() {
        let result = extract_documentation(Path::new("/nonexistent/tool.js"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
