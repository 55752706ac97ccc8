// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Regular expression rules for `@include` and `@exclude` directives.
//!
//! Userscript managers accept `/regex/` literals in these directives. The
//! helpers anchor a domain-and-path pattern to a full HTTP(S) URL.

/// Components of a URL rule beyond the domain and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub struct UrlRuleOptions
{
    /// Accept an optional query string.
    pub allow_query:    bool,
    /// Accept an optional fragment.
    pub allow_fragment: bool,
}

impl Default for UrlRuleOptions
{
    fn default() -> Self
    {
        Self {
            allow_query: true, allow_fragment: true,
        }
    }
}

/// Builds a rule matching a full HTTP or HTTPS URL.
///
/// # Example
///
/// ```
/// use scriptsmith::{UrlRuleOptions, url_rule_regex};
///
/// let rule = url_rule_regex(r"example\.com/item/\d+", UrlRuleOptions::default());
/// assert_eq!(rule, r"/^https?://example\.com/item/\d+(\?.+?)?(#.+?)?$/");
/// ```
pub fn url_rule_regex(domain_and_path: &str, options: UrlRuleOptions,) -> String
{
    let mut rule = format!("/^https?://{domain_and_path}");

    if options.allow_query {
        rule.push_str(r"(\?.+?)?",);
    }
    if options.allow_fragment {
        rule.push_str("(#.+?)?",);
    }

    rule.push_str("$/",);
    rule
}

/// Builds a rule for a path on MusicBrainz, including its beta and test
/// servers.
pub fn musicbrainz_url_rule(path: &str,) -> String
{
    url_rule_regex(
        &format!(r"((beta|test)\.)?musicbrainz\.org/{path}"),
        UrlRuleOptions::default(),
    )
}
