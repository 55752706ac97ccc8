// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Casing helpers for documentation headings and anchors.
//!
//! Anchors produced by [`slugify`] follow the rules markdown renderers use
//! for heading identifiers, so a link built from a heading's text always
//! resolves to that heading.

/// Converts heading text into the fragment identifier of that heading.
///
/// Letters and digits are lowercased, spaces become hyphens, hyphens and
/// underscores are kept and every other character is dropped. Consecutive
/// separators are preserved, matching how rendered headings are anchored.
///
/// # Examples
///
/// ```
/// use scriptsmith::slugify;
///
/// assert_eq!(slugify("MusicBrainz: Edit Helper"), "musicbrainz-edit-helper");
/// ```
pub fn slugify(source: &str,) -> String
{
    let trimmed = source.trim();
    let mut slug = String::with_capacity(trimmed.len(),);

    for candidate in trimmed.chars() {
        match candidate {
            ' ' => slug.push('-',),
            '-' | '_' => slug.push(candidate,),
            _ if candidate.is_alphanumeric() => slug.extend(candidate.to_lowercase(),),
            _ => {}
        }
    }

    slug
}

/// Converts a camelCase identifier (such as a file name) into Title Case.
///
/// Acronyms stay together: `exportAsJSONFile` becomes `Export As JSON File`.
///
/// # Examples
///
/// ```
/// use scriptsmith::camel_to_title_case;
///
/// assert_eq!(camel_to_title_case("relateThisEntity"), "Relate This Entity");
/// ```
pub fn camel_to_title_case(source: &str,) -> String
{
    let characters: Vec<char,> = source.chars().collect();
    let mut title = String::with_capacity(source.len() + 8,);

    for (index, &current,) in characters.iter().enumerate() {
        if index == 0 {
            title.extend(current.to_uppercase(),);
            continue;
        }

        let previous = characters[index - 1];
        let next = characters.get(index + 1,).copied();
        let word_start = current.is_uppercase()
            && (previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next.is_some_and(char::is_lowercase,)));

        if word_start {
            title.push(' ',);
        }
        title.push(current,);
    }

    title
}
