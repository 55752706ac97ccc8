// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Metadata block rendering.
///
/// The block is consumed by userscript managers, so field names, padding and
/// delimiter lines are a compatibility surface.
use crate::metadata::{METADATA_ORDER, MetadataField, MetadataRecord};

/// Opening delimiter of the metadata block.
pub const BLOCK_START: &str = "// ==UserScript==";
/// Closing delimiter of the metadata block.
pub const BLOCK_END: &str = "// ==/UserScript==";

/// Renders `record` in [`METADATA_ORDER`].
///
/// # Example
///
/// ```
/// use scriptsmith::{MetadataField, MetadataRecord, render_metadata_block};
///
/// let record = MetadataRecord::new()
///     .with(MetadataField::Name, "Example")
///     .with(MetadataField::Description, "Does things");
/// assert_eq!(
///     render_metadata_block(&record),
///     "// ==UserScript==\n// @name          Example\n// @description   Does things\n// ==/UserScript==\n"
/// );
/// ```
pub fn render_metadata_block(record: &MetadataRecord) -> String {
    render_with_schema(record, &METADATA_ORDER)
}

/// Renders `record` following the field order of `schema`.
///
/// Every field name is padded to the longest name in `schema`, whether or
/// not that field is present. Fields outside `schema` are not rendered.
pub fn render_with_schema(record: &MetadataRecord, schema: &[MetadataField]) -> String {
    let width = schema_width(schema);
    let mut lines = Vec::with_capacity(record.len() + 2);
    lines.push(BLOCK_START.to_owned());

    for field in schema {
        let Some(value) = record.get(*field) else {
            continue;
        };
        for rendered in value.rendered_values() {
            lines.push(format!("// @{:<width$} {rendered}", field.as_str()));
        }
    }

    lines.push(format!("{BLOCK_END}\n"));
    lines.join("\n")
}

/// Length of the longest field name in `schema`.
pub fn schema_width(schema: &[MetadataField]) -> usize {
    schema
        .iter()
        .map(|field| field.as_str().len())
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::metadata::MetadataValue;

    fn minimal() -> MetadataRecord {
        MetadataRecord::new()
            .with(MetadataField::Name, "Example")
            .with(MetadataField::Description, "Does things")
    }

    #[test]
    fn full_schema_width_is_longest_field_name() {
        assert_eq!(schema_width(&METADATA_ORDER), "exclude-match".len());
    }

    #[test]
    fn minimal_record_renders_delimiters_and_two_lines() {
        let block = render_metadata_block(&minimal());
        assert_eq!(
            block,
            "// ==UserScript==\n// @name          Example\n// @description   Does things\n// ==/UserScript==\n"
        );
    }

    #[test]
    fn short_fields_are_padded_to_full_schema_width() {
        let short = render_metadata_block(&MetadataRecord::new().with(MetadataField::Name, "A"));
        let long = render_metadata_block(
            &MetadataRecord::new()
                .with(MetadataField::Name, "A")
                .with(MetadataField::ExcludeMatch, "*://x/*")
        );

        let short_line = short.lines().nth(1).expect("name line");
        let long_line = long.lines().nth(1).expect("name line");
        assert_eq!(short_line, long_line);
        assert_eq!(
            long.lines().nth(2),
            Some("// @exclude-match *://x/*")
        );
    }

    #[test]
    fn list_values_render_one_line_each_in_order() {
        let record = minimal().with(
            MetadataField::Grant,
            vec!["a".to_owned(), "b".to_owned()]
        );
        let block = render_metadata_block(&record);
        let grants: Vec<_> = block.lines().filter(|line| line.starts_with("// @grant")).collect();
        assert_eq!(grants, ["// @grant         a", "// @grant         b"]);
    }

    #[test]
    fn true_flag_renders_padding_and_empty_value() {
        let record = minimal().with(MetadataField::Noframes, true);
        let block = render_metadata_block(&record);
        assert!(block.contains("\n// @noframes      \n"));
    }

    #[test]
    fn falsy_values_are_dropped() {
        let record = minimal()
            .with(MetadataField::Noframes, false)
            .with(MetadataField::Icon, "")
            .with(MetadataField::Match, Vec::<String>::new());
        assert_eq!(render_metadata_block(&record), render_metadata_block(&minimal()));
    }

    #[test]
    fn custom_schema_controls_order_and_width() {
        let record = minimal();
        let block = render_with_schema(
            &record,
            &[MetadataField::Description, MetadataField::Name]
        );
        assert_eq!(
            block,
            "// ==UserScript==\n// @description Does things\n// @name        Example\n// ==/UserScript==\n"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let record = minimal().with(MetadataField::Grant, "none");
        assert_eq!(render_metadata_block(&record), render_metadata_block(&record));
    }

    fn arbitrary_field() -> impl Strategy<Value = MetadataField> {
        (0..METADATA_ORDER.len()).prop_map(|index| METADATA_ORDER[index])
    }

    proptest! {
        #[test]
        fn output_follows_schema_order_regardless_of_insertion(
            fields in proptest::collection::vec(arbitrary_field(), 1..23)
        ) {
            let mut forward = MetadataRecord::new();
            let mut backward = MetadataRecord::new();
            for field in &fields {
                forward.set(*field, MetadataValue::Text(field.as_str().to_owned()));
            }
            for field in fields.iter().rev() {
                backward.set(*field, MetadataValue::Text(field.as_str().to_owned()));
            }

            let rendered = render_metadata_block(&forward);
            prop_assert_eq!(&rendered, &render_metadata_block(&backward));

            let positions: Vec<usize> = rendered
                .lines()
                .skip(1)
                .filter_map(|line| line.strip_prefix("// @"))
                .filter_map(|rest| rest.split_whitespace().next())
                .filter_map(|name| METADATA_ORDER.iter().position(|field| field.as_str() == name))
                .collect();
            let mut sorted = positions.clone();
            sorted.sort_unstable();
            prop_assert_eq!(positions, sorted);
        }
    }
}
