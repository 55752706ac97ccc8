// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use scriptsmith::{
    MetadataField, MetadataRecord, RepositoryOptions, RepositoryReference, render_metadata_block,
    slugify,
};

fn sample_record() -> MetadataRecord
{
    MetadataRecord::new()
        .with(MetadataField::Name, "MusicBrainz: Batch Edit",)
        .with(MetadataField::Author, "octocat",)
        .with(MetadataField::Namespace, "https://github.com/octocat/userscripts",)
        .with(MetadataField::Version, "2024.5.6",)
        .with(MetadataField::Description, "Edits many entities at once.",)
        .with(
            MetadataField::Match,
            vec![
                "*://*.musicbrainz.org/release/*".to_owned(),
                "*://*.musicbrainz.org/recording/*".to_owned(),
            ],
        )
        .with(MetadataField::Grant, "none",)
        .with(MetadataField::Noframes, true,)
}

fn benchmark_render_small(c: &mut Criterion,)
{
    let record = sample_record();

    c.bench_function("render_metadata_block", |b| {
        b.iter(|| render_metadata_block(black_box(&record,),),)
    },);
}

fn benchmark_render_many_matches(c: &mut Criterion,)
{
    let patterns = (0..100)
        .map(|i| format!("*://example{i}.org/*"),)
        .collect::<Vec<_,>>();
    let record = sample_record().with(MetadataField::Match, patterns,);

    c.bench_function("render_metadata_block_100_matches", |b| {
        b.iter(|| black_box(render_metadata_block(black_box(&record,),).len(),),)
    },);
}

fn benchmark_repository_parse(c: &mut Criterion,)
{
    c.bench_function("repository_parse", |b| {
        b.iter(|| {
            RepositoryReference::parse(
                black_box("git+https://github.com/octocat/userscripts.git",),
                RepositoryOptions::default(),
            )
            .expect("parse failed",)
        },)
    },);
}

fn benchmark_slugify(c: &mut Criterion,)
{
    c.bench_function("slugify_heading", |b| {
        b.iter(|| slugify(black_box("MusicBrainz: Voice actor credits (ELAN)",),),)
    },);
}

criterion_group!(
    benches,
    benchmark_render_small,
    benchmark_render_many_matches,
    benchmark_repository_parse,
    benchmark_slugify
);
criterion_main!(benches);
