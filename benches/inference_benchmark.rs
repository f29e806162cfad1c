//! Benchmarks for sectionize inference performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the inference pass over synthetic resume pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sectionize::parser::Patterns;
use sectionize::{
    parse_pages, BBox, InferOptions, PageContent, SegmentOptions, StyledFragment, TextBlock,
    TextLine,
};

const HEADINGS: [&str; 5] = ["Experience", "Education", "Projects", "Skills", "Awards"];

/// Creates a synthetic resume page with a few sections and dated entries.
fn create_test_page(number: usize) -> PageContent {
    let mut lines = Vec::new();
    for heading in HEADINGS {
        lines.push(TextLine::new(vec![StyledFragment::new(
            heading,
            "Calibri-Bold",
            14.0,
        )]));
        for entry in 0..4 {
            lines.push(TextLine::new(vec![StyledFragment::new(
                format!("Company {} | Jan 201{} - Present", number, entry),
                "Calibri",
                10.0,
            )]));
            for bullet in 0..3 {
                lines.push(TextLine::new(vec![StyledFragment::new(
                    format!("Delivered outcome {} for team {}", bullet, entry),
                    "Calibri",
                    10.0,
                )]));
            }
        }
    }

    let header = TextBlock::new(vec![
        TextLine::new(vec![StyledFragment::new("Jane Doe", "Calibri-Bold", 20.0)]),
        TextLine::new(vec![StyledFragment::new(
            "jane@x.com | 555-123-4567",
            "Calibri",
            10.0,
        )]),
    ]);
    PageContent::new(0, vec![header, TextBlock::new(lines)])
}

/// Benchmark pattern matching on typical lines.
fn bench_patterns(c: &mut Criterion) {
    let patterns = Patterns::new();

    c.bench_function("match_heading", |b| {
        b.iter(|| patterns.match_heading(black_box("Professional Experience")));
    });

    c.bench_function("match_heading_body", |b| {
        b.iter(|| patterns.match_heading(black_box("Gained experience shipping 2 products")));
    });

    c.bench_function("find_date_range", |b| {
        b.iter(|| patterns.find_date_range(black_box("Acme Corp | Jan 2019 - Present")));
    });
}

/// Benchmark full inference at various page counts.
fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");

    for page_count in [1, 5, 20].iter() {
        let pages: Vec<PageContent> = (0..*page_count).map(create_test_page).collect();

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            b.iter(|| parse_pages(black_box(pages.clone()), InferOptions::default()));
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            b.iter(|| parse_pages(black_box(pages.clone()), InferOptions::new().sequential()));
        });
    }

    group.finish();
}

/// Benchmark segmentation of a flat fragment stream.
fn bench_segmentation(c: &mut Criterion) {
    let fragments: Vec<StyledFragment> = (0..400)
        .map(|i| {
            let y = i as f32 * 14.0 + (i / 10) as f32 * 30.0;
            StyledFragment::new(format!("line {}", i), "Calibri", 10.0)
                .with_bbox(BBox::new(40.0, y, 300.0, y + 12.0))
        })
        .collect();
    let segmenter = sectionize::parser::Segmenter::new(SegmentOptions::default());

    c.bench_function("segment_400_fragments", |b| {
        b.iter(|| segmenter.segment(black_box(fragments.clone())));
    });
}

criterion_group!(benches, bench_patterns, bench_inference, bench_segmentation);
criterion_main!(benches);
