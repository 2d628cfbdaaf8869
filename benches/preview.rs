//! Benchmarks for the live preview.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdpad::preview::render;

fn sample_document() -> String {
    let section = "## Section\n\n\
        Some **bold** and *emphasized* text with `inline code` and a \
        [link](https://example.com) that wraps across the preview pane.\n\n\
        - first item\n- [x] done task\n  - nested item\n\n\
        > quoted line\n\n\
        ```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n\
        | name | value |\n|:-----|------:|\n| a | 1 |\n| bb | 22 |\n\n";
    let mut doc = String::from("# Notes\n\n");
    for _ in 0..20 {
        doc.push_str(section);
    }
    doc
}

fn bench_render(c: &mut Criterion) {
    let md = sample_document();

    c.bench_function("render_preview", |b| {
        b.iter(|| render(black_box(&md), black_box(60)))
    });
}

fn bench_render_keystroke(c: &mut Criterion) {
    let mut md = sample_document();
    md.push('x');

    c.bench_function("render_preview_narrow", |b| {
        b.iter(|| render(black_box(&md), black_box(24)))
    });
}

criterion_group!(benches, bench_render, bench_render_keystroke);
criterion_main!(benches);
