//! Benchmarks for the conversion pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use blockbridge::{
    BlockNode, MarkupOptions, blocks_to_html, html_to_blocks, parse_markup,
    serialize_blocks_to_markup,
};

/// A landing page with a bit of everything: nesting, control attributes,
/// mixed content, preformatted text and inline SVG.
fn sample_page(sections: usize) -> String {
    let mut html = String::from(
        r#"<header class="site" data-block-name="Header"><nav><ul loopsource="menu" loopvariable="link"><li><a href="{{ link.url }}">{{ link.title }}</a></li></ul></nav></header>"#,
    );
    for i in 0..sections {
        html.push_str(&format!(
            r#"
<section id="s{i}" class="py-12" conditionalexpression="show_{i}">
    <h2>Section {i}</h2>
    <p>Some <strong>mixed</strong> content with an <a href="/x?a=1&amp;b=2">entity</a>.</p>
    <div class="grid">
        <figure><img src="/img/{i}.png" alt="Figure {i}"><figcaption>Caption {i}</figcaption></figure>
        <pre><code>let x = {i};
    println!("{{x}}");</code></pre>
        <svg viewBox="0 0 24 24"><path d="M12 2L2 22h20z"/></svg>
    </div>
</section>"#
        ));
    }
    html
}

fn sample_blocks() -> Vec<BlockNode> {
    html_to_blocks(&sample_page(50))
}

// ============================================================================
// HTML Benchmarks
// ============================================================================

fn bench_html_to_blocks(c: &mut Criterion) {
    let html = sample_page(50);
    c.bench_function("html_to_blocks", |b| {
        b.iter(|| html_to_blocks(black_box(&html)));
    });
}

fn bench_blocks_to_html(c: &mut Criterion) {
    let blocks = sample_blocks();
    c.bench_function("blocks_to_html", |b| {
        b.iter(|| blocks_to_html(black_box(&blocks)).unwrap());
    });
}

// ============================================================================
// Markup Benchmarks
// ============================================================================

fn bench_serialize_markup(c: &mut Criterion) {
    let blocks = sample_blocks();
    c.bench_function("serialize_markup", |b| {
        b.iter(|| serialize_blocks_to_markup(black_box(&blocks), MarkupOptions::default()).unwrap());
    });
}

fn bench_parse_markup(c: &mut Criterion) {
    let markup = serialize_blocks_to_markup(&sample_blocks(), MarkupOptions::default()).unwrap();
    c.bench_function("parse_markup", |b| {
        b.iter(|| parse_markup(black_box(&markup), MarkupOptions::default()).unwrap());
    });
}

criterion_group!(
    benches,
    bench_html_to_blocks,
    bench_blocks_to_html,
    bench_serialize_markup,
    bench_parse_markup,
);
criterion_main!(benches);
