extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};

use wemark_lib::convert;

const THEME_CSS: &str = "\
#write { max-width: 677px; color: rgb(51, 51, 51); font-size: 16px; }
#write h2 { font-size: 19px; font-weight: bold; }
p { text-align: justify; }
blockquote { border-left: 3px solid #ddd; padding: 8px 16px; }
code { background-color: #f6f6f6; padding: 2px 4px; }
";

fn bench_large_article(c: &mut Criterion) {
    let mut html = String::with_capacity(1_000_000);
    for i in 0..500 {
        html.push_str(&format!("<h2>Section {}</h2>", i));
        html.push_str("<p>Some body text with <strong>bold</strong> runs.</p>");
        html.push_str("<ul><li><strong>term</strong> description</li><li>plain item</li></ul>");
        html.push_str("<pre><code>let x = 1;\nlet y = 2;\n</code></pre>");
    }

    c.bench_function("large_article", |b| {
        b.iter(|| convert(&html, THEME_CSS))
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut html = String::new();
    for _ in 0..200 {
        html.push_str("<blockquote>");
    }
    html.push_str("<p>Deep</p>");
    for _ in 0..200 {
        html.push_str("</blockquote>");
    }

    c.bench_function("deep_nesting", |b| b.iter(|| convert(&html, THEME_CSS)));
}

criterion_group!(benches, bench_large_article, bench_deep_nesting);
criterion_main!(benches);
