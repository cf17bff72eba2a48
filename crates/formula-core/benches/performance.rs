use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use formula_core::Document;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A long sum of fractions with scripts, exercising nested block parsing.
fn large_markup(terms: usize) -> String {
    let mut out = String::with_capacity(terms * 24);
    for i in 0..terms {
        if i > 0 {
            out.push('+');
        }
        out.push_str(&format!("\\frac{{x_{}}}{{{}}}^2", i % 10, i % 7 + 1));
    }
    out
}

fn bench_parse_large_markup(c: &mut Criterion) {
    let markup = large_markup(2_000);
    c.bench_function("parse_markup/2k_terms", |b| {
        b.iter(|| {
            let mut doc = Document::new();
            doc.set_markup(black_box(&markup));
            black_box(doc.tree().children(doc.root()).count());
        })
    });
}

fn bench_serialize_large_document(c: &mut Criterion) {
    let markup = large_markup(2_000);
    let mut doc = Document::new();
    doc.set_markup(&markup);
    c.bench_function("serialize_markup/2k_terms", |b| {
        b.iter(|| black_box(doc.get_markup()))
    });
}

fn bench_typing_burst(c: &mut Criterion) {
    // A mix of plain symbols, operators, and structure-building characters.
    let keys: Vec<char> = "x+y2^3/(ab)=c*d-".chars().collect();
    c.bench_function("typing_burst/500_chars", |b| {
        b.iter_batched(
            || (Document::new(), StdRng::seed_from_u64(17)),
            |(mut doc, mut rng)| {
                for _ in 0..500 {
                    let ch = keys[rng.gen_range(0..keys.len())];
                    doc.typed_char(ch);
                }
                black_box(doc.get_markup());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_cursor_traversal(c: &mut Criterion) {
    let markup = large_markup(200);
    c.bench_function("cursor_walk/200_terms", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::new();
                doc.set_markup(&markup);
                doc
            },
            |mut doc| {
                // Walk every gap from the end back to the start of the root.
                while doc.cursor_position().prev.is_some()
                    || doc.cursor_position().parent != doc.root()
                {
                    doc.move_left();
                }
                black_box(doc.cursor_position());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_parse_large_markup,
    bench_serialize_large_document,
    bench_typing_burst,
    bench_cursor_traversal
);
criterion_main!(benches);
