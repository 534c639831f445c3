use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tessera_xpath31::StaticContext;
use tessera_xslt3::{Configuration, compile_avt, make_collation};

fn templates() -> [(&'static str, &'static str); 3] {
    [
        ("literal", "width: 100%; height: auto"),
        ("single", "{@id}"),
        (
            "mixed",
            "row-{position()} {if (@odd) then 'odd' else 'even'} {{static}} {string-join(@class, ' ')}",
        ),
    ]
}

fn generate_words(count: usize) -> Vec<String> {
    let stems = ["Über", "apple", "Äpfel", "zebra", "file", "Résumé", "resume"];
    (0..count)
        .map(|i| format!("{}{}", stems[i % stems.len()], i % 97))
        .collect()
}

fn benchmark_avt_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("avt_compilation");

    for backwards_compatible in [false, true] {
        let ctx = StaticContext::new().with_backwards_compatible(backwards_compatible);
        for (name, template) in templates() {
            group.bench_with_input(
                BenchmarkId::new(name, backwards_compatible),
                &template,
                |b, template| b.iter(|| compile_avt(template, 1, &ctx).unwrap()),
            );
        }
    }

    group.finish();
}

fn benchmark_collation_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("collation_sort");
    let config = Configuration::default();

    let variants: [(&str, &[(&str, &str)]); 3] = [
        ("tertiary", &[]),
        ("primary", &[("strength", "primary")]),
        ("alphanumeric", &[("alphanumeric", "yes"), ("case-order", "upper-first")]),
    ];

    for word_count in [100, 1000, 10000] {
        let words = generate_words(word_count);
        for (name, props) in variants {
            let props: HashMap<String, String> = props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let collation = make_collation(&config, "urn:bench", &props).unwrap();
            group.bench_with_input(BenchmarkId::new(name, word_count), &words, |b, words| {
                b.iter(|| {
                    let mut words = words.clone();
                    collation.sort(&mut words);
                    words
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_avt_compilation, benchmark_collation_sort);
criterion_main!(benches);
