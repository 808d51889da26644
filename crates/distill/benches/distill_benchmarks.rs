//! Distillation performance benchmarks.
//!
//! Measures fixpoint evaluation and full distillation across graph sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use distill::{
    DistillOptions, Distiller, Document, Graph, InferenceEngine, RuleDistiller, RuleEngine,
    Ruleset, Statement, Term, TextAnnotation,
};

const NER: &str = "http://pikes.fbk.eu/ner/";
const NER_TYPES: &[&str] = &["PERSON", "ORGANIZATION", "LOCATION", "DATE"];

fn ex(local: &str) -> Term {
    Term::iri(format!("http://example.org/{}", local))
}

/// Generate a synthetic extraction graph of `entities` typed mentions linked
/// into a chain.
fn generate_kem_graph(entities: usize) -> Graph {
    let mut graph = Graph::with_capacity(entities * 2);
    let knows = Term::iri("http://xmlns.com/foaf/0.1/knows");

    for i in 0..entities {
        let entity = ex(&format!("entity_{}", i));
        let class = NER_TYPES[i % NER_TYPES.len()];
        graph.insert(Statement::typed(
            entity.clone(),
            Term::iri(format!("{}{}", NER, class)),
        ));
        if i > 0 {
            graph.insert(Statement::new(entity, knows.clone(), ex(&format!("entity_{}", i - 1))));
        }
    }

    graph
}

/// Generate a `locatedIn` chain whose transitive closure is quadratic.
fn generate_chain(length: usize) -> Graph {
    let located_in = ex("locatedIn");
    (0..length)
        .map(|i| {
            Statement::new(
                ex(&format!("place_{}", i)),
                located_in.clone(),
                ex(&format!("place_{}", i + 1)),
            )
        })
        .collect()
}

/// Benchmark the fixpoint on a transitive chain.
fn bench_fixpoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixpoint_transitive");
    let ruleset = Ruleset::parse(
        "bench.rules",
        "@prefix ex: <http://example.org/> .
         rule trans where { ?x ex:locatedIn ?y . ?y ex:locatedIn ?z } insert { ?x ex:locatedIn ?z } .",
    )
    .unwrap();
    let engine = RuleEngine::new();

    for length in [16, 64, 128].iter() {
        let graph = generate_chain(*length);

        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("length", length), &graph, |b, graph| {
            b.iter(|| black_box(engine.evaluate(&ruleset, graph).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark full distillation with the bundled ruleset and mappings.
fn bench_distill_bundled(c: &mut Criterion) {
    let mut group = c.benchmark_group("distill_bundled");
    let distiller = RuleDistiller::new(None, None).unwrap();

    for entities in [10, 100, 1_000].iter() {
        let graph = generate_kem_graph(*entities);

        group.throughput(Throughput::Elements(graph.len() as u64));
        group.bench_with_input(BenchmarkId::new("entities", entities), &graph, |b, graph| {
            b.iter_with_setup(
                || Document::from_graph(graph.clone()),
                |mut doc| {
                    distiller.distill(&mut doc, &DistillOptions::default()).unwrap();
                    black_box(doc)
                },
            )
        });
    }

    group.finish();
}

/// Benchmark text materialization plus distillation.
fn bench_text_documents(c: &mut Criterion) {
    let distiller = RuleDistiller::new(None, None).unwrap();
    let text = "Barack Obama visited Rome and met the Italian president. ".repeat(20);

    c.bench_function("distill_text_document", |b| {
        b.iter(|| {
            let mut doc = Document::from_annotation(TextAnnotation::new(text.as_str()));
            distiller.distill(&mut doc, &DistillOptions::default()).unwrap();
            black_box(doc)
        })
    });
}

criterion_group!(
    benches,
    bench_fixpoint,
    bench_distill_bundled,
    bench_text_documents,
);
criterion_main!(benches);
