// Criterion benchmarks for ctc-graph.
//
// Uses a synthetic vocabulary so no external data is needed.
//
// Run:
//   cargo bench -p ctc-graph

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ctc_fsa::Label;
use ctc_graph::topo::{build_ctc_topo, build_ctc_topo_modified};
use ctc_graph::{CompilerConfig, CtcTrainingGraphCompiler, Lexicon, SymbolTable, TopologyKind};

// ---------------------------------------------------------------------------
// Synthetic language
// ---------------------------------------------------------------------------

const NUM_PHONES: usize = 70;
const NUM_WORDS: usize = 2000;

/// Each word gets a deterministic three-phone pronunciation.
fn synthetic_compiler(kind: TopologyKind) -> CtcTrainingGraphCompiler {
    let phone_names: Vec<String> = (1..=NUM_PHONES).map(|i| format!("p{i}")).collect();
    let word_names: Vec<String> = (0..NUM_WORDS).map(|i| format!("w{i}")).collect();

    let phones = SymbolTable::from_pairs(
        std::iter::once(("<eps>".to_string(), 0))
            .chain(phone_names.iter().cloned().zip(1..)),
    )
    .expect("phone table");
    let words = SymbolTable::from_pairs(
        [("<eps>".to_string(), 0), ("<UNK>".to_string(), 1)]
            .into_iter()
            .chain(word_names.iter().cloned().zip(2..)),
    )
    .expect("word table");

    let lexicon = Lexicon::from_entries(
        std::iter::once(("<UNK>".to_string(), vec![phone_names[0].clone()])).chain(
            word_names.iter().enumerate().map(|(i, w)| {
                let pron = (0..3)
                    .map(|k| phone_names[(i * 7 + k * 13) % NUM_PHONES].clone())
                    .collect();
                (w.clone(), pron)
            }),
        ),
    );
    let lexicon_inv = lexicon.build_inverted(&phones, &words).expect("lexicon");
    let config = CompilerConfig {
        topology: kind,
        ..CompilerConfig::default()
    };
    CtcTrainingGraphCompiler::new(lexicon_inv, phones, words, &config).expect("compiler")
}

fn transcripts() -> Vec<String> {
    (0..32)
        .map(|u| {
            (0..12)
                .map(|k| format!("w{}", (u * 37 + k * 101) % NUM_WORDS))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology");
    for n in [50usize, 200, 500] {
        let tokens: Vec<Label> = (0..=n as Label).collect();
        group.bench_with_input(BenchmarkId::new("normal", n), &tokens, |b, tokens| {
            b.iter(|| std::hint::black_box(build_ctc_topo(tokens).expect("topo")));
        });
        group.bench_with_input(BenchmarkId::new("modified", n), &tokens, |b, tokens| {
            b.iter(|| std::hint::black_box(build_ctc_topo_modified(tokens).expect("topo")));
        });
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let texts = transcripts();
    let mut group = c.benchmark_group("compile_32_utterances");
    for kind in [TopologyKind::Normal, TopologyKind::Modified] {
        let compiler = synthetic_compiler(kind);
        group.bench_function(kind.to_string(), |b| {
            b.iter(|| std::hint::black_box(compiler.compile(&texts).expect("compile")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_topology, bench_compile);
criterion_main!(benches);
