// ctc-compile: Compile word transcripts into CTC training graphs.
//
// Reads transcripts from stdin (one per line) or from arguments and prints a
// summary of each compiled graph, or the graph itself in text form.
//
// Usage:
//   ctc-compile [-l LANG_DIR] [OPTIONS] [TRANSCRIPT...]
//
// Options:
//   -l, --lang-dir PATH   Directory with phones.txt, words.txt, lexicon.txt
//   --topo KIND           Topology: normal or modified (default: modified)
//   --oov WORD            Out-of-vocabulary word (default: <UNK>)
//   --config FILE         JSON compiler config (flags override it)
//   --print-fsa           Print each graph in text form
//   -h, --help            Print help

use std::io::{self, BufRead, Write};

use ctc_graph::topo::collapse;
use ctc_graph::{CompilerConfig, TopologyKind};

fn main() {
    ctc_cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (lang_dir, args) = ctc_cli::take_option(&args, "--lang-dir", "-l");
    let (config_path, args) = ctc_cli::take_option(&args, "--config", "");
    let (topo, args) = ctc_cli::take_option(&args, "--topo", "");
    let (oov, args) = ctc_cli::take_option(&args, "--oov", "");

    if ctc_cli::wants_help(&args) {
        println!("ctc-compile: Compile transcripts into CTC training graphs.");
        println!();
        println!("Usage: ctc-compile [-l LANG_DIR] [OPTIONS] [TRANSCRIPT...]");
        println!();
        println!("If TRANSCRIPT arguments are given, compiles each of them.");
        println!("Otherwise reads transcripts from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -l, --lang-dir PATH   Directory with phones.txt, words.txt, lexicon.txt");
        println!("  --topo KIND           Topology: normal or modified (default: modified)");
        println!("  --oov WORD            Out-of-vocabulary word (default: <UNK>)");
        println!("  --config FILE         JSON compiler config (flags override it)");
        println!("  --print-fsa           Print each graph in text form");
        println!("  -h, --help            Print this help");
        return;
    }

    let print_fsa = args.iter().any(|a| a == "--print-fsa");
    let transcripts: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let mut config = match config_path {
        Some(path) => CompilerConfig::from_json_file(&path)
            .unwrap_or_else(|e| ctc_cli::fatal(&format!("failed to load config: {e}"))),
        None => CompilerConfig::default(),
    };
    if let Some(topo) = topo {
        config.topology = topo
            .parse::<TopologyKind>()
            .unwrap_or_else(|e| ctc_cli::fatal(&e));
    }
    if let Some(oov) = oov {
        config.oov = oov;
    }

    let lang = ctc_cli::load_lang(lang_dir.as_deref()).unwrap_or_else(|e| ctc_cli::fatal(&e));
    let phones = lang.phones.clone();
    let compiler = lang
        .into_compiler(&config)
        .unwrap_or_else(|e| ctc_cli::fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let compile_line = |text: &str, out: &mut io::BufWriter<io::StdoutLock<'_>>| {
        let graph = compiler
            .compile_one(text)
            .unwrap_or_else(|e| ctc_cli::fatal(&e.to_string()));
        if print_fsa {
            let _ = writeln!(out, "# {text}");
            let _ = write!(out, "{graph}");
            return;
        }
        if graph.is_empty() {
            let _ = writeln!(out, "{text}: (empty graph)");
            return;
        }
        let best = graph
            .shortest_path()
            .map(|path| {
                collapse(&path.labels)
                    .iter()
                    .map(|&id| phones.symbol(id).unwrap_or("?").to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{text}: {} states, {} arcs [{best}]",
            graph.num_states(),
            graph.num_arcs()
        );
    };

    if transcripts.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.unwrap_or_else(|e| ctc_cli::fatal(&format!("failed to read stdin: {e}")));
            compile_line(line.trim(), &mut out);
        }
    } else {
        for text in &transcripts {
            compile_line(text, &mut out);
        }
    }
}
