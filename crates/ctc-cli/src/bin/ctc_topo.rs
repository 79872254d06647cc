// ctc-topo: Build and print a CTC topology for a phone table.
//
// Usage:
//   ctc-topo [--topo KIND] [--counts] PHONES_TXT
//
// Options:
//   --topo KIND   Topology: normal or modified (default: modified)
//   --counts      Print only the state and arc counts
//   -h, --help    Print help

use std::io::{self, Write};

use ctc_graph::symbols::{SymbolTable, phone_ids};
use ctc_graph::topo::{BLANK, build_topo};
use ctc_graph::TopologyKind;

fn main() {
    ctc_cli::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (topo, args) = ctc_cli::take_option(&args, "--topo", "");

    if ctc_cli::wants_help(&args) {
        println!("ctc-topo: Build a CTC topology for a phone table.");
        println!();
        println!("Usage: ctc-topo [--topo KIND] [--counts] PHONES_TXT");
        println!();
        println!("Prints the topology in text form: `src dest label aux weight`");
        println!("per arc, then the final state.");
        println!();
        println!("Options:");
        println!("  --topo KIND   Topology: normal or modified (default: modified)");
        println!("  --counts      Print only the state and arc counts");
        println!("  -h, --help    Print this help");
        return;
    }

    let kind = match topo {
        Some(t) => t.parse::<TopologyKind>().unwrap_or_else(|e| ctc_cli::fatal(&e)),
        None => TopologyKind::default(),
    };
    let counts_only = args.iter().any(|a| a == "--counts");
    let Some(phones_path) = args.iter().find(|a| !a.starts_with('-')) else {
        ctc_cli::fatal("missing PHONES_TXT argument (see --help)");
    };

    let phones =
        SymbolTable::from_file(phones_path).unwrap_or_else(|e| ctc_cli::fatal(&e.to_string()));
    let mut tokens = vec![BLANK];
    tokens.extend(phone_ids(&phones));
    let fsa = build_topo(kind, &tokens).unwrap_or_else(|e| ctc_cli::fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if counts_only {
        let _ = writeln!(
            out,
            "{kind}: {} tokens, {} states, {} arcs",
            tokens.len(),
            fsa.num_states(),
            fsa.num_arcs()
        );
    } else {
        let _ = write!(out, "{fsa}");
    }
}
