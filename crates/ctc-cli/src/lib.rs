// ctc-cli: shared utilities for the command-line tools.

use std::path::PathBuf;
use std::process;

use ctc_graph::lang::LangDir;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Subdirectory checked under the working directory when no language
/// directory is given.
const DEFAULT_LANG_SUBDIR: &str = "data/lang";

/// Search for a language directory and load it.
///
/// Search order:
/// 1. `lang_dir` argument (if provided)
/// 2. `CTC_LANG_DIR` environment variable
/// 3. `./data/lang`
/// 4. Current working directory
pub fn load_lang(lang_dir: Option<&str>) -> Result<LangDir, String> {
    let search_paths = build_search_paths(lang_dir);

    for dir in &search_paths {
        if LangDir::is_lang_dir(dir) {
            debug!(dir = %dir.display(), "loading language directory");
            return LangDir::load(dir)
                .map_err(|e| format!("failed to load {}: {e}", dir.display()));
        }
    }

    Err(format!(
        "could not find phones.txt, words.txt and lexicon.txt in any of the search paths:\n{}",
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of directories to search for a language directory.
fn build_search_paths(lang_dir: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = lang_dir {
        paths.push(PathBuf::from(p));
    }

    if let Ok(env_path) = std::env::var("CTC_LANG_DIR") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(DEFAULT_LANG_SUBDIR));
        paths.push(cwd);
    }

    paths
}

/// Extract `--name=VALUE`, `--name VALUE` or `-s VALUE` from the args.
///
/// Returns `(value, remaining_args)`.
pub fn take_option(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;
    let prefix = format!("{long}=");

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || (!short.is_empty() && arg == short) {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

/// Install a stderr tracing subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
