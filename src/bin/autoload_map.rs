//! CLI for inspecting autoload map manifests.
//!
//! Usage:
//!   autoload-map <manifest>                  # List every entry
//!   autoload-map <manifest> <kind> <name>    # Show the unit a symbol loads from

use autoload::runner::autoload::map::join_root;
use autoload::runner::autoload::Manifest;
use autoload::runner::ds::symbol::{canonical_name, strip_inout_suffix, SymbolKind};
use std::env;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autoload=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        2 if args[1] == "-h" || args[1] == "--help" => {
            print_usage();
        }
        2 => {
            let manifest = load(&args[1]);
            dump(&manifest);
        }
        4 => {
            let manifest = load(&args[1]);
            lookup(&manifest, &args[2], &args[3]);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("autoload-map - autoload manifest inspector");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  autoload-map <manifest>                  List every entry");
    eprintln!("  autoload-map <manifest> <kind> <name>    Show the unit a symbol loads from");
    eprintln!();
    eprintln!("Kinds: class, function, constant, type, record");
}

fn load(path: &str) -> Manifest {
    match Manifest::load(Path::new(path)) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn dump(manifest: &Manifest) {
    if !manifest.root.is_empty() {
        println!("root = {:?}", manifest.root);
    }
    if let Some(callback) = manifest.map.failure_callback() {
        println!("failure = {:?}", callback);
    }
    for kind in SymbolKind::ALL.iter() {
        let entries = manifest.map.entries(*kind);
        if entries.is_empty() {
            continue;
        }
        println!();
        println!("[{}]", kind);
        for (name, path) in entries {
            println!("{} = {}", name, join_root(&manifest.root, path));
        }
    }
}

fn lookup(manifest: &Manifest, kind: &str, name: &str) {
    let kind = match SymbolKind::from_tag(kind) {
        Some(kind) => kind,
        None => {
            eprintln!("Unknown kind '{}'", kind);
            process::exit(1);
        }
    };
    let name = match kind {
        SymbolKind::Function => strip_inout_suffix(name),
        _ => name,
    };
    let canonical = canonical_name(name, kind.folds_case());
    match manifest.map.path_for(kind, &canonical) {
        Some(path) => println!("{}", join_root(&manifest.root, path)),
        None => {
            eprintln!("{} '{}' is not in the map", kind, canonical);
            process::exit(2);
        }
    }
}
