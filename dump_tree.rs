// Run with: cargo run --example dump_tree -- /path/to/file.torrent

use std::path::PathBuf;
use std::time::Instant;

use tortree_core::{
    BuildConfig, BuildJob, BuildMessage, CancellationToken, FilesTree, NodeId, format_size,
    load_torrent,
};

fn print_node(tree: &FilesTree, id: NodeId) {
    let Some(node) = tree.get(id) else { return };
    if id != NodeId::ROOT {
        let summary = tree.rollup(id);
        println!(
            "{:indent$}{} {} {} [{}] {}",
            "",
            summary.wanted.checkbox(),
            node.kind.icon(),
            node.name,
            summary.priority.label(),
            format_size(summary.size),
            indent = (node.depth as usize - 1) * 2
        );
    }
    for &child in node.children() {
        print_node(tree, child);
    }
}

fn main() {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: dump_tree <FILE.torrent>");
        std::process::exit(2);
    };

    let metadata = match load_torrent(&path) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    println!("Torrent: {} ({} files)", metadata.name, metadata.records.len());

    let job = BuildJob::new(1, metadata.records, CancellationToken::new())
        .with_config(BuildConfig { progress_interval: 1000 });
    let (rx, handle) = job.spawn();

    let start = Instant::now();
    let mut tree = None;
    for msg in rx {
        match msg {
            BuildMessage::Progress(p) => {
                println!(
                    "[{:>6.1}s] files={:<8} of {:<8} ({:.1}%)",
                    start.elapsed().as_secs_f64(),
                    p.files_added,
                    p.total_files,
                    p.percentage()
                );
            }
            BuildMessage::Completed(built) => tree = Some(built.tree),
            BuildMessage::Cancelled => println!("CANCELLED"),
        }
    }
    let _ = handle.join();

    if let Some(tree) = tree {
        print_node(&tree, NodeId::ROOT);
        println!(
            "\nFinal: {} nodes, {} total size",
            tree.len(),
            format_size(tree.total_size())
        );
    }
}
