#![forbid(unsafe_code)]

use std::process::exit;

use gamble::Value;

/// Read a YAML file, parse it into a tree and print the tree re-emitted as YAML.
/// Useful as a validator and as a normalizer. Single parameter is the file name.
fn main() {
    let path = match std::env::args()
        .nth(1)
        .ok_or("This program parses the given YAML file and prints it back in normalized form. \
        Expected a path to a YAML file as the first argument") {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}");
            exit(1);
        }
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let tree: Value = match gamble::parse(&content) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{path} invalid:\n{err:#}");
            exit(3);
        }
    };

    match gamble::to_string(&tree) {
        Ok(yaml) => print!("{yaml}"),
        Err(err) => {
            eprintln!("{path}: {err}");
            exit(4);
        }
    }
}
