// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

use crate::config::DateStyle;
use strum::IntoEnumIterator;

pub fn print_help(binary_name: &str) {
    println!(
        "Convene v{} - A consistent roster of people, events and appointments",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] <command>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    list [profiles|events|appointments]   Print the stored records (default: all)");
    println!("    seed                                  Write a sample roster and default config");
    println!("    export                                Write the records file JSON to stdout");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CONFIG KEYS (config.toml):");
    let styles: Vec<String> = DateStyle::iter().map(|style| style.to_string()).collect();
    println!("    date_style                One of: {}", styles.join(", "));
    println!("    hide_marked_appointments  Skip appointments already marked as done.");
    println!("    sort_events_by_start      List events by start instead of entry order.");
    println!();
    println!("EXPORT COMMAND:");
    println!(
        "    {} export > backup.json     Save records to a file",
        binary_name
    );
    println!(
        "    {} export | jq '.profiles'  Filter output",
        binary_name
    );
    println!();
    println!("MORE INFO:");
    println!("    Repository: https://codeberg.org/convene/convene");
    println!("    License:    GPL-3.0");
}
