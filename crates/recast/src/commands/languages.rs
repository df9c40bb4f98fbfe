//! Languages command - list what the registry can read and write.

use recast_syntax::registry::{readers, writers};

/// Run the languages command
pub fn run() -> i32 {
    println!("Readers:");
    for reader in readers() {
        println!("  {} ({})", reader.language(), reader.extensions().join(", "));
    }
    println!("Writers:");
    for writer in writers() {
        println!("  {} (.{})", writer.language(), writer.extension());
    }
    0
}
