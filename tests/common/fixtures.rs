//! Rewrite programs used across the integration tests

use std::path::PathBuf;

use tempfile::TempDir;

/// Reduces in three single-mode steps:
/// `(2 + 3) * (2 + 3)` -> `(5) * (5)` -> `5 * 5` -> `25`
pub const SQUARE: &str = "\
# square of a sum
2 + 3 => 5
(5) => 5
5 * 5 => 25
main = (2 + 3) * (2 + 3)
";

/// Two independent redexes at the start
pub const TWO_REDEXES: &str = "\
1 + 1 => 2
2 + 2 => 4
main = (1 + 1) + (2 + 2)
";

/// Line 2 is neither a rule nor a binding
pub const BROKEN: &str = "\
2 + 3 => 5
this is not valid
main = 2 + 3
";

/// Write `source` to `program.rt` in a fresh temporary directory
pub fn program_file(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("program.rt");
    std::fs::write(&path, source).expect("Failed to write program");
    (dir, path)
}
