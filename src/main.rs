//! Just main(). Keep as small as possible.

// Lint attributes here don't reach the library crate, so the binary can stay
// minimal and blanket allow the noisy groups.
#![allow(clippy::cargo)]
#![allow(clippy::restriction)]

use manoyukti::utils::cli::run;

fn main() {
    run();
}
