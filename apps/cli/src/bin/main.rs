//! Colloquy CLI binary entry point.

use anyhow::Result;
use clap::Parser;
use colloquy_cli::App;

fn main() -> Result<()> {
    let app = App::parse();
    app.init_tracing();
    app.run()
}
