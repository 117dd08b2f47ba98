pub mod convert;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "everlance2mileiq",
    version,
    about = "Convert an Everlance CSV export into a MileIQ CSV for QuickBooks Self-Employed."
)]
pub struct Cli {
    /// Everlance CSV export to read (default: standard input)
    pub file: Option<PathBuf>,
}
