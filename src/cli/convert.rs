use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use everlance2mileiq::converter::{convert, ConvertSummary};
use everlance2mileiq::error::Result;
use everlance2mileiq::settings::load_settings;

/// Open the export for reading. The handle is released when it is dropped,
/// on success and on every error path.
fn open_input(file: Option<&Path>) -> Result<Box<dyn Read>> {
    match file {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

pub fn run(file: Option<&Path>) -> Result<ConvertSummary> {
    let settings = load_settings()?;
    let input = open_input(file)?;
    let mut output = io::stdout().lock();
    convert(input, &mut output, &settings)
}
