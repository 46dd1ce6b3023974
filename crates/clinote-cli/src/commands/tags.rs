use anyhow::Result;

use crate::output::format::format_tags;
use crate::output::OutputFormat;

pub fn run(format: OutputFormat) -> Result<()> {
    print!("{}", format_tags(format));
    Ok(())
}
