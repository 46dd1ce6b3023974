use anyhow::Result;

pub fn run() -> Result<()> {
    println!("clinote {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
