//! Version command

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("atp v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
