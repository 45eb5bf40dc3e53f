mod rsa;

pub use crate::rsa::*;
pub use crate::rsa::config::SILENT;
pub use crate::RSA;

use std::error::Error;
use clap::Parser;

fn main() -> Result<(), Box<dyn Error>> {
    let rsa = RSA::parse();
    if !SILENT.is_set()? { SILENT.set(rsa.silent)?; }
    say!("Run args: {:?}", rsa);
    rsa.run()?;
    Ok(())
}
