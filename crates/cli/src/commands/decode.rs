// crates/cli/src/commands/decode.rs
//! `cclog decode` — one-shot decode for shell bindings.

use anyhow::Result;
use cclog_core::decode::{DecodeCache, FsOracle, PathDecoder};

pub fn run(name: &str) -> Result<()> {
    let decoder = PathDecoder::new(FsOracle);
    let mut cache = DecodeCache::new();
    println!("{}", decoder.decode(&mut cache, name));
    Ok(())
}
