// crates/core/src/lib.rs
pub mod decode;
pub mod error;
pub mod format;
pub mod paths;
pub mod session;

pub use decode::*;
pub use error::*;
pub use format::*;
pub use paths::*;
pub use session::*;
