//! Input readers - parse source lines into component packs.

#[cfg(feature = "read-csharp")]
pub mod csharp;

#[cfg(feature = "read-csharp")]
pub use csharp::{CSHARP_READER, CSharpReader, read_csharp};
