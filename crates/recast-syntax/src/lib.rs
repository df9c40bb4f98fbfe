//! Structural source conversion between languages.
//!
//! `recast-syntax` parses line-structured source (one declaration per
//! line, braces on their own lines) into a component tree and re-emits
//! it in another language's syntax. It converts declaration shape, not
//! semantics: method bodies travel as raw text.
//!
//! # Architecture
//!
//! ```text
//! Source Language      Component Pack       Target Languages
//! ───────────────     ────────────────     ─────────────────
//!                                       ┌─> C++
//! C#             ───> FilePack ────────┼─> Java
//!                       (ir.rs)        └─> Python
//! ```
//!
//! # Example
//!
//! ```ignore
//! use recast_syntax::{input, output};
//!
//! // Read C#
//! let pack = input::read_csharp("namespace Output;\n\npublic class A\n{\n}\n")?;
//!
//! // Write to Java
//! let java = output::JavaLinker::emit(&pack);
//! // => ["package Output.Java;", "", ...]
//! ```
//!
//! # Note on Conversion Fidelity
//!
//! This is declaration-level conversion, not transpilation. Field and
//! method shapes, visibility, and inheritance clauses are re-spelled
//! per target; statement text inside method bodies is carried verbatim.

pub mod builder;
pub mod ir;
pub mod registry;
pub mod traits;

pub mod input;
pub mod output;

// Re-exports: component model
pub use ir::{
    Access, Class, ClassKind, ComponentId, ConsumedSet, Container, Field, FilePack, Import,
    Method, Parameter, Property, Special,
};

// Re-exports: traits
pub use traits::{ReadError, Reader, Target, WriteError, Writer};

// Re-exports: registry
pub use registry::{
    reader_for_extension, reader_for_language, readers, register_reader, register_writer,
    writer_for_language, writer_for_target, writers,
};

// Re-exports: builder
pub use builder::{BuildError, BuildProfile, FilePackBuilder};

// Re-exports: built-in reader
#[cfg(feature = "read-csharp")]
pub use input::read_csharp;
#[cfg(feature = "read-csharp")]
pub use input::csharp::CSharpReader;

// Re-exports: built-in writers
#[cfg(feature = "write-cpp")]
pub use output::CppLinker;
#[cfg(feature = "write-java")]
pub use output::JavaLinker;
#[cfg(feature = "write-python")]
pub use output::PythonLinker;
