//! Traits for language readers and writers.

use crate::ir::{FilePack, InvalidAttach};

/// Error that can occur when reading source lines into a component pack.
///
/// All variants are fatal to the run: a line that breaks the positional
/// grammar or the scope balance aborts the parse rather than degrading
/// into a truncated tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("end of scope at line {line} with no open scope")]
    UnbalancedScope { line: usize },

    #[error("unclosed scope: {0}")]
    UnclosedScope(String),

    #[error(transparent)]
    Attach(#[from] InvalidAttach),
}

/// Error that can occur when emitting a component pack.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("unsupported component: {0}")]
    Unsupported(String),
}

/// A reader parses source lines into a component pack.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "csharp").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["cs"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse one source unit into a component pack.
    fn read(&self, source: &str) -> Result<FilePack, ReadError>;
}

/// A writer emits a component pack as source text in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "cpp").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "hpp").
    fn extension(&self) -> &'static str;

    /// The target this writer emits.
    fn target(&self) -> Target;

    /// Emit the pack as ordered output lines.
    fn write_lines(&self, pack: &FilePack) -> Result<Vec<String>, WriteError>;

    /// Emit the pack as joined text ending with a newline.
    fn write(&self, pack: &FilePack) -> Result<String, WriteError> {
        let mut text = self.write_lines(pack)?.join("\n");
        text.push('\n');
        Ok(text)
    }
}

/// Output language selector. One writer per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Cpp,
    Java,
    Python,
}

impl Target {
    /// Resolve a target from its language name.
    pub fn from_name(name: &str) -> Option<Target> {
        match name {
            "cpp" => Some(Target::Cpp),
            "java" => Some(Target::Java),
            "python" => Some(Target::Python),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::Cpp => "cpp",
            Target::Java => "java",
            Target::Python => "python",
        }
    }
}
