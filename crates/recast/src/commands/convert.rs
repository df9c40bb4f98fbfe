//! Convert command - the file pipeline from source text to target text.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use recast_syntax::Target;
use recast_syntax::registry::{reader_for_extension, readers, writer_for_target, writers};

/// Convert command arguments
#[derive(Args)]
pub struct ConvertArgs {
    /// Input source file
    pub input: PathBuf,

    /// Target language
    #[arg(short, long)]
    pub target: TargetLanguage,

    /// Directory for the converted file (input's directory if not specified)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print the parsed component store as pretty JSON to stdout
    #[arg(long)]
    pub dump_ir: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetLanguage {
    /// C++
    Cpp,
    /// Java
    Java,
    /// Python
    Python,
}

impl TargetLanguage {
    fn target(self) -> Target {
        match self {
            TargetLanguage::Cpp => Target::Cpp,
            TargetLanguage::Java => Target::Java,
            TargetLanguage::Python => Target::Python,
        }
    }
}

/// Run the convert command
pub fn run(args: ConvertArgs) -> i32 {
    let content = match std::fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.input.display(), e);
            return 1;
        }
    };

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let reader = match reader_for_extension(extension) {
        Some(reader) => reader,
        None => {
            eprintln!("No reader available for extension: .{}", extension);
            eprintln!("Available readers:");
            for r in readers() {
                eprintln!("  {} ({})", r.language(), r.extensions().join(", "));
            }
            return 1;
        }
    };

    let target = args.target.target();
    let writer = match writer_for_target(target) {
        Some(writer) => writer,
        None => {
            eprintln!("No writer available for target: {}", target.name());
            eprintln!("Available writers:");
            for w in writers() {
                eprintln!("  {} (.{})", w.language(), w.extension());
            }
            return 1;
        }
    };

    let pack = match reader.read(&content) {
        Ok(pack) => pack,
        Err(e) => {
            eprintln!(
                "Failed to parse {} as {}: {}",
                args.input.display(),
                reader.language(),
                e
            );
            return 1;
        }
    };

    if args.dump_ir {
        match serde_json::to_string_pretty(&pack) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize component store: {}", e);
                return 1;
            }
        }
    }

    let output = match writer.write(&pack) {
        Ok(output) => output,
        Err(e) => {
            eprintln!(
                "Failed to render {} as {}: {}",
                args.input.display(),
                target.name(),
                e
            );
            return 1;
        }
    };

    let path = output_path(&args.input, args.out_dir.as_deref(), writer.extension());
    if let Err(e) = std::fs::write(&path, &output) {
        eprintln!("Failed to write {}: {}", path.display(), e);
        return 1;
    }
    eprintln!(
        "Converted {} -> {} ({})",
        args.input.display(),
        path.display(),
        target.name()
    );

    0
}

/// Sibling of the input named `<stem>.<extension>`, relocated by `out_dir`.
fn output_path(input: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(stem).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_sibling() {
        let path = output_path(Path::new("src/FromCSharp.cs"), None, "hpp");
        assert_eq!(path, Path::new("src/FromCSharp.hpp"));
    }

    #[test]
    fn test_output_path_bare_file() {
        let path = output_path(Path::new("FromCSharp.cs"), None, "java");
        assert_eq!(path, Path::new("FromCSharp.java"));
    }

    #[test]
    fn test_output_path_out_dir() {
        let path = output_path(Path::new("src/FromCSharp.cs"), Some(Path::new("gen")), "py");
        assert_eq!(path, Path::new("gen/FromCSharp.py"));
    }
}
