//! Registry for readers and writers.

use crate::traits::{Reader, Target, Writer};
use std::sync::{OnceLock, RwLock};

/// Global reader registry.
static READERS: RwLock<Vec<&'static dyn Reader>> = RwLock::new(Vec::new());
static READERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Global writer registry.
static WRITERS: RwLock<Vec<&'static dyn Writer>> = RwLock::new(Vec::new());
static WRITERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom reader.
pub fn register_reader(reader: &'static dyn Reader) {
    READERS.write().unwrap().push(reader);
}

/// Register a custom writer.
pub fn register_writer(writer: &'static dyn Writer) {
    WRITERS.write().unwrap().push(writer);
}

fn init_readers() {
    READERS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "read-csharp")]
        {
            register_reader(&crate::input::csharp::CSHARP_READER);
        }
    });
}

fn init_writers() {
    WRITERS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "write-cpp")]
        {
            register_writer(&crate::output::cpp::CPP_WRITER);
        }
        #[cfg(feature = "write-java")]
        {
            register_writer(&crate::output::java::JAVA_WRITER);
        }
        #[cfg(feature = "write-python")]
        {
            register_writer(&crate::output::python::PYTHON_WRITER);
        }
    });
}

/// Get a reader by language name.
pub fn reader_for_language(lang: &str) -> Option<&'static dyn Reader> {
    init_readers();
    READERS
        .read()
        .unwrap()
        .iter()
        .find(|r| r.language() == lang)
        .copied()
}

/// Get a reader by file extension.
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    init_readers();
    READERS
        .read()
        .unwrap()
        .iter()
        .find(|r| r.extensions().contains(&ext))
        .copied()
}

/// Get a writer by language name.
pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    init_writers();
    WRITERS
        .read()
        .unwrap()
        .iter()
        .find(|w| w.language() == lang)
        .copied()
}

/// Get a writer by output target.
pub fn writer_for_target(target: Target) -> Option<&'static dyn Writer> {
    init_writers();
    WRITERS
        .read()
        .unwrap()
        .iter()
        .find(|w| w.target() == target)
        .copied()
}

/// Get all registered readers.
pub fn readers() -> Vec<&'static dyn Reader> {
    init_readers();
    READERS.read().unwrap().clone()
}

/// Get all registered writers.
pub fn writers() -> Vec<&'static dyn Writer> {
    init_writers();
    WRITERS.read().unwrap().clone()
}
