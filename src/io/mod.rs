//! File system edges of the generator: source discovery, source loading and
//! emission of generated units.

pub mod emitter;
pub mod source;
pub mod walker;

pub use emitter::{FsEmitter, MemoryEmitter, SourceEmitter};
pub use source::{load_sources, module_path_for, SourceFile};
pub use walker::{find_source_files, FileWalker};
