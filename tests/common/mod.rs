// Test utility module for patgen integration tests
#![allow(dead_code)]

use patgen::diagnostics::{CollectingSink, Diagnostic};
use patgen::errors::Result;
use patgen::io::{MemoryEmitter, SourceEmitter, SourceFile};
use patgen::model::Namespace;
use patgen::pipeline::{Driver, DriverReport};
use patgen::synth::QualifiedName;
use patgen::PatgenConfig;

/// Parse a fixture as the file `path` defining module `namespace`.
pub fn source(path: &str, namespace: &str, text: &str) -> SourceFile {
    SourceFile::parse(path, Namespace::parse(namespace), text).expect("fixture must parse")
}

/// Outcome of an in-memory generation run.
pub struct Run {
    pub report: Result<DriverReport>,
    pub units: MemoryEmitter,
    pub sink: CollectingSink,
}

impl Run {
    pub fn unit(&self, namespace: &str, name: &str) -> Option<&str> {
        self.units.get(&QualifiedName::new(Namespace::parse(namespace), name))
    }

    pub fn names(&self) -> Vec<String> {
        self.units.names().iter().map(ToString::to_string).collect()
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.sink.errors()
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.sink.warnings()
    }
}

pub fn generate(sources: Vec<SourceFile>) -> Run {
    generate_with(&PatgenConfig::default(), sources)
}

pub fn generate_with(config: &PatgenConfig, sources: Vec<SourceFile>) -> Run {
    let driver = Driver::from_config(config).expect("valid config");
    let mut units = MemoryEmitter::new();
    let sink = CollectingSink::new();
    let report = driver.run(sources, &mut units, &sink);
    Run {
        report,
        units,
        sink,
    }
}

/// Emitter that succeeds for the first `limit` units, then fails.
pub struct FailAfter {
    pub limit: usize,
    pub attempted: Vec<QualifiedName>,
    pub written: MemoryEmitter,
}

impl FailAfter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            attempted: Vec::new(),
            written: MemoryEmitter::new(),
        }
    }
}

impl SourceEmitter for FailAfter {
    fn emit(&mut self, name: &QualifiedName, text: &str) -> Result<()> {
        self.attempted.push(name.clone());
        if self.attempted.len() > self.limit {
            return Err(patgen::GenError::emission(
                name.to_string(),
                std::io::Error::other("quota exceeded"),
            ));
        }
        self.written.emit(name, text)
    }
}
