//! The two-phase content generator pipeline.
//!
//! Generators run in dependency order. Every generator's `prepare` runs
//! before any generator's `generate`, so values computed during preparation
//! (EEPROM usage, autogenerated properties) are final by the time files are
//! rendered.

use crate::context::{GenerationContext, SharedState};
use crate::order::execution_order;
use crate::{AcpError, OutputError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prepared values of one generator, keyed by template placeholder.
pub type Output = crate::template::Replacements;

/// One stage producing generated files.
pub trait ContentGenerator {
    fn name(&self) -> &'static str;

    /// Compute template values, optionally publishing shared state.
    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()>;

    /// Render prepared values into files.
    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()>;
}

/// Handle of a generator added to a [`Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorId(usize);

/// Generators plus their "must run after" edges.
#[derive(Default)]
pub struct Pipeline {
    generators: Vec<Box<dyn ContentGenerator>>,
    dependencies: Vec<Vec<usize>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, generator: impl ContentGenerator + 'static) -> GeneratorId {
        self.generators.push(Box::new(generator));
        self.dependencies.push(Vec::new());
        GeneratorId(self.generators.len() - 1)
    }

    /// Declare that `dependent` must run after `dependency`.
    pub fn depends_on(&mut self, dependent: GeneratorId, dependency: GeneratorId) {
        self.dependencies[dependent.0].push(dependency.0);
    }

    /// Generator names in execution order.
    pub fn execution_order(&self) -> Result<Vec<&'static str>> {
        Ok(self
            .ordered()?
            .into_iter()
            .map(|i| self.generators[i].name())
            .collect())
    }

    fn ordered(&self) -> Result<Vec<usize>> {
        let names: Vec<&str> = self.generators.iter().map(|g| g.name()).collect();
        execution_order(&names, &self.dependencies).map_err(|e| {
            AcpError::compile("Circular dependencies of content generators.").caused_by(e)
        })
    }

    /// Run all prepare steps, then all generate steps.
    pub fn run(&self, cx: &GenerationContext<'_>, state: &mut SharedState) -> Result<Artifacts> {
        let order = self.ordered()?;
        let mut outputs: Vec<Output> = vec![Output::new(); self.generators.len()];

        for &i in &order {
            let generator = &self.generators[i];
            debug!(generator = generator.name(), "prepare");
            generator.prepare(cx, state, &mut outputs[i])?;
        }

        let mut artifacts = Artifacts::default();
        for &i in &order {
            let generator = &self.generators[i];
            debug!(generator = generator.name(), "generate");
            generator.generate(cx, state, &outputs[i], &mut artifacts)?;
        }
        Ok(artifacts)
    }
}

/// Files written by the generate phase.
#[derive(Debug, Default)]
pub struct Artifacts {
    written: Vec<PathBuf>,
}

impl Artifacts {
    /// Write `content` to `path`, creating parent directories and replacing
    /// any existing file.
    pub fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                output_error(OutputError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })
            })?;
        }
        fs::write(path, content).map_err(|source| {
            output_error(OutputError::Write {
                path: path.to_path_buf(),
                source,
            })
        })?;
        debug!(path = %path.display(), bytes = content.len(), "wrote");
        self.written.push(path.to_path_buf());
        Ok(())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.written
    }
}

fn output_error(err: OutputError) -> AcpError {
    AcpError::compile(format!("Generated output cannot be saved: {err}")).caused_by(err)
}
