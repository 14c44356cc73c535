use crate::{
    CodeFormatter, DatabaseInfo, DatabaseInfoError, DefaultCodeFormatter, GenerateError, SourceFormatter, StoreError,
    TemplateError, UnitGenerator, UnitId, UnitStore,
};
use facade_schema::{MetadataError, Relationship, RelationshipFactory, SchemaMetadata, TablePath};
use indexmap::IndexSet;
use std::{collections::HashSet, fmt, sync::Arc};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    DatabaseInfo(#[from] DatabaseInfoError),
    #[error("rustfmt failed: {0}")]
    Rustfmt(#[from] xshell::Error),
}

/// What happened to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Written,
    /// The persisted unit already held the generated text.
    Unchanged,
}

/// Tables handled by one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub written: Vec<TablePath>,
    pub unchanged: Vec<TablePath>,
}

impl BuildReport {
    fn record(&mut self, path: TablePath, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Written => self.written.push(path),
            UnitOutcome::Unchanged => self.unchanged.push(path),
        }
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} written, {} unchanged", self.written.len(), self.unchanged.len())
    }
}

/// Everything one run needs: the generator, the metadata behind a relationship factory, and
/// the store units go to.
pub struct FacadeBuilder<M, S, F = DefaultCodeFormatter> {
    generator: UnitGenerator<F>,
    factory: RelationshipFactory<M>,
    store: S,
    source_formatter: SourceFormatter,
    root_modules: Vec<String>,
}

impl<M, S, F> FacadeBuilder<M, S, F>
where
    M: SchemaMetadata,
    S: UnitStore,
    F: CodeFormatter,
{
    pub fn new(generator: UnitGenerator<F>, metadata: M, store: S) -> Self {
        let root_modules = generator.config().root_module_segments();

        Self {
            generator,
            factory: RelationshipFactory::new(metadata),
            store,
            source_formatter: SourceFormatter::Identity,
            root_modules,
        }
    }

    #[must_use]
    pub fn with_source_formatter(mut self, source_formatter: SourceFormatter) -> Self {
        self.source_formatter = source_formatter;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generates every table of `schema`, each on its own. Stops at the first failure, an
    /// illegal table name included.
    pub fn build_schema(&mut self, schema: &str) -> Result<BuildReport, BuildError> {
        let tables = self.factory.metadata().tables(schema)?;
        let mut report = BuildReport::default();

        for path in tables {
            let (_, outcome) = self.build_unit(&path)?;
            report.record(path, outcome);

            self.factory.clear_cache();
        }

        tracing::info!("Built schema {schema}: {report}");

        Ok(report)
    }

    /// Persists the database info record, once per run.
    pub fn write_database_info(&self) -> Result<(), BuildError> {
        let info = DatabaseInfo::new(
            self.factory.metadata().stored_identifier(),
            self.generator.config().root_module.as_str(),
        );

        info.write(&self.store, &self.root_modules)?;

        Ok(())
    }

    fn unit_id(&self, path: &TablePath) -> Result<UnitId, GenerateError> {
        UnitId::for_table(&self.root_modules, path)
    }

    /// Whether a unit for `path` was persisted by an earlier run.
    fn is_persisted(&self, path: &TablePath) -> Result<bool, BuildError> {
        Ok(self.store.exists(&self.unit_id(path)?)?)
    }

    fn build_unit(&mut self, path: &TablePath) -> Result<(Arc<Relationship>, UnitOutcome), BuildError> {
        let _span = tracing::info_span!("generate", table = %path).entered();

        let relationship = self.factory.resolve(path)?;
        let source = self.generator.generate(&relationship)?;
        let source = self.source_formatter.format(source)?;
        let unit = self.unit_id(path)?;

        if self.store.is_current(&unit, &source)? {
            tracing::info!("{unit} is unchanged, skipping");
            return Ok((relationship, UnitOutcome::Unchanged));
        }

        self.store.write(&unit, &source)?;
        tracing::info!("Wrote {unit}");

        Ok((relationship, UnitOutcome::Written))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Tables are waiting, or the queue was never run.
    Pending,
    /// A table is being generated.
    Running,
    /// A run completed and nothing is left.
    Drained,
}

/// Generates a set of tables and everything they reference.
///
/// Tables are processed in insertion order. Each table is generated at most once per run,
/// and tables referenced by a generated table are added unless a previous run already
/// persisted them.
#[derive(Debug)]
pub struct GenerationQueue {
    pending: IndexSet<TablePath>,
    processed: HashSet<TablePath>,
    state: QueueState,
}

impl Default for GenerationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationQueue {
    pub fn new() -> Self {
        Self {
            pending: IndexSet::new(),
            processed: HashSet::new(),
            state: QueueState::Pending,
        }
    }

    /// Adds tables to generate. Seeding outside a run starts a new one, so tables handled by
    /// an earlier run, failed or not, are generated again.
    pub fn seed(&mut self, paths: impl IntoIterator<Item = TablePath>) {
        if self.state != QueueState::Running {
            self.processed.clear();
            self.state = QueueState::Pending;
        }

        for path in paths {
            self.add(path);
        }
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &TablePath> + '_ {
        self.pending.iter()
    }

    /// Runs until no table is pending, then persists the database info.
    ///
    /// On failure the failing table is dropped and the rest stay pending.
    pub fn execute<M, S, F>(&mut self, builder: &mut FacadeBuilder<M, S, F>) -> Result<BuildReport, BuildError>
    where
        M: SchemaMetadata,
        S: UnitStore,
        F: CodeFormatter,
    {
        let mut report = BuildReport::default();

        while let Some(path) = self.pending.shift_remove_index(0) {
            self.state = QueueState::Running;

            if let Err(error) = self.process(&path, builder, &mut report) {
                self.processed.clear();
                self.state = QueueState::Pending;
                return Err(error);
            }
        }

        self.state = QueueState::Drained;
        builder.write_database_info()?;

        tracing::info!("Generation finished: {report}");

        Ok(report)
    }

    fn add(&mut self, path: TablePath) -> bool {
        if self.processed.contains(&path) {
            return false;
        }

        self.pending.insert(path)
    }

    fn process<M, S, F>(
        &mut self,
        path: &TablePath,
        builder: &mut FacadeBuilder<M, S, F>,
        report: &mut BuildReport,
    ) -> Result<(), BuildError>
    where
        M: SchemaMetadata,
        S: UnitStore,
        F: CodeFormatter,
    {
        self.processed.insert(path.clone());

        let (relationship, outcome) = builder.build_unit(path)?;
        report.record(path.clone(), outcome);

        for child in relationship.children() {
            let child = child.path();

            if self.pending.contains(child) || self.processed.contains(child) || builder.is_persisted(child)? {
                continue;
            }

            tracing::debug!("Queued {child}, referenced by {path}");
            self.pending.insert(child.clone());
        }

        builder.factory.clear_cache();

        Ok(())
    }
}
