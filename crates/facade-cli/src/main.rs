#![cfg_attr(test, allow(unused_crate_dependencies))]
#![forbid(unsafe_code)]

use anyhow::Context as _;
use args::Command;
use clap::crate_version;
use facade_codegen::{
    FacadeBuilder, FileSystemStore, GenerationQueue, SourceFormatter, TemplateStore, UnitGenerator,
};
use facade_schema::SchemaDefinition;
use tracing_subscriber::EnvFilter;

mod args;

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(args.log_level().as_filter_str()))
        .with_target(false)
        .without_time()
        .init();

    let crate_version = crate_version!();
    tracing::debug!("facade {crate_version}");

    let config = args.generator_config()?;

    let templates = match args.template.as_deref() {
        Some(path) => TemplateStore::from_path(path)?,
        None => TemplateStore::bundled()?,
    };

    let definition = SchemaDefinition::from_path(args.command.definition())?;
    let store = FileSystemStore::new(args.command.output(), &config.charset)?;

    let source_formatter = if config.rustfmt {
        SourceFormatter::rustfmt().context("could not start rustfmt")?
    } else {
        SourceFormatter::Identity
    };

    let generator = UnitGenerator::new(templates, config);
    let mut builder = FacadeBuilder::new(generator, definition, store).with_source_formatter(source_formatter);

    let report = match args.command {
        Command::Build(command) => {
            let report = builder.build_schema(&command.schema)?;
            builder.write_database_info()?;

            report
        }
        Command::Generate(command) => {
            let mut queue = GenerationQueue::new();
            queue.seed(command.tables);

            queue.execute(&mut builder)?
        }
    };

    tracing::info!("Done: {report}");

    Ok(())
}
