use std::path::Path;

use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Root, TreeDisplay};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Commands::Tree { snapshot } => cmd_tree(container, snapshot),
        Commands::Json { snapshot } => cmd_json(container, snapshot),
        Commands::Flatten { snapshot } => cmd_flatten(container, snapshot),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&container.settings),
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
        },
    }
}

fn materialize(container: &ServiceContainer, snapshot: &Path) -> CliResult<Root> {
    let service = container.tree_service();
    let rows = service.load_snapshot(snapshot)?;
    debug!(
        "materialize: {} entries, {} fields",
        rows.entries.len(),
        rows.fields.len()
    );
    Ok(service.materialize_snapshot(&rows)?)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, snapshot: &Path) -> CliResult<()> {
    let root = materialize(container, snapshot)?;
    output::header(&format!("{} ({} nodes)", snapshot.display(), root.node_count()));
    output::info(&root.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_json(container: &ServiceContainer, snapshot: &Path) -> CliResult<()> {
    let root = materialize(container, snapshot)?;
    let json = container.tree_service().render_json(&root)?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_flatten(container: &ServiceContainer, snapshot: &Path) -> CliResult<()> {
    let root = materialize(container, snapshot)?;
    let json = container
        .tree_service()
        .render_snapshot_json(&root.flatten())?;
    output::info(&json);
    Ok(())
}

fn cmd_config_show(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}
