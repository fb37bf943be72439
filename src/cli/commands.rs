//! Command dispatch: each subcommand loads a document, runs store operations
//! and prints or rewrites the result.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::HierarchyTreeStore;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{FieldValue, Fields, Node, NodeLabel, TreeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{Document, InfraError};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current dir", e))?,
    };

    let command = match &cli.command {
        Some(command) => command,
        None => return Err(CliError::Usage("no command given, see --help".into())),
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(Some(&config_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file } => cmd_tree(&container, file),
        Commands::Find { file, id } => cmd_find(&container, file, id),
        Commands::Select { file, id, column } => {
            cmd_select(&container, file, id, column.as_deref())
        }
        Commands::Add {
            file,
            parent,
            fields,
            id,
            in_place,
        } => cmd_add(&container, file, parent, fields, id.as_deref(), *in_place),
        Commands::Remove { file, id, in_place } => cmd_remove(&container, file, id, *in_place),
        Commands::Column { file, name, index } => {
            cmd_column(&container, file, name, index.as_deref())
        }
        Commands::Validate { file } => cmd_validate(&container, file),
        Commands::Stats { file } => cmd_stats(&container, file),
        Commands::Config { command } => cmd_config(&container, command, &config_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Interpret a command-line id; fall back to text when the typed value is unknown.
///
/// `"1"` finds integer id 1 as well as text id "1".
fn resolve_id(store: &HierarchyTreeStore, raw: &str) -> FieldValue {
    let parsed = FieldValue::parse_loose(raw);
    if store.find(&parsed).is_some() {
        parsed
    } else {
        FieldValue::Text(raw.to_string())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| InfraError::json("render", e).into())
}

fn emit(container: &ServiceContainer, file: &Path, document: &Document, in_place: bool) -> CliResult<()> {
    if in_place {
        container.documents.save(file, document)?;
        output::success(&format!("updated {}", file.display()));
    } else {
        output::info(&document.render()?);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, store) = container.open_store(file)?;
    let labels = NodeLabel {
        key: store.key(),
        label_field: store.index_column().or(Some("name")),
    };
    output::info(&store.data().to_tree_string(&labels));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_find(container: &ServiceContainer, file: &Path, raw_id: &str) -> CliResult<()> {
    let (_, store) = container.open_store(file)?;
    let id = resolve_id(&store, raw_id);
    match store.find(&id) {
        Some(node) => {
            output::info(&to_json(node)?);
            Ok(())
        }
        None => Err(crate::domain::DomainError::NodeNotFound {
            key: store.key().to_string(),
            id,
        }
        .into()),
    }
}

#[instrument(skip(container))]
fn cmd_select(
    container: &ServiceContainer,
    file: &Path,
    raw_id: &str,
    column: Option<&str>,
) -> CliResult<()> {
    let (_, mut store) = container.open_store(file)?;
    let id = resolve_id(&store, raw_id);
    if store.select(&id).is_none() {
        output::warning(&format!("no node with {} = {}", store.key(), raw_id));
    }
    if let Some(name) = column {
        if store.select_column(name)?.is_none() {
            output::warning(&format!("{} is the index column and cannot be selected", name));
        }
    }
    let mut snapshot = serde_json::to_value(store.snapshot())
        .map_err(|e| InfraError::json("render", e))?;
    // The host already has the data; only the selection is news
    if let Some(map) = snapshot.as_object_mut() {
        map.remove("data");
    }
    output::info(&to_json(&snapshot)?);
    Ok(())
}

#[instrument(skip(container, fields))]
fn cmd_add(
    container: &ServiceContainer,
    file: &Path,
    raw_parent: &str,
    fields: &[(String, String)],
    explicit_id: Option<&str>,
    in_place: bool,
) -> CliResult<()> {
    let (mut document, mut store) = container.open_store(file)?;
    let parent = resolve_id(&store, raw_parent);
    let fields: Fields = fields
        .iter()
        .map(|(name, value)| (name.clone(), FieldValue::parse_loose(value)))
        .collect();

    let id = match explicit_id {
        Some(raw) => {
            let id = FieldValue::parse_loose(raw);
            let mut child = Node {
                fields,
                children: None,
            };
            child.set_field(store.key().to_string(), id.clone());
            store.append_child(&parent, child)?;
            id
        }
        None => store.add_generated_child(&parent, fields)?,
    };
    debug!("added {} under {}", id, parent);

    document.props = store.into_props();
    emit(container, file, &document, in_place)
}

#[instrument(skip(container))]
fn cmd_remove(container: &ServiceContainer, file: &Path, raw_id: &str, in_place: bool) -> CliResult<()> {
    let (mut document, mut store) = container.open_store(file)?;
    let id = resolve_id(&store, raw_id);
    if !store.remove(&id) {
        output::warning(&format!("no node with {} = {}, document unchanged", store.key(), raw_id));
        if in_place {
            return Ok(());
        }
    }
    document.props = store.into_props();
    emit(container, file, &document, in_place)
}

#[instrument(skip(container))]
fn cmd_column(
    container: &ServiceContainer,
    file: &Path,
    name: &str,
    index: Option<&str>,
) -> CliResult<()> {
    let (_, store) = container.open_store(file)?;
    let index = index
        .or(store.index_column())
        .ok_or_else(|| CliError::InvalidArgs("no index column: pass --index".into()))?;
    let view = store.data().flatten_column(name, index);
    output::info(&to_json(&view)?);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, store) = container.open_store(file)?;
    let duplicates = store.data().duplicate_keys(store.key());
    if duplicates.is_empty() {
        output::success(&format!("{}: {} unique", file.display(), store.key()));
        return Ok(());
    }
    output::header(&format!("Duplicate {} values in {}", store.key(), file.display()));
    for id in &duplicates {
        output::failure(id);
    }
    std::process::exit(crate::exitcode::INVALID);
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let (_, store) = container.open_store(file)?;
    let data = store.data();
    let leaves: Vec<String> = data
        .leaf_keys(store.key())
        .iter()
        .map(FieldValue::to_string)
        .collect();
    output::header(&file.display());
    output::field("roots", &data.roots().len());
    output::field("nodes", &data.len());
    output::field("depth", &data.depth());
    output::field("leaves", &leaves.join(", "));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".into());
            output::field("global", &global);
            output::field("local", &local_config_path(config_dir).display());
        }
    }
    Ok(())
}
