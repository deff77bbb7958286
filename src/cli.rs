//! Host CLI driving resource lifecycles from JSON configuration files.

mod args;

pub use args::{Cli, Command, ConfigArgs, ConnectionArgs, ObjectArgs};

use std::path::Path;

use serde_json::Value;

use crate::error::{PdconfError, Result};
use crate::framework::{
    Diagnostics, DynamicDataSource, DynamicResource, PlannedAction, PlannedChange,
};
use crate::output;
use crate::provider::ProviderContext;
use crate::resources;
use crate::state::StateStore;

pub async fn run(cli: Cli) -> Result<()> {
    let store = StateStore::open(cli.state_dir.clone())?;
    match cli.command {
        Command::Types => {
            let resources = resources::resources();
            let data_sources = resources::data_sources();
            println!("{}", output::types_table(resources.keys(), data_sources.keys()));
        }
        Command::Schema { type_name } => schema(&type_name)?,
        Command::Plan(args) => plan(&store, &args)?,
        Command::Apply(args) => apply(&cli.connection, &store, &args).await?,
        Command::Refresh(args) => refresh(&cli.connection, &store, &args).await?,
        Command::Destroy(args) => destroy(&cli.connection, &store, &args).await?,
        Command::Import(args) => import(&cli.connection, &store, &args).await?,
        Command::Read(args) => read(&cli.connection, &args).await?,
    }
    Ok(())
}

fn connect(connection: &ConnectionArgs) -> Result<ProviderContext> {
    let config = connection.provider_config()?;
    Ok(ProviderContext::configure(&config)?)
}

fn read_config(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn config_name(config: &Value) -> &str {
    config.get("name").and_then(Value::as_str).unwrap_or_default()
}

/// Prints collected diagnostics and turns errors into a failure.
fn finish(action: &'static str, diags: &Diagnostics) -> Result<()> {
    if !diags.is_empty() {
        eprintln!("{diags}");
    }
    if diags.has_error() {
        return Err(PdconfError::Diagnostics {
            action,
            errors: diags.errors().count(),
        });
    }
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn schema(type_name: &str) -> Result<()> {
    let schema = match resources::get_resource(type_name) {
        Ok(resource) => resource.schema(),
        Err(_) => resources::get_data_source(type_name)?.schema(),
    };
    println!("{}", output::schema_tree(type_name, &schema));
    Ok(())
}

/// Plans `config` against the state stored under `state_name`.
///
/// A rename keeps the old name as `state_name`, so the plan compares names
/// and comes out as a replacement.
fn planned_change(
    resource: &dyn DynamicResource,
    store: &StateStore,
    type_name: &str,
    state_name: &str,
    config: &Value,
) -> Result<(Option<Value>, PlannedChange)> {
    let state = store.load(type_name, state_name)?;
    if state.is_none() && state_name != config_name(config) {
        return Err(PdconfError::MissingState {
            type_name: type_name.to_string(),
            name: state_name.to_string(),
        });
    }
    let mut diags = Diagnostics::new();
    let change = resource.modify_plan(config, state.as_ref(), &mut diags);
    finish("plan", &diags)?;
    // modify_plan only returns None alongside an error
    let change = change.ok_or(PdconfError::Diagnostics {
        action: "plan",
        errors: 0,
    })?;
    Ok((state, change))
}

fn plan(store: &StateStore, args: &ConfigArgs) -> Result<()> {
    let resource = resources::get_resource(&args.type_name)?;
    let config = read_config(&args.file)?;
    let state_name = args.state_name(config_name(&config));
    let (_, change) =
        planned_change(resource.as_ref(), store, &args.type_name, state_name, &config)?;
    if args.json {
        print_json(&change)
    } else {
        print!(
            "{}",
            output::render_plan(&args.type_name, config_name(&config), &change)
        );
        Ok(())
    }
}

async fn apply(connection: &ConnectionArgs, store: &StateStore, args: &ConfigArgs) -> Result<()> {
    let resource = resources::get_resource(&args.type_name)?;
    let config = read_config(&args.file)?;
    let name = config_name(&config);
    let (state, change) = planned_change(
        resource.as_ref(),
        store,
        &args.type_name,
        args.state_name(name),
        &config,
    )?;
    tracing::info!(resource = %args.type_name, %name, action = %change.action, "applying");

    if change.action == PlannedAction::NoOp {
        println!("{} \"{name}\": {}", args.type_name, change.action);
        return Ok(());
    }

    let ctx = connect(connection)?;
    let mut diags = Diagnostics::new();
    let new_state = match (change.action, state) {
        (PlannedAction::Update, Some(state)) => {
            resource.update(&ctx, &config, &state, &mut diags).await
        }
        (PlannedAction::Replace, Some(state)) => {
            resource.delete(&ctx, &state, &mut diags).await;
            finish("apply", &diags)?;
            if let Some(old_name) = state.get("name").and_then(Value::as_str) {
                store.remove(&args.type_name, old_name)?;
            }
            resource.create(&ctx, &config, &mut diags).await
        }
        _ => resource.create(&ctx, &config, &mut diags).await,
    };
    finish("apply", &diags)?;

    if let Some(new_state) = new_state {
        store.save(&args.type_name, name, &new_state)?;
        if args.json {
            print_json(&new_state)?;
        } else {
            print!("{}", output::render_plan(&args.type_name, name, &change));
        }
    }
    Ok(())
}

fn load_state(store: &StateStore, args: &ObjectArgs) -> Result<Value> {
    store
        .load(&args.type_name, &args.name)?
        .ok_or_else(|| PdconfError::MissingState {
            type_name: args.type_name.clone(),
            name: args.name.clone(),
        })
}

async fn refresh(connection: &ConnectionArgs, store: &StateStore, args: &ObjectArgs) -> Result<()> {
    let resource = resources::get_resource(&args.type_name)?;
    let state = load_state(store, args)?;
    let ctx = connect(connection)?;

    let mut diags = Diagnostics::new();
    let refreshed = resource.read(&ctx, &state, &mut diags).await;
    finish("refresh", &diags)?;

    match refreshed {
        Some(refreshed) => {
            store.save(&args.type_name, &args.name, &refreshed)?;
            print_json(&refreshed)
        }
        None => {
            store.remove(&args.type_name, &args.name)?;
            Ok(())
        }
    }
}

async fn destroy(connection: &ConnectionArgs, store: &StateStore, args: &ObjectArgs) -> Result<()> {
    let resource = resources::get_resource(&args.type_name)?;
    let state = load_state(store, args)?;
    let ctx = connect(connection)?;

    let mut diags = Diagnostics::new();
    resource.delete(&ctx, &state, &mut diags).await;
    finish("destroy", &diags)?;

    store.remove(&args.type_name, &args.name)?;
    println!("{} \"{}\": destroyed", args.type_name, args.name);
    Ok(())
}

async fn import(connection: &ConnectionArgs, store: &StateStore, args: &ObjectArgs) -> Result<()> {
    let resource = resources::get_resource(&args.type_name)?;
    let ctx = connect(connection)?;

    let mut diags = Diagnostics::new();
    let imported = resource.import_state(&ctx, &args.name, &mut diags).await;
    finish("import", &diags)?;

    if let Some(imported) = imported {
        store.save(&args.type_name, &args.name, &imported)?;
        print_json(&imported)?;
    }
    Ok(())
}

async fn read(connection: &ConnectionArgs, args: &ConfigArgs) -> Result<()> {
    let data_source = resources::get_data_source(&args.type_name)?;
    let config = read_config(&args.file)?;
    let ctx = connect(connection)?;

    let mut diags = Diagnostics::new();
    let result = data_source.read(&ctx, &config, &mut diags).await;
    finish("read", &diags)?;

    if let Some(result) = result {
        print_json(&result)?;
    }
    Ok(())
}
