use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::provider::{ProviderConfig, ProviderError};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Directory holding local state files
    #[arg(long, global = true, env = "PDCONF_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the directory server, e.g. https://localhost:1443
    #[arg(long, global = true, env = "PINGDIRECTORY_PROVIDER_HTTPS_HOST")]
    pub https_host: Option<String>,

    #[arg(long, global = true, env = "PINGDIRECTORY_PROVIDER_USERNAME")]
    pub username: Option<String>,

    #[arg(
        long,
        global = true,
        env = "PINGDIRECTORY_PROVIDER_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Accept any TLS certificate from the server
    #[arg(long, global = true, env = "PINGDIRECTORY_PROVIDER_INSECURE_TRUST_ALL_TLS")]
    pub insecure_trust_all_tls: bool,

    /// Product version of the server, e.g. 9.3.0.0
    #[arg(long, global = true, env = "PINGDIRECTORY_PROVIDER_PRODUCT_VERSION")]
    pub product_version: Option<String>,
}

impl ConnectionArgs {
    pub fn provider_config(&self) -> Result<ProviderConfig, ProviderError> {
        ProviderConfig::new(
            self.https_host.clone(),
            self.username.clone(),
            self.password.clone(),
            self.insecure_trust_all_tls,
            self.product_version.clone(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resource and data source types
    Types,
    /// Show the schema of a resource or data source type
    Schema { type_name: String },
    /// Show what apply would do for a configuration file
    Plan(ConfigArgs),
    /// Create, adopt or update the object described by a configuration file
    Apply(ConfigArgs),
    /// Re-read an object into local state
    Refresh(ObjectArgs),
    /// Delete an object and drop it from local state
    Destroy(ObjectArgs),
    /// Bring an existing object under management
    Import(ObjectArgs),
    /// Read a data source
    Read(ConfigArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    pub type_name: String,

    /// JSON file with the configuration object
    pub file: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Name the object is stored under when the configuration renames it
    #[arg(long, value_name = "NAME")]
    pub previous_name: Option<String>,
}

impl ConfigArgs {
    /// Local state key for `config_name`, honoring a rename.
    pub fn state_name<'a>(&'a self, config_name: &'a str) -> &'a str {
        self.previous_name.as_deref().unwrap_or(config_name)
    }
}

#[derive(clap::Args, Debug)]
pub struct ObjectArgs {
    pub type_name: String,

    /// Object name (its id on the server)
    pub name: String,
}
