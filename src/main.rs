//! Model Registry - inspector entry point.
//!
//! Registers the bundled models against the configured database and prints
//! their metadata as JSON on stdout.

use clap::Parser;
use model_registry::config::Config;
use model_registry::models::{
    Column, ColumnSet, FieldReflect, Model, NumericColumn, TextColumn, Value,
};
use model_registry::{ModelRegistry, RegistryResult};
use serde_json::{Map, json};
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the metadata JSON.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

struct UserModel {
    id_: Option<i64>,
    name: String,
    email: Option<String>,
}

static USER_ID: NumericColumn<Option<i64>> = NumericColumn::new("id_");
static USER_NAME: TextColumn = TextColumn::new("name");
static USER_EMAIL: TextColumn<Option<String>> = TextColumn::new("email");

impl Model for UserModel {
    fn id(&self) -> Option<i64> {
        self.id_
    }

    fn columns(columns: &mut ColumnSet<Self>) {
        columns
            .bind(&USER_ID, |user| user.id_)
            .bind(&USER_NAME, |user| user.name.clone())
            .bind(&USER_EMAIL, |user| user.email.clone());
    }
}

struct PostModel {
    id_: Option<i64>,
    title: String,
    views: i64,
    cover: Vec<u8>,
}

static POST_ID: NumericColumn<Option<i64>> = NumericColumn::new("id_");
static POST_TITLE: TextColumn = TextColumn::new("title");
static POST_VIEWS: NumericColumn<i64> = NumericColumn::new("views");
static POST_COVER: Column<Vec<u8>> = Column::new("cover");

impl Model for PostModel {
    fn id(&self) -> Option<i64> {
        self.id_
    }

    fn columns(columns: &mut ColumnSet<Self>) {
        columns
            .bind(&POST_ID, |post| post.id_)
            .bind(&POST_TITLE, |post| post.title.clone())
            .bind(&POST_VIEWS, |post| post.views)
            .bind(&POST_COVER, |post| post.cover.clone());
    }
}

/// Declares its columns by name and exposes fields through `FieldReflect`.
struct AuditLog {
    id_: Option<i64>,
    action: String,
}

static AUDIT_ID: NumericColumn<Option<i64>> = NumericColumn::new("id_");
static AUDIT_ACTION: TextColumn = TextColumn::new("action");

impl Model for AuditLog {
    fn id(&self) -> Option<i64> {
        self.id_
    }

    fn columns(columns: &mut ColumnSet<Self>) {
        columns.declare(&AUDIT_ID).declare(&AUDIT_ACTION);
    }
}

impl FieldReflect for AuditLog {
    fn data_fields() -> &'static [&'static str] {
        &["id_", "action"]
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "id_" => Some(self.id_.into()),
            "action" => Some(self.action.clone().into()),
            _ => None,
        }
    }
}

fn register_models(
    registry: &ModelRegistry,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_config = Arc::new(config.db_config()?);
    info!(
        connection_id = %db_config.id,
        backend = %db_config.backend,
        url = %db_config.masked_connection_string(),
        "Registering models"
    );

    registry.register::<UserModel>(Arc::clone(&db_config))?;
    registry.register::<PostModel>(Arc::clone(&db_config))?;
    registry.register::<AuditLog>(db_config)?;
    Ok(())
}

/// Read a sample instance back through the registered accessors.
fn sample_row<M: Model>(
    registry: &ModelRegistry,
    instance: &M,
) -> RegistryResult<serde_json::Value> {
    let record = registry.require::<M>()?;
    let instance: &dyn Any = instance;
    let mut row = Map::new();
    for (column, value) in record.row_values(instance)? {
        row.insert(column, json!(value));
    }
    Ok(json!({
        "table": record.table_name(),
        "persisted": record.is_persisted(instance)?,
        "row": row,
    }))
}

fn samples(registry: &ModelRegistry) -> RegistryResult<Vec<serde_json::Value>> {
    let user = UserModel {
        id_: Some(7),
        name: "ann".to_string(),
        email: None,
    };
    let post = PostModel {
        id_: None,
        title: "Hello".to_string(),
        views: 0,
        cover: b"png".to_vec(),
    };
    let audit = AuditLog {
        id_: Some(1),
        action: "login".to_string(),
    };
    Ok(vec![
        sample_row(registry, &user)?,
        sample_row(registry, &post)?,
        sample_row(registry, &audit)?,
    ])
}

/// The inspector's stdout document: registered models plus sample rows.
fn metadata_document(registry: &ModelRegistry) -> RegistryResult<serde_json::Value> {
    Ok(json!({
        "models": registry.list_all(),
        "samples": samples(registry)?,
    }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    info!(
        policy = %config.policy,
        "Starting model registry v{}",
        env!("CARGO_PKG_VERSION")
    );

    let registry = ModelRegistry::with_policy(config.policy);
    if let Err(e) = register_models(&registry, &config) {
        error!(error = %e, "Registration failed");
        return Err(e);
    }

    let document = metadata_document(&registry)?;
    let output = if config.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{output}");

    info!(models = registry.len(), "Done");
    Ok(())
}
