/// Public library interface for the Hours Planner MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;
pub mod validation;

// Re-export public modules and types
pub use config::{Args, Backend};
pub use domain::*;
pub use storage::{Session, SessionStore, SqliteStore, StorageError, StrategyStore};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main hours planner server that implements the MCP protocol
///
/// The server owns exactly one strategy store; every tool call goes
/// through it.
pub struct HoursPlannerServer {
    store: Box<dyn StrategyStore>,
}

impl HoursPlannerServer {
    /// Create a server around an already constructed store
    pub fn new(store: Box<dyn StrategyStore>) -> Self {
        Self { store }
    }

    /// Build the store described by the command line arguments
    pub async fn from_config(args: &Args) -> Result<Self, ServerError> {
        let store: Box<dyn StrategyStore> = match args.backend {
            Backend::Session => {
                tracing::info!("Initializing Hours Planner server with a session store");
                let session = Session::new();
                if args.seed {
                    Box::new(SessionStore::with_seed_data(session)?)
                } else {
                    Box::new(SessionStore::new(session)?)
                }
            }
            Backend::Sqlite => {
                let db_path = args.database_path()?;
                tracing::info!("Initializing Hours Planner server with database: {:?}", db_path);
                let store = SqliteStore::new(db_path)?;
                if args.seed {
                    store.seed().await?;
                }
                Box::new(store)
            }
        };

        Ok(Self::new(store))
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let strategies = self.store.sorted_strategies().await?;
        tracing::info!("Server started successfully, found {} existing strategies", strategies.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }

    /// Get a reference to the store (useful for testing)
    pub fn store(&self) -> &dyn StrategyStore {
        self.store.as_ref()
    }
}
