//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConfigFile::finalize (fill defaults)
//!     → SharedConfig (RwLock, shared by handle with every task)
//!
//! At runtime:
//!     watchers → SharedConfig::set_* (one field per write)
//!     HTTP handlers → SharedConfig accessors (read lock)
//!
//! On reload (SIGHUP or file change):
//!     loader.rs loads the file
//!     → merged over the current record
//!     → written back under one write lock
//! ```
//!
//! # Design Decisions
//! - Every on-disk field is optional; defaults fill the gaps
//! - A broken file never stops the service: defaults at startup, current record on reload
//! - Watched keys and timer settings are read once; changing them needs a restart

pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, save_config, ConfigError, ConfigFormat};
pub use schema::{ConfigFile, Settings};
pub use shared::SharedConfig;
pub use watcher::ConfigWatcher;
