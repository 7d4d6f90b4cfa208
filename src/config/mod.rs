//! Configuration for Folio.
//!
//! User preferences live in a single KDL file, `config.kdl`, located at
//! `~/.config/folio/config.kdl` (or `$FOLIO_CONFIG_DIR/config.kdl`).
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `default-sort` - initial grid ordering
//! - `page-url` - URL used by the share action
//! - `data-file` - project dataset to load instead of the bundled one
//! - timing keys (`notification-ms`, `stagger-ms`, ...) for the page's delays
//!
//! ## Precedence
//!
//! CLI flag > environment > config.kdl > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, DATA_ENV, Resolved, ResolvedConfig, ValueSource,
    resolve_config,
};
pub use schema::{FolioConfig, OutputFormat, Timings};
