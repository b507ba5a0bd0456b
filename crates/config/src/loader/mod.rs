//! Configuration loader: profiles + environment variables → validated tree.
//!
//! Responsibilities:
//! - Provide `ConfigLoader`, which builds one configuration tree per environment.
//! - Define `LoadOptions` and `LoadResult`.
//! - Read the process environment (`env_var_or_none`, `process_env_vars`, `load_dotenv`).
//!
//! Does NOT handle:
//! - Lifecycle, middleware and change notification (see `manager`).
//! - Deciding when to load `.env` files (callers invoke `load_dotenv` explicitly).
//!
//! Invariants / Assumptions:
//! - Supplied environment variables take precedence over profile env-var defaults,
//!   and env-derived values take precedence over profile defaults.
//! - The loader cache is owned by the loader instance; nothing is process-global.

mod builder;
mod cache;
mod env;
mod options;

pub use builder::ConfigLoader;
pub use env::{
    EnvironmentResolver, env_var_or_none, load_dotenv, process_env_vars,
    process_environment_resolver,
};
pub use options::{LoadOptions, LoadResult};

#[cfg(test)]
mod tests;
