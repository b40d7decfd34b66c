//! Reconciler: the core engine that drives observed GitHub organization
//! state toward a declared permissions configuration.

pub mod alert;
pub mod client_cache;
pub mod errors;
pub mod filters;
pub mod plugin;
pub mod reconciler;
pub mod repo_reconcile;
pub mod team_state_machine;

pub use client_cache::OrgClientCache;
pub use errors::Error;
pub use reconciler::reconcile_org;
