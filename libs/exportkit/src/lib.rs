//! # exportkit
//!
//! Export discovery and contract resolution: plugin crates self-register
//! *exporting parts* (concrete types claiming to satisfy contracts,
//! optionally under a name), on-disk part manifests select which parts a
//! deployment activates, and the [`ServiceLocator`] answers
//! "give me the implementation(s) for contract X" queries or emits bulk
//! registration descriptors for an external DI container.
//!
//! Pipeline, leaves first:
//!
//! 1. [`registry`] — compile-time part registrations (`export_part!`).
//! 2. [`catalog`] — catalog providers turn configured directories into
//!    exporting parts.
//! 3. [`scanner`] / [`grouper`] — flatten parts into export records and
//!    partition them per contract, applying [`policy`] rules.
//! 4. [`locator`] — the query surface over an atomically swapped
//!    snapshot; settings hot-reload via [`locator::spawn_settings_watcher`].
//!
//! This crate is not a DI container: resolved lifetimes are hints for
//! whatever container consumes [`ServiceDescriptor`]s.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod export;
pub mod grouper;
pub mod locator;
pub mod policy;
pub mod registry;
pub mod scanner;
pub mod settings;

pub use catalog::{CatalogError, CatalogProvider, DirectoryCatalog, StaticCatalog};
pub use export::{
    BoxedExport, ExportDefinition, ExportGroup, ExportedService, ExportingPart,
    ImplementationHandle, InstanceFactory, ServiceDescriptor, ServiceLifetime,
};
pub use locator::{LocatorError, ServiceLocator, spawn_settings_watcher};
pub use policy::{CompiledPolicy, LifetimeRule, NameRule, PolicyError};
pub use registry::{ContractIdentity, ExportSpec, PartRegistry, PartSpec};
pub use settings::{BasePaths, DirectoryBase, DirectorySettings, LocatorSettings};

// Used by the registration macros.
pub use inventory;
