//! The public query surface over the current catalog snapshot.
//!
//! Design notes:
//! - Queries are read-only against an immutable [`Snapshot`] published via
//!   `ArcSwap`: readers see either the fully-old or fully-new catalog and
//!   policy pair, never a torn mix.
//! - Rebuilds happen off-lock: a settings swap scans into a fresh snapshot
//!   and publishes it with one atomic pointer store. An old snapshot is
//!   released when the last in-flight query drops its `Arc`, so disposal
//!   is safe while queries are pending.
//! - Single-result resolves among duplicates are deterministic: first by
//!   discovery order (directory order, then file order, then declaration
//!   order within a part).

use crate::catalog::CatalogProvider;
use crate::export::{ExportGroup, ExportedService, ServiceDescriptor};
use crate::grouper;
use crate::policy::{CompiledPolicy, PolicyError};
use crate::registry::ContractIdentity;
use crate::scanner;
use crate::settings::{BasePaths, LocatorSettings};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// A single-result resolve found no matching active export.
    #[error("no export found for contract '{contract}' (name: {name:?})")]
    NotFound {
        contract: String,
        name: Option<String>,
    },

    /// A resolved export's instance is not the requested contract type.
    /// This points at a bad registration, not a bad query.
    #[error("export '{type_name}' for contract '{contract}' is not the requested type")]
    ContractMismatch { contract: String, type_name: String },

    #[error(transparent)]
    Catalog(#[from] crate::catalog::CatalogError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// One immutable scan result: settings, groups, and a contract index.
struct Snapshot {
    settings: LocatorSettings,
    groups: Vec<ExportGroup>,
    index: HashMap<Arc<str>, usize>,
}

impl Snapshot {
    fn build(
        settings: LocatorSettings,
        provider: &dyn CatalogProvider,
        paths: &BasePaths,
    ) -> Result<Self, LocatorError> {
        let policy = CompiledPolicy::compile(&settings.contracts, &settings.lifetimes)?;

        let mut parts = Vec::new();
        for dir in &settings.directories {
            parts.extend(provider.load(dir, paths)?);
        }

        let exports = scanner::scan(&parts);
        let groups = grouper::group(exports, &policy);
        let index = groups
            .iter()
            .enumerate()
            .map(|(at, group)| (group.contract.clone(), at))
            .collect();

        Ok(Self {
            settings,
            groups,
            index,
        })
    }

    fn group(&self, contract: &str) -> Option<&ExportGroup> {
        self.index.get(contract).map(|&at| &self.groups[at])
    }
}

/// Locates contract implementations discovered from the configured
/// catalog directories.
///
/// Intended to be shared as a singleton and queried concurrently; the
/// only mutation point is [`ServiceLocator::set_settings`].
pub struct ServiceLocator {
    provider: Arc<dyn CatalogProvider>,
    paths: BasePaths,
    snapshot: ArcSwap<Snapshot>,
}

impl ServiceLocator {
    /// Builds the locator and its initial snapshot.
    ///
    /// # Errors
    /// Fails when a configured directory cannot be scanned or a policy
    /// pattern does not compile; a locator never starts without a usable
    /// catalog.
    pub fn new(
        settings: LocatorSettings,
        provider: Arc<dyn CatalogProvider>,
        paths: BasePaths,
    ) -> Result<Self, LocatorError> {
        let snapshot = Snapshot::build(settings, provider.as_ref(), &paths)?;
        Ok(Self {
            provider,
            paths,
            snapshot: ArcSwap::from_pointee(snapshot),
        })
    }

    /// The currently active settings.
    #[must_use]
    pub fn settings(&self) -> LocatorSettings {
        self.snapshot.load().settings.clone()
    }

    /// Atomically swaps in new settings.
    ///
    /// The new catalog is scanned into a fresh snapshot before the swap;
    /// in-flight queries keep reading the old one until it lands.
    ///
    /// # Errors
    /// On a broken catalog or policy the previous good snapshot stays in
    /// service and the error is returned to the caller.
    pub fn set_settings(&self, settings: LocatorSettings) -> Result<(), LocatorError> {
        let snapshot = Snapshot::build(settings, self.provider.as_ref(), &self.paths)?;
        self.snapshot.store(Arc::new(snapshot));
        tracing::debug!("locator snapshot replaced");
        Ok(())
    }

    /// Resolves the single active export for a contract, using the
    /// policy-configured name. First by discovery order among duplicates.
    ///
    /// # Errors
    /// `NotFound` when no active export matches.
    pub fn resolve_export(&self, contract: &str) -> Result<ExportedService, LocatorError> {
        let snapshot = self.snapshot.load();
        snapshot
            .group(contract)
            .and_then(|group| group.active_exports().next().cloned())
            .ok_or_else(|| LocatorError::NotFound {
                contract: contract.to_owned(),
                name: None,
            })
    }

    /// Resolves the single export matching an explicit name, bypassing the
    /// configured policy. A blank name selects default exports.
    ///
    /// # Errors
    /// `NotFound` when no export matches.
    pub fn resolve_export_named(
        &self,
        contract: &str,
        name: &str,
    ) -> Result<ExportedService, LocatorError> {
        let snapshot = self.snapshot.load();
        snapshot
            .group(contract)
            .and_then(|group| group.exports_named(name).next().cloned())
            .ok_or_else(|| LocatorError::NotFound {
                contract: contract.to_owned(),
                name: Some(name.to_owned()),
            })
    }

    /// All active exports for a contract; empty when none match.
    #[must_use]
    pub fn resolve_exports(&self, contract: &str) -> Vec<ExportedService> {
        let snapshot = self.snapshot.load();
        snapshot
            .group(contract)
            .map(|group| group.active_exports().cloned().collect())
            .unwrap_or_default()
    }

    /// All exports matching an explicit name; empty when none match.
    #[must_use]
    pub fn resolve_exports_named(&self, contract: &str, name: &str) -> Vec<ExportedService> {
        let snapshot = self.snapshot.load();
        snapshot
            .group(contract)
            .map(|group| group.exports_named(name).cloned().collect())
            .unwrap_or_default()
    }

    /// Resolves an implementation of `T` using the configured policy.
    ///
    /// # Errors
    /// `NotFound` when no active export matches; `ContractMismatch` when
    /// the registered instance is not an `Arc<T>`.
    pub fn resolve<T>(&self) -> Result<Arc<T>, LocatorError>
    where
        T: ContractIdentity + ?Sized,
    {
        instantiate_as::<T>(&self.resolve_export(T::IDENTITY)?)
    }

    /// Resolves an implementation of `T` by explicit name.
    ///
    /// # Errors
    /// Same as [`ServiceLocator::resolve`].
    pub fn resolve_named<T>(&self, name: &str) -> Result<Arc<T>, LocatorError>
    where
        T: ContractIdentity + ?Sized,
    {
        instantiate_as::<T>(&self.resolve_export_named(T::IDENTITY, name)?)
    }

    /// Resolves every active implementation of `T`.
    ///
    /// # Errors
    /// `ContractMismatch` when a registered instance is not an `Arc<T>`;
    /// zero matches yield an empty vec, not an error.
    pub fn resolve_all<T>(&self) -> Result<Vec<Arc<T>>, LocatorError>
    where
        T: ContractIdentity + ?Sized,
    {
        self.resolve_exports(T::IDENTITY)
            .iter()
            .map(instantiate_as::<T>)
            .collect()
    }

    /// Resolves every implementation of `T` matching an explicit name.
    ///
    /// # Errors
    /// Same as [`ServiceLocator::resolve_all`].
    pub fn resolve_all_named<T>(&self, name: &str) -> Result<Vec<Arc<T>>, LocatorError>
    where
        T: ContractIdentity + ?Sized,
    {
        self.resolve_exports_named(T::IDENTITY, name)
            .iter()
            .map(instantiate_as::<T>)
            .collect()
    }

    /// Every active export as a registration descriptor for an external
    /// container. Never raises not-found or ambiguity; duplicates are the
    /// container's concern.
    #[must_use]
    pub fn exporting_services(&self) -> Vec<ServiceDescriptor> {
        let snapshot = self.snapshot.load();
        snapshot
            .groups
            .iter()
            .flat_map(|group| {
                group.active_exports().map(|export| ServiceDescriptor {
                    contract: group.contract.clone(),
                    implementation: export.implementation.clone(),
                    lifetime: group.lifetime,
                })
            })
            .collect()
    }
}

fn instantiate_as<T>(export: &ExportedService) -> Result<Arc<T>, LocatorError>
where
    T: ?Sized + 'static,
{
    export
        .implementation
        .instantiate()
        .downcast::<Arc<T>>()
        .map(|arc| *arc)
        .map_err(|_| LocatorError::ContractMismatch {
            contract: String::from(&*export.contract),
            type_name: export.implementation.type_name().to_owned(),
        })
}

/// Applies settings updates from a watch channel until the sender goes
/// away or `cancel` fires. A rejected update is logged and the previous
/// snapshot keeps serving.
pub fn spawn_settings_watcher(
    locator: Arc<ServiceLocator>,
    mut updates: tokio::sync::watch::Receiver<LocatorSettings>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let settings = updates.borrow_and_update().clone();
                    match locator.set_settings(settings) {
                        Ok(()) => tracing::info!("locator settings reloaded"),
                        Err(error) => tracing::warn!(
                            error = %error,
                            "settings update rejected; keeping previous snapshot"
                        ),
                    }
                }
            }
        }
    })
}
