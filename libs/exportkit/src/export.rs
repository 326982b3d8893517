//! Core data model for discovered exports.
//!
//! An *export* is a claim by a concrete type that it satisfies a contract,
//! optionally under a name. Exports are discovered from catalog parts, then
//! flattened into [`ExportedService`] records and grouped per contract into
//! [`ExportGroup`]s. Everything here is an immutable projection of one
//! catalog scan; nothing is mutated after construction.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Instance reuse hint for the external container.
///
/// This subsystem never manages instance lifetimes itself; the hint is
/// carried through to bulk registration untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLifetime {
    #[default]
    Singleton,
    Scoped,
    Transient,
}

/// A freshly constructed export instance, boxed as `Any`.
///
/// By convention the box holds an `Arc<dyn Contract>`; typed callers
/// downcast it back (see `ServiceLocator::resolve`).
pub type BoxedExport = Box<dyn Any + Send + Sync>;

/// Constructs a new instance of an implementation, cast to one contract.
pub type InstanceFactory = fn() -> BoxedExport;

/// Identity of a concrete implementing type, plus the means to instantiate
/// it as a particular contract.
#[derive(Clone)]
pub struct ImplementationHandle {
    type_name: Arc<str>,
    construct: InstanceFactory,
}

impl ImplementationHandle {
    pub fn new(type_name: impl Into<Arc<str>>, construct: InstanceFactory) -> Self {
        Self {
            type_name: type_name.into(),
            construct,
        }
    }

    /// Stable identity of the concrete type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Builds a fresh instance. Instance reuse is the caller's concern.
    #[must_use]
    pub fn instantiate(&self) -> BoxedExport {
        (self.construct)()
    }
}

impl fmt::Debug for ImplementationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationHandle")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// One declared export on a catalog part.
///
/// A *default* export carries its contract identity as its name; named
/// exports carry the explicit name they were published under.
#[derive(Debug, Clone)]
pub struct ExportDefinition {
    pub contract: Arc<str>,
    pub name: Arc<str>,
    pub implementation: ImplementationHandle,
}

impl ExportDefinition {
    /// A default (unnamed) export: the name equals the contract identity.
    pub fn new(contract: impl Into<Arc<str>>, implementation: ImplementationHandle) -> Self {
        let contract = contract.into();
        Self {
            name: contract.clone(),
            contract,
            implementation,
        }
    }

    /// An export published under an explicit name.
    pub fn named(
        contract: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        implementation: ImplementationHandle,
    ) -> Self {
        Self {
            contract: contract.into(),
            name: name.into(),
            implementation,
        }
    }
}

/// One unit of the catalog: a concrete type advertising its exports.
#[derive(Debug, Clone, Default)]
pub struct ExportingPart {
    pub exports: Vec<ExportDefinition>,
}

impl ExportingPart {
    #[must_use]
    pub fn new(exports: Vec<ExportDefinition>) -> Self {
        Self { exports }
    }
}

/// A flattened scanner record: one export, ready for grouping.
#[derive(Debug, Clone)]
pub struct ExportedService {
    pub contract: Arc<str>,
    pub export_name: Arc<str>,
    pub implementation: ImplementationHandle,
}

impl ExportedService {
    /// True when no explicit name was given, i.e. the export was published
    /// under its contract's canonical identity.
    #[must_use]
    pub fn is_default_contract(&self) -> bool {
        self.export_name == self.contract
    }
}

/// All exports sharing one contract identity, plus the policy resolved for
/// that contract. Read-only once built.
#[derive(Debug, Clone)]
pub struct ExportGroup {
    pub contract: Arc<str>,
    /// Effective name filter; empty means "use default exports".
    pub contract_name: String,
    pub lifetime: ServiceLifetime,
    /// All exports for this contract, in discovery order.
    pub available_exports: Vec<ExportedService>,
}

impl ExportGroup {
    /// Exports matching `name`; a blank (empty or whitespace-only) name
    /// selects default exports.
    pub fn exports_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ExportedService> {
        self.available_exports.iter().filter(move |export| {
            if name.trim().is_empty() {
                export.is_default_contract()
            } else {
                &*export.export_name == name
            }
        })
    }

    /// The exports actually in effect under the resolved `contract_name`.
    pub fn active_exports(&self) -> impl Iterator<Item = &ExportedService> {
        self.exports_named(&self.contract_name)
    }
}

/// Bulk registration unit handed to an external DI container.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub contract: Arc<str>,
    pub implementation: ImplementationHandle,
    pub lifetime: ServiceLifetime,
}
