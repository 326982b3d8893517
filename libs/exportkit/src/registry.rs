//! Compile-time part registry.
//!
//! Implementation crates do not get reflected over; they self-register an
//! explicit table of `(contract identity, export name)` pairs through
//! [`export_part!`], collected with `inventory` at link time. Catalog
//! providers then resolve part keys from manifests against this registry.
//!
//! Contract identities are stable strings chosen by the contract's owner
//! (see [`contract_identity!`]), never derived from runtime type names.

use crate::export::{BoxedExport, ExportDefinition, ExportingPart, ImplementationHandle};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Associates a stable identity string with a contract trait object.
///
/// Implemented for `dyn Contract` types, usually via [`contract_identity!`].
pub trait ContractIdentity: 'static {
    const IDENTITY: &'static str;
}

/// One export declared by a registered part.
pub struct ExportSpec {
    pub contract: &'static str,
    /// `None` marks a default export; it is published under the contract
    /// identity itself.
    pub name: Option<&'static str>,
    pub construct: fn() -> BoxedExport,
}

/// Static registration of one exporting part.
pub struct PartSpec {
    /// Stable key a manifest uses to activate this part.
    pub type_name: &'static str,
    pub exports: &'static [ExportSpec],
}

inventory::collect!(PartSpec);

/// All parts linked into the process, keyed by their registered type name.
pub struct PartRegistry {
    parts: HashMap<&'static str, &'static PartSpec>,
}

impl PartRegistry {
    /// The process-wide registry snapshot. Registrations are complete
    /// before `main`, so the first call sees every linked part.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<PartRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut parts: HashMap<&'static str, &'static PartSpec> = HashMap::new();
            for spec in inventory::iter::<PartSpec> {
                if parts.contains_key(spec.type_name) {
                    tracing::warn!(
                        part = spec.type_name,
                        "duplicate part registration ignored; first one stays"
                    );
                } else {
                    parts.insert(spec.type_name, spec);
                }
            }
            PartRegistry { parts }
        })
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&'static PartSpec> {
        self.parts.get(type_name).copied()
    }
}

impl PartSpec {
    /// Materializes the registration into a catalog part.
    #[must_use]
    pub fn to_part(&self) -> ExportingPart {
        let type_name: Arc<str> = Arc::from(self.type_name);
        let exports = self
            .exports
            .iter()
            .map(|spec| {
                let handle = ImplementationHandle::new(type_name.clone(), spec.construct);
                match spec.name {
                    None => ExportDefinition::new(spec.contract, handle),
                    Some(name) => ExportDefinition::named(spec.contract, name, handle),
                }
            })
            .collect();
        ExportingPart::new(exports)
    }
}

/// Declares the stable identity of a contract trait object.
///
/// ```ignore
/// pub trait Greeter: Send + Sync { /* .. */ }
/// exportkit::contract_identity!(dyn Greeter = "demo.Greeter");
/// ```
#[macro_export]
macro_rules! contract_identity {
    (dyn $contract:path = $identity:literal) => {
        impl $crate::registry::ContractIdentity for dyn $contract {
            const IDENTITY: &'static str = $identity;
        }
    };
}

/// Registers a `Default`-constructible type as an exporting part.
///
/// Each arm exports the type under one contract: `default =>` publishes a
/// default export, a string literal publishes a named one. Contracts must
/// be `Send + Sync` traits with a declared [`ContractIdentity`].
///
/// ```ignore
/// exportkit::export_part! {
///     ConsoleGreeter as "demo.ConsoleGreeter" {
///         default => dyn Greeter,
///         "fancy" => dyn FancyGreeter,
///     }
/// }
/// ```
#[macro_export]
macro_rules! export_part {
    ($imp:ty as $key:literal { $( $name:tt => dyn $contract:path ),+ $(,)? }) => {
        $crate::inventory::submit! {
            $crate::registry::PartSpec {
                type_name: $key,
                exports: &[
                    $(
                        $crate::registry::ExportSpec {
                            contract:
                                <dyn $contract as $crate::registry::ContractIdentity>::IDENTITY,
                            name: $crate::export_part!(@name $name),
                            construct: || -> $crate::export::BoxedExport {
                                ::std::boxed::Box::new(
                                    ::std::sync::Arc::new(
                                        <$imp as ::core::default::Default>::default(),
                                    )
                                        as ::std::sync::Arc<dyn $contract>,
                                )
                            },
                        },
                    )+
                ],
            }
        }
    };
    (@name default) => {
        ::core::option::Option::None
    };
    (@name $name:literal) => {
        ::core::option::Option::Some($name)
    };
}
