//! Sample exporting parts for the exportkit test suites.
//!
//! Two contracts with the full spread of export shapes: a default export
//! each, `first`/`second` named exports, and a duplicated `multi` name.
//! A manifest activating the defaults looks like:
//!
//! ```yaml
//! parts:
//!   - type: "sample_exports.DefaultImplementation"
//!   - type: "sample_exports.AnotherDefaultImplementation"
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

/// Primary sample contract.
pub trait MySampleContract: Send + Sync {
    /// Name of the concrete implementation, for assertions.
    fn implementation_name(&self) -> &'static str;
}

/// Secondary sample contract, to exercise multi-contract catalogs.
pub trait AnotherSampleContract: Send + Sync {
    fn implementation_name(&self) -> &'static str;
}

exportkit::contract_identity!(dyn MySampleContract = "sample_exports.MySampleContract");
exportkit::contract_identity!(dyn AnotherSampleContract = "sample_exports.AnotherSampleContract");

/// Registered part keys, for use in manifests and tests.
pub mod keys {
    pub const DEFAULT_IMPLEMENTATION: &str = "sample_exports.DefaultImplementation";
    pub const FIRST_NAMED_IMPL: &str = "sample_exports.FirstNamedImpl";
    pub const SECOND_NAMED_IMPL: &str = "sample_exports.SecondNamedImpl";
    pub const FIRST_MULTI_IMPL: &str = "sample_exports.FirstMultiImpl";
    pub const SECOND_MULTI_IMPL: &str = "sample_exports.SecondMultiImpl";
    pub const ANOTHER_DEFAULT_IMPLEMENTATION: &str =
        "sample_exports.AnotherDefaultImplementation";
    pub const ANOTHER_FIRST_NAMED_IMPL: &str = "sample_exports.AnotherFirstNamedImpl";
    pub const ANOTHER_SECOND_NAMED_IMPL: &str = "sample_exports.AnotherSecondNamedImpl";
    pub const ANOTHER_FIRST_MULTI_IMPL: &str = "sample_exports.AnotherFirstMultiImpl";
    pub const ANOTHER_SECOND_MULTI_IMPL: &str = "sample_exports.AnotherSecondMultiImpl";
}

macro_rules! sample_impl {
    ($name:ident, $contract:ident) => {
        #[derive(Debug, Default)]
        pub struct $name;

        impl $contract for $name {
            fn implementation_name(&self) -> &'static str {
                stringify!($name)
            }
        }
    };
}

sample_impl!(DefaultImplementation, MySampleContract);
sample_impl!(FirstNamedImpl, MySampleContract);
sample_impl!(SecondNamedImpl, MySampleContract);
sample_impl!(FirstMultiImpl, MySampleContract);
sample_impl!(SecondMultiImpl, MySampleContract);

sample_impl!(AnotherDefaultImplementation, AnotherSampleContract);
sample_impl!(AnotherFirstNamedImpl, AnotherSampleContract);
sample_impl!(AnotherSecondNamedImpl, AnotherSampleContract);
sample_impl!(AnotherFirstMultiImpl, AnotherSampleContract);
sample_impl!(AnotherSecondMultiImpl, AnotherSampleContract);

exportkit::export_part! {
    DefaultImplementation as "sample_exports.DefaultImplementation" {
        default => dyn MySampleContract,
    }
}

exportkit::export_part! {
    FirstNamedImpl as "sample_exports.FirstNamedImpl" {
        "first" => dyn MySampleContract,
    }
}

exportkit::export_part! {
    SecondNamedImpl as "sample_exports.SecondNamedImpl" {
        "second" => dyn MySampleContract,
    }
}

exportkit::export_part! {
    FirstMultiImpl as "sample_exports.FirstMultiImpl" {
        "multi" => dyn MySampleContract,
    }
}

exportkit::export_part! {
    SecondMultiImpl as "sample_exports.SecondMultiImpl" {
        "multi" => dyn MySampleContract,
    }
}

exportkit::export_part! {
    AnotherDefaultImplementation as "sample_exports.AnotherDefaultImplementation" {
        default => dyn AnotherSampleContract,
    }
}

exportkit::export_part! {
    AnotherFirstNamedImpl as "sample_exports.AnotherFirstNamedImpl" {
        "first" => dyn AnotherSampleContract,
    }
}

exportkit::export_part! {
    AnotherSecondNamedImpl as "sample_exports.AnotherSecondNamedImpl" {
        "second" => dyn AnotherSampleContract,
    }
}

exportkit::export_part! {
    AnotherFirstMultiImpl as "sample_exports.AnotherFirstMultiImpl" {
        "multi" => dyn AnotherSampleContract,
    }
}

exportkit::export_part! {
    AnotherSecondMultiImpl as "sample_exports.AnotherSecondMultiImpl" {
        "multi" => dyn AnotherSampleContract,
    }
}
