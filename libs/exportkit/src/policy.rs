//! Ordered pattern rules mapping contract identities to effective names
//! and lifetimes.
//!
//! Rules are declared as ordered lists, not maps: iteration order is part
//! of the contract (first matching pattern wins). Patterns are regular
//! expressions matched with *search* semantics against the contract's
//! canonical identity string, so a plain substring like a namespace prefix
//! is a valid pattern.

use crate::export::ServiceLifetime;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maps contracts matching `pattern` to an effective contract name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRule {
    pub pattern: String,
    pub name: String,
}

/// Maps contracts matching `pattern` to a lifetime hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifetimeRule {
    pub pattern: String,
    pub lifetime: ServiceLifetime,
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid policy pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Compiled rule tables, ready for repeated lookups.
#[derive(Debug, Default)]
pub struct CompiledPolicy {
    names: Vec<(Regex, String)>,
    lifetimes: Vec<(Regex, ServiceLifetime)>,
}

impl CompiledPolicy {
    /// Compiles both rule tables, preserving declaration order.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidPattern` for the first pattern that is
    /// not a valid regular expression.
    pub fn compile(contracts: &[NameRule], lifetimes: &[LifetimeRule]) -> Result<Self, PolicyError> {
        let names = contracts
            .iter()
            .map(|rule| Ok((compile_pattern(&rule.pattern)?, rule.name.clone())))
            .collect::<Result<Vec<_>, PolicyError>>()?;
        let lifetimes = lifetimes
            .iter()
            .map(|rule| Ok((compile_pattern(&rule.pattern)?, rule.lifetime)))
            .collect::<Result<Vec<_>, PolicyError>>()?;
        Ok(Self { names, lifetimes })
    }

    /// Effective contract name for `identity`; empty means "use defaults".
    #[must_use]
    pub fn resolve_name<'a>(&'a self, identity: &str) -> &'a str {
        self.names
            .iter()
            .find(|(pattern, _)| pattern.is_match(identity))
            .map_or("", |(_, name)| name.as_str())
    }

    /// Lifetime hint for `identity`; unmatched contracts are singletons.
    #[must_use]
    pub fn resolve_lifetime(&self, identity: &str) -> ServiceLifetime {
        self.lifetimes
            .iter()
            .find(|(pattern, _)| pattern.is_match(identity))
            .map_or(ServiceLifetime::Singleton, |(_, lifetime)| *lifetime)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, PolicyError> {
    Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
        pattern: pattern.to_owned(),
        source: Box::new(source),
    })
}
