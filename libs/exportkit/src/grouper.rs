//! Partitions exports by contract identity and resolves per-group policy.

use crate::export::{ExportGroup, ExportedService};
use crate::policy::CompiledPolicy;
use std::collections::HashMap;

/// Groups exports by exact contract identity equality.
///
/// Groups appear in first-seen order and every export lands in exactly one
/// group. The group's effective name and lifetime are resolved from the
/// *contract identity* string, never from export names.
#[must_use]
pub fn group(exports: Vec<ExportedService>, policy: &CompiledPolicy) -> Vec<ExportGroup> {
    let mut groups: Vec<ExportGroup> = Vec::new();
    let mut index: HashMap<std::sync::Arc<str>, usize> = HashMap::new();

    for export in exports {
        if let Some(&at) = index.get(&export.contract) {
            groups[at].available_exports.push(export);
        } else {
            let contract = export.contract.clone();
            index.insert(contract.clone(), groups.len());
            groups.push(ExportGroup {
                contract_name: policy.resolve_name(&contract).to_owned(),
                lifetime: policy.resolve_lifetime(&contract),
                contract,
                available_exports: vec![export],
            });
        }
    }
    groups
}
