//! Flattens catalog parts into a normalized export list.

use crate::export::{ExportedService, ExportingPart};

/// Produces one [`ExportedService`] per export definition, preserving part
/// and declaration order. The definition's declared metadata is
/// authoritative; a definition without a contract identity contributes
/// nothing.
#[must_use]
pub fn scan(parts: &[ExportingPart]) -> Vec<ExportedService> {
    parts
        .iter()
        .flat_map(|part| part.exports.iter())
        .filter_map(|def| {
            if def.contract.is_empty() {
                tracing::warn!(
                    implementation = def.implementation.type_name(),
                    "export without contract identity; skipping"
                );
                return None;
            }
            Some(ExportedService {
                contract: def.contract.clone(),
                export_name: def.name.clone(),
                implementation: def.implementation.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::export::{BoxedExport, ExportDefinition, ImplementationHandle};
    use std::sync::Arc;

    fn factory() -> BoxedExport {
        Box::new(Arc::new(0u8))
    }

    fn handle(type_name: &str) -> ImplementationHandle {
        ImplementationHandle::new(type_name, factory)
    }

    #[test]
    fn scan_preserves_part_and_declaration_order() {
        let parts = vec![
            ExportingPart::new(vec![
                ExportDefinition::new("a.Contract", handle("a.First")),
                ExportDefinition::named("b.Contract", "x", handle("a.First")),
            ]),
            ExportingPart::new(vec![ExportDefinition::new("a.Contract", handle("b.Second"))]),
        ];

        let exports = scan(&parts);
        assert_eq!(exports.len(), 3);
        assert_eq!(&*exports[0].contract, "a.Contract");
        assert_eq!(&*exports[1].contract, "b.Contract");
        assert_eq!(exports[2].implementation.type_name(), "b.Second");
    }

    #[test]
    fn empty_parts_contribute_nothing() {
        let parts = vec![ExportingPart::default()];
        assert!(scan(&parts).is_empty());
    }

    #[test]
    fn export_without_contract_identity_is_skipped() {
        let parts = vec![ExportingPart::new(vec![
            ExportDefinition::named("", "orphan", handle("a.Broken")),
            ExportDefinition::new("a.Contract", handle("a.Fine")),
        ])];

        let exports = scan(&parts);
        assert_eq!(exports.len(), 1);
        assert_eq!(&*exports[0].contract, "a.Contract");
    }
}
