use crate::core::elements::Element;
use crate::core::elements::radii::CovalentRadii;
use crate::engine::config::UnknownElementPolicy;
use crate::engine::error::EngineError;
use std::collections::BTreeSet;
use tracing::warn;

/// Looks up the covalent radius of every element in order.
///
/// Under [`UnknownElementPolicy::NonBonding`] unknown elements map to `None` and each
/// distinct symbol is warned about once; under [`UnknownElementPolicy::Abort`] the
/// first unknown element is returned as an error.
pub fn resolve_radii<'e>(
    elements: impl IntoIterator<Item = &'e Element>,
    radii: &CovalentRadii,
    policy: UnknownElementPolicy,
) -> Result<Vec<Option<f64>>, EngineError> {
    let mut unknown = BTreeSet::new();
    let mut resolved = Vec::new();
    for element in elements {
        match radii.radius(element) {
            Ok(r) => resolved.push(Some(r)),
            Err(e) => match policy {
                UnknownElementPolicy::Abort => return Err(e.into()),
                UnknownElementPolicy::NonBonding => {
                    unknown.insert(element.symbol());
                    resolved.push(None);
                }
            },
        }
    }
    for symbol in unknown {
        warn!(
            element = symbol,
            "No covalent radius for element; its atoms are treated as non-bonding."
        );
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_elements_become_non_bonding() {
        let elements = [Element::new("C"), Element::new("Xx"), Element::new("Xx")];
        let resolved =
            resolve_radii(&elements, &CovalentRadii::new(), UnknownElementPolicy::NonBonding)
                .unwrap();
        assert_eq!(resolved, vec![Some(0.77), None, None]);
    }

    #[test]
    fn abort_policy_surfaces_unknown_element() {
        let elements = [Element::new("C"), Element::new("Xx")];
        let err = resolve_radii(&elements, &CovalentRadii::new(), UnknownElementPolicy::Abort)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownElement { ref source } if source.symbol == "Xx"));
    }
}
