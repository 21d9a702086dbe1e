//! Include expansion
//!
//! Walks the include tree depth-first, turning each element into a nested
//! plan node on its parent's selection. The tree that comes back is the one
//! actually evaluated, hook additions included.

use std::collections::BTreeSet;

use tracing::debug;

use crate::expressions::{merge_elements, FieldChain, IncludeElement};
use crate::observability::ComposeEvent;
use crate::plan::QueryPlanNode;
use crate::resources::{ResourceGraph, ResourceType};

use super::composer::Composer;
use super::errors::{ComposeError, ComposeResult};
use super::hooks::ResourceHooks;

impl<'a, G, H> Composer<'a, G, H>
where
    G: ResourceGraph + ?Sized,
    H: ResourceHooks + ?Sized,
{
    /// Expands `elements` under `parent`, whose type is `parent_type` and
    /// which sits at `chain` from the root (`None` for the root itself).
    ///
    /// The hook runs for every parent type, even with no elements requested.
    /// Elements naming the same relationship, from the request or the hook,
    /// are merged before expansion so each relationship is expanded once.
    pub(super) fn expand_includes(
        &mut self,
        elements: BTreeSet<IncludeElement>,
        parent_type: &'a ResourceType,
        parent: &mut QueryPlanNode,
        chain: Option<&FieldChain>,
    ) -> ComposeResult<BTreeSet<IncludeElement>> {
        let graph = self.graph;
        let requested = self.hooks.apply_includes(parent_type, elements);
        let requested_count = requested.len();
        let elements = merge_elements(requested);
        if elements.len() < requested_count {
            debug!(
                event = %ComposeEvent::IncludeSkippedDuplicate,
                resource_type = %parent_type.name,
                merged = requested_count - elements.len(),
                "duplicate relationships merged"
            );
        }

        let mut evaluated = BTreeSet::new();
        for element in elements {
            let relationship = parent_type.relationship(&element.relationship).ok_or_else(|| {
                ComposeError::invalid_relationship(&parent_type.name, &element.relationship, "cannot be included")
                    .with_scope(chain)
            })?;

            let child_chain = match chain {
                Some(chain) => chain.child(&relationship.name),
                None => FieldChain::single(&relationship.name),
            };
            let target = graph
                .require_type(&relationship.target)
                .map_err(|e| ComposeError::from(e).with_scope(Some(&child_chain)))?;

            let mut child = self.compose_node(target, Some(&child_chain), relationship.is_to_many())?;
            let children = self.expand_includes(element.children.clone(), target, &mut child, Some(&child_chain))?;

            parent.selection_mut().include_relationship(&relationship.name, child);
            debug!(
                event = %ComposeEvent::IncludeExpanded,
                resource_type = %parent_type.name,
                relationship = %child_chain,
                target = %target.name,
                "relationship included"
            );

            if children == element.children {
                evaluated.insert(element);
            } else {
                evaluated.insert(IncludeElement::with_children(element.relationship, children));
            }
        }

        Ok(evaluated)
    }
}
