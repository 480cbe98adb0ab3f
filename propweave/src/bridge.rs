//! Bridge to the external model-object contract.
//!
//! Detection is a substring match on the textual names of the contracts a class
//! declares. It does not resolve supertypes, so a class that only inherits the
//! marker through a superclass is not detected, and any contract whose name
//! merely contains the marker is. The rest of the pipeline never resolves
//! supertypes either.

use log::debug;

use crate::conflict;
use crate::errors::HostError;
use crate::host::HostAst;
use crate::naming;
use crate::plan::{PlanContext, SynthesizedMember, plan_descriptor_accessor};

pub fn is_model_object(contracts: &[String], marker: &str) -> bool {
    !marker.is_empty() && contracts.iter().any(|contract| contract.contains(marker))
}

/// Inject the descriptor accessor when the class is a model object and has none yet.
///
/// Returns the injected member, or `None` when nothing had to be done.
pub fn ensure_descriptor_accessor<H: HostAst>(
    host: &mut H,
    class: &H::Node,
    ctx: &PlanContext<'_>,
) -> Result<Option<SynthesizedMember>, HostError> {
    let contracts = host.implemented_contracts(class);
    if !is_model_object(&contracts, &ctx.descriptor.marker) {
        return Ok(None);
    }

    let name = naming::descriptor_accessor_name(ctx.naming);
    if !conflict::needs_descriptor_accessor(host, class, name) {
        debug!("{}: descriptor accessor `{name}` already present", ctx.class_name);
        return Ok(None);
    }

    let member = plan_descriptor_accessor(ctx);
    if host.inject_method(class, &member)? {
        debug!("{}: injected descriptor accessor `{name}`", ctx.class_name);
        Ok(Some(member))
    } else {
        Ok(None)
    }
}
