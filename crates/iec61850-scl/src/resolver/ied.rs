// crates/iec61850-scl/src/resolver/ied.rs

//! Resolves IEDs, access points, logical devices and logical nodes.

use super::{ResolutionContext, control_blocks, data_object, instances};
use crate::error::SclError;
use crate::model::ied as raw;
use crate::types::{AccessPoint, Ied, LogicalDevice, LogicalNode};
use log::debug;

pub(super) fn resolve_ied(ctx: &mut ResolutionContext<'_>, ied: &raw::Ied) -> Result<Ied, SclError> {
    let access_points = ied
        .access_points
        .iter()
        .map(|ap| {
            let logical_devices = ap
                .server
                .iter()
                .flat_map(|server| server.logical_devices.iter())
                .map(|ld| resolve_logical_device(ctx, ld))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AccessPoint {
                name: ap.name.clone(),
                desc: ap.desc.clone(),
                logical_devices,
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(Ied {
        name: ied.name.clone(),
        ied_type: ied.ied_type.clone(),
        manufacturer: ied.manufacturer.clone(),
        config_version: ied.config_version.clone(),
        desc: ied.desc.clone(),
        report_owner: ied
            .services
            .as_ref()
            .and_then(|s| s.report_settings.as_ref())
            .is_some_and(|r| r.owner),
        access_points,
    })
}

fn resolve_logical_device(
    ctx: &mut ResolutionContext<'_>,
    ld: &raw::LDevice,
) -> Result<LogicalDevice, SclError> {
    debug!("Resolving logical device {}", ld.inst);
    let logical_nodes = ld
        .ln0
        .iter()
        .map(|ln0| (ln0, true))
        .chain(ld.logical_nodes.iter().map(|ln| (ln, false)))
        .map(|(ln, is_ln0)| resolve_logical_node(ctx, ln, &ld.inst, is_ln0))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LogicalDevice {
        inst: ld.inst.clone(),
        ld_name: ld.ld_name.clone(),
        desc: ld.desc.clone(),
        logical_nodes,
    })
}

/// Instantiates a logical node from its `LNodeType`, applies its `DOI`
/// overrides and resolves its data sets and control blocks.
pub(super) fn resolve_logical_node(
    ctx: &mut ResolutionContext<'_>,
    ln: &raw::LogicalNode,
    ld_inst: &str,
    is_ln0: bool,
) -> Result<LogicalNode, SclError> {
    let path = format!("{}/{}{}{}", ld_inst, ln.prefix, ln.ln_class, ln.inst);
    let registry = ctx.registry;

    ctx.enter(&ln.ln_type)?;
    let lnode_type = registry.logical_node_type(&ln.ln_type, &path)?;
    let mut data_objects = lnode_type
        .data_objects
        .iter()
        .map(|def| data_object::instantiate_data_object(ctx, def, &path))
        .collect::<Result<Vec<_>, _>>()?;
    ctx.leave();

    instances::apply_instance_overrides(ctx, &mut data_objects, &ln.dois, &path)?;
    instances::bind_deferred_values(ctx, &mut data_objects, &path)?;

    let data_sets = ln
        .data_sets
        .iter()
        .map(|ds| control_blocks::resolve_data_set(ds, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let report_controls = ln
        .report_controls
        .iter()
        .map(|rc| control_blocks::resolve_report_control(rc, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let gse_controls = ln
        .gse_controls
        .iter()
        .map(|gc| control_blocks::resolve_gse_control(gc, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let sv_controls = ln
        .sv_controls
        .iter()
        .map(|sv| control_blocks::resolve_sv_control(sv, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let log_controls = ln
        .log_controls
        .iter()
        .map(|lc| control_blocks::resolve_log_control(lc, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let logs = ln.logs.iter().map(control_blocks::resolve_log).collect();
    let setting_control =
        control_blocks::resolve_setting_control(ctx, &ln.setting_controls, is_ln0 || ln.ln_class == "LLN0", &path)?;

    Ok(LogicalNode {
        prefix: ln.prefix.clone(),
        ln_class: ln.ln_class.clone(),
        inst: ln.inst.clone(),
        ln_type: ln.ln_type.clone(),
        desc: ln.desc.clone(),
        data_objects,
        data_sets,
        report_controls,
        gse_controls,
        sv_controls,
        log_controls,
        logs,
        setting_control,
    })
}
