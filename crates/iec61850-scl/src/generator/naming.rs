// crates/iec61850-scl/src/generator/naming.rs

//! Naming pass: assigns a C symbol to every model node and control block
//! and records the parent / sibling / first-child links between them.
//!
//! Nodes live in one arena in pre-order, so the emission pass can print
//! them in a single walk and refer to any neighbour by index.

use crate::addressing::encode_client_address;
use crate::lookup::ModelNode;
use crate::types::{
    AccessPoint, Communication, ConnectedAp, DataAttribute, DataObject, DataSet,
    FunctionalConstraint, GseControlBlock, GseEndpoint, Ied, LogControlBlock, LogDefinition,
    LogicalDevice, LogicalNode, PhyComAddress, ReportControlBlock, SettingGroupControlBlock,
    SvControlBlock,
};

pub(crate) type NodeId = usize;

/// One model node with its symbol and links.
#[derive(Debug)]
pub(crate) struct NamedNode<'a> {
    pub node: ModelNode<'a>,
    pub symbol: String,
    /// `None` for logical devices, whose parent is the IED model itself.
    pub parent: Option<NodeId>,
    pub next: Option<NodeId>,
    pub first_child: Option<NodeId>,
    /// Set on every node below a transient data object.
    pub transient: bool,
}

/// All model nodes of one access point, in pre-order.
#[derive(Debug, Default)]
pub(crate) struct NodeTable<'a> {
    pub nodes: Vec<NamedNode<'a>>,
    pub logical_devices: Vec<NodeId>,
}

pub(crate) fn logical_device_symbol(prefix: &str, ld: &LogicalDevice) -> String {
    format!("{}_{}", prefix, ld.inst)
}

pub(crate) fn logical_node_symbol(ld_symbol: &str, ln: &LogicalNode) -> String {
    format!("{}_{}", ld_symbol, ln.name())
}

/// Symbol of a data attribute. Attributes with functional constraint `SE`
/// live in a separate `<prefix>_SE_` namespace so they do not clash with
/// their `SG` copy.
fn data_attribute_symbol(parent_symbol: &str, da: &DataAttribute, prefix: &str) -> String {
    let symbol = format!("{}_{}", parent_symbol, da.name);
    if da.fc != FunctionalConstraint::SE {
        return symbol;
    }
    let se_prefix = format!("{}_SE_", prefix);
    if symbol.starts_with(&se_prefix) {
        return symbol;
    }
    match symbol.strip_prefix(&format!("{}_", prefix)) {
        Some(rest) => format!("{}{}", se_prefix, rest),
        None => symbol,
    }
}

impl<'a> NodeTable<'a> {
    pub fn build(ap: &'a AccessPoint, prefix: &str) -> Self {
        let mut table = NodeTable::default();
        for ld in &ap.logical_devices {
            let ld_id = table.push(
                ModelNode::LogicalDevice(ld),
                logical_device_symbol(prefix, ld),
                None,
                false,
            );
            let mut ln_ids = Vec::with_capacity(ld.logical_nodes.len());
            for ln in &ld.logical_nodes {
                let symbol = logical_node_symbol(&table.nodes[ld_id].symbol, ln);
                let ln_id = table.push(ModelNode::LogicalNode(ln), symbol, Some(ld_id), false);
                let children = table.push_data_objects(&ln.data_objects, ln_id, prefix, false);
                table.link(Some(ln_id), &children);
                ln_ids.push(ln_id);
            }
            table.link(Some(ld_id), &ln_ids);
            table.logical_devices.push(ld_id);
        }
        let lds = table.logical_devices.clone();
        table.link(None, &lds);
        table
    }

    fn push(
        &mut self,
        node: ModelNode<'a>,
        symbol: String,
        parent: Option<NodeId>,
        transient: bool,
    ) -> NodeId {
        self.nodes.push(NamedNode {
            node,
            symbol,
            parent,
            next: None,
            first_child: None,
            transient,
        });
        self.nodes.len() - 1
    }

    /// Chains `children` as siblings and, when given, hangs them below `parent`.
    fn link(&mut self, parent: Option<NodeId>, children: &[NodeId]) {
        if let (Some(parent), Some(&first)) = (parent, children.first()) {
            self.nodes[parent].first_child = Some(first);
        }
        for pair in children.windows(2) {
            self.nodes[pair[0]].next = Some(pair[1]);
        }
    }

    fn push_data_objects(
        &mut self,
        objects: &'a [DataObject],
        parent: NodeId,
        prefix: &str,
        transient: bool,
    ) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(objects.len());
        for dobj in objects {
            let transient = transient || dobj.transient;
            let symbol = format!("{}_{}", self.nodes[parent].symbol, dobj.name);
            let id = self.push(ModelNode::DataObject(dobj), symbol, Some(parent), transient);

            // Sub data objects first, then attributes.
            let mut children = self.push_data_objects(&dobj.sub_data_objects, id, prefix, transient);
            children.extend(self.push_data_attributes(&dobj.data_attributes, id, prefix, transient));
            self.link(Some(id), &children);
            ids.push(id);
        }
        ids
    }

    fn push_data_attributes(
        &mut self,
        attributes: &'a [DataAttribute],
        parent: NodeId,
        prefix: &str,
        transient: bool,
    ) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(attributes.len());
        for da in attributes {
            let symbol = data_attribute_symbol(&self.nodes[parent].symbol, da, prefix);
            let id = self.push(ModelNode::DataAttribute(da), symbol, Some(parent), transient);
            let children = self.push_data_attributes(&da.sub_data_attributes, id, prefix, transient);
            self.link(Some(id), &children);
            ids.push(id);
        }
        ids
    }

    pub fn symbol(&self, id: NodeId) -> &str {
        &self.nodes[id].symbol
    }
}

// --- Control blocks ---

/// A data set with its generated symbol.
#[derive(Debug)]
pub(crate) struct NamedDataSet<'a> {
    pub symbol: String,
    pub ld_inst: &'a str,
    pub ln_name: String,
    pub data_set: &'a DataSet,
}

/// One instance of a report control block. Indexed blocks expand into
/// `max_instances` of these.
#[derive(Debug)]
pub(crate) struct ReportInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub name: String,
    pub rcb: &'a ReportControlBlock,
    pub client_address: [u8; 17],
}

#[derive(Debug)]
pub(crate) struct GseInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub gcb: &'a GseControlBlock,
    pub endpoint: Option<&'a GseEndpoint>,
}

#[derive(Debug)]
pub(crate) struct SvInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub svcb: &'a SvControlBlock,
    pub address: Option<PhyComAddress>,
}

#[derive(Debug)]
pub(crate) struct SettingGroupInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub sgcb: &'a SettingGroupControlBlock,
}

#[derive(Debug)]
pub(crate) struct LogControlInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub lcb: &'a LogControlBlock,
    pub log_ref: Option<String>,
}

#[derive(Debug)]
pub(crate) struct LogInstance<'a> {
    pub symbol: String,
    pub ln_symbol: String,
    pub log: &'a LogDefinition,
}

/// Every data set and control block of one access point, per family in
/// emission order. Within a family, instance `i` links to instance `i + 1`.
#[derive(Debug, Default)]
pub(crate) struct ControlBlockTable<'a> {
    pub data_sets: Vec<NamedDataSet<'a>>,
    pub reports: Vec<ReportInstance<'a>>,
    pub gse: Vec<GseInstance<'a>>,
    pub smv: Vec<SvInstance<'a>>,
    pub setting_groups: Vec<SettingGroupInstance<'a>>,
    pub log_controls: Vec<LogControlInstance<'a>>,
    pub logs: Vec<LogInstance<'a>>,
}

impl<'a> ControlBlockTable<'a> {
    pub fn build(
        ied: &'a Ied,
        ap: &'a AccessPoint,
        communication: &'a Communication,
        prefix: &str,
    ) -> Self {
        let connected_ap = communication.connected_ap(&ied.name, &ap.name);
        let mut table = ControlBlockTable::default();

        for ld in &ap.logical_devices {
            let ld_symbol = logical_device_symbol(prefix, ld);
            for ln in &ld.logical_nodes {
                let ln_symbol = logical_node_symbol(&ld_symbol, ln);
                let ln_name = ln.name();

                for ds in &ln.data_sets {
                    table.data_sets.push(NamedDataSet {
                        symbol: format!("{}ds_{}_{}_{}", prefix, ld.inst, ln_name, ds.name),
                        ld_inst: &ld.inst,
                        ln_name: ln_name.clone(),
                        data_set: ds,
                    });
                }

                table.add_reports(ln, &ln_symbol, communication);
                table.add_gse(ld, ln, &ln_symbol, connected_ap);
                table.add_smv(ld, ln, &ln_symbol, connected_ap);

                if let Some(sgcb) = &ln.setting_control {
                    table.setting_groups.push(SettingGroupInstance {
                        symbol: format!("{}_sgcb", ln_symbol),
                        ln_symbol: ln_symbol.clone(),
                        sgcb,
                    });
                }

                for (n, lcb) in ln.log_controls.iter().enumerate() {
                    table.log_controls.push(LogControlInstance {
                        symbol: format!("{}_lcb{}", ln_symbol, n),
                        ln_symbol: ln_symbol.clone(),
                        lcb,
                        log_ref: log_reference(ld, lcb),
                    });
                }

                for (n, log) in ln.logs.iter().enumerate() {
                    table.logs.push(LogInstance {
                        symbol: format!("{}_log{}", ln_symbol, n),
                        ln_symbol: ln_symbol.clone(),
                        log,
                    });
                }
            }
        }
        table
    }

    /// Expands indexed report control blocks into `max_instances` numbered
    /// instances (`name01`, `name02`, ...). Client `i` is bound to instance `i`.
    fn add_reports(&mut self, ln: &'a LogicalNode, ln_symbol: &str, communication: &Communication) {
        let mut n = 0;
        for rcb in &ln.report_controls {
            let instances = if rcb.indexed { rcb.max_instances } else { 1 };
            for i in 0..instances as usize {
                let name = if rcb.indexed {
                    format!("{}{:02}", rcb.name, i + 1)
                } else {
                    rcb.name.clone()
                };
                let client_ip = rcb
                    .clients
                    .get(i)
                    .and_then(|c| communication.client_ip_address(&c.ied_name, c.ap_ref.as_deref()));
                self.reports.push(ReportInstance {
                    symbol: format!("{}_report{}", ln_symbol, n),
                    ln_symbol: ln_symbol.to_string(),
                    name,
                    rcb,
                    client_address: encode_client_address(client_ip),
                });
                n += 1;
            }
        }
    }

    fn add_gse(
        &mut self,
        ld: &LogicalDevice,
        ln: &'a LogicalNode,
        ln_symbol: &str,
        connected_ap: Option<&'a ConnectedAp>,
    ) {
        for (n, gcb) in ln.gse_controls.iter().enumerate() {
            self.gse.push(GseInstance {
                symbol: format!("{}_gse{}", ln_symbol, n),
                ln_symbol: ln_symbol.to_string(),
                gcb,
                endpoint: connected_ap.and_then(|cap| cap.gse(&ld.inst, &gcb.name)),
            });
        }
    }

    fn add_smv(
        &mut self,
        ld: &LogicalDevice,
        ln: &'a LogicalNode,
        ln_symbol: &str,
        connected_ap: Option<&'a ConnectedAp>,
    ) {
        for (n, svcb) in ln.sv_controls.iter().enumerate() {
            self.smv.push(SvInstance {
                symbol: format!("{}_smv{}", ln_symbol, n),
                ln_symbol: ln_symbol.to_string(),
                svcb,
                address: connected_ap
                    .and_then(|cap| cap.smv(&ld.inst, &svcb.name))
                    .and_then(|e| e.address),
            });
        }
    }
}

/// `<ldInst>/<LN>$<logName>` of a log control block, `LN` being `LLN0` or
/// prefix, class and instance of the referenced node.
fn log_reference(ld: &LogicalDevice, lcb: &LogControlBlock) -> Option<String> {
    let log_name = lcb.log_name.as_deref().filter(|n| !n.is_empty())?;
    let ld_inst = lcb.ld_inst.as_deref().unwrap_or(&ld.inst);
    let ln_class = lcb.ln_class.as_deref().unwrap_or("LLN0");
    let ln = if ln_class == "LLN0" {
        "LLN0".to_string()
    } else {
        format!("{}{}{}", lcb.prefix, ln_class, lcb.ln_inst)
    };
    Some(format!("{}/{}${}", ld_inst, ln, log_name))
}
