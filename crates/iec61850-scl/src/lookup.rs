// crates/iec61850-scl/src/lookup.rs

//! Name based navigation of the resolved instance tree.

use crate::types::{AccessPoint, DataAttribute, DataObject, LogicalDevice, LogicalNode};

/// A borrowed handle to any node of the instance tree.
#[derive(Debug, Clone, Copy)]
pub enum ModelNode<'a> {
    LogicalDevice(&'a LogicalDevice),
    LogicalNode(&'a LogicalNode),
    DataObject(&'a DataObject),
    DataAttribute(&'a DataAttribute),
}

impl<'a> ModelNode<'a> {
    pub fn name(&self) -> String {
        match self {
            ModelNode::LogicalDevice(ld) => ld.inst.clone(),
            ModelNode::LogicalNode(ln) => ln.name(),
            ModelNode::DataObject(dobj) => dobj.name.clone(),
            ModelNode::DataAttribute(da) => da.name.clone(),
        }
    }

    /// Direct child by name. Data attributes are searched before sub data
    /// objects; among attributes the first match wins.
    pub fn child(&self, name: &str) -> Option<ModelNode<'a>> {
        match *self {
            ModelNode::LogicalDevice(ld) => ld
                .logical_nodes
                .iter()
                .find(|ln| ln.name() == name)
                .map(ModelNode::LogicalNode),
            ModelNode::LogicalNode(ln) => ln
                .data_objects
                .iter()
                .find(|d| d.name == name)
                .map(ModelNode::DataObject),
            ModelNode::DataObject(dobj) => dobj
                .data_attributes
                .iter()
                .find(|a| a.name == name)
                .map(ModelNode::DataAttribute)
                .or_else(|| {
                    dobj.sub_data_objects
                        .iter()
                        .find(|d| d.name == name)
                        .map(ModelNode::DataObject)
                }),
            ModelNode::DataAttribute(da) => da
                .sub_data_attributes
                .iter()
                .find(|a| a.name == name)
                .map(ModelNode::DataAttribute),
        }
    }
}

impl AccessPoint {
    pub fn logical_device(&self, inst: &str) -> Option<&LogicalDevice> {
        self.logical_devices.iter().find(|ld| ld.inst == inst)
    }

    /// Resolves an object reference such as `LD0/GGIO1.Ind1.stVal`.
    ///
    /// `LD0` alone names the logical device, `LD0/GGIO1` the logical node.
    pub fn find_node(&self, reference: &str) -> Option<ModelNode<'_>> {
        let (ld_inst, rest) = match reference.split_once('/') {
            Some((ld, rest)) => (ld, Some(rest)),
            None => (reference, None),
        };
        let mut node = ModelNode::LogicalDevice(self.logical_device(ld_inst)?);
        if let Some(rest) = rest {
            for part in rest.split('.') {
                node = node.child(part)?;
            }
        }
        Some(node)
    }
}
