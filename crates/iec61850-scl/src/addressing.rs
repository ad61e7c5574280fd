// crates/iec61850-scl/src/addressing.rs

//! Resolves the `<Communication>` section and joins control blocks to
//! their physical communication parameters.
//!
//! A control block is matched to a `GSE`/`SMV` entry of the `ConnectedAP`
//! whose `iedName` and `apName` equal the IED and access point being
//! compiled, and whose `ldInst`/`cbName` equal the logical device instance
//! and control block name.

use crate::error::SclError;
use crate::model;
use crate::types::{
    Communication, ConnectedAp, GseEndpoint, PhyComAddress, SubNetwork, SvEndpoint,
};
use std::net::IpAddr;

/// Resolves the raw `<Communication>` element. A missing section yields an
/// empty communication with no endpoints.
pub(crate) fn resolve_communication(
    raw: Option<model::Communication>,
) -> Result<Communication, SclError> {
    let Some(raw) = raw else {
        return Ok(Communication::default());
    };

    let sub_networks = raw
        .sub_networks
        .into_iter()
        .map(|sn| {
            let connected_aps = sn
                .connected_aps
                .iter()
                .map(resolve_connected_ap)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SubNetwork {
                name: sn.name,
                network_type: sn.network_type,
                connected_aps,
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(Communication { sub_networks })
}

fn resolve_connected_ap(
    cap: &model::communication::ConnectedAp,
) -> Result<ConnectedAp, SclError> {
    let gse = cap
        .gse
        .iter()
        .map(|entry| {
            Ok(GseEndpoint {
                ld_inst: entry.ld_inst.clone(),
                cb_name: entry.cb_name.clone(),
                address: entry.address.as_ref().map(parse_phy_com_address).transpose()?,
                min_time: parse_duration(entry.min_time.as_ref(), "MinTime")?,
                max_time: parse_duration(entry.max_time.as_ref(), "MaxTime")?,
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    let smv = cap
        .smv
        .iter()
        .map(|entry| {
            Ok(SvEndpoint {
                ld_inst: entry.ld_inst.clone(),
                cb_name: entry.cb_name.clone(),
                address: entry.address.as_ref().map(parse_phy_com_address).transpose()?,
            })
        })
        .collect::<Result<Vec<_>, SclError>>()?;

    Ok(ConnectedAp {
        ied_name: cap.ied_name.clone(),
        ap_name: cap.ap_name.clone(),
        ip_address: cap
            .address
            .as_ref()
            .and_then(|a| a.parameter("IP"))
            .map(str::to_string),
        gse,
        smv,
    })
}

/// Parses the `P` parameters of a GSE/SMV address, applying the defaults
/// VLAN-ID 0, VLAN-PRIORITY 4, APPID 0 and MAC 01-0C-CD-01-00-00.
pub fn parse_phy_com_address(address: &model::communication::Address) -> Result<PhyComAddress, SclError> {
    let mut result = PhyComAddress::default();

    if let Some(vlan_id) = address.parameter("VLAN-ID") {
        let value = parse_hex(vlan_id, "VLAN-ID")?;
        if value > 0xFFF {
            return Err(SclError::InvalidAddress {
                parameter: "VLAN-ID",
                value: vlan_id.to_string(),
            });
        }
        result.vlan_id = value as u16;
    }

    if let Some(priority) = address.parameter("VLAN-PRIORITY") {
        result.vlan_priority = priority.parse::<u8>().map_err(|_| SclError::InvalidAddress {
            parameter: "VLAN-PRIORITY",
            value: priority.to_string(),
        })?;
    }

    if let Some(app_id) = address.parameter("APPID") {
        let value = parse_hex(app_id, "APPID")?;
        if value > 0xFFFF {
            return Err(SclError::InvalidAddress {
                parameter: "APPID",
                value: app_id.to_string(),
            });
        }
        result.app_id = value as u16;
    }

    if let Some(mac) = address.parameter("MAC-Address") {
        result.mac = parse_mac_address(mac)?;
    }

    Ok(result)
}

fn parse_hex(text: &str, parameter: &'static str) -> Result<u32, SclError> {
    u32::from_str_radix(text, 16).map_err(|_| SclError::InvalidAddress {
        parameter,
        value: text.to_string(),
    })
}

/// Parses `01-0C-CD-01-00-01`: exactly six hyphen separated hex octets.
fn parse_mac_address(text: &str) -> Result<[u8; 6], SclError> {
    let invalid = || SclError::InvalidAddress {
        parameter: "MAC-Address",
        value: text.to_string(),
    };
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 6 || parts.iter().any(|p| p.len() != 2) {
        return Err(invalid());
    }
    let bytes = hex::decode(parts.concat())?;
    bytes.try_into().map_err(|_| invalid())
}

fn parse_duration(
    duration: Option<&model::communication::Duration>,
    element: &'static str,
) -> Result<i32, SclError> {
    match duration {
        None => Ok(-1),
        Some(d) => d
            .value
            .trim()
            .parse::<i32>()
            .map_err(|_| SclError::InvalidAttributeFormat {
                element: element.to_string(),
                attribute: "value",
                value: d.value.clone(),
            }),
    }
}

impl Communication {
    /// Finds the `ConnectedAP` of the given IED and access point.
    pub fn connected_ap(&self, ied_name: &str, ap_name: &str) -> Option<&ConnectedAp> {
        self.sub_networks
            .iter()
            .flat_map(|sn| sn.connected_aps.iter())
            .find(|cap| cap.ied_name == ied_name && cap.ap_name == ap_name)
    }

    /// IP address of a report client, searching all access points of
    /// `ied_name` (restricted to `ap_ref` when given).
    pub fn client_ip_address(&self, ied_name: &str, ap_ref: Option<&str>) -> Option<&str> {
        self.sub_networks
            .iter()
            .flat_map(|sn| sn.connected_aps.iter())
            .filter(|cap| cap.ied_name == ied_name)
            .filter(|cap| ap_ref.is_none_or(|ap| ap == cap.ap_name))
            .find_map(|cap| cap.ip_address.as_deref())
    }
}

impl ConnectedAp {
    pub fn gse(&self, ld_inst: &str, cb_name: &str) -> Option<&GseEndpoint> {
        self.gse
            .iter()
            .find(|e| e.ld_inst == ld_inst && e.cb_name == cb_name)
    }

    pub fn smv(&self, ld_inst: &str, cb_name: &str) -> Option<&SvEndpoint> {
        self.smv
            .iter()
            .find(|e| e.ld_inst == ld_inst && e.cb_name == cb_name)
    }
}

/// Encodes a client address as the 17 byte report client field: a length
/// prefix (4 or 6) followed by the address octets, zero padded.
///
/// Unparsable addresses (including host names) encode as all zeros.
pub fn encode_client_address(address: Option<&str>) -> [u8; 17] {
    let mut bytes = [0u8; 17];
    match address.and_then(|a| a.trim().parse::<IpAddr>().ok()) {
        Some(IpAddr::V4(v4)) => {
            bytes[0] = 4;
            bytes[1..5].copy_from_slice(&v4.octets());
        }
        Some(IpAddr::V6(v6)) => {
            bytes[0] = 6;
            bytes[1..17].copy_from_slice(&v6.octets());
        }
        None => {}
    }
    bytes
}
