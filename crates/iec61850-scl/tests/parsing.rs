// crates/iec61850-scl/tests/parsing.rs

use iec61850_scl::{
    AttributeType, DataModelValue, FunctionalConstraint, ModelNode, SampleMode, SclDocument,
    load_scl_from_file, load_scl_from_str,
};
use std::fs;
use std::path::PathBuf;

fn test_file_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let path = test_file_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn simple_io() -> SclDocument {
    env_logger::try_init().ok();
    load_scl_from_str(&load_test_file("simple_io.icd")).expect("Failed to parse simple_io.icd")
}

fn attribute_value(doc: &SclDocument, reference: &str) -> Option<DataModelValue> {
    let ap = doc.ied(None).unwrap().access_point(None).unwrap();
    match ap.find_node(reference) {
        Some(ModelNode::DataAttribute(da)) => da.value.clone(),
        other => panic!("{} is not a data attribute: {:?}", reference, other),
    }
}

#[test]
fn test_load_from_file_records_source_name() {
    let doc = load_scl_from_file(test_file_path("simple_io.icd")).unwrap();
    assert_eq!(doc.source_name.as_deref(), Some("simple_io.icd"));
    let header = doc.header.as_ref().unwrap();
    assert_eq!(header.id, "simpleIO");
    assert_eq!(header.tool_id.as_deref(), Some("manual"));
}

#[test]
fn test_instance_tree_shape() {
    let doc = simple_io();
    let ied = doc.ied(Some("simpleIO")).unwrap();
    assert!(ied.report_owner);

    let ap = ied.access_point(Some("accessPoint1")).unwrap();
    assert_eq!(ap.logical_devices.len(), 1);

    let ld = &ap.logical_devices[0];
    let ln_names: Vec<String> = ld.logical_nodes.iter().map(|ln| ln.name()).collect();
    assert_eq!(ln_names, vec!["LLN0", "LPHD1", "GGIO1"]);
    assert!(ld.logical_nodes[0].is_lln0());

    let ggio = &ld.logical_nodes[2];
    let do_names: Vec<&str> = ggio.data_objects.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(do_names, vec!["Mod", "Beh", "AnIn1", "SPCSO1", "SPCSO2"]);
}

#[test]
fn test_constructed_attributes_inherit_fc_and_triggers() {
    let doc = simple_io();
    let ap = doc.ied(None).unwrap().access_point(None).unwrap();

    let Some(ModelNode::DataAttribute(mag)) = ap.find_node("GenericIO/GGIO1.AnIn1.mag") else {
        panic!("mag not found");
    };
    assert_eq!(mag.attribute_type, AttributeType::Constructed);
    let f = &mag.sub_data_attributes[0];
    assert_eq!(f.name, "f");
    assert_eq!(f.fc, FunctionalConstraint::MX);
    assert!(f.trigger_options.dchg);

    let Some(ModelNode::DataAttribute(oper)) = ap.find_node("GenericIO/GGIO1.SPCSO1.Oper") else {
        panic!("Oper not found");
    };
    let names: Vec<&str> = oper.sub_data_attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["ctlVal", "origin", "ctlNum", "T", "Test", "Check"]);
    assert!(oper.sub_data_attributes.iter().all(|a| a.fc == FunctionalConstraint::CO));
    assert_eq!(oper.sub_data_attributes[1].sub_data_attributes.len(), 2);
}

#[test]
fn test_enumeration_defaults_and_overrides() {
    let doc = simple_io();

    // Template default symbol.
    assert_eq!(
        attribute_value(&doc, "GenericIO/LLN0.Beh.stVal"),
        Some(DataModelValue::Ordinal(1))
    );
    assert_eq!(
        attribute_value(&doc, "GenericIO/LLN0.Mod.stVal"),
        Some(DataModelValue::Ordinal(1))
    );
    // Numeric ordinal from a DAI.
    assert_eq!(
        attribute_value(&doc, "GenericIO/GGIO1.Mod.stVal"),
        Some(DataModelValue::Ordinal(2))
    );
    // Symbol from a DAI replaces the template default.
    assert_eq!(
        attribute_value(&doc, "GenericIO/GGIO1.SPCSO1.ctlModel"),
        Some(DataModelValue::Ordinal(1))
    );
    assert_eq!(
        attribute_value(&doc, "GenericIO/GGIO1.SPCSO2.ctlModel"),
        Some(DataModelValue::Ordinal(0))
    );
}

#[test]
fn test_sdi_reaches_constructed_attribute() {
    let doc = simple_io();
    assert_eq!(
        attribute_value(&doc, "GenericIO/GGIO1.AnIn1.mag.f"),
        Some(DataModelValue::Float32(1.5))
    );
    let ap = doc.ied(None).unwrap().access_point(None).unwrap();
    let Some(ModelNode::DataAttribute(f)) = ap.find_node("GenericIO/GGIO1.AnIn1.mag.f") else {
        panic!("mag.f not found");
    };
    assert_eq!(f.short_address.as_deref(), Some("100"));
}

#[test]
fn test_control_blocks_are_resolved() {
    let doc = simple_io();
    let ap = doc.ied(None).unwrap().access_point(None).unwrap();
    let lln0 = &ap.logical_devices[0].logical_nodes[0];

    assert_eq!(lln0.data_sets.len(), 2);
    let events = &lln0.data_sets[0];
    assert_eq!(events.members.len(), 2);
    assert_eq!(events.members[1].do_name, "SPCSO2");
    assert_eq!(events.members[1].fc, FunctionalConstraint::ST);

    let rcb = &lln0.report_controls[0];
    assert_eq!(rcb.name, "EventsRCB");
    assert!(rcb.indexed);
    assert_eq!(rcb.max_instances, 3);
    assert_eq!(rcb.trigger_options.bits(), 1 + 2 + 16);
    assert_eq!(rcb.options.bits(), 1 + 2 + 4);
    assert_eq!(rcb.clients[0].ied_name, "hmi");

    assert_eq!(lln0.gse_controls.len(), 2);
    assert_eq!(lln0.gse_controls[0].conf_rev, 2);

    let lcb = &lln0.log_controls[0];
    assert!(lcb.log_ena);
    assert!(lcb.reason_code);
    assert_eq!(lcb.log_name.as_deref(), Some("GenericIO"));
    assert_eq!(lln0.logs[0].name, "GenericIO");
    assert!(lln0.setting_control.is_none());
}

#[test]
fn test_communication_addresses() {
    let doc = simple_io();
    let cap = doc
        .communication
        .connected_ap("simpleIO", "accessPoint1")
        .unwrap();
    assert_eq!(cap.ip_address.as_deref(), Some("10.0.0.2"));

    let gse = cap.gse("GenericIO", "gcbEvents").unwrap();
    let address = gse.address.unwrap();
    assert_eq!(address.vlan_id, 100);
    assert_eq!(address.vlan_priority, 4);
    assert_eq!(address.app_id, 1000);
    assert_eq!(address.mac, [0x01, 0x0c, 0xcd, 0x01, 0x00, 0x01]);
    assert_eq!((gse.min_time, gse.max_time), (10, 2000));

    assert!(cap.gse("GenericIO", "gcbAnalog").is_none());
    assert_eq!(
        doc.communication.client_ip_address("hmi", Some("accessPoint1")),
        Some("192.168.1.10")
    );
}

#[test]
fn test_unused_templates_are_reported() {
    let doc = simple_io();
    assert_eq!(doc.unused_templates, vec!["UNUSED_SPS".to_string()]);
    assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);
    assert!(doc.registry.get("UNUSED_SPS").is_some());
}

#[test]
fn test_all_attribute_type_literals() {
    env_logger::try_init().ok();
    let doc = load_scl_from_str(&load_test_file("all_types.icd")).unwrap();
    let value = |name: &str| attribute_value(&doc, &format!("LD0/GGIO1.Vals.{}", name));

    assert_eq!(value("bool"), Some(DataModelValue::Boolean(true)));
    assert_eq!(value("i8"), Some(DataModelValue::Integer(-8)));
    assert_eq!(value("i16"), Some(DataModelValue::Integer(-1600)));
    // Overridden by a hex DAI literal.
    assert_eq!(value("i32"), Some(DataModelValue::Integer(0x7f)));
    assert_eq!(value("i64"), Some(DataModelValue::Integer(-64_000_000_000)));
    assert_eq!(value("u8"), Some(DataModelValue::Unsigned(200)));
    assert_eq!(value("u16"), Some(DataModelValue::Unsigned(60_000)));
    assert_eq!(value("u24"), Some(DataModelValue::Unsigned(16_000_000)));
    assert_eq!(value("u32"), Some(DataModelValue::Unsigned(4_000_000_000)));
    assert_eq!(value("f32"), Some(DataModelValue::Float32(3.5)));
    assert_eq!(value("f64"), Some(DataModelValue::Float64(2.25)));
    assert_eq!(value("beh"), Some(DataModelValue::Ordinal(2)));
    assert_eq!(value("pos"), Some(DataModelValue::Ordinal(2)));
    assert_eq!(value("tap"), Some(DataModelValue::Ordinal(2)));
    assert_eq!(value("oct"), Some(DataModelValue::Bytes(vec![0, 1, 2])));
    assert_eq!(value("ts"), Some(DataModelValue::EpochMillis(1_704_110_400_000)));
    assert_eq!(value("et"), Some(DataModelValue::EpochMillis(1_704_110_400_000)));
    assert_eq!(value("cur"), Some(DataModelValue::Text("EUR".into())));
    assert_eq!(value("v32"), Some(DataModelValue::Text("short".into())));
    assert_eq!(value("v64"), Some(DataModelValue::Text("medium".into())));
    assert_eq!(value("v65"), Some(DataModelValue::Text("medium plus".into())));
    assert_eq!(value("v129"), Some(DataModelValue::Text("long".into())));
    assert_eq!(value("v255"), Some(DataModelValue::Text("say \"hi\"".into())));
    assert_eq!(value("uni"), Some(DataModelValue::Text("grüße".into())));

    // Quality and Check literals are skipped with a diagnostic.
    assert_eq!(value("q"), None);
    assert_eq!(value("chk"), None);
    let skipped: Vec<&str> = doc.diagnostics.iter().map(|d| d.element.as_str()).collect();
    assert_eq!(skipped, ["LD0/GGIO1.Vals.q", "LD0/GGIO1.Vals.chk"]);
}

#[test]
fn test_sampled_value_defaults() {
    let xml = load_test_file("simple_io.icd").replace(
        r#"<Log name="GenericIO"/>"#,
        r#"<Log name="GenericIO"/>
            <SampledValueControl name="MSVCB01" smvID="sv01" datSet="Measurements" smpRate="80" nofASDU="1" confRev="1"/>"#,
    );
    let doc = load_scl_from_str(&xml).unwrap();
    let ap = doc.ied(None).unwrap().access_point(None).unwrap();
    let svcb = &ap.logical_devices[0].logical_nodes[0].sv_controls[0];
    assert_eq!(svcb.smp_mod, SampleMode::SamplesPerPeriod);
    assert!(svcb.multicast);
    assert_eq!(svcb.options.bits(), 0);
    assert_eq!(svcb.smp_rate, 80);
}
