// crates/iec61850-scl/tests/generation.rs

use iec61850_scl::{
    GeneratedModel, GeneratorConfig, SclDocument, SclError, StaticModelGenerator, load_scl_from_file,
    load_scl_from_str,
};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

fn load_test_document(name: &str) -> SclDocument {
    env_logger::try_init().ok();
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    load_scl_from_file(&path).unwrap_or_else(|e| panic!("Failed to load {:?}: {}", path, e))
}

fn generate(doc: &SclDocument, config: GeneratorConfig) -> GeneratedModel {
    StaticModelGenerator::new(doc, config)
        .generate()
        .expect("generation failed")
}

fn simple_io_model() -> GeneratedModel {
    generate(&load_test_document("simple_io.icd"), GeneratorConfig::default())
}

#[test]
fn test_header_layout() {
    let model = simple_io_model();
    assert_eq!(model.header_file_name, "static_model.h");
    assert!(model.header.starts_with(
        "/*\n * static_model.h\n *\n * automatically generated from simple_io.icd\n */\n\n\
         #ifndef STATIC_MODEL_H_\n#define STATIC_MODEL_H_\n\n\
         #include <stdlib.h>\n#include \"iec61850_model.h\"\n\n\
         extern IedModel iedModel;\n\
         extern LogicalDevice iedModel_GenericIO;\n\
         extern LogicalNode   iedModel_GenericIO_LLN0;\n\
         extern DataObject    iedModel_GenericIO_LLN0_Mod;\n\
         extern DataAttribute iedModel_GenericIO_LLN0_Mod_stVal;\n"
    ));
    assert!(model.header.contains(
        "#define IEDMODEL_GenericIO_GGIO1_Mod_stVal (&iedModel_GenericIO_GGIO1_Mod_stVal)\n"
    ));
    assert!(model.header.ends_with("\n#endif /* STATIC_MODEL_H_ */\n\n"));
}

#[test]
fn test_model_node_blocks() {
    let model = simple_io_model();
    let source = &model.source;

    assert!(source.starts_with(
        "/*\n * static_model.c\n *\n * automatically generated from simple_io.icd\n */\n\
         #include \"static_model.h\"\n\nstatic void initializeValues();\n"
    ));
    assert!(source.contains(
        "\nLogicalDevice iedModel_GenericIO = {\n    LogicalDeviceModelType,\n    \"GenericIO\",\n    \
         (ModelNode*) &iedModel,\n    NULL,\n    (ModelNode*) &iedModel_GenericIO_LLN0\n};\n"
    ));
    assert!(source.contains(
        "LogicalNode iedModel_GenericIO_GGIO1 = {\n    LogicalNodeModelType,\n    \"GGIO1\",\n    \
         (ModelNode*) &iedModel_GenericIO,\n    NULL,\n    (ModelNode*) &iedModel_GenericIO_GGIO1_Mod,\n};\n"
    ));
    assert!(source.contains(
        "DataAttribute iedModel_GenericIO_GGIO1_Mod_stVal = {\n    DataAttributeModelType,\n    \"stVal\",\n    \
         (ModelNode*) &iedModel_GenericIO_GGIO1_Mod,\n    (ModelNode*) &iedModel_GenericIO_GGIO1_Mod_q,\n    \
         NULL,\n    0,\n    IEC61850_FC_ST,\n    IEC61850_ENUMERATED,\n    0 + TRG_OPT_DATA_CHANGED,\n    \
         NULL,\n    17\n};\n"
    ));
    assert!(source.contains(
        "DataAttribute iedModel_GenericIO_GGIO1_AnIn1_mag_f = {\n    DataAttributeModelType,\n    \"f\",\n    \
         (ModelNode*) &iedModel_GenericIO_GGIO1_AnIn1_mag,\n    NULL,\n    NULL,\n    0,\n    IEC61850_FC_MX,\n    \
         IEC61850_FLOAT32,\n    0 + TRG_OPT_DATA_CHANGED,\n    NULL,\n    100\n};\n"
    ));
}

/// Every node referenced through a parent, sibling or child link must be
/// defined, and every header declaration must have a definition.
#[test]
fn test_link_targets_are_defined() {
    let model = simple_io_model();
    let defined: HashSet<&str> = model
        .source
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            let kind = words.next()?;
            let name = words.next()?;
            let defines = matches!(
                kind,
                "LogicalDevice" | "LogicalNode" | "DataObject" | "DataAttribute"
            ) && words.next() == Some("=");
            defines.then_some(name)
        })
        .collect();

    for line in model.source.lines() {
        if let Some(target) = line.trim().strip_prefix("(ModelNode*) &") {
            let target = target.trim_end_matches(',');
            assert!(
                target == "iedModel" || defined.contains(target),
                "dangling link to {}",
                target
            );
        }
    }

    for line in model.header.lines() {
        if let Some(decl) = line.strip_prefix("extern ") {
            let name = decl.split_whitespace().last().unwrap().trim_end_matches(';');
            assert!(
                name == "iedModel" || defined.contains(name),
                "declared but not defined: {}",
                name
            );
        }
    }
}

/// Links of one emitted model node.
struct NodeLinks {
    parent: Option<String>,
    next: Option<String>,
    first_child: Option<String>,
}

fn link_target(field: &str) -> Option<String> {
    field
        .trim()
        .trim_end_matches(',')
        .strip_prefix("(ModelNode*) &")
        .map(str::to_string)
}

/// Reads the parent, sibling and first child link of every model node
/// definition. The `IedModel` itself is recorded under its own symbol with
/// only a first child.
fn model_links(source: &str, model_symbol: &str) -> HashMap<String, NodeLinks> {
    let mut links = HashMap::new();
    let mut lines = source.lines();
    while let Some(line) = lines.next() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 3 || words[2] != "=" {
            continue;
        }
        let (kind, symbol) = (words[0], words[1]);
        if !matches!(
            kind,
            "LogicalDevice" | "LogicalNode" | "DataObject" | "DataAttribute" | "IedModel"
        ) {
            continue;
        }
        let fields: Vec<&str> = lines.by_ref().take_while(|l| !l.starts_with("};")).collect();
        match kind {
            "LogicalDevice" | "LogicalNode" | "DataObject" | "DataAttribute" => {
                links.insert(
                    symbol.to_string(),
                    NodeLinks {
                        parent: link_target(fields[2]),
                        next: link_target(fields[3]),
                        first_child: link_target(fields[4]),
                    },
                );
            }
            "IedModel" if symbol == model_symbol => {
                let first_ld = fields[1].trim().trim_end_matches(',').strip_prefix('&');
                links.insert(
                    symbol.to_string(),
                    NodeLinks {
                        parent: None,
                        next: None,
                        first_child: first_ld.map(str::to_string),
                    },
                );
            }
            _ => {}
        }
    }
    links
}

/// Starting from each node's first child, the sibling chain must visit
/// every node naming it as parent exactly once and then end.
fn assert_sibling_chains(model: &GeneratedModel) {
    let links = model_links(&model.source, "iedModel");
    assert!(links.contains_key("iedModel"));

    let mut child_counts: HashMap<&str, usize> = HashMap::new();
    for node in links.values() {
        if let Some(parent) = &node.parent {
            *child_counts.entry(parent.as_str()).or_default() += 1;
        }
    }

    for (symbol, node) in &links {
        let mut visited = HashSet::new();
        let mut current = node.first_child.clone();
        while let Some(child) = current {
            let child_links = links
                .get(&child)
                .unwrap_or_else(|| panic!("{} links to undefined {}", symbol, child));
            assert_eq!(child_links.parent.as_deref(), Some(symbol.as_str()));
            assert!(visited.insert(child.clone()), "{} visited twice", child);
            current = child_links.next.clone();
        }
        assert_eq!(
            visited.len(),
            child_counts.get(symbol.as_str()).copied().unwrap_or(0),
            "children of {}",
            symbol
        );
    }
}

#[test]
fn test_sibling_chains_cover_every_child_once() {
    assert_sibling_chains(&simple_io_model());
    assert_sibling_chains(&generate(
        &load_test_document("all_types.icd"),
        GeneratorConfig::default(),
    ));
}

#[test]
fn test_report_control_fan_out() {
    let model = simple_io_model();
    let source = &model.source;
    let client = "0x04, 0xC0, 0xA8, 0x01, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00";
    let no_client = vec!["0x00"; 17].join(", ");

    // dchg + qchg + gi, plus the owner flag.
    assert!(source.contains(&format!(
        "ReportControlBlock iedModel_GenericIO_LLN0_report0 = {{&iedModel_GenericIO_LLN0, \"EventsRCB01\", \
         \"Events\", false, \"Events\", 1, 83, 7, 50, 1000, {{{}}}, &iedModel_GenericIO_LLN0_report1}};",
        client
    )));
    assert!(source.contains(&format!(
        "ReportControlBlock iedModel_GenericIO_LLN0_report1 = {{&iedModel_GenericIO_LLN0, \"EventsRCB02\", \
         \"Events\", false, \"Events\", 1, 83, 7, 50, 1000, {{{}}}, &iedModel_GenericIO_LLN0_report2}};",
        no_client
    )));
    assert!(source.contains("\"EventsRCB03\""));
    assert!(source.contains(&format!("{{{}}}, NULL}};", no_client)));
    assert!(!source.contains("report3"));
}

#[test]
fn test_goose_addresses() {
    let model = simple_io_model();
    let source = &model.source;
    assert!(source.contains(
        "\nstatic PhyComAddress iedModel_GenericIO_LLN0_gse0_address = {\n  4,\n  100,\n  1000,\n  \
         {0x1, 0xc, 0xcd, 0x1, 0x0, 0x1}\n};\n"
    ));
    assert!(source.contains(
        "GSEControlBlock iedModel_GenericIO_LLN0_gse0 = {&iedModel_GenericIO_LLN0, \"gcbEvents\", \"events\", \
         \"Events\", 2, false, &iedModel_GenericIO_LLN0_gse0_address, 10, 2000, &iedModel_GenericIO_LLN0_gse1};"
    ));
    // No communication entry: no address, default times.
    assert!(source.contains(
        "GSEControlBlock iedModel_GenericIO_LLN0_gse1 = {&iedModel_GenericIO_LLN0, \"gcbAnalog\", \"analog\", \
         \"Measurements\", 1, false, NULL, -1, -1, NULL};"
    ));
    assert!(!source.contains("gse1_address"));
}

#[test]
fn test_data_sets_logs_and_ied_model() {
    let model = simple_io_model();
    let source = &model.source;
    assert!(source.contains(
        "DataSetEntry iedModelds_GenericIO_LLN0_Events_fcda0 = {\n  \"GenericIO\",\n  false,\n  \
         \"GGIO1$ST$SPCSO1$stVal\", \n  -1,\n  NULL,\n  NULL,\n  &iedModelds_GenericIO_LLN0_Events_fcda1\n};\n"
    ));
    assert!(source.contains(
        "DataSet iedModelds_GenericIO_LLN0_Events = {\n  \"GenericIO\",\n  \"LLN0$Events\",\n  2,\n  \
         &iedModelds_GenericIO_LLN0_Events_fcda0,\n  &iedModelds_GenericIO_LLN0_Measurements\n};\n"
    ));
    assert!(source.contains("  \"GGIO1$MX$AnIn1\", \n"));
    assert!(source.contains(
        "LogControlBlock iedModel_GenericIO_LLN0_lcb0 = {&iedModel_GenericIO_LLN0, \"EventLog\", \"Events\", \
         \"GenericIO/LLN0$GenericIO\", 3, 0, true, true, NULL};"
    ));
    assert!(source.contains(
        "Log iedModel_GenericIO_LLN0_log0 = {&iedModel_GenericIO_LLN0, \"GenericIO\", NULL};"
    ));
    assert!(source.contains(
        "\nIedModel iedModel = {\n    \"simpleIO\",\n    &iedModel_GenericIO,\n    \
         &iedModelds_GenericIO_LLN0_Events,\n    &iedModel_GenericIO_LLN0_report0,\n    \
         &iedModel_GenericIO_LLN0_gse0,\n    NULL,\n    NULL,\n    &iedModel_GenericIO_LLN0_lcb0,\n    \
         &iedModel_GenericIO_LLN0_log0,\n    initializeValues};\n"
    ));
}

#[test]
fn test_initializer_values() {
    let model = simple_io_model();
    let source = &model.source;
    assert!(source.contains("\nstatic void\ninitializeValues()\n{\n"));
    assert!(source.ends_with("}\n"));
    assert!(source.contains(
        "\niedModel_GenericIO_LLN0_Beh_stVal.mmsValue = MmsValue_newIntegerFromInt32(1);\n"
    ));
    assert!(source.contains(
        "\niedModel_GenericIO_GGIO1_Mod_stVal.mmsValue = MmsValue_newIntegerFromInt32(2);\n"
    ));
    assert!(source.contains(
        "\niedModel_GenericIO_GGIO1_AnIn1_mag_f.mmsValue = MmsValue_newFloat(1.5);\n"
    ));
    assert!(source.contains(
        "\niedModel_GenericIO_LLN0_NamPlt_vendor.mmsValue = MmsValue_newVisibleString(\"example vendor\");\n"
    ));
    assert!(model.diagnostics.is_empty(), "{:?}", model.diagnostics);
}

#[test]
fn test_initialize_once_guards() {
    let doc = load_test_document("simple_io.icd");
    let model = generate(&doc, GeneratorConfig::default().with_initialize_once(true));
    assert!(model.source.contains(
        "\nif (iedModel_GenericIO_GGIO1_Mod_stVal.mmsValue == NULL) {\n\
         iedModel_GenericIO_GGIO1_Mod_stVal.mmsValue = MmsValue_newIntegerFromInt32(2);\n}\n"
    ));
}

#[test]
fn test_all_type_initializers() {
    let doc = load_test_document("all_types.icd");
    let model = generate(&doc, GeneratorConfig::default());
    let source = &model.source;
    let sym = "iedModel_LD0_GGIO1_Vals";
    let expected = [
        format!("{}_bool.mmsValue = MmsValue_newBoolean(true);", sym),
        format!("{}_i8.mmsValue = MmsValue_newIntegerFromInt32(-8);", sym),
        format!("{}_i32.mmsValue = MmsValue_newIntegerFromInt32(127);", sym),
        format!("{}_i64.mmsValue = MmsValue_newIntegerFromInt64(-64000000000);", sym),
        format!("{}_u32.mmsValue = MmsValue_newUnsignedFromUint32(4000000000);", sym),
        format!("{}_f32.mmsValue = MmsValue_newFloat(3.5);", sym),
        format!("{}_f64.mmsValue = MmsValue_newDouble(2.25);", sym),
        format!("{}_beh.mmsValue = MmsValue_newIntegerFromInt32(2);", sym),
        format!("{}_pos.mmsValue = MmsValue_newBitString(2);", sym),
        format!("MmsValue_setBitStringFromIntegerBigEndian({}_pos.mmsValue, 2);", sym),
        format!("uint8_t {}_oct__val[] = {{0x00, 0x01, 0x02}};", sym),
        format!("MmsValue_setOctetString({0}_oct.mmsValue, {0}_oct__val, 3);", sym),
        format!("{}_ts.mmsValue = MmsValue_newUtcTimeByMsTime(1704110400000);", sym),
        format!("{}_et.mmsValue = MmsValue_newBinaryTime(false);", sym),
        format!("MmsValue_setBinaryTime({}_et.mmsValue, 1704110400000);", sym),
        format!("{}_cur.mmsValue = MmsValue_newVisibleString(\"EUR\");", sym),
        format!("{}_v255.mmsValue = MmsValue_newVisibleString(\"say \\\"hi\\\"\");", sym),
        format!("{}_uni.mmsValue = MmsValue_newMmsString(\"grüße\");", sym),
    ];
    for line in &expected {
        assert!(source.contains(line), "missing initializer: {}", line);
    }
    assert!(!source.contains(&format!("{}_q.mmsValue", sym)));
    assert!(!source.contains(&format!("{}_chk.mmsValue", sym)));
}

#[test]
fn test_custom_names() {
    let doc = load_test_document("simple_io.icd");
    let config = GeneratorConfig::default()
        .with_ied_name("simpleIO")
        .with_access_point("accessPoint1")
        .with_output_name("my-model")
        .with_model_prefix("myModel");
    let model = generate(&doc, config);
    assert_eq!(model.header_file_name, "my-model.h");
    assert_eq!(model.source_file_name, "my-model.c");
    assert!(model.header.contains("#ifndef MY_MODEL_H_\n"));
    assert!(model.header.contains("#define MYMODEL_GenericIO (&myModel_GenericIO)\n"));
    assert!(model.source.contains("#include \"my-model.h\"\n"));
    assert!(model.source.contains("\nIedModel myModel = {\n"));
}

#[test]
fn test_ied_name_is_escaped() {
    let xml = r#"<SCL>
  <IED name="Bay &quot;A&quot;\1">
    <AccessPoint name="AP1">
      <Server>
        <LDevice inst="LD0">
          <LN0 lnClass="LLN0" lnType="LLN0_T" inst=""/>
        </LDevice>
      </Server>
    </AccessPoint>
  </IED>
  <DataTypeTemplates>
    <LNodeType id="LLN0_T" lnClass="LLN0"><DO name="Beh" type="ENS_T"/></LNodeType>
    <DOType id="ENS_T" cdc="ENS"><DA name="stVal" bType="Enum" type="Beh" fc="ST"/></DOType>
    <EnumType id="Beh"><EnumVal ord="1">on</EnumVal></EnumType>
  </DataTypeTemplates>
</SCL>"#;
    let doc = load_scl_from_str(xml).unwrap();
    let model = generate(&doc, GeneratorConfig::default());
    assert!(
        model
            .source
            .contains("IedModel iedModel = {\n    \"Bay \\\"A\\\"\\\\1\",\n")
    );
}

#[test]
fn test_write_to_directory() {
    let doc = load_test_document("simple_io.icd");
    let dir = tempfile::tempdir().unwrap();
    let generator =
        StaticModelGenerator::new(&doc, GeneratorConfig::default().with_output_dir(dir.path()));
    let model = generator.write().unwrap();

    let header = fs::read_to_string(dir.path().join("static_model.h")).unwrap();
    let source = fs::read_to_string(dir.path().join("static_model.c")).unwrap();
    assert_eq!(header, model.header);
    assert_eq!(source, model.source);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_failed_source_write_keeps_previous_pair() {
    let doc = load_test_document("simple_io.icd");
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("static_model.h"), "old header").unwrap();
    // a directory in place of the source staging file makes its write fail
    fs::create_dir(dir.path().join(".static_model.c.tmp")).unwrap();

    let generator =
        StaticModelGenerator::new(&doc, GeneratorConfig::default().with_output_dir(dir.path()));
    assert!(matches!(generator.write(), Err(SclError::Io(_))));

    assert_eq!(
        fs::read_to_string(dir.path().join("static_model.h")).unwrap(),
        "old header"
    );
    assert!(!dir.path().join("static_model.c").exists());
    assert!(!dir.path().join(".static_model.h.tmp").exists());
}

#[test]
fn test_failed_generation_writes_nothing() {
    let doc = load_test_document("simple_io.icd");
    let dir = tempfile::tempdir().unwrap();
    let generator = StaticModelGenerator::new(
        &doc,
        GeneratorConfig::default()
            .with_ied_name("missingIED")
            .with_output_dir(dir.path()),
    );
    assert!(matches!(
        generator.write(),
        Err(SclError::IedNotFound { name: Some(_) })
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let generator = StaticModelGenerator::new(
        &doc,
        GeneratorConfig::default().with_access_point("missingAP"),
    );
    assert!(matches!(
        generator.generate(),
        Err(SclError::AccessPointNotFound { .. })
    ));
}
