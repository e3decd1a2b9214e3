// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Copyright 2026 Oxide Computer Company

use std::collections::BTreeSet;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use tdi::field_utils::*;
use tdi::targets::dummy;
use tdi::targets::dummy::DummyTableType;
use tdi::AttributesType;
use tdi::FieldDataType;
use tdi::MatchType;
use tdi::OperationsType;
use tdi::Status;
use tdi::TableApiType;
use tdi::TdiId;
use tdi::TdiInfo;
use tdi::TdiInfoParser;

const FORWARD: &str = "pipe.SwitchIngress.forward";
const FORWARD_ID: TdiId = 37882547;

fn fixture(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
        .iter()
        .collect()
}

fn log() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

fn parser() -> TdiInfoParser {
    TdiInfoParser::new(Box::new(dummy::mapper().unwrap()), &log())
}

fn load(files: &[&str]) -> TdiInfo {
    let mut p = parser();
    let paths: Vec<PathBuf> = files.iter().map(|f| fixture(f)).collect();
    p.parse_tdi_info(&paths).unwrap();
    TdiInfo::new("switch", p, &dummy::Factory, &log())
}

#[test]
fn test_load_switch() {
    let info = load(&["switch.tdi.json"]);
    assert_eq!(info.p4_name_get(), "switch");

    let names: Vec<&str> = info.tables_get().iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        vec![
            "pipe.SwitchEgress.fwd_counter",
            "pipe.SwitchIngress.forward",
            "pipe.SwitchIngress.fwd_counter",
        ]
    );

    // Register tables aren't implemented by the dummy target.
    let invalid: Vec<&str> =
        info.invalid_table_names().iter().map(String::as_str).collect();
    assert_eq!(invalid, vec!["pipe.SwitchIngress.flow_state"]);
    let e = info
        .table_from_name_get("pipe.SwitchIngress.flow_state")
        .unwrap_err();
    assert_eq!(e.status(), Status::InvalidArg);
}

#[test]
fn test_forward_table() {
    let info = load(&["switch.tdi.json"]);
    let t = info.table_from_name_get(FORWARD).unwrap();
    assert_eq!(t.id(), FORWARD_ID);
    assert_eq!(t.size(), 1024);
    assert_eq!(t.table_type(), DummyTableType::MATCH_DIRECT);
    assert!(!t.has_const_default_action());
    assert!(t.depends_on().is_empty());

    // Operation and attribute names resolve through the dummy mapper.
    let ops: Vec<OperationsType> =
        t.operations_supported().iter().copied().collect();
    assert_eq!(ops, vec![OperationsType::DEVICE]);
    let attrs: Vec<AttributesType> =
        t.attributes_supported().iter().copied().collect();
    assert_eq!(attrs, vec![AttributesType::DEVICE, AttributesType(0x81)]);

    assert_eq!(t.key_field_id_list_get(), vec![1, 2, 3]);
    let dst = t.key_field_get(1).unwrap();
    assert_eq!(dst.name(), "hdr.ethernet.dst_addr");
    assert_eq!(dst.match_type(), MatchType::EXACT);
    assert_eq!(dst.data_type(), FieldDataType::ByteStream);
    assert_eq!(dst.size_bits(), 48);
    let port = t.key_field_get_by_name("ig_intr_md.ingress_port").unwrap();
    assert_eq!(port.match_type(), MatchType::TERNARY);
    assert!(port.is_field_slice());
    assert!(!port.mandatory());
    assert_eq!(t.key_field_id_get("$MATCH_PRIORITY").unwrap(), 3);
    assert_eq!(t.key_field_get(3).unwrap().size_bits(), 32);

    assert_eq!(t.action_id_list_get(), vec![20000001, 20000002]);
    let hit = t.action_get_by_name("SwitchIngress.hit").unwrap();
    assert_eq!(hit.data_field_id_list_get(), vec![1]);
    let miss = t.action_get(20000002).unwrap();
    assert!(miss.data_fields().is_empty());
    assert_eq!(miss.annotations().len(), 1);

    assert_eq!(t.common_data_field_id_list_get(), vec![65553, 65554]);
    assert_eq!(
        t.data_field_id_list_get(20000001).unwrap(),
        vec![1, 65553, 65554]
    );
    let f = t.data_field_get(1, 20000001).unwrap();
    assert_eq!(f.name(), "port");
    assert_eq!(f.size_bits(), 9);
    assert!(f.mandatory());
    let pkts = t.data_field_id_get("$COUNTER_SPEC_PKTS", 20000001).unwrap();
    assert_eq!(pkts, 65554);
    let e = t.data_field_id_list_get(99).unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);
}

#[test]
fn test_supported_apis() {
    // The API sets and target attributes are the dummy target's own.
    let info = load(&["switch.tdi.json"]);
    let t = info.table_from_id_get(FORWARD_ID).unwrap();
    let apis = t.api_supported();
    assert!(apis.contains_key(&TableApiType::Add));
    assert!(apis.contains_key(&TableApiType::DefaultEntrySet));
    assert_eq!(
        apis[&TableApiType::Get],
        vec!["dev_id", "pipe_id", "direction"]
    );

    let counter = info
        .table_from_name_get("SwitchIngress.fwd_counter")
        .unwrap();
    assert_eq!(counter.table_type(), DummyTableType::COUNTER);
    assert!(!counter.api_supported().contains_key(&TableApiType::Add));
    assert!(counter.api_supported().contains_key(&TableApiType::Modify));
    let deps: Vec<TdiId> = counter.depends_on().iter().copied().collect();
    assert_eq!(deps, vec![FORWARD_ID]);
}

#[test]
fn test_port_tables() {
    let info = load(&["switch.tdi.json", "ports.tdi.json"]);
    let invalid: Vec<&str> =
        info.invalid_table_names().iter().map(String::as_str).collect();
    assert_eq!(invalid, vec!["pipe.SwitchIngress.flow_state"]);

    let port = info.table_from_name_get("$PORT").unwrap();
    assert_eq!(port.table_type(), DummyTableType::PORT_CFG);
    assert!(port.api_supported().contains_key(&TableApiType::Add));
    let speed = port.data_field_get_by_name("$SPEED", 0).unwrap();
    assert_eq!(speed.data_type(), FieldDataType::String);
    assert_eq!(speed.allowed_choices().len(), 2);

    let stat = info.table_from_id_get(4278255618).unwrap();
    assert_eq!(stat.name(), "$PORT_STAT");
    assert_eq!(stat.table_type(), DummyTableType::PORT_STAT);
    assert!(!stat.api_supported().contains_key(&TableApiType::Add));
    assert_eq!(stat.key_field_id_get("$DEV_PORT").unwrap(), 1);
}

#[test]
fn test_name_lookup() {
    let info = load(&["switch.tdi.json"]);
    for name in [FORWARD, "SwitchIngress.forward", "forward"] {
        let t = info.table_from_name_get(name).unwrap();
        assert_eq!(t.id(), FORWARD_ID, "{name}");
    }

    // Both pipes have a "fwd_counter", so the bare name resolves to
    // neither.
    let e = info.table_from_name_get("fwd_counter").unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);
    let egress = info.table_from_name_get("SwitchEgress.fwd_counter").unwrap();
    assert_eq!(egress.id(), 306000002);

    let e = info.table_from_name_get("SwitchIngress").unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);
    let e = info.table_from_id_get(1).unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);
}

#[test]
fn test_learn() {
    let info = load(&["switch.tdi.json"]);
    assert_eq!(info.learns_get().len(), 1);
    let l = info.learn_from_name_get("digest").unwrap();
    assert_eq!(l.id(), 400001);
    assert_eq!(l.name(), "pipe.SwitchIngressDeparser.digest");

    // The second field reusing id 2 is dropped.
    assert_eq!(l.data_field_id_list_get(), vec![1, 2]);
    assert_eq!(l.data_field_get(2).unwrap().name(), "ingress_port");
    assert_eq!(l.data_field_id_get("src_addr").unwrap(), 1);
    let e = l.data_field_id_get("ingress_port_again").unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);

    let l = info.learn_from_id_get(400001).unwrap();
    assert_eq!(l.data_field_get(1).unwrap().size_bits(), 48);
    assert!(info.learn_from_id_get(7).is_err());
}

#[test]
fn test_quirks() {
    let mut p = parser();
    p.parse_tdi_info(&[fixture("quirks.tdi.json")]).unwrap();

    let failed: Vec<&str> =
        p.failed_tables().iter().map(String::as_str).collect();
    assert_eq!(failed, vec!["pipe.dup_action", "pipe.dup_key"]);

    let t = &p.table_info_map()["pipe.dup_data"];
    // The duplicate id and the unsized byte stream are skipped, and both
    // halves of the oneof are kept.
    assert_eq!(t.common_data_field_id_list_get(), vec![4, 8, 9, 10]);
    let first = t.data_field_get(4, 0).unwrap();
    assert_eq!(first.name(), "first");
    assert_eq!(first.size_bits(), 16);

    let kbps = t.data_field_get(8, 0).unwrap();
    assert!(kbps.mandatory());
    let siblings: BTreeSet<TdiId> = [9].into_iter().collect();
    assert_eq!(kbps.oneof_siblings(), &siblings);

    let mode = t.data_field_get_by_name("mode", 0).unwrap();
    assert_eq!(mode.data_type(), FieldDataType::String);
    assert!(mode.read_only());
    assert_eq!(mode.allowed_choices(), ["INGRESS", "EGRESS"]);
    assert_eq!(mode.default_str_value(), "INGRESS");
}

#[test]
fn test_redefinition() {
    let mut p = parser();
    let files = [fixture("quirks.tdi.json"), fixture("override.tdi.json")];
    p.parse_tdi_info(&files).unwrap();
    let t = &p.table_info_map()["T"];
    assert_eq!(t.id(), 1005);
    assert_eq!(t.table_type(), DummyTableType::MATCH_INDIRECT);

    // A later definition that fails to parse removes the earlier one.
    p.parse_tdi_info(&[fixture("redefine_bad.tdi.json")]).unwrap();
    assert!(!p.table_info_map().contains_key("T"));
    assert!(p.failed_tables().contains("T"));

    p.parse_tdi_info(&[fixture("override.tdi.json")]).unwrap();
    assert!(p.table_info_map().contains_key("T"));
    assert!(!p.failed_tables().contains("T"));
}

#[test]
fn test_load_errors() {
    let mut p = parser();
    let none: &[PathBuf] = &[];
    let e = p.parse_tdi_info(none).unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);

    let e = p.parse_tdi_info(&[fixture("no_such.tdi.json")]).unwrap_err();
    assert_eq!(e.status(), Status::ObjectNotFound);

    let e = p.parse_tdi_info(&[fixture("malformed.tdi.json")]).unwrap_err();
    assert_eq!(e.status(), Status::InvalidArg);
}

#[test]
fn test_marshal_key() {
    let info = load(&["switch.tdi.json"]);
    let t = info.table_from_name_get(FORWARD).unwrap();

    let mac = [0x00, 0x0c, 0x29, 0xaa, 0xbb, 0xcc];
    let value = KeyFieldValue::Exact {
        value: FieldValue::Bytes(&mac),
    };
    let dst = key_field_safe_get(t, 1, &value).unwrap();
    assert_eq!(
        field_value_to_network(dst, FieldValue::Bytes(&mac)).unwrap(),
        mac.to_vec()
    );
    assert_eq!(field_value_from_network(dst, &mac).unwrap(), 0x000c29aabbcc);

    let port = KeyFieldValue::Ternary {
        value: FieldValue::Scalar(260),
        mask: FieldValue::Scalar(0x1ff),
    };
    let key = key_field_safe_get(t, 2, &port).unwrap();
    assert_eq!(
        field_value_to_network(key, FieldValue::Scalar(260)).unwrap(),
        vec![0x01, 0x04]
    );
    let e = field_value_to_network(key, FieldValue::Scalar(512)).unwrap_err();
    assert_eq!(e.status(), Status::InvalidArg);

    let e = key_field_safe_get(t, 1, &port).unwrap_err();
    assert_eq!(e.status(), Status::InvalidArg);
}
