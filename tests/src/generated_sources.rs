//! Checks on the generated text that the type system cannot express.

const TEST_UNIT: &str = include_str!(concat!(env!("OUT_DIR"), "/test/v1/test.dbtypes.rs"));
const AUDIT_UNIT: &str = include_str!(concat!(env!("OUT_DIR"), "/test/v1/audit.dbtypes.rs"));
const OTHER_UNIT: &str = include_str!(concat!(env!("OUT_DIR"), "/other/v1/other.dbtypes.rs"));

fn count_structs(unit: &str, name: &str) -> usize {
    unit.matches(&format!("pub struct {name}")).count()
}

#[test]
fn shared_wrapper_emitted_once_per_package() {
    // Both test.v1 units are included into the same module.
    assert_eq!(count_structs(TEST_UNIT, "ProtoValue<"), 1);
    assert_eq!(count_structs(AUDIT_UNIT, "ProtoValue<"), 0);
    assert_eq!(count_structs(OTHER_UNIT, "ProtoValue<"), 1);
}

#[test]
fn map_entries_have_no_wrapper() {
    for unit in [TEST_UNIT, AUDIT_UNIT, OTHER_UNIT] {
        assert!(!unit.contains("EntryValue"));
    }
}

#[test]
fn excluded_messages_have_no_wrapper() {
    assert_eq!(count_structs(AUDIT_UNIT, "EnvelopeValue"), 0);
    assert_eq!(count_structs(AUDIT_UNIT, "InternalNoteValue"), 0);
    // Excluding `Envelope` leaves its nested message alone.
    assert_eq!(count_structs(AUDIT_UNIT, "EnvelopePayloadValue"), 1);
    assert_eq!(count_structs(AUDIT_UNIT, "AuditRecordValue"), 1);
}

#[test]
fn units_are_marked_generated() {
    for unit in [TEST_UNIT, AUDIT_UNIT, OTHER_UNIT] {
        assert!(unit.starts_with("// This file is @generated by prost-dbtypes-build."));
    }
}
