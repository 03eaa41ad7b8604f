use std::collections::HashMap;

use prost::Message;
use prost_dbtypes::{Scan, ScanError, SqlValue, Value};

use crate::other::v1::{Widget, WidgetValue};
use crate::test::v1::{
    container, envelope, AuditRecord, AuditRecordValue, Container, ContainerItemValue,
    ContainerValue, EnvelopePayloadValue, ToolSetSpec, ToolSetSpecValue, UserPreferences,
    UserPreferencesValue,
};

fn tool_set_spec() -> ToolSetSpec {
    ToolSetSpec {
        tool_ids: vec!["tool-1".to_owned(), "tool-2".to_owned(), "tool-3".to_owned()],
        name: "my-toolset".to_owned(),
        enabled: true,
    }
}

/// Stores `wrapper` and loads the column back into a fresh `W`.
fn round_trip<W>(wrapper: &W) -> W
where
    W: Scan + Value + Default,
{
    let column = wrapper.value();
    let mut loaded = W::default();
    loaded.scan(&column).unwrap();
    loaded
}

#[test]
fn tool_set_spec_round_trip() {
    let spec = tool_set_spec();
    let loaded = round_trip(&ToolSetSpecValue::from(spec.clone()));
    assert_eq!(loaded.as_message(), Some(&spec));
}

#[test]
fn value_is_the_message_encoding() {
    let spec = tool_set_spec();
    let column = ToolSetSpecValue::from(spec.clone()).value();
    assert_eq!(column, SqlValue::Bytes(spec.encode_to_vec()));
}

#[test]
fn map_field_round_trip() {
    let prefs = UserPreferences {
        theme: "dark".to_owned(),
        language: "en".to_owned(),
        settings: HashMap::from([
            ("notifications".to_owned(), "enabled".to_owned()),
            ("autoSave".to_owned(), "true".to_owned()),
        ]),
    };
    let loaded = round_trip(&UserPreferencesValue::from(prefs.clone()));
    assert_eq!(loaded.into_message(), Some(prefs));
}

#[test]
fn nested_message_round_trip() {
    let container = Container {
        id: "container-1".to_owned(),
        spec: Some(ToolSetSpec {
            tool_ids: vec!["tool-a".to_owned()],
            name: "nested-spec".to_owned(),
            enabled: false,
        }),
        items: vec![
            container::Item {
                key: "key1".to_owned(),
                value: "value1".to_owned(),
            },
            container::Item {
                key: "key2".to_owned(),
                value: "value2".to_owned(),
            },
        ],
    };
    let loaded = round_trip(&ContainerValue::from(container.clone()));
    assert_eq!(loaded.as_message(), Some(&container));

    let item = container.items[0].clone();
    let loaded = round_trip(&ContainerItemValue::from(item.clone()));
    assert_eq!(loaded.into_message(), Some(item));
}

#[test]
fn nested_message_of_excluded_parent_round_trip() {
    let payload = envelope::Payload {
        data: vec![0, 159, 146, 150, 255],
    };
    let loaded = round_trip(&EnvelopePayloadValue::from(payload.clone()));
    assert_eq!(loaded.into_message(), Some(payload));
}

#[test]
fn other_package_round_trip() {
    let widget = Widget {
        name: "gear".to_owned(),
        labels: HashMap::from([("size".to_owned(), "large".to_owned())]),
    };
    let loaded = round_trip(&WidgetValue::from(widget.clone()));
    assert_eq!(loaded.into_message(), Some(widget));
}

#[test]
fn default_message_round_trip() {
    let wrapper = AuditRecordValue::from(AuditRecord::default());
    let column = wrapper.value();
    // An all-default proto3 message encodes to zero bytes, which is not NULL.
    assert_eq!(column, SqlValue::Bytes(Vec::new()));

    let loaded = round_trip(&wrapper);
    assert_eq!(loaded.into_message(), Some(AuditRecord::default()));
}

#[test]
fn wrapper_without_message_stores_default_message() {
    // No held message stores exactly like a freshly constructed empty one.
    let empty = ToolSetSpecValue::from(ToolSetSpec::default()).value();
    assert_eq!(ToolSetSpecValue::new(None).value(), SqlValue::Bytes(Vec::new()));
    assert_eq!(ToolSetSpecValue::default().value(), empty);
    assert_eq!(ToolSetSpecValue::default().as_message(), None);
}

#[test]
fn absent_wrapper_is_null() {
    let column: Option<ToolSetSpecValue> = None;
    assert_eq!(column.value(), SqlValue::Null);

    let mut loaded = Some(ToolSetSpecValue::from(tool_set_spec()));
    loaded.scan(&column.value()).unwrap();
    assert_eq!(loaded, None);
}

#[test]
fn scan_null() {
    let mut wrapper = ToolSetSpecValue::default();
    wrapper.scan(&SqlValue::Null).unwrap();
    assert_eq!(wrapper.as_message(), None);

    // NULL clears a previously held message.
    let mut wrapper = ToolSetSpecValue::from(tool_set_spec());
    wrapper.scan(&SqlValue::Null).unwrap();
    assert_eq!(wrapper.as_message(), None);
    assert_eq!(wrapper.value(), SqlValue::Bytes(Vec::new()));

    // A wrapper without a message reads back as the default message.
    assert_eq!(
        round_trip(&ToolSetSpecValue::new(None)).into_message(),
        Some(ToolSetSpec::default())
    );
}

#[test]
fn scan_text_matches_scan_bytes() {
    let spec = ToolSetSpec {
        tool_ids: vec!["tool-1".to_owned()],
        name: "test".to_owned(),
        enabled: true,
    };
    let bytes = spec.encode_to_vec();
    let text = String::from_utf8(bytes.clone()).unwrap();

    let mut from_text = ToolSetSpecValue::default();
    from_text.scan(&SqlValue::Text(text)).unwrap();
    let mut from_bytes = ToolSetSpecValue::default();
    from_bytes.scan(&SqlValue::Bytes(bytes)).unwrap();

    assert_eq!(from_text, from_bytes);
    assert_eq!(from_text.as_message(), Some(&spec));
}

#[test]
fn scan_unsupported_source() {
    let mut wrapper = ToolSetSpecValue::default();
    for (src, kind) in [
        (SqlValue::Integer(123), "integer"),
        (SqlValue::Real(1.5), "real"),
        (SqlValue::Bool(true), "bool"),
    ] {
        let err = wrapper.scan(&src).unwrap_err();
        assert_eq!(err, ScanError::UnsupportedSource { kind });
    }
    assert_eq!(wrapper.as_message(), None);
}

#[test]
fn scan_malformed_bytes() {
    let mut wrapper = ToolSetSpecValue::default();
    // A field key whose varint never terminates.
    let err = wrapper.scan(&SqlValue::Bytes(vec![0xff])).unwrap_err();
    assert!(matches!(err, ScanError::Decode(_)));

    // Field 2 (`name`) declared 10 bytes long, holding 2.
    let err = wrapper
        .scan(&SqlValue::Bytes(vec![0x12, 0x0a, b'h', b'i']))
        .unwrap_err();
    assert!(matches!(err, ScanError::Decode(_)));
}

#[test]
fn scan_replaces_previous_message() {
    let mut wrapper = ToolSetSpecValue::from(tool_set_spec());
    let replacement = ToolSetSpec {
        name: "replacement".to_owned(),
        ..Default::default()
    };
    wrapper
        .scan(&SqlValue::Bytes(replacement.encode_to_vec()))
        .unwrap();
    assert_eq!(wrapper.into_message(), Some(replacement));
}

#[test]
fn unwrap_returns_the_same_instance() {
    let spec = ToolSetSpec {
        name: "test".to_owned(),
        ..Default::default()
    };
    let name_buffer = spec.name.as_ptr();

    let wrapper = ToolSetSpecValue::from(spec);
    let held = wrapper.as_message().unwrap();
    assert!(std::ptr::eq(held, wrapper.as_message().unwrap()));
    assert_eq!(held.name.as_ptr(), name_buffer);

    // Moving the message out hands back the original allocation, not a copy.
    let unwrapped = wrapper.into_message().unwrap();
    assert_eq!(unwrapped.name.as_ptr(), name_buffer);
}

#[test]
fn unwrap_absent() {
    assert_eq!(ToolSetSpecValue::default().into_message(), None);
    assert_eq!(ToolSetSpecValue::new(None).as_message(), None);
}

#[test]
fn optional_wrapper_column() {
    let column: Option<ToolSetSpecValue> = None;
    assert_eq!(column.value(), SqlValue::Null);

    let mut loaded: Option<ToolSetSpecValue> = None;
    loaded
        .scan(&SqlValue::Bytes(tool_set_spec().encode_to_vec()))
        .unwrap();
    assert_eq!(
        loaded.and_then(ToolSetSpecValue::into_message),
        Some(tool_set_spec())
    );
}
