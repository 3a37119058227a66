// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Round-trip properties of the OPS envelope codec

use xcp::{decode, encode_assoc, encode_envelope, DecodeError, Lookup, Map, Signer, Value};

fn map(v: Value) -> Map {
    match v {
        Value::Map(m) => m,
        other => panic!("expected a map, got {:?}", other),
    }
}

fn sample_request() -> Map {
    map(Value::map([
        ("protocol", Value::from("XCP")),
        ("object", Value::from("DOMAIN")),
        ("action", Value::from("GET")),
        (
            "attributes",
            Value::map([
                ("domain", Value::from("example.com")),
                ("type", Value::from("all_info")),
                (
                    "contact_set",
                    Value::map([(
                        "owner",
                        Value::map([("first_name", "Ada"), ("org_name", "")]),
                    )]),
                ),
            ]),
        ),
    ]))
}

#[test]
fn map_and_scalar_trees_round_trip_exactly() {
    let request = sample_request();
    assert_eq!(decode(&encode_envelope(&request)).unwrap(), request);
    assert_eq!(decode(&encode_assoc(&request)).unwrap(), request);
}

#[test]
fn lists_come_back_as_index_keyed_maps() {
    let request = map(Value::map([
        ("names", Value::list(["fish", "soup", "chips"])),
        (
            "records",
            Value::list([Value::map([("digest", "AA")]), Value::map([("digest", "BB")])]),
        ),
    ]));

    let decoded = decode(&encode_envelope(&request)).unwrap();

    let names = decoded.get("names").unwrap();
    assert!(names.as_list().is_none(), "decoder must not rebuild lists");
    assert_eq!(
        names,
        &Value::map([("0", "fish"), ("1", "soup"), ("2", "chips")])
    );
    assert_eq!(decoded.get_scalar("records/0/digest"), Some("AA"));
    assert_eq!(decoded.get_scalar("records/1/digest"), Some("BB"));
    assert_ne!(decoded, request);
}

#[test]
fn list_order_survives_more_than_ten_elements() {
    let items: Vec<String> = (0..15).map(|i| format!("v{}", i)).collect();
    let request = map(Value::map([("l", Value::list(items.clone()))]));
    let decoded = decode(&encode_assoc(&request)).unwrap();
    for (i, expected) in items.iter().enumerate() {
        assert_eq!(
            decoded.get_scalar(&format!("l/{}", i)),
            Some(expected.as_str())
        );
    }
}

#[test]
fn special_characters_survive_as_values_and_keys() {
    let nasty = [
        "&",
        "<",
        ">",
        "\"",
        "'",
        r#"all five: & < > " '"#,
        "</item></dt_assoc><dt_assoc><item key=\"injected\">x</item>",
        "&amp; already escaped &lt;",
        "]]> <![CDATA[ not really ]]>",
    ];
    for s in nasty {
        let request = map(Value::map([("value", s)]));
        let decoded = decode(&encode_envelope(&request)).unwrap();
        assert_eq!(decoded.get_scalar("value"), Some(s), "value {:?}", s);
        assert_eq!(decoded.len(), 1, "structure changed for {:?}", s);

        let request = map(Value::map([(s, "key test")]));
        let decoded = decode(&encode_envelope(&request)).unwrap();
        assert_eq!(decoded, request, "key {:?}", s);
    }
}

#[test]
fn non_ascii_text_round_trips() {
    let request = map(Value::map([("name", "Zoë Müller-Łukasiewicz 東京 🦀")]));
    assert_eq!(decode(&encode_envelope(&request)).unwrap(), request);
}

#[test]
fn envelope_decodes_like_bare_container() {
    let request = sample_request();
    assert_eq!(
        decode(&encode_envelope(&request)).unwrap(),
        decode(&encode_assoc(&request)).unwrap()
    );
}

#[test]
fn nested_document_lookups() {
    let xml = concat!(
        r#"<dt_assoc>"#,
        r#"<item key="blort"><dt_assoc><item key="foo">bar</item></dt_assoc></item>"#,
        r#"<item key="wibble"><dt_array><item key="0">FirstItem</item><item key="1">SecondItem</item></dt_array></item>"#,
        r#"</dt_assoc>"#,
    );
    let decoded = decode(xml).unwrap();
    assert_eq!(decoded.get_scalar("blort/foo"), Some("bar"));
    assert_eq!(decoded.get_scalar("wibble/0"), Some("FirstItem"));
    assert_eq!(decoded.get_scalar("wibble/1"), Some("SecondItem"));
    assert_eq!(decoded.get_scalar("blort/fish"), None);
}

#[test]
fn error_pages_have_no_root() {
    assert_eq!(
        decode("<html><head><title>403 Forbidden</title></head><body>denied</body></html>"),
        Err(DecodeError::NoRootContainer)
    );
}

#[test]
fn signature_tracks_the_encoded_body() {
    let signer = Signer::new("0123456789abcdef");
    let body = encode_envelope(&sample_request());
    assert_eq!(signer.sign(&body), signer.sign(&body.clone()));

    let mut changed = sample_request();
    changed.insert("action".into(), "SET".into());
    assert_ne!(signer.sign(&body), signer.sign(&encode_envelope(&changed)));
}
