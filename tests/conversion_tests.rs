//! End-to-end conversion tests
//!
//! These tests run XML text through parsing, conversion and serialization
//! and check the resulting JSON structure.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use xml2json::serializers::serialize;
use xml2json::{
    convert_bytes, convert_source, convert_xml, save_json_to_file, xml_str_to_json, xml_to_json,
    ConverterConfig, Error, Limits, Location,
};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn convert(xml: &str) -> Value {
    let json = xml_str_to_json(xml, &ConverterConfig::default()).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_repeated_siblings_become_array() {
    assert_eq!(
        convert(r#"<root><a id="1">x</a><a id="2">y</a></root>"#),
        json!({"root": {"a": [{"@id": "1", "text": "x"}, {"@id": "2", "text": "y"}]}})
    );
}

#[test]
fn test_empty_child() {
    assert_eq!(convert("<root><empty/></root>"), json!({"root": {"empty": {}}}));
}

#[test]
fn test_nested_unique_children() {
    assert_eq!(
        convert("<root><a><b>1</b></a></root>"),
        json!({"root": {"a": {"b": {"text": "1"}}}})
    );
}

#[test]
fn test_attribute_prefixing() {
    assert_eq!(
        convert(r#"<root id="5"/>"#),
        json!({"root": {"@id": "5"}})
    );
}

#[test]
fn test_text_trimming() {
    assert_eq!(
        convert("<root>  hello \n</root>"),
        json!({"root": {"text": "hello"}})
    );
    assert_eq!(convert("<root>  \n\t </root>"), json!({"root": {}}));
}

#[test]
fn test_single_vs_repeated_child() {
    let one = convert("<list><item>a</item></list>");
    assert!(one["list"]["item"].is_object());

    let two = convert("<list><item>a</item><item>b</item></list>");
    assert_eq!(two["list"]["item"], json!([{"text": "a"}, {"text": "b"}]));
}

#[test]
fn test_mixed_content_keeps_leading_text_only() {
    assert_eq!(
        convert("<p>Hello <b>big</b> world</p>"),
        json!({"p": {"text": "Hello", "b": {"text": "big"}}})
    );
}

#[test]
fn test_serialized_key_order() {
    let json = xml_str_to_json(
        r#"<root z="1" a="2">t<y/><x/><y/></root>"#,
        &ConverterConfig::default(),
    )
    .unwrap();

    let positions: Vec<usize> = ["\"text\"", "\"@z\"", "\"@a\"", "\"y\"", "\"x\""]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_exact_pretty_output() {
    let json = xml_str_to_json(
        r#"<root><a id="1">x</a><a id="2">y</a></root>"#,
        &ConverterConfig::default(),
    )
    .unwrap();

    let expected = r#"{
    "root": {
        "a": [
            {
                "text": "x",
                "@id": "1"
            },
            {
                "text": "y",
                "@id": "2"
            }
        ]
    }
}"#;
    assert_eq!(json, expected);
}

#[test]
fn test_reserialization_is_byte_identical() {
    let document = convert_xml(
        "<root><a>1</a><a>2</a><b c=\"d\"/></root>",
        &ConverterConfig::default(),
    )
    .unwrap();

    assert_eq!(serialize(&document).unwrap(), serialize(&document).unwrap());
}

#[test]
fn test_library_fixture() {
    let location = Location::Path(fixtures_dir().join("library.xml"));
    let json = xml_to_json(&location, &ConverterConfig::default()).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        value,
        json!({
            "library": {
                "@name": "City Library",
                "@founded": "1901",
                "book": [
                    {
                        "@id": "1",
                        "@lang": "en",
                        "title": {"text": "Dune"},
                        "author": {"text": "Frank Herbert"},
                        "tag": [{"text": "scifi"}, {"text": "classic"}]
                    },
                    {
                        "@id": "2",
                        "title": {"text": "Solaris"},
                        "author": {"text": "Stanisław Lem"}
                    }
                ],
                "address": {
                    "street": {"text": "Main St & 5th"},
                    "unit": {}
                }
            }
        })
    );
}

#[test]
fn test_malformed_fixture_is_parse_error() {
    let location = Location::Path(fixtures_dir().join("malformed.xml"));
    let err = convert_source(&location, &ConverterConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.stage(), "parse");
}

#[test]
fn test_missing_input_is_access_error() {
    let location = Location::Path(fixtures_dir().join("nope.xml"));
    let err = xml_to_json(&location, &ConverterConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Access(_)));
}

#[test]
fn test_depth_limit_applies_end_to_end() {
    let xml = format!("{}{}", "<d>".repeat(50), "</d>".repeat(50));
    let config = ConverterConfig::new().with_limits(Limits::new().with_max_xml_depth(10));

    assert!(matches!(
        xml_str_to_json(&xml, &config),
        Err(Error::DepthExceeded { max: 10, .. })
    ));
    assert!(xml_str_to_json(&xml, &ConverterConfig::default()).is_ok());
}

#[test]
fn test_custom_indent() {
    let json = xml_str_to_json("<r><a/></r>", &ConverterConfig::new().with_indent(2)).unwrap();
    assert_eq!(json, "{\n  \"r\": {\n    \"a\": {}\n  }\n}");
}

#[test]
fn test_save_json_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let json = xml_str_to_json("<r/>", &ConverterConfig::default()).unwrap();

    save_json_to_file(&json, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
}

#[test]
fn test_save_json_to_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.json");

    let err = save_json_to_file("{}", &path).unwrap_err();
    assert!(matches!(err, Error::Write(_)));
    assert_eq!(err.stage(), "write");
}

#[test]
fn test_crlf_line_endings() {
    assert_eq!(
        convert("<root>\r\n<a>one\r\ntwo</a>\r\n<b>x\ry</b>\r\n</root>"),
        json!({"root": {"a": {"text": "one\ntwo"}, "b": {"text": "x\ny"}}})
    );
}

#[test]
fn test_attribute_value_normalization() {
    assert_eq!(
        convert("<r x=\"a\tb\nc\" y=\"keep&#10;this\"/>"),
        json!({"r": {"@x": "a b c", "@y": "keep\nthis"}})
    );
}

#[test]
fn test_malformed_names_and_markup_are_rejected() {
    let config = ConverterConfig::default();
    for xml in [
        "<1r><2a/></1r>",
        "<r 1x=\"v\"/>",
        "<r x=\"a<b\"/>",
        "<r>a]]>b</r>",
    ] {
        let err = convert_xml(xml, &config).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "{} gave {:?}", xml, err);
    }
}

#[test]
fn test_latin1_fixture() {
    let location = Location::Path(fixtures_dir().join("latin1.xml"));
    let json: Value =
        serde_json::from_str(&xml_to_json(&location, &ConverterConfig::default()).unwrap())
            .unwrap();
    assert_eq!(
        json,
        json!({"menu": {"dish": [
            {"@price": "4", "text": "Crème brûlée"},
            {"@price": "3", "text": "Café"}
        ]}})
    );
}

#[test]
fn test_utf16_fixture() {
    let location = Location::Path(fixtures_dir().join("utf16.xml"));
    let document = convert_source(&location, &ConverterConfig::default()).unwrap();
    assert_eq!(
        document.to_json_value(),
        json!({"greeting": {"@lang": "pl", "text": "Dzień dobry"}})
    );
}

#[test]
fn test_convert_bytes_unknown_encoding() {
    let err = convert_bytes(
        b"<?xml version=\"1.0\" encoding=\"x-unknown\"?><r/>",
        &ConverterConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.stage(), "parse");
}

#[test]
fn test_internal_entities_fixture() {
    let location = Location::Path(fixtures_dir().join("entities.xml"));
    let document = convert_source(&location, &ConverterConfig::default()).unwrap();
    assert_eq!(
        document.to_json_value(),
        json!({"note": {
            "@from": "Ada",
            "body": {"text": "See you soon"},
            "footer": {"text": "Regards, Ada"}
        }})
    );
}

#[test]
fn test_entity_expansion_limit() {
    let xml = r#"<!DOCTYPE r [<!ENTITY e "0123456789">]><r>&e;&e;&e;</r>"#;
    let config = ConverterConfig::new()
        .with_limits(Limits::new().with_max_entity_expansion_size(25));

    assert!(matches!(
        convert_xml(xml, &config),
        Err(Error::LimitExceeded(_))
    ));
    assert!(convert_xml(xml, &ConverterConfig::default()).is_ok());
}
