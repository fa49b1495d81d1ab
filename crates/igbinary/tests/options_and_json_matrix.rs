use igbinary::{
    decode, decode_with, encode, encode_with, from_json, to_json, DecodeOptions, EncodeOptions,
    JsonBridgeError, NoHooks, Value,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct HostConfig {
    encode: EncodeOptions,
    #[serde(default)]
    decode: DecodeOptions,
}

#[test]
fn options_load_from_toml() {
    let config: HostConfig = toml::from_str(
        r#"
        [encode]
        compact_strings = false
        max_depth = 32
        "#,
    )
    .expect("parse");
    assert_eq!(
        config.encode,
        EncodeOptions {
            compact_strings: false,
            max_depth: Some(32),
        }
    );
    assert_eq!(config.decode, DecodeOptions::default());

    let partial: HostConfig = toml::from_str("[encode]\n[decode]\nmax_depth = 8\n").expect("parse");
    assert!(partial.encode.compact_strings);
    assert_eq!(partial.decode.max_depth, Some(8));
}

#[test]
fn unknown_option_keys_are_rejected() {
    let result: Result<HostConfig, _> = toml::from_str("[encode]\ncompress = true\n");
    assert!(result.is_err());
}

#[test]
fn configured_options_drive_the_codec() {
    let config: HostConfig =
        toml::from_str("[encode]\nmax_depth = 1\n[decode]\nmax_depth = 1\n").expect("parse");
    let nested = from_json(&json!([[1]]));
    assert!(encode_with(&nested, &NoHooks, config.encode.clone()).is_err());
    let flat = from_json(&json!([1, 2]));
    let bytes = encode_with(&flat, &NoHooks, config.encode).expect("encode");
    assert_eq!(
        decode_with(&bytes, &NoHooks, config.decode).expect("decode"),
        flat
    );
}

#[test]
fn json_document_survives_the_codec() {
    let doc = json!({
        "name": "igbinary",
        "tags": ["a", "b", "a"],
        "nested": {"n": -300, "f": 0.25, "ok": true, "none": null},
        "empty": [],
    });
    let bytes = encode(&from_json(&doc)).expect("encode");
    let back = decode(&bytes).expect("decode");
    assert_eq!(to_json(&back).expect("to_json"), doc);
}

#[test]
fn decoded_cycle_is_reported_by_the_bridge() {
    let bytes = [0, 0, 0, 2, 0x14, 0x01, 0x06, 0x00, 0x01, 0x00];
    let back = decode(&bytes).expect("decode");
    let array = back.as_array().expect("array");
    assert_eq!(to_json(&back), Err(JsonBridgeError::Cycle(array.id())));
    array.borrow_mut().clear();
}

#[test]
fn decoded_objects_expose_their_properties() {
    let bytes = [
        0, 0, 0, 2, 0x17, 0x03, b'O', b'b', b'j', 0x14, 0x02, 0x11, 0x01, b'a', 0x06, 0x01, 0x11,
        0x01, b'b', 0x06, 0x02,
    ];
    let back = decode(&bytes).expect("decode");
    assert_eq!(to_json(&back).expect("to_json"), json!({"a": 1, "b": 2}));
    assert_eq!(to_json(&Value::shared(5)).expect("to_json"), json!(5));
}
