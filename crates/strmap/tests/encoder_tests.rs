/// Encoder contract tests.
///
/// Covers primitive formatting, directives (rename, ignore, omitempty, `-,`),
/// inline flattening through values and references, hook precedence, and
/// every encode-side error kind.
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use strmap::{
    encode, BoxError, Codec, Complex32, Complex64, Config, ErrorKind, FlatMap, MapCodec, Record,
    TextCodec, Value,
};

fn flat(pairs: &[(&str, &str)]) -> FlatMap {
    pairs
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Scalars {
    pub boolean: bool,
    pub int: i64,
    pub int8: i8,
    pub int16: i16,
    pub int32: i32,
    pub int128: i128,
    pub uint: u64,
    pub uint8: u8,
    pub uint16: u16,
    pub uint32: u32,
    pub uint128: u128,
    pub size: usize,
    pub float32: f32,
    pub float64: f64,
    pub complex64: Complex32,
    pub complex128: Complex64,
    pub letter: char,
    pub string: String,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Inner2 {
    pub string: String,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Inner1 {
    pub string: String,
    #[strmap(",inline")]
    pub inner2: Inner2,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Outer {
    #[strmap("inner,inline")]
    pub inner1: Inner1,
}

#[derive(Record, Debug, Default)]
struct OuterByRef {
    #[strmap(",inline")]
    pub inner: Option<Box<Inner2>>,
}

/// Display-only leaf.
#[derive(Value, Debug, Default, Clone, PartialEq)]
#[strmap(display, default)]
struct Celsius(f64);

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.0)
    }
}

/// Self-describing leaf.
#[derive(Value, Debug, Default, Clone, PartialEq)]
#[strmap(text, default)]
struct Version {
    major: u32,
    minor: u32,
}

impl TextCodec for Version {
    fn to_text(&self) -> Result<String, BoxError> {
        Ok(format!("v{}.{}", self.major, self.minor))
    }

    fn from_text(&mut self, text: &str) -> Result<(), BoxError> {
        let (major, minor) = text
            .strip_prefix('v')
            .and_then(|rest| rest.split_once('.'))
            .ok_or("expected v<major>.<minor>")?;
        self.major = major.parse()?;
        self.minor = minor.parse()?;
        Ok(())
    }
}

/// Offers both a text codec and Display; the text codec must win.
#[derive(Value, Debug, Default, Clone, PartialEq)]
#[strmap(text, display, default)]
struct Both;

impl fmt::Display for Both {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("display")
    }
}

impl TextCodec for Both {
    fn to_text(&self) -> Result<String, BoxError> {
        Ok("text".to_string())
    }

    fn from_text(&mut self, _text: &str) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Value, Debug, Default)]
#[strmap(text)]
struct Broken;

impl TextCodec for Broken {
    fn to_text(&self) -> Result<String, BoxError> {
        Err("broken on purpose".into())
    }

    fn from_text(&mut self, _text: &str) -> Result<(), BoxError> {
        Err("broken on purpose".into())
    }
}

/// Record that replaces field traversal with its own map form.
#[derive(Record, Debug, Default, Clone, PartialEq)]
#[strmap(map)]
struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl MapCodec for Coordinates {
    fn to_map(&self) -> Result<FlatMap, BoxError> {
        Ok(FlatMap::from([(
            "position".to_string(),
            format!("{},{}", self.lat, self.lon),
        )]))
    }

    fn from_map(&mut self, map: &FlatMap) -> Result<(), BoxError> {
        let Some(position) = map.get("position") else {
            return Ok(());
        };
        let (lat, lon) = position.split_once(',').ok_or("expected lat,lon")?;
        self.lat = lat.parse()?;
        self.lon = lon.parse()?;
        Ok(())
    }
}

/// Non-record type carrying only a map codec.
#[derive(Value, Debug, Default, Clone, PartialEq)]
#[strmap(map, default)]
struct Labels(BTreeMap<String, String>);

impl MapCodec for Labels {
    fn to_map(&self) -> Result<FlatMap, BoxError> {
        Ok(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn from_map(&mut self, map: &FlatMap) -> Result<(), BoxError> {
        self.0
            .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn encode_all_scalar_kinds() {
    let value = Scalars {
        boolean: true,
        int: -42,
        int8: -8,
        int16: -16,
        int32: 32,
        int128: i128::MIN,
        uint: 64,
        uint8: 255,
        uint16: 16,
        uint32: 32,
        uint128: u128::MAX,
        size: 7,
        float32: 100.1,
        float64: 0.1,
        complex64: Complex32::new(100.1, 80.1),
        complex128: Complex64::new(100.1, 80.1),
        letter: 'x',
        string: "hello world".to_string(),
    };
    let map = encode(&value).unwrap();
    assert_eq!(
        map,
        flat(&[
            ("boolean", "true"),
            ("int", "-42"),
            ("int8", "-8"),
            ("int16", "-16"),
            ("int32", "32"),
            ("int128", "-170141183460469231731687303715884105728"),
            ("uint", "64"),
            ("uint8", "255"),
            ("uint16", "16"),
            ("uint32", "32"),
            ("uint128", "340282366920938463463374607431768211455"),
            ("size", "7"),
            ("float32", "100.1"),
            ("float64", "0.1"),
            ("complex64", "(100.1+80.1i)"),
            ("complex128", "(100.1+80.1i)"),
            ("letter", "x"),
            ("string", "hello world"),
        ])
    );
}

#[test]
fn encode_zero_scalars_are_emitted() {
    let map = encode(&Scalars::default()).unwrap();
    assert_eq!(map.len(), 18);
    assert_eq!(map["boolean"], "false");
    assert_eq!(map["int"], "0");
    assert_eq!(map["float64"], "0");
    assert_eq!(map["complex128"], "(0+0i)");
    assert_eq!(map["string"], "");
}

#[test]
fn encode_float_shortest_form() {
    #[derive(Record)]
    struct Floats {
        pub half: f64,
        pub large: f64,
        pub tiny: f32,
        pub whole: f64,
    }

    let map = encode(&Floats {
        half: 1.5,
        large: 1e21,
        tiny: 0.25,
        whole: 3.0,
    })
    .unwrap();
    assert_eq!(map["half"], "1.5");
    assert_eq!(map["large"], "1000000000000000000000");
    assert_eq!(map["tiny"], "0.25");
    assert_eq!(map["whole"], "3");
}

#[test]
fn encode_complex_negative_imaginary_part() {
    #[derive(Record)]
    struct Signal {
        pub value: Complex64,
    }

    let map = encode(&Signal {
        value: Complex64::new(1.5, -2.0),
    })
    .unwrap();
    assert_eq!(map["value"], "(1.5-2i)");
}

#[test]
fn encode_generic_record() {
    #[derive(Record)]
    struct Pair<T> {
        pub left: T,
        pub right: T,
    }

    let map = encode(&Pair { left: 1u8, right: 2u8 }).unwrap();
    assert_eq!(map, flat(&[("left", "1"), ("right", "2")]));
}

// ============================================================================
// Directives
// ============================================================================

#[test]
fn encode_rename_scenario() {
    #[allow(non_snake_case)]
    #[derive(Record)]
    struct RenameScenario {
        pub DefaultName: String,
        #[strmap("customname")]
        pub Renamed: String,
    }

    let map = encode(&RenameScenario {
        DefaultName: "x".to_string(),
        Renamed: "y".to_string(),
    })
    .unwrap();
    assert_eq!(map, flat(&[("DefaultName", "x"), ("customname", "y")]));
}

#[test]
fn encode_ignored_and_dash_keyed_fields() {
    #[derive(Record)]
    struct WithDash {
        pub kept: String,
        #[strmap("-")]
        pub ignored: String,
        #[strmap("-,")]
        pub dash: String,
    }

    let map = encode(&WithDash {
        kept: "a".to_string(),
        ignored: "b".to_string(),
        dash: "c".to_string(),
    })
    .unwrap();
    assert_eq!(map, flat(&[("kept", "a"), ("-", "c")]));
}

#[test]
fn encode_ignored_inline_field_is_not_visited() {
    #[derive(Record)]
    struct IgnoredInline {
        #[strmap("-")]
        pub skipped: u32,
        pub kept: u32,
    }

    let map = encode(&IgnoredInline { skipped: 1, kept: 2 }).unwrap();
    assert_eq!(map, flat(&[("kept", "2")]));
}

#[test]
fn encode_ignored_field_may_have_any_type() {
    #[derive(Record)]
    struct Tagged {
        pub name: String,
        #[strmap("-")]
        pub tags: Vec<String>,
    }

    let tagged = Tagged {
        name: "n".to_string(),
        tags: vec!["a".to_string()],
    };
    assert_eq!(encode(&tagged).unwrap(), flat(&[("name", "n")]));
    assert!(!tagged.is_zero());
    assert!(Tagged {
        name: String::new(),
        tags: vec!["ignored by the zero check".to_string()],
    }
    .is_zero());
}

#[derive(Record, Default)]
struct OmitEmpty {
    #[strmap(",omitempty")]
    pub count: u32,
    #[strmap("label,omitempty")]
    pub name: String,
    #[strmap(",omitempty")]
    pub maybe: Option<u32>,
    #[strmap(",omitempty")]
    pub when: Version,
    pub always: u32,
}

#[test]
fn encode_omitempty_skips_zero_values() {
    let map = encode(&OmitEmpty::default()).unwrap();
    assert_eq!(map, flat(&[("always", "0")]));
}

#[test]
fn encode_omitempty_keeps_non_zero_values() {
    let map = encode(&OmitEmpty {
        count: 3,
        name: "n".to_string(),
        maybe: Some(0),
        when: Version { major: 1, minor: 2 },
        always: 0,
    })
    .unwrap();
    assert_eq!(
        map,
        flat(&[
            ("count", "3"),
            ("label", "n"),
            ("maybe", "0"),
            ("when", "v1.2"),
            ("always", "0"),
        ])
    );
}

#[test]
fn encode_omitempty_keeps_negative_zero() {
    #[derive(Record)]
    struct Signed {
        #[strmap(",omitempty")]
        pub real: f64,
        #[strmap(",omitempty")]
        pub single: f32,
        #[strmap(",omitempty")]
        pub phase: Complex64,
    }

    let map = encode(&Signed {
        real: -0.0,
        single: 0.0,
        phase: Complex64::new(0.0, -0.0),
    })
    .unwrap();
    assert_eq!(map, flat(&[("real", "-0"), ("phase", "(0-0i)")]));
    assert!(0.0f64.is_zero());
    assert!(!(-0.0f32).is_zero());
}

#[test]
fn encode_absent_leaf_reference_as_zero() {
    #[derive(Record)]
    struct Optional {
        pub number: Option<u32>,
        pub text: Option<Box<String>>,
    }

    let map = encode(&Optional {
        number: None,
        text: None,
    })
    .unwrap();
    assert_eq!(map, flat(&[("number", "0"), ("text", "")]));
}

#[test]
fn encode_follows_leaf_reference_chain() {
    #[derive(Record)]
    struct Chained {
        pub deep: Option<Box<Option<Arc<u16>>>>,
    }

    let map = encode(&Chained {
        deep: Some(Box::new(Some(Arc::new(9)))),
    })
    .unwrap();
    assert_eq!(map["deep"], "9");
}

#[test]
fn encode_private_fields_are_invisible() {
    #[derive(Record)]
    struct WithPrivate {
        pub public: String,
        private: String,
    }

    let value = WithPrivate {
        public: "shown".to_string(),
        private: "hidden".to_string(),
    };
    let map = encode(&value).unwrap();
    assert_eq!(map, flat(&[("public", "shown")]));
    assert_eq!(value.private, "hidden");
}

// ============================================================================
// Inline flattening
// ============================================================================

#[test]
fn encode_inline_two_levels() {
    let value = Outer {
        inner1: Inner1 {
            string: "oneLevel".to_string(),
            inner2: Inner2 {
                string: "twoLevel".to_string(),
            },
        },
    };
    let map = encode(&value).unwrap();
    assert_eq!(
        map,
        flat(&[
            ("inner.string", "oneLevel"),
            ("inner.inner2.string", "twoLevel"),
        ])
    );
}

#[test]
fn encode_inline_through_reference() {
    let value = OuterByRef {
        inner: Some(Box::new(Inner2 {
            string: "boxed".to_string(),
        })),
    };
    let map = encode(&value).unwrap();
    assert_eq!(map, flat(&[("inner.string", "boxed")]));
}

#[test]
fn encode_absent_inline_reference_as_zero_record() {
    let map = encode(&OuterByRef::default()).unwrap();
    assert_eq!(map, flat(&[("inner.string", "")]));
}

#[test]
fn encode_absent_inline_reference_with_omitempty() {
    #[derive(Record)]
    struct Sparse {
        #[strmap(",inline,omitempty")]
        pub inner: Option<Inner2>,
    }

    let map = encode(&Sparse { inner: None }).unwrap();
    assert!(map.is_empty());
}

#[test]
fn encode_absent_inline_reference_without_zero_fails() {
    #[derive(Record)]
    struct Opaque {
        pub shown: u8,
        hidden: u8,
    }

    #[derive(Record)]
    struct HoldsOpaque {
        #[strmap(",inline")]
        pub opaque: Option<Box<Opaque>>,
    }

    let sample = Opaque { shown: 1, hidden: 2 };
    assert_eq!(sample.shown + sample.hidden, 3);

    let err = encode(&HoldsOpaque { opaque: None }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NilValue);
}

#[test]
fn encode_custom_separator() {
    let codec = Codec::new(Config {
        separator: "__".to_string(),
    })
    .unwrap();
    let map = codec
        .encode(&Outer {
            inner1: Inner1 {
                string: "a".to_string(),
                inner2: Inner2 {
                    string: "b".to_string(),
                },
            },
        })
        .unwrap();
    assert_eq!(
        map,
        flat(&[("inner__string", "a"), ("inner__inner2__string", "b")])
    );
}

// ============================================================================
// Hooks
// ============================================================================

#[test]
fn encode_display_hook() {
    #[derive(Record)]
    struct Weather {
        pub temperature: Celsius,
    }

    let map = encode(&Weather {
        temperature: Celsius(21.5),
    })
    .unwrap();
    assert_eq!(map["temperature"], "21.5C");
}

#[test]
fn encode_text_hook() {
    #[derive(Record)]
    struct Release {
        pub version: Version,
        pub previous: Option<Version>,
    }

    let map = encode(&Release {
        version: Version { major: 2, minor: 7 },
        previous: None,
    })
    .unwrap();
    assert_eq!(map, flat(&[("version", "v2.7"), ("previous", "v0.0")]));
}

#[test]
fn encode_text_hook_wins_over_display() {
    #[derive(Record)]
    struct HasBoth {
        pub both: Both,
    }

    let map = encode(&HasBoth { both: Both }).unwrap();
    assert_eq!(map["both"], "text");
}

#[test]
fn encode_text_hook_error_propagates() {
    #[derive(Record)]
    struct HasBroken {
        pub fine: u8,
        pub broken: Broken,
    }

    let err = encode(&HasBroken {
        fine: 1,
        broken: Broken,
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Hook);
    let message = err.to_string();
    assert!(message.contains("\"broken\""), "{message}");
    assert!(message.contains("broken on purpose"), "{message}");
}

#[test]
fn encode_map_codec_at_root() {
    let map = encode(&Coordinates { lat: 1.5, lon: -2.25 }).unwrap();
    assert_eq!(map, flat(&[("position", "1.5,-2.25")]));
}

#[test]
fn encode_map_codec_inline_is_prefixed() {
    #[derive(Record)]
    struct Place {
        pub name: String,
        #[strmap("home,inline")]
        pub home: Coordinates,
    }

    let map = encode(&Place {
        name: "base".to_string(),
        home: Coordinates { lat: 3.0, lon: 4.0 },
    })
    .unwrap();
    assert_eq!(map, flat(&[("name", "base"), ("home.position", "3,4")]));
}

#[test]
fn encode_map_codec_on_non_record() {
    let labels = Labels(BTreeMap::from([
        ("env".to_string(), "prod".to_string()),
        ("team".to_string(), "core".to_string()),
    ]));
    let map = encode(&labels).unwrap();
    assert_eq!(map, flat(&[("env", "prod"), ("team", "core")]));

    #[derive(Record)]
    struct Deployment {
        #[strmap("labels,inline")]
        pub labels: Labels,
    }

    let map = encode(&Deployment { labels }).unwrap();
    assert_eq!(map, flat(&[("labels.env", "prod"), ("labels.team", "core")]));
}

// ============================================================================
// Top-level arguments
// ============================================================================

#[test]
fn encode_through_top_level_references() {
    let inner = Inner2 {
        string: "x".to_string(),
    };
    let expected = flat(&[("string", "x")]);

    assert_eq!(encode(&Some(inner.clone())).unwrap(), expected);
    assert_eq!(encode(&Box::new(inner.clone())).unwrap(), expected);
    assert_eq!(encode(&Rc::new(inner.clone())).unwrap(), expected);
    assert_eq!(encode(&Arc::new(Some(inner))).unwrap(), expected);
}

#[test]
fn encode_non_record_fails() {
    let err = encode(&42).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);

    let err = encode(&"text".to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);

    let err = encode(&Some(Box::new(3.5f64))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);
}

#[test]
fn encode_absent_value_fails() {
    let err = encode(&None::<Inner2>).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NilValue);

    let err = encode(&Some(Box::new(None::<Inner2>))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NilValue);
}

// ============================================================================
// Field errors
// ============================================================================

#[test]
fn encode_record_as_leaf_is_unsupported() {
    #[derive(Record)]
    struct NotInlined {
        pub nested: Inner2,
    }

    let err = encode(&NotInlined {
        nested: Inner2::default(),
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert!(err.to_string().contains("Inner2"));
}

#[test]
fn encode_map_codec_as_leaf_is_unsupported() {
    #[derive(Record)]
    struct NotInlined {
        pub labels: Labels,
    }

    let err = encode(&NotInlined {
        labels: Labels::default(),
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
}

#[test]
fn encode_inline_non_record_fails() {
    #[derive(Record)]
    struct BadInline {
        #[strmap(",inline")]
        pub count: u32,
    }

    let err = encode(&BadInline { count: 1 }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);
    assert!(err.to_string().contains("inlining requires a record"));
}

#[test]
fn encode_inline_cycle_is_rejected() {
    #[derive(Record, Default)]
    struct Node {
        pub value: i32,
        #[strmap(",inline")]
        pub next: Option<Box<Node>>,
    }

    let err = encode(&Node::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InlineCycle);

    let chain = Node {
        value: 1,
        next: Some(Box::new(Node::default())),
    };
    let err = encode(&chain).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InlineCycle);
}

#[test]
fn encode_reports_first_failing_field_in_declaration_order() {
    #[derive(Record)]
    struct TwoFailures {
        pub first: Broken,
        pub second: Inner2,
    }

    let err = encode(&TwoFailures {
        first: Broken,
        second: Inner2::default(),
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Hook);
}
