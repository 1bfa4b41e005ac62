use std::borrow::Cow;

use serde_json::json;
use transit_pack::{
    FromGround, Ground, MapBuilder, PlainJson, ReadHandler, Reader, Rep, TransitError,
    WriteHandler, Writer, WriterOptions,
};

/// Small value model with one composite tag (`point`) and one scalar tag (`f`).
#[derive(Debug, Clone, PartialEq)]
enum Tv {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Tv>),
    Map(Vec<(String, Tv)>),
    Point(i64, i64),
    Flag(String),
    Closure,
}

struct Points;

impl WriteHandler<Tv> for Points {
    type Error = TransitError;

    fn tag(&self, value: &Tv) -> Option<&'static str> {
        match value {
            Tv::Point(..) => Some("point"),
            Tv::Flag(_) => Some("f"),
            _ => None,
        }
    }

    fn rep<'a>(&self, value: &'a Tv) -> Result<Rep<'a, Tv>, TransitError> {
        Ok(match value {
            Tv::Null => Rep::Null,
            Tv::Bool(b) => Rep::Bool(*b),
            Tv::Int(i) => Rep::Int(*i),
            Tv::Float(f) => Rep::Float(*f),
            Tv::Str(s) => Rep::Str(Cow::Borrowed(s)),
            Tv::Array(items) => Rep::Array(items.iter().map(Rep::Value).collect()),
            Tv::Map(entries) => Rep::Map(
                entries
                    .iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), Rep::Value(v)))
                    .collect(),
            ),
            Tv::Point(x, y) => Rep::Array(vec![Rep::Int(*x), Rep::Int(*y)]),
            Tv::Flag(s) => Rep::Str(Cow::Borrowed(s)),
            Tv::Closure => return Err(TransitError::UnknownType("Closure".into())),
        })
    }
}

impl ReadHandler<Tv> for Points {
    type Error = TransitError;

    fn read(&self, tag: &str, rep: Tv) -> Option<Result<Tv, TransitError>> {
        match (tag, rep) {
            ("point", Tv::Array(items)) => Some(match items.as_slice() {
                [Tv::Int(x), Tv::Int(y)] => Ok(Tv::Point(*x, *y)),
                _ => Err(TransitError::Malformed("bad point".into())),
            }),
            ("f", Tv::Str(s)) => Some(Ok(Tv::Flag(s))),
            _ => None,
        }
    }
}

impl MapBuilder<Tv> for Points {
    type Map = Vec<(String, Tv)>;

    fn init(&self) -> Self::Map {
        Vec::new()
    }

    fn add(&self, map: &mut Self::Map, key: Tv, value: Tv) -> Result<(), TransitError> {
        match key {
            Tv::Str(key) => {
                map.push((key, value));
                Ok(())
            }
            _ => Err(TransitError::Malformed("non-string key".into())),
        }
    }

    fn finalize(&self, map: Self::Map) -> Tv {
        Tv::Map(map)
    }
}

impl FromGround for Tv {
    fn from_ground(ground: Ground<Self>) -> Self {
        match ground {
            Ground::Null => Tv::Null,
            Ground::Bool(b) => Tv::Bool(b),
            Ground::Int(i) => Tv::Int(i),
            Ground::Float(f) => Tv::Float(f),
            Ground::Str(s) => Tv::Str(s),
            Ground::Array(items) => Tv::Array(items),
        }
    }
}

fn map(entries: &[(&str, Tv)]) -> Tv {
    Tv::Map(entries.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect())
}

fn round_trip(value: &Tv) -> (serde_json::Value, Tv) {
    let writer = Writer::new(Points);
    let reader = Reader::new(Points, Points);
    let text = writer.write(value).expect("write");
    let decoded = reader.read::<Tv>(&text).expect("read");
    (serde_json::from_str(&text).expect("json"), decoded)
}

#[test]
fn scalar_roots_are_quoted() {
    for (value, wire) in [
        (Tv::Int(5), json!(["~#'", 5])),
        (Tv::Null, json!(["~#'", null])),
        (Tv::Str("~x".into()), json!(["~#'", "~~x"])),
        (Tv::Float(1.5), json!(["~#'", 1.5])),
    ] {
        let (json, back) = round_trip(&value);
        assert_eq!(json, wire);
        assert_eq!(back, value);
    }
}

#[test]
fn repeated_tags_are_cached() {
    let value = Tv::Array(vec![Tv::Point(1, 2), Tv::Point(3, 4), Tv::Point(5, 6)]);
    let (json, back) = round_trip(&value);
    assert_eq!(
        json,
        json!([["~#point", [1, 2]], ["^0", [3, 4]], ["^0", [5, 6]]])
    );
    assert_eq!(back, value);
}

#[test]
fn keys_and_tags_share_one_cache() {
    let value = Tv::Array(vec![
        map(&[("name", Tv::Point(1, 2))]),
        map(&[("name", Tv::Point(3, 4)), ("id", Tv::Int(7))]),
    ]);
    let (json, back) = round_trip(&value);
    assert_eq!(
        json,
        json!([
            ["^ ", "name", ["~#point", [1, 2]]],
            ["^ ", "^0", ["^1", [3, 4]], "id", 7]
        ])
    );
    assert_eq!(back, value);
}

#[test]
fn single_character_tags_use_scalar_form() {
    let value = Tv::Array(vec![Tv::Flag("on".into()), Tv::Str("~fake".into())]);
    let (json, back) = round_trip(&value);
    assert_eq!(json, json!(["~fon", "~~fake"]));
    assert_eq!(back, value);
}

#[test]
fn two_element_arrays_with_string_heads_stay_arrays() {
    let value = Tv::Array(vec![Tv::Str("head".into()), Tv::Int(1)]);
    let (json, back) = round_trip(&value);
    assert_eq!(json, json!(["head", 1]));
    assert_eq!(back, value);
}

#[test]
fn verbose_mode_uses_objects_and_no_cache() {
    let writer = Writer::with_options(Points, WriterOptions { verbose: true });
    let reader = Reader::new(Points, Points);
    let value = Tv::Array(vec![
        map(&[("name", Tv::Point(1, 2))]),
        map(&[("name", Tv::Point(3, 4))]),
    ]);
    let text = writer.write(&value).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        json!([{"name": {"~#point": [1, 2]}}, {"name": {"~#point": [3, 4]}}])
    );
    assert_eq!(reader.read::<Tv>(&text).unwrap(), value);

    let scalar = writer.write(&Tv::Bool(true)).unwrap();
    assert_eq!(scalar, r#"{"~#'":true}"#);
    assert_eq!(reader.read::<Tv>(&scalar).unwrap(), Tv::Bool(true));
}

#[test]
fn large_integers_and_special_floats_survive() {
    let value = Tv::Array(vec![
        Tv::Int(i64::MAX),
        Tv::Int(-42),
        Tv::Float(f64::INFINITY),
        Tv::Float(f64::NEG_INFINITY),
        Tv::Float(2.167310643111992e-144),
    ]);
    let (json, back) = round_trip(&value);
    assert_eq!(
        json,
        json!([format!("~i{}", i64::MAX), -42, "~zINF", "~z-INF", 2.167310643111992e-144])
    );
    assert_eq!(back, value);

    let reader = Reader::new(Points, Points);
    match reader.read::<Tv>(r#"["~#'","~zNaN"]"#).unwrap() {
        Tv::Float(f) => assert!(f.is_nan()),
        other => panic!("expected NaN, got {other:?}"),
    }
}

#[test]
fn builtin_scalars_are_decoded() {
    let reader = Reader::new(Points, Points);
    let back = reader
        .read::<Tv>(r#"["~_","~?t","~?f","~i12","~d2.5","~`tick"]"#)
        .unwrap();
    assert_eq!(
        back,
        Tv::Array(vec![
            Tv::Null,
            Tv::Bool(true),
            Tv::Bool(false),
            Tv::Int(12),
            Tv::Float(2.5),
            Tv::Str("`tick".into()),
        ])
    );
}

#[test]
fn unknown_tags_fail() {
    let reader = Reader::new(Points, Points);
    let err = reader.read::<Tv>(r#"["~#nope",1]"#).unwrap_err();
    assert!(matches!(err, TransitError::UnknownTag(ref t) if t == "nope"));

    let err = reader.read::<Tv>(r#"["~qscalar"]"#).unwrap_err();
    assert!(matches!(err, TransitError::UnknownTag(ref t) if t == "q"));
}

#[test]
fn unknown_types_fail() {
    let writer = Writer::new(Points);
    let err = writer
        .write(&Tv::Array(vec![Tv::Int(1), Tv::Closure]))
        .unwrap_err();
    assert!(matches!(err, TransitError::UnknownType(_)));
}

#[test]
fn malformed_documents_are_rejected() {
    let reader = Reader::new(Points, Points);
    assert!(matches!(
        reader.read::<Tv>(r#"["^ ","a"]"#),
        Err(TransitError::Malformed(_))
    ));
    assert!(matches!(
        reader.read::<Tv>(r#"["^ ","^3",1]"#),
        Err(TransitError::Malformed(_))
    ));
    assert!(matches!(
        reader.read::<Tv>(r#"["~?maybe"]"#),
        Err(TransitError::Malformed(_))
    ));
    assert!(matches!(reader.read::<Tv>("[1,"), Err(TransitError::Json(_))));
}

#[test]
fn plain_json_rides_through_unchanged() {
    let writer = Writer::new(PlainJson);
    let reader = Reader::new(PlainJson, PlainJson);
    let value = json!({
        "list": [1, 2.5, "~i5", "^0", null],
        "nested": {"deep": {"flag": true}},
        "empty": {}
    });
    let text = writer.write(&value).unwrap();
    assert_eq!(reader.read::<serde_json::Value>(&text).unwrap(), value);
    assert_eq!(
        reader.read::<serde_json::Value>(&writer.write(&json!("text")).unwrap()).unwrap(),
        json!("text")
    );
}
