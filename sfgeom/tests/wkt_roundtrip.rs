use approx::assert_abs_diff_eq;
use sfgeom::wkb::MAX_NESTING_DEPTH;
use sfgeom::wkt::WktReader;
use sfgeom::{
    ErrorKind, FromWkt, Geom, Geometry, GeometryType, LineString, MultiPoint, Point, Polygon,
    ToWkt, WkbVariant, WktOptions,
};

const CANONICAL: &[&str] = &[
    "POINT (1 2)",
    "POINT (1 2 3)",
    "POINT EMPTY",
    "LINESTRING (0 0,1.5 1.0,-3 4)",
    "LINESTRING (0.1 0.2 0.5,1 1 2)",
    "LINESTRING EMPTY",
    "POLYGON ((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 1))",
    "POLYGON EMPTY",
    "MULTIPOINT (1 2,3 4)",
    "MULTIPOINT EMPTY",
    "MULTILINESTRING ((0 0,1 1),(2 2,3 3))",
    "MULTIPOLYGON (((0 0,1 0,1 1,0 0)),((5 5,6 5,6 6,5 5)))",
    "GEOMETRYCOLLECTION (POINT (1 2),LINESTRING (0 0,1 1),POLYGON EMPTY)",
    "GEOMETRYCOLLECTION EMPTY",
    "COMPOUNDCURVE ((0 0,1 0),(1 0,1 1))",
    "TRIANGLE ((0 0,1 0,0 1,0 0))",
    "TIN (((0 0,1 0,0 1,0 0)),((1 0,1 1,0 1,1 0)))",
];

fn iso() -> WktOptions {
    WktOptions {
        variant: WkbVariant::Iso,
        precision: None,
    }
}

#[test]
fn canonical_text_is_stable() {
    let _ = env_logger::builder().is_test(true).try_init();

    for text in CANONICAL {
        let geom = Geom::from_wkt(text).unwrap();
        assert_eq!(geom.to_wkt(), *text);
    }
}

#[test]
fn iso_output_reads_back() {
    for text in CANONICAL {
        let geom = Geom::from_wkt(text).unwrap();
        let iso_text = geom.to_wkt_with(&iso());
        assert_eq!(Geom::from_wkt(&iso_text).unwrap(), geom, "{iso_text}");
    }

    let point = Geom::from_wkt("POINT (1 2 3)").unwrap();
    assert_eq!(point.to_wkt_with(&iso()), "POINT Z (1 2 3)");

    let multi = Geom::from_wkt("MULTIPOINT (1 2,3 4)").unwrap();
    assert_eq!(multi.to_wkt_with(&iso()), "MULTIPOINT ((1 2),(3 4))");
}

#[test]
fn dimension_tags() {
    let geom = Geom::from_wkt("linestring z (0 0 1, 1 1 2)").unwrap();
    assert!(geom.is_3d());

    let geom = Geom::from_wkt("LINESTRING M (0 0 7,1 1 8)").unwrap();
    assert!(!geom.is_3d());
    assert_eq!(geom.to_wkt(), "LINESTRING (0 0,1 1)");

    let geom = Geom::from_wkt("POINT ZM (1 2 3 4)").unwrap();
    assert_eq!(geom.to_wkt(), "POINT (1 2 3)");

    let geom = Geom::from_wkt("POLYGON Z EMPTY").unwrap();
    assert!(geom.is_3d());
    assert!(geom.is_empty());
}

#[test]
fn z_in_any_coordinate_promotes() {
    let line = LineString::from_wkt("LINESTRING (0 0,1 1 5)").unwrap();
    assert!(line.is_3d());
    assert_eq!(line.get_z(0), Some(0.0));
    assert_eq!(line.to_wkt(), "LINESTRING (0 0 0,1 1 5)");
}

#[test]
fn non_integral_values() {
    let point = Point::from_wkt("POINT (0.1 2)").unwrap();
    assert_abs_diff_eq!(point.x(), 0.1);
    assert_eq!(point.to_wkt(), "POINT (0.1 2.0)");

    let precise = WktOptions {
        variant: WkbVariant::OldOgc,
        precision: Some(2),
    };
    let point = Point::new(1.0 / 3.0, 2.5);
    assert_eq!(point.to_wkt_with(&precise), "POINT (0.33 2.5)");

    let point = Point::from_wkt("POINT (nan -inf)").unwrap();
    assert!(point.x().is_nan());
    assert_eq!(point.y(), f64::NEG_INFINITY);
    assert_eq!(point.to_wkt(), "POINT (nan -inf)");
}

#[test]
fn trailing_text_is_left_in_reader() {
    let mut reader = WktReader::new("POINT (1 2) tail");
    let point = Point::read_wkt(&mut reader).unwrap();
    assert_eq!(point, Point::new(1.0, 2.0));
    assert_eq!(reader.remaining().trim(), "tail");

    assert_eq!(Geom::from_wkt("POINT (1 2);").unwrap().geometry_type(), GeometryType::Point);
}

#[test]
fn grammar_violations() {
    let _ = env_logger::builder().is_test(true).try_init();

    for text in [
        "",
        "POINT",
        "POINT (1)",
        "POINT (1 2",
        "POINT (1 2 3 4 5)",
        "POINT (a b)",
        "LINESTRING (0 0,)",
        "LINESTRING ((0 0,1 1))",
        "POLYGON ((0 0,1 0,1 1,0 0)",
        "MULTIPOLYGON ((0 0,1 0,1 1,0 0))",
        "GEOMETRYCOLLECTION (POINT (1 2) POINT (3 4))",
    ] {
        let err = Geom::from_wkt(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptData, "{text:?}: {err}");
    }
}

#[test]
fn wrong_keyword_for_type() {
    assert_eq!(
        Polygon::from_wkt("POINT (1 2)").unwrap_err().kind(),
        ErrorKind::CorruptData
    );
    assert_eq!(
        Geom::from_wkt("CURVEPOLYGON EMPTY").unwrap_err().kind(),
        ErrorKind::UnsupportedGeometryType
    );
    assert_eq!(
        MultiPoint::from_wkt("MULTIPOINT (POINT (1 2))").unwrap_err().kind(),
        ErrorKind::CorruptData
    );
}

fn nested_collections(levels: usize) -> String {
    format!(
        "{}POINT (1 2){}",
        "GEOMETRYCOLLECTION (".repeat(levels),
        ")".repeat(levels)
    )
}

#[test]
fn nesting_depth_is_limited() {
    let text = nested_collections(MAX_NESTING_DEPTH);
    assert_eq!(Geom::from_wkt(&text).unwrap().to_wkt(), text);

    for levels in [MAX_NESTING_DEPTH + 1, 200_000] {
        let err = Geom::from_wkt(&nested_collections(levels)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptData);
    }
}
