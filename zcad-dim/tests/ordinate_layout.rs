use zcad_config::DimStyleConfig;
use zcad_core::coords::Ucs;
use zcad_core::document::{Dimension, Document, DxfVersion, Entity};
use zcad_core::geometry::{Point2, Point3};
use zcad_dim::sink::Primitive;
use zcad_dim::{
    DimStyle, DimensionError, DimensionRenderer, GeometrySink, OrdinateDimension, RecordingSink,
    render_dimension,
};

fn record(feature: (f64, f64), leader: (f64, f64), x_type: bool) -> Dimension {
    Dimension::ordinate(
        Point3::new(2.0, 3.0, 0.0),
        Point3::new(feature.0, feature.1, 0.0),
        Point3::new(leader.0, leader.1, 0.0),
        x_type,
        "DIM",
    )
}

fn render_to_json(mut dimension: Dimension, style: &DimStyle) -> String {
    let mut engine =
        OrdinateDimension::new(&mut dimension, None, style, DxfVersion::R2000).expect("engine");
    let mut sink = RecordingSink::new();
    engine.render(&mut sink).expect("render");
    serde_json::to_string(&sink).expect("serialize")
}

#[test]
fn identical_inputs_emit_identical_primitives() {
    let style = DimStyle::from(&DimStyleConfig::default());
    let first = render_to_json(record((14.0, 7.5), (20.0, 30.0), true), &style);
    let second = render_to_json(record((14.0, 7.5), (20.0, 30.0), true), &style);
    assert_eq!(first, second);
    assert!(first.contains("\"kind\":\"line\""));
}

#[test]
fn measurement_never_negative_for_any_quadrant() {
    let style = DimStyle::default();
    for (feature, leader) in [
        ((-8.0, -9.0), (-20.0, -30.0)),
        ((8.0, -9.0), (20.0, -30.0)),
        ((-8.0, 9.0), (-20.0, 30.0)),
    ] {
        for x_type in [true, false] {
            let mut dimension = record(feature, leader, x_type);
            let engine = OrdinateDimension::new(&mut dimension, None, &style, DxfVersion::R2000)
                .expect("engine");
            assert!(engine.measurement_value() >= 0.0);
        }
    }
}

#[test]
fn first_leg_keeps_minimum_length() {
    let style = DimStyle::default();
    let leg_size = style.dimasz * 2.0;
    for leader_y in [3.0, 3.5, 10.0, 40.0, -2.0, -40.0] {
        let mut dimension = record((5.0, 3.0), (5.0, leader_y), true);
        let engine = OrdinateDimension::new(&mut dimension, None, &style, DxfVersion::R2000)
            .expect("engine");
        let [first, _, _] = engine.extension_line_segments();
        let feature = Point2::new(5.0, 3.0);
        assert!(first.end.distance(feature) >= leg_size - 1e-9);
    }
}

#[test]
fn limits_render_as_stacked_mtext() {
    let style = DimStyle {
        dimlim: true,
        dimtp: 0.5,
        dimtm: 0.25,
        ..DimStyle::default()
    };
    let mut dimension = record((12.0, 3.0), (12.0, 25.0), true);
    let mut engine =
        OrdinateDimension::new(&mut dimension, None, &style, DxfVersion::R2018).expect("engine");
    let mut sink = RecordingSink::new();
    engine.render(&mut sink).expect("render");
    let (content, _, _) = sink.texts().next().expect("text");
    assert_eq!(content, "{\\H1x;\\S10.50^ 9.75;}");
}

#[test]
fn rotated_ucs_round_trips_through_document() {
    let mut document = Document::with_version(DxfVersion::R2010);
    let id = document.add_dimension(record((10.0, 3.0), (10.0, 20.0), true));
    let ucs = Ucs::from_z_rotation(Point3::new(50.0, 50.0, 0.0), 180.0);
    let rendered = render_dimension(&mut document, id, Some(ucs), &DimStyle::default())
        .expect("render");

    assert!((rendered.value - 8.0).abs() < 1e-9);
    let block = document.block(&rendered.block_name).expect("block");
    let record = document.dimension(id).expect("dimension");
    let origin = record.defpoint.expect("defpoint");
    assert!((origin.x() - 48.0).abs() < 1e-9);
    assert!((origin.y() - 47.0).abs() < 1e-9);

    // 块内几何与记录处于同一坐标系：三条线段、文字、三个定义点
    let feature = record.defpoint2.expect("defpoint2").to_2d();
    assert!(feature.distance(Point2::new(40.0, 47.0)) < 1e-9);
    match &block.entities[5] {
        Entity::Point(point) => assert!(point.location.distance(feature) < 1e-9),
        other => panic!("expected point, got {other:?}"),
    }
    let midpoint = record.text_midpoint.expect("text midpoint").to_2d();
    match &block.entities[3] {
        Entity::MText(mtext) => {
            assert!(mtext.insert.distance(midpoint) < 1e-9);
            // UCS 中 90° 的文字在世界坐标中朝下
            assert!(mtext.direction.x().abs() < 1e-9);
            assert!((mtext.direction.y() + 1.0).abs() < 1e-9);
        }
        other => panic!("expected mtext, got {other:?}"),
    }
}

#[test]
fn negative_length_factor_measures_magnitude() {
    let style = DimStyle {
        dimlfac: -1.0,
        ..DimStyle::default()
    };
    let mut dimension = Dimension::ordinate(
        Point3::ORIGIN,
        Point3::new(10.0, 0.0, 0.0),
        Point3::new(10.0, 20.0, 0.0),
        true,
        "DIM",
    );
    let engine =
        OrdinateDimension::new(&mut dimension, None, &style, DxfVersion::R2000).expect("engine");
    assert!((engine.measurement_value() - 10.0).abs() < 1e-9);
    assert_eq!(engine.measurement_text(), "10.00");
}

struct RejectingSink;

impl GeometrySink for RejectingSink {
    fn add_line(
        &mut self,
        _start: Point2,
        _end: Point2,
        _attribs: &zcad_core::document::GraphicAttributes,
    ) -> Result<(), DimensionError> {
        Err(DimensionError::Sink("只读输出端".to_string()))
    }

    fn add_text(
        &mut self,
        _content: &str,
        _position: Point2,
        _rotation: f64,
        _attribs: &zcad_dim::sink::TextAttributes,
    ) -> Result<(), DimensionError> {
        Err(DimensionError::Sink("只读输出端".to_string()))
    }

    fn add_defpoints(
        &mut self,
        _points: &[Point2],
        _attribs: &zcad_core::document::GraphicAttributes,
    ) -> Result<(), DimensionError> {
        Err(DimensionError::Sink("只读输出端".to_string()))
    }
}

#[test]
fn sink_errors_propagate_unchanged() {
    let mut dimension = record((10.0, 3.0), (10.0, 20.0), true);
    let mut engine = OrdinateDimension::new(&mut dimension, None, &DimStyle::default(), DxfVersion::R2000)
        .expect("engine");
    let err = engine.render(&mut RejectingSink).unwrap_err();
    assert!(matches!(err, DimensionError::Sink(message) if message == "只读输出端"));
}

#[test]
fn defpoints_follow_anchor_order() {
    let mut dimension = record((10.0, 3.0), (10.0, 20.0), true);
    let mut engine = OrdinateDimension::new(&mut dimension, None, &DimStyle::default(), DxfVersion::R2000)
        .expect("engine");
    let mut sink = RecordingSink::new();
    engine.render(&mut sink).expect("render");
    match sink.primitives.last() {
        Some(Primitive::Defpoints { points, .. }) => assert_eq!(
            points,
            &vec![
                Point2::new(2.0, 3.0),
                Point2::new(10.0, 3.0),
                Point2::new(10.0, 20.0)
            ]
        ),
        other => panic!("expected defpoints, got {other:?}"),
    }
}
