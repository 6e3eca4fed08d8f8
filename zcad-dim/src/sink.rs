//! 几何输出端：布局引擎只向其写入图元，不读取任何结果。

use serde::Serialize;
use zcad_core::document::{
    BlockDefinition, Entity, GraphicAttributes, Line, MText, PointEntity, Text,
};
use zcad_core::geometry::{Point2, Vector2};

use crate::errors::DimensionError;

/// MTEXT 附着点：中心对齐。
const MTEXT_MIDDLE_CENTER: i16 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAttributes {
    pub graphic: GraphicAttributes,
    pub height: f64,
    pub style: String,
    pub width_factor: f64,
    /// 为真时以 MTEXT 输出，内容可包含格式控制码。
    pub rich: bool,
}

pub trait GeometrySink {
    fn add_line(
        &mut self,
        start: Point2,
        end: Point2,
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError>;

    /// `rotation` 单位为度，`position` 为文字中心。
    fn add_text(
        &mut self,
        content: &str,
        position: Point2,
        rotation: f64,
        attribs: &TextAttributes,
    ) -> Result<(), DimensionError>;

    fn add_defpoints(
        &mut self,
        points: &[Point2],
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError>;
}

/// 记录下来的图元，用于检查或序列化输出。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        start: Point2,
        end: Point2,
        attribs: GraphicAttributes,
    },
    Text {
        content: String,
        position: Point2,
        rotation: f64,
        attribs: TextAttributes,
    },
    Defpoints {
        points: Vec<Point2>,
        attribs: GraphicAttributes,
    },
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RecordingSink {
    pub primitives: Vec<Primitive>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Line { start, end, .. } => Some((*start, *end)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point2, f64)> + '_ {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Text {
                content,
                position,
                rotation,
                ..
            } => Some((content.as_str(), *position, *rotation)),
            _ => None,
        })
    }
}

impl GeometrySink for RecordingSink {
    fn add_line(
        &mut self,
        start: Point2,
        end: Point2,
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError> {
        self.primitives.push(Primitive::Line {
            start,
            end,
            attribs: attribs.clone(),
        });
        Ok(())
    }

    fn add_text(
        &mut self,
        content: &str,
        position: Point2,
        rotation: f64,
        attribs: &TextAttributes,
    ) -> Result<(), DimensionError> {
        self.primitives.push(Primitive::Text {
            content: content.to_string(),
            position,
            rotation,
            attribs: attribs.clone(),
        });
        Ok(())
    }

    fn add_defpoints(
        &mut self,
        points: &[Point2],
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError> {
        self.primitives.push(Primitive::Defpoints {
            points: points.to_vec(),
            attribs: attribs.clone(),
        });
        Ok(())
    }
}

/// 将图元写入尺寸几何块（匿名 `*D` 块）。
#[derive(Debug)]
pub struct BlockSink<'a> {
    block: &'a mut BlockDefinition,
}

impl<'a> BlockSink<'a> {
    pub fn new(block: &'a mut BlockDefinition) -> Self {
        Self { block }
    }
}

impl GeometrySink for BlockSink<'_> {
    fn add_line(
        &mut self,
        start: Point2,
        end: Point2,
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError> {
        self.block.add_entity(Entity::Line(Line {
            start,
            end,
            attribs: attribs.clone(),
        }));
        Ok(())
    }

    fn add_text(
        &mut self,
        content: &str,
        position: Point2,
        rotation: f64,
        attribs: &TextAttributes,
    ) -> Result<(), DimensionError> {
        if !rotation.is_finite() {
            return Err(DimensionError::Sink(format!(
                "文字旋转角无效：{rotation}"
            )));
        }
        let style = Some(attribs.style.clone());
        let entity = if attribs.rich {
            Entity::MText(MText {
                insert: position,
                content: content.to_string(),
                height: attribs.height,
                direction: Vector2::from_angle_deg(rotation),
                attachment_point: MTEXT_MIDDLE_CENTER,
                style,
                attribs: attribs.graphic.clone(),
            })
        } else {
            Entity::Text(Text {
                insert: position,
                content: content.to_string(),
                height: attribs.height,
                rotation: rotation.to_radians(),
                width_factor: attribs.width_factor,
                style,
                attribs: attribs.graphic.clone(),
            })
        };
        self.block.add_entity(entity);
        Ok(())
    }

    fn add_defpoints(
        &mut self,
        points: &[Point2],
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError> {
        for point in points {
            self.block.add_entity(Entity::Point(PointEntity {
                location: *point,
                attribs: attribs.clone(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use zcad_core::document::DEFPOINTS_LAYER;

    use super::*;

    fn text_attribs(rich: bool) -> TextAttributes {
        TextAttributes {
            graphic: GraphicAttributes::on_layer("DIM"),
            height: 2.5,
            style: "Standard".to_string(),
            width_factor: 1.0,
            rich,
        }
    }

    #[test]
    fn block_sink_writes_plain_text_in_radians() {
        let mut block = BlockDefinition::new("*D1");
        let mut sink = BlockSink::new(&mut block);
        sink.add_text("10.00", Point2::new(1.0, 2.0), 90.0, &text_attribs(false))
            .expect("add text");
        match &block.entities[0] {
            Entity::Text(text) => {
                assert_eq!(text.content, "10.00");
                assert!((text.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
            }
            other => panic!("expected text entity, got {other:?}"),
        }
    }

    #[test]
    fn block_sink_writes_mtext_with_direction() {
        let mut block = BlockDefinition::new("*D1");
        let mut sink = BlockSink::new(&mut block);
        sink.add_text("10.00", Point2::new(1.0, 2.0), 90.0, &text_attribs(true))
            .expect("add mtext");
        match &block.entities[0] {
            Entity::MText(mtext) => {
                assert_eq!(mtext.attachment_point, MTEXT_MIDDLE_CENTER);
                assert!(mtext.direction.x().abs() < 1e-12);
                assert!((mtext.direction.y() - 1.0).abs() < 1e-12);
            }
            other => panic!("expected mtext entity, got {other:?}"),
        }
    }

    #[test]
    fn block_sink_rejects_invalid_rotation() {
        let mut block = BlockDefinition::new("*D1");
        let mut sink = BlockSink::new(&mut block);
        let err = sink
            .add_text("1", Point2::ORIGIN, f64::NAN, &text_attribs(false))
            .unwrap_err();
        assert!(matches!(err, DimensionError::Sink(_)));
        assert!(block.entities.is_empty());
    }

    #[test]
    fn defpoints_land_on_defpoints_layer() {
        let mut block = BlockDefinition::new("*D1");
        let mut sink = BlockSink::new(&mut block);
        sink.add_defpoints(
            &[Point2::ORIGIN, Point2::new(1.0, 0.0)],
            &GraphicAttributes::on_layer(DEFPOINTS_LAYER),
        )
        .expect("add defpoints");
        assert_eq!(block.entities.len(), 2);
        assert!(block
            .entities
            .iter()
            .all(|entity| entity.layer_name() == DEFPOINTS_LAYER));
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.add_line(Point2::ORIGIN, Point2::new(1.0, 0.0), &GraphicAttributes::default())
            .unwrap();
        sink.add_text("A", Point2::ORIGIN, 0.0, &text_attribs(false)).unwrap();
        sink.add_defpoints(&[Point2::ORIGIN], &GraphicAttributes::default())
            .unwrap();
        assert_eq!(sink.primitives.len(), 3);
        assert_eq!(sink.lines().count(), 1);
        assert_eq!(sink.texts().next().map(|(content, _, _)| content), Some("A"));
        assert!(matches!(sink.primitives[2], Primitive::Defpoints { .. }));
    }
}
