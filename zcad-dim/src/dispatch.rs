//! 文档级入口：为 DIMENSION 记录生成几何块。

use serde::Serialize;
use tracing::{debug, info};
use zcad_core::coords::Ucs;
use zcad_core::document::{BlockDefinition, DimensionKind, Document, EntityId};
use zcad_core::geometry::Point2;

use crate::base::DimensionRenderer;
use crate::errors::DimensionError;
use crate::ordinate::OrdinateDimension;
use crate::sink::BlockSink;
use crate::style::DimStyle;

/// 一次渲染的摘要。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDimension {
    pub block_name: String,
    pub value: f64,
    pub text: String,
    pub text_location: Point2,
    pub text_rotation: f64,
    pub entity_count: usize,
}

/// 渲染文档中的一个尺寸：构建布局、把定义点转换到 WCS，几何写入新的匿名 `*D` 块，
/// 块名记入 DIMENSION 的 `geometry`。任何一步失败都不会向文档添加块。
pub fn render_dimension(
    document: &mut Document,
    id: EntityId,
    ucs: Option<Ucs>,
    style: &DimStyle,
) -> Result<RenderedDimension, DimensionError> {
    let kind = document
        .dimension(id)
        .ok_or(DimensionError::EntityNotFound(id.get()))?
        .kind();
    if kind != DimensionKind::Ordinate {
        return Err(DimensionError::UnsupportedKind(format!("{kind:?}")));
    }

    let dxf_version = document.dxf_version();
    let block_name = document.next_anonymous_block_name('D');
    let mut block = BlockDefinition::new(block_name.clone());
    let dimension = document
        .dimension_mut(id)
        .ok_or(DimensionError::EntityNotFound(id.get()))?;

    let (value, text, placed) = {
        let mut renderer = OrdinateDimension::new(dimension, ucs, style, dxf_version)?;
        renderer.transform_ucs_to_wcs()?;
        renderer.render(&mut BlockSink::new(&mut block))?;
        (
            renderer.measurement_value(),
            renderer.measurement_text().to_string(),
            renderer.placed_text(),
        )
    };
    dimension.geometry = Some(block_name.clone());

    let entity_count = block.entities.len();
    debug!(block = %block_name, entity_count, "尺寸几何块已生成");
    document.add_block_definition(block);
    info!(id = id.get(), block = %block_name, value, "坐标标注渲染完成");

    Ok(RenderedDimension {
        block_name,
        value,
        text,
        text_location: placed.location,
        text_rotation: placed.rotation,
        entity_count,
    })
}

#[cfg(test)]
mod tests {
    use zcad_core::document::{Dimension, DxfVersion, Entity};
    use zcad_core::geometry::Point3;

    use super::*;

    fn document_with_ordinate() -> (Document, EntityId) {
        let mut document = Document::new();
        let id = document.add_dimension(Dimension::ordinate(
            Point3::ORIGIN,
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 20.0, 0.0),
            true,
            "DIM",
        ));
        (document, id)
    }

    #[test]
    fn renders_into_anonymous_block() {
        let (mut document, id) = document_with_ordinate();
        let rendered =
            render_dimension(&mut document, id, None, &DimStyle::default()).expect("render");
        assert_eq!(rendered.block_name, "*D1");
        assert_eq!(rendered.text, "10.00");
        // 3 条线 + 1 段文字 + 3 个定义点
        assert_eq!(rendered.entity_count, 7);

        let block = document.block("*D1").expect("block");
        assert!(matches!(block.entities[3], Entity::MText(_)));
        let record = document.dimension(id).expect("dimension");
        assert_eq!(record.geometry.as_deref(), Some("*D1"));
        assert!(record.text_midpoint.is_some());
        assert!(document.layers().any(|layer| layer.name == "DEFPOINTS"));
    }

    #[test]
    fn r12_document_gets_plain_text() {
        let mut document = Document::with_version(DxfVersion::R12);
        let id = document.add_dimension(Dimension::ordinate(
            Point3::ORIGIN,
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(6.0, 4.0, 0.0),
            false,
            "DIM",
        ));
        let rendered =
            render_dimension(&mut document, id, None, &DimStyle::default()).expect("render");
        let block = document.block(&rendered.block_name).expect("block");
        assert!(matches!(block.entities[3], Entity::Text(_)));
    }

    #[test]
    fn unknown_entity_is_reported() {
        let mut document = Document::new();
        let err = render_dimension(&mut document, EntityId::new(42), None, &DimStyle::default())
            .unwrap_err();
        assert!(matches!(err, DimensionError::EntityNotFound(42)));
    }

    #[test]
    fn other_dimension_kinds_are_rejected() {
        let (mut document, id) = document_with_ordinate();
        if let Some(record) = document.dimension_mut(id) {
            record.dimtype = 32;
        }
        let err = render_dimension(&mut document, id, None, &DimStyle::default()).unwrap_err();
        assert!(matches!(err, DimensionError::UnsupportedKind(_)));
        assert_eq!(document.blocks().count(), 0);
    }

    #[test]
    fn missing_geometry_adds_no_block() {
        let (mut document, id) = document_with_ordinate();
        if let Some(record) = document.dimension_mut(id) {
            record.defpoint3 = None;
        }
        let err = render_dimension(&mut document, id, None, &DimStyle::default()).unwrap_err();
        assert!(matches!(err, DimensionError::MissingGeometry { .. }));
        assert_eq!(document.blocks().count(), 0);
        assert!(document.dimension(id).expect("dimension").geometry.is_none());
    }
}
