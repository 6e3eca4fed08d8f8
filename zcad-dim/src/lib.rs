pub mod base;
pub mod dispatch;
pub mod measurement;
pub mod ordinate;
pub mod sink;
pub mod style;
pub mod text_box;
pub mod tolerance;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DimensionError {
        #[error("DIMENSION 缺少必需的定义点 {attribute}")]
        MissingGeometry { attribute: &'static str },
        #[error("坐标系无效: {0}")]
        InvalidCoordinateSystem(String),
        #[error("几何输出端拒绝图元: {0}")]
        Sink(String),
        #[error("尺寸渲染器只能渲染一次")]
        AlreadyRendered,
        #[error("暂不支持的尺寸类型: {0}")]
        UnsupportedKind(String),
        #[error("entity with id {0} not found")]
        EntityNotFound(u64),
    }
}

pub use base::{DimensionContext, DimensionRenderer};
pub use dispatch::{RenderedDimension, render_dimension};
pub use errors::DimensionError;
pub use ordinate::OrdinateDimension;
pub use sink::{BlockSink, GeometrySink, RecordingSink};
pub use style::DimStyle;
