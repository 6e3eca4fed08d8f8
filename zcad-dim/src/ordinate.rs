//! 坐标标注（ORDINATE DIMENSION）布局。
//!
//! 三个定义点：原点 `defpoint`、特征点 `defpoint2`、引线终点 `defpoint3`。
//! 引线从特征点出发，经两次折弯到达引线终点，测量文字沿引线方向放在终点之外。

use tracing::debug;
use zcad_core::coords::Ucs;
use zcad_core::document::{Dimension, DxfVersion};
use zcad_core::geometry::{Point2, Point3, Vector2};

use crate::base::{DimensionContext, DimensionRenderer};
use crate::errors::DimensionError;
use crate::sink::GeometrySink;
use crate::style::DimStyle;
use crate::text_box::{PlacedText, TextBox, TextBoxSize};

/// 测量的坐标分量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinateAxis {
    X,
    Y,
}

impl OrdinateAxis {
    pub fn of(dimension: &Dimension) -> Self {
        if dimension.is_ordinate_x_type() {
            OrdinateAxis::X
        } else {
            OrdinateAxis::Y
        }
    }

    /// 未指定文字旋转角时的默认值（度）：X 类型文字沿竖直引线排列。
    #[inline]
    pub fn default_text_rotation(self) -> f64 {
        match self {
            OrdinateAxis::X => 90.0,
            OrdinateAxis::Y => 0.0,
        }
    }

    /// 文字垂直偏移的方向。
    #[inline]
    pub fn text_offset_direction(self) -> Vector2 {
        match self {
            OrdinateAxis::X => Vector2::new(-1.0, 0.0),
            OrdinateAxis::Y => Vector2::new(0.0, 1.0),
        }
    }

    fn measure(self, distance: Vector2) -> f64 {
        match self {
            OrdinateAxis::X => distance.x().abs(),
            OrdinateAxis::Y => distance.y().abs(),
        }
    }
}

/// 引线方向框架：`dir_ortho` 为引线走向，`direction` 与之正交。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionFrame {
    pub direction: Vector2,
    pub dir_ortho: Vector2,
}

impl DirectionFrame {
    /// 分量符号取自引线偏移，零值按正方向处理。
    pub fn resolve(axis: OrdinateAxis, leader_offset: Vector2) -> Self {
        let horizontal = Vector2::new(unit_sign(leader_offset.x()), 0.0);
        let vertical = Vector2::new(0.0, unit_sign(leader_offset.y()));
        match axis {
            OrdinateAxis::X => Self {
                direction: horizontal,
                dir_ortho: vertical,
            },
            OrdinateAxis::Y => Self {
                direction: vertical,
                dir_ortho: horizontal,
            },
        }
    }
}

#[inline]
fn unit_sign(value: f64) -> f64 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// 一段尺寸界线。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

impl LineSegment {
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

fn required_defpoint(
    value: Option<Point3>,
    attribute: &'static str,
) -> Result<Point2, DimensionError> {
    value
        .map(Point3::to_2d)
        .ok_or(DimensionError::MissingGeometry { attribute })
}

/// 文字放在引线终点之外半个文字宽度处，并沿轴向偏移垂直距离。
pub fn place_text(
    axis: OrdinateAxis,
    frame: DirectionFrame,
    end_of_leader: Point2,
    size: TextBoxSize,
    vertical_distance: f64,
    text_rotation: Option<f64>,
) -> PlacedText {
    let offset = axis.text_offset_direction() * vertical_distance;
    PlacedText {
        location: end_of_leader + frame.dir_ortho * (size.width * 0.5) + offset,
        rotation: text_rotation.unwrap_or_else(|| axis.default_text_rotation()),
    }
}

/// 三段式引线：特征点处的直段、折弯段、通向文字的末段。
///
/// 第一段终点距特征点不小于 `leg_size`；文字不居中时末段延长一个文字宽度。
pub fn extension_line_segments(
    feature_location: Point2,
    end_of_leader: Point2,
    dir_ortho: Vector2,
    arrow_size: f64,
    extension_offset: f64,
    trailing_extension: f64,
) -> [LineSegment; 3] {
    let leader_offset = end_of_leader - feature_location;
    let leg_size = arrow_size * 2.0;
    let d0 = dir_ortho.project(leader_offset).magnitude() - 2.0 * leg_size;

    let start0 = feature_location + dir_ortho * extension_offset;
    let end0 = feature_location + dir_ortho * leg_size.max(d0);
    let start1 = end_of_leader - dir_ortho * leg_size;
    let end1 = end_of_leader + dir_ortho * trailing_extension;
    [
        LineSegment {
            start: start0,
            end: end0,
        },
        LineSegment {
            start: end0,
            end: start1,
        },
        LineSegment {
            start: start1,
            end: end1,
        },
    ]
}

/// 坐标标注渲染器，在生命周期内独占借用所属 DIMENSION 记录。
#[derive(Debug)]
pub struct OrdinateDimension<'a> {
    dimension: &'a mut Dimension,
    context: DimensionContext,
    pub origin: Point2,
    pub feature_location: Point2,
    pub end_of_leader: Point2,
    pub leader_offset: Vector2,
    pub axis: OrdinateAxis,
    pub frame: DirectionFrame,
    placed: PlacedText,
    text_box: TextBox,
    transformed: bool,
}

impl<'a> OrdinateDimension<'a> {
    /// 完成测量与文字布局，并把文字中点写回记录。缺少定义点时不做任何修改。
    pub fn new(
        dimension: &'a mut Dimension,
        ucs: Option<Ucs>,
        style: &DimStyle,
        dxf_version: DxfVersion,
    ) -> Result<Self, DimensionError> {
        let origin = required_defpoint(dimension.defpoint, "defpoint")?;
        let feature_location = required_defpoint(dimension.defpoint2, "defpoint2")?;
        let end_of_leader = required_defpoint(dimension.defpoint3, "defpoint3")?;
        let leader_offset = end_of_leader - feature_location;
        let axis = OrdinateAxis::of(dimension);

        let mut context = DimensionContext::new(dimension, ucs, style, dxf_version)?;
        let frame = DirectionFrame::resolve(axis, leader_offset);

        context
            .measurement
            .update(axis.measure(feature_location - origin));
        if context.tol.has_limits() {
            let value = context.measurement.value;
            context.tol.update_limits(value);
        }

        let size = TextBoxSize::measure(&context.measurement, &context.tol);
        let placed = place_text(
            axis,
            frame,
            end_of_leader,
            size,
            context.measurement.text_vertical_distance(),
            dimension.text_rotation,
        );
        let text_box = TextBox::new(size, placed);
        context.geometry.set_text_box(text_box);

        dimension.text_midpoint = Some(placed.location.with_z(0.0));
        debug!(
            ?axis,
            value = context.measurement.value,
            text = %context.measurement.text,
            x = placed.location.x(),
            y = placed.location.y(),
            rotation = placed.rotation,
            "坐标标注布局完成"
        );

        Ok(Self {
            dimension,
            context,
            origin,
            feature_location,
            end_of_leader,
            leader_offset,
            axis,
            frame,
            placed,
            text_box,
            transformed: false,
        })
    }

    #[inline]
    pub fn measurement_value(&self) -> f64 {
        self.context.measurement.value
    }

    #[inline]
    pub fn measurement_text(&self) -> &str {
        &self.context.measurement.text
    }

    #[inline]
    pub fn text_box(&self) -> &TextBox {
        &self.text_box
    }

    #[inline]
    pub fn dimension(&self) -> &Dimension {
        self.dimension
    }

    pub fn extension_line_segments(&self) -> [LineSegment; 3] {
        let trailing = if self.context.measurement.vertical_placement.is_centered() {
            0.0
        } else {
            self.text_box.width
        };
        extension_line_segments(
            self.feature_location,
            self.end_of_leader,
            self.frame.dir_ortho,
            self.context.arrows.arrow_size,
            self.context.extension_lines.offset,
            trailing,
        )
    }
}

impl DimensionRenderer for OrdinateDimension<'_> {
    fn context(&self) -> &DimensionContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut DimensionContext {
        &mut self.context
    }

    fn add_extension_line<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<(), DimensionError> {
        let geometry = &self.context.geometry;
        let attribs = self.context.extension_lines.dxfattribs();
        for segment in self.extension_line_segments() {
            geometry.add_line(sink, segment.start, segment.end, attribs)?;
        }
        Ok(())
    }

    fn placed_text(&self) -> PlacedText {
        self.placed
    }

    fn defpoints(&self) -> Vec<Point2> {
        vec![self.origin, self.feature_location, self.end_of_leader]
    }

    fn transform_ucs_to_wcs(&mut self) -> Result<(), DimensionError> {
        if self.transformed {
            debug!("定义点已转换到 WCS，忽略重复调用");
            return Ok(());
        }
        let ucs = *self.context.geometry.ucs();
        let record = &mut *self.dimension;
        for slot in [
            &mut record.defpoint,
            &mut record.defpoint2,
            &mut record.defpoint3,
        ] {
            *slot = Some(ucs.to_wcs(slot.unwrap_or(Point3::ORIGIN)));
        }
        record.text_midpoint = Some(ucs.to_ocs(record.text_midpoint.unwrap_or(Point3::ORIGIN)));
        if let Some(extrusion) = self.context.geometry.extrusion() {
            record.extrusion = extrusion;
        }
        self.transformed = true;
        Ok(())
    }
}
