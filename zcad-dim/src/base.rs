//! 各类尺寸渲染器共享的协作者与渲染流程。

use tracing::debug;
use zcad_core::coords::Ucs;
use zcad_core::document::{DEFPOINTS_LAYER, Dimension, DxfVersion, GraphicAttributes};
use zcad_core::geometry::{Point2, Vector3};

use crate::errors::DimensionError;
use crate::measurement::Measurement;
use crate::sink::{GeometrySink, TextAttributes};
use crate::style::DimStyle;
use crate::text_box::{PlacedText, TextBox};
use crate::tolerance::Tolerance;

/// 箭头参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrows {
    pub arrow_size: f64,
}

impl Arrows {
    pub fn new(style: &DimStyle) -> Self {
        Self {
            arrow_size: style.dimasz * style.scale(),
        }
    }
}

/// 尺寸界线参数：起点偏移与统一的外观属性。
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionLines {
    pub offset: f64,
    attribs: GraphicAttributes,
}

impl ExtensionLines {
    pub fn new(style: &DimStyle, layer: &str) -> Self {
        Self {
            offset: style.dimexo * style.scale(),
            attribs: GraphicAttributes {
                layer: layer.to_string(),
                color: style.dimclre,
                linetype: style.dimltex1.clone(),
                lineweight: style.dimlwe,
                extrusion: None,
            },
        }
    }

    #[inline]
    pub fn dxfattribs(&self) -> &GraphicAttributes {
        &self.attribs
    }
}

/// 尺寸几何上下文：坐标系、目标版本能力与最终文字框。
///
/// 布局在 UCS 中进行；写入输出端的所有点与角度都经此转换到 UCS Z 轴确定的 OCS，
/// UCS Z 轴偏离世界 Z 轴时图元带上拉伸方向。
#[derive(Debug, Clone)]
pub struct DimensionGeometry {
    ucs: Ucs,
    dxf_version: DxfVersion,
    text_box: Option<TextBox>,
}

impl DimensionGeometry {
    pub fn new(ucs: Option<Ucs>, dxf_version: DxfVersion) -> Result<Self, DimensionError> {
        let ucs = ucs.unwrap_or_default();
        if !ucs.is_finite() {
            return Err(DimensionError::InvalidCoordinateSystem(
                "UCS 原点或轴向包含非有限值".to_string(),
            ));
        }
        Ok(Self {
            ucs,
            dxf_version,
            text_box: None,
        })
    }

    #[inline]
    pub fn ucs(&self) -> &Ucs {
        &self.ucs
    }

    #[inline]
    pub fn supports_rich_text(&self) -> bool {
        self.dxf_version.supports_mtext()
    }

    #[inline]
    pub fn requires_extrusion(&self) -> bool {
        !self.ucs.uz().is_close(Vector3::Z_AXIS, 1e-9)
    }

    /// 需要写入图元的拉伸方向；与世界 Z 轴一致时为 None。
    #[inline]
    pub fn extrusion(&self) -> Option<Vector3> {
        self.requires_extrusion().then(|| self.ucs.uz())
    }

    #[inline]
    pub fn to_ocs(&self, point: Point2) -> Point2 {
        self.ucs.to_ocs(point.with_z(0.0)).to_2d()
    }

    #[inline]
    pub fn to_ocs_angle_deg(&self, angle: f64) -> f64 {
        self.ucs.to_ocs_angle_deg(angle)
    }

    fn entity_attribs(&self, attribs: &GraphicAttributes) -> GraphicAttributes {
        GraphicAttributes {
            extrusion: self.extrusion(),
            ..attribs.clone()
        }
    }

    pub fn add_line<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
        start: Point2,
        end: Point2,
        attribs: &GraphicAttributes,
    ) -> Result<(), DimensionError> {
        sink.add_line(
            self.to_ocs(start),
            self.to_ocs(end),
            &self.entity_attribs(attribs),
        )
    }

    /// `rotation` 为 UCS 中的角度（度）。
    pub fn add_text<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
        content: &str,
        placed: PlacedText,
        attribs: &TextAttributes,
    ) -> Result<(), DimensionError> {
        let attribs = TextAttributes {
            graphic: self.entity_attribs(&attribs.graphic),
            ..attribs.clone()
        };
        sink.add_text(
            content,
            self.to_ocs(placed.location),
            self.to_ocs_angle_deg(placed.rotation),
            &attribs,
        )
    }

    /// 定义点写入 `DEFPOINTS` 图层。
    pub fn add_defpoints<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
        points: &[Point2],
    ) -> Result<(), DimensionError> {
        let points: Vec<Point2> = points.iter().map(|point| self.to_ocs(*point)).collect();
        sink.add_defpoints(
            &points,
            &self.entity_attribs(&GraphicAttributes::on_layer(DEFPOINTS_LAYER)),
        )
    }

    pub fn set_text_box(&mut self, text_box: TextBox) {
        self.text_box = Some(text_box);
    }

    #[inline]
    pub fn text_box(&self) -> Option<&TextBox> {
        self.text_box.as_ref()
    }
}

/// 渲染器通过组合持有的共享协作者。
#[derive(Debug, Clone)]
pub struct DimensionContext {
    pub geometry: DimensionGeometry,
    pub measurement: Measurement,
    pub tol: Tolerance,
    pub arrows: Arrows,
    pub extension_lines: ExtensionLines,
    rendered: bool,
}

impl DimensionContext {
    pub fn new(
        dimension: &Dimension,
        ucs: Option<Ucs>,
        style: &DimStyle,
        dxf_version: DxfVersion,
    ) -> Result<Self, DimensionError> {
        let geometry = DimensionGeometry::new(ucs, dxf_version)?;
        let mut tol = Tolerance::new(style);
        if !geometry.supports_rich_text() && tol.enabled() {
            // 公差依赖 MTEXT 堆叠格式
            debug!(?dxf_version, "目标版本不支持 MTEXT，关闭公差输出");
            tol.disable();
        }
        Ok(Self {
            geometry,
            measurement: Measurement::new(style, dimension.text.as_deref(), &dimension.layer),
            tol,
            arrows: Arrows::new(style),
            extension_lines: ExtensionLines::new(style, &dimension.layer),
            rendered: false,
        })
    }

    /// 富文本目标输出带公差控制码的 MTEXT 内容，否则输出纯文字。
    pub fn compile_text(&self) -> String {
        if self.geometry.supports_rich_text() {
            self.tol.compile_mtext(&self.measurement.text)
        } else {
            self.measurement.text.clone()
        }
    }

    pub fn add_measurement_text<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
        text: &str,
        placed: PlacedText,
    ) -> Result<(), DimensionError> {
        let mut attribs = self.measurement.dxfattribs();
        attribs.rich = self.geometry.supports_rich_text();
        self.geometry.add_text(sink, text, placed, &attribs)
    }

    fn begin_render(&mut self) -> Result<(), DimensionError> {
        if self.rendered {
            return Err(DimensionError::AlreadyRendered);
        }
        self.rendered = true;
        Ok(())
    }
}

/// 尺寸渲染流程。具体渲染器提供几何钩子，`render` 按固定顺序调用：
/// 公共部分、尺寸界线、测量文字、定义点。
pub trait DimensionRenderer {
    fn context(&self) -> &DimensionContext;

    fn context_mut(&mut self) -> &mut DimensionContext;

    fn add_extension_line<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<(), DimensionError>;

    fn placed_text(&self) -> PlacedText;

    fn defpoints(&self) -> Vec<Point2>;

    /// 将所属 DIMENSION 记录中的定义点由 UCS 转换到 WCS，文字中点转换到 OCS。
    fn transform_ucs_to_wcs(&mut self) -> Result<(), DimensionError>;

    fn render_base<S: GeometrySink + ?Sized>(&mut self, _sink: &mut S) -> Result<(), DimensionError> {
        let context = self.context_mut();
        context.begin_render()?;
        if let Some(extrusion) = context.geometry.extrusion() {
            debug!(?extrusion, "尺寸几何写入 UCS 对应的 OCS");
        }
        Ok(())
    }

    fn add_measurement_text<S: GeometrySink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<(), DimensionError> {
        let context = self.context();
        if !context.measurement.has_text() {
            return Ok(());
        }
        let text = context.compile_text();
        context.add_measurement_text(sink, &text, self.placed_text())
    }

    fn render<S: GeometrySink + ?Sized>(&mut self, sink: &mut S) -> Result<(), DimensionError> {
        self.render_base(sink)?;
        self.add_extension_line(sink)?;
        self.add_measurement_text(sink)?;
        self.context().geometry.add_defpoints(sink, &self.defpoints())
    }
}
