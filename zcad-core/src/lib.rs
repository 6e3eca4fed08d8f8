pub mod geometry {
    use std::ops::{Add, Mul, Neg, Sub};

    use glam::{DVec2, DVec3};
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示，确保与双精度 DXF 坐标兼容。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        pub const ORIGIN: Point2 = Point2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        /// 提升为三维点，Z 取给定高程。
        #[inline]
        pub fn with_z(self, z: f64) -> Point3 {
            Point3::new(self.0.x, self.0.y, z)
        }

        #[inline]
        pub fn distance(self, other: Point2) -> f64 {
            self.0.distance(other.0)
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    impl Add<Vector2> for Point2 {
        type Output = Point2;

        #[inline]
        fn add(self, rhs: Vector2) -> Point2 {
            self.translate(rhs)
        }
    }

    impl Sub<Vector2> for Point2 {
        type Output = Point2;

        #[inline]
        fn sub(self, rhs: Vector2) -> Point2 {
            Point2(self.0 - rhs.0)
        }
    }

    impl Sub for Point2 {
        type Output = Vector2;

        /// `a - b` 得到由 `b` 指向 `a` 的向量。
        #[inline]
        fn sub(self, rhs: Point2) -> Vector2 {
            Vector2(self.0 - rhs.0)
        }
    }

    /// 二维向量。提供尺寸标注布局所需的基础运算。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        pub const ZERO: Vector2 = Vector2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn magnitude(self) -> f64 {
            self.0.length()
        }

        #[inline]
        pub fn dot(self, other: Vector2) -> f64 {
            self.0.dot(other.0)
        }

        /// 单位化；零向量返回 None。
        #[inline]
        pub fn normalize(self) -> Option<Self> {
            let len = self.0.length();
            if len <= f64::EPSILON {
                None
            } else {
                Some(Self(self.0 / len))
            }
        }

        /// 将 `other` 投影到自身方向上。自身为零向量时结果为零向量。
        pub fn project(self, other: Vector2) -> Vector2 {
            match self.normalize() {
                Some(unit) => unit * unit.dot(other),
                None => Vector2::ZERO,
            }
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        /// 以度为单位的方向角。
        #[inline]
        pub fn from_angle_deg(angle: f64) -> Self {
            let rad = angle.to_radians();
            Self::new(rad.cos(), rad.sin())
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    impl Add for Vector2 {
        type Output = Vector2;

        #[inline]
        fn add(self, rhs: Vector2) -> Vector2 {
            Vector2(self.0 + rhs.0)
        }
    }

    impl Sub for Vector2 {
        type Output = Vector2;

        #[inline]
        fn sub(self, rhs: Vector2) -> Vector2 {
            Vector2(self.0 - rhs.0)
        }
    }

    impl Mul<f64> for Vector2 {
        type Output = Vector2;

        #[inline]
        fn mul(self, rhs: f64) -> Vector2 {
            Vector2(self.0 * rhs)
        }
    }

    impl Neg for Vector2 {
        type Output = Vector2;

        #[inline]
        fn neg(self) -> Vector2 {
            Vector2(-self.0)
        }
    }

    /// 三维点，DIMENSION 定义点以三维形式保存。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        pub const ORIGIN: Point3 = Point3(DVec3::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }

        /// 丢弃 Z 分量，得到平面坐标。
        #[inline]
        pub fn to_2d(self) -> Point2 {
            Point2::new(self.0.x, self.0.y)
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    impl From<Point2> for Point3 {
        fn from(value: Point2) -> Self {
            value.with_z(0.0)
        }
    }

    /// 三维向量，用于坐标系轴向与拉伸方向。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector3(pub DVec3);

    impl Vector3 {
        pub const X_AXIS: Vector3 = Vector3(DVec3::X);
        pub const Z_AXIS: Vector3 = Vector3(DVec3::Z);

        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }

        #[inline]
        pub fn normalize(self) -> Option<Self> {
            let len = self.0.length();
            if len <= f64::EPSILON {
                None
            } else {
                Some(Self(self.0 / len))
            }
        }

        #[inline]
        pub fn cross(self, other: Vector3) -> Vector3 {
            Self(self.0.cross(other.0))
        }

        #[inline]
        pub fn is_close(self, other: Vector3, abs_tol: f64) -> bool {
            self.0.abs_diff_eq(other.0, abs_tol)
        }
    }

    impl From<DVec3> for Vector3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    /// 轴对齐边界框，用于估算块/实体范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.max.x() - self.min.x()
        }

        #[inline]
        pub fn height(&self) -> f64 {
            self.max.y() - self.min.y()
        }
    }

}

pub mod coords {
    //! 用户坐标系（UCS）与对象坐标系（OCS）。
    //!
    //! UCS 将用户输入的局部坐标映射到世界坐标（WCS）；OCS 描述实体所在平面，
    //! 由拉伸方向按 DXF 任意轴算法确定。

    use glam::DVec3;

    use crate::geometry::{Point3, Vector3};

    /// 任意轴算法阈值：拉伸方向 X/Y 分量均小于 1/64 时视为接近世界 Z 轴。
    const ARBITRARY_AXIS_LIMIT: f64 = 1.0 / 64.0;

    /// 对象坐标系。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Ocs {
        ux: DVec3,
        uy: DVec3,
        uz: DVec3,
        passthrough: bool,
    }

    impl Ocs {
        /// 由拉伸方向构建 OCS；零向量退化为世界坐标。
        pub fn new(extrusion: Vector3) -> Self {
            let Some(uz) = extrusion.normalize() else {
                return Self::default();
            };
            let uz = uz.as_vec3();
            if uz.abs_diff_eq(DVec3::Z, 1e-12) {
                return Self::default();
            }
            let ux = if uz.x.abs() < ARBITRARY_AXIS_LIMIT && uz.y.abs() < ARBITRARY_AXIS_LIMIT {
                DVec3::Y.cross(uz)
            } else {
                DVec3::Z.cross(uz)
            }
            .normalize();
            let uy = uz.cross(ux).normalize();
            Self {
                ux,
                uy,
                uz,
                passthrough: false,
            }
        }

        pub fn from_wcs(&self, point: Point3) -> Point3 {
            if self.passthrough {
                return point;
            }
            let p = point.as_vec3();
            Point3::new(p.dot(self.ux), p.dot(self.uy), p.dot(self.uz))
        }

    }

    impl Default for Ocs {
        fn default() -> Self {
            Self {
                ux: DVec3::X,
                uy: DVec3::Y,
                uz: DVec3::Z,
                passthrough: true,
            }
        }
    }

    /// 用户坐标系：原点加三根正交单位轴。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Ucs {
        origin: DVec3,
        ux: DVec3,
        uy: DVec3,
        uz: DVec3,
    }

    impl Ucs {
        /// 由原点、X 轴与 XY 平面内的另一方向构建；两者共线时返回 None。
        pub fn new(origin: Point3, ux: Vector3, uy: Vector3) -> Option<Self> {
            let ux = ux.normalize()?;
            let uz = ux.cross(uy).normalize()?;
            let uy = uz.cross(ux);
            Some(Self {
                origin: origin.as_vec3(),
                ux: ux.as_vec3(),
                uy: uy.as_vec3(),
                uz: uz.as_vec3(),
            })
        }

        /// 绕世界 Z 轴旋转 `angle` 度的 UCS。
        pub fn from_z_rotation(origin: Point3, angle: f64) -> Self {
            let rad = angle.to_radians();
            let (sin, cos) = rad.sin_cos();
            Self {
                origin: origin.as_vec3(),
                ux: DVec3::new(cos, sin, 0.0),
                uy: DVec3::new(-sin, cos, 0.0),
                uz: DVec3::Z,
            }
        }

        /// 原点与三个轴向均为有限值。
        pub fn is_finite(&self) -> bool {
            [self.origin, self.ux, self.uy, self.uz]
                .iter()
                .all(|v| v.is_finite())
        }

        #[inline]
        pub fn uz(&self) -> Vector3 {
            Vector3::from(self.uz)
        }

        pub fn to_wcs(&self, point: Point3) -> Point3 {
            let p = point.as_vec3();
            Point3::from(self.origin + self.ux * p.x + self.uy * p.y + self.uz * p.z)
        }

        /// UCS 点 → 以 UCS Z 轴为拉伸方向的 OCS 坐标。
        pub fn to_ocs(&self, point: Point3) -> Point3 {
            Ocs::new(self.uz()).from_wcs(self.to_wcs(point))
        }

        /// UCS XY 平面内的角度（度，自 UCS X 轴起算）→ OCS 中的角度，范围 `[0, 360)`。
        pub fn to_ocs_angle_deg(&self, angle: f64) -> f64 {
            let (sin, cos) = angle.to_radians().sin_cos();
            let direction = Ocs::new(self.uz()).from_wcs(Point3::from(self.ux * cos + self.uy * sin));
            direction.y().atan2(direction.x()).to_degrees().rem_euclid(360.0)
        }
    }

    impl Default for Ucs {
        fn default() -> Self {
            Self {
                origin: DVec3::ZERO,
                ux: DVec3::X,
                uy: DVec3::Y,
                uz: DVec3::Z,
            }
        }
    }

}

pub mod document {
    use std::collections::HashMap;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2, Point3, Vector2, Vector3};

    /// DIMENSION 组码 70：坐标标注为 X 类型的标志位。
    pub const DIM_ORDINATE_TYPE: i16 = 64;
    /// DIMENSION 组码 70：块仅被此尺寸引用。
    pub const DIM_BLOCK_EXCLUSIVE: i16 = 32;
    /// DIMENSION 组码 70 低位：尺寸类型掩码。
    pub const DIM_KIND_MASK: i16 = 0x0F;

    /// 定义点统一放置的图层。
    pub const DEFPOINTS_LAYER: &str = "DEFPOINTS";

    /// 颜色索引：随层。
    pub const BYLAYER: i16 = 256;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EntityId(u64);

    impl EntityId {
        #[inline]
        pub fn new(raw: u64) -> Self {
            Self(raw)
        }

        /// 提供原始数值，便于序列化或日志输出。
        #[inline]
        pub fn get(self) -> u64 {
            self.0
        }
    }

    /// 目标 DXF 版本，决定是否支持 MTEXT 等富文本。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum DxfVersion {
        R12,
        R2000,
        R2004,
        R2007,
        R2010,
        R2013,
        R2018,
    }

    impl DxfVersion {
        /// 接受 `R2000` 形式的名称或 `AC1015` 形式的版本号，大小写不敏感。
        pub fn from_name(name: &str) -> Option<Self> {
            let upper = name.trim().to_ascii_uppercase();
            let version = match upper.as_str() {
                "R12" | "AC1009" => DxfVersion::R12,
                "R2000" | "AC1015" => DxfVersion::R2000,
                "R2004" | "AC1018" => DxfVersion::R2004,
                "R2007" | "AC1021" => DxfVersion::R2007,
                "R2010" | "AC1024" => DxfVersion::R2010,
                "R2013" | "AC1027" => DxfVersion::R2013,
                "R2018" | "AC1032" => DxfVersion::R2018,
                _ => return None,
            };
            Some(version)
        }

        #[inline]
        pub fn supports_mtext(self) -> bool {
            self >= DxfVersion::R2000
        }
    }

    impl Default for DxfVersion {
        fn default() -> Self {
            DxfVersion::R2000
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Layer {
        pub name: String,
        pub is_visible: bool,
    }

    impl Layer {
        #[inline]
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                is_visible: true,
            }
        }
    }

    /// 图元通用外观属性：图层、颜色、线型与线宽。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GraphicAttributes {
        pub layer: String,
        pub color: i16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub linetype: Option<String>,
        pub lineweight: i16,
        /// 实体所在平面的拉伸方向；缺省为世界 Z 轴。
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub extrusion: Option<Vector3>,
    }

    impl GraphicAttributes {
        pub fn on_layer(layer: impl Into<String>) -> Self {
            Self {
                layer: layer.into(),
                color: BYLAYER,
                linetype: None,
                lineweight: -1,
                extrusion: None,
            }
        }
    }

    impl Default for GraphicAttributes {
        fn default() -> Self {
            Self::on_layer("0")
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum Entity {
        Line(Line),
        Text(Text),
        MText(MText),
        Point(PointEntity),
        Dimension(Dimension),
    }

    impl Entity {
        #[inline]
        pub fn layer_name(&self) -> &str {
            match self {
                Entity::Line(line) => &line.attribs.layer,
                Entity::Text(text) => &text.attribs.layer,
                Entity::MText(mtext) => &mtext.attribs.layer,
                Entity::Point(point) => &point.attribs.layer,
                Entity::Dimension(dimension) => &dimension.layer,
            }
        }

        /// 计算实体的 2D 轴对齐范围，文本退化为插入点。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            match self {
                Entity::Line(line) => {
                    bounds.include_point(line.start);
                    bounds.include_point(line.end);
                }
                Entity::Text(text) => {
                    bounds.include_point(text.insert);
                }
                Entity::MText(mtext) => {
                    bounds.include_point(mtext.insert);
                }
                Entity::Point(point) => {
                    bounds.include_point(point.location);
                }
                Entity::Dimension(dimension) => {
                    let points = [
                        dimension.defpoint,
                        dimension.defpoint2,
                        dimension.defpoint3,
                        dimension.text_midpoint,
                    ];
                    for point in points.into_iter().flatten() {
                        bounds.include_point(point.to_2d());
                    }
                }
            }
            if bounds.is_empty() {
                None
            } else {
                Some(bounds)
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Line {
        pub start: Point2,
        pub end: Point2,
        pub attribs: GraphicAttributes,
    }

    /// 单行文字，旋转角以弧度储存，插入点为中心对齐点。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Text {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub rotation: f64,
        pub width_factor: f64,
        pub style: Option<String>,
        pub attribs: GraphicAttributes,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MText {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub direction: Vector2,
        pub attachment_point: i16,
        pub style: Option<String>,
        pub attribs: GraphicAttributes,
    }

    /// POINT 实体，尺寸标注中用于输出定义点。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PointEntity {
        pub location: Point2,
        pub attribs: GraphicAttributes,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum DimensionKind {
        Linear,
        Aligned,
        Angular,
        Diameter,
        Radius,
        Angular3Point,
        Ordinate,
        Unknown(i16),
    }

    impl DimensionKind {
        pub fn from_dimtype(flags: i16) -> Self {
            match flags & DIM_KIND_MASK {
                0 => DimensionKind::Linear,
                1 => DimensionKind::Aligned,
                2 => DimensionKind::Angular,
                3 => DimensionKind::Diameter,
                4 => DimensionKind::Radius,
                5 => DimensionKind::Angular3Point,
                6 => DimensionKind::Ordinate,
                other => DimensionKind::Unknown(other),
            }
        }
    }

    /// DIMENSION 记录。定义点在构建布局前位于 UCS 中，渲染流程会将其转换到 WCS；
    /// 文本中点则转换到实体所在平面（OCS）。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Dimension {
        /// 组码 70 原始值，低位为类型，64 表示 X 类型坐标标注。
        pub dimtype: i16,
        /// 组码 10，坐标标注中为原点。
        pub defpoint: Option<Point3>,
        /// 组码 13，坐标标注中为特征点。
        pub defpoint2: Option<Point3>,
        /// 组码 14，坐标标注中为引线终点。
        pub defpoint3: Option<Point3>,
        /// 组码 11。
        pub text_midpoint: Option<Point3>,
        /// 组码 1：用户文字；`" "` 表示隐藏，`"<>"` 表示测量值。
        pub text: Option<String>,
        /// 组码 53，单位：度。
        pub text_rotation: Option<f64>,
        pub extrusion: Vector3,
        /// 组码 2：存放尺寸几何的匿名块名。
        pub geometry: Option<String>,
        pub dimstyle: String,
        pub layer: String,
        pub color: i16,
    }

    impl Dimension {
        /// 新建坐标标注记录；`x_type` 为真时测量 X 分量。
        pub fn ordinate(
            origin: Point3,
            feature_location: Point3,
            end_of_leader: Point3,
            x_type: bool,
            layer: impl Into<String>,
        ) -> Self {
            let mut dimtype = 6 | DIM_BLOCK_EXCLUSIVE;
            if x_type {
                dimtype |= DIM_ORDINATE_TYPE;
            }
            Self {
                dimtype,
                defpoint: Some(origin),
                defpoint2: Some(feature_location),
                defpoint3: Some(end_of_leader),
                text_midpoint: None,
                text: None,
                text_rotation: None,
                extrusion: Vector3::Z_AXIS,
                geometry: None,
                dimstyle: "Standard".to_string(),
                layer: layer.into(),
                color: BYLAYER,
            }
        }

        #[inline]
        pub fn kind(&self) -> DimensionKind {
            DimensionKind::from_dimtype(self.dimtype)
        }

        #[inline]
        pub fn is_ordinate_x_type(&self) -> bool {
            self.dimtype & DIM_ORDINATE_TYPE != 0
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BlockDefinition {
        pub name: String,
        pub base_point: Point2,
        pub entities: Vec<Entity>,
    }

    impl BlockDefinition {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                base_point: Point2::ORIGIN,
                entities: Vec::new(),
            }
        }

        #[inline]
        pub fn add_entity(&mut self, entity: Entity) {
            self.entities.push(entity);
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            let mut has = false;
            for entity in &self.entities {
                if let Some(entity_bounds) = entity.bounds() {
                    bounds.include_bounds(&entity_bounds);
                    has = true;
                }
            }
            if has { Some(bounds) } else { None }
        }
    }

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    pub struct Document {
        dxf_version: DxfVersion,
        layers: HashMap<String, Layer>,
        entities: Vec<(EntityId, Entity)>,
        next_entity_id: u64,
        blocks: HashMap<String, BlockDefinition>,
        next_anonymous_block: u32,
    }

    impl Document {
        pub fn new() -> Self {
            let mut doc = Self::default();
            doc.ensure_layer("0");
            doc
        }

        pub fn with_version(dxf_version: DxfVersion) -> Self {
            let mut doc = Self::new();
            doc.dxf_version = dxf_version;
            doc
        }

        #[inline]
        pub fn dxf_version(&self) -> DxfVersion {
            self.dxf_version
        }

        pub fn ensure_layer(&mut self, name: impl AsRef<str>) {
            let key = name.as_ref();
            self.layers
                .entry(key.to_string())
                .or_insert_with(|| Layer::new(key));
        }

        pub fn add_dimension(&mut self, dimension: Dimension) -> EntityId {
            self.push_entity(Entity::Dimension(dimension))
        }

        fn push_entity(&mut self, entity: Entity) -> EntityId {
            self.ensure_layer(entity.layer_name());
            let id = self.next_id();
            self.entities.push((id, entity));
            id
        }

        #[inline]
        pub fn layers(&self) -> impl Iterator<Item = &Layer> {
            self.layers.values()
        }

        #[inline]
        pub fn entities(&self) -> impl Iterator<Item = &(EntityId, Entity)> {
            self.entities.iter()
        }

        #[inline]
        pub fn entity(&self, id: EntityId) -> Option<&Entity> {
            self.entities
                .iter()
                .find_map(|(entity_id, entity)| (*entity_id == id).then_some(entity))
        }

        pub fn dimension(&self, id: EntityId) -> Option<&Dimension> {
            match self.entity(id) {
                Some(Entity::Dimension(dimension)) => Some(dimension),
                _ => None,
            }
        }

        pub fn dimension_mut(&mut self, id: EntityId) -> Option<&mut Dimension> {
            self.entities.iter_mut().find_map(|(entity_id, entity)| match entity {
                Entity::Dimension(dimension) if *entity_id == id => Some(dimension),
                _ => None,
            })
        }

        /// 生成下一个匿名块名，例如 `*D1`。
        pub fn next_anonymous_block_name(&mut self, type_char: char) -> String {
            self.next_anonymous_block += 1;
            format!("*{type_char}{}", self.next_anonymous_block)
        }

        /// 注册块定义，同时补齐块内实体引用的图层。
        pub fn add_block_definition(&mut self, definition: BlockDefinition) {
            for entity in &definition.entities {
                self.ensure_layer(entity.layer_name());
            }
            self.blocks.insert(definition.name.clone(), definition);
        }

        #[inline]
        pub fn block(&self, name: &str) -> Option<&BlockDefinition> {
            self.blocks.get(name)
        }

        #[inline]
        pub fn blocks(&self) -> impl Iterator<Item = &BlockDefinition> {
            self.blocks.values()
        }

        #[inline]
        fn next_id(&mut self) -> EntityId {
            let id = self.next_entity_id;
            self.next_entity_id += 1;
            EntityId(id)
        }
    }

}
