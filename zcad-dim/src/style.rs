//! 尺寸样式覆盖值，渲染器只读取这些变量。

use zcad_config::DimStyleConfig;

/// 文字相对尺寸线（坐标标注中为引线）的垂直位置，对应 `dimtad`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPlacement {
    #[default]
    Center,
    Above,
    Outside,
    Jis,
    Below,
}

impl VerticalPlacement {
    /// 未知取值按居中处理。
    pub fn from_dimtad(value: i16) -> Self {
        match value {
            1 => VerticalPlacement::Above,
            2 => VerticalPlacement::Outside,
            3 => VerticalPlacement::Jis,
            4 => VerticalPlacement::Below,
            _ => VerticalPlacement::Center,
        }
    }

    /// 文字垂直对齐方向：上方为 1，下方为 -1，居中为 0。
    pub fn valign(self) -> f64 {
        match self {
            VerticalPlacement::Center => 0.0,
            VerticalPlacement::Above | VerticalPlacement::Outside | VerticalPlacement::Jis => 1.0,
            VerticalPlacement::Below => -1.0,
        }
    }

    #[inline]
    pub fn is_centered(self) -> bool {
        self == VerticalPlacement::Center
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    pub dimscale: f64,
    pub dimasz: f64,
    pub dimexo: f64,
    pub dimgap: f64,
    pub dimtxt: f64,
    pub dimtad: VerticalPlacement,
    pub dimtvp: f64,
    pub dimdec: usize,
    pub dimrnd: f64,
    pub dimzin: i16,
    pub dimdsep: char,
    pub dimpost: String,
    pub dimlfac: f64,
    pub dimtol: bool,
    pub dimlim: bool,
    pub dimtp: f64,
    pub dimtm: f64,
    pub dimtfac: f64,
    pub dimtdec: usize,
    pub dimtzin: i16,
    pub dimclrt: i16,
    pub dimclre: i16,
    pub dimltex1: Option<String>,
    pub dimlwe: i16,
    pub dimtxsty: String,
    pub width_factor: f64,
}

impl DimStyle {
    /// 全局比例为 0 或负值时按 1 处理。
    #[inline]
    pub fn scale(&self) -> f64 {
        if self.dimscale > 0.0 { self.dimscale } else { 1.0 }
    }
}

impl Default for DimStyle {
    fn default() -> Self {
        Self::from(&DimStyleConfig::default())
    }
}

impl From<&DimStyleConfig> for DimStyle {
    fn from(config: &DimStyleConfig) -> Self {
        Self {
            dimscale: config.dimscale,
            dimasz: config.dimasz,
            dimexo: config.dimexo,
            dimgap: config.dimgap,
            dimtxt: config.dimtxt,
            dimtad: VerticalPlacement::from_dimtad(config.dimtad),
            dimtvp: config.dimtvp,
            dimdec: config.dimdec,
            dimrnd: config.dimrnd,
            dimzin: config.dimzin,
            dimdsep: config.dimdsep,
            dimpost: config.dimpost.clone(),
            dimlfac: config.dimlfac,
            dimtol: config.dimtol,
            dimlim: config.dimlim,
            dimtp: config.dimtp,
            dimtm: config.dimtm,
            dimtfac: config.dimtfac,
            dimtdec: config.dimtdec,
            dimtzin: config.dimtzin,
            dimclrt: config.dimclrt,
            dimclre: config.dimclre,
            dimltex1: config.dimltex1.clone(),
            dimlwe: config.dimlwe,
            dimtxsty: config.dimtxsty.clone(),
            width_factor: config.width_factor,
        }
    }
}
