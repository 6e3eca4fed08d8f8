use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dimstyle: DimStyleConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `ZCAD_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("ZCAD_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 尺寸样式变量，字段名沿用 DXF 系统变量名。缺省值取自 ISO-25 样式，
/// 但文字默认居中（`dimtad = 0`）。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DimStyleConfig {
    /// 全局比例。
    pub dimscale: f64,
    /// 箭头大小。
    pub dimasz: f64,
    /// 尺寸界线相对特征点的偏移。
    pub dimexo: f64,
    /// 文字与尺寸线的间隙。
    pub dimgap: f64,
    /// 文字高度。
    pub dimtxt: f64,
    /// 文字垂直位置：0 居中、1 上方、2 外侧、3 JIS、4 下方。
    pub dimtad: i16,
    /// 居中时文字的垂直偏移（以字高为单位）。
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
    /// 文字样式宽度因子。
    pub width_factor: f64,
}

impl Default for DimStyleConfig {
    fn default() -> Self {
        Self {
            dimscale: 1.0,
            dimasz: 2.5,
            dimexo: 0.625,
            dimgap: 0.625,
            dimtxt: 2.5,
            dimtad: 0,
            dimtvp: 0.0,
            dimdec: 2,
            dimrnd: 0.0,
            dimzin: 0,
            dimdsep: '.',
            dimpost: String::new(),
            dimlfac: 1.0,
            dimtol: false,
            dimlim: false,
            dimtp: 0.0,
            dimtm: 0.0,
            dimtfac: 1.0,
            dimtdec: 2,
            dimtzin: 0,
            dimclrt: 0,
            dimclre: 0,
            dimltex1: None,
            dimlwe: -2,
            dimtxsty: "Standard".to_string(),
            width_factor: 1.0,
        }
    }
}

/// 渲染目标设置。
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// 目标 DXF 版本名，例如 `R12`、`R2000`。
    #[serde(default = "RenderConfig::default_dxf_version")]
    pub dxf_version: String,
    /// 默认尺寸图层。
    #[serde(default = "RenderConfig::default_layer")]
    pub layer: String,
}

impl RenderConfig {
    fn default_dxf_version() -> String {
        "R2000".to_string()
    }

    fn default_layer() -> String {
        "DIMENSIONS".to_string()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dxf_version: Self::default_dxf_version(),
            layer: Self::default_layer(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
