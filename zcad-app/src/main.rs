use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zcad_config::{AppConfig, ConfigError};
use zcad_core::coords::Ucs;
use zcad_core::document::{BlockDefinition, Dimension, Document, DxfVersion, Entity};
use zcad_core::geometry::{Point2, Point3};
use zcad_dim::{DimStyle, DimensionError, RenderedDimension, render_dimension};

/// 计算坐标标注布局并输出生成的尺寸几何块。
#[derive(Parser, Debug)]
#[command(name = "zcad-app", version, about)]
struct Args {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 坐标原点 `X,Y`（UCS）
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, default_value = "0,0")]
    origin: Point2,

    /// 特征点 `X,Y`（UCS）
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    feature: Point2,

    /// 引线终点 `X,Y`（UCS）
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    leader: Point2,

    /// 测量的坐标分量
    #[arg(long, value_enum, default_value_t = Axis::X)]
    axis: Axis,

    /// 文字旋转角（度），缺省时 X 类型为 90、Y 类型为 0
    #[arg(long, allow_hyphen_values = true)]
    text_rotation: Option<f64>,

    /// UCS 绕世界 Z 轴的旋转角（度）
    #[arg(long, allow_hyphen_values = true)]
    ucs_rotation: Option<f64>,

    /// 用户文字，`<>` 代表测量值，单个空格隐藏文字
    #[arg(long, allow_hyphen_values = true)]
    text: Option<String>,

    /// 以 JSON 输出
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Axis {
    X,
    Y,
}

#[derive(Serialize)]
struct Report<'a> {
    dimension: &'a RenderedDimension,
    record: &'a Dimension,
    block: &'a BlockDefinition,
}

fn main() {
    let args = Args::parse();
    let config = load_configuration(args.config.clone());
    init_logging(&config);
    info!("启动 ZCAD 坐标标注");

    if let Err(err) = run(&args, &config) {
        error!(error = %err, "坐标标注渲染失败");
        eprintln!("错误：{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<(), DimensionError> {
    let version = DxfVersion::from_name(&config.render.dxf_version).unwrap_or_else(|| {
        warn!(version = %config.render.dxf_version, "未知的 DXF 版本，使用 R2000");
        DxfVersion::R2000
    });
    let style = DimStyle::from(&config.dimstyle);
    let ucs = args
        .ucs_rotation
        .map(|angle| Ucs::from_z_rotation(Point3::ORIGIN, angle));

    let mut record = Dimension::ordinate(
        args.origin.into(),
        args.feature.into(),
        args.leader.into(),
        args.axis == Axis::X,
        config.render.layer.clone(),
    );
    record.text = args.text.clone();
    record.text_rotation = args.text_rotation;

    let mut document = Document::with_version(version);
    let id = document.add_dimension(record);
    let rendered = render_dimension(&mut document, id, ucs, &style)?;

    let block = document
        .block(&rendered.block_name)
        .ok_or_else(|| DimensionError::Sink(format!("块 {} 未写入文档", rendered.block_name)))?;
    let record = document
        .dimension(id)
        .ok_or(DimensionError::EntityNotFound(id.get()))?;

    if args.json {
        let report = Report {
            dimension: &rendered,
            record,
            block,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => return Err(DimensionError::Sink(err.to_string())),
        }
    } else {
        print_block(&rendered, block);
    }
    Ok(())
}

fn print_block(rendered: &RenderedDimension, block: &BlockDefinition) {
    println!("尺寸块 {}", rendered.block_name);
    println!("测量值 {} ({})", rendered.text, rendered.value);
    println!(
        "文字位置 ({:.3}, {:.3}) 旋转 {}°",
        rendered.text_location.x(),
        rendered.text_location.y(),
        rendered.text_rotation
    );
    if let Some(bounds) = block.bounds() {
        println!(
            "范围 ({:.3}, {:.3}) - ({:.3}, {:.3}) 宽 {:.3} 高 {:.3}",
            bounds.min().x(),
            bounds.min().y(),
            bounds.max().x(),
            bounds.max().y(),
            bounds.width(),
            bounds.height()
        );
    }
    println!("图元 {} 个:", block.entities.len());
    for entity in &block.entities {
        println!("  {}", describe(entity));
    }
}

fn describe(entity: &Entity) -> String {
    match entity {
        Entity::Line(line) => format!(
            "LINE ({:.3}, {:.3}) -> ({:.3}, {:.3}) [{}]",
            line.start.x(),
            line.start.y(),
            line.end.x(),
            line.end.y(),
            line.attribs.layer
        ),
        Entity::Text(text) => format!(
            "TEXT \"{}\" @ ({:.3}, {:.3}) [{}]",
            text.content,
            text.insert.x(),
            text.insert.y(),
            text.attribs.layer
        ),
        Entity::MText(mtext) => format!(
            "MTEXT \"{}\" @ ({:.3}, {:.3}) [{}]",
            mtext.content,
            mtext.insert.x(),
            mtext.insert.y(),
            mtext.attribs.layer
        ),
        Entity::Point(point) => format!(
            "POINT ({:.3}, {:.3}) [{}]",
            point.location.x(),
            point.location.y(),
            point.attribs.layer
        ),
        Entity::Dimension(dimension) => format!("DIMENSION [{}]", dimension.layer),
    }
}

fn parse_point(value: &str) -> Result<Point2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("坐标格式应为 X,Y：{value}"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("无效的 X 坐标 {x}: {err}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("无效的 Y 坐标 {y}: {err}"))?;
    Ok(Point2::new(x, y))
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_with_whitespace_and_sign() {
        assert_eq!(parse_point("10, -2.5"), Ok(Point2::new(10.0, -2.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
    }
}
