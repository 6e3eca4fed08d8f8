//! 测量值与尺寸文字。

use zcad_core::document::GraphicAttributes;

use crate::sink::TextAttributes;
use crate::style::{DimStyle, VerticalPlacement};

/// `dimzin` 位：抑制前导零。
const SUPPRESS_LEADING_ZEROS: i16 = 4;
/// `dimzin` 位：抑制尾随零。
const SUPPRESS_TRAILING_ZEROS: i16 = 8;

/// 按 DXF 尺寸变量格式化数值：`dimrnd` 取整、`dimdec` 小数位、`dimzin` 零抑制、
/// `dimdsep` 小数分隔符。
pub fn format_text(value: f64, dimrnd: f64, dimdec: usize, dimzin: i16, dimdsep: char) -> String {
    let value = if dimrnd > 0.0 {
        (value / dimrnd).round() * dimrnd
    } else {
        value
    };
    let mut text = format!("{value:.dimdec$}");
    if text.starts_with('-') && text[1..].chars().all(|ch| ch == '0' || ch == '.') {
        text.remove(0);
    }
    if dimzin & SUPPRESS_LEADING_ZEROS != 0 {
        text = suppress_leading_zero(&text);
    }
    if dimzin & SUPPRESS_TRAILING_ZEROS != 0 && text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if dimdsep != '.' {
        text = text.replace('.', &dimdsep.to_string());
    }
    text
}

fn suppress_leading_zero(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    match digits.strip_prefix("0.") {
        Some(fraction) => format!("{sign}.{fraction}"),
        None => text.to_string(),
    }
}

/// 测量策略：保存测量值、生成文字并给出文字的垂直偏移。
#[derive(Debug, Clone)]
pub struct Measurement {
    /// 未经 `dimlfac` 缩放的原始测量值。
    pub raw_value: f64,
    pub value: f64,
    /// 最终显示的文字；为空表示不输出文字。
    pub text: String,
    pub text_height: f64,
    pub text_gap: f64,
    pub vertical_placement: VerticalPlacement,
    user_text: Option<String>,
    text_vertical_position: f64,
    length_factor: f64,
    rounding: f64,
    decimal_places: usize,
    zero_suppression: i16,
    decimal_separator: char,
    text_prefix: String,
    text_suffix: String,
    text_style: String,
    width_factor: f64,
    attribs: GraphicAttributes,
}

impl Measurement {
    pub fn new(style: &DimStyle, user_text: Option<&str>, layer: &str) -> Self {
        let scale = style.scale();
        let (text_prefix, text_suffix) = match style.dimpost.split_once("<>") {
            Some((prefix, suffix)) => (prefix.to_string(), suffix.to_string()),
            None => (String::new(), style.dimpost.clone()),
        };
        Self {
            raw_value: 0.0,
            value: 0.0,
            text: String::new(),
            text_height: style.dimtxt * scale,
            text_gap: style.dimgap * scale,
            vertical_placement: style.dimtad,
            user_text: user_text.map(str::to_string),
            text_vertical_position: style.dimtvp,
            length_factor: style.dimlfac,
            rounding: style.dimrnd,
            decimal_places: style.dimdec,
            zero_suppression: style.dimzin,
            decimal_separator: style.dimdsep,
            text_prefix,
            text_suffix,
            text_style: style.dimtxsty.clone(),
            width_factor: style.width_factor,
            attribs: GraphicAttributes {
                layer: layer.to_string(),
                color: style.dimclrt,
                linetype: None,
                lineweight: -2,
                extrusion: None,
            },
        }
    }

    /// 写入新的原始测量值并重新生成文字。负的线性比例只作用于大小。
    pub fn update(&mut self, raw_value: f64) {
        self.raw_value = raw_value;
        self.value = raw_value * self.length_factor.abs();
        self.text = self.text_override(self.value);
    }

    /// `" "` 隐藏文字，空串或 `"<>"` 显示测量值，其余文字中首个 `<>` 被替换为测量值。
    fn text_override(&self, value: f64) -> String {
        match self.user_text.as_deref() {
            Some(" ") => String::new(),
            None | Some("") | Some("<>") => self.format_text(value),
            Some(text) => text.replacen("<>", &self.format_text(value), 1),
        }
    }

    pub fn format_text(&self, value: f64) -> String {
        let number = format_text(
            value,
            self.rounding,
            self.decimal_places,
            self.zero_suppression,
            self.decimal_separator,
        );
        format!("{}{}{}", self.text_prefix, number, self.text_suffix)
    }

    #[inline]
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// 文字中点到引线的垂直距离，正值位于上方。
    pub fn text_vertical_distance(&self) -> f64 {
        match self.vertical_placement {
            VerticalPlacement::Center => self.text_height * self.text_vertical_position,
            placement => (self.text_height * 0.5 + self.text_gap) * placement.valign(),
        }
    }

    #[inline]
    pub fn width_factor(&self) -> f64 {
        self.width_factor
    }

    pub fn dxfattribs(&self) -> TextAttributes {
        TextAttributes {
            graphic: self.attribs.clone(),
            height: self.text_height,
            style: self.text_style.clone(),
            width_factor: self.width_factor,
            rich: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_text_applies_decimals_and_separator() {
        assert_eq!(format_text(10.0, 0.0, 2, 0, '.'), "10.00");
        assert_eq!(format_text(3.14159, 0.0, 3, 0, ','), "3,142");
        assert_eq!(format_text(12.3, 0.5, 1, 0, '.'), "12.5");
        assert_eq!(format_text(-0.001, 0.0, 2, 0, '.'), "0.00");
    }

    #[test]
    fn format_text_suppresses_zeros() {
        assert_eq!(format_text(0.5, 0.0, 2, 4, '.'), ".50");
        assert_eq!(format_text(-0.5, 0.0, 2, 4, '.'), "-.50");
        assert_eq!(format_text(12.5, 0.0, 3, 8, '.'), "12.5");
        assert_eq!(format_text(12.0, 0.0, 3, 8, '.'), "12");
        assert_eq!(format_text(0.25, 0.0, 4, 12, '.'), ".25");
    }

    #[test]
    fn user_text_rules() {
        let style = DimStyle::default();
        let mut measurement = Measurement::new(&style, None, "DIM");
        measurement.update(10.0);
        assert_eq!(measurement.text, "10.00");

        let mut hidden = Measurement::new(&style, Some(" "), "DIM");
        hidden.update(10.0);
        assert!(!hidden.has_text());

        let mut wrapped = Measurement::new(&style, Some("X=<> mm"), "DIM");
        wrapped.update(10.0);
        assert_eq!(wrapped.text, "X=10.00 mm");

        let mut fixed = Measurement::new(&style, Some("REF"), "DIM");
        fixed.update(10.0);
        assert_eq!(fixed.text, "REF");
    }

    #[test]
    fn dimpost_and_dimlfac_are_applied() {
        let style = DimStyle {
            dimpost: "Y<>mm".to_string(),
            dimlfac: 2.0,
            ..DimStyle::default()
        };
        let mut measurement = Measurement::new(&style, None, "DIM");
        measurement.update(1.25);
        assert!((measurement.raw_value - 1.25).abs() < f64::EPSILON);
        assert!((measurement.value - 2.5).abs() < f64::EPSILON);
        assert_eq!(measurement.text, "Y2.50mm");

        let suffix_only = DimStyle {
            dimpost: " mm".to_string(),
            ..DimStyle::default()
        };
        let mut measurement = Measurement::new(&suffix_only, None, "DIM");
        measurement.update(1.0);
        assert_eq!(measurement.text, "1.00 mm");
    }

    #[test]
    fn negative_dimlfac_keeps_value_positive() {
        let style = DimStyle {
            dimlfac: -1.0,
            ..DimStyle::default()
        };
        let mut measurement = Measurement::new(&style, None, "DIM");
        measurement.update(10.0);
        assert!((measurement.value - 10.0).abs() < 1e-12);
        assert_eq!(measurement.text, "10.00");
    }

    #[test]
    fn vertical_distance_follows_placement() {
        let centered = DimStyle {
            dimtvp: 0.5,
            ..DimStyle::default()
        };
        let measurement = Measurement::new(&centered, None, "DIM");
        assert!((measurement.text_vertical_distance() - 1.25).abs() < 1e-12);

        let above = DimStyle {
            dimtad: VerticalPlacement::Above,
            ..DimStyle::default()
        };
        let measurement = Measurement::new(&above, None, "DIM");
        // 2.5 / 2 + 0.625
        assert!((measurement.text_vertical_distance() - 1.875).abs() < 1e-12);

        let below = DimStyle {
            dimtad: VerticalPlacement::Below,
            dimscale: 2.0,
            ..DimStyle::default()
        };
        let measurement = Measurement::new(&below, None, "DIM");
        assert!((measurement.text_vertical_distance() + 3.75).abs() < 1e-12);
    }

    #[test]
    fn dxfattribs_carry_text_style() {
        let style = DimStyle {
            dimclrt: 3,
            ..DimStyle::default()
        };
        let measurement = Measurement::new(&style, None, "DIM");
        let attribs = measurement.dxfattribs();
        assert_eq!(attribs.graphic.layer, "DIM");
        assert_eq!(attribs.graphic.color, 3);
        assert_eq!(attribs.style, "Standard");
        assert!((attribs.height - 2.5).abs() < f64::EPSILON);
        assert!(!attribs.rich);
    }
}
