//! 公差与极限尺寸注释。

use crate::measurement::format_text;
use crate::style::DimStyle;

#[derive(Debug, Clone)]
pub struct Tolerance {
    enabled: bool,
    has_tolerance: bool,
    has_limits: bool,
    /// 上偏差（`dimtp`）。
    pub maximum: f64,
    /// 下偏差（`dimtm`），以正值表示向下的偏移。
    pub minimum: f64,
    /// 公差文字相对主文字的高度比例（`dimtfac`）。
    pub text_scale_factor: f64,
    pub text_upper: String,
    pub text_lower: String,
    decimal_places: usize,
    zero_suppression: i16,
    decimal_separator: char,
    text_height: f64,
}

impl Tolerance {
    /// `dimlim` 优先于 `dimtol`：同时开启时只显示极限尺寸。
    pub fn new(style: &DimStyle) -> Self {
        let has_limits = style.dimlim;
        let has_tolerance = style.dimtol && !has_limits;
        let mut tol = Self {
            enabled: has_limits || has_tolerance,
            has_tolerance,
            has_limits,
            maximum: style.dimtp,
            minimum: style.dimtm,
            text_scale_factor: style.dimtfac,
            text_upper: String::new(),
            text_lower: String::new(),
            decimal_places: style.dimtdec,
            zero_suppression: style.dimtzin,
            decimal_separator: style.dimdsep,
            text_height: style.dimtxt * style.scale() * style.dimtfac,
        };
        if has_tolerance {
            tol.text_upper = tol.format_text(tol.maximum);
            tol.text_lower = tol.format_text(tol.minimum);
        }
        tol
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn has_tolerance(&self) -> bool {
        self.enabled && self.has_tolerance
    }

    #[inline]
    pub fn has_limits(&self) -> bool {
        self.enabled && self.has_limits
    }

    /// 关闭公差输出（目标版本不支持富文本时使用）。
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// 上下偏差相等时使用 `±` 形式。
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        (self.maximum - self.minimum).abs() <= f64::EPSILON
    }

    #[inline]
    pub fn text_height(&self) -> f64 {
        self.text_height
    }

    pub fn format_text(&self, value: f64) -> String {
        format_text(
            value,
            0.0,
            self.decimal_places,
            self.zero_suppression,
            self.decimal_separator,
        )
    }

    /// 由测量值计算上下极限尺寸文字。
    pub fn update_limits(&mut self, measurement: f64) {
        self.text_upper = self.format_text(measurement + self.maximum);
        self.text_lower = self.format_text(measurement - self.minimum);
    }

    /// 组合成 MTEXT 内容；未启用时原样返回主文字。
    pub fn compile_mtext(&self, text: &str) -> String {
        if self.has_limits() {
            format!(
                "{{\\H{}x;\\S{}^ {};}}",
                self.text_scale_factor, self.text_upper, self.text_lower
            )
        } else if self.has_tolerance() {
            if self.is_symmetric() {
                format!("{text}±{}", self.text_upper)
            } else {
                format!(
                    "{text}{{\\H{}x;\\S+{}^ -{};}}",
                    self.text_scale_factor, self.text_upper, self.text_lower
                )
            }
        } else {
            text.to_string()
        }
    }

    /// 公差文字中较长一行的字符数。
    pub fn max_line_chars(&self) -> usize {
        let upper = self.text_upper.chars().count();
        let lower = self.text_lower.chars().count();
        if self.has_tolerance() && !self.has_limits() {
            // 符号 "+" / "-" 或 "±"
            upper.max(lower) + 1
        } else {
            upper.max(lower)
        }
    }
}
