//! 尺寸文字包围盒。
//!
//! 布局分两步：先由文字内容得到 [`TextBoxSize`]，放置计算给出 [`PlacedText`]，
//! 两者合成不可变的 [`TextBox`]。

use zcad_core::geometry::{Bounds2D, Point2, Vector2};

use crate::measurement::Measurement;
use crate::tolerance::Tolerance;

/// 等宽估算：每个字符宽度等于字高乘宽度因子。
pub fn text_width(text: &str, height: f64, width_factor: f64) -> f64 {
    text.chars().count() as f64 * height * width_factor
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBoxSize {
    pub width: f64,
    /// 含上下两侧 `dimgap` 的高度。
    pub height: f64,
}

impl TextBoxSize {
    /// 由测量文字与公差计算尺寸。极限尺寸只显示上下限，公差附加在主文字之后。
    pub fn measure(measurement: &Measurement, tol: &Tolerance) -> Self {
        let width = if !measurement.has_text() {
            0.0
        } else {
            let tol_width = text_width(
                &"0".repeat(tol.max_line_chars()),
                tol.text_height(),
                measurement.width_factor(),
            );
            if tol.has_limits() {
                tol_width
            } else if tol.has_tolerance() {
                text_width(
                    &measurement.text,
                    measurement.text_height,
                    measurement.width_factor(),
                ) + tol_width
            } else {
                text_width(
                    &measurement.text,
                    measurement.text_height,
                    measurement.width_factor(),
                )
            }
        };
        Self {
            width,
            height: measurement.text_height + 2.0 * measurement.text_gap,
        }
    }
}

/// 文字最终位置与旋转角（度）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedText {
    pub location: Point2,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub center: Point2,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl TextBox {
    pub fn new(size: TextBoxSize, placed: PlacedText) -> Self {
        Self {
            center: placed.location,
            width: size.width,
            height: size.height,
            angle: placed.rotation,
        }
    }

    /// 逆时针顺序的四个角点，从左下角开始（以文字方向为准）。
    pub fn corners(&self) -> [Point2; 4] {
        let along = Vector2::from_angle_deg(self.angle) * (self.width * 0.5);
        let across = Vector2::from_angle_deg(self.angle + 90.0) * (self.height * 0.5);
        [
            self.center - along - across,
            self.center + along - across,
            self.center + along + across,
            self.center - along + across,
        ]
    }

    pub fn bounds(&self) -> Bounds2D {
        let mut bounds = Bounds2D::empty();
        for corner in self.corners() {
            bounds.include_point(corner);
        }
        bounds
    }
}
