//! Unit normalization and render scaling.
//!
//! Stored dimensions carry no unit tag. Values above [`PIXEL_THRESHOLD`]
//! are taken to be pixels at [`DPI`]; everything else is already inches.

use crate::error::CoreError;
use crate::template::{Position, TemplateModel};

/// Pixels per inch used for every inch/pixel conversion.
pub const DPI: f64 = 96.0;

/// Raw dimensions above this value are treated as pixels.
pub const PIXEL_THRESHOLD: f64 = 50.0;

/// Width of the reference canvas all element coordinates live on.
pub const REFERENCE_CANVAS_WIDTH: f64 = 400.0;

/// Per-axis scale factors. Axes are independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn apply(&self, p: Position) -> Position {
        Position::new(p.x * self.x, p.y * self.y)
    }
}

/// Normalize a raw stored dimension to inches.
pub fn normalize_dimension(raw: f64) -> f64 {
    if raw > PIXEL_THRESHOLD {
        raw / DPI
    } else {
        raw
    }
}

pub fn inches_to_pixels(inches: f64) -> f64 {
    inches * DPI
}

/// Height of the reference canvas for this template's aspect ratio.
pub fn reference_canvas_height(template: &TemplateModel) -> Result<f64, CoreError> {
    ensure_positive_template(template)?;
    Ok(REFERENCE_CANVAS_WIDTH * template.height / template.width)
}

/// Ratios between the template's physical box at [`DPI`] and a target box.
pub fn compute_scale(
    target_width_px: f64,
    target_height_px: f64,
    template: &TemplateModel,
) -> Result<Scale, CoreError> {
    ensure_positive_target(target_width_px, target_height_px)?;
    ensure_positive_template(template)?;

    Ok(Scale {
        x: target_width_px / inches_to_pixels(template.width),
        y: target_height_px / inches_to_pixels(template.height),
    })
}

/// Ratios mapping the reference canvas directly onto a target box.
pub fn canvas_to_target(
    template: &TemplateModel,
    target_width_px: f64,
    target_height_px: f64,
) -> Result<Scale, CoreError> {
    ensure_positive_target(target_width_px, target_height_px)?;
    let canvas_height = reference_canvas_height(template)?;

    Ok(Scale {
        x: target_width_px / REFERENCE_CANVAS_WIDTH,
        y: target_height_px / canvas_height,
    })
}

fn ensure_positive_target(width: f64, height: f64) -> Result<(), CoreError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(CoreError::Validation(format!(
            "Render box must be positive (got {width}x{height}px)"
        )));
    }
    Ok(())
}

fn ensure_positive_template(template: &TemplateModel) -> Result<(), CoreError> {
    if !(template.width > 0.0 && template.height > 0.0) {
        return Err(CoreError::Validation(format!(
            "Template '{}' has non-positive dimensions ({}x{} in)",
            template.name, template.width, template.height
        )));
    }
    Ok(())
}
