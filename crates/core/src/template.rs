//! Badge template model, defaults table, ready-made catalog, and the
//! red-background normalization rule.
//!
//! Element positions and sizes are expressed on the 400-unit reference
//! canvas (see [`crate::units`]); `width`/`height` are always inches.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::TemplateId;

/* --------------------------------------------------------------------------
Defaults table
-------------------------------------------------------------------------- */

/// Default badge width in inches.
pub const DEFAULT_WIDTH_IN: f64 = 3.5;

/// Default badge height in inches.
pub const DEFAULT_HEIGHT_IN: f64 = 5.5;

/// Background color used whenever none (or a red one) is stored.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

pub const DEFAULT_PHOTO_SIZE: Size = Size::new(200.0, 200.0);
pub const DEFAULT_PHOTO_POSITION: Position = Position::new(200.0, 60.0);

pub const DEFAULT_NAME_FONT_SIZE: f64 = 24.0;
pub const DEFAULT_NAME_COLOR: &str = "#000000";
pub const DEFAULT_NAME_POSITION: Position = Position::new(200.0, 280.0);

pub const DEFAULT_COMPANY_FONT_SIZE: f64 = 18.0;
pub const DEFAULT_COMPANY_COLOR: &str = "#666666";
pub const DEFAULT_COMPANY_POSITION: Position = Position::new(200.0, 315.0);

pub const DEFAULT_TITLE_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_TITLE_COLOR: &str = "#999999";
pub const DEFAULT_TITLE_POSITION: Position = Position::new(200.0, 350.0);

pub const DEFAULT_QR_CODE_SIZE: Size = Size::new(120.0, 120.0);
pub const DEFAULT_QR_CODE_POSITION: Position = Position::new(200.0, 400.0);

/* --------------------------------------------------------------------------
Ready-made catalog
-------------------------------------------------------------------------- */

/// Catalog id of the "Classic" ready-made template.
pub const READY_MADE_CLASSIC_ID: &str = "1";

/// Catalog id of the "Modern" ready-made template.
pub const READY_MADE_MODERN_ID: &str = "2";

pub const READY_MADE_CLASSIC_NAME: &str = "Classic";
pub const READY_MADE_MODERN_NAME: &str = "Modern";

/// `(id, name)` pairs of every built-in template.
pub const READY_MADE_TEMPLATES: &[(&str, &str)] = &[
    (READY_MADE_CLASSIC_ID, READY_MADE_CLASSIC_NAME),
    (READY_MADE_MODERN_ID, READY_MADE_MODERN_NAME),
];

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Whether a template is one of the built-in designs.
///
/// Never stored: classification is by name membership in
/// [`READY_MADE_TEMPLATES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    ReadyMade,
    Custom,
}

impl TemplateKind {
    pub fn classify(name: &str) -> Self {
        if is_ready_made_name(name) {
            Self::ReadyMade
        } else {
            Self::Custom
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadyMade => "ready_made",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Width/height pair in reference-canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Point in reference-canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two storage forms of a background image. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundImage {
    /// Inline payload (typically a data URL) not yet uploaded.
    Embedded(String),
    /// Reference to an image the backend already hosts.
    Hosted(String),
}

impl BackgroundImage {
    pub fn is_hosted(&self) -> bool {
        matches!(self, Self::Hosted(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub enabled: bool,
    pub color: String,
    pub image: Option<BackgroundImage>,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            enabled: true,
            color: DEFAULT_BACKGROUND_COLOR.to_string(),
            image: None,
        }
    }
}

/// A boxed element: the attendee photo or the QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub enabled: bool,
    pub size: Size,
    pub alignment: Alignment,
    pub position: Position,
}

impl ImageElement {
    pub fn default_photo() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_PHOTO_SIZE,
            alignment: Alignment::Center,
            position: DEFAULT_PHOTO_POSITION,
        }
    }

    pub fn default_qr_code() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_QR_CODE_SIZE,
            alignment: Alignment::Center,
            position: DEFAULT_QR_CODE_POSITION,
        }
    }
}

/// A text line: attendee name, company, or title.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub enabled: bool,
    pub font_size: f64,
    pub color: String,
    pub alignment: Alignment,
    pub position: Position,
}

impl TextElement {
    pub fn default_name() -> Self {
        Self {
            enabled: true,
            font_size: DEFAULT_NAME_FONT_SIZE,
            color: DEFAULT_NAME_COLOR.to_string(),
            alignment: Alignment::Center,
            position: DEFAULT_NAME_POSITION,
        }
    }

    pub fn default_company() -> Self {
        Self {
            enabled: false,
            font_size: DEFAULT_COMPANY_FONT_SIZE,
            color: DEFAULT_COMPANY_COLOR.to_string(),
            alignment: Alignment::Center,
            position: DEFAULT_COMPANY_POSITION,
        }
    }

    pub fn default_title() -> Self {
        Self {
            enabled: true,
            font_size: DEFAULT_TITLE_FONT_SIZE,
            color: DEFAULT_TITLE_COLOR.to_string(),
            alignment: Alignment::Center,
            position: DEFAULT_TITLE_POSITION,
        }
    }
}

/// Canonical in-memory badge template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateModel {
    /// Absent until the template has been persisted.
    pub id: Option<TemplateId>,
    pub name: String,
    /// Inches.
    pub width: f64,
    /// Inches.
    pub height: f64,
    pub background: Background,
    pub photo: ImageElement,
    pub name_text: TextElement,
    pub company: TextElement,
    pub title: TextElement,
    pub qr_code: ImageElement,
    pub is_default: bool,
}

impl TemplateModel {
    /// A fresh, unsaved template with every field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            width: DEFAULT_WIDTH_IN,
            height: DEFAULT_HEIGHT_IN,
            background: Background::default(),
            photo: ImageElement::default_photo(),
            name_text: TextElement::default_name(),
            company: TextElement::default_company(),
            title: TextElement::default_title(),
            qr_code: ImageElement::default_qr_code(),
            is_default: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<TemplateId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(&self) -> TemplateKind {
        TemplateKind::classify(&self.name)
    }

    /// Validate the fields the backend cannot repair on its own.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Template name must not be empty".to_string(),
            ));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(CoreError::Validation(format!(
                "Template dimensions must be positive (got {}x{} in)",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Event-level pointer to the chosen template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBadgeSelection {
    pub event_id: String,
    pub active_template_id: Option<TemplateId>,
}

/* --------------------------------------------------------------------------
Red-background normalization
-------------------------------------------------------------------------- */

/// Replace red background encodings (and absent colors) with white.
///
/// Catches `#ff0000`, `#f00`, `red`, `rgb(255,0,0)` in any case or
/// spacing, plus any `#ff..` hex containing `0000`. Every other color is
/// returned unchanged.
pub fn fix_red_background(color: Option<&str>) -> String {
    let Some(raw) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return DEFAULT_BACKGROUND_COLOR.to_string();
    };

    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let is_red = matches!(compact.as_str(), "#ff0000" | "#f00" | "red" | "rgb(255,0,0)")
        || (compact.starts_with("#ff") && compact.contains("0000"));

    if is_red {
        DEFAULT_BACKGROUND_COLOR.to_string()
    } else {
        raw.to_string()
    }
}

/* --------------------------------------------------------------------------
Ready-made lookups
-------------------------------------------------------------------------- */

pub fn is_ready_made_id(id: &TemplateId) -> bool {
    READY_MADE_TEMPLATES
        .iter()
        .any(|(ready_id, _)| *ready_id == id.as_str())
}

pub fn is_ready_made_name(name: &str) -> bool {
    READY_MADE_TEMPLATES
        .iter()
        .any(|(_, ready_name)| *ready_name == name)
}

/// The built-in templates, in catalog order.
pub fn ready_made_catalog() -> Vec<TemplateModel> {
    vec![classic(), modern()]
}

pub fn ready_made_by_id(id: &TemplateId) -> Option<TemplateModel> {
    ready_made_catalog()
        .into_iter()
        .find(|t| t.id.as_ref() == Some(id))
}

pub fn ready_made_by_name(name: &str) -> Option<TemplateModel> {
    ready_made_catalog().into_iter().find(|t| t.name == name)
}

fn classic() -> TemplateModel {
    let mut template =
        TemplateModel::new(READY_MADE_CLASSIC_NAME).with_id(TemplateId::from(READY_MADE_CLASSIC_ID));
    template.photo.enabled = true;
    template.company.enabled = true;
    template
}

fn modern() -> TemplateModel {
    let mut template =
        TemplateModel::new(READY_MADE_MODERN_NAME).with_id(TemplateId::from(READY_MADE_MODERN_ID));
    template.background.color = "#1e293b".to_string();
    template.name_text.color = "#ffffff".to_string();
    template.name_text.font_size = 28.0;
    template.company.enabled = true;
    template.company.color = "#cbd5e1".to_string();
    template.title.color = "#94a3b8".to_string();
    template.qr_code.enabled = true;
    template
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
