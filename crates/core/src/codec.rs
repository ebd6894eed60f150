//! Conversion between [`TemplateModel`] and the backend JSON shape.
//!
//! The backend stores a template as an envelope (`id`, `name`, `default`,
//! hosted image URL) wrapping a free-form `template_data` object. Every
//! `template_data` field is optional on the wire; [`decode`] fills each
//! absent field from the defaults table in [`crate::template`], and
//! [`encode`] always emits the full field set.
//!
//! Image rule: an embedded image is sent verbatim as `bgImage`; a hosted
//! URL is never sent back, the backend keeps the one it already has.

use serde::{Deserialize, Deserializer, Serialize};

use crate::template::{
    fix_red_background, Alignment, Background, BackgroundImage, EventBadgeSelection,
    ImageElement, Position, Size, TemplateModel, TextElement,
};
use crate::types::{DbId, TemplateId};
use crate::units::normalize_dimension;

/// Name used when neither the envelope nor `template_data` carries one.
pub const UNTITLED_TEMPLATE_NAME: &str = "Untitled badge";

/* --------------------------------------------------------------------------
Wire types
-------------------------------------------------------------------------- */

/// The `template_data` object. `None` means "absent on the wire".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateData {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub has_background: Option<bool>,
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    pub has_personal_photo: Option<bool>,
    pub photo_size: Option<SizeData>,
    #[serde(deserialize_with = "lenient_alignment")]
    pub photo_alignment: Option<Alignment>,
    pub photo_position: Option<PositionData>,
    pub has_name: Option<bool>,
    pub name_text: Option<TextData>,
    pub has_company: Option<bool>,
    pub company_text: Option<TextData>,
    pub has_title: Option<bool>,
    pub title_text: Option<TextData>,
    pub has_qr_code: Option<bool>,
    pub qr_code_size: Option<SizeData>,
    pub qr_code_position: Option<PositionData>,
    #[serde(deserialize_with = "lenient_alignment")]
    pub qr_code_alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextData {
    pub size: Option<f64>,
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient_alignment")]
    pub alignment: Option<Alignment>,
    pub position: Option<PositionData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeData {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionData {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Request body for template create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPayload {
    pub badge_template: BadgeTemplateBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeTemplateBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    pub name: String,
    pub default: bool,
    pub template_data: TemplateData,
}

/// A template as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeTemplateRecord {
    pub id: DbId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default: Option<bool>,
    #[serde(default)]
    pub template_data: TemplateData,
    /// Hosted background image, set by the backend once an upload is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_image_url: Option<String>,
}

impl BadgeTemplateRecord {
    /// The record the backend would store for `payload` before any upload
    /// processing.
    pub fn from_payload(id: DbId, payload: ApiPayload) -> Self {
        let body = payload.badge_template;
        Self {
            id,
            name: Some(body.name),
            default: Some(body.default),
            template_data: body.template_data,
            bg_image_url: None,
        }
    }
}

/// An event as returned by the backend; only the badge pointer matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: DbId,
    #[serde(default)]
    pub active_badge_id: Option<DbId>,
}

/// Request body for moving the event's active pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPointerPayload {
    pub event: EventPointerBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPointerBody {
    pub active_badge_id: DbId,
}

impl EventPointerPayload {
    pub fn new(active_badge_id: DbId) -> Self {
        Self {
            event: EventPointerBody { active_badge_id },
        }
    }
}

/* --------------------------------------------------------------------------
Encode
-------------------------------------------------------------------------- */

/// Encode a template into the create/update request body.
pub fn encode(template: &TemplateModel) -> ApiPayload {
    ApiPayload {
        badge_template: BadgeTemplateBody {
            id: template.id.clone(),
            name: template.name.clone(),
            default: template.is_default,
            template_data: encode_template_data(template),
        },
    }
}

pub fn encode_template_data(template: &TemplateModel) -> TemplateData {
    let bg_image = match &template.background.image {
        Some(BackgroundImage::Embedded(data)) => Some(data.clone()),
        Some(BackgroundImage::Hosted(_)) | None => None,
    };

    TemplateData {
        name: Some(template.name.clone()),
        kind: Some(template.kind().as_str().to_string()),
        width: Some(template.width),
        height: Some(template.height),
        has_background: Some(template.background.enabled),
        bg_color: Some(fix_red_background(Some(&template.background.color))),
        bg_image,
        has_personal_photo: Some(template.photo.enabled),
        photo_size: Some(encode_size(template.photo.size)),
        photo_alignment: Some(template.photo.alignment),
        photo_position: Some(encode_position(template.photo.position)),
        has_name: Some(template.name_text.enabled),
        name_text: Some(encode_text(&template.name_text)),
        has_company: Some(template.company.enabled),
        company_text: Some(encode_text(&template.company)),
        has_title: Some(template.title.enabled),
        title_text: Some(encode_text(&template.title)),
        has_qr_code: Some(template.qr_code.enabled),
        qr_code_size: Some(encode_size(template.qr_code.size)),
        qr_code_position: Some(encode_position(template.qr_code.position)),
        qr_code_alignment: Some(template.qr_code.alignment),
    }
}

fn encode_text(text: &TextElement) -> TextData {
    TextData {
        size: Some(text.font_size),
        color: Some(text.color.clone()),
        alignment: Some(text.alignment),
        position: Some(encode_position(text.position)),
    }
}

fn encode_size(size: Size) -> SizeData {
    SizeData {
        width: Some(size.width),
        height: Some(size.height),
    }
}

fn encode_position(position: Position) -> PositionData {
    PositionData {
        x: Some(position.x),
        y: Some(position.y),
    }
}

/* --------------------------------------------------------------------------
Decode
-------------------------------------------------------------------------- */

/// Decode a backend record, filling defaults and normalizing units and
/// red backgrounds.
pub fn decode(record: &BadgeTemplateRecord) -> TemplateModel {
    let data = &record.template_data;
    let name = non_blank(record.name.as_deref())
        .or_else(|| non_blank(data.name.as_deref()))
        .unwrap_or(UNTITLED_TEMPLATE_NAME)
        .to_string();

    let mut template = TemplateModel::new(name).with_id(record.id);
    template.is_default = record.default.unwrap_or(false);

    if let Some(width) = data.width {
        template.width = normalize_dimension(width);
    }
    if let Some(height) = data.height {
        template.height = normalize_dimension(height);
    }

    template.background = Background {
        enabled: data.has_background.unwrap_or(template.background.enabled),
        color: fix_red_background(data.bg_color.as_deref()),
        image: decode_image(record.bg_image_url.as_deref(), data.bg_image.as_deref()),
    };

    decode_image_element(
        &mut template.photo,
        data.has_personal_photo,
        data.photo_size.as_ref(),
        data.photo_alignment,
        data.photo_position.as_ref(),
    );
    decode_image_element(
        &mut template.qr_code,
        data.has_qr_code,
        data.qr_code_size.as_ref(),
        data.qr_code_alignment,
        data.qr_code_position.as_ref(),
    );

    decode_text(&mut template.name_text, data.has_name, data.name_text.as_ref());
    decode_text(&mut template.company, data.has_company, data.company_text.as_ref());
    decode_text(&mut template.title, data.has_title, data.title_text.as_ref());

    template
}

/// Decode the event's badge pointer.
pub fn decode_event(record: &EventRecord) -> EventBadgeSelection {
    EventBadgeSelection {
        event_id: record.id.to_string(),
        active_template_id: record.active_badge_id.map(TemplateId::from),
    }
}

/// Hosted URL on the envelope wins, then the `template_data` image.
///
/// A `template_data` image that is itself a URL is classified as hosted
/// so it is never re-sent as fresh embedded data.
fn decode_image(hosted_url: Option<&str>, embedded: Option<&str>) -> Option<BackgroundImage> {
    if let Some(url) = non_empty(hosted_url) {
        return Some(BackgroundImage::Hosted(url.to_string()));
    }
    let raw = non_empty(embedded)?;
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Some(BackgroundImage::Hosted(raw.to_string()))
    } else {
        Some(BackgroundImage::Embedded(raw.to_string()))
    }
}

fn decode_image_element(
    element: &mut ImageElement,
    enabled: Option<bool>,
    size: Option<&SizeData>,
    alignment: Option<Alignment>,
    position: Option<&PositionData>,
) {
    if let Some(enabled) = enabled {
        element.enabled = enabled;
    }
    if let Some(size) = size {
        element.size = decode_size(size, element.size);
    }
    if let Some(alignment) = alignment {
        element.alignment = alignment;
    }
    if let Some(position) = position {
        element.position = decode_position(position, element.position);
    }
}

fn decode_text(element: &mut TextElement, enabled: Option<bool>, text: Option<&TextData>) {
    if let Some(enabled) = enabled {
        element.enabled = enabled;
    }
    let Some(text) = text else {
        return;
    };
    if let Some(size) = text.size {
        element.font_size = size;
    }
    if let Some(color) = non_empty(text.color.as_deref()) {
        element.color = color.to_string();
    }
    if let Some(alignment) = text.alignment {
        element.alignment = alignment;
    }
    if let Some(position) = &text.position {
        element.position = decode_position(position, element.position);
    }
}

fn decode_size(size: &SizeData, fallback: Size) -> Size {
    Size::new(
        size.width.unwrap_or(fallback.width),
        size.height.unwrap_or(fallback.height),
    )
}

fn decode_position(position: &PositionData, fallback: Position) -> Position {
    Position::new(
        position.x.unwrap_or(fallback.x),
        position.y.unwrap_or(fallback.y),
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Like [`non_empty`] but keeps surrounding whitespace of the value.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unknown alignment strings decode as absent so the default applies.
fn lenient_alignment<'de, D>(deserializer: D) -> Result<Option<Alignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
        "left" => Some(Alignment::Left),
        "center" | "centre" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }))
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::template::TemplateKind;

    fn record_from_json(value: serde_json::Value) -> BadgeTemplateRecord {
        serde_json::from_value(value).expect("record should deserialize")
    }

    fn customized() -> TemplateModel {
        let mut t = TemplateModel::new("Speakers").with_id(17_i64);
        t.width = 4.0;
        t.height = 6.0;
        t.background.color = "#2563eb".to_string();
        t.background.image = Some(BackgroundImage::Embedded(
            "data:image/png;base64,iVBORw0KGgo=".to_string(),
        ));
        t.photo.enabled = true;
        t.photo.alignment = Alignment::Left;
        t.photo.position = Position::new(120.0, 80.0);
        t.name_text.font_size = 30.0;
        t.company.enabled = true;
        t.company.alignment = Alignment::Right;
        t.title.enabled = false;
        t.qr_code.enabled = true;
        t.qr_code.size = Size::new(90.0, 90.0);
        t.is_default = true;
        t
    }

    // -- encode --

    #[test]
    fn encode_emits_full_field_set() {
        let payload = encode(&TemplateModel::new("Staff"));
        let value = serde_json::to_value(&payload).unwrap();
        let data = &value["badge_template"]["template_data"];

        assert_eq!(value["badge_template"]["name"], "Staff");
        assert_eq!(value["badge_template"]["default"], false);
        assert!(value["badge_template"].get("id").is_none());
        for field in [
            "name", "type", "width", "height", "hasBackground", "bgColor",
            "hasPersonalPhoto", "photoSize", "photoAlignment", "photoPosition",
            "hasName", "nameText", "hasCompany", "companyText", "hasTitle",
            "titleText", "hasQrCode", "qrCodeSize", "qrCodePosition", "qrCodeAlignment",
        ] {
            assert!(!data[field].is_null(), "missing {field}");
        }
        assert_eq!(data["type"], "custom");
        assert_eq!(data["nameText"]["size"], 24.0);
        assert_eq!(data["nameText"]["alignment"], "center");
        assert_eq!(data["qrCodeSize"]["width"], 120.0);
    }

    #[test]
    fn encode_sends_embedded_image_verbatim() {
        let payload = encode(&customized());
        assert_eq!(
            payload.badge_template.template_data.bg_image.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn encode_omits_hosted_image() {
        let mut t = customized();
        t.background.image = Some(BackgroundImage::Hosted(
            "https://cdn.example.com/bg.png".to_string(),
        ));
        let value = serde_json::to_value(encode(&t)).unwrap();
        assert!(value["badge_template"]["template_data"].get("bgImage").is_none());
    }

    #[test]
    fn encode_normalizes_red_background() {
        let mut t = TemplateModel::new("Staff");
        t.background.color = "#f00".to_string();
        let payload = encode(&t);
        assert_eq!(
            payload.badge_template.template_data.bg_color.as_deref(),
            Some("#ffffff")
        );
    }

    #[test]
    fn encode_marks_ready_made_type() {
        let payload = encode(&TemplateModel::new("Classic"));
        assert_eq!(
            payload.badge_template.template_data.kind.as_deref(),
            Some("ready_made")
        );
    }

    // -- decode --

    #[test]
    fn decode_fills_defaults_for_empty_template_data() {
        let record = record_from_json(json!({ "id": 5, "name": "Bare" }));
        let decoded = decode(&record);

        let mut expected = TemplateModel::new("Bare").with_id(5_i64);
        expected.is_default = false;
        assert_eq!(decoded, expected);
    }

    #[test]
    fn decode_fills_partial_sub_objects_field_by_field() {
        let record = record_from_json(json!({
            "id": 5,
            "name": "Partial",
            "template_data": {
                "nameText": { "color": "#111111" },
                "photoPosition": { "y": 90 },
                "companyText": { "alignment": "sideways" }
            }
        }));
        let decoded = decode(&record);

        assert_eq!(decoded.name_text.color, "#111111");
        assert_eq!(decoded.name_text.font_size, 24.0);
        assert_eq!(decoded.name_text.position, Position::new(200.0, 280.0));
        assert_eq!(decoded.photo.position, Position::new(200.0, 90.0));
        assert_eq!(decoded.company.alignment, Alignment::Center);
    }

    #[test]
    fn decode_converts_pixel_dimensions() {
        let record = record_from_json(json!({
            "id": 5,
            "name": "Legacy",
            "template_data": { "width": 336, "height": 528 }
        }));
        let decoded = decode(&record);
        assert_eq!(decoded.width, 3.5);
        assert_eq!(decoded.height, 5.5);
    }

    #[test]
    fn decode_heals_red_background() {
        let record = record_from_json(json!({
            "id": 5,
            "name": "Old",
            "template_data": { "bgColor": "rgb(255, 0, 0)" }
        }));
        assert_eq!(decode(&record).background.color, "#ffffff");
    }

    #[test]
    fn decode_prefers_hosted_url_over_embedded() {
        let record = record_from_json(json!({
            "id": 5,
            "name": "Hosted",
            "bg_image_url": "https://cdn.example.com/bg.png",
            "template_data": { "bgImage": "data:image/png;base64,AAAA" }
        }));
        assert_eq!(
            decode(&record).background.image,
            Some(BackgroundImage::Hosted("https://cdn.example.com/bg.png".to_string()))
        );
    }

    #[test]
    fn decode_falls_back_to_embedded_then_none() {
        let embedded = record_from_json(json!({
            "id": 5,
            "name": "Embedded",
            "template_data": { "bgImage": "data:image/png;base64,AAAA" }
        }));
        assert_eq!(
            decode(&embedded).background.image,
            Some(BackgroundImage::Embedded("data:image/png;base64,AAAA".to_string()))
        );

        let none = record_from_json(json!({
            "id": 5,
            "name": "Plain",
            "bg_image_url": "",
            "template_data": {}
        }));
        assert_eq!(decode(&none).background.image, None);
    }

    #[test]
    fn decode_treats_url_in_template_data_as_hosted() {
        let record = record_from_json(json!({
            "id": 5,
            "name": "Echoed",
            "template_data": { "bgImage": "https://cdn.example.com/bg.png" }
        }));
        assert!(decode(&record).background.image.unwrap().is_hosted());
    }

    #[test]
    fn decode_classifies_kind_by_name() {
        let ready = record_from_json(json!({
            "id": 3,
            "name": "Modern",
            "template_data": { "type": "custom" }
        }));
        assert_eq!(decode(&ready).kind(), TemplateKind::ReadyMade);

        let custom = record_from_json(json!({
            "id": 4,
            "name": "Volunteers",
            "template_data": { "type": "ready_made" }
        }));
        assert_eq!(decode(&custom).kind(), TemplateKind::Custom);
    }

    #[test]
    fn decode_uses_template_data_name_when_envelope_lacks_one() {
        let record = record_from_json(json!({
            "id": 8,
            "template_data": { "name": "Press" }
        }));
        assert_eq!(decode(&record).name, "Press");

        let unnamed = record_from_json(json!({ "id": 9 }));
        assert_eq!(decode(&unnamed).name, UNTITLED_TEMPLATE_NAME);
    }

    #[test]
    fn decode_skips_blank_envelope_name() {
        let record = record_from_json(json!({
            "id": 8,
            "name": "  ",
            "template_data": { "name": "Press" }
        }));
        assert_eq!(decode(&record).name, "Press");

        let blank = record_from_json(json!({
            "id": 9,
            "name": "",
            "template_data": { "name": "" }
        }));
        assert_eq!(decode(&blank).name, UNTITLED_TEMPLATE_NAME);
    }

    #[test]
    fn name_with_surrounding_spaces_survives_round_trip() {
        let template = TemplateModel::new(" VIP ").with_id(3_i64);
        let record = BadgeTemplateRecord::from_payload(3, encode(&template));
        assert_eq!(decode(&record).name, " VIP ");
        assert_eq!(decode(&record), template);
    }

    #[test]
    fn decode_event_maps_pointer() {
        let record: EventRecord =
            serde_json::from_value(json!({ "id": 12, "active_badge_id": 7 })).unwrap();
        let selection = decode_event(&record);
        assert_eq!(selection.event_id, "12");
        assert_eq!(selection.active_template_id, Some(TemplateId::from(7_i64)));

        let unset: EventRecord = serde_json::from_value(json!({ "id": 12 })).unwrap();
        assert_eq!(decode_event(&unset).active_template_id, None);
    }

    // -- round trip --

    #[test]
    fn decode_of_encode_reproduces_template() {
        let original = customized();
        let record = BadgeTemplateRecord::from_payload(17, encode(&original));
        assert_eq!(decode(&record), original);
    }

    #[test]
    fn round_trip_survives_json_serialization() {
        let original = customized();
        let wire = serde_json::to_string(&BadgeTemplateRecord::from_payload(17, encode(&original)))
            .unwrap();
        let record: BadgeTemplateRecord = serde_json::from_str(&wire).unwrap();
        assert_eq!(decode(&record), original);
    }

    #[test]
    fn round_trip_may_promote_embedded_image_to_hosted() {
        let original = customized();
        let mut record = BadgeTemplateRecord::from_payload(17, encode(&original));
        record.bg_image_url = Some("https://cdn.example.com/17.png".to_string());

        let decoded = decode(&record);
        assert!(decoded.background.image.as_ref().unwrap().is_hosted());

        let mut without_image = decoded.clone();
        without_image.background.image = None;
        let mut original_without_image = original.clone();
        original_without_image.background.image = None;
        assert_eq!(without_image, original_without_image);
    }

    #[test]
    fn event_pointer_payload_shape() {
        let value = serde_json::to_value(EventPointerPayload::new(7)).unwrap();
        assert_eq!(value, json!({ "event": { "active_badge_id": 7 } }));
    }
}
