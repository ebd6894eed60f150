//! Resolution of the single active template for an event.
//!
//! Three sources may name a template, in priority order:
//!
//! 1. the event's active pointer (authoritative across devices),
//! 2. the first template in list order carrying the default flag,
//! 3. a locally cached legacy id, trusted only when it names a
//!    ready-made template.
//!
//! The chosen id is matched exactly against the template list. A pointer
//! naming an id missing from the list is stale and yields no selection.
//! Only the legacy id falls back to the built-in catalog.

use crate::template::{
    is_ready_made_id, ready_made_by_id, EventBadgeSelection, TemplateKind, TemplateModel,
};
use crate::types::TemplateId;

/// Which priority level produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    EventPointer,
    DefaultFlag,
    LegacyCache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub template: TemplateModel,
    pub kind: TemplateKind,
    pub source: SelectionSource,
}

impl Selection {
    pub fn id(&self) -> Option<&TemplateId> {
        self.template.id.as_ref()
    }
}

/// Pick the active template. Returns `None` when no source names a
/// template that can be found.
pub fn resolve(
    event: &EventBadgeSelection,
    templates: &[TemplateModel],
    legacy_cached_id: Option<&TemplateId>,
) -> Option<Selection> {
    if let Some(id) = &event.active_template_id {
        return templates
            .iter()
            .find(|t| t.id.as_ref() == Some(id))
            .map(|t| classify(t.clone(), SelectionSource::EventPointer));
    }

    if let Some(template) = templates.iter().find(|t| t.is_default) {
        return Some(classify(template.clone(), SelectionSource::DefaultFlag));
    }

    let id = legacy_cached_id.filter(|id| is_ready_made_id(id))?;
    let listed = templates
        .iter()
        .find(|t| t.id.as_ref() == Some(id) && t.kind() == TemplateKind::ReadyMade)
        .cloned();
    listed
        .or_else(|| ready_made_by_id(id))
        .map(|t| classify(t, SelectionSource::LegacyCache))
}

fn classify(template: TemplateModel, source: SelectionSource) -> Selection {
    Selection {
        kind: template.kind(),
        template,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(active: Option<i64>) -> EventBadgeSelection {
        EventBadgeSelection {
            event_id: "12".to_string(),
            active_template_id: active.map(TemplateId::from),
        }
    }

    fn template(id: i64, name: &str, is_default: bool) -> TemplateModel {
        let mut t = TemplateModel::new(name).with_id(id);
        t.is_default = is_default;
        t
    }

    fn selected_id(selection: Option<Selection>) -> Option<String> {
        selection.and_then(|s| s.template.id.map(|id| id.to_string()))
    }

    // -- priority --

    #[test]
    fn event_pointer_beats_default_flag() {
        let templates = vec![template(7, "Speakers", false), template(9, "Staff", true)];
        let selection = resolve(&event(Some(7)), &templates, None).unwrap();
        assert_eq!(selection.template.id, Some(TemplateId::from(7_i64)));
        assert_eq!(selection.source, SelectionSource::EventPointer);
        assert_eq!(selection.kind, TemplateKind::Custom);
    }

    #[test]
    fn default_flag_used_without_pointer() {
        let templates = vec![template(9, "Staff", true)];
        let selection = resolve(&event(None), &templates, None).unwrap();
        assert_eq!(selection.id(), Some(&TemplateId::from(9_i64)));
        assert_eq!(selection.source, SelectionSource::DefaultFlag);
    }

    #[test]
    fn first_default_wins_when_several_flagged() {
        let templates = vec![
            template(4, "Press", false),
            template(5, "Staff", true),
            template(6, "Crew", true),
        ];
        assert_eq!(selected_id(resolve(&event(None), &templates, None)), Some("5".into()));
    }

    #[test]
    fn default_flag_beats_legacy_cache() {
        let templates = vec![template(9, "Staff", true)];
        let legacy = TemplateId::from("1");
        let selection = resolve(&event(None), &templates, Some(&legacy)).unwrap();
        assert_eq!(selection.source, SelectionSource::DefaultFlag);
    }

    // -- legacy cache --

    #[test]
    fn legacy_ready_made_id_resolves_from_catalog() {
        let legacy = TemplateId::from("1");
        let selection = resolve(&event(None), &[], Some(&legacy)).unwrap();
        assert_eq!(selection.id(), Some(&legacy));
        assert_eq!(selection.kind, TemplateKind::ReadyMade);
        assert_eq!(selection.source, SelectionSource::LegacyCache);
    }

    #[test]
    fn legacy_custom_id_ignored() {
        let templates = vec![template(42, "VIP", false)];
        let legacy = TemplateId::from("42");
        assert!(resolve(&event(None), &templates, Some(&legacy)).is_none());
        assert!(resolve(&event(None), &[], Some(&legacy)).is_none());
    }

    #[test]
    fn legacy_id_never_picks_a_custom_template_sharing_the_id() {
        let templates = vec![template(1, "Board Members", false)];
        let legacy = TemplateId::from("1");
        let selection = resolve(&event(None), &templates, Some(&legacy)).unwrap();
        assert_eq!(selection.template.name, "Classic");
        assert_eq!(selection.kind, TemplateKind::ReadyMade);
    }

    #[test]
    fn legacy_id_prefers_listed_ready_made_copy() {
        let mut listed = template(2, "Modern", false);
        listed.background.color = "#000000".to_string();
        let legacy = TemplateId::from("2");
        let selection = resolve(&event(None), &[listed.clone()], Some(&legacy)).unwrap();
        assert_eq!(selection.template, listed);
    }

    // -- unresolvable --

    #[test]
    fn stale_pointer_yields_no_selection() {
        let templates = vec![template(9, "Staff", true)];
        assert!(resolve(&event(Some(77)), &templates, None).is_none());
    }

    #[test]
    fn stale_pointer_to_low_id_is_not_a_ready_made() {
        let templates = vec![template(5, "Staff", false)];
        assert!(resolve(&event(Some(1)), &templates, None).is_none());
        assert!(resolve(&event(Some(2)), &[], None).is_none());
    }

    #[test]
    fn stale_pointer_ignores_default_flag_and_legacy_id() {
        let templates = vec![template(5, "Staff", true)];
        let legacy = TemplateId::from("1");
        assert!(resolve(&event(Some(1)), &templates, Some(&legacy)).is_none());
    }

    #[test]
    fn pointer_matches_persisted_ready_made_copy() {
        let mut classic = TemplateModel::new("Classic").with_id(1_i64);
        classic.is_default = true;
        let selection = resolve(&event(Some(1)), &[classic], None).unwrap();
        assert_eq!(selection.template.name, "Classic");
        assert_eq!(selection.kind, TemplateKind::ReadyMade);
        assert_eq!(selection.source, SelectionSource::EventPointer);
    }

    #[test]
    fn nothing_to_select() {
        let templates = vec![template(4, "Press", false)];
        assert!(resolve(&event(None), &templates, None).is_none());
        assert!(resolve(&event(None), &[], None).is_none());
    }

    #[test]
    fn resolution_is_repeatable() {
        let templates = vec![template(5, "Staff", true), template(6, "Crew", true)];
        let first = resolve(&event(None), &templates, None);
        let second = resolve(&event(None), &templates, None);
        assert_eq!(first, second);
    }
}
