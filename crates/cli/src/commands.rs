use anyhow::{anyhow, Context};
use lanyard_core::template::{ready_made_by_id, TemplateModel};
use lanyard_core::types::{DbId, TemplateId};
use lanyard_core::units::{canvas_to_target, compute_scale, reference_canvas_height};
use lanyard_service::poll::PollConfig;
use lanyard_service::service::TemplateService;

pub async fn list(
    service: &TemplateService,
    event: &str,
    legacy: Option<&TemplateId>,
) -> anyhow::Result<()> {
    let listing = service.list(event, legacy).await?;
    let active = listing.selected_id();

    for template in &listing.templates {
        let marker = if template.id.as_ref() == active { "*" } else { " " };
        println!("{marker} {}", describe(template));
    }

    match &listing.selected {
        Some(selection) if !listing.templates.iter().any(|t| t.id == selection.template.id) => {
            println!("* {} (built-in)", describe(&selection.template));
        }
        None => println!("No active template"),
        _ => {}
    }
    Ok(())
}

pub async fn select(
    service: &TemplateService,
    event: &str,
    template: &TemplateId,
    legacy: Option<&TemplateId>,
    poll: Option<PollConfig>,
) -> anyhow::Result<()> {
    let outcome = match service.select_as_default(event, template).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some((event_id, template_id)) = err.pending_pointer() {
                eprintln!("hint: run `lanyard repair {event_id} {template_id}` to finish the selection");
            }
            return Err(err.into());
        }
    };

    println!("Selected {}", describe(&outcome.template));

    if let (Some(config), Some(id)) = (poll, outcome.template.id.as_ref()) {
        service.wait_for_selection(event, id, legacy, &config).await?;
        println!("Selection confirmed");
    }
    Ok(())
}

pub async fn repair(service: &TemplateService, event: &str, template_id: DbId) -> anyhow::Result<()> {
    let event = service.repair_pointer(event, template_id).await?;
    println!(
        "Event {} now points at template {}",
        event.event_id,
        event
            .active_template_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    Ok(())
}

pub async fn delete(service: &TemplateService, event: &str, template: &TemplateId) -> anyhow::Result<()> {
    service.delete(event, template).await?;
    println!("Deleted template {template}");
    Ok(())
}

pub async fn scale(
    service: &TemplateService,
    event: &str,
    template: &TemplateId,
    legacy: Option<&TemplateId>,
    width_px: f64,
    height_px: f64,
) -> anyhow::Result<()> {
    let listing = service.list(event, legacy).await?;
    let found = listing
        .templates
        .into_iter()
        .find(|t| t.id.as_ref() == Some(template))
        .or_else(|| ready_made_by_id(template))
        .ok_or_else(|| anyhow!("Template {template} not found for event {event}"))?;

    let physical = compute_scale(width_px, height_px, &found)?;
    let canvas = canvas_to_target(&found, width_px, height_px)?;
    let canvas_height = reference_canvas_height(&found)
        .with_context(|| format!("Template {template} has no usable aspect ratio"))?;

    println!("{}", describe(&found));
    println!("physical box scale: x={:.4} y={:.4}", physical.x, physical.y);
    println!(
        "reference canvas 400x{canvas_height:.1} -> {width_px}x{height_px}px: x={:.4} y={:.4}",
        canvas.x, canvas.y
    );

    let elements = [
        ("photo", found.photo.enabled, found.photo.position),
        ("name", found.name_text.enabled, found.name_text.position),
        ("company", found.company.enabled, found.company.position),
        ("title", found.title.enabled, found.title.position),
        ("qr code", found.qr_code.enabled, found.qr_code.position),
    ];
    for (label, enabled, position) in elements {
        if !enabled {
            continue;
        }
        let mapped = canvas.apply(position);
        println!("  {label:<8} ({:.1}, {:.1})px", mapped.x, mapped.y);
    }
    Ok(())
}

fn describe(template: &TemplateModel) -> String {
    format!(
        "{} [{}] {} ({}x{} in){}",
        template
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        template.kind().as_str(),
        template.name,
        template.width,
        template.height,
        if template.is_default { " default" } else { "" },
    )
}
