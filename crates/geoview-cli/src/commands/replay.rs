//! Replay command implementation

use crate::cli::ReplayArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::script::{apply, parse_script};
use anyhow::{Context, Result};
use geoview_core::config::LayeredConfig;
use geoview_core::models::MapEvent;
use geoview_map::Snapshot;
use serde::Serialize;

use super::open_session;

#[derive(Debug, Serialize)]
struct StepOutput {
    line: usize,
    command: String,
    applied: bool,
    events: Vec<MapEvent>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    load_events: Vec<MapEvent>,
    steps: Vec<StepOutput>,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<&'a Snapshot>,
}

pub async fn execute(
    args: ReplayArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let path = args.script.display().to_string();
    let source = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read replay script {}", path))?;
    // Parse before loading so a typo fails fast
    let script = parse_script(&source).map_err(|e| errors::invalid_script(&path, &e.to_string()))?;

    let mut loaded = open_session(config, &args.source).await?;
    let session = &mut loaded.session;

    let mut steps = Vec::with_capacity(script.len());
    for entry in &script {
        let applied = apply(session, &entry.step);
        let events = session.drain_events();
        tracing::debug!(line = entry.line, applied, events = events.len(), "Replayed step");
        steps.push(StepOutput { line: entry.line, command: entry.text.clone(), applied, events });
    }

    let snapshot = session.snapshot();
    if output.is_json() {
        return output.result(ReplayOutput {
            load_events: loaded.events,
            steps,
            description: &snapshot.description,
            snapshot: args.snapshot.then_some(snapshot),
        });
    }

    for step in &steps {
        output.kv(format!("{:>3}", step.line), &step.command);
        if !step.applied {
            output.warning(format!("line {}: '{}' had no effect", step.line, step.command));
        }
        for event in &step.events {
            output.line(format!("      {}", event_text(event)));
        }
    }

    output.section("Description");
    output.line(&snapshot.description);

    if args.snapshot {
        output.section("Snapshot");
        output.line(serde_json::to_string_pretty(snapshot)?);
    }

    Ok(())
}

fn event_text(event: &MapEvent) -> String {
    match event {
        MapEvent::MapMoved(moved) => format!(
            "map moved: center {:.4}, {:.4} zoom {}",
            moved.center.lat, moved.center.lng, moved.zoom
        ),
        MapEvent::LayerToggled(activation) => {
            let states: Vec<String> = activation
                .iter()
                .map(|(id, active)| format!("{}={}", id, if *active { "on" } else { "off" }))
                .collect();
            format!("layers: {}", states.join(", "))
        }
        MapEvent::Announce(announcement) => format!("announce: {}", announcement.message),
        MapEvent::SelectionChanged(Some(feature)) => {
            format!("selected: {}:{}", feature.layer_id, feature.feature_index)
        }
        MapEvent::SelectionChanged(None) => "selection cleared".to_string(),
        MapEvent::Status(message) => format!("status: {}", message),
    }
}
