use std::path::Path;

use roketo_core::{
    amount::format_amount, now_millis, stream_view, StreamSnapshot, StreamStatus, StreamView,
};

use crate::{load_snapshot, print_json, OutputFormat};

pub(crate) fn cmd_progress(
    snapshot_path: &Path,
    at: Option<i64>,
    frozen: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let snapshot = load_snapshot(snapshot_path, output, quiet);
    let eval_ms = at.unwrap_or_else(now_millis);
    log::debug!("evaluating stream '{}' at {} ms (frozen: {})", snapshot.id, eval_ms, frozen);
    let view = stream_view(&snapshot, eval_ms, !frozen);

    match output {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => print!("{}", render_view(&snapshot, &view)),
    }
}

pub(crate) fn status_label(status: StreamStatus) -> String {
    match status {
        StreamStatus::Initialized => "initialized".to_string(),
        StreamStatus::Active => "active".to_string(),
        StreamStatus::Paused => "paused".to_string(),
        StreamStatus::Finished(reason) => format!("finished ({:?})", reason),
    }
}

/// Human-readable stream card, one field per line.
pub(crate) fn render_view(snapshot: &StreamSnapshot, view: &StreamView) -> String {
    let p = &view.progress;
    let pct = &view.percentages;
    let mut out = String::new();

    if !snapshot.id.is_empty() {
        out.push_str(&format!("stream:     {}\n", snapshot.id));
    }
    out.push_str(&format!("status:     {}\n", status_label(snapshot.status)));
    out.push_str(&format!(
        "streamed:   {} of {} ({:.2}%)\n",
        format_amount(&p.streamed),
        format_amount(&p.full),
        pct.streamed
    ));
    out.push_str(&format!(
        "withdrawn:  {} ({:.2}%)\n",
        format_amount(&p.withdrawn),
        pct.withdrawn
    ));
    out.push_str(&format!(
        "available:  {} ({:.2}%)\n",
        format_amount(&p.available),
        pct.available
    ));
    out.push_str(&format!(
        "left:       {} ({:.2}%)\n",
        format_amount(&p.left),
        pct.left
    ));

    let time_left = if view.time_left.is_empty() {
        "-"
    } else {
        view.time_left.as_str()
    };
    out.push_str(&format!("time left:  {}\n", time_left));

    match view.stream_end_timestamp {
        Some(end) => out.push_str(&format!("ends at:    {} ms\n", end)),
        None => out.push_str("ends at:    never\n"),
    }

    if let Some(cliff) = view.cliff_end_timestamp {
        match pct.cliff {
            Some(c) => out.push_str(&format!("cliff:      {} ms ({:.2}%)\n", cliff, c)),
            None => out.push_str(&format!("cliff:      {} ms\n", cliff)),
        }
    }
    out
}
