use std::path::Path;

use roketo_core::{now_millis, StreamDirection, StreamPermissions};

use crate::{load_snapshot, print_json, OutputFormat};

pub(crate) fn cmd_permissions(
    snapshot_path: &Path,
    account_id: &str,
    at: Option<i64>,
    output: OutputFormat,
    quiet: bool,
) {
    let snapshot = load_snapshot(snapshot_path, output, quiet);
    let now_ms = at.unwrap_or_else(now_millis);
    let permissions = StreamPermissions::evaluate(&snapshot, account_id, now_ms);

    match output {
        OutputFormat::Json => print_json(&permissions),
        OutputFormat::Text => print!("{}", render_permissions(account_id, &permissions)),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn render_permissions(account_id: &str, p: &StreamPermissions) -> String {
    let direction = match p.direction {
        Some(StreamDirection::Outgoing) => "outgoing",
        Some(StreamDirection::Incoming) => "incoming",
        None => "not a party",
    };
    format!(
        "account:    {}\ndirection:  {}\nadd funds:  {}\nstart:      {}\npause:      {}\nstop:       {}\nwithdraw:   {}\n",
        account_id,
        direction,
        yes_no(p.can_add_funds),
        yes_no(p.can_start),
        yes_no(p.can_pause),
        yes_no(p.can_stop),
        yes_no(p.can_withdraw),
    )
}
