use std::process;

use roketo_client::{ClientConfig, ListDirection, RoketoApi, RpcChainClient};
use roketo_core::{amount::format_amount, available_to_withdraw, now_millis};

use crate::commands::progress::status_label;
use crate::{print_json, report_error, runtime, ListSide, OutputFormat};

pub(crate) fn cmd_list(
    config: ClientConfig,
    side: ListSide,
    account_id: &str,
    from: u32,
    limit: u32,
    output: OutputFormat,
    quiet: bool,
) {
    let direction = match side {
        ListSide::Incoming => ListDirection::Incoming,
        ListSide::Outgoing => ListDirection::Outgoing,
    };
    let chain = RpcChainClient::new(&config.rpc_url);
    let api = RoketoApi::new(Box::new(chain), config);

    let rt = runtime(output, quiet);
    let streams = match rt.block_on(api.get_streams(direction, account_id, from, limit)) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => print_json(&streams),
        OutputFormat::Text => {
            if streams.is_empty() {
                if !quiet {
                    println!("no streams");
                }
                return;
            }
            let now_ms = now_millis();
            for s in &streams {
                println!(
                    "{}  {}  {}  available {} of {}",
                    s.id,
                    status_label(s.status),
                    s.token_account_id,
                    format_amount(&available_to_withdraw(s, now_ms)),
                    format_amount(&s.balance),
                );
            }
        }
    }
}
