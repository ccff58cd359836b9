use std::process;

use roketo_client::{ClientConfig, RoketoApi, RpcChainClient};
use roketo_core::{now_millis, stream_view};

use crate::commands::progress::render_view;
use crate::{print_json, report_error, runtime, OutputFormat};

pub(crate) fn cmd_fetch(config: ClientConfig, stream_id: &str, output: OutputFormat, quiet: bool) {
    log::debug!("fetching stream {} via {}", stream_id, config.rpc_url);
    let chain = RpcChainClient::new(&config.rpc_url);
    let api = RoketoApi::new(Box::new(chain), config);

    let rt = runtime(output, quiet);
    let snapshot = match rt.block_on(api.get_stream(stream_id)) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => print_json(&snapshot),
        OutputFormat::Text => {
            let view = stream_view(&snapshot, now_millis(), true);
            print!("{}", render_view(&snapshot, &view));
        }
    }
}
