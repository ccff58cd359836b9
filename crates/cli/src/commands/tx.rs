use std::process;

use roketo_client::{
    ClientConfig, ClientError, RecordingMediator, RoketoApi, RpcChainClient, Transaction,
};
use roketo_core::amount::{format_amount, parse_amount};

use crate::{print_json, report_error, runtime, OutputFormat, TxCommands};

/// Build the transaction for `command` and print it instead of signing.
pub(crate) fn cmd_tx(config: ClientConfig, command: TxCommands, output: OutputFormat, quiet: bool) {
    let chain = RpcChainClient::new(&config.rpc_url);
    let api = RoketoApi::new(Box::new(chain), config);
    let mediator = RecordingMediator::new();

    let rt = runtime(output, quiet);
    let result: Result<serde_json::Value, ClientError> = rt.block_on(async {
        match &command {
            TxCommands::Start { stream_id } => api.start_stream(&mediator, stream_id).await,
            TxCommands::Pause { stream_id } => api.pause_stream(&mediator, stream_id).await,
            TxCommands::Stop { stream_id } => api.stop_stream(&mediator, stream_id).await,
            TxCommands::Withdraw { stream_ids } => {
                api.withdraw_streams(&mediator, stream_ids).await
            }
            TxCommands::AddFunds {
                stream_id,
                token,
                amount,
                callback_url,
            } => {
                match parse_amount("amount", amount) {
                    Ok(amount) => {
                        api.add_funds(&mediator, stream_id, token, &amount, callback_url.as_deref())
                            .await
                    }
                    Err(e) => Err(ClientError::from(e)),
                }
            }
        }
    });

    if let Err(e) = result {
        report_error(&format!("error: {}", e), output, quiet);
        process::exit(1);
    }

    for tx in mediator.sent() {
        match output {
            OutputFormat::Json => print_json(&tx),
            OutputFormat::Text => print!("{}", render_transaction(&tx)),
        }
    }
}

fn render_transaction(tx: &Transaction) -> String {
    let mut out = format!("receiver: {}\n", tx.receiver_id);
    if let Some(url) = &tx.wallet_callback_url {
        out.push_str(&format!("callback: {}\n", url));
    }
    for (i, action) in tx.actions.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} {} gas={} deposit={}\n",
            i + 1,
            action.method_name,
            action.args,
            action.gas,
            format_amount(&action.deposit),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use roketo_client::FunctionCall;
    use roketo_core::BigDecimal;
    use serde_json::json;

    #[test]
    fn renders_numbered_actions() {
        let tx = Transaction {
            receiver_id: "wrap.near".to_string(),
            wallet_callback_url: None,
            actions: vec![
                FunctionCall::new("near_deposit", json!({}), 30, BigDecimal::from(5)),
                FunctionCall::new("ft_transfer_call", json!({"amount": "5"}), 100, BigDecimal::from(1)),
            ],
        };
        let text = render_transaction(&tx);
        assert!(text.starts_with("receiver: wrap.near\n"));
        assert!(text.contains("  1. near_deposit {} gas=30 deposit=5\n"));
        assert!(text.contains("  2. ft_transfer_call {\"amount\":\"5\"} gas=100 deposit=1\n"));
    }
}
