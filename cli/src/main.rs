pub mod cli;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::Instrument;

use common::logger::{TraceId, init_logger, root_span};
use engine::{EngineConfig, QuotePair, RejectPolicy, RowDispatcher, SignalEngine};

use cli::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger("pairsignal", cli.json_logs);

    let config = build_config(&cli, EngineConfig::from_env()?)?;
    let policy = cli.reject_policy();

    let trace_id = TraceId::default();
    let span = root_span("replay", &trace_id);

    tracing::info!(
        window_capacity = config.window_capacity,
        threshold = config.threshold,
        ?policy,
        "starting replay"
    );

    let (quote_tx, quote_rx) = mpsc::channel::<QuotePair>(1024);
    let (row_tx, mut row_rx) = mpsc::channel(1024);

    let engine = SignalEngine::new(config)?;
    let dispatcher = tokio::spawn(
        RowDispatcher::new(engine, quote_rx, row_tx)
            .with_policy(policy)
            .run()
            .instrument(span.clone()),
    );

    let input = cli.input.clone();
    let reader = tokio::spawn(
        async move {
            match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("opening {}", path.display()))?;
                    feed_lines(file, quote_tx, policy).await
                }
                None => feed_lines(tokio::io::stdin(), quote_tx, policy).await,
            }
        }
        .instrument(span.clone()),
    );

    let mut stdout = tokio::io::stdout();
    while let Some(row) = row_rx.recv().await {
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');
        stdout.write_all(&line).await.context("writing row")?;
    }
    stdout.flush().await?;

    let stats = dispatcher.await??;
    reader.await??;

    span.in_scope(|| {
        tracing::info!(
            processed = stats.processed,
            rejected = stats.rejected,
            "replay finished"
        );
    });

    Ok(())
}

/// Read newline-delimited JSON pairs and push them into the engine queue.
async fn feed_lines<R>(
    source: R,
    tx: mpsc::Sender<QuotePair>,
    policy: RejectPolicy,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(source).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("reading input")? {
        line_no += 1;

        let pair = match parse_line(&line, line_no) {
            Ok(Some(pair)) => pair,
            Ok(None) => continue,
            Err(err) if policy == RejectPolicy::Skip => {
                tracing::warn!(error = %err, "skipping malformed line");
                continue;
            }
            Err(err) => return Err(err),
        };

        if tx.send(pair).await.is_err() {
            // dispatcher halted; its error is reported by the caller
            break;
        }
    }

    Ok(())
}
