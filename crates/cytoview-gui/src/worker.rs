use std::sync::mpsc;
use std::time::Instant;

use cytoview_core::dispatch::MediaLoader;
use tracing::debug;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the load worker. It owns `loader`; the UI thread never blocks on
/// file or engine I/O.
pub fn spawn_worker(
    loader: MediaLoader,
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cytoview-worker".into())
        .spawn(move || {
            worker_loop(loader, cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn worker_loop(
    mut loader: MediaLoader,
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::Attach { surface } => {
                let result = loader.attach(&surface);
                send(&tx, &ctx, WorkerResult::Attached { result });
            }
            WorkerCommand::Load { plan } => {
                let start = Instant::now();
                let result = loader.execute(&plan);
                let elapsed = start.elapsed();
                debug!(
                    name = %plan.name,
                    ticket = plan.ticket.id(),
                    ok = result.is_ok(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Load finished"
                );
                send(
                    &tx,
                    &ctx,
                    WorkerResult::Loaded {
                        ticket: plan.ticket,
                        result,
                        elapsed,
                    },
                );
            }
            WorkerCommand::SetPolicy { policy } => {
                debug!(%policy, "Fallback policy changed");
                loader.set_policy(policy);
            }
        }
    }
    debug!("Worker channel closed");
}
