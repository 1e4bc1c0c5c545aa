use anyhow::Result;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::config::ShadowOptions;
use crate::events::{ShadowInput, ShadowPosition};
use crate::shadow::Shadow;
use crate::timer::TimerHandle;

/// Drives the background shadow from pointer input.
///
/// Every pointer move re-arms the inactivity timer; when it expires the
/// shadow starts bouncing on a per-frame ticker. Both timers are dropped as
/// soon as new input supersedes them and when the task exits. Expiries from
/// a superseded timer carry an old generation and are ignored.
pub async fn run(
    options: ShadowOptions,
    mut inputs: mpsc::Receiver<ShadowInput>,
    positions: watch::Sender<ShadowPosition>,
    cancel: CancellationToken,
) -> Result<()> {
    if !options.enabled {
        info!("shadow disabled");
        return Ok(());
    }

    let mut shadow = Shadow::from_options(&options);
    positions.send_replace(shadow.position());

    let (idle_tx, mut idle_rx) = mpsc::channel::<u64>(1);
    let (frame_tx, mut frame_rx) = mpsc::channel::<()>(1);
    let mut generation: u64 = 0;
    let mut idle: Option<TimerHandle> = None;
    let mut frames: Option<TimerHandle> = None;

    loop {
        select! {
            _ = cancel.cancelled() => break,

            maybe_input = inputs.recv() => {
                let Some(input) = maybe_input else { break };
                frames = None;
                shadow.stop();
                match input {
                    ShadowInput::PointerMoved { x, y } => {
                        shadow.pointer_moved(x, y);
                        generation += 1;
                        idle = Some(TimerHandle::once(
                            options.inactivity_delay,
                            idle_tx.clone(),
                            generation,
                        ));
                    }
                    ShadowInput::PointerLeft => {
                        idle = None;
                    }
                    ShadowInput::PointerEntered => {}
                }
                positions.send_replace(shadow.position());
            }

            Some(fired) = idle_rx.recv() => {
                if fired != generation || idle.take().is_none() {
                    trace!(fired, generation, "stale idle expiry");
                    continue;
                }
                debug!("pointer idle; shadow starts bouncing");
                shadow.start_bouncing();
                positions.send_replace(shadow.position());
                while frame_rx.try_recv().is_ok() {}
                frames = Some(TimerHandle::interval(
                    options.frame_interval,
                    frame_tx.clone(),
                    || (),
                ));
            }

            Some(()) = frame_rx.recv() => {
                if frames.is_none() || !shadow.is_bouncing() {
                    continue;
                }
                shadow.step();
                positions.send_replace(shadow.position());
            }
        }
    }

    drop(frames);
    drop(idle);
    debug!("shadow stopped");
    Ok(())
}
