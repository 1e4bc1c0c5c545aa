mod state;
mod view;
mod viewport;

pub use state::{CarouselSM, Phase};
pub use view::{CarouselView, EMPTY_MESSAGE, Slide, SlidesView};
pub use viewport::{ScrollBehavior, ScrollReport, SimulatedViewport, Viewport};

use std::path::PathBuf;

use anyhow::Result;
use catalog_model::ImageRef;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::CarouselOptions;
use crate::events::{CarouselInput, IndexChanged};
use crate::tasks::preload;
use crate::timer::TimerHandle;

type InputReceiver = mpsc::Receiver<CarouselInput>;
type IndexSender = mpsc::Sender<IndexChanged>;

/// Everything the owner hands the carousel when it mounts.
#[derive(Debug, Clone)]
pub struct CarouselProps {
    pub images: Vec<ImageRef>,
    pub selected_index: usize,
    pub options: CarouselOptions,
    /// Where relative image references live, for preloading.
    pub asset_root: PathBuf,
}

struct Carousel<V> {
    sm: CarouselSM<V>,
    images: Vec<ImageRef>,
    options: CarouselOptions,
    autoplay: Option<TimerHandle>,
    ticks: mpsc::Sender<()>,
}

impl<V: Viewport> Carousel<V> {
    fn arm_autoplay(&mut self, ticks_rx: &mut mpsc::Receiver<()>) {
        if self.sm.is_empty() {
            return;
        }
        // Ticks queued by a previous timer must not fire early.
        while ticks_rx.try_recv().is_ok() {}
        let interval = self.options.autoplay_interval;
        debug!(
            interval = %humantime::format_duration(interval),
            "autoplay armed"
        );
        self.autoplay = Some(TimerHandle::interval(interval, self.ticks.clone(), || ()));
    }

    fn disarm_autoplay(&mut self) {
        if self.autoplay.take().is_some() {
            debug!("autoplay disarmed");
        }
    }

    /// Apply one input; returns the index to announce, if any.
    fn handle(&mut self, input: CarouselInput, ticks_rx: &mut mpsc::Receiver<()>) -> Option<usize> {
        match input {
            CarouselInput::Scrolled { scroll_left } => return self.sm.user_scrolled(scroll_left),
            CarouselInput::TouchStart { x } => self.sm.touch_start(x),
            CarouselInput::TouchMove { x } => self.sm.touch_move(x),
            CarouselInput::TouchEnd => {
                if let Some(target) = self.sm.touch_end() {
                    debug!(target, "swipe navigation");
                }
            }
            CarouselInput::Tap {
                on_button,
                window_width,
            } => {
                if let Some(target) = self.sm.tap(on_button, window_width) {
                    debug!(target, "tap navigation");
                }
            }
            CarouselInput::NextClicked => {
                self.sm.go_to_next();
            }
            CarouselInput::PreviousClicked => {
                self.sm.go_to_previous();
            }
            CarouselInput::DotClicked(index) | CarouselInput::Select(index) => {
                self.sm.go_to_image(index);
            }
            CarouselInput::SetAutoplay(true) => {
                if self.autoplay.is_none() {
                    self.arm_autoplay(ticks_rx);
                }
            }
            CarouselInput::SetAutoplay(false) => self.disarm_autoplay(),
        }
        None
    }

    fn view(&self) -> CarouselView {
        CarouselView::render(&self.images, self.sm.current(), &self.options)
    }
}

/// Runs one mounted carousel until `cancel` fires or its input closes.
///
/// Index changes are announced on `index_tx` only once the viewport reports
/// the new slide on `reports`; the latest render model is published on
/// `view_tx`. Reports are drained before further input so each command is
/// confirmed before the next one is applied.
/// Autoplay and preloading are owned by this task and released on every
/// exit path.
pub async fn run<V>(
    props: CarouselProps,
    viewport: V,
    mut reports: mpsc::UnboundedReceiver<ScrollReport>,
    mut inputs: InputReceiver,
    index_tx: IndexSender,
    view_tx: watch::Sender<CarouselView>,
    cancel: CancellationToken,
) -> Result<()>
where
    V: Viewport + Send,
{
    let CarouselProps {
        images,
        selected_index,
        options,
        asset_root,
    } = props;

    let (ticks, mut ticks_rx) = mpsc::channel::<()>(1);
    let mut sm = CarouselSM::new(
        images.len(),
        viewport,
        options.swipe_threshold_px,
        options.mobile_breakpoint_px,
    );
    sm.mount(selected_index);
    let mut carousel = Carousel {
        sm,
        images,
        options,
        autoplay: None,
        ticks,
    };
    info!(
        images = carousel.images.len(),
        selected = carousel.sm.current(),
        "carousel mounted"
    );

    let preload_cancel = cancel.child_token();
    let _preload: Option<PreloadGuard> = if carousel.options.preload && !carousel.images.is_empty() {
        let task = tokio::spawn(preload::run(
            asset_root,
            carousel.images.clone(),
            preload_cancel.clone(),
        ));
        Some(PreloadGuard {
            cancel: preload_cancel,
            task,
        })
    } else {
        None
    };

    if carousel.options.autoplay {
        carousel.arm_autoplay(&mut ticks_rx);
    }
    view_tx.send_replace(carousel.view());

    loop {
        let announce = select! {
            biased;
            _ = cancel.cancelled() => break,
            Some(ScrollReport { scroll_left }) = reports.recv() => {
                carousel.sm.on_scroll(scroll_left)
            }
            maybe_input = inputs.recv() => {
                let Some(input) = maybe_input else {
                    debug!("carousel input closed");
                    break;
                };
                carousel.handle(input, &mut ticks_rx)
            }
            Some(()) = ticks_rx.recv() => {
                if carousel.autoplay.is_some() {
                    carousel.sm.go_to_next();
                }
                None
            }
        };

        view_tx.send_if_modified(|current| {
            let next = carousel.view();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if let Some(index) = announce {
            if index_tx.send(IndexChanged(index)).await.is_err() {
                debug!(index, "no listener for carousel index changes");
            }
        }
    }

    carousel.disarm_autoplay();
    info!("carousel unmounted");
    Ok(())
}

struct PreloadGuard {
    cancel: CancellationToken,
    task: JoinHandle<preload::PreloadReport>,
}

impl Drop for PreloadGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
