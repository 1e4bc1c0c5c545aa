use anyhow::Result;
use catalog_model::FlattenedCatalog;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{CarouselInput, GalleryCommand, GallerySnapshot, IndexChanged};
use crate::gallery::{GalleryAction, GalleryState};

pub fn snapshot(state: &GalleryState, catalog: &FlattenedCatalog) -> Option<GallerySnapshot> {
    let entry = state.current_entry(catalog)?;
    let project = state.current_project(catalog)?;
    let project_pos = state.project_position(catalog)?;
    let image_pos = state.image_position(catalog)?;
    Some(GallerySnapshot {
        index: state.selected_index(),
        project: project.name.clone(),
        image: entry.image.to_string(),
        repository_link: project.repository_link.clone(),
        site_link: project.site_link.clone(),
        project_number: project_pos.number,
        project_total: project_pos.total,
        image_number: image_pos.number,
        image_total: image_pos.total,
    })
}

/// Owns the gallery cursor for the page.
///
/// Rules:
/// - Carousel index changes are adopted verbatim (`SetIndex`).
/// - Navigation commands go through the reducer; when the cursor moves the
///   carousel is told to select the new slide.
/// - A snapshot is published at start-up and whenever the cursor moves.
pub async fn run(
    catalog: FlattenedCatalog,
    mut index_rx: Receiver<IndexChanged>,
    mut commands: Receiver<GalleryCommand>,
    to_carousel: Sender<CarouselInput>,
    snapshots: Sender<GallerySnapshot>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut state = GalleryState::new();

    if let Some(initial) = snapshot(&state, &catalog) {
        info!(project = %initial.project, "gallery ready");
        if snapshots.send(initial).await.is_err() {
            return Ok(());
        }
    }

    loop {
        let (next, from_carousel) = select! {
            _ = cancel.cancelled() => break,

            maybe_index = index_rx.recv() => {
                let Some(IndexChanged(index)) = maybe_index else {
                    debug!("carousel stopped reporting index changes");
                    break;
                };
                if index >= catalog.len() {
                    warn!(index, len = catalog.len(), "ignoring out-of-range carousel index");
                    continue;
                }
                (state.reduce(GalleryAction::SetIndex(index), &catalog), true)
            }

            maybe_cmd = commands.recv() => {
                let Some(GalleryCommand(action)) = maybe_cmd else {
                    debug!("gallery command channel closed");
                    break;
                };
                let next = state.reduce(action, &catalog);
                if next == state {
                    debug!(?action, index = state.selected_index(), "navigation request absorbed");
                }
                (next, false)
            }
        };

        if next == state {
            continue;
        }
        state = next;
        let index = state.selected_index();

        if !from_carousel && to_carousel.send(CarouselInput::Select(index)).await.is_err() {
            warn!("carousel channel closed");
            break;
        }

        if let Some(snap) = snapshot(&state, &catalog) {
            debug!(index, project = %snap.project, "gallery cursor moved");
            if snapshots.send(snap).await.is_err() {
                debug!("snapshot listener gone");
                break;
            }
        }
    }

    Ok(())
}
