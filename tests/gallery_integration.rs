use std::path::PathBuf;
use std::time::Duration;

use folio_gallery::config::CarouselOptions;
use folio_gallery::events::{CarouselInput, GalleryCommand, GallerySnapshot, IndexChanged};
use folio_gallery::gallery::GalleryAction;
use folio_gallery::tasks::carousel::{self, CarouselProps, CarouselView, SimulatedViewport};
use folio_gallery::tasks::gallery;
use folio_gallery::{Catalog, FlattenedCatalog, Project};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn catalog() -> FlattenedCatalog {
    Catalog::new(vec![
        Project::new("token dashboards", ["dash-1.png", "dash-2.png"])
            .with_repository_link("https://github.com/example/token-dashboard"),
        Project::new("web wallets", ["wallet-1.png"]).with_site_link("https://wallet.example"),
    ])
    .flatten()
}

async fn next_snapshot(rx: &mut mpsc::Receiver<GallerySnapshot>) -> GallerySnapshot {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timeout waiting for snapshot")
        .expect("gallery closed")
}

async fn assert_no_snapshot(rx: &mut mpsc::Receiver<GallerySnapshot>) {
    let res = timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(!matches!(res, Ok(Some(_))), "unexpected snapshot: {res:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn commands_move_cursor_and_select_carousel_slide() {
    let (index_tx, index_rx) = mpsc::channel::<IndexChanged>(16);
    let (cmd_tx, cmd_rx) = mpsc::channel::<GalleryCommand>(16);
    let (carousel_tx, mut carousel_rx) = mpsc::channel::<CarouselInput>(16);
    let (snap_tx, mut snap_rx) = mpsc::channel::<GallerySnapshot>(16);
    let cancel = CancellationToken::new();

    let handle = tokio::spawn(gallery::run(
        catalog(),
        index_rx,
        cmd_rx,
        carousel_tx,
        snap_tx,
        cancel.clone(),
    ));

    let initial = next_snapshot(&mut snap_rx).await;
    assert_eq!(initial.index, 0);
    assert_eq!(initial.project, "token dashboards");
    assert_eq!((initial.image_number, initial.image_total), (1, 2));
    assert_eq!(
        initial.repository_link.as_deref(),
        Some("https://github.com/example/token-dashboard")
    );
    assert!(initial.site_link.is_none());

    cmd_tx
        .send(GalleryCommand(GalleryAction::NextProject))
        .await
        .unwrap();
    let moved = next_snapshot(&mut snap_rx).await;
    assert_eq!(moved.index, 2);
    assert_eq!(moved.project, "web wallets");
    assert_eq!((moved.project_number, moved.project_total), (2, 2));
    assert_eq!(moved.site_link.as_deref(), Some("https://wallet.example"));
    assert_eq!(carousel_rx.recv().await, Some(CarouselInput::Select(2)));

    // Last project: no wrap, nothing published, nothing sent.
    cmd_tx
        .send(GalleryCommand(GalleryAction::NextProject))
        .await
        .unwrap();
    assert_no_snapshot(&mut snap_rx).await;
    assert!(carousel_rx.try_recv().is_err());

    // Carousel-originated changes are adopted without echoing back.
    index_tx.send(IndexChanged(1)).await.unwrap();
    let adopted = next_snapshot(&mut snap_rx).await;
    assert_eq!(adopted.index, 1);
    assert_eq!((adopted.image_number, adopted.image_total), (2, 2));
    assert!(carousel_rx.try_recv().is_err());

    index_tx.send(IndexChanged(42)).await.unwrap();
    assert_no_snapshot(&mut snap_rx).await;

    cancel.cancel();
    let _ = handle.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gallery_and_carousel_converge() {
    let flat = catalog();
    let (carousel_tx, carousel_rx) = mpsc::channel::<CarouselInput>(64);
    let (index_tx, index_rx) = mpsc::channel::<IndexChanged>(16);
    let (cmd_tx, cmd_rx) = mpsc::channel::<GalleryCommand>(16);
    let (snap_tx, mut snap_rx) = mpsc::channel::<GallerySnapshot>(16);
    let (view_tx, view_rx) = watch::channel(CarouselView::default());
    let cancel = CancellationToken::new();
    let (viewport, reports) = SimulatedViewport::channel(800.0);

    let carousel = tokio::spawn(carousel::run(
        CarouselProps {
            images: flat.images(),
            selected_index: 0,
            options: CarouselOptions {
                preload: false,
                ..CarouselOptions::default()
            },
            asset_root: PathBuf::from("."),
        },
        viewport,
        reports,
        carousel_rx,
        index_tx,
        view_tx,
        cancel.clone(),
    ));
    let page = tokio::spawn(gallery::run(
        flat,
        index_rx,
        cmd_rx,
        carousel_tx.clone(),
        snap_tx,
        cancel.clone(),
    ));

    assert_eq!(next_snapshot(&mut snap_rx).await.index, 0);

    cmd_tx
        .send(GalleryCommand(GalleryAction::NextProject))
        .await
        .unwrap();
    let snap = next_snapshot(&mut snap_rx).await;
    assert_eq!(snap.project, "web wallets");
    // The carousel's confirmation of slide 2 must not produce a second snapshot.
    assert_no_snapshot(&mut snap_rx).await;
    match &*view_rx.borrow() {
        CarouselView::Slides(slides) => assert_eq!(slides.current, 2),
        other => panic!("unexpected view {other:?}"),
    }

    // Swiping left on the last slide wraps to the first project.
    for input in [
        CarouselInput::TouchStart { x: 300.0 },
        CarouselInput::TouchMove { x: 120.0 },
        CarouselInput::TouchEnd,
    ] {
        carousel_tx.send(input).await.unwrap();
    }
    let wrapped = next_snapshot(&mut snap_rx).await;
    assert_eq!(wrapped.index, 0);
    assert_eq!(wrapped.project, "token dashboards");

    cancel.cancel();
    let _ = carousel.await;
    let _ = page.await;
}
