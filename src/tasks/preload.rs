use std::path::{Path, PathBuf};

use catalog_model::ImageRef;
use tokio::select;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Remote references the preloader does not fetch.
    pub skipped: usize,
}

// Decoding the header is enough to prove the file is a readable image and
// pulls it into the page cache.
fn probe(path: &Path) -> Result<(u32, u32), Error> {
    image::image_dimensions(path).map_err(|source| Error::Preload {
        path: path.to_path_buf(),
        source,
    })
}

/// Warm every local image concurrently on the blocking pool.
///
/// Best effort: failures are logged and counted, never propagated.
/// Returns early with a partial report when `cancel` fires.
pub async fn run(root: PathBuf, images: Vec<ImageRef>, cancel: CancellationToken) -> PreloadReport {
    let mut report = PreloadReport::default();
    let mut tasks: JoinSet<Result<(PathBuf, (u32, u32)), Error>> = JoinSet::new();

    for image in images {
        if image.is_remote() {
            debug!(%image, "skipping remote image");
            report.skipped += 1;
            continue;
        }
        let path = image.resolve_against(&root);
        tasks.spawn(async move {
            let probe_path = path.clone();
            match tokio::task::spawn_blocking(move || probe(&probe_path)).await {
                Ok(res) => res.map(|dims| (path, dims)),
                Err(_) => Err(Error::PreloadJoin(path)),
            }
        });
    }

    loop {
        select! {
            _ = cancel.cancelled() => {
                debug!(pending = tasks.len(), "preload cancelled");
                tasks.abort_all();
                return report;
            }
            joined = tasks.join_next() => {
                let Some(joined) = joined else { break };
                match joined {
                    Ok(Ok((path, (width, height)))) => {
                        debug!(path = %path.display(), width, height, "image preloaded");
                        report.succeeded += 1;
                    }
                    Ok(Err(err)) => {
                        warn!(error = %err, "failed to preload image");
                        report.failed += 1;
                    }
                    Err(err) => {
                        warn!(error = %err, "preload task aborted");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    if report.failed > 0 {
        warn!(
            succeeded = report.succeeded,
            failed = report.failed,
            "image preloading finished with failures"
        );
    } else {
        info!(succeeded = report.succeeded, "all images preloaded");
    }
    report
}
