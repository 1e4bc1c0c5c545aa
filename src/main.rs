//! Binary entrypoint: drives the gallery pipeline from stdin.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser};
use folio_gallery::config::Configuration;
use folio_gallery::events::{
    CarouselInput, GalleryCommand, GallerySnapshot, IndexChanged, ShadowInput, ShadowPosition,
};
use folio_gallery::gallery::GalleryAction;
use folio_gallery::tasks::carousel::{self, CarouselProps, CarouselView, SimulatedViewport};
use folio_gallery::tasks::{gallery, shadow};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Portfolio project gallery driven from the terminal"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Print the flattened (project, image) sequence and exit
    #[arg(long)]
    dump: bool,
    /// Print gallery snapshots as JSON lines
    #[arg(long)]
    json: bool,
    /// Force carousel autoplay on or off regardless of the config
    #[arg(long, value_name = "BOOL")]
    autoplay: Option<bool>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive(format!("folio_gallery={level}").parse()?)
        .add_directive(format!("folio={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Carousel(Vec<CarouselInput>),
    Gallery(GalleryAction),
    Shadow(ShadowInput),
    ShowView,
    ShowShadow,
    Quit,
}

fn parse_f64(raw: Option<&str>, what: &str) -> Result<f64> {
    let raw = raw.ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse()
        .with_context(|| format!("{what} must be a number, got '{raw}'"))
}

fn parse_command(line: &str, viewport_width: f64) -> Result<Option<Command>> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let cmd = match verb {
        "next" => Command::Carousel(vec![CarouselInput::NextClicked]),
        "prev" => Command::Carousel(vec![CarouselInput::PreviousClicked]),
        "go" => {
            let n: usize = parts
                .next()
                .ok_or_else(|| anyhow!("usage: go <slide number>"))?
                .parse()
                .context("slide number must be a positive integer")?;
            if n == 0 {
                bail!("slide numbers start at 1");
            }
            Command::Carousel(vec![CarouselInput::DotClicked(n - 1)])
        }
        "swipe" => {
            let from = parse_f64(parts.next(), "swipe start x")?;
            let to = parse_f64(parts.next(), "swipe end x")?;
            Command::Carousel(vec![
                CarouselInput::TouchStart { x: from },
                CarouselInput::TouchMove { x: to },
                CarouselInput::TouchEnd,
            ])
        }
        "tap" => {
            let window_width = match parts.next() {
                Some(raw) => parse_f64(Some(raw), "window width")?,
                None => viewport_width,
            };
            Command::Carousel(vec![CarouselInput::Tap {
                on_button: false,
                window_width,
            }])
        }
        "scroll" => Command::Carousel(vec![CarouselInput::Scrolled {
            scroll_left: parse_f64(parts.next(), "scroll offset")?,
        }]),
        "autoplay" => match parts.next() {
            Some("on") => Command::Carousel(vec![CarouselInput::SetAutoplay(true)]),
            Some("off") => Command::Carousel(vec![CarouselInput::SetAutoplay(false)]),
            _ => bail!("usage: autoplay on|off"),
        },
        "next-project" => Command::Gallery(GalleryAction::NextProject),
        "prev-project" => Command::Gallery(GalleryAction::PreviousProject),
        "next-image" => Command::Gallery(GalleryAction::NextImage),
        "prev-image" => Command::Gallery(GalleryAction::PreviousImage),
        "pointer" => Command::Shadow(ShadowInput::PointerMoved {
            x: parse_f64(parts.next(), "pointer x")?,
            y: parse_f64(parts.next(), "pointer y")?,
        }),
        "leave" => Command::Shadow(ShadowInput::PointerLeft),
        "enter" => Command::Shadow(ShadowInput::PointerEntered),
        "view" => Command::ShowView,
        "shadow" => Command::ShowShadow,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}'"),
    };
    Ok(Some(cmd))
}

fn print_snapshot(snap: &GallerySnapshot, view: &CarouselView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snap)?);
        return Ok(());
    }
    println!(
        "I've made {} ({}/{}) - image {}/{}",
        snap.project, snap.project_number, snap.project_total, snap.image_number, snap.image_total
    );
    println!("  {view}");
    if let Some(repo) = &snap.repository_link {
        println!("  repository: {repo}");
    }
    if let Some(site) = &snap.site_link {
        println!("  site: {site}");
    }
    Ok(())
}

fn dump_catalog(cfg: &Configuration) {
    let flat = cfg.flattened();
    println!(
        "# {} projects, {} images",
        flat.projects().len(),
        flat.len()
    );
    for (idx, entry) in flat.entries().iter().enumerate() {
        println!("{:>4}: {} / {}", idx, entry.project_name, entry.image);
    }
}

// Blocking reads live on a detached thread so a pending read never holds
// the runtime open at shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!("failed to read stdin: {err}");
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        dump,
        json,
        autoplay,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    if let Some(enabled) = autoplay {
        cfg.carousel.autoplay = enabled;
    }
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    if dump {
        dump_catalog(&cfg);
        return Ok(());
    }

    let catalog = cfg.flattened();

    // Channels (small/bounded)
    let (carousel_tx, carousel_rx) = mpsc::channel::<CarouselInput>(64); // stdin/gallery -> carousel
    let (index_tx, index_rx) = mpsc::channel::<IndexChanged>(16); // carousel -> gallery
    let (command_tx, command_rx) = mpsc::channel::<GalleryCommand>(16); // stdin -> gallery
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<GallerySnapshot>(16); // gallery -> printer
    let (shadow_tx, shadow_rx) = mpsc::channel::<ShadowInput>(64); // stdin -> shadow
    let (view_tx, view_rx) = watch::channel(CarouselView::default());
    let (position_tx, position_rx) = watch::channel(ShadowPosition {
        x: 0.0,
        y: 0.0,
        bouncing: false,
    });

    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let mut tasks = JoinSet::new();

    // Carousel
    tasks.spawn({
        let props = CarouselProps {
            images: catalog.images(),
            selected_index: 0,
            options: cfg.carousel.clone(),
            asset_root: cfg.asset_root.clone(),
        };
        let (viewport, reports) = SimulatedViewport::channel(cfg.carousel.viewport_width_px);
        let cancel = cancel.clone();
        async move {
            carousel::run(props, viewport, reports, carousel_rx, index_tx, view_tx, cancel)
                .await
                .context("carousel task failed")
        }
    });

    // Gallery (page composition)
    tasks.spawn({
        let catalog = catalog.clone();
        let to_carousel = carousel_tx.clone();
        let cancel = cancel.clone();
        async move {
            gallery::run(catalog, index_rx, command_rx, to_carousel, snapshot_tx, cancel)
                .await
                .context("gallery task failed")
        }
    });

    // Shadow
    tasks.spawn({
        let options = cfg.shadow.clone();
        let cancel = cancel.clone();
        async move {
            shadow::run(options, shadow_rx, position_tx, cancel)
                .await
                .context("shadow task failed")
        }
    });

    // Printer
    tasks.spawn({
        let view_rx = view_rx.clone();
        let cancel = cancel.clone();
        async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    maybe_snap = snapshot_rx.recv() => {
                        let Some(snap) = maybe_snap else { break };
                        let view = view_rx.borrow().clone();
                        print_snapshot(&snap, &view, json)?;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        }
    });

    // Stdin commands; EOF or `quit` shuts the pipeline down.
    let viewport_width = cfg.carousel.viewport_width_px;
    let mut lines = spawn_stdin_reader();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            tracing::info!("stdin closed; initiating shutdown");
            break;
        };
        let command = match parse_command(line.trim(), viewport_width) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        };
        match command {
            Command::Carousel(inputs) => {
                for input in inputs {
                    if carousel_tx.send(input).await.is_err() {
                        tracing::warn!("carousel is gone");
                        break;
                    }
                }
            }
            Command::Gallery(action) => {
                if command_tx.send(GalleryCommand(action)).await.is_err() {
                    tracing::warn!("gallery is gone");
                }
            }
            Command::Shadow(input) => {
                if shadow_tx.send(input).await.is_err() {
                    tracing::warn!("shadow is gone");
                }
            }
            Command::ShowView => println!("{}", *view_rx.borrow()),
            Command::ShowShadow => {
                let pos = *position_rx.borrow();
                if json {
                    println!("{}", serde_json::to_string(&pos)?);
                } else {
                    println!(
                        "shadow at ({:.1}, {:.1}){}",
                        pos.x,
                        pos.y,
                        if pos.bouncing { " bouncing" } else { "" }
                    );
                }
            }
            Command::Quit => break,
        }
    }
    cancel.cancel();

    // Drain JoinSet (wait for other tasks to complete)
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_swipe_into_touch_sequence() {
        let cmd = parse_command("swipe 200 140", 1024.0).unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Carousel(vec![
                CarouselInput::TouchStart { x: 200.0 },
                CarouselInput::TouchMove { x: 140.0 },
                CarouselInput::TouchEnd,
            ])
        );
    }

    #[test]
    fn go_is_one_based() {
        let cmd = parse_command("go 3", 1024.0).unwrap().unwrap();
        assert_eq!(cmd, Command::Carousel(vec![CarouselInput::DotClicked(2)]));
        assert!(parse_command("go 0", 1024.0).is_err());
    }

    #[test]
    fn tap_defaults_to_viewport_width() {
        let cmd = parse_command("tap", 375.0).unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Carousel(vec![CarouselInput::Tap {
                on_button: false,
                window_width: 375.0
            }])
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("", 1024.0).unwrap(), None);
        assert!(parse_command("dance", 1024.0).is_err());
        assert!(parse_command("autoplay maybe", 1024.0).is_err());
        assert_eq!(
            parse_command("next-project", 1024.0).unwrap(),
            Some(Command::Gallery(GalleryAction::NextProject))
        );
    }
}
