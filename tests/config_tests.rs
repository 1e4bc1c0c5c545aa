use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use folio_gallery::ImageRef;
use folio_gallery::config::{CarouselOptions, Configuration};

const SAMPLE: &str = r#"
asset-root: "/srv/portfolio/assets"
projects:
  - name: token dashboards
    repository-link: https://github.com/example/token-dashboard
    site-link: https://vip.example.io
    images: [token-dashboard-1.png, token-dashboard-2.png, token-dashboard-3.png]
  - name: points applications
    site-link: https://quest.example.xyz/
    images: [points-app-1.png, points-app-2.png]
carousel:
  autoplay: true
  autoplay-interval: 5s
  show-dots: false
shadow:
  inactivity-delay: 1500ms
"#;

#[test]
fn parse_kebab_case_config() {
    let cfg: Configuration = serde_yaml::from_str(SAMPLE).unwrap();
    assert_eq!(cfg.asset_root, PathBuf::from("/srv/portfolio/assets"));
    assert_eq!(cfg.projects.len(), 2);
    assert!(cfg.carousel.autoplay);
    assert_eq!(cfg.carousel.autoplay_interval, Duration::from_secs(5));
    assert!(!cfg.carousel.show_dots);
    assert!(cfg.carousel.show_navigation);
    assert_eq!(cfg.shadow.inactivity_delay, Duration::from_millis(1500));
    cfg.validated().expect("sample config is valid");
}

#[test]
fn defaults_match_site_behaviour() {
    let cfg: Configuration = serde_yaml::from_str(
        r#"
projects:
  - name: solo
    images: [a.png]
"#,
    )
    .unwrap();
    let carousel = &cfg.carousel;
    assert!(!carousel.autoplay);
    assert_eq!(carousel.autoplay_interval, Duration::from_millis(3000));
    assert!((carousel.swipe_threshold_px - 50.0).abs() < f64::EPSILON);
    assert!((carousel.mobile_breakpoint_px - 768.0).abs() < f64::EPSILON);
    assert!(carousel.preload);
    assert!((cfg.shadow.radius_px - 400.0).abs() < f64::EPSILON);
    assert_eq!(cfg.shadow.inactivity_delay, Duration::from_secs(2));
    assert!((cfg.shadow.speed_px_per_frame - 1.8).abs() < 1e-9);
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let err = serde_yaml::from_str::<Configuration>("photo-library-path: /photos\n").unwrap_err();
    assert!(err.to_string().contains("unknown field"), "{err}");
}

#[test]
fn unknown_carousel_key_is_rejected() {
    let yaml = r#"
carousel:
  autoplay-every: 3s
"#;
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn validation_rejects_empty_catalog() {
    let cfg: Configuration = serde_yaml::from_str("asset-root: .\n").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(format!("{err:#}").contains("invalid catalog"), "{err:#}");
}

#[test]
fn validation_rejects_duplicate_project_names() {
    let yaml = r#"
projects:
  - name: web wallets
    images: [a.png]
  - name: web wallets
    images: [b.png]
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(format!("{err:#}").contains("duplicate project name"), "{err:#}");
}

#[test]
fn validation_rejects_zero_autoplay_interval() {
    let yaml = r#"
projects:
  - name: a
    images: [a.png]
carousel:
  autoplay-interval: 0s
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("autoplay-interval"), "{err}");
}

#[test]
fn validation_rejects_non_positive_swipe_threshold() {
    let mut cfg: Configuration = serde_yaml::from_str(SAMPLE).unwrap();
    cfg.carousel = CarouselOptions {
        swipe_threshold_px: 0.0,
        ..CarouselOptions::default()
    };
    assert!(cfg.validated().is_err());
}

#[test]
fn loads_from_file_and_resolves_images() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    let flat = cfg.flattened();
    assert_eq!(flat.len(), 5);
    assert_eq!(
        ImageRef::from("points-app-1.png").resolve_against(&cfg.asset_root),
        PathBuf::from("/srv/portfolio/assets/points-app-1.png")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Configuration::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, folio_gallery::error::Error::Io(_)));
}
