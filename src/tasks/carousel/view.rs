use std::fmt;

use catalog_model::ImageRef;

use crate::config::CarouselOptions;

pub const EMPTY_MESSAGE: &str = "No images to display";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub image: ImageRef,
    /// Accessible label, 1-based.
    pub alt: String,
    /// Only the first slide is fetched eagerly.
    pub priority: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidesView {
    pub slides: Vec<Slide>,
    pub current: usize,
    pub show_arrows: bool,
    pub show_dots: bool,
    pub show_counter: bool,
}

/// Render model of the carousel for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselView {
    Empty { message: &'static str },
    Slides(SlidesView),
}

impl CarouselView {
    pub fn render(images: &[ImageRef], current: usize, options: &CarouselOptions) -> Self {
        if images.is_empty() {
            return Self::Empty {
                message: EMPTY_MESSAGE,
            };
        }
        let multiple = images.len() > 1;
        let slides = images
            .iter()
            .enumerate()
            .map(|(idx, image)| Slide {
                image: image.clone(),
                alt: format!("Image {}", idx + 1),
                priority: idx == 0,
            })
            .collect();
        Self::Slides(SlidesView {
            slides,
            current: current.min(images.len() - 1),
            show_arrows: options.show_navigation && multiple,
            show_dots: options.show_dots && multiple,
            show_counter: multiple,
        })
    }

    pub fn has_navigation(&self) -> bool {
        match self {
            Self::Empty { .. } => false,
            Self::Slides(view) => view.show_arrows || view.show_dots,
        }
    }

    pub fn counter(&self) -> Option<String> {
        match self {
            Self::Slides(view) if view.show_counter => {
                Some(format!("{} / {}", view.current + 1, view.slides.len()))
            }
            _ => None,
        }
    }
}

impl Default for CarouselView {
    fn default() -> Self {
        Self::Empty {
            message: EMPTY_MESSAGE,
        }
    }
}

impl fmt::Display for CarouselView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = match self {
            Self::Empty { message } => return write!(f, "[{message}]"),
            Self::Slides(view) => view,
        };
        let Some(slide) = view.slides.get(view.current) else {
            return Ok(());
        };
        if view.show_arrows {
            f.write_str("< ")?;
        }
        write!(f, "{}", slide.image)?;
        if view.show_arrows {
            f.write_str(" >")?;
        }
        if view.show_dots {
            f.write_str("  ")?;
            for idx in 0..view.slides.len() {
                f.write_str(if idx == view.current { "●" } else { "○" })?;
            }
        }
        if let Some(counter) = self.counter() {
            write!(f, "  [{counter}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ImageRef> {
        (0..n).map(|i| ImageRef::new(format!("shot-{i}.png"))).collect()
    }

    #[test]
    fn empty_images_render_placeholder_without_controls() {
        let view = CarouselView::render(&[], 0, &CarouselOptions::default());
        assert_eq!(
            view,
            CarouselView::Empty {
                message: EMPTY_MESSAGE
            }
        );
        assert!(!view.has_navigation());
        assert_eq!(view.counter(), None);
        assert_eq!(view.to_string(), "[No images to display]");
    }

    #[test]
    fn single_image_hides_controls() {
        let view = CarouselView::render(&images(1), 0, &CarouselOptions::default());
        assert!(!view.has_navigation());
        assert_eq!(view.counter(), None);
        assert_eq!(view.to_string(), "shot-0.png");
    }

    #[test]
    fn multi_image_shows_counter_and_configured_controls() {
        let options = CarouselOptions {
            show_dots: false,
            ..CarouselOptions::default()
        };
        let view = CarouselView::render(&images(3), 1, &options);
        let CarouselView::Slides(slides) = &view else {
            panic!("expected slides");
        };
        assert!(slides.show_arrows);
        assert!(!slides.show_dots);
        assert!(slides.slides[0].priority && !slides.slides[1].priority);
        assert_eq!(slides.slides[2].alt, "Image 3");
        assert_eq!(view.counter().as_deref(), Some("2 / 3"));
        assert_eq!(view.to_string(), "< shot-1.png >  [2 / 3]");
    }

    #[test]
    fn out_of_range_current_displays_nothing() {
        let view = CarouselView::Slides(SlidesView {
            slides: Vec::new(),
            current: 3,
            show_arrows: true,
            show_dots: true,
            show_counter: true,
        });
        assert_eq!(view.to_string(), "");
    }
}
