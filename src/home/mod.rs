//! The homepage: multi-feed aggregation and the hero carousel.

mod aggregator;
mod carousel;

pub use aggregator::{AggregateResult, HomeAggregator, HomePage};
pub use carousel::{Direction, HeroCarousel, RotationTimer};
