pub mod geometry;

mod view;
pub use view::SeriesChart;
