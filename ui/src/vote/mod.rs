pub mod controller;
pub mod store;
pub mod tally;

mod view;
pub use view::VotePanel;
