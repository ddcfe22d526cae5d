mod displays;
pub mod engine;
pub(crate) mod graph;
pub mod leaves;
pub mod navigation;
pub mod provider;
pub mod scoring;

pub use displays::pick_display_in_direction;
pub use engine::{EventResponse, LayoutCommand, NavigationEngine, NoOpReason};
pub use graph::{Direction, Orientation};
pub use leaves::{Leaf, collect_leaves};
pub use navigation::{choose_adjacent, choose_adjacent_to_span};
pub use provider::{
    DefaultLayout, FileLayouts, GridLayout, LayoutProvider, LayoutSource, StaticLayouts,
};
