//! Directional tiling over per-display layout trees, and the geometry needed
//! to draw those layouts.

pub mod layout_engine;

pub mod common {
    pub mod collections;
    pub mod config;
    pub mod log;
}

pub mod model {
    pub mod layout;
    pub mod tree;
}

pub mod sys {
    pub mod geometry;
    pub mod screen;
    pub mod window;
}

pub mod ui {
    pub mod boundary;
    pub mod outline;
    pub mod overlay;
}
