//! Where per-display layouts come from.
//!
//! A [`LayoutProvider`] yields stored definitions; a [`DefaultLayout`] fills
//! in whenever the provider has nothing usable. [`LayoutSource`] ties the two
//! together so callers always get a tree.

use std::{fs, io};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::collections::HashMap;
use crate::model::layout::LayoutDef;
use crate::model::tree::LayoutTree;
use crate::sys::screen::ScreenId;

pub trait LayoutProvider {
    /// The stored layout for `display`. `Ok(None)` means nothing is stored.
    fn load_layout(&self, display: ScreenId) -> anyhow::Result<Option<LayoutDef>>;
}

/// Strategy used when no stored layout is available.
pub trait DefaultLayout {
    fn default_layout(&self, display: ScreenId) -> LayoutDef;
}

/// Layouts held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLayouts {
    layouts: HashMap<ScreenId, LayoutDef>,
}

impl StaticLayouts {
    pub fn new() -> Self { Self::default() }

    pub fn with_layout(mut self, display: ScreenId, layout: LayoutDef) -> Self {
        self.layouts.insert(display, layout);
        self
    }

    pub fn insert(&mut self, display: ScreenId, layout: LayoutDef) {
        self.layouts.insert(display, layout);
    }
}

impl FromIterator<(ScreenId, LayoutDef)> for StaticLayouts {
    fn from_iter<I: IntoIterator<Item = (ScreenId, LayoutDef)>>(iter: I) -> Self {
        StaticLayouts { layouts: iter.into_iter().collect() }
    }
}

impl LayoutProvider for StaticLayouts {
    fn load_layout(&self, display: ScreenId) -> anyhow::Result<Option<LayoutDef>> {
        Ok(self.layouts.get(&display).cloned())
    }
}

/// Layouts read from a RON map of display index to definition, e.g.
///
/// ```ron
/// {
///     0: (split: Some((orientation: horizontal, children: [(margin: 0.0), (margin: 0.0)]))),
/// }
/// ```
///
/// The file is re-read on every request so edits apply immediately. A
/// missing file means no layouts are stored.
#[derive(Debug, Clone)]
pub struct FileLayouts {
    path: PathBuf,
}

impl FileLayouts {
    pub fn new(path: impl Into<PathBuf>) -> Self { FileLayouts { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// Every stored layout. Unlike [`LayoutProvider::load_layout`], a missing
    /// file is an error here.
    pub fn read_all(&self) -> anyhow::Result<HashMap<usize, LayoutDef>> {
        self.read_if_present()?
            .with_context(|| format!("{} does not exist", self.path.display()))
    }

    fn read_if_present(&self) -> anyhow::Result<Option<HashMap<usize, LayoutDef>>> {
        let buf = match fs::read_to_string(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.path.display())),
        };
        ron::from_str(&buf).map(Some).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl LayoutProvider for FileLayouts {
    fn load_layout(&self, screen: ScreenId) -> anyhow::Result<Option<LayoutDef>> {
        let Some(mut layouts) = self.read_if_present()? else {
            debug!(path = %self.path.display(), "no layouts file");
            return Ok(None);
        };
        Ok(layouts.remove(&screen.get()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
}

impl Default for GridLayout {
    fn default() -> Self { GridLayout { columns: 2, rows: 2 } }
}

impl DefaultLayout for GridLayout {
    fn default_layout(&self, _display: ScreenId) -> LayoutDef {
        LayoutDef::grid(self.columns, self.rows)
    }
}

/// A provider paired with the fallback used when it fails or is empty.
pub struct LayoutSource {
    provider: Box<dyn LayoutProvider>,
    fallback: Box<dyn DefaultLayout>,
}

impl LayoutSource {
    pub fn new(provider: impl LayoutProvider + 'static, fallback: impl DefaultLayout + 'static) -> Self {
        LayoutSource {
            provider: Box::new(provider),
            fallback: Box::new(fallback),
        }
    }

    /// Only the default strategy, no stored layouts.
    pub fn defaults_only(fallback: impl DefaultLayout + 'static) -> Self {
        Self::new(StaticLayouts::new(), fallback)
    }

    /// The layout for `screen`, without computed rectangles.
    ///
    /// Provider errors and invalid stored definitions are logged and replaced
    /// by the default layout. `None` when the default strategy itself yields
    /// an invalid definition.
    pub fn tree_for_display(&self, screen: ScreenId) -> Option<LayoutTree> {
        match self.provider.load_layout(screen) {
            Ok(Some(def)) => match LayoutTree::from_def(&def) {
                Ok(tree) => return Some(tree),
                Err(e) => warn!(%screen, "invalid layout, using default: {e}"),
            },
            Ok(None) => {}
            Err(e) => warn!(%screen, "failed to load layout, using default: {e:#}"),
        }
        match LayoutTree::from_def(&self.fallback.default_layout(screen)) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!(%screen, "default layout is invalid: {e}");
                None
            }
        }
    }
}

impl Default for LayoutSource {
    fn default() -> Self { Self::defaults_only(GridLayout::default()) }
}
