use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sys::geometry::Rect;

/// Index of a display as reported by the display service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(usize);

impl ScreenId {
    pub fn new(index: usize) -> ScreenId { ScreenId(index) }

    pub fn get(&self) -> usize { self.0 }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenDescriptor {
    pub id: ScreenId,
    pub frame: Rect,
    /// Area left after panels and docks; the whole frame when absent.
    #[serde(default)]
    pub visible_frame: Option<Rect>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ScreenDescriptor {
    pub fn new(id: ScreenId, frame: Rect) -> Self {
        ScreenDescriptor { id, frame, visible_frame: None, name: None }
    }

    pub fn with_visible_frame(mut self, visible_frame: Rect) -> Self {
        self.visible_frame = Some(visible_frame);
        self
    }

    pub fn usable_area(&self) -> Rect { self.visible_frame.unwrap_or(self.frame) }
}

/// Read-only view of the attached displays.
pub trait DisplaySystem {
    fn screen_count(&self) -> usize;
    fn screen_frame(&self, screen: ScreenId) -> Option<Rect>;
    fn usable_area(&self, screen: ScreenId) -> Option<Rect>;

    fn screen_ids(&self) -> Vec<ScreenId> { (0..self.screen_count()).map(ScreenId::new).collect() }
}

/// Display service backed by a fixed list of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualScreens {
    descriptors: Vec<ScreenDescriptor>,
}

impl VirtualScreens {
    pub fn new(descriptors: Vec<ScreenDescriptor>) -> Self { VirtualScreens { descriptors } }

    pub fn from_frames(frames: impl IntoIterator<Item = Rect>) -> Self {
        Self::new(
            frames
                .into_iter()
                .enumerate()
                .map(|(i, frame)| ScreenDescriptor::new(ScreenId::new(i), frame))
                .collect(),
        )
    }

    pub fn descriptors(&self) -> &[ScreenDescriptor] { &self.descriptors }

    pub fn frames(&self) -> Vec<Rect> { self.descriptors.iter().map(|d| d.frame).collect() }

    fn descriptor(&self, screen: ScreenId) -> Option<&ScreenDescriptor> {
        self.descriptors.iter().find(|d| d.id == screen)
    }
}

impl DisplaySystem for VirtualScreens {
    fn screen_count(&self) -> usize { self.descriptors.len() }

    fn screen_frame(&self, screen: ScreenId) -> Option<Rect> {
        self.descriptor(screen).map(|d| d.frame)
    }

    fn usable_area(&self, screen: ScreenId) -> Option<Rect> {
        self.descriptor(screen).map(ScreenDescriptor::usable_area)
    }

    fn screen_ids(&self) -> Vec<ScreenId> { self.descriptors.iter().map(|d| d.id).collect() }
}
