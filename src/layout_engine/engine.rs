use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::leaves::{Leaf, collect_leaves, find_leaf_for_point, nearest_leaf, span_of};
use super::navigation::{choose_adjacent, choose_adjacent_to_span};
use super::{Direction, LayoutSource, pick_display_in_direction};
use crate::common::config::NavigationSettings;
use crate::model::tree::{LayoutTree, NodeId};
use crate::sys::geometry::{Point, Rect};
use crate::sys::screen::{DisplaySystem, ScreenId};
use crate::sys::window::{WindowId, WindowSystem, ensure_normal};

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    /// Move the focused window into the neighbouring tile, continuing onto the
    /// next display when there is none.
    MoveWindow(Direction),
    /// Grow the focused window over the neighbouring tile.
    SpanWindow(Direction),
}

impl LayoutCommand {
    pub fn direction(&self) -> Direction {
        match self {
            LayoutCommand::MoveWindow(d) | LayoutCommand::SpanWindow(d) => *d,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    NoFocusedWindow,
    NoFrame,
    NoDisplay,
    NoLeaves,
    NoNeighbor,
    NoDisplayInDirection,
}

#[must_use]
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventResponse {
    Moved {
        window: WindowId,
        display: ScreenId,
        rect: Rect,
        /// The tile that was moved into or added to the span.
        target: NodeId,
    },
    NoOp(NoOpReason),
}

impl EventResponse {
    pub fn is_noop(&self) -> bool { matches!(self, EventResponse::NoOp(_)) }
}

pub struct NavigationEngine {
    source: LayoutSource,
    settings: NavigationSettings,
    last_tree: Option<(ScreenId, LayoutTree)>,
}

impl NavigationEngine {
    pub fn new(source: LayoutSource, settings: NavigationSettings) -> Self {
        NavigationEngine { source, settings, last_tree: None }
    }

    pub fn settings(&self) -> &NavigationSettings { &self.settings }

    pub fn set_settings(&mut self, settings: NavigationSettings) { self.settings = settings; }

    /// The tree built by the last successful command, with its target
    /// highlighted.
    pub fn last_tree(&self) -> Option<(ScreenId, &LayoutTree)> {
        self.last_tree.as_ref().map(|(display, tree)| (*display, tree))
    }

    /// The layout of `display` with rectangles computed over its usable area.
    pub fn computed_tree(&self, screens: &impl DisplaySystem, display: ScreenId) -> Option<LayoutTree> {
        let area = screens.usable_area(display)?;
        let mut tree = self.source.tree_for_display(display)?;
        tree.calculate_rects(area.x, area.y, area.width, area.height);
        Some(tree)
    }

    #[instrument(skip(self, windows, screens))]
    pub fn handle_command(
        &mut self,
        windows: &mut impl WindowSystem,
        screens: &impl DisplaySystem,
        command: LayoutCommand,
    ) -> EventResponse {
        let Some(wid) = windows.focused_window() else {
            return EventResponse::NoOp(NoOpReason::NoFocusedWindow);
        };
        ensure_normal(windows, wid);
        let Some(frame) = windows.frame(wid) else {
            return EventResponse::NoOp(NoOpReason::NoFrame);
        };
        let Some(display) = windows.screen_of(wid) else {
            return EventResponse::NoOp(NoOpReason::NoDisplay);
        };
        if screens.usable_area(display).is_none() {
            return EventResponse::NoOp(NoOpReason::NoDisplay);
        }
        let Some(tree) = self.computed_tree(screens, display) else {
            return EventResponse::NoOp(NoOpReason::NoLeaves);
        };
        debug!("Tree:\n{}", tree.draw_tree().trim());

        let leaves = collect_leaves(&tree);
        let center = frame.center();
        let Some(current) =
            find_leaf_for_point(&leaves, center).or_else(|| nearest_leaf(&leaves, center))
        else {
            return EventResponse::NoOp(NoOpReason::NoLeaves);
        };
        debug!(?frame, current = ?current.rect);

        match command {
            LayoutCommand::SpanWindow(direction) => {
                let span = span_of(&leaves, &frame).unwrap_or(current.rect);
                let Some(next) = choose_adjacent_to_span(&leaves, &span, direction) else {
                    return EventResponse::NoOp(NoOpReason::NoNeighbor);
                };
                let rect = span.union(&next.rect);
                debug!(?span, ?rect, "growing span");
                self.finish(windows, wid, display, tree, next.node, rect)
            }
            LayoutCommand::MoveWindow(direction) => {
                if let Some(next) = choose_adjacent(&leaves, &current.rect, direction) {
                    let Leaf { node, rect } = *next;
                    return self.finish(windows, wid, display, tree, node, rect);
                }
                if !self.settings.cross_display {
                    return EventResponse::NoOp(NoOpReason::NoNeighbor);
                }
                self.move_across_displays(windows, screens, wid, display, center, direction)
            }
        }
    }

    fn move_across_displays(
        &mut self,
        windows: &mut impl WindowSystem,
        screens: &impl DisplaySystem,
        wid: WindowId,
        from: ScreenId,
        center: Point,
        direction: Direction,
    ) -> EventResponse {
        let to = pick_display_in_direction(screens, from, direction);
        if to == from {
            return EventResponse::NoOp(NoOpReason::NoDisplayInDirection);
        }
        debug!(%from, %to, "crossing displays");
        let Some(tree) = self.computed_tree(screens, to) else {
            return EventResponse::NoOp(NoOpReason::NoLeaves);
        };
        let leaves = collect_leaves(&tree);
        let Some(&Leaf { node, rect }) = nearest_leaf(&leaves, center) else {
            return EventResponse::NoOp(NoOpReason::NoLeaves);
        };
        self.finish(windows, wid, to, tree, node, rect)
    }

    fn finish(
        &mut self,
        windows: &mut impl WindowSystem,
        wid: WindowId,
        screen: ScreenId,
        mut tree: LayoutTree,
        target: NodeId,
        rect: Rect,
    ) -> EventResponse {
        debug!(?wid, %screen, ?rect, "moving window");
        windows.move_resize(wid, rect);
        tree.set_highlighted(Some(target));
        self.last_tree = Some((screen, tree));
        EventResponse::Moved { window: wid, display: screen, rect, target }
    }
}
