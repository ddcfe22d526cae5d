use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::common::collections::HashMap;
use crate::sys::geometry::Rect;
use crate::sys::screen::ScreenId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(id: u32) -> WindowId { WindowId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowState {
    #[serde(default)]
    pub maximized: bool,
    #[serde(default)]
    pub fullscreen: bool,
}

impl WindowState {
    pub fn is_normal(&self) -> bool { !self.maximized && !self.fullscreen }
}

/// The window operations navigation needs from the host.
pub trait WindowSystem {
    fn focused_window(&self) -> Option<WindowId>;
    fn frame(&self, wid: WindowId) -> Option<Rect>;
    fn screen_of(&self, wid: WindowId) -> Option<ScreenId>;
    fn state(&self, wid: WindowId) -> WindowState;
    fn unmaximize(&mut self, wid: WindowId);
    fn unfullscreen(&mut self, wid: WindowId);
    fn move_resize(&mut self, wid: WindowId, frame: Rect);
}

/// Leaves fullscreen and maximized states so the window can be resized freely.
pub fn ensure_normal(windows: &mut impl WindowSystem, wid: WindowId) {
    let state = windows.state(wid);
    if state.fullscreen {
        debug!(?wid, "leaving fullscreen");
        windows.unfullscreen(wid);
    }
    if state.maximized {
        debug!(?wid, "unmaximizing");
        windows.unmaximize(wid);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VirtualWindow {
    pub frame: Rect,
    pub screen: ScreenId,
    #[serde(default)]
    pub state: WindowState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    Unmaximize(WindowId),
    Unfullscreen(WindowId),
    MoveResize(WindowId, Rect),
}

/// In-memory window service. Every mutating call is recorded so callers
/// can assert on exactly what would have been sent to a real window server.
#[derive(Debug, Default)]
pub struct VirtualWindows {
    windows: HashMap<WindowId, VirtualWindow>,
    focused: Option<WindowId>,
    screen_frames: Vec<(ScreenId, Rect)>,
    requests: Vec<Request>,
}

impl VirtualWindows {
    /// `screen_frames` is used to work out which display a window lands on
    /// after it is moved.
    pub fn new(screen_frames: Vec<(ScreenId, Rect)>) -> Self {
        VirtualWindows { screen_frames, ..Default::default() }
    }

    pub fn add_window(&mut self, wid: WindowId, window: VirtualWindow) {
        self.windows.insert(wid, window);
    }

    pub fn focus(&mut self, wid: Option<WindowId>) { self.focused = wid; }

    pub fn window(&self, wid: WindowId) -> Option<&VirtualWindow> { self.windows.get(&wid) }

    pub fn requests(&self) -> &[Request] { &self.requests }

    pub fn take_requests(&mut self) -> Vec<Request> { std::mem::take(&mut self.requests) }

    fn screen_containing(&self, frame: Rect) -> Option<ScreenId> {
        let center = frame.center();
        self.screen_frames.iter().find(|(_, f)| f.contains(center)).map(|(id, _)| *id)
    }
}

impl WindowSystem for VirtualWindows {
    fn focused_window(&self) -> Option<WindowId> { self.focused }

    fn frame(&self, wid: WindowId) -> Option<Rect> { self.windows.get(&wid).map(|w| w.frame) }

    fn screen_of(&self, wid: WindowId) -> Option<ScreenId> {
        self.windows.get(&wid).map(|w| w.screen)
    }

    fn state(&self, wid: WindowId) -> WindowState {
        self.windows.get(&wid).map(|w| w.state).unwrap_or_default()
    }

    fn unmaximize(&mut self, wid: WindowId) {
        self.requests.push(Request::Unmaximize(wid));
        if let Some(window) = self.windows.get_mut(&wid) {
            window.state.maximized = false;
        }
    }

    fn unfullscreen(&mut self, wid: WindowId) {
        self.requests.push(Request::Unfullscreen(wid));
        if let Some(window) = self.windows.get_mut(&wid) {
            window.state.fullscreen = false;
        }
    }

    fn move_resize(&mut self, wid: WindowId, frame: Rect) {
        trace!(?wid, ?frame, "move_resize");
        self.requests.push(Request::MoveResize(wid, frame));
        let screen = self.screen_containing(frame);
        if let Some(window) = self.windows.get_mut(&wid) {
            window.frame = frame;
            if let Some(screen) = screen {
                window.screen = screen;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn screens() -> Vec<(ScreenId, Rect)> {
        vec![
            (ScreenId::new(0), Rect::new(0.0, 0.0, 1000.0, 1000.0)),
            (ScreenId::new(1), Rect::new(1000.0, 0.0, 1000.0, 1000.0)),
        ]
    }

    #[test]
    fn ensure_normal_only_touches_abnormal_state() {
        let mut windows = VirtualWindows::new(screens());
        let plain = WindowId::new(1);
        let maxed = WindowId::new(2);
        windows.add_window(plain, VirtualWindow {
            frame: Rect::new(0.0, 0.0, 100.0, 100.0),
            screen: ScreenId::new(0),
            state: WindowState::default(),
        });
        windows.add_window(maxed, VirtualWindow {
            frame: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            screen: ScreenId::new(0),
            state: WindowState { maximized: true, fullscreen: true },
        });

        ensure_normal(&mut windows, plain);
        assert!(windows.requests().is_empty());

        ensure_normal(&mut windows, maxed);
        assert_eq!(windows.take_requests(), vec![
            Request::Unfullscreen(maxed),
            Request::Unmaximize(maxed),
        ]);
        assert!(windows.state(maxed).is_normal());
    }

    #[test]
    fn move_resize_tracks_the_landing_screen() {
        let mut windows = VirtualWindows::new(screens());
        let wid = WindowId::new(1);
        windows.add_window(wid, VirtualWindow {
            frame: Rect::new(0.0, 0.0, 500.0, 500.0),
            screen: ScreenId::new(0),
            state: WindowState::default(),
        });
        windows.move_resize(wid, Rect::new(1000.0, 0.0, 500.0, 500.0));
        assert_eq!(windows.screen_of(wid), Some(ScreenId::new(1)));
        assert_eq!(windows.frame(wid), Some(Rect::new(1000.0, 0.0, 500.0, 500.0)));
        assert_eq!(windows.requests().len(), 1);
    }

    #[test]
    fn unknown_windows_are_harmless() {
        let mut windows = VirtualWindows::new(screens());
        let ghost = WindowId::new(99);
        assert_eq!(windows.frame(ghost), None);
        assert_eq!(windows.screen_of(ghost), None);
        assert!(windows.state(ghost).is_normal());
        windows.move_resize(ghost, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(windows.frame(ghost), None);
    }
}
