use tracing::trace;

use super::Direction;
use super::scoring::{Score, best_by};
use crate::sys::screen::{DisplaySystem, ScreenId};

/// The display to continue onto when navigation runs off the edge of `from`.
///
/// A candidate's center must lie strictly on the requested side, and within
/// the candidate's own height (for left/right) or width (for up/down) of the
/// origin's center on the other axis. Diagonal neighbours are thereby ruled
/// out. The nearest qualifying display wins; `from` itself is returned when
/// there is none.
pub fn pick_display_in_direction(
    screens: &impl DisplaySystem,
    from: ScreenId,
    direction: Direction,
) -> ScreenId {
    let Some(origin) = screens.screen_frame(from) else {
        return from;
    };
    let center = origin.center();
    let candidates = screens
        .screen_ids()
        .into_iter()
        .filter(|&id| id != from)
        .filter_map(|id| screens.screen_frame(id).map(|frame| (id, frame)));

    best_by(candidates, |(id, frame)| {
        let other = frame.center();
        if !direction.points_toward(center, other) {
            return None;
        }
        let (dx, dy) = (other.x - center.x, other.y - center.y);
        let aligned = match direction {
            Direction::Left | Direction::Right => dy.abs() <= frame.height,
            Direction::Up | Direction::Down => dx.abs() <= frame.width,
        };
        if !aligned {
            trace!(screen = %id, "not aligned");
            return None;
        }
        Some(Score::distance(center.distance_to(other)))
    })
    .map_or(from, |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::sys::geometry::Rect;
    use crate::sys::screen::VirtualScreens;

    fn id(i: usize) -> ScreenId { ScreenId::new(i) }

    #[test]
    fn side_by_side_displays() {
        let screens = VirtualScreens::from_frames([
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
            Rect::new(1000.0, 0.0, 1000.0, 1000.0),
        ]);
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Right), id(1));
        assert_eq!(pick_display_in_direction(&screens, id(1), Direction::Left), id(0));
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Left), id(0));
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Down), id(0));
    }

    #[test]
    fn diagonal_display_is_not_reachable() {
        let screens = VirtualScreens::from_frames([
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
            Rect::new(1200.0, 1200.0, 1000.0, 1000.0),
        ]);
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Right), id(0));
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Down), id(0));
    }

    #[test]
    fn offset_but_aligned_display_qualifies() {
        let screens = VirtualScreens::from_frames([
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Rect::new(1920.0, 400.0, 1280.0, 1024.0),
        ]);
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Right), id(1));
    }

    #[test]
    fn nearest_of_several_wins() {
        let screens = VirtualScreens::from_frames([
            Rect::new(0.0, 0.0, 1000.0, 1000.0),
            Rect::new(2000.0, 0.0, 1000.0, 1000.0),
            Rect::new(1000.0, 0.0, 1000.0, 1000.0),
            Rect::new(0.0, -800.0, 1000.0, 800.0),
        ]);
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Right), id(2));
        assert_eq!(pick_display_in_direction(&screens, id(0), Direction::Up), id(3));
    }

    #[test]
    fn unknown_origin_stays_put() {
        let screens = VirtualScreens::from_frames([Rect::new(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(pick_display_in_direction(&screens, id(5), Direction::Right), id(5));
    }
}
