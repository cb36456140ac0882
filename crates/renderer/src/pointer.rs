//! Pointer and touch mapping into the shader's normalized `uMouse` space.
//!
//! Client coordinates are logical pixels with a top-left origin. The shader
//! expects `[0, 1]²` with a bottom-left origin, so the y axis is flipped.

use winit::dpi::PhysicalPosition;
use winit::event::TouchPhase;

use crate::types::Bounds;

/// Maps a client-space position into normalized container coordinates.
///
/// Returns `None` for a zero-area container. Positions outside the container
/// are clamped onto its edge.
pub fn normalize(client: (f64, f64), bounds: Bounds) -> Option<[f32; 2]> {
    if bounds.is_empty() {
        return None;
    }
    let x = (client.0 - bounds.left) / bounds.width;
    let y = 1.0 - (client.1 - bounds.top) / bounds.height;
    Some([x.clamp(0.0, 1.0) as f32, y.clamp(0.0, 1.0) as f32])
}

/// Tracks active touch points in the order they went down.
///
/// Touch-move handling only ever looks at the first entry, matching the
/// single-touch contract of the background.
#[derive(Debug, Default)]
pub struct TouchTracker {
    active: Vec<(u64, PhysicalPosition<f64>)>,
}

impl TouchTracker {
    /// Records a touch event; returns `true` when it was a move that should
    /// be forwarded as a touch-move.
    pub fn handle(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> bool {
        match phase {
            TouchPhase::Started => {
                self.active.retain(|(active, _)| *active != id);
                self.active.push((id, location));
                false
            }
            TouchPhase::Moved => {
                match self.active.iter_mut().find(|(active, _)| *active == id) {
                    Some(entry) => entry.1 = location,
                    None => self.active.push((id, location)),
                }
                true
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.active.retain(|(active, _)| *active != id);
                false
            }
        }
    }

    /// Active touch positions converted to logical client coordinates.
    pub fn positions(&self, scale_factor: f64) -> Vec<(f64, f64)> {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        self.active
            .iter()
            .map(|(_, position)| (position.x / scale, position.y / scale))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(100.0, 50.0, 800.0, 600.0)
    }

    #[test]
    fn corners_map_to_flipped_unit_square() {
        assert_eq!(normalize((100.0, 50.0), bounds()), Some([0.0, 1.0]));
        assert_eq!(normalize((900.0, 650.0), bounds()), Some([1.0, 0.0]));
        assert_eq!(normalize((500.0, 350.0), bounds()), Some([0.5, 0.5]));
    }

    #[test]
    fn positions_outside_are_clamped() {
        assert_eq!(normalize((0.0, 0.0), bounds()), Some([0.0, 1.0]));
        assert_eq!(normalize((2000.0, 2000.0), bounds()), Some([1.0, 0.0]));
    }

    #[test]
    fn first_touch_stays_first_while_others_move() {
        let mut tracker = TouchTracker::default();
        assert!(!tracker.handle(7, TouchPhase::Started, PhysicalPosition::new(20.0, 40.0)));
        assert!(!tracker.handle(9, TouchPhase::Started, PhysicalPosition::new(200.0, 400.0)));
        assert!(tracker.handle(9, TouchPhase::Moved, PhysicalPosition::new(220.0, 420.0)));

        let positions = tracker.positions(2.0);
        assert_eq!(positions, vec![(10.0, 20.0), (110.0, 210.0)]);

        tracker.handle(7, TouchPhase::Ended, PhysicalPosition::new(20.0, 40.0));
        assert_eq!(tracker.positions(1.0), vec![(220.0, 420.0)]);
        tracker.handle(9, TouchPhase::Cancelled, PhysicalPosition::new(0.0, 0.0));
        assert!(tracker.positions(1.0).is_empty());
    }

    #[test]
    fn zero_area_container_yields_nothing() {
        let empty = Bounds::new(0.0, 0.0, 0.0, 600.0);
        assert_eq!(normalize((10.0, 10.0), empty), None);
    }
}
