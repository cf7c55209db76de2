//! Input handling (winit -> viewport events).
//!
//! Goal: keep `Windowing` focused on window lifecycle + rendering, while `UserInput`
//! turns raw window events into the few things the scene reacts to.

use winit::event::WindowEvent;

/// Window events the scene cares about, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Resized { width: u32, height: u32 },
    ScaleFactorChanged(f64),
    PointerMoved { x: f64, y: f64 },
}

/// Input event translator. Holds no state: tilt is a direct function of the
/// latest cursor position, and leaving the window keeps the last tilt.
#[derive(Default, Debug, Clone, Copy)]
pub struct UserInput;

impl UserInput {
    pub fn new() -> Self {
        Self
    }

    /// Feed a winit event into this input handler.
    ///
    /// Returns the translated event when it is one the scene reacts to.
    pub fn handle_window_event(&self, event: &WindowEvent) -> Option<ViewportEvent> {
        match event {
            WindowEvent::Resized(size) => Some(ViewportEvent::Resized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(ViewportEvent::ScaleFactorChanged(*scale_factor))
            }

            WindowEvent::CursorMoved { position, .. } => Some(ViewportEvent::PointerMoved {
                x: position.x,
                y: position.y,
            }),

            _ => None,
        }
    }
}

/// Tilt (about x, about y) for a cursor at logical `(x, y)`.
///
/// Offsets are measured from the viewport center and divided by `divisor`:
/// vertical offset tilts about x, horizontal offset about y.
pub fn pointer_tilt(x: f64, y: f64, center: (f64, f64), divisor: f32) -> (f32, f32) {
    let divisor = divisor as f64;
    let tilt_x = (y - center.1) / divisor;
    let tilt_y = (x - center.0) / divisor;
    (tilt_x as f32, tilt_y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::DeviceId;

    #[test]
    fn center_has_no_tilt() {
        assert_eq!(pointer_tilt(400.0, 300.0, (400.0, 300.0), 1000.0), (0.0, 0.0));
    }

    #[test]
    fn corner_tilt_is_offset_over_divisor() {
        let (tx, ty) = pointer_tilt(0.0, 600.0, (400.0, 300.0), 1000.0);
        assert!((tx - 0.3).abs() < 1e-6);
        assert!((ty + 0.4).abs() < 1e-6);
    }

    #[test]
    fn resize_event_is_translated() {
        let input = UserInput::new();
        let ev = WindowEvent::Resized(PhysicalSize::new(640, 480));
        assert_eq!(
            input.handle_window_event(&ev),
            Some(ViewportEvent::Resized { width: 640, height: 480 })
        );
    }

    #[test]
    fn cursor_move_is_translated() {
        let input = UserInput::new();
        let ev = WindowEvent::CursorMoved {
            // SAFETY: only used as an opaque id inside this test.
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(12.0, 34.0),
        };
        assert_eq!(
            input.handle_window_event(&ev),
            Some(ViewportEvent::PointerMoved { x: 12.0, y: 34.0 })
        );
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let input = UserInput::new();
        assert_eq!(input.handle_window_event(&WindowEvent::Focused(true)), None);
        let left = WindowEvent::CursorLeft {
            // SAFETY: only used as an opaque id inside this test.
            device_id: unsafe { DeviceId::dummy() },
        };
        assert_eq!(input.handle_window_event(&left), None);
    }
}
