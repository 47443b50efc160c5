//! Input subsystem.
//!
//! Public API is platform-agnostic; `platform::winit` translates window
//! events. Pointer coordinates are physical pixels, the same space as the
//! canvas the scene draws into.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent,
};
