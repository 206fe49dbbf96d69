//! Input subsystem.
//!
//! Platform events are normalized by `InputTranslator` on the platform thread
//! and posted to the event queue. The render thread folds drained events into
//! `InputState`/`InputFrame`. Only `platform::winit` touches winit types.

mod frame;
mod keymap;
mod state;
mod translator;

pub mod platform;

pub use frame::InputFrame;
pub use keymap::{extended, KeyTranslationTable, PlatformModifiers};
pub use state::InputState;
pub use translator::{Disposition, ExitChord, InputTranslator, PlatformEvent};
