//! Platform adapters producing [`PlatformEvent`](super::PlatformEvent)s.

pub mod winit;
