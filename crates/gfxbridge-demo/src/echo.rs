use gfxbridge_engine::core::{App, AppControl, FrameCtx};
use gfxbridge_engine::event::{Event, KeyCode};

/// Seconds between periodic status lines.
const STATUS_INTERVAL: f32 = 5.0;

/// Logs every drained event and exits on Escape.
#[derive(Debug, Default)]
pub struct EchoApp {
    since_status: f32,
}

impl App for EchoApp {
    fn on_event(&mut self, event: &Event) {
        match event {
            // Plain pointer motion is noisy.
            Event::Mouse { button: None, .. } => log::trace!("{event:?}"),
            _ => log::info!("{event:?}"),
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&KeyCode::Esc) {
            log::info!("escape pressed; exiting");
            return AppControl::Exit;
        }

        self.since_status += ctx.time.dt;
        if self.since_status >= STATUS_INTERVAL {
            self.since_status = 0.0;
            log::debug!(
                "frame {}: pointer {:?}, wheel {}, {} key(s) down",
                ctx.time.frame_index,
                ctx.input.pointer,
                ctx.input.wheel,
                ctx.input.keys_down.len(),
            );
        }

        AppControl::Continue
    }
}
