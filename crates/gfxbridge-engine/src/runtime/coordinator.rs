use std::sync::Arc;

use crate::core::{App, AppControl, FrameCtx};
use crate::event::{Event, EventQueue};
use crate::input::{InputFrame, InputState};
use crate::native::{NativeRenderer, RenderFrame};
use crate::time::FrameClock;

/// Why the render loop stopped dispatching.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitReason {
    /// `Exit` was drained from the queue.
    ExitEvent,
    /// The application returned `AppControl::Exit`.
    App,
    /// The native tick reported `Exiting`.
    NativeExiting,
    /// The native tick reported `NoContext`; nothing is left to drain.
    NativeNoContext,
}

/// Consumer side of the event queue; drives the native frame tick.
///
/// Each [`step`](Self::step) drains every queued event, runs one app frame and
/// ticks the renderer once. After any exit signal the loop dispatches nothing
/// more, and [`shutdown`](Self::shutdown) keeps ticking until the renderer
/// reports `NoContext`.
pub struct RenderLoop<N: NativeRenderer> {
    native: N,
    queue: Arc<EventQueue>,

    input: InputState,
    frame: InputFrame,

    clock: FrameClock,

    exit: Option<ExitReason>,
    quiesced: bool,
}

impl<N: NativeRenderer> RenderLoop<N> {
    pub fn new(native: N, queue: Arc<EventQueue>) -> Self {
        Self {
            native,
            queue,
            input: InputState::default(),
            frame: InputFrame::default(),
            clock: FrameClock::new(),
            exit: None,
            quiesced: false,
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn into_native(self) -> N {
        self.native
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    /// Runs one iteration. Returns the exit reason once the loop has stopped.
    pub fn step<A: App + ?Sized>(&mut self, app: &mut A) -> Option<ExitReason> {
        if self.exit.is_some() {
            return self.exit;
        }

        self.frame.clear();
        if self.drain(app) {
            return self.stop(ExitReason::ExitEvent);
        }

        let time = self.clock.tick();
        let control = {
            let mut ctx = FrameCtx {
                input: &self.input,
                input_frame: &self.frame,
                time,
            };
            app.on_frame(&mut ctx)
        };
        if control == AppControl::Exit {
            return self.stop(ExitReason::App);
        }

        match self.native.render_frame() {
            RenderFrame::Continue => None,
            RenderFrame::Exiting => self.stop(ExitReason::NativeExiting),
            RenderFrame::NoContext => {
                self.quiesced = true;
                self.stop(ExitReason::NativeNoContext)
            }
        }
    }

    /// Steps until an exit signal, then drains the renderer.
    pub fn run<A: App + ?Sized>(&mut self, app: &mut A) -> ExitReason {
        let reason = loop {
            if let Some(reason) = self.step(app) {
                break reason;
            }
        };
        self.shutdown();
        reason
    }

    /// Ticks the renderer until it reports `NoContext`. Returns the number of
    /// ticks it took; zero if the renderer had already quiesced.
    pub fn shutdown(&mut self) -> u64 {
        if self.quiesced {
            return 0;
        }
        if self.exit.is_none() {
            self.exit = Some(ExitReason::App);
        }

        self.native.begin_shutdown();

        let mut ticks = 0u64;
        loop {
            ticks += 1;
            if self.native.render_frame() == RenderFrame::NoContext {
                break;
            }
        }

        self.quiesced = true;
        log::debug!("renderer quiesced after {ticks} shutdown tick(s)");
        ticks
    }

    /// Polls until the queue is empty or `Exit` is seen. Nothing behind
    /// `Exit` is dequeued.
    fn drain<A: App + ?Sized>(&mut self, app: &mut A) -> bool {
        while let Some(event) = self.queue.poll() {
            match event {
                Event::Exit => return true,
                Event::Resize { width, height } => self.native.resize(width, height),
                Event::Mouse { .. } | Event::Key { .. } => {}
            }
            app.on_event(&event);
            self.input.apply_event(&mut self.frame, event);
        }
        false
    }

    fn stop(&mut self, reason: ExitReason) -> Option<ExitReason> {
        log::info!("render loop stopping: {reason:?}");
        self.exit = Some(reason);
        self.exit
    }
}
