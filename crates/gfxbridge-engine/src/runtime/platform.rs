use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::core::App;
use crate::event::EventQueue;
use crate::input::platform::winit::WinitAdapter;
use crate::input::{ExitChord, InputTranslator};
use crate::native::NativeRenderer;

use super::coordinator::{ExitReason, RenderLoop};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Chord that posts `Exit` instead of a key event.
    pub exit_chord: ExitChord,

    /// Pixel-precise scroll distance that counts as one wheel line.
    pub pixels_per_line: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "gfxbridge".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            exit_chord: ExitChord::default(),
            pixels_per_line: 16.0,
        }
    }
}

/// Sent from the render thread to the platform thread.
#[derive(Debug)]
enum RuntimeSignal {
    /// The render thread has ended; `None` if it unwound.
    RenderThreadEnded(Option<ExitReason>),
}

/// Calls `notify` when dropped: with the exit reason after
/// [`finish`](Self::finish), with `None` if the thread unwinds first.
struct ExitNotice<F>
where
    F: FnOnce(Option<ExitReason>),
{
    notify: Option<F>,
    reason: Option<ExitReason>,
}

impl<F> ExitNotice<F>
where
    F: FnOnce(Option<ExitReason>),
{
    fn new(notify: F) -> Self {
        Self {
            notify: Some(notify),
            reason: None,
        }
    }

    fn finish(mut self, reason: ExitReason) {
        self.reason = Some(reason);
    }
}

impl<F> Drop for ExitNotice<F>
where
    F: FnOnce(Option<ExitReason>),
{
    fn drop(&mut self) {
        if let Some(notify) = self.notify.take() {
            notify(self.reason);
        }
    }
}

/// Entry point for the runtime.
///
/// The platform event loop runs on the calling thread (the main thread on
/// platforms that require it). The render loop and the application run on a
/// dedicated render thread fed through the event queue.
pub struct Runtime;

impl Runtime {
    /// `make_native` runs on the platform thread once the window exists; the
    /// renderer it returns is moved to the render thread and dropped there.
    pub fn run<N, F, A>(config: RuntimeConfig, make_native: F, app: A) -> Result<()>
    where
        N: NativeRenderer + Send + 'static,
        F: FnOnce(&Window) -> Result<N>,
        A: App + Send + 'static,
    {
        let event_loop = EventLoop::<RuntimeSignal>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        let proxy = event_loop.create_proxy();

        let mut state = PlatformState::new(config, make_native, app, proxy);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct PlatformState<N, F, A> {
    config: RuntimeConfig,
    pending: Option<(F, A)>,
    proxy: EventLoopProxy<RuntimeSignal>,

    queue: Arc<EventQueue>,
    translator: InputTranslator,
    adapter: WinitAdapter,

    // Released only after the render thread is joined.
    window: Option<Window>,
    render_thread: Option<JoinHandle<ExitReason>>,

    error: Option<anyhow::Error>,
    _native: std::marker::PhantomData<fn() -> N>,
}

impl<N, F, A> PlatformState<N, F, A>
where
    N: NativeRenderer + Send + 'static,
    F: FnOnce(&Window) -> Result<N>,
    A: App + Send + 'static,
{
    fn new(
        config: RuntimeConfig,
        make_native: F,
        app: A,
        proxy: EventLoopProxy<RuntimeSignal>,
    ) -> Self {
        let queue = Arc::new(EventQueue::new());
        let translator = InputTranslator::new(Arc::clone(&queue), config.exit_chord);
        let adapter = WinitAdapter::new(config.pixels_per_line);

        Self {
            config,
            pending: Some((make_native, app)),
            proxy,
            queue,
            translator,
            adapter,
            window: None,
            render_thread: None,
            error: None,
            _native: std::marker::PhantomData,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        // Seed consumers with the content size before any input arrives.
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        self.translator
            .resize(size.width.round() as u32, size.height.round() as u32);

        let (make_native, mut app) = self
            .pending
            .take()
            .context("runtime already started")?;

        let native = make_native(&window).context("failed to create native renderer")?;
        self.window = Some(window);

        let queue = Arc::clone(&self.queue);
        let proxy = self.proxy.clone();

        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let notice = ExitNotice::new(move |reason| {
                    if proxy.send_event(RuntimeSignal::RenderThreadEnded(reason)).is_err() {
                        log::debug!("event loop closed before render thread ended");
                    }
                });

                let mut render_loop = RenderLoop::new(native, queue);
                let reason = render_loop.run(&mut app);
                drop(render_loop);

                notice.finish(reason);
                reason
            })
            .context("failed to spawn render thread")?;

        self.render_thread = Some(handle);
        log::info!("render thread started");
        Ok(())
    }

    fn join_render_thread(&mut self) {
        let Some(handle) = self.render_thread.take() else {
            return;
        };

        // The render loop may still be running if the platform is tearing
        // down on its own.
        self.queue.post_exit_event();

        match handle.join() {
            Ok(reason) => log::debug!("render thread joined: {reason:?}"),
            Err(_) if self.error.is_none() => {
                self.error = Some(anyhow!("render thread panicked"));
            }
            Err(_) => log::error!("render thread panicked"),
        }
    }
}

impl<N, F, A> ApplicationHandler<RuntimeSignal> for PlatformState<N, F, A>
where
    N: NativeRenderer + Send + 'static,
    F: FnOnce(&Window) -> Result<N>,
    A: App + Send + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.pending.is_none() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: RuntimeSignal) {
        match event {
            RuntimeSignal::RenderThreadEnded(Some(reason)) => {
                log::info!("render loop finished ({reason:?}); leaving event loop");
                event_loop.exit();
            }
            RuntimeSignal::RenderThreadEnded(None) => {
                log::error!("render thread unwound; leaving event loop");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let WindowEvent::CloseRequested = event {
            log::debug!("close requested");
            self.queue.post_exit_event();

            // Nothing drains the queue once the render thread is gone.
            if self
                .render_thread
                .as_ref()
                .is_none_or(JoinHandle::is_finished)
            {
                event_loop.exit();
            }
            return;
        }

        let lowered = self.adapter.lower(window, &event);
        let disposition = self.translator.translate(lowered);
        log::trace!("{lowered:?} -> {disposition:?}");
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.join_render_thread();
        self.window = None;
    }
}
