mod app;
mod cli;
mod error;
mod renderer;
mod scene;
mod screenshot;
mod timer;
mod ui;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use cli::Args;
use timer::TickSchedule;

struct SceneViewer {
    args: Args,
    app: Option<app::App>,
    ticks: TickSchedule,
    /// First fatal error; the loop exits and `main` reports it.
    failure: Option<error::Error>,
}

impl SceneViewer {
    fn new(args: Args) -> Self {
        let ticks = TickSchedule::new(Instant::now(), args.kickoff_delay(), args.tick_interval());
        Self {
            args,
            app: None,
            ticks,
            failure: None,
        }
    }

    fn create_app(&self, event_loop: &ActiveEventLoop) -> Result<app::App, error::Error> {
        let attrs = WindowAttributes::default()
            .with_title("Scene Modeller")
            .with_inner_size(winit::dpi::LogicalSize::new(self.args.width, self.args.height));

        let window = Arc::new(event_loop.create_window(attrs)?);
        app::App::new(window, &self.args.scene_config())
    }
}

impl ApplicationHandler for SceneViewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        match self.create_app(event_loop) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Handle CloseRequested before borrowing self.app, so we can drop it
        // while the window is still alive (avoids Vulkan surface semaphore panic).
        if matches!(
            &event,
            WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event: KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                    ..
                }
        ) {
            self.app = None;
            event_loop.exit();
            return;
        }

        let Some(app) = &mut self.app else { return };

        if let WindowEvent::RedrawRequested = &event {
            app.render();
            return;
        }

        app.handle_window_event(&event);
    }

    /// Runs the animation tick when its deadline has passed, then sleeps until
    /// the next one. Input and redraws are dispatched in between on this thread.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = &mut self.app else { return };

        if self.ticks.fire_if_due(Instant::now()) {
            app.tick();
            app.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.ticks.deadline()));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Some(path) = &args.screenshot {
        return screenshot::render_screenshot(&args, path)
            .with_context(|| format!("rendering screenshot to {}", path.display()));
    }

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut viewer = SceneViewer::new(args);
    event_loop
        .run_app(&mut viewer)
        .map_err(error::Error::from)
        .context("running event loop")?;

    match viewer.failure {
        Some(e) => Err(e).context("initialising the viewer"),
        None => Ok(()),
    }
}
