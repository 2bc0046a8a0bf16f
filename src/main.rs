use std::sync::Arc;
use std::time::Instant;

use futures::executor::block_on;
use log::{error, warn};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

mod canvas;
mod config;
mod generators;
mod grids;
mod renderer;
mod session;

use canvas::Paint;
use clap::Parser;
use config::Args;
use renderer::GraphicsContext;
use session::Session;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Args::parse().into_config()?;
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("maze")
            .with_inner_size(PhysicalSize::new(
                config.surface_width,
                config.surface_height,
            ))
            .with_resizable(false)
            .build(&event_loop)?,
    );

    // Since main can't be async, we're going to need to block
    let mut gfx_ctx = block_on(GraphicsContext::new(
        window.clone(),
        Paint::Background.into(),
    ))?;
    let mut session = Session::new(config, Instant::now())?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => elwt.exit(),
                Key::Named(NamedKey::Space) => session.toggle_pause(),
                Key::Character(c) if c.as_str().eq_ignore_ascii_case("g") => {
                    if session.complete() {
                        window.request_redraw();
                    }
                }
                Key::Character(c) if c.as_str().eq_ignore_ascii_case("r") => {
                    if let Err(e) = session.restart(Instant::now()) {
                        error!("could not restart: {}", e);
                        elwt.exit();
                    }
                    window.request_redraw();
                }
                _ => {}
            },
            WindowEvent::Resized(physical_size) => {
                gfx_ctx.resize(physical_size);
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => match gfx_ctx.draw(&session.vertices()) {
                Ok(()) => {}
                // reconfigure the surface if lost
                Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                    gfx_ctx.resize(gfx_ctx.size)
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("out of graphics memory");
                    elwt.exit();
                }
                Err(e) => warn!("dropped frame: {:?}", e),
            },
            _ => {}
        },
        Event::AboutToWait => {
            if session.poll(Instant::now()) {
                window.request_redraw();
            }

            if session.is_paused() {
                elwt.set_control_flow(ControlFlow::Wait);
            } else {
                elwt.set_control_flow(ControlFlow::WaitUntil(session.next_tick()));
            }
        }
        _ => {}
    })?;

    Ok(())
}
