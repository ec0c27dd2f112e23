use anyhow::Result;
use log::{info, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::game_loop::{FixedStep, FIXED_TIMESTEP};
use engine::input::{
    Action, ChannelRecognizer, InputBuffer, InputConfig, KeyboardState, MonotonicClock,
    Transcript, VoiceListener, VoiceProducer,
};
use game::characters::Player;
use game::level::Level;
use game::Updatable;

/// Stand-in speech pipeline: every stdin line is one utterance
fn spawn_stdin_recognizer() -> std::io::Result<ChannelRecognizer> {
    let (tx, recognizer) = ChannelRecognizer::pair();
    thread::Builder::new()
        .name("stdin-transcripts".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let sent = tx
                    .send(Transcript::Partial(line.clone()))
                    .and_then(|()| tx.send(Transcript::Final(line)));
                if sent.is_err() {
                    break;
                }
            }
        })?;
    Ok(recognizer)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Echo Runner...");

    let buffer = Arc::new(InputBuffer::new(Arc::new(MonotonicClock::new())));
    let mut level = Level::demo();
    let mut player = Player::new(level.spawn, Arc::clone(&buffer));
    let mut keyboard = KeyboardState::new(InputConfig::default());
    let mut step = FixedStep::new();

    let mut voice: VoiceListener<ChannelRecognizer> = match spawn_stdin_recognizer() {
        Ok(recognizer) => VoiceListener::new(Arc::clone(&buffer), recognizer),
        Err(e) => {
            warn!("No transcript source: {}", e);
            VoiceListener::unavailable(Arc::clone(&buffer))
        }
    };
    if let Err(e) = voice.start() {
        warn!("{}; continuing with keyboard only", e);
    } else {
        info!("Type \"jump\" or \"dash\" and press Enter to speak");
    }

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Echo Runner")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut title = String::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!("Close requested, shutting down...");
                    voice.stop();
                    elwt.exit();
                }
                Event::WindowEvent {
                    event: WindowEvent::KeyboardInput { event, .. },
                    ..
                } => {
                    keyboard.process_keyboard_event(&event);
                }
                Event::WindowEvent {
                    event: WindowEvent::Focused(false),
                    ..
                } => {
                    keyboard.reset();
                }
                Event::AboutToWait => {
                    if keyboard.just_pressed(Action::Pause) {
                        step.toggle_pause();
                    }
                    if keyboard.just_pressed(Action::Respawn) {
                        level.reset();
                        player.respawn(level.spawn);
                    }
                    if !step.is_paused() {
                        keyboard.emit_commands(player.buffer());
                    }

                    for _ in 0..step.begin_frame() {
                        player.tick(
                            FIXED_TIMESTEP,
                            keyboard.horizontal_intent(),
                            &level.obstacles,
                            &mut level.contacts,
                        );
                        level.update(FIXED_TIMESTEP);

                        if level.take_death(&player.rect) {
                            level.reset();
                            player.respawn(level.spawn);
                        }
                    }
                    keyboard.end_frame();

                    let next = if step.is_paused() {
                        "Echo Runner - paused".to_string()
                    } else if level.is_complete() {
                        "Echo Runner - course complete".to_string()
                    } else {
                        format!("Echo Runner - {}", player.phase().animation_name())
                    };
                    if next != title {
                        window.set_title(&next);
                        title = next;
                    }
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
