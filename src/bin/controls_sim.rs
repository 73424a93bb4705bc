//! Controls Simulator - Headless Input-to-Locomotion Run
//!
//! Drives a world with a scripted input timeline on a manual clock and logs
//! every state transition. Useful for tuning character config and checking
//! saved bindings without a window.
//!
//! Run with: `RUST_LOG=info cargo run --bin controls_sim -- --ticks 240`
//!
//! Script (per frame index):
//! - 30..150: W held (walk forward)
//! - 60..110: Shift held (sprint)
//! - 120: Space tapped (jump)
//! - 170..200: mouse sweeps right
//! - with `--players 2`, pad 1 pushes its stick forward from frame 40

use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use glam::Vec3;
use log::info;

use stride_engine::clock::ManualClock;
use stride_engine::config::EngineConfig;
use stride_engine::input::{GamepadState, InputDevice, KeyId, codes};
use stride_engine::settings::Settings;
use stride_engine::world::{World, WorldEvent};

#[derive(Parser, Debug)]
#[command(name = "controls_sim")]
#[command(about = "Run scripted input through the character controller and log transitions")]
struct Cli {
    /// Engine config JSON (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings JSON with binding overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the settings (including current bindings) here on exit
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Number of characters (1 or 2); player 1 is driven by a scripted pad
    #[arg(long, default_value_t = 1)]
    players: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut settings = Settings::from_controls(&config.controls);
    if let Some(path) = &cli.settings {
        settings.load(path)?;
    }

    let clock = Rc::new(ManualClock::new());
    let mut world = World::new(config, Rc::clone(&clock))
        .with_settings(settings)
        .with_clips([
            ("idle", 2.0),
            ("walk", 1.0),
            ("sprint", 0.7),
            ("jump", 0.6),
            ("fall", 1.0),
            ("land", 0.5),
        ]);
    world.physics_mut().add_ground(0.0, 200.0);

    world.subscribe(|event| match event {
        WorldEvent::Spawned { uuid, archetype } => info!("spawned {archetype} {uuid}"),
        WorldEvent::Despawned { uuid } => info!("despawned {uuid}"),
        WorldEvent::StateChanged { uuid, from, to } => info!("{uuid}: {from} -> {to}"),
    });

    let rest = world.config().character.rest_height();
    let hero = world.spawn_character(Vec3::new(0.0, rest, 0.0), Some(0));
    let buddy = (cli.players > 1).then(|| world.spawn_character(Vec3::new(3.0, rest, 0.0), Some(1)));

    for frame in 0..cli.ticks {
        script_keyboard(&mut world, frame);
        let pads = script_gamepads(frame, buddy.is_some());

        clock.advance_ms(cli.frame_ms);
        world.tick(&pads);
    }

    for uuid in std::iter::once(hero).chain(buddy) {
        if let (Some(entity), Some(position)) = (world.entity(uuid), world.position(uuid)) {
            info!(
                "{uuid}: final state {:?} at ({:.2}, {:.2}, {:.2})",
                entity.state(),
                position.x,
                position.y,
                position.z
            );
        }
    }

    if let Some(path) = &cli.save_settings {
        world.save_bindings("character");
        world.settings().save(path)?;
    }
    Ok(())
}

fn script_keyboard<C: stride_engine::clock::Clock>(world: &mut World<C>, frame: u32) {
    let mut key = |code: u32, value: f32| {
        world
            .controls_mut()
            .set_actions(&KeyId::Code(code), value, InputDevice::Keyboard, None);
    };

    match frame {
        30 => key(codes::W, 1.0),
        60 => key(codes::SHIFT, 1.0),
        110 => key(codes::SHIFT, 0.0),
        120 => key(codes::SPACE, 1.0),
        121 => key(codes::SPACE, 0.0),
        150 => key(codes::W, 0.0),
        _ => {}
    }

    if (170..200).contains(&frame) {
        world.controls_mut().mouse_move(25.0, 0.0);
    }
}

fn script_gamepads(frame: u32, second_player: bool) -> Vec<GamepadState> {
    if !second_player {
        return Vec::new();
    }
    let stick = if frame >= 40 { -1.0 } else { 0.0 };
    vec![GamepadState::new(1).with_axes(&[0.0, stick])]
}
