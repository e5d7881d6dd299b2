//! Pinhole Terminal Demo - camera model diagrams in ASCII
//!
//! Controls:
//!   - Arrow Keys: Orbit the view (free 3D view only)
//!   - +/-: Zoom (free 3D view only)
//!   - 0-3: Image / XY / YZ / XZ view
//!   - Tab, Shift-Tab: Select slider; [ ]: Move it; R: Reset sliders
//!   - Q/ESC: Quit

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;
use pinhole_core::{AnyController, SceneKind};
use pinhole_terminal::TerminalApp;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneArg {
    /// Movable camera imaging a fixed point
    Extrinsic,
    /// Camera at the origin with adjustable focal length
    Intrinsic,
}

impl From<SceneArg> for SceneKind {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Extrinsic => SceneKind::Extrinsic,
            SceneArg::Intrinsic => SceneKind::Intrinsic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Image,
    Xy,
    Yz,
    Xz,
}

#[derive(Debug, Parser)]
#[command(about = "Render pinhole camera diagrams in the terminal")]
struct Args {
    /// Diagram to show
    #[arg(long, value_enum, default_value_t = SceneArg::Extrinsic)]
    scene: SceneArg,

    /// Initial view
    #[arg(long, value_enum, default_value_t = ModeArg::Image)]
    mode: ModeArg,

    /// JSON file with initial scene values
    #[arg(long)]
    config: Option<PathBuf>,
}

fn invalid_data(err: pinhole_core::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let kind = SceneKind::from(args.scene);

    let mut controller = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| io::Error::new(e.kind(), format!("Failed to read {}: {e}", path.display())))?;
            AnyController::from_json(kind, &json).map_err(invalid_data)?
        }
        None => AnyController::new(kind),
    };
    controller.select_mode(args.mode as usize).map_err(invalid_data)?;
    info!("starting {kind} scene in {:?}", controller.mode());

    // Run the terminal app
    let mut app = TerminalApp::new(controller)?;
    app.run()
}
