/// Example: print one frame of each diagram without entering raw mode
///
/// Usage: cargo run --example snapshot -- [view option 0-3]
use std::env;
use std::io;

use pinhole_core::{AnyController, SceneKind};
use pinhole_terminal::AsciiSurface;

fn main() -> io::Result<()> {
    let option = match env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Bad view option: {e}")))?,
        None => 0,
    };

    for kind in [SceneKind::Extrinsic, SceneKind::Intrinsic] {
        let mut controller = AnyController::new(kind);
        controller
            .select_mode(option)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let mut surface = AsciiSurface::new(100, 32);
        controller
            .repaint(&mut surface)
            .unwrap_or_else(|never| match never {});

        println!("== {kind} ==");
        for row in 0..32 {
            println!("{}", surface.row_text(row).trim_end());
        }
    }

    Ok(())
}
