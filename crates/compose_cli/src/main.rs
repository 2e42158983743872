//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `compose_core` linkage.
//! - Drive one headless compose area end to end with deterministic output.

use compose_core::{bind, ComposeArea, ComposeResult, MirrorSurface};

fn main() {
    println!("compose_core ping={}", compose_core::ping());
    println!("compose_core version={}", compose_core::core_version());

    if let Err(err) = run_probe() {
        eprintln!("compose_core probe failed: {err} (code={})", err.code());
        std::process::exit(1);
    }
}

fn run_probe() -> ComposeResult<()> {
    let mut area: ComposeArea<MirrorSurface> = bind("cli-probe", MirrorSurface::new())?;
    area.insert_text("cheers ")?;
    area.insert_image("beer.png", "🍻", "emoji")?;
    area.insert_text("\nsee you")?;

    println!("text={:?}", area.get_text());
    println!("extracted={:?}", area.extract_text()?);
    println!("selection={}", area.fetch_range());
    println!("html={}", area.surface().tree().html());
    Ok(())
}
