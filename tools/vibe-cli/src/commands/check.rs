//! Check the encoder and working directories.

use vibe_common::config::{AppConfig, ENCODER_ENV_VAR};
use vibe_render_engine::{CommandRunner, FfmpegRunner};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Vibe Studio System Check");
    println!("{}", "=".repeat(50));

    let runner = FfmpegRunner::from_config(&config.encoder);
    let encoder_ok = match runner.version().await {
        Some(version) => {
            println!("[OK] Encoder: {version}");
            true
        }
        None => {
            println!(
                "[FAIL] Encoder not runnable: {} (install ffmpeg or set {ENCODER_ENV_VAR})",
                runner.binary().display()
            );
            false
        }
    };

    for (label, dir) in [
        ("Workspace", &config.workspace_dir),
        ("Outputs", &config.output_dir),
    ] {
        match std::fs::create_dir_all(dir) {
            Ok(()) => println!("[OK] {label}: {}", dir.display()),
            Err(e) => println!("[WARN] {label}: {} ({e})", dir.display()),
        }
    }

    println!(
        "[OK] Render defaults: {}x{} @ {}fps, preset {}",
        config.render.width, config.render.height, config.render.fps, config.encoder.preset
    );

    println!();
    if encoder_ok {
        println!("Vibe Studio is ready.");
    } else {
        println!("Video generation is unavailable until the encoder can run.");
    }
    Ok(())
}
