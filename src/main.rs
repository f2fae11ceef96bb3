use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use surface_noise::cli::Args;
use surface_noise::config::RenderConfig;
use surface_noise::export::{
    export_height_map, export_json, export_legend_png, export_octave_maps, export_png,
};
use surface_noise::generate_field;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    args.apply(&mut config).context("invalid settings")?;

    let noise = config.build_noise()?;
    let map = generate_field(config.surface, &noise, &config.ramp, &config.sampling)?;

    let dir = args.out.join(config.surface.to_string());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    export_png(&map, &config.ramp, dir.join("surface.png"))?;
    if args.legend {
        export_legend_png(&config.ramp, dir.join("legend.png"))?;
    }
    if args.height_map {
        export_height_map(&map, dir.join("height.png"))?;
    }
    if args.octave_maps {
        export_octave_maps(config.surface, &noise, &config.sampling, &dir)?;
    }
    if args.json {
        export_json(&map, dir.join("surface.json"))?;
    }

    info!("surface generated → {}/", dir.display());
    Ok(())
}
