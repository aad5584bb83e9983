//! Command-line interface for water-meter reading.

use clap::{Args, Parser, Subcommand};
use meterdial::{
    measure_blobs, red_marker_mask, MeterReader, MeterType, ReadArtifacts, ReadConfig,
};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "meterdial")]
#[command(about = "Read analog water-meter digit wheels from photographs with red reference marks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the meter index from a photograph.
    Read(CliReadArgs),

    /// Write the red marker mask of a photograph and log its blobs.
    Mask(CliMaskArgs),

    /// Print a meter type summary.
    TypeInfo {
        /// Path to the meter type JSON.
        #[arg(long)]
        meter_type: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliReadArgs {
    /// Path to the input photograph.
    #[arg(long)]
    image: PathBuf,

    /// Path to the meter type JSON (`meterdial.type.v1`).
    #[arg(long)]
    meter_type: PathBuf,

    /// Path to write the reading result (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Reader configuration JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum red marker area in pixels.
    #[arg(long)]
    min_marker_area: Option<u32>,

    /// Minimum digit blob area in pixels.
    #[arg(long)]
    min_digit_area: Option<u32>,

    /// Dial binarization threshold (grey values above are bright).
    #[arg(long)]
    threshold: Option<u8>,

    /// Directory to write intermediate images (PNG).
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliMaskArgs {
    /// Path to the input photograph.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the mask (PNG).
    #[arg(long)]
    out: PathBuf,

    /// Reader configuration JSON (red mask parameters, marker area).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum red marker area in pixels.
    #[arg(long)]
    min_marker_area: Option<u32>,
}

fn load_config(path: Option<&Path>) -> CliResult<ReadConfig> {
    match path {
        Some(path) => ReadConfig::from_json_file(path).map_err(|e| -> CliError {
            format!("Failed to load config {}: {}", path.display(), e).into()
        }),
        None => Ok(ReadConfig::default()),
    }
}

impl CliMaskArgs {
    fn to_config(&self) -> CliResult<ReadConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(v) = self.min_marker_area {
            config.min_marker_area = v;
        }
        Ok(config)
    }
}

impl CliReadArgs {
    fn to_config(&self) -> CliResult<ReadConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(v) = self.min_marker_area {
            config.min_marker_area = v;
        }
        if let Some(v) = self.min_digit_area {
            config.min_digit_area = v;
        }
        if let Some(v) = self.threshold {
            config.binarize.threshold = v;
        }
        Ok(config)
    }
}

fn open_rgb(path: &Path) -> CliResult<image::RgbImage> {
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    Ok(img.to_rgb8())
}

fn load_meter_type(path: &Path) -> CliResult<MeterType> {
    MeterType::from_json_file(path).map_err(|e| -> CliError {
        format!("Failed to load meter type {}: {}", path.display(), e).into()
    })
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Read(args) => run_read(&args),
        Commands::Mask(args) => run_mask(&args),
        Commands::TypeInfo { meter_type } => run_type_info(&meter_type),
    }
}

// ── type-info ─────────────────────────────────────────────────────────

fn run_type_info(path: &Path) -> CliResult<()> {
    let meter_type = load_meter_type(path)?;
    let summary = meter_type.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

// ── mask ──────────────────────────────────────────────────────────────

fn run_mask(args: &CliMaskArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let photo = open_rgb(&args.image)?;
    let config = args.to_config()?;

    let mask = red_marker_mask(&photo, &config.red_mask);
    let blobs = measure_blobs(&mask, config.min_marker_area)?;
    tracing::info!(
        "{} red blobs (min_area={})",
        blobs.len(),
        config.min_marker_area
    );
    for (i, b) in blobs.iter().enumerate() {
        tracing::info!(
            "  blob {}: area={} centroid=({:.1}, {:.1}) bbox={}x{}@({}, {})",
            i,
            b.area,
            b.centroid[0],
            b.centroid[1],
            b.bbox.width,
            b.bbox.height,
            b.bbox.x,
            b.bbox.y
        );
    }

    mask.save(&args.out)?;
    tracing::info!("Mask written to {}", args.out.display());
    Ok(())
}

// ── read ──────────────────────────────────────────────────────────────

fn dump_artifacts(dir: &Path, artifacts: &ReadArtifacts) -> CliResult<()> {
    std::fs::create_dir_all(dir)?;
    artifacts.marker_mask.save(dir.join("marker_mask.png"))?;
    artifacts.rectified_dial.save(dir.join("dial.png"))?;
    artifacts.binarized_dial.save(dir.join("dial_binary.png"))?;
    for (k, d) in artifacts.digit_images.iter().enumerate() {
        d.image
            .save(dir.join(format!("digit_{:02}_g{}_b{}.png", k, d.group, d.blob)))?;
    }
    tracing::info!(
        "Intermediate images ({} digits) written to {}",
        artifacts.digit_images.len(),
        dir.display()
    );
    Ok(())
}

fn run_read(args: &CliReadArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let photo = open_rgb(&args.image)?;
    let meter_type = load_meter_type(&args.meter_type)?;
    let config = args.to_config()?;

    let reader = MeterReader::with_config(meter_type, config);
    let (result, artifacts) = reader.read_with_artifacts(&photo)?;

    for p in &result.pair_resolutions {
        tracing::info!(
            "Split wheel {}: {} hypothesis, confidence {:.2}",
            p.group,
            if p.shifted { "shifted" } else { "as-classified" },
            p.confidence
        );
    }
    tracing::info!(
        "Reading: {} (worst digit distance {:.2})",
        result.reading,
        result.worst_distance()
    );

    if let Some(dir) = &args.dump_dir {
        dump_artifacts(dir, &artifacts)?;
    }

    let json = serde_json::to_string_pretty(&result)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            tracing::info!("Results written to {}", out.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_args(extra: &[&str]) -> CliMaskArgs {
        let mut argv = vec!["meterdial", "mask", "--image", "in.png", "--out", "mask.png"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Mask(args) => args,
            _ => unreachable!("parsed a different subcommand"),
        }
    }

    #[test]
    fn mask_defaults_follow_read_config() {
        let config = mask_args(&[]).to_config().unwrap();
        assert_eq!(config, ReadConfig::default());
    }

    #[test]
    fn mask_uses_config_file_and_flag_overrides() {
        let name = format!("meterdial-mask-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let json = r#"{"min_marker_area": 35, "red_mask": {"sat_min": 0.5}}"#;
        std::fs::write(&path, json).unwrap();
        let path_str = path.to_str().unwrap();

        let config = mask_args(&["--config", path_str]).to_config().unwrap();
        assert_eq!(config.min_marker_area, 35);
        assert_eq!(config.red_mask.sat_min, 0.5);

        let config = mask_args(&["--config", path_str, "--min-marker-area", "7"])
            .to_config()
            .unwrap();
        assert_eq!(config.min_marker_area, 7);
        assert_eq!(config.red_mask.sat_min, 0.5);

        std::fs::remove_file(&path).unwrap();
    }
}
