use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use framestitch::{
    DEFAULT_CRF, DEFAULT_GIF_FPS, DEFAULT_PRESET, DEFAULT_VIDEO_FPS, DEFAULT_VIDEO_HEIGHT,
    DurationPolicy, GifTimingAnalysis, JobOptions, Perspective, ProgressCallback, ProgressInfo,
    ResampleOptions, SequencePaths, StitchOptions, VideoLayout, VideoStitchOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framestitch convert-fps --input assets/my_30fps.gif --dst-fps 12\n  framestitch stitch-gif --repo-root . --fps 12 --scale 0.5\n  framestitch stitch-video --mode stitch --height 480 --fps 30\n  framestitch inspect assets/my_30fps.gif --json\n  framestitch completions zsh > _framestitch";

#[derive(Debug, Parser)]
#[command(
    name = "framestitch",
    version,
    about = "Resample GIFs and stitch left/right frame sequences into GIFs and MP4s",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Left and right side by side.
    Stitch,
    /// One perspective only.
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PerspectiveArg {
    Left,
    Right,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a GIF to a lower frame rate by skipping frames.
    #[command(
        about = "Resample a GIF to a target frame rate",
        after_help = "Examples:\n  framestitch convert-fps --input in.gif --dst-fps 12\n  framestitch convert-fps --input in.gif --dst-fps 10 --output out.gif"
    )]
    ConvertFps {
        /// Input GIF path.
        #[arg(long)]
        input: PathBuf,
        /// Target frame rate.
        #[arg(long, default_value_t = DEFAULT_GIF_FPS)]
        dst_fps: f64,
        /// Output GIF path (default: <input>_<dst-fps>fps.gif next to the input).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Duration in ms assumed for frames with a missing or zero delay.
        #[arg(long, default_value_t = framestitch::DEFAULT_FRAME_DURATION_MS)]
        fallback_ms: u32,
    },

    /// Build side-by-side GIFs from paired left/right frame folders.
    #[command(
        about = "Stitch left/right sequences into GIFs",
        after_help = "Examples:\n  framestitch stitch-gif --repo-root .\n  framestitch stitch-gif --left l --right r --output out.gif --no-strict"
    )]
    StitchGif {
        /// Repository root holding `assets/pre-processed image folders`.
        #[arg(long, default_value = ".")]
        repo_root: PathBuf,
        /// Datasets to process.
        #[arg(long, num_args = 1.., default_values_t = default_datasets())]
        datasets: Vec<String>,
        /// Explicit left frame folder (requires --right and --output).
        #[arg(long, requires_all = ["right", "output"])]
        left: Option<PathBuf>,
        /// Explicit right frame folder.
        #[arg(long, requires = "left")]
        right: Option<PathBuf>,
        /// Explicit output GIF.
        #[arg(long, requires = "left")]
        output: Option<PathBuf>,
        /// Frames per second of the GIF.
        #[arg(long, default_value_t = DEFAULT_GIF_FPS)]
        fps: f64,
        /// Uniform scale applied to frames before stitching.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Use only the intersection of left/right frame numbers.
        #[arg(long)]
        no_strict: bool,
    },

    /// Stitch paired frame folders into MP4s with ffmpeg.
    #[command(
        about = "Stitch left/right sequences into MP4s",
        after_help = "Examples:\n  framestitch stitch-video --mode stitch\n  framestitch stitch-video --mode single --perspective right --crf 23"
    )]
    StitchVideo {
        /// Repository root holding `assets/pre-processed image folders`.
        #[arg(long, default_value = ".")]
        repo_root: PathBuf,
        /// Datasets to process.
        #[arg(long, num_args = 1.., default_values_t = default_datasets())]
        datasets: Vec<String>,
        /// Frames per second.
        #[arg(long, default_value_t = DEFAULT_VIDEO_FPS)]
        fps: f64,
        /// Output height in pixels.
        #[arg(long, default_value_t = DEFAULT_VIDEO_HEIGHT)]
        height: u32,
        /// Side-by-side or a single perspective.
        #[arg(long, value_enum, default_value_t = ModeArg::Single)]
        mode: ModeArg,
        /// Perspective exported in single mode.
        #[arg(long, value_enum, default_value_t = PerspectiveArg::Left)]
        perspective: PerspectiveArg,
        /// H.264 quality, 0-51 (lower is better).
        #[arg(long, default_value_t = DEFAULT_CRF)]
        crf: u8,
        /// libx264 preset.
        #[arg(long, default_value = DEFAULT_PRESET)]
        preset: String,
        /// ffmpeg executable (default: $FRAMESTITCH_FFMPEG or ffmpeg on PATH).
        #[arg(long)]
        ffmpeg: Option<PathBuf>,
    },

    /// Print frame timing for a GIF.
    #[command(about = "Show GIF frame timing", visible_alias = "info")]
    Inspect {
        /// Input GIF path.
        input: PathBuf,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check that two frame folders pair cleanly.
    #[command(about = "Validate a left/right pair of frame folders")]
    Check {
        #[arg(long)]
        left: PathBuf,
        #[arg(long)]
        right: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn default_datasets() -> Vec<String> {
    framestitch::DEFAULT_DATASETS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn video_layout(mode: ModeArg, perspective: PerspectiveArg) -> VideoLayout {
    match mode {
        ModeArg::Stitch => VideoLayout::SideBySide,
        ModeArg::Single => VideoLayout::Single(match perspective {
            PerspectiveArg::Left => Perspective::Left,
            PerspectiveArg::Right => Perspective::Right,
        }),
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{name} must be > 0").into());
    }
    Ok(())
}

fn init_logging(global: &GlobalOptions) {
    let mut builder = env_logger::Builder::new();
    if global.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }
    let _ = builder.try_init();
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if info.total.is_some_and(|total| info.current >= total) {
            self.bar.finish_and_clear();
        }
    }
}

fn job_options(global: &GlobalOptions) -> Result<JobOptions, Box<dyn std::error::Error>> {
    let mut options = JobOptions::new();
    if global.progress {
        options = options.with_progress(Arc::new(BarProgress::new()?));
    }
    Ok(options)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::ConvertFps {
            input,
            dst_fps,
            output,
            fallback_ms,
        } => {
            require_positive("--dst-fps", dst_fps)?;
            let output =
                output.unwrap_or_else(|| framestitch::default_resample_output(&input, dst_fps));
            ensure_writable_path(&output, cli.global.overwrite)?;

            let options =
                ResampleOptions::new(dst_fps).with_duration_policy(DurationPolicy::new(fallback_ms));
            let summary = framestitch::convert_gif_fps_with_options(
                &input,
                &output,
                &options,
                &job_options(&cli.global)?,
            )?;

            println!(
                "{} {}",
                "wrote".green().bold(),
                format!(
                    "{} (frames {} -> {}, {} fps)",
                    output.display(),
                    summary.source_frames,
                    summary.output_frames,
                    summary.target_fps
                )
                .green()
            );
        }
        Commands::StitchGif {
            repo_root,
            datasets,
            left,
            right,
            output,
            fps,
            scale,
            no_strict,
        } => {
            require_positive("--fps", fps)?;
            require_positive("--scale", scale)?;
            let options = StitchOptions::new().fps(fps).scale(scale).strict(!no_strict);

            let jobs: Vec<(PathBuf, PathBuf, PathBuf)> = match (left, right, output) {
                (Some(left), Some(right), Some(output)) => vec![(left, right, output)],
                _ => datasets
                    .iter()
                    .map(|dataset| {
                        let paths = SequencePaths::resolve(&repo_root, dataset);
                        let out = framestitch::gif_output_path(&repo_root, dataset);
                        (paths.left_dir, paths.right_dir, out)
                    })
                    .collect(),
            };

            for (left_dir, right_dir, out) in jobs {
                ensure_writable_path(&out, cli.global.overwrite)?;
                println!("Building {} from:", out.display());
                println!("  left:  {}", left_dir.display());
                println!("  right: {}", right_dir.display());

                let summary = framestitch::build_side_by_side_gif_with_options(
                    &left_dir,
                    &right_dir,
                    &out,
                    &options,
                    &job_options(&cli.global)?,
                )?;
                println!(
                    "  {} {} frames, {}x{}",
                    "done".green().bold(),
                    summary.frame_count,
                    summary.width,
                    summary.height
                );
            }
        }
        Commands::StitchVideo {
            repo_root,
            datasets,
            fps,
            height,
            mode,
            perspective,
            crf,
            preset,
            ffmpeg,
        } => {
            let mut options = VideoStitchOptions::new()
                .fps(fps)
                .height(height)
                .layout(video_layout(mode, perspective))
                .crf(crf)
                .preset(preset);
            if let Some(ffmpeg) = ffmpeg {
                options = options.ffmpeg(ffmpeg);
            }
            options.validate()?;

            for dataset in &datasets {
                println!("Stitching dataset {dataset} ...");
                let paths = SequencePaths::resolve(&repo_root, dataset);
                let out = framestitch::video_output_path(&repo_root, dataset, &options);
                ensure_writable_path(&out, cli.global.overwrite)?;

                let written =
                    framestitch::stitch_video(&paths.left_dir, &paths.right_dir, &out, &options)?;
                println!("  {} {}", "wrote".green().bold(), written.display());
            }
        }
        Commands::Inspect { input, json } => {
            let decoded = framestitch::decode_gif(&input, DurationPolicy::default())?;
            let analysis = GifTimingAnalysis::from_durations(&decoded.durations_ms);
            let (width, height) = decoded
                .frames
                .first()
                .map(|frame| frame.dimensions())
                .unwrap_or((0, 0));

            if json {
                let payload = json!({
                    "width": width,
                    "height": height,
                    "frame_count": analysis.frame_count,
                    "total_duration_ms": analysis.total_duration_ms,
                    "mean_frame_duration_ms": analysis.mean_frame_duration_ms,
                    "frame_duration_stddev_ms": analysis.frame_duration_stddev_ms,
                    "min_fps": analysis.min_frames_per_second,
                    "max_fps": analysis.max_frames_per_second,
                    "mean_fps": analysis.mean_frames_per_second,
                    "variable_frame_rate": analysis.is_variable_frame_rate,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Size: {width}x{height}");
                println!(
                    "Frames: {} over {} ms",
                    analysis.frame_count, analysis.total_duration_ms
                );
                println!(
                    "Rate: {:.2} fps (min {:.2}, max {:.2})",
                    analysis.mean_frames_per_second,
                    analysis.min_frames_per_second,
                    analysis.max_frames_per_second
                );
                if analysis.is_variable_frame_rate {
                    println!("{}", "Variable frame rate".yellow());
                }
            }
        }
        Commands::Check { left, right } => {
            let report = framestitch::validate_sequences(&left, &right);
            print!("{report}");
            if !report.is_valid() {
                return Err("sequences cannot be stitched".into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framestitch", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, ModeArg, PerspectiveArg, require_positive, video_layout};
    use clap::Parser;
    use framestitch::{Perspective, VideoLayout};

    #[test]
    fn video_layout_from_flags() {
        assert_eq!(
            video_layout(ModeArg::Stitch, PerspectiveArg::Right),
            VideoLayout::SideBySide
        );
        assert_eq!(
            video_layout(ModeArg::Single, PerspectiveArg::Right),
            VideoLayout::Single(Perspective::Right)
        );
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("--fps", 12.0).is_ok());
        assert!(require_positive("--fps", 0.0).is_err());
        assert!(require_positive("--fps", -1.0).is_err());
        assert!(require_positive("--fps", f64::NAN).is_err());
    }

    #[test]
    fn convert_fps_defaults() {
        let cli = Cli::try_parse_from(["framestitch", "convert-fps", "--input", "a.gif"]).unwrap();
        match cli.command {
            Commands::ConvertFps {
                dst_fps,
                output,
                fallback_ms,
                ..
            } => {
                assert_eq!(dst_fps, 12.0);
                assert!(output.is_none());
                assert_eq!(fallback_ms, 33);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stitch_video_defaults() {
        let cli = Cli::try_parse_from(["framestitch", "stitch-video"]).unwrap();
        match cli.command {
            Commands::StitchVideo {
                datasets,
                fps,
                height,
                mode,
                crf,
                preset,
                ..
            } => {
                assert_eq!(datasets, vec!["25".to_string(), "50".to_string()]);
                assert_eq!(fps, 30.0);
                assert_eq!(height, 480);
                assert_eq!(mode, ModeArg::Single);
                assert_eq!(crf, 28);
                assert_eq!(preset, "slow");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stitch_gif_explicit_pair_requires_all_paths() {
        let missing = Cli::try_parse_from(["framestitch", "stitch-gif", "--left", "l"]);
        assert!(missing.is_err());

        let complete = Cli::try_parse_from([
            "framestitch",
            "stitch-gif",
            "--left",
            "l",
            "--right",
            "r",
            "--output",
            "o.gif",
            "--no-strict",
        ]);
        assert!(complete.is_ok());
    }
}
