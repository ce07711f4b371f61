use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use watermarker::{
    Config,
    batch::{DEFAULT_OUTPUT_DIRECTORY, Watermarker},
    startup_checks,
    watermark::{MaskMode, WatermarkPosition},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Add watermark to images", long_about = None)]
struct Cli {
    /// Image file path or directory path which contains images
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Watermark image path to apply to inputted images
    #[arg(short, long, visible_alias = "w")]
    watermark: Option<PathBuf>,

    /// Position to place watermark (default: center)
    #[arg(
        short = 'p',
        long = "watermark_position",
        visible_aliases = ["wp", "watermark-position"],
        value_enum
    )]
    watermark_position: Option<WatermarkPosition>,

    /// Scale factor to resize watermark, relative to each image (default: 0.5)
    #[arg(
        short = 's',
        long = "scale_watermark",
        visible_aliases = ["sw", "scale-watermark"]
    )]
    scale_watermark: Option<f64>,

    /// Output directory to save watermarked images (default: ./watermarked_images)
    #[arg(
        short,
        long = "output_directory",
        visible_alias = "output-directory"
    )]
    output_directory: Option<PathBuf>,

    /// Watermark opacity between 0 and 1 (default: 1.0)
    #[arg(long)]
    opacity: Option<f32>,

    /// How watermark coverage is derived (default: inverted-luminance)
    #[arg(long, value_enum)]
    mask: Option<MaskMode>,

    /// Descend into subdirectories of the input directory
    #[arg(short, long)]
    recursive: bool,

    /// File name prefix for watermarked images (default: watermarked_)
    #[arg(long)]
    prefix: Option<String>,

    /// JPEG output quality, 1-100 (default: 90)
    #[arg(long)]
    jpeg_quality: Option<u8>,

    #[arg(short, long, default_value = "watermark.toml")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_from(expand_two_letter_flags(std::env::args_os()));

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::load_or_default(&cli.config)?;
    apply_cli_overrides(&cli, &mut config);

    let input = match cli.input {
        Some(input) => input,
        None => prompt_for_path(
            "Enter path to image file or directory of images that you want to watermark: ",
        )?,
    };
    let watermark_path = match cli.watermark {
        Some(watermark) => watermark,
        None => prompt_for_path("Enter path to watermark file: ")?,
    };

    let default_output = std::env::current_dir()?.join(DEFAULT_OUTPUT_DIRECTORY);
    let options = config.batch_options(default_output);

    if let Err(errors) =
        startup_checks::perform_startup_checks(&input, &watermark_path, &options.output_directory)
    {
        for e in &errors {
            error!("Startup check failed: {}", e);
        }
        return Err("Startup checks failed".into());
    }

    info!(
        "Applying {:?} at {} (scale {}, opacity {}, mask {:?})",
        watermark_path,
        options.watermark.position,
        options.watermark.scale,
        options.watermark.opacity,
        options.watermark.mask
    );

    let watermarker = Watermarker::new(&watermark_path, options)?;
    let report = watermarker.run(&input)?;

    if !report.is_success() {
        for (path, e) in &report.failed {
            error!("{:?}: {}", path, e);
        }
        error!(
            "{} of {} images could not be watermarked",
            report.failed.len(),
            report.total()
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Two-letter short flags accepted by the command line
const TWO_LETTER_FLAGS: [&str; 2] = ["wp", "sw"];

/// Rewrite `-wp`/`-sw` (and their `=value` forms) to the long aliases clap knows.
///
/// Clap short flags are single characters, so `-wp` would otherwise parse as
/// `-w p`. Arguments after `--` are left untouched.
fn expand_two_letter_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            if positional_only {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                positional_only = true;
                return arg;
            }

            let is_two_letter_flag = TWO_LETTER_FLAGS.iter().any(|flag| {
                text.strip_prefix('-')
                    .and_then(|rest| rest.strip_prefix(flag))
                    .is_some_and(|tail| tail.is_empty() || tail.starts_with('='))
            });
            if is_two_letter_flag {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(position) = cli.watermark_position {
        config.watermark.position = position;
    }
    if let Some(scale) = cli.scale_watermark {
        config.watermark.scale = scale;
    }
    if let Some(opacity) = cli.opacity {
        config.watermark.opacity = opacity;
    }
    if let Some(mask) = cli.mask {
        config.watermark.mask = mask;
    }
    if let Some(directory) = &cli.output_directory {
        config.output.directory = Some(directory.clone());
    }
    if let Some(prefix) = &cli.prefix {
        config.output.prefix = prefix.clone();
    }
    if let Some(quality) = cli.jpeg_quality {
        config.output.jpeg_quality = quality;
    }
    if cli.recursive {
        config.output.recursive = true;
    }
}

fn prompt_for_path(message: &str) -> std::io::Result<PathBuf> {
    print!("{}", message);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
