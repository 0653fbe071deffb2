use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use image::ImageReader;
use polaroid_core::prelude::*;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "polaroid",
    about = "Render film-look polaroid composites and collages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one or more photos into a polaroid JPEG
    Render(RenderArgs),
}

#[derive(Parser, Debug, Clone)]
struct RenderArgs {
    // Input/Output
    /// Input image files, in slot order (collage layouts use at most four)
    #[arg(required = true, help_heading = "Input/Output")]
    inputs: Vec<PathBuf>,
    /// Output JPEG path
    #[arg(short, long, default_value = "polaroid.jpg", help_heading = "Input/Output")]
    out: PathBuf,

    // Composition
    /// Handwritten caption below the photo (framed renders)
    #[arg(long, default_value = "", help_heading = "Composition")]
    caption: String,
    /// Date line below the caption (framed renders)
    #[arg(long, default_value = "", help_heading = "Composition")]
    date: String,
    /// Collage style: grid|scrapbook
    #[arg(long, default_value = "grid", help_heading = "Composition")]
    style: String,
    /// Skip the paper border and caption strip (photo area only)
    #[arg(long, default_value_t = false, help_heading = "Composition")]
    frameless: bool,
    /// Per-image focal pan "x,y" in [0,1]; repeat per input, in order
    #[arg(long, help_heading = "Composition")]
    offset: Vec<String>,
    /// Texture RNG seed for reproducible grain/dust/leak placement
    #[arg(long, help_heading = "Composition")]
    seed: Option<u64>,

    // Typography
    /// Script typeface for the caption (.ttf/.otf)
    #[arg(long, help_heading = "Typography")]
    caption_font: Option<PathBuf>,
    /// Sans typeface for the date line (.ttf/.otf)
    #[arg(long, help_heading = "Typography")]
    date_font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        Commands::Render(args) => run_render(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let style = LayoutStyle::from_str(&args.style)
        .map_err(|_| anyhow::anyhow!("unknown style `{}` (grid|scrapbook)", args.style))?;
    if args.offset.len() > args.inputs.len() {
        bail!(
            "{} offsets given for {} inputs",
            args.offset.len(),
            args.inputs.len()
        );
    }

    let mut photos = Vec::with_capacity(args.inputs.len());
    for (i, path) in args.inputs.iter().enumerate() {
        let img = ImageReader::open(path)
            .with_context(|| format!("open {}", path.display()))?
            .decode()
            .with_context(|| format!("decode {}", path.display()))?;
        let photo = match args.offset.get(i) {
            Some(raw) => Photo::with_focus(img, parse_offset(raw)?),
            None => Photo::new(img),
        };
        photos.push(photo);
    }

    let fonts = match (&args.caption_font, &args.date_font) {
        (Some(caption), Some(date)) => Some(FontSet::load(caption, date)?),
        (None, None) => None,
        _ => bail!("--caption-font and --date-font must be given together"),
    };

    let cfg = RenderConfig::builder().seed(args.seed).fonts(fonts).build();
    let spec = RenderSpec {
        photos,
        caption: args.caption,
        date: args.date,
        style,
        framed: !args.frameless,
    };

    let out = render(&spec, &cfg, &CenterCrop)?;
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write {}", args.out.display()))?;
    info!(
        "wrote {} ({}x{}, {} bytes)",
        args.out.display(),
        out.width,
        out.height,
        out.bytes.len()
    );
    Ok(())
}

fn parse_offset(raw: &str) -> anyhow::Result<FocalOffset> {
    let (x, y) = raw
        .split_once(',')
        .with_context(|| format!("offset `{raw}` is not of the form x,y"))?;
    let x: f32 = x.trim().parse().with_context(|| format!("offset x in `{raw}`"))?;
    let y: f32 = y.trim().parse().with_context(|| format!("offset y in `{raw}`"))?;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        bail!("offset `{raw}` outside [0,1]");
    }
    Ok(FocalOffset::new(x, y))
}
