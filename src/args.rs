use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use iconfont::CompileOptions;
use std::path::PathBuf;

/// Convert a directory of SVG icons into an icon font
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input directory (containing your SVG icons)
    #[arg(short = 'i', long = "in")]
    pub input_dir: PathBuf,

    /// Output directory (where the icon font should be written)
    #[arg(short = 'o', long = "out")]
    pub output_dir: PathBuf,

    /// A name for your new font (avoid spaces)
    #[arg(short, long)]
    pub name: Option<String>,

    /// A prefix for your font's CSS class names
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Project manifest to read font settings from [default: ./package.json]
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Run svg2ttf, ttf2woff and ttf2eot on the generated SVG font
    #[arg(long)]
    pub convert: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl From<&Args> for CompileOptions {
    fn from(args: &Args) -> Self {
        CompileOptions {
            input_dir: Some(args.input_dir.clone()),
            output_dir: Some(args.output_dir.clone()),
            name: args.name.clone(),
            prefix: args.prefix.clone(),
            manifest: args.manifest.clone(),
        }
    }
}
