use clap::{ArgGroup, Parser};
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use patchify::class_names::{load_class_names, name_for_label};
use patchify::patch_grid::PatchGrid;
use patchify::plot_grid::{PlotConfig, render_patch_grid};

#[derive(Parser, Debug)]
#[command(
    name = "patchify",
    about = "Split a square image into fixed-size patches and render them as a labelled grid",
    version,
    group(
        ArgGroup::new("class")
            .args(["classes", "class_name"])
    )
)]
struct Cli {
    /// Input image
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// Class-name file: JSON array or newline-separated names
    #[arg(short = 'c', long = "classes")]
    classes: Option<PathBuf>,

    /// Class name to put in the figure title directly
    #[arg(long = "class-name")]
    class_name: Option<String>,

    /// Label index into the class-name list
    #[arg(short = 'l', long = "label", default_value_t = 0)]
    label: usize,

    /// Expected image height and width, in pixels
    #[arg(long = "img-size", default_value_t = 224)]
    img_size: u32,

    /// Patch height and width, in pixels; must evenly divide img-size
    #[arg(long = "patch-size", default_value_t = 16)]
    patch_size: u32,

    /// Resize the input to img-size x img-size before patchifying
    #[arg(long = "resize")]
    resize: bool,

    /// Also write a JSON summary of the patch layout
    #[arg(long = "summary")]
    summary: bool,

    /// Output path (defaults to <stem>_patchified.png)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(OsStr::to_str).unwrap_or("image")
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let grid = PatchGrid::new(cli.img_size, cli.patch_size)?;

    let img = image::open(&cli.image)?;
    let mut rgb = img.to_rgb8();
    if cli.resize {
        rgb = image::imageops::resize(
            &rgb,
            cli.img_size,
            cli.img_size,
            image::imageops::FilterType::Triangle,
        );
    }

    let class_name = match (&cli.classes, &cli.class_name) {
        (Some(path), _) => {
            let names = load_class_names(path)?;
            name_for_label(&names, cli.label)?.to_string()
        }
        (None, Some(name)) => name.clone(),
        (None, None) => stem_of(&cli.image).to_string(),
    };

    let figure = render_patch_grid(&rgb, &class_name, grid, &PlotConfig::default())?;

    let out = cli
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_patchified.png", stem_of(&cli.image))));
    figure.save(&out)?;
    println!(
        "Wrote {} ({} patches of {}x{} px)",
        out.display(),
        grid.cell_count(),
        grid.patch_size(),
        grid.patch_size()
    );

    if cli.summary {
        let out_summary = PathBuf::from(format!("{}_patches.json", stem_of(&cli.image)));
        let s = serde_json::to_string_pretty(&grid.summary())?;
        fs::write(&out_summary, s)?;
        println!("Wrote {}", out_summary.display());
    }

    Ok(())
}
