use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_crop::{CropPlan, CropPreset, CropRect, Parity, SaveOptions, ScopedRects};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "croppdf-cli", about = "Crop PDF pages without the GUI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count, sizes, rotation and parity
    Info {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Apply crop rectangles and optionally delete pages
    ///
    /// Rectangles are `left,top,right,bottom` in points, measured from each
    /// page's top-left corner.
    Crop {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Rectangle for every page
        #[arg(long, value_parser = parse_rect, conflicts_with_all = ["odd", "even", "preset"])]
        all: Option<CropRect>,

        /// Rectangle for odd pages (1, 3, 5, ...)
        #[arg(long, value_parser = parse_rect, conflicts_with = "preset")]
        odd: Option<CropRect>,

        /// Rectangle for even pages (2, 4, 6, ...)
        #[arg(long, value_parser = parse_rect, conflicts_with = "preset")]
        even: Option<CropRect>,

        /// Crop preset exported from the GUI (JSON)
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Pages to delete, 1-based and comma separated (e.g. 2,4)
        #[arg(long, value_delimiter = ',')]
        delete: Vec<usize>,

        /// Skip stream compression when writing
        #[arg(long)]
        fast_save: bool,
    },
}

/// Parse `left,top,right,bottom` into a crop rectangle
fn parse_rect(s: &str) -> Result<CropRect, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;
    let edges: [f64; 4] = values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected 4 values (left,top,right,bottom), got {}", v.len()))?;
    CropRect::try_from(edges).map_err(|e| e.to_string())
}

/// Convert 1-based page numbers to 0-based indices
fn page_indices(numbers: &[usize]) -> Result<Vec<usize>> {
    numbers
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .with_context(|| format!("Page numbers start at 1, got {}", n))
        })
        .collect()
}

async fn scoped_rects(
    all: Option<CropRect>,
    odd: Option<CropRect>,
    even: Option<CropRect>,
    preset: Option<PathBuf>,
) -> Result<ScopedRects> {
    let rects = match (all, preset) {
        (Some(rect), _) => ScopedRects::All { rect: Some(rect) },
        (None, Some(path)) => {
            CropPreset::load(&path)
                .await
                .with_context(|| format!("Failed to load crop preset {}", path.display()))?
                .rects
        }
        (None, None) => ScopedRects::Parity { odd, even },
    };
    anyhow::ensure!(
        !rects.is_empty(),
        "No crop rectangle given (use --all, --odd/--even or --preset)"
    );
    Ok(rects)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => {
            let doc = pdf_crop::load_pdf(&input)
                .await
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let pages = pdf_crop::page_infos(&doc)?;

            println!("{}: {} pages", input.display(), pages.len());
            for page in &pages {
                let parity = match page.parity() {
                    Parity::Odd => "odd",
                    Parity::Even => "even",
                };
                println!(
                    "  Page {}: {:.1} x {:.1} pt, rotation {}, {}",
                    page.index + 1,
                    page.size.width,
                    page.size.height,
                    page.rotation,
                    parity
                );
            }
        }

        Commands::Crop {
            input,
            output,
            all,
            odd,
            even,
            preset,
            delete,
            fast_save,
        } => {
            let rects = scoped_rects(all, odd, even, preset).await?;
            let deleted = page_indices(&delete)?;

            let doc = pdf_crop::load_pdf(&input)
                .await
                .with_context(|| format!("Failed to open {}", input.display()))?;

            // Rectangles are already in points, so each page's preview is the page itself
            let sizes = pdf_crop::page_infos(&doc)?
                .iter()
                .map(|p| (p.size.width, p.size.height))
                .collect();
            let plan = CropPlan::new(rects, sizes).skipping(deleted.iter().copied());

            let mut cropped = pdf_crop::apply_crop(&doc, &plan).await?;
            if !deleted.is_empty() {
                pdf_crop::delete_pages(&mut cropped, &deleted)?;
            }

            pdf_crop::save_pdf(&cropped, &output, SaveOptions { fast_save })
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Cropped {} pages → {}",
                cropped.get_pages().len(),
                output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect() {
        let rect = parse_rect("36, 36,576,756").unwrap();
        assert_eq!(<[f64; 4]>::from(rect), [36.0, 36.0, 576.0, 756.0]);
    }

    #[test]
    fn test_parse_rect_rejects_bad_input() {
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,3,x").is_err());
        // Right edge left of the left edge
        assert!(parse_rect("100,0,50,10").is_err());
    }

    #[test]
    fn test_page_indices_are_zero_based() {
        assert_eq!(page_indices(&[2, 4]).unwrap(), vec![1, 3]);
        assert!(page_indices(&[0]).is_err());
    }

    #[test]
    fn test_cli_rejects_conflicting_rects() {
        let result = Cli::try_parse_from([
            "croppdf-cli",
            "crop",
            "-i",
            "in.pdf",
            "-o",
            "out.pdf",
            "--all",
            "0,0,10,10",
            "--odd",
            "0,0,10,10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_delete_list() {
        let cli = Cli::try_parse_from([
            "croppdf-cli",
            "crop",
            "-i",
            "in.pdf",
            "-o",
            "out.pdf",
            "--odd",
            "0,0,10,10",
            "--delete",
            "2,4",
        ])
        .unwrap();
        match cli.command {
            Commands::Crop { delete, odd, .. } => {
                assert_eq!(delete, vec![2, 4]);
                assert!(odd.is_some());
            }
            _ => panic!("expected crop command"),
        }
    }

    #[tokio::test]
    async fn test_scoped_rects_requires_a_rectangle() {
        assert!(scoped_rects(None, None, None, None).await.is_err());

        let rect = CropRect::new(0.0, 0.0, 10.0, 10.0);
        let rects = scoped_rects(None, rect, None, None).await.unwrap();
        assert_eq!(rects, ScopedRects::Parity { odd: rect, even: None });
    }
}
