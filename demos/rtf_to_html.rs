//! Command-line tool for converting RTF documents to HTML fragments.
//!
//! # Usage
//!
//! Print the HTML for a document:
//! ```sh
//! cargo run --example rtf_to_html -- input.rtf
//! ```
//!
//! Write to a file, with UTF-8 output and a default font:
//! ```sh
//! cargo run --example rtf_to_html -- input.rtf -o output.html \
//!     --encoding utf-8 \
//!     --default-font 0
//! ```
//!
//! Convert several documents into a directory:
//! ```sh
//! cargo run --example rtf_to_html -- *.rtf -o output_dir/
//! ```

use clap::Parser;
use rtfhtml::{HtmlOptions, OutputEncoding, RtfDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Convert RTF documents to HTML
#[derive(Parser, Debug)]
#[command(
    name = "rtf_to_html",
    about = "Convert Rich Text Format documents to HTML fragments",
    version
)]
struct Args {
    /// Input file(s) to convert
    #[arg(value_name = "INPUT", required = true)]
    input: Vec<PathBuf>,

    /// Output file or directory; HTML is printed when omitted
    ///
    /// If a directory is specified (ending with /), output files are created
    /// with the same basename as the input files and an .html extension.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Font used where the document selects none
    #[arg(long, value_name = "FONT")]
    default_font: Option<i32>,

    /// Output character encoding ("HTML-ENTITIES" or "utf-8")
    #[arg(long, default_value = "HTML-ENTITIES")]
    encoding: String,

    /// Verbose output (progress and debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG overrides the level picked by --verbose
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    for input in &args.input {
        if !input.is_file() {
            eprintln!("Error: Input file does not exist: {}", input.display());
            std::process::exit(1);
        }
    }

    let output_is_dir = args.output.as_ref().is_some_and(|output| {
        output.to_string_lossy().ends_with('/') || output.is_dir()
    });
    if args.input.len() > 1 && args.output.is_some() && !output_is_dir {
        eprintln!("Error: Multiple input files require output to be a directory");
        std::process::exit(1);
    }
    if let Some(output) = &args.output
        && output_is_dir
    {
        fs::create_dir_all(output)?;
    }

    let options = HtmlOptions {
        default_font: args.default_font,
        encoding: OutputEncoding::from_label(&args.encoding),
    };

    let mut error_count = 0;
    for input in &args.input {
        let output_path = match &args.output {
            Some(output) if output_is_dir => {
                let stem = input
                    .file_stem()
                    .ok_or_else(|| format!("Invalid input filename: {}", input.display()))?
                    .to_string_lossy();
                Some(output.join(format!("{stem}.html")))
            },
            other => other.clone(),
        };

        match convert(input, output_path.as_deref(), &options) {
            Ok(()) => log::info!("Converted {}", input.display()),
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                error_count += 1;
            },
        }
    }

    if error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn convert(
    input: &Path,
    output: Option<&Path>,
    options: &HtmlOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let html = RtfDocument::open(input)?.to_html_with(options);
    match output {
        Some(path) => fs::write(path, html)?,
        None => println!("{html}"),
    }
    Ok(())
}
