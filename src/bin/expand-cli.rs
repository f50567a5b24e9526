//! expand-cli - Command-line interface for lzexpand
//!
//! A command-line tool for expanding SZDD, QBasic installer and KWAJ
//! compressed files.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use lzexpand::{Container, DecodeStats, FormatVariant, LzDecoder, LzError};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "expand-cli")]
#[command(about = "A CLI tool for expanding legacy SZDD / KWAJ compressed files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a compressed file
    Expand {
        /// Input compressed file
        input: PathBuf,

        /// Output expanded file
        output: PathBuf,

        /// Treat the whole input as a bare stream of this variant instead of detecting a header
        #[arg(short, long, value_enum)]
        raw: Option<CliVariant>,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a compressed file
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliVariant {
    /// SZDD token stream
    Standard,
    /// QBasic 4.5 installer token stream
    Qbasic,
    /// Stored bytes
    Raw,
    /// Stored bytes XORed with 0xFF
    Xor,
}

impl From<CliVariant> for FormatVariant {
    fn from(variant: CliVariant) -> Self {
        match variant {
            CliVariant::Standard => FormatVariant::Standard,
            CliVariant::Qbasic => FormatVariant::QBasicInstaller,
            CliVariant::Raw => FormatVariant::PassthroughRaw,
            CliVariant::Xor => FormatVariant::PassthroughXor,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Expand {
            input,
            output,
            raw,
            force,
        } => expand_file(
            &input,
            &output,
            raw.map(Into::into),
            force,
            cli.verbose,
            cli.quiet,
        ),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Decode `data`, either as a container file or as a bare stream of `raw`
fn decode(
    data: &[u8],
    raw: Option<FormatVariant>,
) -> Result<(Option<Container>, Vec<u8>, DecodeStats), LzError> {
    let (container, variant, body) = match raw {
        Some(variant) => (None, variant, data),
        None => {
            let container = Container::detect(data)?;
            let variant = container.variant();
            let body = data.get(container.data_offset()..).unwrap_or_default();
            (Some(container), variant, body)
        }
    };

    let mut decoder = LzDecoder::new(variant);
    let mut output = Vec::new();
    if !decoder.decompress(body, &mut output)? {
        return Err(LzError::UnsupportedVariant(variant));
    }
    Ok((container, output, decoder.stats().clone()))
}

fn expand_file(
    input: &PathBuf,
    output: &PathBuf,
    raw: Option<FormatVariant>,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!("Expanding '{}' to '{}'", input.display(), output.display());
    }

    let start_time = Instant::now();

    // Read input file
    let compressed_data = fs::read(input)?;
    let input_size = compressed_data.len();

    if verbose {
        println!("Compressed size: {} bytes", input_size);
    }

    // Show progress bar for large files
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new(2);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Expanding...");
        Some(pb)
    } else {
        None
    };

    if let Some(ref pb) = progress {
        pb.inc(1);
    }

    let (container, expanded_data, stats) =
        decode(&compressed_data, raw).map_err(|e| format!("Expansion failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Expansion complete");
    }

    // Write output file
    fs::write(output, &expanded_data)?;

    let expansion_time = start_time.elapsed();
    let output_size = expanded_data.len();

    if !quiet {
        println!("✓ Expansion successful!");
        if let Some(ref container) = container {
            println!("  Format: {} ({:?})", container.name(), container.variant());
        }
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  Time:   {:.2?}", expansion_time);

        if verbose {
            println!(
                "  Tokens: {} literals, {} matches (longest {})",
                stats.literal_count, stats.match_count, stats.longest_match
            );
        }

        if let Some(expected) = container.as_ref().and_then(Container::uncompressed_size) {
            if expected as usize != output_size {
                println!(
                    "  Note: header declares {} bytes; stream ended after {}",
                    expected, output_size
                );
            }
        }
    }

    Ok(())
}

fn show_file_info(input: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Read the file
    let data = fs::read(input)?;
    let file_size = data.len();

    let container = Container::detect(&data)?;

    println!("Compressed File Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", file_size);
    println!("  Container: {}", container.name());
    println!("  Variant: {:?}", container.variant());
    println!("  Data Offset: {}", container.data_offset());
    match container.uncompressed_size() {
        Some(size) => println!("  Declared Size: {} bytes", size),
        None => println!("  Declared Size: (not recorded)"),
    }

    if let Container::Kwaj(ref header) = container {
        println!("  KWAJ Method: {}", header.method);
        if let Some(ref name) = header.file_name {
            match header.extension {
                Some(ref ext) => println!("  Original Name: {}.{}", name, ext),
                None => println!("  Original Name: {}", name),
            }
        }
    }

    if verbose {
        let shown = container.data_offset().min(data.len());
        let header_hex: Vec<String> = data[..shown].iter().map(|b| format!("{b:02x}")).collect();
        println!("  Header bytes: {}", header_hex.join(" "));
    }

    // Try a full decode to report the real size
    match decode(&data, None) {
        Ok((_, expanded, _)) => {
            println!("  Expanded Size: {} bytes", expanded.len());
            println!("  Status: ✓ Decodable");
        }
        Err(e) => {
            println!("  Status: ✗ Not decodable");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}
