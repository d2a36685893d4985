use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;

use canon_huff::config::CodecConfig;
use canon_huff::Codec;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Compress the input file
    #[value(name = "c")]
    Compress,
    /// Decompress the input file
    #[value(name = "d")]
    Decompress,
    /// Print the container header as JSON
    #[value(name = "i")]
    Inspect,
}

#[derive(Parser, Debug)]
#[command(version, about = "Canonical Huffman file compressor")]
struct Args {
    #[arg(value_enum)]
    mode: Mode,
    /// File to read
    input: PathBuf,
    /// File to write (not used by `i`)
    output: Option<PathBuf>,
    /// JSON codec configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let codec = Codec::new(config);

    match args.mode {
        Mode::Compress => compress(&codec, &args.input, output_path(args)?),
        Mode::Decompress => decompress(&codec, &args.input, output_path(args)?),
        Mode::Inspect => inspect(&codec, &args.input),
    }
}

fn output_path(args: &Args) -> anyhow::Result<&Path> {
    match &args.output {
        Some(path) => Ok(path.as_path()),
        None => bail!("mode {:?} needs an output file", args.mode),
    }
}

fn compress(codec: &Codec, input: &Path, output: &Path) -> anyhow::Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let file =
        File::create(output).with_context(|| format!("creating {}", output.display()))?;
    codec
        .compress_to(&data, BufWriter::new(file))
        .context("encoding failed")?;
    Ok(())
}

fn decompress(codec: &Codec, input: &Path, output: &Path) -> anyhow::Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("opening {}", input.display()))?,
    );
    let writer = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    codec
        .decompress_to(reader, writer)
        .context("decoding failed")?;
    Ok(())
}

fn inspect(codec: &Codec, input: &Path) -> anyhow::Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let summary = codec.inspect(&data).context("reading header failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
