//! chess-stego CLI
//!
//! Encodes a message into PGN games or decodes one back out of a PGN file.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use chess_stego::text::{decode_text, read_pgn_file};
use chess_stego::{CodecConfig, StegoCodec};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chess-stego")]
#[command(about = "Hide messages inside chess games")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a message into PGN
    Encode {
        message: String,
        key: String,

        /// Write the PGN to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a message from a PGN file ("-" reads stdin)
    Decode { pgn_file: PathBuf, key: String },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only PGN or the decoded message.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Load .env file for local overrides
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = CodecConfig::from_env()?;

    match args.command {
        Command::Encode {
            message,
            key,
            output,
        } => {
            let codec = StegoCodec::new(&key, config)?;
            let encoded = codec.encode(&message);
            info!(
                games = encoded.games.len(),
                moves = encoded.total_moves(),
                truncated = encoded.truncated,
                "Message encoded"
            );

            let pgn = encoded.to_pgn();
            match output {
                Some(path) => fs::write(&path, pgn)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{pgn}"),
            }
        }
        Command::Decode { pgn_file, key } => {
            let pgn = if pgn_file.as_os_str() == "-" {
                let mut raw = Vec::new();
                io::stdin()
                    .read_to_end(&mut raw)
                    .context("Failed to read stdin")?;
                decode_text(&raw)
                    .map(|(text, _)| text)
                    .context("Could not decode stdin with any supported text encoding")?
            } else {
                read_pgn_file(&pgn_file)?
            };

            let codec = StegoCodec::new(&key, config)?;
            let (message, report) = codec.decode_with_report(&pgn);
            info!(
                games = report.games,
                data_moves = report.data_moves,
                noise_moves = report.noise_moves,
                bits = report.bits,
                "Message decoded"
            );
            println!("{message}");
        }
    }

    Ok(())
}
