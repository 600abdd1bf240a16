//! whichwad CLI - find which WAD in a mod path contains a texture.
//!
//! This is the main entry point for the whichwad command-line application.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use whichwad::prelude::*;
use whichwad::unsteampipe;

/// Process exit code when the user declines to create the output directory.
const EXIT_OUTPUT_DIR: u8 = 2;

/// Find which WAD in the mod path contains the specified texture
#[derive(Parser)]
#[command(name = "whichwad")]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Path to the mod with the WAD files, e.g. ".../steamapps/Half-Life/valve"
    mod_path: PathBuf,

    /// Texture(s) to search for, use ';' to delimit multiple patterns
    texture: String,

    /// Extract the matched textures
    #[arg(short, long)]
    extract: bool,

    /// Output directory for extracted textures
    #[arg(short, long, default_value = "extracted")]
    output: PathBuf,
}

/// Asks the user on stdin; anything other than y/yes counts as no.
struct StdinOracle;

impl ConfirmOracle for StdinOracle {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if !cli.mod_path.is_dir() {
        anyhow::bail!("{} is not a directory", cli.mod_path.display());
    }

    let mod_path = unsteampipe(&cli.mod_path);
    let archives = locate(&cli.mod_path).context("failed to enumerate WAD files")?;

    let mut cache = IndexCache::new();
    let mut all_found: Vec<MatchGroup> = Vec::new();

    for pattern in split_patterns(&cli.texture) {
        let resolution = match resolve(&archives, pattern, &mut cache) {
            Ok(resolution) => resolution,
            Err(err) => {
                eprintln!("skipping pattern '{pattern}': {err}");
                continue;
            }
        };

        for (path, err) in &resolution.unreadable {
            eprintln!("skipping {}: {}", path.display(), err);
        }

        if resolution.matches.is_empty() {
            eprintln!(
                "No texture names matching '{pattern}' found in any WAD in {}",
                mod_path.display()
            );
            continue;
        }

        println!(
            "{} texture names matching '{pattern}' found:",
            resolution.matches.len()
        );
        for (name, owners) in resolution.matches.iter() {
            println!("\t{name} found in {} WADs:", owners.len());
            for &idx in owners {
                println!("\t{}", archives[idx].path.display());
            }
        }

        all_found.push(resolution.matches);
    }

    if !cli.extract || all_found.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    println!();

    let mut oracle = StdinOracle;

    if !ensure_output_dir(&cli.output, &mut oracle)? {
        eprintln!("Output dir not created, aborted");
        return Ok(ExitCode::from(EXIT_OUTPUT_DIR));
    }

    for group in &all_found {
        extract_group(group, &archives, &mut cache, &mut oracle, &cli.output)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Make sure the output directory exists, asking before creating it.
///
/// Returns `Ok(false)` if the directory is absent and the user declined to
/// create it; nothing is written in that case.
fn ensure_output_dir(path: &Path, oracle: &mut impl ConfirmOracle) -> Result<bool> {
    if path.exists() {
        return Ok(true);
    }

    let prompt = format!("{} does not exist. Create it?", path.display());
    if !oracle.confirm(&prompt) {
        return Ok(false);
    }

    fs::create_dir_all(path).context("failed to create output directory")?;
    println!("{} created", path.display());
    Ok(true)
}

/// Extract every matched name of one pattern, prompting on ambiguity.
fn extract_group(
    group: &MatchGroup,
    archives: &[WadFile],
    cache: &mut IndexCache,
    oracle: &mut StdinOracle,
    output: &Path,
) -> Result<()> {
    for (name, owners) in group.iter() {
        let output_file = output.join(format!("{name}.bmp"));

        if owners.len() > 1 {
            println!("{name} found in {} WADs. It's time to choose:", owners.len());
        }

        let mut machine = ChoiceMachine::new(owners.len());
        let picked = machine.run(oracle, |i| {
            format!("Extract from {}?", archives[owners[i]].file_name())
        });
        let Some(picked) = picked else {
            continue;
        };

        let wad = &archives[owners[picked]];
        let archive = cache
            .get(&wad.path)
            .with_context(|| format!("failed to reopen {}", wad.path.display()))?;
        let texture = archive
            .read_texture(name)
            .with_context(|| format!("failed to read {name} from {}", wad.file_name()))?;

        let bmp = whichwad::bmp::encode(&IndexedImage {
            width: texture.width,
            height: texture.height,
            pixels: &texture.pixels,
            palette: &texture.palette,
        })
        .with_context(|| format!("failed to encode {name}"))?;

        fs::write(&output_file, bmp)
            .with_context(|| format!("failed to write {}", output_file.display()))?;
        println!(
            "Saving texture from {} to {}",
            wad.file_name(),
            output_file.display()
        );
    }

    Ok(())
}
