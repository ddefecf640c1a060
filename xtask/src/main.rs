// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Repository maintenance tasks.
//!
//! Single entrypoint for repo automation via `cargo xtask …` (see
//! `.cargo/config.toml`). Not runtime code; it may invoke external tools
//! (`wasm-pack`).

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fdg_driver::DriverConfig;

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "fdg-driver repo maintenance tasks (cargo xtask …)",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the browser crate with `wasm-pack`.
    Wasm(WasmArgs),
    /// Parse and validate a driver config JSON file.
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
struct WasmArgs {
    /// Build with debug assertions instead of the release profile.
    #[arg(long)]
    dev: bool,

    /// `wasm-pack` target (`web`, `bundler`, `nodejs`, `no-modules`).
    #[arg(long, default_value = "web")]
    target: String,

    /// Output directory, relative to the browser crate.
    #[arg(long, default_value = "pkg")]
    out_dir: String,

    /// Install the console panic hook.
    #[arg(long)]
    console_panic: bool,
}

#[derive(Args)]
struct CheckConfigArgs {
    /// JSON file holding a driver config (camelCase keys).
    path: PathBuf,

    /// Print the effective config (defaults filled in).
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Wasm(args) => run_wasm(args),
        Commands::CheckConfig(args) => run_check_config(args),
    }
}

fn run_wasm(args: WasmArgs) -> Result<()> {
    validate_target(&args.target)?;
    let mut cmd = Command::new("wasm-pack");
    cmd.arg("build")
        .arg("crates/fdg-driver-wasm")
        .args(["--target", &args.target])
        .args(["--out-dir", &args.out_dir])
        .arg(if args.dev { "--dev" } else { "--release" });
    if args.console_panic {
        cmd.args(["--", "--features", "console-panic"]);
    }

    let status = cmd
        .status()
        .context("failed to spawn `wasm-pack` (is it installed?)")?;
    if !status.success() {
        bail!("wasm-pack build failed (exit status: {status})");
    }
    Ok(())
}

fn validate_target(target: &str) -> Result<()> {
    match target {
        "web" | "bundler" | "nodejs" | "no-modules" => Ok(()),
        other => bail!("unknown wasm-pack target `{other}`"),
    }
}

fn run_check_config(args: CheckConfigArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let config = DriverConfig::from_json(&text)
        .with_context(|| format!("{} is not a valid driver config", args.path.display()))?;

    let mut out = std::io::stdout().lock();
    if args.print {
        serde_json::to_writer_pretty(&mut out, &config)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}: ok", args.path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_targets_pass() {
        for target in ["web", "bundler", "nodejs", "no-modules"] {
            assert!(validate_target(target).is_ok());
        }
        assert!(validate_target("deno").is_err());
    }

    #[test]
    fn cli_parses_check_config() {
        let cli = Cli::try_parse_from(["xtask", "check-config", "arena.json", "--print"]).unwrap();
        match cli.command {
            Commands::CheckConfig(args) => {
                assert_eq!(args.path, PathBuf::from("arena.json"));
                assert!(args.print);
            }
            Commands::Wasm(_) => panic!("wrong subcommand"),
        }
    }
}
