// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workspace automation entry point, invoked as `cargo xtask <command>`.

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use color_eyre::eyre::{Result, WrapErr, eyre};
use duct::cmd;
use semver::Version;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace maintenance tasks for freminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity,
}

#[derive(Subcommand)]
enum Command {
    /// Run fmt, clippy, and tests across every workspace member.
    Ci,
    /// Verify every workspace member's declared `rust-version` is satisfiable
    /// by the toolchain that is currently active.
    CheckMsrv,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .init();

    match cli.command {
        Command::Ci => run_ci(),
        Command::CheckMsrv => check_msrv(),
    }
}

fn run_ci() -> Result<()> {
    info!("running cargo fmt --check");
    cmd!("cargo", "fmt", "--all", "--check")
        .run()
        .wrap_err("cargo fmt failed")?;

    info!("running cargo clippy");
    cmd!(
        "cargo",
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings"
    )
    .run()
    .wrap_err("cargo clippy failed")?;

    info!("running cargo test");
    cmd!("cargo", "test", "--workspace")
        .run()
        .wrap_err("cargo test failed")?;

    Ok(())
}

fn check_msrv() -> Result<()> {
    let metadata = cargo_metadata::MetadataCommand::new()
        .exec()
        .wrap_err("failed to load cargo metadata")?;

    let rustc_version = cmd!("rustc", "--version")
        .read()
        .wrap_err("failed to invoke rustc")?;
    let active = parse_rustc_version(&rustc_version)?;

    for package in metadata.workspace_packages() {
        let Some(msrv) = &package.rust_version else {
            continue;
        };
        let required = Version::parse(msrv.to_string().trim_start_matches('^'))
            .wrap_err_with(|| format!("invalid rust-version for {}", package.name))?;
        if active < required {
            return Err(eyre!(
                "{} requires rustc {required} but active toolchain is {active}",
                package.name
            ));
        }
        debug!(package = %package.name, %required, "rust-version satisfied");
    }

    Ok(())
}

fn parse_rustc_version(output: &str) -> Result<Version> {
    let version_str = output
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| eyre!("unexpected `rustc --version` output: {output}"))?;
    Version::parse(version_str).wrap_err_with(|| format!("invalid rustc version: {version_str}"))
}

#[macro_use]
extern crate tracing;
