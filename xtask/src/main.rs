//! Development automation tasks for the budgetlink workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{anyhow, bail, Context};

/// Crates whose feature flags are exercised by `test`
const FEATURE_CRATES: &[(&str, &str)] = &[("budgetlink-core", "test-utils")];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("schema") => run_schema(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("budgetlink Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci        Run all CI checks (fmt, clippy, test, schema)");
    println!("    fmt       Check Rust code formatting");
    println!("    clippy    Run Clippy lints");
    println!("    test      Run all tests, then each feature crate on its own");
    println!("    schema    Check that the binary prints a valid node schema");
    println!("    deny      Check dependencies with cargo-deny");
    println!("    audit     Audit dependencies for security vulnerabilities");
    println!("    help      Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    println!("==> Running CI checks...\n");

    println!("==> Step 1/4: Checking Rust format...");
    run_fmt()?;

    println!("\n==> Step 2/4: Running Clippy...");
    run_clippy()?;

    println!("\n==> Step 3/4: Running tests...");
    run_test()?;

    println!("\n==> Step 4/4: Checking node schema...");
    run_schema()?;

    println!("\n✓ All CI checks passed!");
    Ok(())
}

/// Check formatting
fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"]).context("Formatting check failed. Run `cargo fmt --all`.")
}

/// Run Clippy lints
fn run_clippy() -> anyhow::Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets"])
        .context("Clippy run failed. See output above.")
}

/// Run all workspace tests
fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace"]).context("Tests failed")?;

    for &(krate, feature) in FEATURE_CRATES {
        println!("\n==> Testing {krate} with feature {feature}...");
        cargo(&["test", "-p", krate, "--features", feature])
            .with_context(|| format!("{krate} tests failed with feature {feature}"))?;
    }
    Ok(())
}

/// Run the binary's `schema` command and validate its output
fn run_schema() -> anyhow::Result<()> {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "-p", "budgetlink-app", "--bin", "budgetlink", "--", "schema"])
        .output()
        .context("failed to run budgetlink")?;

    if !output.status.success() {
        bail!("budgetlink schema exited with {}", output.status);
    }

    let stdout = String::from_utf8(output.stdout).context("schema output is not UTF-8")?;
    if !stdout.trim_start().starts_with('{') || !stdout.contains("\"resources\"") {
        bail!("schema output does not look like a node schema");
    }

    println!("✓ node schema printed ({} bytes)", stdout.len());
    Ok(())
}

/// Check dependencies with cargo-deny
fn run_deny() -> anyhow::Result<()> {
    require_subcommand("deny", "cargo-deny")?;
    cargo(&["deny", "check"]).context("cargo-deny found issues")
}

/// Audit dependencies for security vulnerabilities
fn run_audit() -> anyhow::Result<()> {
    require_subcommand("audit", "cargo-audit")?;
    cargo(&["audit"]).context("cargo-audit found vulnerabilities")
}

fn require_subcommand(subcommand: &str, package: &str) -> anyhow::Result<()> {
    let check_installed = Command::new("cargo").args([subcommand, "--version"]).output();

    if !check_installed.as_ref().is_ok_and(|o| o.status.success()) {
        eprintln!("{package} is not installed.");
        eprintln!("Install it with: cargo install {package}");
        bail!("{package} not found");
    }
    Ok(())
}

fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("`cargo {}` exited with {}", args.join(" "), status))
    }
}
