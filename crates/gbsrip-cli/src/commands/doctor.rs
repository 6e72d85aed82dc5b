//! Doctor command implementation
//!
//! Checks that an engine can be found and that output can be written.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use gbsrip_engine::external::{DEFAULT_PROGRAM, ENGINE_ENV_VAR};
use gbsrip_engine::{EngineConfig, HardwareModel};

/// Run the doctor command
///
/// Checks:
/// - Engine executable resolution
/// - Temporary directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(engine: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "gbsrip doctor".cyan().bold());
    println!("{}", "=============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!("  {} gbsrip v{}", "->".green(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("{}", "Engine:".bold());
    let mut config = EngineConfig::default();
    if let Some(program) = engine {
        config = config.program(program);
    }
    match config.resolve_program() {
        Ok(path) => {
            let version = probe_version(&path).unwrap_or_else(|| "version unknown".to_string());
            println!("  {} {} ({})", "ok".green(), path.display(), version);
        }
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            println!(
                "     {}",
                format!(
                    "Install {} or point {} at a compatible emulator.",
                    DEFAULT_PROGRAM, ENGINE_ENV_VAR
                )
                .dimmed()
            );
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Permissions:".bold());
    match check_temp_dir() {
        Ok(dir) => println!(
            "  {} Temporary directory is writable ({})",
            "ok".green(),
            dir.display()
        ),
        Err(e) => {
            println!("  {} Cannot write temporary files: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Models:".bold());
    for model in HardwareModel::ALL {
        println!(
            "  {} {}",
            format!("{:<16}", model.as_str()).cyan(),
            model.display_name().dimmed()
        );
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

fn check_temp_dir() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir();
    let probe = dir.join(format!(".gbsrip_write_test_{}", std::process::id()));
    std::fs::write(&probe, b"test")?;
    let _ = std::fs::remove_file(&probe);
    Ok(dir)
}

/// First line of `<engine> -V`, if the program answers.
fn probe_version(program: &Path) -> Option<String> {
    let output = Command::new(program).arg("-V").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    parse_version_line(&stdout).or_else(|| parse_version_line(&stderr))
}

fn parse_version_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
