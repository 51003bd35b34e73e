use anyhow::Result;
use console::{Emoji, style};
use std::process::Command;

use crate::config::Config;

static DOCTOR: Emoji<'_, '_> = Emoji("🩺 ", "");
static PASS: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static FAIL: Emoji<'_, '_> = Emoji("❌ ", "[!!] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[i] ");
static ARROW: Emoji<'_, '_> = Emoji("   → ", "  -> ");

pub async fn run() -> Result<()> {
    println!();
    println!("{}", style(" DocSight Doctor ").bold().reverse());
    println!();
    println!("{}Running diagnostics...", DOCTOR);
    println!();

    let mut pass_count: u32 = 0;
    let mut fail_count: u32 = 0;
    let mut warn_count: u32 = 0;

    // ── 1. Binary version ────────────────────────────────────────────
    print_section("Binary");
    pass(
        &format!("docsight {}", env!("CARGO_PKG_VERSION")),
        &mut pass_count,
    );

    // ── 2. Config file ───────────────────────────────────────────────
    print_section("Configuration");

    let config_path = Config::config_path().ok();

    let config = if let Some(ref path) = config_path {
        if path.exists() {
            pass(
                &format!("Config found at {}", style(path.display()).dim()),
                &mut pass_count,
            );
            match Config::load() {
                Ok(c) => {
                    pass(
                        &format!("Config is valid TOML (model: {})", c.insights.model),
                        &mut pass_count,
                    );
                    Some(c)
                }
                Err(e) => {
                    fail(&format!("Config parse error: {}", e), &mut fail_count);
                    hint("Run: docsight init --force");
                    None
                }
            }
        } else {
            info("No config file; built-in defaults in effect");
            hint("Run: docsight init");
            Config::load().ok()
        }
    } else {
        fail("Cannot determine config directory", &mut fail_count);
        None
    };

    // ── 3. External tools ────────────────────────────────────────────
    print_section("External tools");

    let defaults = Config::default();
    let extraction = config
        .as_ref()
        .map(|c| &c.extraction)
        .unwrap_or(&defaults.extraction);

    let pdftoppm = &extraction.pdftoppm_path;
    if check_command(pdftoppm, &["-v"]) {
        let version = version_line(pdftoppm, &["-v"]);
        pass(
            &format!("pdftoppm available ({})", version),
            &mut pass_count,
        );
    } else {
        fail(
            &format!("pdftoppm not found ({})", pdftoppm),
            &mut fail_count,
        );
        hint("Install Poppler, or point POPPLER_PATH at its bin directory");
        hint("Scanned PDFs cannot be processed without it");
    }

    let tesseract = &extraction.tesseract_path;
    if check_command(tesseract, &["--version"]) {
        let version = version_line(tesseract, &["--version"]);
        pass(
            &format!("tesseract available ({})", version),
            &mut pass_count,
        );

        let lang = &extraction.ocr_language;
        let langs = version_lines(tesseract, &["--list-langs"]);
        if langs.iter().any(|l| l.trim() == lang) {
            pass(
                &format!("OCR language '{}' installed", lang),
                &mut pass_count,
            );
        } else {
            warn(
                &format!("OCR language '{}' not listed by tesseract", lang),
                &mut warn_count,
            );
            hint(&format!("Install the language pack, e.g. tesseract-ocr-{}", lang));
        }
    } else {
        fail(
            &format!("tesseract not found ({})", tesseract),
            &mut fail_count,
        );
        hint("Install Tesseract, or set TESSERACT_CMD to its full path");
        hint("Images and scanned PDFs cannot be processed without it");
    }

    // ── 4. Gemini ────────────────────────────────────────────────────
    print_section("Gemini");

    check_api_key_configured(
        config.as_ref().map(|c| c.insights.api_key.as_str()),
        &["GEMINI_API_KEY"],
        &mut pass_count,
    );

    // ── 5. System info ───────────────────────────────────────────────
    print_section("System");

    info(&format!(
        "OS: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    ));

    if let Ok(cwd) = std::env::current_dir() {
        info(&format!("Working directory: {}", cwd.display()));
    }

    if let Some(ref path) = config_path {
        info(&format!("Config path: {}", path.display()));
    }

    // ── Summary ──────────────────────────────────────────────────────
    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();

    let total = pass_count + fail_count + warn_count;
    print!(
        "  {} {} passed",
        style(pass_count).green().bold(),
        if pass_count == 1 { "check" } else { "checks" }
    );
    if warn_count > 0 {
        print!(
            ", {} {}",
            style(warn_count).yellow().bold(),
            if warn_count == 1 {
                "warning"
            } else {
                "warnings"
            }
        );
    }
    if fail_count > 0 {
        print!(
            ", {} {}",
            style(fail_count).red().bold(),
            if fail_count == 1 {
                "failure"
            } else {
                "failures"
            }
        );
    }
    println!(" ({}  total)", total);
    println!();

    if fail_count > 0 {
        println!(
            "  {}",
            style("Some checks failed. Fix the issues above and re-run:").red()
        );
        println!("    {} docsight doctor", style("$").dim());
    } else if warn_count > 0 {
        println!(
            "  {}",
            style("Everything essential works, but there are some warnings.").yellow()
        );
    } else {
        println!(
            "  {}",
            style("All checks passed! You're ready to go.")
                .green()
                .bold()
        );
    }
    println!();

    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn print_section(name: &str) {
    println!("  {}", style(name).bold().underlined());
}

fn pass(msg: &str, count: &mut u32) {
    println!("  {}{}", PASS, msg);
    *count += 1;
}

fn fail(msg: &str, count: &mut u32) {
    println!("  {}{}", FAIL, style(msg).red());
    *count += 1;
}

fn warn(msg: &str, count: &mut u32) {
    println!("  {}{}", WARN, style(msg).yellow());
    *count += 1;
}

fn info(msg: &str) {
    println!("  {}{}", INFO, style(msg).dim());
}

fn hint(msg: &str) {
    println!("{}{}", ARROW, style(msg).dim());
}

fn check_command(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// First line of a command's version output. Some tools print their
/// version to stderr (pdftoppm does), so both streams are checked.
fn version_line(cmd: &str, args: &[&str]) -> String {
    version_lines(cmd, args)
        .first()
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

fn version_lines(cmd: &str, args: &[&str]) -> Vec<String> {
    Command::new(cmd)
        .args(args)
        .output()
        .map(|o| {
            let stdout = String::from_utf8_lossy(&o.stdout);
            let text = if stdout.trim().is_empty() {
                String::from_utf8_lossy(&o.stderr).to_string()
            } else {
                stdout.to_string()
            };
            text.lines().map(|l| l.to_string()).collect()
        })
        .unwrap_or_default()
}

fn check_api_key_configured(config_key: Option<&str>, env_vars: &[&str], pass_count: &mut u32) {
    // Check env vars first
    for env_var in env_vars {
        if let Ok(val) = std::env::var(env_var)
            && !val.is_empty()
        {
            pass(
                &format!("Gemini API key set via {}", style(*env_var).dim()),
                pass_count,
            );
            return;
        }
    }

    // Check config
    if let Some(key) = config_key
        && !key.is_empty()
        && !key.starts_with("${")
    {
        pass("Gemini API key configured in config", pass_count);
        return;
    }

    let vars_hint = env_vars.join(" or ");
    info(&format!(
        "Gemini not configured (set {}); captions and hashtags stay disabled",
        vars_hint
    ));
}
