//! CLI entry point for rolegate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `rolegate-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use rolegate_app::{
    CheckInput, ExplainOutput, ValidateInput, parse_report_json, render_report_markdown,
    run_check, run_compile, run_explain, run_validate, runtime_error_report, serialize_report,
    status_exit_code,
};
use rolegate_settings::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "rolegate",
    version,
    about = "Role catalogue compiler and policy validator"
)]
struct Cli {
    /// Path to the role specification JSON.
    #[arg(long, default_value = "roles.json")]
    catalog: Utf8PathBuf,

    /// Path to rolegate config TOML.
    #[arg(long, default_value = "rolegate.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|audit).
    #[arg(long)]
    profile: Option<String>,

    /// Override the severity that flips the status (critical|high).
    #[arg(long)]
    fail_on: Option<String>,

    /// Override maximum results to emit.
    #[arg(long)]
    max_results: Option<u32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile the catalogue to policies without validating.
    Compile {
        /// Where to write the compiled catalogue JSON (stdout if omitted).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Validate previously compiled policies against the catalogue.
    Validate {
        /// Path to the compiled catalogue JSON (from `rolegate compile`).
        #[arg(long, default_value = "policies.json")]
        policies: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/rolegate/report.json")]
        report_out: Utf8PathBuf,
    },

    /// Compile, validate, and write a report.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/rolegate/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown summary alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown summary (if enabled).
        #[arg(long, default_value = "artifacts/rolegate/summary.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/rolegate/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule_id or code with remediation guidance.
    Explain {
        /// The rule_id (e.g., "roles.mfa_gating") or code (e.g., "missing_mfa_deny") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Compile { ref out } => cmd_compile(&cli, out.clone()),
        Commands::Validate {
            ref policies,
            ref report_out,
        } => cmd_validate(&cli, policies.clone(), report_out.clone()),
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, report_out.clone(), write_markdown, markdown_out.clone()),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

fn overrides_from(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        fail_on: cli.fail_on.clone(),
        max_results: cli.max_results,
    }
}

fn cmd_compile(cli: &Cli, out: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<String> {
        let doc = run_compile(&cli.catalog)?;
        let mut json = serde_json::to_string_pretty(&doc).context("serialize catalogue")?;
        json.push('\n');
        Ok(json)
    })();

    match result {
        Ok(json) => {
            if let Some(out_path) = out {
                write_text_file(&out_path, &json).context("write catalogue output")?;
            } else {
                print!("{}", json);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("rolegate error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_validate(
    cli: &Cli,
    policies: Utf8PathBuf,
    report_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let policies_text = std::fs::read_to_string(&policies)
            .with_context(|| format!("read compiled catalogue: {}", policies))?;
        let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

        let input = ValidateInput {
            catalog_path: &cli.catalog,
            policies_text: &policies_text,
            config_text: &cfg_text,
            overrides: overrides_from(cli),
        };
        let output = run_validate(input)?;

        write_report_file(&report_out, &output.report).context("write report json")?;

        Ok(status_exit_code(output.report.status))
    })();

    finish_with_report(result, &report_out)
}

fn cmd_check(
    cli: &Cli,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        if !cli.catalog.exists() {
            anyhow::bail!("role specification does not exist: {}", cli.catalog);
        }
        // Load config if present; missing file is allowed (defaults apply).
        let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

        let input = CheckInput {
            catalog_path: &cli.catalog,
            config_text: &cfg_text,
            overrides: overrides_from(cli),
        };

        let output = run_check(input)?;

        write_report_file(&report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_report_markdown(&output.report);
            write_text_file(&markdown_out, &md).context("write markdown")?;
        }

        Ok(status_exit_code(output.report.status))
    })();

    finish_with_report(result, &report_out)
}

/// Shared tail for report-producing commands: exit 0/2 by status, or write a
/// runtime-error report and exit 1.
fn finish_with_report(
    result: anyhow::Result<i32>,
    report_out: &camino::Utf8Path,
) -> anyhow::Result<()> {
    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("rolegate error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(
    path: &camino::Utf8Path,
    report: &rolegate_types::RolegateReport,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &camino::Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_report_markdown(&report);

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found {
            identifier,
            explanation,
        } => {
            print!(
                "{}",
                rolegate_app::format_explanation(&identifier, &explanation)
            );
            Ok(())
        }
        ExplainOutput::NotFound { identifier } => {
            eprint!("{}", rolegate_app::format_not_found(&identifier));
            std::process::exit(1);
        }
    }
}
