//! `attendify` - CLI for attendance comment screening

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use attendify::cli::{
    CategoriesCommand, Cli, Command, ConfigCommand, MarkCommand, OutputFormat, ScreenCommand,
};
use attendify::screening::SuspicionPattern;
use attendify::{init_logging, AttendanceDesk, CommentScreener, Config, MarkRequest};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config_file = cli.config_path();

    match cli.command {
        // Config commands must work even when the active config is broken
        Command::Config(cmd) => handle_config(config_file, cmd),
        command => {
            let config = load_config(config_file)?;
            match command {
                Command::Screen(cmd) => handle_screen(&config, &cmd),
                Command::Mark(cmd) => handle_mark(&config, cmd),
                Command::Categories(cmd) => handle_categories(&config, &cmd),
                Command::Config(_) => unreachable!("handled above"),
            }
        }
    }
}

fn load_config(path: PathBuf) -> anyhow::Result<Config> {
    let display = path.display().to_string();
    Config::load_from(Some(path)).with_context(|| format!("loading configuration from {display}"))
}

fn handle_screen(config: &Config, cmd: &ScreenCommand) -> anyhow::Result<()> {
    let screener = CommentScreener::with_config(&config.screening);
    let result = screener.screen(&cmd.comment);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Plain => {
            if result.is_clean() {
                println!("No anomalies detected.");
            } else {
                for finding in result.findings() {
                    println!("{} ({})", finding.label, finding.severity);
                }
            }
        }
    }
    Ok(())
}

fn handle_mark(config: &Config, cmd: MarkCommand) -> anyhow::Result<()> {
    let desk = AttendanceDesk::new(
        CommentScreener::with_config(&config.screening),
        config.attendance.clone(),
    );

    let mut request = MarkRequest::new(cmd.student, cmd.session);
    request.comment = cmd.comment;
    let record = desk.mark(request);

    match cmd.format {
        OutputFormat::Json => println!("{}", record.to_json()?),
        OutputFormat::Plain => {
            if let Some(alert) = record.screening.alert_message() {
                println!("{alert}");
            }
            println!(
                "Marked {} {} for {} at {}",
                record.student,
                record.status,
                record.session,
                record.marked_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }
    Ok(())
}

fn handle_categories(config: &Config, cmd: &CategoriesCommand) -> anyhow::Result<()> {
    let screener = CommentScreener::with_config(&config.screening);
    let patterns = screener.patterns();

    match cmd.format {
        OutputFormat::Json => {
            let rows: Vec<_> = patterns.iter().map(pattern_json).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Plain => {
            if patterns.is_empty() {
                println!("No suspicion patterns configured.");
            }
            for (i, pattern) in patterns.iter().enumerate() {
                println!(
                    "{:>2}. {:<34} {:<7} /{}/i",
                    i + 1,
                    pattern.label,
                    pattern.severity.to_string(),
                    pattern.as_str()
                );
            }
        }
    }
    Ok(())
}

fn pattern_json(pattern: &SuspicionPattern) -> serde_json::Value {
    serde_json::json!({
        "label": pattern.label,
        "severity": pattern.severity,
        "pattern": pattern.as_str(),
    })
}

fn handle_config(config_file: PathBuf, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Screening]");
                println!("  Enabled:            {}", config.screening.enabled);
                println!(
                    "  Built-in patterns:  {}",
                    config.screening.use_builtin_patterns
                );
                println!(
                    "  Custom patterns:    {}",
                    config.screening.custom_patterns.len()
                );
                println!();
                println!("[Attendance]");
                println!("  Notify admin:       {}", config.attendance.notify_admin);
                println!("  Keep comment:       {}", config.attendance.keep_comment);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or(config_file);
            println!("Validating configuration: {}", path.display());
            load_config(path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
