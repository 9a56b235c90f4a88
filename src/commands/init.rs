use std::io::{self, BufRead, Write};

use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::error::{AppError, Result};

fn prompt(input: &mut impl BufRead, question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;
    let mut input = io::stdin().lock();

    if config_path.exists() {
        let overwrite = prompt(
            &mut input,
            &format!(
                "Config file already exists at {}. Overwrite? [y/N] ",
                config_path.display()
            ),
        )?;
        if !overwrite.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("userboard configuration");
    println!("=======================\n");

    let base_url = prompt(
        &mut input,
        &format!("Backend base URL [{DEFAULT_BASE_URL}]: "),
    )?;
    let timeout = prompt(
        &mut input,
        &format!("Fallback request timeout in ms [{DEFAULT_TIMEOUT_MS}]: "),
    )?;

    let config = build_config(&base_url, &timeout)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let contents = toml::to_string(&config)?;

    std::fs::write(&config_path, contents).map_err(|e| AppError::ConfigWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'userboard' commands!");

    Ok(())
}

/// Blank answers keep the defaults; the base URL must parse.
fn build_config(base_url: &str, timeout: &str) -> Result<Config> {
    let base_url = if base_url.is_empty() {
        None
    } else {
        url::Url::parse(base_url).map_err(|_| AppError::InvalidUrl(base_url.to_string()))?;
        Some(base_url.trim_end_matches('/').to_string())
    };

    let timeout_ms = if timeout.is_empty() {
        None
    } else {
        let ms = timeout
            .parse::<u64>()
            .map_err(|_| AppError::InvalidTimeout(timeout.to_string()))?;
        Some(ms)
    };

    let mut config = Config::default();
    config.base_url = base_url;
    config.timeout_ms = timeout_ms;
    Ok(config)
}
