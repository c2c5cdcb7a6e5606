//! plotrc - inspect rc settings and resolve colorbar keywords
//!
//! This is the main entry point for the plotrc command-line tool.

use anyhow::Context;
use std::time::Instant;
use tracing::info;

use plotrc::config::Command;
use plotrc::guide::{ColorbarSettings, Element, Kwargs, NormInfo, StyleAttr};
use plotrc::{
    init_tracing, log_error, log_rc_overrides, log_resolve_end, log_resolve_start,
    log_timed_operation, rc, Config, PlotError, RcValue,
};

fn main() -> anyhow::Result<()> {
    let (config, command) = Config::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config.log_level);

    info!("Starting plotrc v{}", env!("CARGO_PKG_VERSION"));

    let applied = config.apply(rc()).map_err(|e| logged(e, "applying rc settings"))?;
    if !applied.is_empty() {
        log_rc_overrides("config", &applied);
    }

    match command {
        Command::Get { keys } => {
            for key in keys {
                let value = rc().get(&key).map_err(|e| logged(e, "reading rc setting"))?;
                println!("{} = {}", key, serde_json::to_string(&value)?);
            }
        }
        Command::List { prefix } => {
            let entries = match prefix {
                Some(prefix) => rc().category(&prefix),
                None => rc().params().iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Colorbar {
            kwargs,
            width,
            height,
        } => {
            let start = Instant::now();
            log_resolve_start("colorbar", kwargs.len());
            let result = resolve_colorbar(kwargs, width, height);
            log_resolve_end("colorbar", start, &result);
            let output = result.map_err(|e| logged(e, "resolving colorbar"))?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn logged(error: PlotError, context: &str) -> PlotError {
    log_error(&error, context);
    error
}

/// Resolve, finalize and apply colorbar keywords against a fixed-size axes
fn resolve_colorbar(
    kwargs: Vec<(String, RcValue)>,
    width: f64,
    height: f64,
) -> plotrc::Result<serde_json::Value> {
    let mut kwargs: Kwargs = kwargs.into_iter().collect();
    let mut settings = ColorbarSettings::resolve(&mut kwargs, rc())?;
    settings.finalize(&(width, height), &NormInfo::continuous(0.0, 1.0))?;

    let mut styles: Vec<(Element, StyleAttr)> = Vec::new();
    log_timed_operation("apply_colorbar", || settings.apply(&mut styles))?;

    Ok(serde_json::json!({
        "settings": settings,
        "styles": styles,
    }))
}
