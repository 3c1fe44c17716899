use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use vellum::cli::{CliArgs, StartupMode};
use vellum::config::VellumConfig;
use vellum::dialogs::default_dialogs;
use vellum::markdown::{preview_document, render, PreviewTheme};
use vellum::messages::{DocumentMsg, Msg};
use vellum::runtime::{shell, App};

fn main() -> Result<()> {
    vellum::tracing::init();

    let args = CliArgs::parse();
    let startup = args
        .into_config(VellumConfig::load())
        .map_err(anyhow::Error::msg)?;

    let mut app = App::new(startup.config.clone(), default_dialogs());
    match startup.mode {
        StartupMode::Render { file, standalone } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let html = if standalone {
                preview_document(&text, &PreviewTheme::named(startup.config.preview_theme))
            } else {
                render(&text)
            };
            print!("{}", html);
            return Ok(());
        }
        StartupMode::Vault(root) => app.dispatch(Msg::open_vault(root)),
        StartupMode::External(file) => app.dispatch(Msg::Document(DocumentMsg::OpenExternal(file))),
        StartupMode::Empty => {}
    }

    shell::run(&mut app)
}
