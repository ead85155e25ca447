use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::{ElementType, Instance, SlotPosition};
use pagecraft_editor::{Document, EditSession};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Page document to create
    #[arg(short, long, default_value = "page.json")]
    pub document: String,

    /// Force overwrite existing config and document
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let config = Config {
        document: args.document.clone(),
        ..Config::default()
    };

    let document_path = config.document_path(cwd, None);
    if let Some(parent) = document_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if !document_path.exists() || args.force {
        let mut document = sample_document(&document_path, &config)?;
        document.save_as(&document_path)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagecraft resolve --breakpoint mobile");
    println!("  2. Run: pagecraft layout site-nav --template brand-center");
    println!("  3. Run: pagecraft check");

    Ok(())
}

/// A page with a shared header navbar and a styled hero
fn sample_document(path: &Path, config: &Config) -> Result<Document> {
    let mut session = EditSession::new(Document::with_config(path, &config.editor), &config.editor);

    session.insert(
        Instance::new("site-header", ElementType::Header).with_child(
            Instance::new("site-nav", ElementType::Navbar)
                .with_child(Instance::new("site-brand", ElementType::NavBrand).with_label("Brand"))
                .with_child(Instance::new("site-links", ElementType::NavMenu))
                .with_child(
                    Instance::new("site-cta", ElementType::Button).with_label("Get started"),
                ),
        ),
        None,
        None,
    )?;
    session.set_brand_position("site-nav", SlotPosition::Left)?;

    session.insert(
        Instance::new("hero", ElementType::Section)
            .with_label("Hero")
            .with_child(
                Instance::new("hero-title", ElementType::Heading)
                    .with_prop("level", 1.0)
                    .with_prop("text", "Build pages visually"),
            ),
        None,
        None,
    )?;
    session.set_instance_style("hero", "padding", "96px 24px", None, None)?;
    session.set_instance_style("hero", "padding", "48px 16px", Some("mobile"), None)?;
    session.set_instance_style("hero-title", "font-size", "56px", None, None)?;
    session.set_instance_style("hero-title", "font-size", "32px", Some("mobile"), None)?;

    Ok(session.into_document())
}
