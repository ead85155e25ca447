use super::open_session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::SlotPosition;
use pagecraft_editor::{builtin_templates, project_semantic_view};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Composite instance id (e.g. a navbar)
    pub composite: Option<String>,

    /// Template to apply (brand-left, brand-center, brand-right, minimal)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Brand position (left, center, right)
    #[arg(short, long)]
    pub brand: Option<SlotPosition>,

    /// Document to edit (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// List the available templates and exit
    #[arg(short, long)]
    pub list: bool,
}

pub fn layout(args: LayoutArgs, cwd: &str) -> Result<()> {
    if args.list {
        for template in builtin_templates() {
            println!("  {} {}", template.id.bright_white(), template.label.dimmed());
        }
        return Ok(());
    }

    let composite = args
        .composite
        .ok_or_else(|| anyhow::anyhow!("A composite id is required (or use --list)"))?;
    if args.template.is_none() && args.brand.is_none() {
        return Err(anyhow::anyhow!("Nothing to do: pass --template and/or --brand"));
    }

    let mut session = open_session(cwd, args.document.as_ref())?;

    if let Some(template) = &args.template {
        session.apply_template(&composite, template)?;
        println!("  {} Applied {} to {}", "✓".green(), template.bright_white(), composite);
    }
    if let Some(position) = args.brand {
        session.set_brand_position(&composite, position)?;
        println!("  {} Moved brand {} in {}", "✓".green(), position, composite);
    }

    let (_, instance) = session
        .locate(&composite)
        .ok_or_else(|| anyhow::anyhow!("Instance not found: {}", composite))?;
    let view = project_semantic_view(instance);
    for position in SlotPosition::ALL {
        let roles: Vec<String> = view
            .roles_in(position)
            .into_iter()
            .map(|role| role.to_string())
            .collect();
        println!("    {:>6}: {}", position.as_str().cyan(), roles.join(", "));
    }

    session.save()?;
    println!();
    println!("{}", "✅ Layout saved".green().bold());
    Ok(())
}
