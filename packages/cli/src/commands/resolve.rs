use super::open_session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::Instance;
use pagecraft_editor::{EditSession, Location};
use pagecraft_styles::InteractionState;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Only resolve this instance
    pub instance: Option<String>,

    /// Document to read (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Breakpoint id
    #[arg(short, long, conflicts_with = "width")]
    pub breakpoint: Option<String>,

    /// Viewport width in px; picks the narrowest matching breakpoint
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Interaction state (default, hover, focus, active, visited)
    #[arg(short, long, default_value = "default")]
    pub state: InteractionState,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn resolve(args: ResolveArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.document.as_ref())?;

    if let Some(breakpoint) = &args.breakpoint {
        session.set_breakpoint(breakpoint)?;
    } else if let Some(width) = args.width {
        session.set_viewport_width(width);
    }
    session.set_state(args.state);

    let targets: Vec<(Location, String)> = match &args.instance {
        Some(id) => {
            let (location, _) = session
                .locate(id)
                .ok_or_else(|| anyhow::anyhow!("Instance not found: {}", id))?;
            vec![(location, id.clone())]
        }
        None => all_instances(&session),
    };

    if args.format == "json" {
        let mut out = BTreeMap::new();
        for (_, id) in &targets {
            out.insert(id.clone(), session.resolve_instance(id)?.as_map().clone());
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "🎨 {} @ {} / {}",
        "Resolved styles".green().bold(),
        session.breakpoint().bright_white(),
        session.state()
    );
    println!();

    for (location, id) in &targets {
        let declaration = session.resolve_instance(id)?;
        let instance = session.find(id)?;
        let origin = match location {
            Location::Page => String::new(),
            Location::Shared(name) => format!(" (shared {})", name).dimmed().to_string(),
        };
        println!("{}{}", heading(instance).bold(), origin);

        if declaration.is_empty() {
            println!("  {}", "no declarations".dimmed());
        } else {
            for (property, value) in declaration.iter() {
                println!("  {}: {}", property.cyan(), value);
            }
        }
    }

    Ok(())
}

fn heading(instance: &Instance) -> String {
    match &instance.label {
        Some(label) => format!("{} <{}> {}", instance.id, instance.element_type, label),
        None => format!("{} <{}>", instance.id, instance.element_type),
    }
}

/// Every instance, page first, in tree order
fn all_instances(session: &EditSession) -> Vec<(Location, String)> {
    let mut out: Vec<(Location, String)> = session
        .tree()
        .ids()
        .into_iter()
        .map(|id| (Location::Page, id.to_string()))
        .collect();

    for (name, tree) in session.shared().trees() {
        out.extend(
            tree.ids()
                .into_iter()
                .map(|id| (Location::Shared(name.to_string()), id.to_string())),
        );
    }
    out
}
