use super::open_session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::{DocumentTree, Instance};
use pagecraft_editor::{project_semantic_view, EditSession, Location, SemanticRole};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document to check (defaults to the configured one)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Delete style sources nothing references, then save
    #[arg(long)]
    pub prune: bool,
}

/// One finding, printed as a line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    DanglingReference { instance: String, source_id: String },
    UnreferencedSource { source_id: String, name: String },
    LegacyComposite { composite: String },
    MissingPart { composite: String, role: SemanticRole },
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::DanglingReference { .. })
    }

    fn message(&self) -> String {
        match self {
            Diagnostic::DanglingReference {
                instance,
                source_id,
            } => format!("{} references missing style source {}", instance, source_id),
            Diagnostic::UnreferencedSource { source_id, name } => {
                format!("style source {} ({}) is not used by any instance", source_id, name)
            }
            Diagnostic::LegacyComposite { composite } => {
                format!(
                    "{} has no slot layout yet; it is migrated on the next layout change",
                    composite
                )
            }
            Diagnostic::MissingPart { composite, role } => {
                format!("{} has no {} part", composite, role)
            }
        }
    }
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    println!("🔍 {} Pagecraft check", "Starting".green().bold());
    println!();

    let mut session = open_session(cwd, args.document.as_ref())?;
    let diagnostics = diagnose(&session);

    for diagnostic in &diagnostics {
        let level = if diagnostic.is_error() {
            "error".red().bold()
        } else {
            "warning".yellow().bold()
        };
        println!("  {} {}", level, diagnostic.message());
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;

    if args.prune {
        let removed = session.prune_unreferenced_sources()?;
        if !removed.is_empty() {
            session.save()?;
            println!();
            println!("  {} Removed {} unused style sources", "✓".green(), removed.len());
        }
    }

    println!();
    println!(
        "✨ {} Check complete!",
        if errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Instances: {}", session.tree().len());
    println!("   Style sources: {}", session.styles().len());
    if errors > 0 {
        println!("   {} {}", "Errors:".red(), errors);
    }
    if warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), warnings);
    }
    if diagnostics.is_empty() {
        println!("   {} No issues found!", "✓".green());
    }

    // Exit with error code if there are errors
    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Garbage on both sides of the instance/style link, plus composite shape
pub fn diagnose(session: &EditSession) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = session
        .dangling_references()
        .into_iter()
        .map(|dangling| Diagnostic::DanglingReference {
            instance: match dangling.location {
                Location::Page => dangling.instance_id,
                Location::Shared(name) => format!("{}/{}", name, dangling.instance_id),
            },
            source_id: dangling.source_id,
        })
        .collect();

    for source_id in session.unreferenced_sources() {
        let name = session
            .styles()
            .source(&source_id)
            .map(|source| source.name.clone())
            .unwrap_or_default();
        diagnostics.push(Diagnostic::UnreferencedSource { source_id, name });
    }

    diagnose_composites(session.tree(), &mut diagnostics);
    for (_, tree) in session.shared().trees() {
        diagnose_composites(tree, &mut diagnostics);
    }

    diagnostics
}

fn diagnose_composites(tree: &DocumentTree, diagnostics: &mut Vec<Diagnostic>) {
    for id in tree.ids() {
        let Some(instance) = tree.find(id).filter(|i| i.is_composite()) else {
            continue;
        };
        diagnose_composite(instance, diagnostics);
    }
}

fn diagnose_composite(composite: &Instance, diagnostics: &mut Vec<Diagnostic>) {
    let view = project_semantic_view(composite);
    if !view.has_slots() {
        diagnostics.push(Diagnostic::LegacyComposite {
            composite: composite.id.clone(),
        });
    }
    for role in SemanticRole::ALL {
        if view.part(role).is_none() {
            diagnostics.push(Diagnostic::MissingPart {
                composite: composite.id.clone(),
                role,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::{ElementType, InstancePatch};
    use pagecraft_editor::{Document, EditorConfig};
    use pagecraft_styles::NewSource;

    #[test]
    fn test_diagnose_reports_both_sides() {
        let mut session = EditSession::new(Document::new("page.json"), &EditorConfig::default());
        session
            .insert(
                Instance::new("nav", ElementType::Navbar)
                    .with_child(Instance::new("brand", ElementType::NavBrand)),
                None,
                None,
            )
            .unwrap();
        session
            .update("brand", InstancePatch::new().style_source_ids(vec!["gone".into()]))
            .unwrap();
        session
            .batch_import(vec![NewSource::local("card")], |_| vec![])
            .unwrap();

        let diagnostics = diagnose(&session);

        assert!(diagnostics.contains(&Diagnostic::DanglingReference {
            instance: "brand".into(),
            source_id: "gone".into(),
        }));
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnreferencedSource { .. })));
        assert!(diagnostics.contains(&Diagnostic::LegacyComposite {
            composite: "nav".into()
        }));
        assert!(diagnostics.contains(&Diagnostic::MissingPart {
            composite: "nav".into(),
            role: SemanticRole::CallToAction,
        }));
        assert_eq!(diagnostics.iter().filter(|d| d.is_error()).count(), 1);
    }
}
