//! `regwiz validate` command - Validate record files against the schema

use console::style;
use miette::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::form::FieldKey;
use crate::core::steps::registration_steps;
use crate::schema::FormSchema;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Record files or directories to validate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Only check the fields of this step (1-based, as in "Step 1")
    #[arg(long, short = 's')]
    pub step: Option<usize>,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let fields = fields_in_scope(args.step)?;
    let schema = FormSchema::new()?;
    let files = expand_paths(&args.paths);

    let mut stats = ValidationStats::default();

    println!(
        "{} Validating {} file(s)...\n",
        style("→").blue(),
        files.len()
    );

    for path in &files {
        stats.files_checked += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                stats.files_failed += 1;
                stats.total_errors += 1;
                if !args.keep_going {
                    break;
                }
                continue;
            }
        };

        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        match schema.check_source(&content, &filename, &fields) {
            Ok(()) => {
                stats.files_passed += 1;
                if !args.summary {
                    println!("{} {}", style("✓").green(), path.display());
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += e.violation_count();
                if !args.summary {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        path.display(),
                        e.violation_count()
                    );
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    println!();

    if stats.files_failed > 0 {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else if stats.files_checked == 0 {
        Err(miette::miette!("No record files found"))
    } else {
        println!("{} All files passed validation!", style("✓").green().bold());
        Ok(())
    }
}

/// Fields checked for `--step`, or the whole record
fn fields_in_scope(step: Option<usize>) -> Result<Vec<FieldKey>> {
    let Some(number) = step else {
        return Ok(FieldKey::all().to_vec());
    };
    let steps = registration_steps();
    let field_steps = steps.len() - 1;
    if number == 0 || number > field_steps {
        return Err(miette::miette!(
            help = format!("Steps with fields are 1 to {}", field_steps),
            "Step {} has no fields to validate",
            number
        ));
    }
    Ok(steps[number - 1].field_keys())
}

fn is_record_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Expand directories into the record files below them
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_entry(|e| {
                    e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
                })
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_record_file(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_in_scope() {
        assert_eq!(fields_in_scope(None).unwrap().len(), 6);
        assert_eq!(fields_in_scope(Some(2)).unwrap(), vec![FieldKey::Country]);
        assert!(fields_in_scope(Some(0)).is_err());
        assert!(fields_in_scope(Some(4)).is_err());
    }

    #[test]
    fn test_expand_paths_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.yaml"), "").unwrap();
        std::fs::write(dir.path().join("a.json"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden/c.yaml"), "").unwrap();

        let files = expand_paths(&[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml"]);
    }
}
