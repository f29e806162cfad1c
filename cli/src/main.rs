//! sectionize CLI - resume structure inference tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sectionize::{
    parse_file_with_options, Document, InferOptions, JsonFormat, PageSelection, SectionEntry,
    UnlabeledPolicy,
};

#[derive(Parser)]
#[command(name = "sectionize")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer resume structure from styled text fragments", long_about = None)]
struct Cli {
    /// Input fragment dump (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer structure and write it as JSON
    Json {
        /// Input fragment dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        infer: InferArgs,
    },

    /// Show a summary of the inferred structure
    Info {
        /// Input fragment dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        infer: InferArgs,
    },

    /// Infer structure for many dumps into an output directory
    Batch {
        /// Input fragment dumps (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        infer: InferArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct InferArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Recover from an empty first page or unreadable pages
    #[arg(long)]
    lenient: bool,

    /// What to do with content before the first heading
    #[arg(long, value_enum, default_value = "collect")]
    unlabeled: UnlabeledMode,

    /// Also emit heading lines as section content
    #[arg(long)]
    heading_lines: bool,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
enum UnlabeledMode {
    /// Keep it under the "default" section
    #[default]
    Collect,
    /// Discard it
    Drop,
}

impl From<UnlabeledMode> for UnlabeledPolicy {
    fn from(mode: UnlabeledMode) -> Self {
        match mode {
            UnlabeledMode::Collect => UnlabeledPolicy::Collect,
            UnlabeledMode::Drop => UnlabeledPolicy::Drop,
        }
    }
}

impl InferArgs {
    fn to_options(&self) -> Result<InferOptions, Box<dyn std::error::Error>> {
        let page_selection = if let Some(p) = self.pages.as_deref() {
            PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
        } else {
            PageSelection::All
        };

        let mut options = InferOptions::new()
            .with_pages(page_selection)
            .with_unlabeled(self.unlabeled.into())
            .with_heading_lines(self.heading_lines);
        if self.sequential {
            options = options.sequential();
        }
        if self.lenient {
            options = options.lenient();
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Json {
            input,
            output,
            compact,
            infer,
        }) => cmd_json(&input, output.as_deref(), compact, &infer),
        Some(Commands::Info { input, infer }) => cmd_info(&input, &infer),
        Some(Commands::Batch {
            inputs,
            output,
            compact,
            infer,
        }) => cmd_batch(&inputs, &output, compact, &infer),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print JSON if input is provided
            if let Some(input) = cli.input {
                cmd_json(&input, None, false, &InferArgs::default())
            } else {
                println!("{}", "Usage: sectionize <FILE>".yellow());
                println!("       sectionize --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    infer: &InferArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, infer.to_options()?)?;
    let json = sectionize::render::to_json(&doc, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, infer: &InferArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, infer.to_options()?)?;

    println!("{}", "Header".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Name".bold(), doc.header.name);
    if let Some(ref email) = doc.header.contact.email {
        println!("{}: {}", "Email".bold(), email);
    }
    if let Some(ref phone) = doc.header.contact.phone {
        println!("{}: {}", "Phone".bold(), phone);
    }
    for link in &doc.header.links {
        println!("{}: {} ({})", "Link".bold(), link.text, link.uri.dimmed());
    }

    println!();
    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_sections(&doc);

    println!();
    println!("{}: {}", "Sections".bold(), doc.section_count());
    println!("{}: {}", "Subsections".bold(), doc.subsection_count());
    println!("{}: {}", "Lines".bold(), doc.line_count());

    Ok(())
}

fn print_sections(doc: &Document) {
    let count = doc.section_count();
    for (i, (tag, entries)) in doc.sections.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let subsections = entries
            .iter()
            .filter(|e| matches!(e, SectionEntry::Subsection(_)))
            .count();
        println!(
            "  {} {} {}",
            branch.dimmed(),
            tag.as_str().bold(),
            format!("({} entries, {} dated)", entries.len(), subsections).dimmed()
        );
    }
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: &Path,
    compact: bool,
    infer: &InferArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;
    let options = infer.to_options()?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed = Vec::new();
    for input in inputs {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        pb.set_message(name.to_string());

        let result = parse_file_with_options(input, options.clone())
            .and_then(|doc| sectionize::render::to_json(&doc, json_format(compact)));
        match result {
            Ok(json) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                fs::write(output.join(format!("{}.sections.json", stem)), &json)?;
            }
            Err(e) => {
                log::warn!("{}: {}", input.display(), e);
                failed.push((input.clone(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    let succeeded = inputs.len() - failed.len();
    println!(
        "\n{} {} of {} files written to {}",
        "Done!".green().bold(),
        succeeded,
        inputs.len(),
        output.display()
    );
    for (path, e) in &failed {
        println!("  {} {}: {}", "✗".red(), path.display(), e);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sectionize".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume structure inference tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{"pages": [{"blocks": [
        {"lines": [{"spans": [{"text": "Jane Doe", "font": "Helvetica", "size": 18}]}]},
        {"lines": [
            {"spans": [{"text": "Skills", "font": "Helvetica", "size": 14}]},
            {"spans": [{"text": "Rust", "font": "Helvetica", "size": 10}]}
        ]}
    ]}]}"#;

    #[test]
    fn test_infer_args_to_options() {
        let args = InferArgs {
            pages: Some("1-2".to_string()),
            sequential: true,
            lenient: true,
            unlabeled: UnlabeledMode::Drop,
            heading_lines: true,
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.pages, PageSelection::Range(1..=2));
        assert!(!options.parallel);
        assert_eq!(options.unlabeled, UnlabeledPolicy::Drop);
        assert!(options.emit_heading_lines);
    }

    #[test]
    fn test_infer_args_bad_pages() {
        let args = InferArgs {
            pages: Some("x".to_string()),
            ..Default::default()
        };
        assert!(args.to_options().is_err());
    }

    #[test]
    fn test_batch_writes_one_file_per_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("jane.json");
        fs::write(&input, DUMP).unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();

        let out = dir.path().join("out");
        cmd_batch(&[input, broken], &out, true, &InferArgs::default()).unwrap();

        let json = fs::read_to_string(out.join("jane.sections.json")).unwrap();
        assert!(json.contains("\"skills\""));
        assert!(!out.join("broken.sections.json").exists());
    }
}
