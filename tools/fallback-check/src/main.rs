//! Fallback inspection tool for SvgKit.
//!
//! Parses an HTML page and reports every SVG reference a fallback pass would
//! rewrite, across all three surfaces: image sources, inline background
//! styles, and same-origin stylesheet rules.
//!
//! ## Usage
//!
//! ```bash
//! # Human-readable report
//! fallback-check scan page.html
//!
//! # JSON report with a custom fallback extension
//! fallback-check scan page.html --ext webp --report report.json
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;

use svgkit_common::{init_logging, LogConfig};
use svgkit_dom::{Document, Node};
use svgkit_engine::rewrite::{fallback_url, rewrite_css_value};
use svgkit_engine::DEFAULT_FALLBACK_EXTENSION;

#[derive(Parser)]
#[command(name = "fallback-check")]
#[command(about = "Reports SVG references a fallback pass would rewrite")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an HTML file and list candidate rewrites
    Scan {
        /// HTML file to scan
        input: PathBuf,
        /// Fallback extension to substitute for `.svg`
        #[arg(short, long, default_value = DEFAULT_FALLBACK_EXTENSION)]
        ext: String,
        /// Output JSON report path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct Rewrite {
    surface: &'static str,
    location: String,
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    input: String,
    extension: String,
    rewrites: Vec<Rewrite>,
    skipped_stylesheets: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LogConfig::debug()
    } else {
        LogConfig::default()
    });

    match cli.command {
        Commands::Scan { input, ext, report } => {
            let html = std::fs::read_to_string(&input)?;
            let document = Document::parse_html(&html)?;
            let scan = scan_document(&document, &input.display().to_string(), &ext);

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&scan)?)?;
                println!("Report written to {}", path.display());
            } else {
                print_report(&scan);
            }

            if scan.rewrites.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn scan_document(document: &Document, input: &str, ext: &str) -> ScanReport {
    let mut rewrites = Vec::new();
    let mut skipped = Vec::new();

    for (index, img) in document.get_elements_by_tag_name("img").iter().enumerate() {
        if let Some(src) = img.get_attribute("src") {
            if let std::borrow::Cow::Owned(to) = fallback_url(&src, ext) {
                rewrites.push(Rewrite {
                    surface: "image",
                    location: element_location(img, &format!("img[{index}]")),
                    from: src,
                    to,
                });
            }
        }
    }

    document.traverse(|node| {
        if !node.has_attribute("style") {
            return;
        }
        for property in ["background-image", "background"] {
            if let Some(value) = node.inline_style_property(property) {
                if let Some(to) = rewrite_css_value(&value, ext) {
                    rewrites.push(Rewrite {
                        surface: "inline-style",
                        location: element_location(node, node.tag_name().unwrap_or("?")),
                        from: value,
                        to,
                    });
                }
            }
        }
    });

    for (index, sheet) in document.stylesheets().iter().enumerate() {
        let location = match sheet.href() {
            Some(href) => href.to_string(),
            None => format!("<style>[{index}]"),
        };
        let rules = match sheet.rules() {
            Ok(rules) => rules,
            Err(_) => {
                skipped.push(location);
                continue;
            }
        };
        for rule in rules.iter() {
            for property in ["background-image", "background"] {
                if let Some(decl) = rule.declaration(property) {
                    if let Some(to) = rewrite_css_value(&decl.value, ext) {
                        rewrites.push(Rewrite {
                            surface: "stylesheet",
                            location: format!("{location} {}", rule.selector),
                            from: decl.value.clone(),
                            to,
                        });
                    }
                }
            }
        }
    }

    ScanReport {
        input: input.to_string(),
        extension: ext.to_string(),
        rewrites,
        skipped_stylesheets: skipped,
    }
}

fn element_location(node: &Rc<Node>, fallback: &str) -> String {
    match node.get_attribute("id") {
        Some(id) => format!("#{id}"),
        None => fallback.to_string(),
    }
}

fn print_report(scan: &ScanReport) {
    println!("Scan of {} (fallback extension: {})", scan.input, scan.extension);
    if scan.rewrites.is_empty() {
        println!("No SVG references found.");
    }
    for rewrite in &scan.rewrites {
        println!(
            "  [{:<12}] {}: {} -> {}",
            rewrite.surface, rewrite.location, rewrite.from, rewrite.to
        );
    }
    for sheet in &scan.skipped_stylesheets {
        println!("  skipped cross-origin stylesheet: {sheet}");
    }
    println!(
        "{} rewrite(s), {} stylesheet(s) skipped",
        scan.rewrites.len(),
        scan.skipped_stylesheets.len()
    );
}
