//! Output formatting for CLI operations.

use serde_json::json;
use slidefill::template::PlaceholderInventory;
use slidefill::{Archive, PartClass, PartClassifier, RunOutcome};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the result of a generation run
    fn format_generate(&self, outcome: &RunOutcome) -> String;

    /// Formats the placeholders of a template
    fn format_placeholders(&self, inventory: &PlaceholderInventory) -> String;

    /// Formats the parts of a template
    fn format_parts(&self, archive: &Archive, classifier: &PartClassifier) -> String;
}

fn class_name(class: PartClass) -> &'static str {
    match class {
        PartClass::Textual => "textual",
        PartClass::Binary => "binary",
    }
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_generate(&self, outcome: &RunOutcome) -> String {
        let report = &outcome.report;
        let summary = &outcome.summary;
        let resolved: usize = report.parts.iter().map(|p| p.resolved.len()).sum();
        let unresolved: usize = report.parts.iter().map(|p| p.unresolved.len()).sum();

        let mut output = String::new();
        output.push_str(&format!(
            "Generated {} ({})\n",
            outcome.destination.display(),
            humanize_bytes(summary.bytes_written)
        ));
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "  Parts:          {} ({} textual, {} binary)\n",
            report.total_parts, report.textual_parts, report.binary_parts
        ));
        output.push_str(&format!("  Rewritten:      {}\n", summary.parts_rewritten));
        output.push_str(&format!("  Resolved:       {}\n", resolved));
        output.push_str(&format!("  Unresolved:     {}\n", unresolved));
        output.push_str(&format!("  Policy:         {}\n", report.policy));

        output
    }

    fn format_placeholders(&self, inventory: &PlaceholderInventory) -> String {
        let mut output = String::new();

        if inventory.is_empty() {
            output.push_str("No placeholders found\n");
            return output;
        }

        for part in &inventory.parts {
            output.push_str(&format!("{} ({} occurrences)\n", part.path, part.occurrences));
            for key in &part.keys {
                output.push_str(&format!("  {{{{{}}}}}\n", key));
            }
        }

        output.push_str(&"-".repeat(40));
        output.push('\n');
        let keys = inventory.keys();
        output.push_str(&format!(
            "{} distinct keys in {} parts\n",
            keys.len(),
            inventory.parts.len()
        ));

        output
    }

    fn format_parts(&self, archive: &Archive, classifier: &PartClassifier) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:>5} {:<8} {:<10} {:>12} {:>12} {}\n",
            "Index", "Class", "Method", "Size", "Packed", "Name"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut textual = 0;
        let mut total_size = 0;
        for part in archive.parts() {
            let class = classifier.classify(part);
            if class == PartClass::Textual {
                textual += 1;
            }
            total_size += part.size();
            output.push_str(&format!(
                "{:>5} {:<8} {:<10} {:>12} {:>12} {}\n",
                part.original_index(),
                class_name(class),
                part.compression().to_string(),
                humanize_bytes(part.size()),
                humanize_bytes(part.compressed_size()),
                part.path()
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} parts ({} textual, {} binary), {} total\n",
            archive.len(),
            textual,
            archive.len() - textual,
            humanize_bytes(total_size)
        ));

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_generate(&self, outcome: &RunOutcome) -> String {
        let report = &outcome.report;
        let obj = json!({
            "destination": outcome.destination.display().to_string(),
            "policy": report.policy.to_string(),
            "total_parts": report.total_parts,
            "textual_parts": report.textual_parts,
            "binary_parts": report.binary_parts,
            "parts_rewritten": outcome.summary.parts_rewritten,
            "bytes_written": outcome.summary.bytes_written,
            "parts": report.parts.iter().map(|p| json!({
                "path": p.path.as_str(),
                "index": p.index,
                "found": p.found,
                "resolved": p.resolved,
                "unresolved": p.unresolved,
                "occurrences": p.occurrences,
                "changed": p.changed,
            })).collect::<Vec<_>>(),
            "warnings": report.warnings().iter().map(|w| json!({"part": w.part, "key": w.key})).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }

    fn format_placeholders(&self, inventory: &PlaceholderInventory) -> String {
        let obj = json!({
            "keys": inventory.keys().into_iter().collect::<Vec<_>>(),
            "parts": inventory.parts.iter().map(|p| json!({
                "path": p.path.as_str(),
                "index": p.index,
                "keys": p.keys,
                "occurrences": p.occurrences,
            })).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }

    fn format_parts(&self, archive: &Archive, classifier: &PartClassifier) -> String {
        let items: Vec<_> = archive
            .parts()
            .iter()
            .map(|p| {
                json!({
                    "index": p.original_index(),
                    "path": p.path().as_str(),
                    "class": class_name(classifier.classify(p)),
                    "method": p.compression().to_string(),
                    "size": p.size(),
                    "compressed_size": p.compressed_size(),
                    "crc32": p.crc32(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string()) + "\n"
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
