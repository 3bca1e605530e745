//! Format reconciliation and merge results as text.

use crate::reconcile::ReconciliationReport;
use crate::tree::merger::MergeBatchReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Entries shown per diagnostic list unless "show all" is set.
const PREVIEW_LIMIT: usize = 3;

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Human-readable reconciliation report for one target.
pub fn format_reconciliation_text(
    target_name: &str,
    report: &ReconciliationReport,
    show_all: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Reconciliation: {}", target_name))
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Unique URLs", "(url, key) pairs"]);
    table.add_row(vec![
        "primary".to_string(),
        report.primary.unique_urls.to_string(),
        report.primary.pairs.to_string(),
    ]);
    table.add_row(vec![
        "secondary".to_string(),
        report.secondary.unique_urls.to_string(),
        report.secondary.pairs.to_string(),
    ]);
    table.add_row(vec![
        "target".to_string(),
        report.target.unique_urls.to_string(),
        report.target.pairs.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    if !report.count_mismatches.is_empty() {
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading("Count mismatches")
        ));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["URL", "Target keys", "Target", "Primary", "Secondary"]);
        let shown = preview_len(report.count_mismatches.len(), show_all);
        for mismatch in &report.count_mismatches[..shown] {
            table.add_row(vec![
                mismatch.url.clone(),
                mismatch.target_keys.join(", "),
                mismatch.target_count.to_string(),
                mismatch.primary_count.to_string(),
                mismatch.secondary_count.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        out.push_str(&truncation_note(report.count_mismatches.len(), shown));
        out.push('\n');
    }

    out.push_str(&pair_list_section(
        "Missing in target",
        &report.missing_in_target,
        show_all,
    ));
    out.push_str(&pair_list_section(
        "Orphans in target",
        &report.orphan_in_target,
        show_all,
    ));

    if report.verdict {
        out.push_str(&format!("Verdict: {}\n", "PASS".green()));
    } else {
        out.push_str(&format!("Verdict: {}\n", "FAIL".red()));
    }
    out
}

fn pair_list_section(
    title: &str,
    pairs: &[crate::reconcile::PairRef],
    show_all: bool,
) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({})\n",
        format_section_heading(title),
        pairs.len()
    ));
    let shown = preview_len(pairs.len(), show_all);
    for pair in &pairs[..shown] {
        out.push_str(&format!("  {}  [{}]\n", pair.url, pair.key));
    }
    out.push_str(&truncation_note(pairs.len(), shown));
    out.push('\n');
    out
}

fn preview_len(total: usize, show_all: bool) -> usize {
    if show_all {
        total
    } else {
        total.min(PREVIEW_LIMIT)
    }
}

fn truncation_note(total: usize, shown: usize) -> String {
    if shown < total {
        format!("  ... and {} more (use --all to show)\n", total - shown)
    } else {
        String::new()
    }
}

/// Human-readable merge batch summary.
pub fn format_merge_report_text(report: &MergeBatchReport, out_path: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading("Merge summary")
    ));
    out.push_str(&format!("  Merged fragments: {}\n", report.merged.len()));
    for name in &report.merged {
        out.push_str(&format!("    {}\n", name));
    }
    if !report.skipped.is_empty() {
        out.push_str(&format!("  Skipped (no match): {}\n", report.skipped.len()));
        for name in &report.skipped {
            out.push_str(&format!("    {}\n", name));
        }
    }
    out.push_str(&format!("  Written to: {}\n", out_path));
    out
}
