use super::*;
use std::fmt::Write as _;

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

pub(crate) fn build_report(config: &Config, analysis: &Analysis) -> Report {
    let unused_files: Vec<String> = analysis.unused().map(display_path).collect();

    let used_files = analysis
        .usages
        .iter()
        .filter_map(|usage| {
            let reference = usage.referenced_by.as_ref()?;
            Some(UsedFile {
                file: display_path(&usage.file),
                referenced_by: display_path(&reference.file),
                via: reference.via,
            })
        })
        .collect();

    let corpus = &analysis.corpus;
    let summary = ReportSummary {
        corpus_files: corpus.len(),
        checked_files: corpus.candidate_count(),
        implicit_entry_points: corpus.len() - corpus.candidate_count(),
        unused_files_count: unused_files.len(),
    };

    Report {
        root: display_path(&config.root),
        source_root: display_path(&config.source_root),
        strategy: config.strategy,
        summary,
        unused_files,
        used_files,
    }
}

pub(crate) fn render_human_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Checking {} files for usage...",
        report.summary.checked_files
    );
    let _ = writeln!(out, "\nPotential Unused Files Found:");
    for path in &report.unused_files {
        let _ = writeln!(out, "{path}");
    }
    out
}

pub(crate) fn print_human_report(report: &Report) {
    print!("{}", render_human_report(report));
}
