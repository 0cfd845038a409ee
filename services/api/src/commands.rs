use crate::infra::{build_service, AdmissionStore};
use admissions::applications::{
    AdmissionService, ApplicationId, CategoryFilter, IdAudit, RankingEntry,
};
use admissions::config::AppConfig;
use admissions::error::AppError;
use admissions::telemetry;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Category slug, or `all` for every application in store order
    #[arg(long, default_value = "management_merit_regular")]
    pub(crate) category: CategoryFilter,
    /// Read applications from this JSON fixture instead of the configured store
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Print the ranking as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Category slug, or `all` for every application in store order
    #[arg(long, default_value = "management_merit_regular")]
    pub(crate) category: CategoryFilter,
    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    pub(crate) output: PathBuf,
    /// Date stamped into the file name (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Read applications from this JSON fixture instead of the configured store
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct FormArgs {
    /// Application document id
    pub(crate) id: String,
    /// Directory the form is written to; prints to stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Date printed on the form (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Read applications from this JSON fixture instead of the configured store
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AuditArgs {
    /// Read applications from this JSON fixture instead of the configured store
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

fn load_service(fixture: Option<PathBuf>) -> Result<AdmissionService<AdmissionStore>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;
    Ok(build_service(&config, fixture)?)
}

pub(crate) async fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let service = load_service(args.fixture)?;
    let ranked = service.ranking(args.category).await?;
    let entries: Vec<RankingEntry> = ranked.iter().map(RankingEntry::from).collect();

    if args.json {
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Ranking unavailable as JSON: {err}"),
        }
        return Ok(());
    }

    print!("{}", render_ranking(args.category, &entries));
    Ok(())
}

pub(crate) async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let service = load_service(args.fixture)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let export = service.export(args.category, date).await?;

    fs::create_dir_all(&args.output)?;
    let path = args.output.join(&export.filename);
    fs::write(&path, export.content.as_bytes())?;

    println!("Wrote {} applications to {}", export.rows, path.display());
    Ok(())
}

pub(crate) async fn run_form(args: FormArgs) -> Result<(), AppError> {
    let service = load_service(args.fixture)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let form = service
        .admission_form(&ApplicationId(args.id), date)
        .await?;
    let text = form.render_text();

    match args.output {
        Some(dir) => {
            fs::create_dir_all(&dir)?;
            let path = dir.join(&form.filename);
            fs::write(&path, text.as_bytes())?;
            println!("Wrote admission form to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub(crate) async fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let service = load_service(args.fixture)?;
    let summary = service.summary().await?;
    let audit = service.audit().await?;

    println!("Applications: {}", summary.total);
    for category in &summary.categories {
        println!("  {}: {}", category.title, category.count);
    }
    if summary.uncategorized > 0 {
        println!("  Uncategorized: {}", summary.uncategorized);
    }
    print!("{}", render_audit(&audit));
    Ok(())
}

pub(crate) fn render_ranking(filter: CategoryFilter, entries: &[RankingEntry]) -> String {
    let mut out = format!("Ranking for {filter} ({} applications)\n", entries.len());
    if entries.is_empty() {
        out.push_str("  No applications found\n");
        return out;
    }

    for entry in entries {
        let verdict = match (entry.result.is_eligible, entry.result.reason.as_deref()) {
            (_, Some(reason)) => format!(" | {reason}"),
            (Some(true), None) => " | Eligible".to_string(),
            _ => String::new(),
        };
        let percentage = entry
            .result
            .percentage_label()
            .map(|label| format!(" ({label})"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>4}. {} [{}] {}: {}{}{}\n",
            entry.rank,
            entry.full_name,
            entry.result.course_type,
            entry.score_label,
            entry.result.score,
            percentage,
            verdict
        ));
    }
    out
}

pub(crate) fn render_audit(audit: &IdAudit) -> String {
    let mut out = format!(
        "Generated ids: {} | Duplicates: {} | Missing: {}\n",
        audit.entries.len(),
        audit.duplicates.len(),
        audit.missing.len()
    );

    if !audit.missing.is_empty() {
        out.push_str("Missing ids:\n");
        for id in &audit.missing {
            out.push_str(&format!("  - {id}\n"));
        }
        if audit.missing_truncated {
            out.push_str("  (list truncated)\n");
        }
    }

    for entry in &audit.entries {
        let generated = if entry.generated_id.is_empty() {
            "N/A"
        } else {
            entry.generated_id.as_str()
        };
        let flag = if entry.duplicate { " (DUPLICATE ID)" } else { "" };
        out.push_str(&format!("  {generated} - {}{flag}\n", entry.full_name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::applications::{
        audit_generated_ids, rank_applications, AdmissionCategory, ApplicantRecord,
        ScoringEngine,
    };

    fn record(
        id: &str,
        generated_id: &str,
        course: &str,
        marks: &[(&str, &str)],
    ) -> ApplicantRecord {
        ApplicantRecord {
            id: ApplicationId(id.to_string()),
            generated_id: generated_id.to_string(),
            first_name: id.to_string(),
            last_name: "K".to_string(),
            course: course.to_string(),
            category: AdmissionCategory::ManagementMeritRegular,
            total_of_max_marks: Some("100".to_string()),
            marks: marks
                .iter()
                .map(|(subject, mark)| (subject.to_string(), mark.to_string()))
                .collect(),
            ..ApplicantRecord::default()
        }
    }

    #[test]
    fn ranking_lines_show_score_and_verdict() {
        let filter = CategoryFilter::Only(AdmissionCategory::ManagementMeritRegular);
        let ranked = rank_applications(
            vec![
                record("Asha", "", "X", &[("english", "A+")]),
                record("Ravi", "", "ITI", &[("trade", "45")]),
            ],
            filter,
            &ScoringEngine::default(),
        );
        let entries: Vec<RankingEntry> = ranked.iter().map(RankingEntry::from).collect();

        let text = render_ranking(filter, &entries);

        assert!(text.starts_with("Ranking for management_merit_regular (2 applications)"));
        assert!(text.contains(
            "   1. Ravi K [ITI] Score: 45 (45.00%) | Not Eligible (45/100 = 45.00%)"
        ));
        assert!(text.contains("   2. Asha K [X] Index Score: 7.65"));
    }

    #[test]
    fn audit_report_flags_duplicates() {
        let records = vec![
            record("Asha", "CRML-2025-00001", "X", &[]),
            record("Ravi", "CRML-2025-00001", "X", &[]),
            record("Meera", "CRML-2025-00003", "X", &[]),
        ];

        let text = render_audit(&audit_generated_ids(&records, "CRML-2025"));

        assert!(text.starts_with("Generated ids: 3 | Duplicates: 1 | Missing: 1"));
        assert!(text.contains("  - CRML-2025-00002"));
        assert!(text.contains("CRML-2025-00001 - Asha K (DUPLICATE ID)"));
    }
}
