//! Human-readable rendering for the non-JSON output paths.

use std::time::Duration;

use console::{style, Style};
use indicatif::ProgressBar;

use viability_api::{HelperEntry, HelperTable, HistoryDetail, HistoryEntry, UserProfile};
use viability_scoring::Verdict;
use viability_session::{Resolution, ResolutionOrigin};
use viability_types::{Analysis, Tone};

use crate::output::StatusOutput;

pub(crate) fn scoring_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Scoring location viability...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Success => Style::new().green(),
        Tone::Caution => Style::new().yellow(),
        Tone::Danger => Style::new().red(),
        Tone::Neutral => Style::new().cyan(),
    }
}

pub(crate) fn verdict_card(id: Option<&str>, verdict: &Verdict) -> String {
    let profile = verdict.category.profile();
    let header = match verdict.score {
        Some(score) => format!("{} (score {score}/100)", profile.title),
        None => profile.title.to_string(),
    };

    let mut lines = vec![
        tone_style(profile.tone).bold().apply_to(header).to_string(),
        profile.description.to_string(),
    ];
    for detail in profile.details {
        lines.push(format!("  - {detail}"));
    }
    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    for recommendation in profile.recommendations {
        lines.push(format!("  - {recommendation}"));
    }
    lines.push(String::new());

    if !verdict.company.is_empty() {
        lines.push(verdict.company.title());
        let address = verdict.company.display_address();
        if !address.is_empty() {
            lines.push(address);
        }
    }
    lines.push(
        style(format!(
            "Attempt {} of {}",
            verdict.attempts_used, verdict.attempts_max
        ))
        .dim()
        .to_string(),
    );
    if let Some(id) = id {
        lines.push(style(format!("Record: {id}")).dim().to_string());
    }
    lines.join("\n")
}

pub(crate) fn resolution_card(resolution: &Resolution) -> String {
    let mut card = verdict_card(resolution.analysis_id.as_deref(), &resolution.verdict);
    let origin = match resolution.origin {
        ResolutionOrigin::StoredScore => "stored score",
        ResolutionOrigin::FreshRun => "fresh run",
        ResolutionOrigin::DebugOverride => "debug override",
        ResolutionOrigin::Fallback => "placeholder data",
    };
    card.push('\n');
    card.push_str(&style(format!("Source: {origin}")).dim().to_string());
    card
}

pub(crate) fn records_table(records: &[Analysis], current: Option<&str>) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!(
        "  {:<24} {:<12} {:>5}  {}",
        "ID", "STATUS", "SCORE", "TITLE"
    ));
    for record in records {
        let marker = if current == Some(record.id.as_str()) {
            "*"
        } else {
            " "
        };
        let score = record
            .score
            .map_or_else(|| "-".to_string(), |score| score.to_string());
        lines.push(format!(
            "{marker} {:<24} {:<12} {score:>5}  {}",
            record.id,
            record.status.as_str(),
            record.title
        ));
    }
    lines.join("\n")
}

pub(crate) fn status_lines(status: &StatusOutput, profile: Option<&UserProfile>) -> String {
    let mut lines = vec![format!("State directory: {}", status.state_dir)];
    match &status.current_id {
        Some(id) => lines.push(format!(
            "Stored analyses: {} (current: {id})",
            status.records
        )),
        None => lines.push(format!("Stored analyses: {}", status.records)),
    }
    lines.push(format!(
        "Draft: {}",
        if status.draft_present { "present" } else { "none" }
    ));
    let mut attempts = format!(
        "Attempts: {} of {}",
        status.attempts_used, status.attempts_max
    );
    if status.limit_reached {
        attempts.push_str(" (limit reached)");
    }
    lines.push(attempts);
    match profile.filter(|_| status.signed_in) {
        Some(profile) => lines.push(format!("Account: {} <{}>", profile.name, profile.email)),
        None => lines.push("Account: not signed in".to_string()),
    }
    lines.join("\n")
}

pub(crate) fn helpers_table(table: HelperTable, entries: &[HelperEntry]) -> String {
    let mut lines = vec![format!("{} ({} entries)", table.as_str(), entries.len())];
    for entry in entries {
        lines.push(format!("  {:<12} {}", entry.codigo, entry.descricao));
        if let Some(observacoes) = &entry.observacoes {
            lines.push(format!("  {:<12} {}", "", style(observacoes).dim()));
        }
    }
    lines.join("\n")
}

pub(crate) fn history_table(entries: &[HistoryEntry]) -> String {
    let mut lines = vec![format!(
        "{:>6} {:>6}  {:<7} {:<20} {:<12} {}",
        "ID", "SCORE", "VIABLE", "DATE", "CNAE", "LOCATION"
    )];
    for entry in entries {
        lines.push(format!(
            "{:>6} {:>6.1}  {:<7} {:<20} {:<12} {}",
            entry.id,
            entry.pontuacao,
            if entry.viavel { "yes" } else { "no" },
            entry.data_analise,
            entry.cnae,
            entry.local
        ));
    }
    lines.join("\n")
}

pub(crate) fn history_detail_card(detail: &HistoryDetail) -> String {
    let verdict = if detail.viavel { "viable" } else { "not viable" };
    let mut lines = vec![
        format!("History entry {}", detail.id),
        format!("CNAE {} at {}", detail.cnae, detail.local),
        format!("Score {:.1}, {verdict}", detail.pontuacao),
        format!("Analyzed {}", detail.data_analise),
    ];
    if let (Some(latitude), Some(longitude)) = (detail.latitude, detail.longitude) {
        lines.push(format!("Coordinates {latitude:.6}, {longitude:.6}"));
    }
    lines.join("\n")
}
