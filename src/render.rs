//! Human-readable output for the terminal.

use phenotyper_vision::measure::display_label;
use phenotyper_vision::{Locale, Measurement, MeasurementReport, Phenotype};

use crate::history::HistorySummary;

struct Headings {
    face: &'static str,
    nose: &'static str,
    jaw: &'static str,
    lips: &'static str,
    analyses: &'static str,
    detected: &'static str,
    means: &'static str,
    latest: &'static str,
    empty: &'static str,
}

const EN: Headings = Headings {
    face: "Face",
    nose: "Nose",
    jaw: "Jaw",
    lips: "Lips",
    analyses: "Analyses",
    detected: "Faces detected",
    means: "Mean measurements",
    latest: "Latest phenotype",
    empty: "No analyses recorded",
};

const RU: Headings = Headings {
    face: "Лицо",
    nose: "Нос",
    jaw: "Челюсть",
    lips: "Губы",
    analyses: "Анализов",
    detected: "Лицо найдено",
    means: "Средние измерения",
    latest: "Последний фенотип",
    empty: "Нет сохранённых анализов",
};

fn headings(locale: Locale) -> &'static Headings {
    match locale {
        Locale::En => &EN,
        Locale::Ru => &RU,
    }
}

fn measurement_lines(measurements: &[Measurement], locale: Locale) -> Vec<String> {
    measurements
        .iter()
        .map(|m| format!("  {:<16} {:.4}", display_label(&m.label, locale), m.value))
        .collect()
}

fn phenotype_lines(phenotype: &Phenotype, locale: Locale) -> Vec<String> {
    let h = headings(locale);
    let mut lines = measurement_lines(&phenotype.measurements, locale);
    lines.push(format!(
        "  {:<8} {} ({:.1}%)",
        h.face,
        phenotype.face_type.label(locale),
        phenotype.face_ratio_pct
    ));
    lines.push(format!(
        "  {:<8} {} ({:.1}%)",
        h.nose,
        phenotype.nose_type.label(locale),
        phenotype.nose_ratio_pct
    ));
    lines.push(format!(
        "  {:<8} {} ({:.4})",
        h.jaw,
        phenotype.jaw_type.label(locale),
        phenotype.jaw_width_norm
    ));
    lines.push(format!(
        "  {:<8} {} ({:.4})",
        h.lips,
        phenotype.lip_type.label(locale),
        phenotype.lip_length_norm
    ));
    lines
}

pub fn render_report(report: &MeasurementReport, locale: Locale) -> String {
    match report {
        MeasurementReport::Measured(phenotype) => phenotype_lines(phenotype, locale).join("\n"),
        MeasurementReport::Failed { reason } => reason.clone(),
    }
}

pub fn render_summary(summary: &HistorySummary, locale: Locale) -> String {
    let h = headings(locale);
    if summary.analyses == 0 {
        return h.empty.to_string();
    }

    let mut lines = vec![
        format!("{}: {}", h.analyses, summary.analyses),
        format!("{}: {}", h.detected, summary.detected),
    ];
    if !summary.means.is_empty() {
        lines.push(format!("{}:", h.means));
        lines.extend(measurement_lines(&summary.means, locale));
    }
    if let Some(latest) = &summary.latest {
        lines.push(format!("{}:", h.latest));
        lines.extend(phenotype_lines(latest, locale));
    }
    lines.join("\n")
}
