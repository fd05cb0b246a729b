//! Terminal HUD
//!
//! One-shot boxed status display rendered after a run (and refreshed in
//! watch mode). Pure string assembly; styling goes through crossterm so no
//! escape codes are spelled out by hand.

use crate::report::PlatformReport;
use crossterm::style::{Color, Stylize};
use qbyte_core::constants::{BELL_FIDELITY, LAMBDA_PHI, PHI_THRESHOLD, THETA_LOCK};

const BAR_WIDTH: usize = 30;
const BOX_WIDTH: usize = 74;

/// Coherence as a colored bar of `width` cells.
pub fn coherence_bar(value: f64, width: usize) -> String {
    let clamped = value.clamp(0.0, 1.0);
    let filled = (clamped * width as f64) as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));

    let color = if clamped > 0.9 {
        Color::Magenta
    } else if clamped > 0.7 {
        Color::Green
    } else if clamped > 0.5 {
        Color::Yellow
    } else {
        Color::Red
    };
    bar.with(color).to_string()
}

/// The CCCE metric with its stability band label.
pub fn xi_indicator(xi: f64) -> String {
    if xi.is_infinite() || xi > 1000.0 {
        "∞ PERFECT".with(Color::Magenta).to_string()
    } else if xi > 100.0 {
        format!("{xi:.1} OPTIMAL").with(Color::Green).to_string()
    } else if xi > 10.0 {
        format!("{xi:.1} STABLE").with(Color::Yellow).to_string()
    } else if xi > 1.0 {
        format!("{xi:.1} MARGINAL").with(Color::Yellow).to_string()
    } else {
        format!("{xi:.2} CRITICAL").with(Color::Red).to_string()
    }
}

fn top() -> String {
    format!("╔{}╗", "═".repeat(BOX_WIDTH))
}

fn divider() -> String {
    format!("╠{}╣", "═".repeat(BOX_WIDTH))
}

fn bottom() -> String {
    format!("╚{}╝", "═".repeat(BOX_WIDTH))
}

fn row(content: impl AsRef<str>) -> String {
    format!("║  {}", content.as_ref())
}

/// Render the full HUD for a report.
pub fn render(report: &PlatformReport) -> String {
    let uptime = report.meta.uptime_seconds as u64;
    let (hours, minutes, seconds) = (uptime / 3600, (uptime % 3600) / 60, uptime % 60);

    let mut lines = vec![
        top(),
        row(format!(
            "{} · {}",
            "QBYTE".with(Color::Magenta).bold(),
            format!("Unified Coherence Platform v{}", report.meta.version).with(Color::Yellow)
        )),
        divider(),
        row(format!("Uptime:           {hours:02}:{minutes:02}:{seconds:02}")),
        row(format!(
            "Mode:             {}",
            report.meta.mode.clone().with(Color::Green)
        )),
        row(format!(
            "Organisms:        {}",
            report
                .ecosystem
                .organisms_loaded
                .to_string()
                .with(Color::Magenta)
        )),
        row(format!(
            "Quantum Jobs:     {}",
            report
                .quantum_corpus
                .jobs_analyzed
                .to_string()
                .with(Color::Yellow)
        )),
        divider(),
        row("[ QUANTUM CORPUS ]".bold().to_string()),
        row(format!(
            "Completed:        {}",
            report
                .quantum_corpus
                .completed_jobs
                .to_string()
                .with(Color::Green)
        )),
        row(format!(
            "Success Rate:     {}",
            format!("{:.1}%", report.quantum_corpus.success_rate * 100.0).with(Color::Magenta)
        )),
        row(format!(
            "Total QPU Cost:   {} units",
            report.quantum_corpus.total_cost.to_string().with(Color::Yellow)
        )),
    ];
    for (backend, count) in &report.quantum_corpus.backends {
        lines.push(row(format!("  └─ {backend}: {count} jobs")));
    }

    lines.push(divider());
    lines.push(row(format!("{}  Ξ = ΛΦ/Γ", "[ CCCE ENGINE ]".bold())));
    lines.push(row(format!(
        "Ecosystem Λ:      {} {}",
        coherence_bar(report.ecosystem.ecosystem_lambda, BAR_WIDTH),
        format!("{:.4}", report.ecosystem.ecosystem_lambda).with(Color::Magenta)
    )));
    lines.push(row(format!(
        "CCCE Ξ:           {}",
        xi_indicator(report.ecosystem.ccce_xi.unwrap_or(f64::INFINITY))
    )));
    lines.push(row(format!(
        "Phase Corrections: {}",
        report
            .ecosystem
            .phase_conjugate_corrections
            .to_string()
            .with(Color::Yellow)
    )));

    lines.push(divider());
    lines.push(row("[ PHYSICS CONSTANTS ]".bold().to_string()));
    lines.push(row(format!(
        "ΛΦ (Universal Memory):  {}",
        format!("{LAMBDA_PHI:.6e} s⁻¹").with(Color::Green)
    )));
    lines.push(row(format!(
        "Φ (Consciousness):      {}",
        PHI_THRESHOLD.to_string().with(Color::Magenta)
    )));
    lines.push(row(format!(
        "θ (Lock Angle):         {}",
        format!("{THETA_LOCK}°").with(Color::Yellow)
    )));
    lines.push(row(format!(
        "Bell Fidelity:          {}",
        format!("{:.1}%", BELL_FIDELITY * 100.0).with(Color::Green)
    )));
    lines.push(bottom());

    lines.join("\n")
}
