//! Self-contained HTML session report.
//!
//! Renders the session summary and an inline-SVG score trend; no external
//! assets, so the page can be saved or emailed as-is. Everything interpolated
//! from analysis data is HTML-escaped.

use html_escape::encode_text;

use crate::history::{HistoryEntry, SessionSummary};

const CHART_W: f32 = 640.0;
const CHART_H: f32 = 200.0;
const CHART_PAD: f32 = 10.0;

/// Render the report page for the current session window.
pub fn render_html(summary: &SessionSummary, entries: &[HistoryEntry]) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Speech Biomarker Session Report</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2rem; color: #222; }\n\
         table { border-collapse: collapse; margin: 1rem 0; }\n\
         th, td { border: 1px solid #ccc; padding: 0.3rem 0.8rem; text-align: left; }\n\
         .chart { border: 1px solid #ccc; background: #fafafa; }\n\
         .disclaimer { color: #666; font-size: 0.85rem; margin-top: 2rem; }\n\
         </style>\n</head>\n<body>\n",
    );

    out.push_str("<h1>Speech Biomarker Session Report</h1>\n");

    // Summary table
    out.push_str("<h2>Summary</h2>\n<table>\n");
    out.push_str(&format!(
        "<tr><th>Samples</th><td>{}</td></tr>\n",
        summary.total_samples
    ));
    out.push_str(&format!(
        "<tr><th>Average score</th><td>{:.1}</td></tr>\n",
        summary.average_score
    ));
    out.push_str(&format!(
        "<tr><th>Max score</th><td>{:.1}</td></tr>\n",
        summary.max_score
    ));
    for (level, count) in &summary.level_distribution {
        out.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            encode_text(level),
            count
        ));
    }
    out.push_str("</table>\n");

    // Trend chart
    out.push_str("<h2>Score trend</h2>\n");
    out.push_str(&trend_svg(&summary.score_trend));

    // Recent entries
    out.push_str("<h2>Recent analyses</h2>\n<table>\n");
    out.push_str("<tr><th>Time (UTC)</th><th>Score</th><th>Level</th><th>Words</th><th>Keywords</th></tr>\n");
    for e in entries {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            e.ts.format("%Y-%m-%d %H:%M:%S"),
            e.score,
            encode_text(e.level.as_str()),
            e.word_count,
            encode_text(&e.top_keywords.join(", ")),
        ));
    }
    out.push_str("</table>\n");

    out.push_str(
        "<p class=\"disclaimer\">Note: This is an automated analysis and not a clinical diagnosis.</p>\n",
    );
    out.push_str("</body>\n</html>\n");
    out
}

/// Inline SVG polyline over scores in [0, 100]; y grows downward in SVG so the
/// axis is inverted. Returns a placeholder paragraph when there is no data.
fn trend_svg(scores: &[f32]) -> String {
    if scores.is_empty() {
        return "<p>No analyses recorded yet.</p>\n".to_string();
    }

    let inner_w = CHART_W - 2.0 * CHART_PAD;
    let inner_h = CHART_H - 2.0 * CHART_PAD;
    let step = inner_w / (scores.len().max(2) - 1) as f32;

    let mut points = String::new();
    for (i, &s) in scores.iter().enumerate() {
        let x = CHART_PAD + i as f32 * step;
        let y = CHART_PAD + (1.0 - s.clamp(0.0, 100.0) / 100.0) * inner_h;
        if i > 0 {
            points.push(' ');
        }
        points.push_str(&format!("{x:.1},{y:.1}"));
    }

    // Gridlines at 0 / 50 / 100.
    let mut grid = String::new();
    for frac in [0.0f32, 0.5, 1.0] {
        let y = CHART_PAD + frac * inner_h;
        grid.push_str(&format!(
            "<line x1=\"{CHART_PAD}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#ddd\"/>\n",
            CHART_W - CHART_PAD
        ));
    }

    format!(
        "<svg class=\"chart\" viewBox=\"0 0 {CHART_W} {CHART_H}\" width=\"{CHART_W}\" height=\"{CHART_H}\">\n\
         {grid}\
         <polyline points=\"{points}\" fill=\"none\" stroke=\"#2c7fb8\" stroke-width=\"2\"/>\n\
         </svg>\n"
    )
}
