//! Printable HTML rendering of the cash reconciliation report.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{CashFigures, CashReport};

const STYLE: &str = "body{font:14px/1.4 -apple-system,BlinkMacSystemFont,Segoe UI,Roboto,Helvetica,Arial,sans-serif;margin:24px}\
h1{margin:0 0 4px}\
.meta{color:#555;margin:0 0 16px}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:16px;margin-bottom:16px}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #ddd;padding:6px 8px}\
th{background:#f6f6f6;text-align:left}\
tfoot td{font-weight:600;background:#fafafa}\
.right{text-align:right}\
.mono{font-family:ui-monospace,Menlo,Consolas,monospace}\
@media print{.no-print{display:none}body{margin:0}}";

/// Format an amount as pounds sterling: `£1,234.50`, `-£3.00`.
pub(crate) fn format_gbp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, pence) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let reversed: Vec<char> = whole.chars().rev().collect();
    let grouped: String = reversed
        .chunks(3)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect();
    format!("{sign}£{grouped}.{pence}")
}

/// Escape text for interpolation into HTML content or attributes.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn channel_label(channel: &str) -> String {
    if channel.trim().is_empty() {
        "–".to_owned()
    } else {
        escape_html(channel)
    }
}

fn figure_cells(out: &mut String, figures: &CashFigures) {
    out.push_str(&format!(
        "<td class=\"right\">{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td>\
<td class=\"right\">{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td>",
        figures.qty,
        format_gbp(figures.revenue),
        format_gbp(figures.fees),
        format_gbp(figures.postage),
        format_gbp(figures.cost),
        format_gbp(figures.net()),
    ));
}

/// Render the report as a standalone printable page.
pub(crate) fn render_cash_report(report: &CashReport, generated_at: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
<title>Cash Reconciliation</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<div class=\"no-print\" style=\"margin-bottom:12px\"><button onclick=\"window.print()\">Print</button></div>\n\
<h1>Cash Reconciliation</h1>\n<p class=\"meta\">Range: {} (UTC). Generated {}</p>\n<div class=\"grid\">\n",
        escape_html(&report.range.label()),
        escape_html(&generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    ));

    out.push_str(
        "<table>\n<thead><tr><th>Channel</th><th class=\"right\">Qty</th><th class=\"right\">Revenue</th>\
<th class=\"right\">Fees</th><th class=\"right\">Postage</th><th class=\"right\">Cost</th>\
<th class=\"right\">Net</th></tr></thead>\n<tbody>\n",
    );
    for summary in &report.channels {
        out.push_str(&format!("<tr><td>{}</td>", channel_label(&summary.channel)));
        figure_cells(&mut out, &summary.figures);
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n<tfoot><tr><td>Totals</td>");
    figure_cells(&mut out, &report.totals);
    out.push_str("</tr></tfoot>\n</table>\n");

    out.push_str(
        "<table>\n<thead><tr><th>Time</th><th>Channel</th><th>SKU</th><th class=\"right\">Qty</th>\
<th class=\"right\">Retail</th><th class=\"right\">Cost</th><th class=\"right\">Fees</th>\
<th class=\"right\">Postage</th><th class=\"right\">Line Net</th></tr></thead>\n<tbody>\n",
    );
    for line in &report.lines {
        let figures = &line.figures;
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"mono\">{}</td><td class=\"right\">{}</td>\
<td class=\"right\">{}</td><td class=\"right\">{}</td><td class=\"right\">{}</td>\
<td class=\"right\">{}</td><td class=\"right\">{}</td></tr>\n",
            escape_html(&line.created_at.format("%Y-%m-%d %H:%M").to_string()),
            channel_label(&line.channel),
            escape_html(&line.sku),
            figures.qty,
            format_gbp(figures.revenue),
            format_gbp(figures.cost),
            format_gbp(figures.fees),
            format_gbp(figures.postage),
            format_gbp(figures.net()),
        ));
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
    out.push_str(
        "<p class=\"meta\">Note: fees &amp; postage are treated as per-unit in this report \
(multiplied by quantity).</p>\n</body>\n</html>\n",
    );
    out
}
