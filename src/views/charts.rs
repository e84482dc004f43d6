use std::f64::consts::PI;
use std::fmt::Write;
use tera::escape_html;
use crate::models::chart::{StatusCount, TimeSeries};
use crate::models::enquiry::EnquiryStatus;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 16.0;
const PAD_BOTTOM: f64 = 40.0;

pub const CHART_COLORS: [&str; 6] = ["#FF9F40", "#4BC0C0", "#36A2EB", "#FF6384", "#9966FF", "#FFCD56"];
const OTHER_STATUS_COLOR: &str = "#ADB5BD";

fn empty_chart(title: &str) -> String {
    format!(
        r#"<svg class="chart chart-empty" viewBox="0 0 {w} {h}" role="img" aria-label="{title}"><text x="{cx}" y="{cy}" text-anchor="middle">No data available</text></svg>"#,
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        cy = HEIGHT / 2.0,
        title = escape_html(title),
    )
}

fn plot_height() -> f64 {
    HEIGHT - PAD_TOP - PAD_BOTTOM
}

fn plot_width() -> f64 {
    WIDTH - PAD_LEFT - PAD_RIGHT
}

fn scale_max<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(0.0_f64, |max, value| max.max(*value)).max(1.0)
}

fn y_for(value: f64, max: f64) -> f64 {
    PAD_TOP + plot_height() - (value.max(0.0) / max) * plot_height()
}

fn axes(svg: &mut String, max: f64) {
    let base = PAD_TOP + plot_height();
    let _ = write!(
        svg,
        r#"<line class="axis" x1="{l}" y1="{t}" x2="{l}" y2="{b}"/><line class="axis" x1="{l}" y1="{b}" x2="{r}" y2="{b}"/><text class="tick" x="{tx}" y="{ty}" text-anchor="end">{max}</text><text class="tick" x="{tx}" y="{b}" text-anchor="end">0</text>"#,
        l = PAD_LEFT,
        t = PAD_TOP,
        b = base,
        r = WIDTH - PAD_RIGHT,
        tx = PAD_LEFT - 6.0,
        ty = PAD_TOP + 4.0,
        max = max,
    );
}

fn x_labels(svg: &mut String, labels: &[String], slot: f64) {
    for (index, label) in labels.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<text class="tick" x="{x:.1}" y="{y}" text-anchor="middle">{label}</text>"#,
            x = PAD_LEFT + slot * (index as f64 + 0.5),
            y = HEIGHT - PAD_BOTTOM / 2.0,
            label = escape_html(label),
        );
    }
}

/// Single-series bar chart of the first dataset.
pub fn bar_chart(title: &str, series: &TimeSeries, color: &str) -> String {
    let values = series.primary();
    if series.labels.is_empty() || values.is_empty() {
        return empty_chart(title);
    }

    let max = scale_max(values.iter());
    let slot = plot_width() / series.labels.len() as f64;
    let bar = slot * 0.6;
    let base = PAD_TOP + plot_height();

    let mut svg = format!(
        r#"<svg class="chart chart-bar" viewBox="0 0 {} {}" role="img" aria-label="{}">"#,
        WIDTH,
        HEIGHT,
        escape_html(title)
    );
    axes(&mut svg, max);
    for (index, value) in values.iter().take(series.labels.len()).enumerate() {
        let y = y_for(*value, max);
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}"><title>{label}: {value}</title></rect>"#,
            x = PAD_LEFT + slot * index as f64 + (slot - bar) / 2.0,
            y = y,
            w = bar,
            h = base - y,
            color = color,
            label = escape_html(&series.labels[index]),
            value = value,
        );
    }
    x_labels(&mut svg, &series.labels, slot);
    svg.push_str("</svg>");
    svg
}

/// Multi-series line chart with a legend, one colour per dataset.
pub fn line_chart(title: &str, series: &TimeSeries) -> String {
    let has_points = series.datasets.iter().any(|dataset| !dataset.data.is_empty());
    if series.labels.is_empty() || !has_points {
        return empty_chart(title);
    }

    let max = scale_max(series.datasets.iter().flat_map(|dataset| dataset.data.iter()));
    let slot = plot_width() / series.labels.len() as f64;

    let mut svg = format!(
        r#"<svg class="chart chart-line" viewBox="0 0 {} {}" role="img" aria-label="{}">"#,
        WIDTH,
        HEIGHT + 24.0,
        escape_html(title)
    );
    axes(&mut svg, max);
    for (index, dataset) in series.datasets.iter().enumerate() {
        let color = CHART_COLORS[index % CHART_COLORS.len()];
        let points: Vec<String> = dataset
            .data
            .iter()
            .take(series.labels.len())
            .enumerate()
            .map(|(slot_index, value)| {
                format!("{:.1},{:.1}", PAD_LEFT + slot * (slot_index as f64 + 0.5), y_for(*value, max))
            })
            .collect();
        if !points.is_empty() {
            let _ = write!(
                svg,
                r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                color,
                points.join(" ")
            );
        }
        let label = dataset.label.as_deref().unwrap_or("Series");
        let legend_x = PAD_LEFT + index as f64 * 140.0;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y}" width="10" height="10" fill="{color}"/><text class="legend" x="{tx:.1}" y="{ty}">{label}</text>"#,
            x = legend_x,
            y = HEIGHT + 6.0,
            color = color,
            tx = legend_x + 14.0,
            ty = HEIGHT + 15.0,
            label = escape_html(label),
        );
    }
    x_labels(&mut svg, &series.labels, slot);
    svg.push_str("</svg>");
    svg
}

pub struct Slice<'a> {
    pub label: &'a str,
    pub value: f64,
    pub color: &'a str,
}

pub fn status_slices(breakdown: &[StatusCount]) -> Vec<Slice<'_>> {
    breakdown
        .iter()
        .map(|entry| Slice {
            label: entry.status.as_str(),
            value: entry.count as f64,
            color: EnquiryStatus::parse(&entry.status)
                .map(|status| status.color())
                .unwrap_or(OTHER_STATUS_COLOR),
        })
        .collect()
}

/// Pie chart with a legend; an all-zero breakdown renders the empty placeholder.
pub fn pie_chart(title: &str, slices: &[Slice]) -> String {
    let total: f64 = slices.iter().map(|slice| slice.value.max(0.0)).sum();
    if total <= 0.0 {
        return empty_chart(title);
    }

    let (cx, cy, radius) = (130.0, HEIGHT / 2.0, 100.0);
    let mut svg = format!(
        r#"<svg class="chart chart-pie" viewBox="0 0 {} {}" role="img" aria-label="{}">"#,
        WIDTH,
        HEIGHT,
        escape_html(title)
    );

    let mut angle = -PI / 2.0;
    for slice in slices.iter().filter(|slice| slice.value > 0.0) {
        let fraction = slice.value / total;
        if fraction >= 1.0 {
            let _ = write!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                cx, cy, radius, slice.color
            );
            continue;
        }
        let sweep = fraction * 2.0 * PI;
        let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
        angle += sweep;
        let (x2, y2) = (cx + radius * angle.cos(), cy + radius * angle.sin());
        let large_arc = if sweep > PI { 1 } else { 0 };
        let _ = write!(
            svg,
            r#"<path d="M{cx},{cy} L{x1:.2},{y1:.2} A{r},{r} 0 {large},1 {x2:.2},{y2:.2} Z" fill="{color}"><title>{label}: {value}</title></path>"#,
            cx = cx,
            cy = cy,
            x1 = x1,
            y1 = y1,
            r = radius,
            large = large_arc,
            x2 = x2,
            y2 = y2,
            color = slice.color,
            label = escape_html(slice.label),
            value = slice.value,
        );
    }

    for (index, slice) in slices.iter().enumerate() {
        let y = 40.0 + index as f64 * 24.0;
        let _ = write!(
            svg,
            r#"<rect x="280" y="{y}" width="12" height="12" fill="{color}"/><text class="legend" x="300" y="{ty}">{label} ({value})</text>"#,
            y = y,
            color = slice.color,
            ty = y + 11.0,
            label = escape_html(slice.label),
            value = slice.value,
        );
    }
    svg.push_str("</svg>");
    svg
}
