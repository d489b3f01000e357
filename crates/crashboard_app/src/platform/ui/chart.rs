//! Text rendering of the dashboard charts.

use crashboard_core::{ChartKind, ChartView, Color};

pub(crate) const BAR_WIDTH: usize = 40;
const BAR_GLYPH: char = '█';

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChartRow {
    pub label: String,
    pub bar: String,
    pub value_text: String,
    pub color: Option<Color>,
}

/// One row per label. Bars are scaled to the largest value; any non-zero
/// value gets at least one cell. Doughnut rows also show their share.
pub(crate) fn rows(chart: &ChartView, width: usize) -> Vec<ChartRow> {
    let max = chart.values.iter().copied().max().unwrap_or(0);
    let total: u64 = chart.values.iter().sum();
    let label_width = chart
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);

    chart
        .labels
        .iter()
        .zip(&chart.values)
        .enumerate()
        .map(|(index, (label, &value))| {
            let value_text = match chart.kind {
                ChartKind::Bar => format_with_commas(value),
                ChartKind::Doughnut => {
                    let share = percent(value, total);
                    format!("{} ({share:.1}%)", format_with_commas(value))
                }
            };
            let color = match chart.colors.len() {
                0 => None,
                1 => Some(chart.colors[0]),
                _ => chart.colors.get(index).copied(),
            };
            ChartRow {
                label: format!("{label:<label_width$}"),
                bar: bar(value, max, width),
                value_text,
                color,
            }
        })
        .collect()
}

fn bar(value: u64, max: u64, width: usize) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let cells = ((value as u128 * width as u128) / max as u128) as usize;
    std::iter::repeat(BAR_GLYPH).take(cells.max(1)).collect()
}

fn percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64 * 100.0
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
