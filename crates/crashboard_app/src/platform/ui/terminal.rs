use std::collections::HashMap;
use std::io::{self, Write};

use crashboard_core::{Color, KpiView, SourceCardView, SourcesView};
use crashboard_logging::crash_trace;
use crossterm::style::{Color as TermColor, Stylize};

use super::chart::{self, BAR_WIDTH};
use super::constants::ControlId;
use super::UiCommand;

/// Append-only terminal rendering of retained UI state.
///
/// The surface remembers the last command applied to each control and only
/// prints what changed. A log that grew is continued in place instead of
/// being printed again.
pub(crate) struct TerminalSurface<W: Write> {
    out: W,
    use_color: bool,
    show_controls: bool,
    applied: HashMap<ControlId, UiCommand>,
}

impl<W: Write> TerminalSurface<W> {
    pub(crate) fn new(out: W, use_color: bool, show_controls: bool) -> Self {
        Self {
            out,
            use_color,
            show_controls,
            applied: HashMap::new(),
        }
    }

    pub(crate) fn apply(&mut self, commands: Vec<UiCommand>) -> io::Result<()> {
        for command in commands {
            let control_id = command.control_id();
            let previous = self.applied.get(&control_id);
            if previous == Some(&command) {
                continue;
            }
            crash_trace!("apply {:?}", control_id);
            let previous = previous.cloned();
            self.draw(&command, previous.as_ref())?;

            if let UiCommand::ReplaceContainer { control_id, .. } = &command {
                self.applied.retain(|id, _| !id.is_child_of(*control_id));
            }
            self.applied.insert(control_id, command);
        }
        self.out.flush()
    }

    /// Free-form line outside any control, e.g. shell help.
    pub(crate) fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, command: &UiCommand, previous: Option<&UiCommand>) -> io::Result<()> {
        match command {
            UiCommand::SetButton {
                caption,
                label,
                enabled,
                ..
            } => {
                if self.show_controls {
                    let state = if *enabled { "" } else { " (deshabilitado)" };
                    writeln!(self.out, "[{caption}] {label}{state}")?;
                }
            }
            UiCommand::SetLog {
                title,
                visible,
                text,
                ..
            } => self.draw_log(title, *visible, text, previous)?,
            UiCommand::SetLoader { visible, text, .. } => {
                if *visible {
                    writeln!(self.out, "⏳ {text}")?;
                }
            }
            UiCommand::SetKpis { kpis, .. } => self.draw_kpis(kpis)?,
            UiCommand::DrawChart { title, chart, .. } => {
                self.heading(title)?;
                for row in chart::rows(chart, BAR_WIDTH) {
                    let bar = self.paint(&row.bar, row.color);
                    writeln!(self.out, "  {}  {} {}", row.label, bar, row.value_text)?;
                }
            }
            UiCommand::ReplaceContainer { heading, body, .. } => {
                writeln!(self.out, "❌ {heading}")?;
                writeln!(self.out, "{body}")?;
            }
            UiCommand::SetAnswer { text, .. } => {
                if let Some(text) = text {
                    self.heading("Respuesta")?;
                    writeln!(self.out, "{text}")?;
                }
            }
            UiCommand::SetSources { sources, .. } => match sources {
                Some(SourcesView::Cards(cards)) => {
                    self.heading("Fuentes")?;
                    for card in cards {
                        self.draw_card(card)?;
                    }
                }
                Some(SourcesView::Placeholder(text)) => {
                    self.heading("Fuentes")?;
                    writeln!(self.out, "{text}")?;
                }
                None => {}
            },
            UiCommand::SetError { message, .. } => {
                if let Some(message) = message {
                    writeln!(self.out, "❌ {message}")?;
                }
            }
        }
        Ok(())
    }

    fn draw_log(
        &mut self,
        title: &str,
        visible: bool,
        text: &str,
        previous: Option<&UiCommand>,
    ) -> io::Result<()> {
        if !visible {
            return Ok(());
        }
        let shown = match previous {
            Some(UiCommand::SetLog {
                visible: true,
                text: shown,
                ..
            }) => Some(shown.as_str()),
            _ => None,
        };
        match shown.and_then(|shown| text.strip_prefix(shown)) {
            Some(suffix) => write!(self.out, "{suffix}"),
            None => {
                self.heading(title)?;
                write!(self.out, "{text}")
            }
        }
    }

    fn draw_kpis(&mut self, kpis: &[KpiView]) -> io::Result<()> {
        let width = kpis
            .iter()
            .map(|kpi| kpi.label.chars().count())
            .max()
            .unwrap_or(0);
        for kpi in kpis {
            writeln!(self.out, "  {:<width$}  {}", kpi.label, kpi.value)?;
        }
        Ok(())
    }

    fn draw_card(&mut self, card: &SourceCardView) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "• {}", card.title)?;
        writeln!(self.out, "  {}", card.content)?;
        writeln!(self.out, "  {} | {}", card.date_label, card.medium_label)?;
        writeln!(self.out, "  {}: {}", card.link_label, card.url)
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "── {title} ──")
    }

    fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(Color { r, g, b, .. }) if self.use_color => {
                text.with(TermColor::Rgb { r, g, b }).to_string()
            }
            _ => text.to_string(),
        }
    }
}
