use batt_core::{format::hours_minutes, Renderer, Result, Status, TrayView};
use serde::Serialize;
use std::io::Write;

/// Writes one JSON object per change to a writer (stdout by default), in
/// the shape status bars such as waybar expect from custom modules:
///
/// ```text
/// {"text":"▌ 48% (1h 23m)","alt":"discharging","tooltip":"…","class":"discharging","percentage":48}
/// ```
///
/// Icon lookup is left to the consumer: `alt`/`class` carry the status.
#[derive(Debug)]
pub struct JsonRenderer<W: Write + Send + std::fmt::Debug = std::io::Stdout> {
    out:  W,
    last: Option<TrayView>,
}

#[derive(Debug, Serialize)]
struct Frame<'a> {
    text:       String,
    alt:        Status,
    tooltip:    &'a str,
    class:      Status,
    percentage: u8,
}

impl JsonRenderer {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + std::fmt::Debug> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + std::fmt::Debug> Renderer for JsonRenderer<W> {
    fn render(&mut self, view: &TrayView) -> Result<()> {
        if self.last.as_ref() == Some(view) {
            return Ok(());
        }

        let icon = battery_icon(view.status, view.percentage);
        let time = format_time(view.minutes);
        let text = if time.is_empty() {
            format!("{icon} {}%", view.percentage)
        } else {
            format!("{icon} {}% ({time})", view.percentage)
        };

        let frame = Frame {
            text,
            alt:        view.status,
            tooltip:    &view.tooltip,
            class:      view.status,
            percentage: view.percentage,
        };

        let line = serde_json::to_string(&frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.out, "{line}")?;
        self.out.flush()?;

        self.last = Some(view.clone());
        Ok(())
    }
}

fn battery_icon(status: Status, pct: u8) -> &'static str {
    match status {
        Status::Missing | Status::Unknown => return "?",
        Status::Charging | Status::Charged => return "⚡",
        _ => {}
    }
    match pct {
        80..=100 => "█",
        60..=79  => "▊",
        40..=59  => "▌",
        20..=39  => "▎",
        _        => "▏",
    }
}

/// Format minutes into a compact human-readable string: "1h 23m" or "45m".
fn format_time(mins: Option<u32>) -> String {
    let m = match mins {
        Some(m) if m > 0 => m,
        _ => return String::new(),
    };
    match hours_minutes(m) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}
