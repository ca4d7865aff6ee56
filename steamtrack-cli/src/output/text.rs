//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use serde_json::Value;
use steamtrack_core::{MetricKind, MetricSnapshot, PersonaState};
use steamtrack_metrics::MetricDescriptor;
use steamtrack_store::TrackerConfig;
use std::time::Duration;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Rows shown for list attributes before eliding the rest.
const MAX_LIST_ROWS: usize = 5;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    name_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            name_width: 22,
        }
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Formats every snapshot for a tracker.
    pub fn format_report(&self, tracker: &TrackerConfig, snapshots: &[MetricSnapshot]) -> String {
        let mut lines = vec![
            format!(
                "{} {}",
                self.bold(&tracker.name),
                self.dim(&format!("({})", tracker.account_id))
            ),
            "─".repeat(50),
        ];
        for snapshot in snapshots {
            lines.push(self.format_snapshot(snapshot));
        }
        lines.join("\n")
    }

    /// Formats one metric: a headline and detail rows.
    pub fn format_snapshot(&self, snapshot: &MetricSnapshot) -> String {
        let label = format!("{}:", snapshot.kind.display_suffix());
        let label = format!("{label:<width$}", width = self.name_width);

        let Some(value) = &snapshot.result.value else {
            return format!("{label} {}", self.red("unavailable"));
        };

        let mut headline = format!("{label} {}", self.format_value(snapshot.kind, &value.to_string()));
        if let Some(unit) = unit_for(snapshot.kind) {
            headline.push(' ');
            headline.push_str(unit);
        }

        let mut lines = vec![headline];
        for detail in self.details(snapshot) {
            lines.push(format!("{:width$} {}", "", detail, width = self.name_width));
        }
        lines.join("\n")
    }

    fn format_value(&self, kind: MetricKind, text: &str) -> String {
        match kind {
            MetricKind::Status => match text {
                t if t == PersonaState::Online.label() => self.green(t),
                t if t == PersonaState::Offline.label() => self.dim(t),
                t if t == PersonaState::Unknown.label() => self.red(t),
                t => self.yellow(t),
            },
            MetricKind::Game | MetricKind::RecentGames if text == "none" => self.dim(text),
            _ => self.cyan(text),
        }
    }

    fn details(&self, snapshot: &MetricSnapshot) -> Vec<String> {
        let attrs = &snapshot.result.attributes;
        let text = |key: &str| attrs.get(key).map(display_json);
        let mut out = Vec::new();

        match snapshot.kind {
            MetricKind::Status => {
                if let Some(name) = text("persona_name") {
                    out.push(name);
                }
            }
            MetricKind::Game => {
                if let Some(hours) = text("total_playtime_hours") {
                    out.push(self.dim(&format!("{hours} h played")));
                }
            }
            MetricKind::Playtime => {
                if let (Some(games), Some(shame)) = (text("game_count"), text("pile_of_shame_count")) {
                    out.push(self.dim(&format!("{games} games, {shame} under an hour")));
                }
                out.extend(self.rows(attrs.get("top_5_games"), |g| {
                    format!(
                        "{} {} h {}",
                        field(g, "name"),
                        field(g, "hours"),
                        self.percent(g.get("achievements_percent"))
                    )
                }));
            }
            MetricKind::Profile => {
                if let Some(xp) = text("player_xp") {
                    out.push(self.dim(&format!("{xp} XP")));
                }
            }
            MetricKind::RecentGames => {
                out.extend(self.rows(attrs.get("recent_games"), |g| {
                    format!(
                        "{} {} h (2 weeks)",
                        field(g, "name"),
                        field(g, "playtime_2weeks_hours")
                    )
                }));
            }
            MetricKind::RecentAchievements => {
                out.extend(self.rows(attrs.get("recent_achievements"), |g| {
                    format!(
                        "{} {}/{} {}",
                        field(g, "name"),
                        field(g, "unlocked"),
                        field(g, "total"),
                        self.percent(g.get("percent"))
                    )
                }));
            }
            MetricKind::GlobalStats => {
                if let (Some(possible), Some(avg)) =
                    (text("achievements_possible"), text("avg_completion_rate"))
                {
                    out.push(self.dim(&format!("of {possible} possible, {avg}% average")));
                }
                if let Some(perfect) = text("perfect_games") {
                    out.push(self.dim(&format!("{perfect} perfect games")));
                }
            }
            MetricKind::Friends => {
                out.extend(self.rows(attrs.get("friends"), |f| {
                    let name = f
                        .get("display_name")
                        .filter(|v| !v.is_null())
                        .or_else(|| f.get("steam_id"))
                        .map(display_json)
                        .unwrap_or_default();
                    match f.get("current_game").filter(|v| !v.is_null()) {
                        Some(game) => format!("{name} {}", self.green(&display_json(game))),
                        None => format!("{name} {}", self.dim(&field(f, "status"))),
                    }
                }));
            }
        }
        out
    }

    fn rows(&self, list: Option<&Value>, row: impl Fn(&Value) -> String) -> Vec<String> {
        let Some(items) = list.and_then(Value::as_array) else {
            return Vec::new();
        };
        let mut out: Vec<String> = items
            .iter()
            .take(MAX_LIST_ROWS)
            .map(|item| format!("• {}", row(item)))
            .collect();
        if items.len() > MAX_LIST_ROWS {
            out.push(self.dim(&format!("… {} more", items.len() - MAX_LIST_ROWS)));
        }
        out
    }

    fn percent(&self, value: Option<&Value>) -> String {
        match value.and_then(Value::as_f64) {
            Some(p) if p >= 100.0 => self.green(&format!("{p:.1}%")),
            Some(p) => format!("{p:.1}%"),
            None => self.dim("n/a"),
        }
    }

    // ========================================================================
    // Catalogue & Checks
    // ========================================================================

    /// Header for the metric catalogue.
    pub fn format_metrics_header(&self) -> String {
        format!(
            "{:<22} {:<22} {:>9} {}",
            self.bold("Metric"),
            self.bold("Suffix"),
            self.bold("Interval"),
            self.bold("Unique id")
        )
    }

    /// One catalogue row.
    pub fn format_metric_line(
        &self,
        desc: &MetricDescriptor,
        interval: Duration,
        enabled: bool,
        tracker: Option<&TrackerConfig>,
    ) -> String {
        let id = if enabled {
            desc.id().to_string()
        } else {
            self.dim(&format!("{} (off)", desc.id()))
        };
        let unique = tracker.map_or_else(|| self.dim("−"), |t| desc.unique_id(&t.account_id));
        format!(
            "{:<22} {:<22} {:>9} {}",
            id,
            desc.kind.display_suffix(),
            format_interval(interval),
            unique
        )
    }

    /// Result of a credential check.
    pub fn format_check(&self, tracker: &TrackerConfig, persona: Option<&str>, error: Option<&str>) -> String {
        match error {
            None => format!(
                "{:<22} {} {}",
                tracker.name,
                self.green("✓"),
                persona.unwrap_or_default()
            ),
            Some(e) => format!("{:<22} {} {}", tracker.name, self.red("✗"), e),
        }
    }

    /// Footer for watch mode.
    pub fn format_updated(&self, at: DateTime<Utc>) -> String {
        self.dim(&format!(
            "Updated {}",
            at.with_timezone(&Local).format("%H:%M:%S")
        ))
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(context), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn unit_for(kind: MetricKind) -> Option<&'static str> {
    steamtrack_metrics::MetricRegistry::get(kind).and_then(|d| d.unit)
}

fn display_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "−".to_string(),
        other => other.to_string(),
    }
}

fn field(value: &Value, key: &str) -> String {
    value.get(key).map(display_json).unwrap_or_default()
}

/// `90s`, `5m`, `3h`, or `1h30m`.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (h, 0, 0) => format!("{h}h"),
        (h, m, 0) => format!("{h}h{m}m"),
        _ => format!("{secs}s"),
    }
}
