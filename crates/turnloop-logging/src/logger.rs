use colored::Colorize;
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;

use turnloop_core::{LoopEvent, LoopObserver, StateIdentity};

use crate::SessionFile;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors and visual structure
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for loop events - handles both console output and session files
pub struct Logger {
    format: LogFormat,
    session: Option<SessionFile>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            session: None,
        }
    }

    /// Create a logger that also writes a session file for `identity` in `dir`
    pub fn with_session(
        format: LogFormat,
        dir: &Path,
        identity: &StateIdentity,
    ) -> io::Result<Self> {
        Ok(Self {
            format,
            session: Some(SessionFile::create(dir, identity)?),
        })
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn session_path(&self) -> Option<&Path> {
        self.session.as_ref().map(SessionFile::path)
    }

    pub fn log(&self, event: &LoopEvent) {
        // Session file is always JSON
        if let Some(ref session) = self.session {
            session.write_event(event);
        }

        let mut stderr = io::stderr();
        let rendered = match self.format {
            LogFormat::Json => serde_json::to_string(event).ok(),
            LogFormat::Pretty => Some(Self::render_pretty(event)),
            LogFormat::Compact => Self::render_compact(event),
        };
        if let Some(text) = rendered {
            let _ = writeln!(stderr, "{}", text);
        }
    }

    fn render_pretty(event: &LoopEvent) -> String {
        match event {
            LoopEvent::LoopStarted { identity } => {
                let border = "─".repeat(69);
                format!(
                    "\n{}\n{}  {}\n{}  {} {}\n{}\n",
                    format!("╭{}╮", border).bright_blue(),
                    "│".bright_blue(),
                    "turnloop".bold().bright_white(),
                    "│".bright_blue(),
                    "Identity:".dimmed(),
                    Self::truncate(&identity.to_string_lossy(), 56).dimmed(),
                    format!("╰{}╯", border).bright_blue(),
                )
            }
            LoopEvent::TurnStarted { turn } => {
                let turn_text = format!("─ Turn {} ", turn);
                let padding = "─".repeat(67usize.saturating_sub(turn_text.chars().count()));
                format!(
                    "{}{}{}",
                    "┌".bright_blue(),
                    turn_text.bright_blue().bold(),
                    padding.bright_blue()
                )
            }
            LoopEvent::StateRetrieved { state_len, .. } => {
                format!("  {} retrieved {}", "✓".bright_green(), Self::bytes(*state_len))
            }
            LoopEvent::StateDescribed {
                description_len, ..
            } => {
                format!(
                    "  {} described ({} chars)",
                    "✓".bright_green(),
                    description_len
                )
            }
            LoopEvent::ResponseReceived { response_len, .. } => {
                format!(
                    "  {} response ({} chars)",
                    "✓".bright_green(),
                    response_len
                )
            }
            LoopEvent::StateInterpreted {
                state_len,
                continue_loop,
                ..
            } => {
                let decision = if *continue_loop {
                    "→ continue".bright_yellow()
                } else {
                    "■ stop".bright_cyan()
                };
                format!(
                    "  {} interpreted {} {}",
                    "✓".bright_green(),
                    Self::bytes(*state_len),
                    decision
                )
            }
            LoopEvent::StateStored { .. } => {
                format!(
                    "  {} stored\n{}\n",
                    "✓".bright_green(),
                    format!("└{}┘", "─".repeat(69)).bright_blue()
                )
            }
            LoopEvent::LoopStopped {
                turns,
                duration_secs,
            } => {
                format!(
                    "{} Stopped after {} {} ({:.1}s)",
                    "✓".bright_green(),
                    turns,
                    if *turns == 1 { "turn" } else { "turns" },
                    duration_secs
                )
            }
            LoopEvent::LoopFailed {
                turn, stage, error, ..
            } => {
                format!(
                    "\n{} Turn {} failed at {}: {}",
                    "✗".bright_red(),
                    turn,
                    stage,
                    error.bright_red()
                )
            }
        }
    }

    fn render_compact(event: &LoopEvent) -> Option<String> {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LoopEvent::LoopStarted { identity } => format!(
                "[{}] loop:start {}",
                timestamp,
                Self::truncate(&identity.to_string_lossy(), 40)
            ),
            LoopEvent::TurnStarted { turn } => format!("[{}] turn:start:{}", timestamp, turn),
            LoopEvent::StateInterpreted {
                turn,
                continue_loop,
                ..
            } => format!(
                "[{}] turn:interpreted:{} {}",
                timestamp,
                turn,
                if *continue_loop { "continue" } else { "stop" }
            ),
            LoopEvent::StateStored { turn } => format!("[{}] turn:done:{}", timestamp, turn),
            LoopEvent::LoopStopped {
                turns,
                duration_secs,
            } => format!("[{}] loop:done:{} {:.1}s", timestamp, turns, duration_secs),
            LoopEvent::LoopFailed {
                turn, stage, error, ..
            } => format!("[{}] error:{}:{}:{}", timestamp, turn, stage, error),
            // Per-stage progress is too chatty for compact mode
            LoopEvent::StateRetrieved { .. }
            | LoopEvent::StateDescribed { .. }
            | LoopEvent::ResponseReceived { .. } => return None,
        };
        Some(msg)
    }

    fn bytes(len: usize) -> String {
        if len == 1 {
            "(1 byte)".to_string()
        } else {
            format!("({} bytes)", len)
        }
    }

    /// Truncate on a char boundary, marking the cut with "..."
    fn truncate(s: &str, max_chars: usize) -> String {
        if s.chars().count() > max_chars {
            let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", kept)
        } else {
            s.to_string()
        }
    }
}

impl LoopObserver for Logger {
    fn observe(&self, event: &LoopEvent) {
        self.log(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnloop_core::Stage;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(Logger::truncate("short", 10), "short");
        assert_eq!(Logger::truncate("ééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_compact_skips_stage_progress() {
        let event = LoopEvent::StateRetrieved {
            turn: 1,
            state_len: 4,
        };
        assert!(Logger::render_compact(&event).is_none());

        let failed = LoopEvent::LoopFailed {
            turn: 2,
            stage: Stage::Store,
            error: "disk full".into(),
            duration_secs: 0.1,
        };
        let line = Logger::render_compact(&failed).unwrap();
        assert!(line.ends_with("error:2:store:disk full"));
    }

    #[test]
    fn test_pretty_failure_names_stage() {
        colored::control::set_override(false);
        let failed = LoopEvent::LoopFailed {
            turn: 3,
            stage: Stage::Prompt,
            error: "stdin closed".into(),
            duration_secs: 0.1,
        };
        let line = Logger::render_pretty(&failed);
        assert!(line.contains("Turn 3 failed at prompt: stdin closed"));
    }

    #[test]
    fn test_new_logger_has_no_session() {
        let logger = Logger::new(LogFormat::Compact);
        assert_eq!(logger.format(), LogFormat::Compact);
        assert!(logger.session_path().is_none());
    }
}
