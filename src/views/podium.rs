//! Leaderboard rendering shared by every ranking page.
//!
//! The server already sorts entries. The first three fill the podium and
//! the rest become a numbered list starting at 4. Podium slots without an
//! entry keep the placeholder.


use crate::models::{CountEntry, PercentEntry};
use crate::utils::{format_number, format_percent};

/// Placeholder for an empty podium name.
pub const PLACEHOLDER: &str = "---";

/// A ranked participant.
pub trait Ranked {
    fn name(&self) -> &str;
    fn value(&self) -> f64;
}

impl Ranked for CountEntry {
    fn name(&self) -> &str {
        &self.name
    }
    fn value(&self) -> f64 {
        self.total
    }
}

impl Ranked for PercentEntry {
    fn name(&self) -> &str {
        &self.name
    }
    fn value(&self) -> f64 {
        self.percentage
    }
}

/// How a board's metric is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Integer counts, e.g. `120 Questões` on the podium and
    /// `120 questões` in the list
    Count {
        podium_unit: &'static str,
        list_unit: &'static str,
    },
    /// Two-decimal percentages
    Percentage,
}

/// Display parameters of one leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStyle {
    pub metric: Metric,
    /// Single list item shown when there are no entries
    pub empty_message: &'static str,
}

impl BoardStyle {
    pub const fn count(
        podium_unit: &'static str,
        list_unit: &'static str,
        empty_message: &'static str,
    ) -> Self {
        Self {
            metric: Metric::Count {
                podium_unit,
                list_unit,
            },
            empty_message,
        }
    }

    pub const fn percentage(empty_message: &'static str) -> Self {
        Self {
            metric: Metric::Percentage,
            empty_message,
        }
    }

    fn placeholder_score(&self) -> String {
        match self.metric {
            Metric::Count { podium_unit, .. } => format!("{PLACEHOLDER} {podium_unit}"),
            Metric::Percentage => format!("{PLACEHOLDER} %"),
        }
    }

    fn podium_score(&self, value: f64) -> String {
        match self.metric {
            Metric::Count { podium_unit, .. } => {
                format!("{} {podium_unit}", format_number(value.round()))
            }
            Metric::Percentage => format_percent(value),
        }
    }

    fn list_line(&self, rank: usize, name: &str, value: f64) -> String {
        let score = match self.metric {
            Metric::Count { list_unit, .. } => {
                format!("{} {list_unit}", format_number(value.round()))
            }
            Metric::Percentage => format_percent(value),
        };
        format!("{rank}. {name} - {score}")
    }
}

/// One podium position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodiumSlot {
    pub name: String,
    pub score: String,
}

/// Rendered leaderboard: three podium slots plus the overflow list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub podium: [PodiumSlot; 3],
    pub rest: Vec<String>,
}

impl Leaderboard {
    /// Empty podium and an empty list.
    pub fn placeholder(style: &BoardStyle) -> Self {
        let slot = PodiumSlot {
            name: PLACEHOLDER.to_string(),
            score: style.placeholder_score(),
        };
        Self {
            podium: [slot.clone(), slot.clone(), slot],
            rest: Vec::new(),
        }
    }

    /// Build from server-ordered entries.
    pub fn build<E: Ranked>(entries: &[E], style: &BoardStyle) -> Self {
        let mut board = Self::placeholder(style);
        if entries.is_empty() {
            board.rest.push(style.empty_message.to_string());
            return board;
        }

        for (slot, entry) in board.podium.iter_mut().zip(entries) {
            slot.name = entry.name().to_string();
            slot.score = style.podium_score(entry.value());
        }
        board.rest = entries
            .iter()
            .enumerate()
            .skip(3)
            .map(|(index, entry)| style.list_line(index + 1, entry.name(), entry.value()))
            .collect();
        board
    }

    /// Placeholders plus a single failure line.
    pub fn failed(style: &BoardStyle, message: &str) -> Self {
        let mut board = Self::placeholder(style);
        board.rest.push(message.to_string());
        board
    }

    /// Plain-text rendering.
    pub fn render(&self, heading: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {heading} ==\n"));
        for (medal, slot) in ["🥇", "🥈", "🥉"].iter().zip(&self.podium) {
            out.push_str(&format!("{medal} {} ({})\n", slot.name, slot.score));
        }
        for line in &self.rest {
            out.push_str(&format!("   {line}\n"));
        }
        out
    }
}
