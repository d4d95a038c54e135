//! Text rendering of comparison results
//!
//! Turns a [`Classification`] and the per-mode results into the messages and
//! comparison cards shown to the traveller.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::comparison::{ChoiceCategory, Classification};
use crate::models::{ModeRegistry, ModeResult};

const BAR_WIDTH: usize = 20;

/// Format travel time, minutes below one hour
#[must_use]
pub fn format_time(hours: f64) -> String {
    if hours < 1.0 {
        format!("{} min", (hours * 60.0).round())
    } else {
        format!("{hours:.1} hours")
    }
}

#[must_use]
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.2}")
}

#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    format!("{} km", distance_km.round())
}

#[must_use]
pub fn format_co2(co2: f64) -> String {
    format!("{co2:.2} kg")
}

/// Share of `max_value` in percent, clamped to 100
#[must_use]
pub fn percentage(value: f64, max_value: f64) -> f64 {
    if max_value == 0.0 {
        return if value == 0.0 { 0.0 } else { 100.0 };
    }
    (value / max_value * 100.0).min(100.0)
}

/// Metric used to order the comparison cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Emission,
    Time,
    Cost,
}

/// Stable ascending sort by the chosen metric
#[must_use]
pub fn sort_results(results: &[ModeResult], key: SortKey) -> Vec<ModeResult> {
    let mut sorted = results.to_vec();
    match key {
        SortKey::Emission => sorted.sort_by(|a, b| a.co2.total_cmp(&b.co2)),
        SortKey::Time => sorted.sort_by(|a, b| a.time.total_cmp(&b.time)),
        SortKey::Cost => sorted.sort_by(|a, b| a.cost.total_cmp(&b.cost)),
    }
    sorted
}

/// Explanation of the traveller's choice
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImpactMessages {
    pub impact: String,
    pub carbon_cost: String,
}

fn mode_name<'a>(registry: &'a ModeRegistry, key: &'a str) -> &'a str {
    registry.get(key).map_or(key, |m| m.name.as_str())
}

/// Build the impact and carbon-cost messages for a classification
#[must_use]
pub fn impact_messages(classification: &Classification, registry: &ModeRegistry) -> ImpactMessages {
    let Classification {
        selected,
        best,
        carbon_costs,
        deltas,
        ..
    } = classification;
    let best_name = mode_name(registry, &best.key);
    let best_lower = best_name.to_lowercase();

    let (mut impact, carbon_cost) = match classification.category {
        ChoiceCategory::Perfect => (
            format!(
                "✅ Perfect choice! You've selected the best option for environmental impact with {:.2} kg CO₂ emissions and {:.1} hours travel time.",
                selected.co2, selected.time
            ),
            format!(
                "Your carbon cost: ${:.2}. You're making the most environmentally responsible choice!",
                carbon_costs.selected
            ),
        ),
        ChoiceCategory::LowestEmission { long_journey } => {
            let impact = if long_journey {
                let mut msg = format!(
                    "✅ You've chosen the lowest emission option ({:.2} kg CO₂), but this journey takes {:.1} hours.",
                    selected.co2, selected.time
                );
                if best.key != selected.key {
                    msg.push_str(&format!(
                        " Consider {best_name} ({:.2} kg CO₂, {:.1} hours) for a better balance of time and emissions.",
                        best.co2, best.time
                    ));
                }
                msg
            } else {
                "✅ Excellent choice! You've selected the most eco-friendly option with the lowest CO₂ emissions and reasonable travel time.".to_string()
            };
            (
                impact,
                format!(
                    "Your carbon footprint costs ${:.2} (carbon price). You're minimizing environmental impact!",
                    carbon_costs.selected
                ),
            )
        }
        ChoiceCategory::Worst => (
            format!(
                "⚠️ This is the highest emission option ({:.2} kg CO₂). Travel time: {:.1} hours. You could reduce {:.2} kg CO₂ by switching to {best_lower} ({:.1} hours).",
                selected.co2, selected.time, deltas.excess_co2, best.time
            ),
            format!(
                "Your carbon cost: ${:.2}. Switching to {best_lower} would save ${:.2} in carbon costs and significantly reduce environmental harm.",
                carbon_costs.selected, deltas.carbon_savings
            ),
        ),
        ChoiceCategory::Tradeoff => {
            let percent = match deltas.percent_more {
                Some(p) => format!("{p:.0}% higher"),
                None => format!("{best_name} emits no CO₂"),
            };
            let pace = if deltas.faster_than_best { "faster" } else { "slower" };
            (
                format!(
                    "Your choice emits {:.2} kg more CO₂ than {best_name} ({percent}). Travel time: {:.1} hours vs {:.1} hours ({:.1} hours {pace}). Consider if the time saved justifies the environmental cost.",
                    deltas.excess_co2, selected.time, best.time, deltas.time_difference
                ),
                format!(
                    "Carbon cost: ${:.2}. Switching to {best_lower} could save ${:.2} in carbon costs with {:.1} hours travel time. Balance speed with environmental responsibility!",
                    carbon_costs.selected, deltas.carbon_savings, best.time
                ),
            )
        }
    };

    let trees = format!("{:.1}", classification.trees_needed);
    let plural = if trees == "1.0" { "" } else { "s" };
    impact.push_str(&format!(
        " This journey requires {trees} tree{plural} to absorb the CO₂ over one year."
    ));

    ImpactMessages {
        impact,
        carbon_cost,
    }
}

/// Card highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    YourChoice,
    Best,
    Worst,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::YourChoice => write!(f, "Your Choice"),
            Badge::Best => write!(f, "Best"),
            Badge::Worst => write!(f, "Worst"),
        }
    }
}

/// One row of the mode comparison
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModeCard {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub co2: f64,
    pub time: f64,
    pub cost: f64,
    pub badge: Option<Badge>,
    /// Emissions relative to the selected mode; `None` for the selection itself
    pub comparison: Option<String>,
    pub co2_percent: f64,
    pub time_percent: f64,
    pub cost_percent: f64,
}

impl ModeCard {
    /// Render the card as a few lines of plain text
    #[must_use]
    pub fn render(&self) -> String {
        let meta_time = format_time(self.time)
            .replace(" hours", "h")
            .replace(" min", "m");
        let badge = self.badge.map(|b| format!("  [{b}]")).unwrap_or_default();
        let comparison = self.comparison.as_deref().unwrap_or("Your selection");

        let mut out = format!(
            "{} {}{badge}\n    {meta_time} • {}\n    {comparison}\n",
            self.icon,
            self.name,
            format_cost(self.cost)
        );
        for (label, percent, value) in [
            ("CO₂ ", self.co2_percent, format_co2(self.co2)),
            ("Time", self.time_percent, meta_time.clone()),
            ("Cost", self.cost_percent, format_cost(self.cost)),
        ] {
            out.push_str(&format!("    {label} {} {value}\n", bar(percent)));
        }
        out
    }
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn comparison_text(result: &ModeResult, selected: &ModeResult) -> Option<String> {
    if result.key == selected.key {
        return None;
    }
    let diff = (result.co2 - selected.co2).abs();
    Some(if result.co2 < selected.co2 {
        format!("{diff:.2} kg less CO₂")
    } else if result.co2 > selected.co2 {
        format!("{diff:.2} kg more CO₂")
    } else {
        "Same emissions".to_string()
    })
}

/// Build comparison cards in `sort` order. The first card is marked best and
/// the last worst, unless it is the selection.
#[must_use]
pub fn mode_cards(
    results: &[ModeResult],
    selected: &ModeResult,
    registry: &ModeRegistry,
    sort: SortKey,
) -> Vec<ModeCard> {
    let max = |f: fn(&ModeResult) -> f64| results.iter().map(f).fold(0.0, f64::max);
    let (max_co2, max_time, max_cost) = (max(|r| r.co2), max(|r| r.time), max(|r| r.cost));

    let sorted = sort_results(results, sort);
    let last = sorted.len().saturating_sub(1);

    sorted
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let mode = registry.get(&result.key);
            let badge = if result.key == selected.key {
                Some(Badge::YourChoice)
            } else if index == 0 {
                Some(Badge::Best)
            } else if index == last {
                Some(Badge::Worst)
            } else {
                None
            };
            ModeCard {
                key: result.key.clone(),
                name: mode.map_or_else(|| result.key.clone(), |m| m.name.clone()),
                icon: mode.map(|m| m.icon.clone()).unwrap_or_default(),
                co2: result.co2,
                time: result.time,
                cost: result.cost,
                badge,
                comparison: comparison_text(result, selected),
                co2_percent: percentage(result.co2, max_co2),
                time_percent: percentage(result.time, max_time),
                cost_percent: percentage(result.cost, max_cost),
            }
        })
        .collect()
}

/// Full result of one query, for machine-readable output
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub sort: SortKey,
    pub classification: Classification,
    pub messages: ImpactMessages,
    pub modes: Vec<ModeCard>,
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = &self.classification.selected;
        writeln!(f, "{} → {}", self.from, self.to)?;
        writeln!(f, "Distance: {}", format_distance(self.distance_km))?;
        writeln!(f)?;
        if let Some(card) = self.modes.iter().find(|c| c.key == selected.key) {
            writeln!(f, "Your choice: {} {}", card.icon, card.name)?;
        }
        writeln!(f, "  CO₂:  {}", format_co2(selected.co2))?;
        writeln!(f, "  Time: {}", format_time(selected.time))?;
        writeln!(f, "  Cost: {}", format_cost(selected.cost))?;
        writeln!(f)?;
        writeln!(f, "{}", self.messages.impact)?;
        writeln!(f, "{}", self.messages.carbon_cost)?;
        writeln!(f)?;
        writeln!(f, "Comparison (by {:?}):", self.sort)?;
        for card in &self.modes {
            write!(f, "{}", card.render())?;
        }
        Ok(())
    }
}
