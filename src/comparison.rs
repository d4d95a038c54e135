//! Comparison Engine for Transport Mode Evaluation
//!
//! Derives CO₂, travel time and cost for every transport mode over a distance,
//! picks the best mode balancing emissions against travel time, and classifies
//! the traveller's chosen mode against the best and worst options.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::models::{ModeRegistry, ModeResult};
use crate::{CalculatorError, Result};

/// Carbon price in currency units per kg CO₂ (25 per metric ton)
pub const DEFAULT_CARBON_PRICE_PER_KG: f64 = 0.025;

/// kg CO₂ one tree absorbs per year
pub const DEFAULT_TREE_ABSORPTION_KG: f64 = 21.77;

/// Thresholds deciding when the lowest-emission mode is too slow to recommend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PracticalBestHeuristic {
    /// Lowest-emission time must exceed `avg_time * slow_factor`
    pub slow_factor: f64,
    /// ...and exceed this many hours
    pub min_slow_hours: f64,
    /// Practical candidates must take less than `avg_time * practical_factor`
    pub practical_factor: f64,
}

impl Default for PracticalBestHeuristic {
    fn default() -> Self {
        Self {
            slow_factor: 2.0,
            min_slow_hours: 10.0,
            practical_factor: 1.5,
        }
    }
}

/// Tunables for [`ComparisonEngine`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparisonSettings {
    pub heuristic: PracticalBestHeuristic,
    pub carbon_price_per_kg: f64,
    pub tree_absorption_kg: f64,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            heuristic: PracticalBestHeuristic::default(),
            carbon_price_per_kg: DEFAULT_CARBON_PRICE_PER_KG,
            tree_absorption_kg: DEFAULT_TREE_ABSORPTION_KG,
        }
    }
}

/// How the selected mode relates to the rest of the cohort
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChoiceCategory {
    /// The selected mode is the recommended best mode
    Perfect,
    /// Lowest emissions but not the recommendation
    LowestEmission {
        /// Journey takes more than `slow_factor` times the average time
        long_journey: bool,
    },
    /// Highest emissions of all modes
    Worst,
    /// Somewhere in between
    Tradeoff,
}

/// Carbon cost of the selected, best and worst modes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CarbonCosts {
    pub selected: f64,
    pub best: f64,
    pub worst: f64,
}

/// Differences between the selected and the best mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImpactDeltas {
    /// Selected CO₂ minus best CO₂ (kg)
    pub excess_co2: f64,
    /// Selected carbon cost minus best carbon cost
    pub carbon_savings: f64,
    /// How much more CO₂ the selection emits, in percent. `None` when the
    /// best mode emits nothing.
    pub percent_more: Option<f64>,
    /// Absolute travel time difference (hours)
    pub time_difference: f64,
    pub faster_than_best: bool,
}

/// Outcome of [`ComparisonEngine::classify`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub selected: ModeResult,
    pub best: ModeResult,
    pub lowest_emission: ModeResult,
    pub worst: ModeResult,
    pub category: ChoiceCategory,
    /// Best mode was picked by the practical-best override
    pub practical_override: bool,
    /// Mean travel time across all modes (hours)
    pub avg_time: f64,
    pub carbon_costs: CarbonCosts,
    pub deltas: ImpactDeltas,
    /// Trees needed to absorb the selected mode's CO₂ over one year
    pub trees_needed: f64,
}

/// Stateless evaluator for transport mode comparisons
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine {
    settings: ComparisonSettings,
}

impl ComparisonEngine {
    #[must_use]
    pub fn new(settings: ComparisonSettings) -> Self {
        Self { settings }
    }

    /// Compute metrics for every mode, in registry order
    #[instrument(level = "debug", skip(self, modes), fields(modes = modes.len()))]
    pub fn compute_all_modes(&self, distance_km: f64, modes: &ModeRegistry) -> Result<Vec<ModeResult>> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CalculatorError::validation(format!(
                "Distance must be a non-negative number of kilometers, got {distance_km}"
            )));
        }
        if modes.is_empty() {
            return Err(CalculatorError::configuration(
                "Cannot compare an empty set of transport modes",
            ));
        }

        modes
            .iter()
            .map(|mode| {
                if mode.speed.is_nan() || mode.speed <= 0.0 {
                    return Err(CalculatorError::configuration(format!(
                        "Transport mode '{}' must have a positive speed, got {}",
                        mode.key, mode.speed
                    )));
                }
                let result = ModeResult::compute(mode, distance_km);
                debug!(
                    mode = %result.key,
                    co2 = result.co2,
                    time = result.time,
                    cost = result.cost,
                    "computed mode result"
                );
                Ok(result)
            })
            .collect()
    }

    /// Classify the selected mode against all results
    #[instrument(level = "debug", skip(self, results), fields(results = results.len()))]
    pub fn classify(&self, selected_key: &str, results: &[ModeResult]) -> Result<Classification> {
        if results.is_empty() {
            return Err(CalculatorError::configuration(
                "Cannot classify against an empty set of mode results",
            ));
        }
        let selected = results
            .iter()
            .find(|r| r.key == selected_key)
            .ok_or_else(|| {
                CalculatorError::lookup(format!(
                    "Selected transport mode '{selected_key}' is not among the computed results"
                ))
            })?;

        let lowest_emission = first_by(results, |candidate, current| candidate.co2 < current.co2);
        let worst = first_by(results, |candidate, current| candidate.co2 > current.co2);
        let avg_time = results.iter().map(|r| r.time).sum::<f64>() / results.len() as f64;

        let best = self.best_mode(lowest_emission, results, avg_time);
        let practical_override = best.key != lowest_emission.key;
        if practical_override {
            debug!(
                lowest = %lowest_emission.key,
                best = %best.key,
                avg_time,
                "lowest-emission mode too slow, using practical best"
            );
        }

        let category = if selected.co2 == best.co2 && selected.key == best.key {
            ChoiceCategory::Perfect
        } else if selected.co2 == lowest_emission.co2 {
            ChoiceCategory::LowestEmission {
                long_journey: selected.time > avg_time * self.settings.heuristic.slow_factor,
            }
        } else if selected.co2 == worst.co2 {
            ChoiceCategory::Worst
        } else {
            ChoiceCategory::Tradeoff
        };

        let price = self.settings.carbon_price_per_kg;
        let carbon_costs = CarbonCosts {
            selected: selected.co2 * price,
            best: best.co2 * price,
            worst: worst.co2 * price,
        };

        let deltas = ImpactDeltas {
            excess_co2: selected.co2 - best.co2,
            carbon_savings: carbon_costs.selected - carbon_costs.best,
            percent_more: (best.co2 > 0.0).then(|| (selected.co2 / best.co2 - 1.0) * 100.0),
            time_difference: (selected.time - best.time).abs(),
            faster_than_best: selected.time < best.time,
        };

        let trees_needed = selected.co2 / self.settings.tree_absorption_kg;

        debug!(selected = %selected.key, ?category, trees_needed, "classified selection");

        Ok(Classification {
            selected: selected.clone(),
            best: best.clone(),
            lowest_emission: lowest_emission.clone(),
            worst: worst.clone(),
            category,
            practical_override,
            avg_time,
            carbon_costs,
            deltas,
            trees_needed,
        })
    }

    /// Lowest-emission mode, unless it is disproportionately slow; then the
    /// lowest-emission mode among those close enough to the average time.
    fn best_mode<'a>(
        &self,
        lowest_emission: &'a ModeResult,
        results: &'a [ModeResult],
        avg_time: f64,
    ) -> &'a ModeResult {
        let heuristic = &self.settings.heuristic;
        let too_slow = lowest_emission.time > avg_time * heuristic.slow_factor
            && lowest_emission.time > heuristic.min_slow_hours;
        if !too_slow {
            return lowest_emission;
        }

        let mut by_emission: Vec<&ModeResult> = results.iter().collect();
        by_emission.sort_by(|a, b| a.co2.total_cmp(&b.co2));
        by_emission
            .into_iter()
            .find(|r| r.time < avg_time * heuristic.practical_factor)
            .unwrap_or(lowest_emission)
    }
}

/// First element that no later element replaces; `replaces` must be strict so
/// ties keep the earliest entry.
fn first_by(results: &[ModeResult], replaces: impl Fn(&ModeResult, &ModeResult) -> bool) -> &ModeResult {
    let mut chosen = &results[0];
    for candidate in &results[1..] {
        if replaces(candidate, chosen) {
            chosen = candidate;
        }
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;
    use rstest::{fixture, rstest};

    fn mode(key: &str, emission: f64, speed: f64, cost: f64) -> TransportMode {
        TransportMode {
            key: key.to_string(),
            name: key.to_string(),
            icon: "*".to_string(),
            emission,
            speed,
            cost,
        }
    }

    fn result(key: &str, co2: f64, time: f64) -> ModeResult {
        ModeResult {
            key: key.to_string(),
            co2,
            time,
            cost: 0.0,
        }
    }

    #[fixture]
    fn scenario_registry() -> ModeRegistry {
        ModeRegistry::new(vec![
            mode("plane", 0.15, 800.0, 0.10),
            mode("train", 0.04, 200.0, 0.05),
            mode("car", 0.12, 100.0, 0.08),
        ])
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[rstest]
    fn test_compute_all_modes_scenario(scenario_registry: ModeRegistry) {
        let engine = ComparisonEngine::default();
        let results = engine.compute_all_modes(5000.0, &scenario_registry).unwrap();

        let keys: Vec<&str> = results.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["plane", "train", "car"]);

        assert!(approx(results[0].co2, 750.0));
        assert!(approx(results[0].time, 6.25));
        assert!(approx(results[0].cost, 500.0));
        assert!(approx(results[1].co2, 200.0));
        assert!(approx(results[1].time, 25.0));
        assert!(approx(results[1].cost, 250.0));
        assert!(approx(results[2].co2, 600.0));
        assert!(approx(results[2].time, 50.0));
        assert!(approx(results[2].cost, 400.0));
    }

    #[test]
    fn test_compute_all_modes_empty_registry() {
        let engine = ComparisonEngine::default();
        let err = engine
            .compute_all_modes(100.0, &ModeRegistry::new(vec![]))
            .unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    fn test_compute_all_modes_rejects_bad_speed(#[case] speed: f64) {
        let engine = ComparisonEngine::default();
        let registry = ModeRegistry::new(vec![mode("car", 0.1, 80.0, 0.1), mode("broken", 0.1, speed, 0.1)]);
        let err = engine.compute_all_modes(100.0, &registry).unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::INFINITY)]
    fn test_compute_all_modes_rejects_bad_distance(#[case] distance: f64, scenario_registry: ModeRegistry) {
        let engine = ComparisonEngine::default();
        let err = engine.compute_all_modes(distance, &scenario_registry).unwrap_err();
        assert!(matches!(err, CalculatorError::Validation { .. }));
    }

    #[rstest]
    fn test_zero_distance_gives_zero_metrics(scenario_registry: ModeRegistry) {
        let engine = ComparisonEngine::default();
        let results = engine.compute_all_modes(0.0, &scenario_registry).unwrap();
        assert!(results.iter().all(|r| r.co2 == 0.0 && r.time == 0.0 && r.cost == 0.0));
    }

    #[rstest]
    fn test_scenario_best_stays_train(scenario_registry: ModeRegistry) {
        let engine = ComparisonEngine::default();
        let results = engine.compute_all_modes(5000.0, &scenario_registry).unwrap();
        let classification = engine.classify("plane", &results).unwrap();

        assert_eq!(classification.best.key, "train");
        assert_eq!(classification.lowest_emission.key, "train");
        assert_eq!(classification.worst.key, "plane");
        assert!(!classification.practical_override);
        assert!(approx(classification.avg_time, (6.25 + 25.0 + 50.0) / 3.0));
        assert_eq!(classification.category, ChoiceCategory::Worst);
        assert!((classification.trees_needed - 34.45).abs() < 0.01);
        assert!(approx(classification.carbon_costs.selected, 18.75));
        assert!(approx(classification.carbon_costs.best, 5.0));
        assert!(approx(classification.carbon_costs.worst, 18.75));
        assert!(approx(classification.deltas.excess_co2, 550.0));
        assert!(approx(classification.deltas.carbon_savings, 13.75));
    }

    #[rstest]
    #[case("train", ChoiceCategory::Perfect)]
    #[case("plane", ChoiceCategory::Worst)]
    #[case("car", ChoiceCategory::Tradeoff)]
    fn test_scenario_categories(
        #[case] selected: &str,
        #[case] expected: ChoiceCategory,
        scenario_registry: ModeRegistry,
    ) {
        let engine = ComparisonEngine::default();
        let results = engine.compute_all_modes(5000.0, &scenario_registry).unwrap();
        assert_eq!(engine.classify(selected, &results).unwrap().category, expected);
    }

    #[rstest]
    fn test_tradeoff_deltas(scenario_registry: ModeRegistry) {
        let engine = ComparisonEngine::default();
        let results = engine.compute_all_modes(5000.0, &scenario_registry).unwrap();
        let deltas = engine.classify("car", &results).unwrap().deltas;

        assert!(approx(deltas.excess_co2, 400.0));
        assert!(approx(deltas.percent_more.unwrap(), 200.0));
        assert!(approx(deltas.time_difference, 25.0));
        assert!(!deltas.faster_than_best);
    }

    fn slow_clean_results() -> Vec<ModeResult> {
        // bicycle is cleanest but far slower than average
        vec![
            result("bicycle", 0.0, 66.0),
            result("car", 170.0, 11.0),
            result("plane", 250.0, 1.25),
        ]
    }

    #[test]
    fn test_practical_best_override() {
        let engine = ComparisonEngine::default();
        let classification = engine.classify("car", &slow_clean_results()).unwrap();

        assert_eq!(classification.lowest_emission.key, "bicycle");
        assert_eq!(classification.best.key, "car");
        assert!(classification.practical_override);
        assert_eq!(classification.category, ChoiceCategory::Perfect);
    }

    #[test]
    fn test_lowest_emission_long_journey() {
        let engine = ComparisonEngine::default();
        let classification = engine.classify("bicycle", &slow_clean_results()).unwrap();

        assert_eq!(
            classification.category,
            ChoiceCategory::LowestEmission { long_journey: true }
        );
        assert_eq!(classification.deltas.percent_more, Some(-100.0));
    }

    #[test]
    fn test_percent_more_undefined_when_best_is_zero_emission() {
        let engine = ComparisonEngine::default();
        let results = vec![result("walk", 0.0, 2.0), result("car", 10.0, 0.5), result("taxi", 12.0, 0.5)];
        let classification = engine.classify("car", &results).unwrap();

        assert_eq!(classification.best.key, "walk");
        assert_eq!(classification.category, ChoiceCategory::Tradeoff);
        assert_eq!(classification.deltas.percent_more, None);
        assert!(classification.deltas.faster_than_best);
    }

    #[test]
    fn test_override_needs_minimum_hours() {
        let engine = ComparisonEngine::default();
        // cleanest is 7x the others but still under 10 hours
        let results = vec![result("walk", 0.0, 7.0), result("car", 10.0, 0.5), result("bus", 5.0, 0.5)];
        let classification = engine.classify("walk", &results).unwrap();

        assert_eq!(classification.best.key, "walk");
        assert!(!classification.practical_override);
        assert_eq!(classification.category, ChoiceCategory::Perfect);
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let engine = ComparisonEngine::default();
        let results = vec![
            result("bicycle", 0.0, 4.0),
            result("walk", 0.0, 12.0),
            result("car", 9.0, 1.0),
            result("suv", 9.0, 1.0),
        ];
        let classification = engine.classify("walk", &results).unwrap();

        assert_eq!(classification.lowest_emission.key, "bicycle");
        assert_eq!(classification.worst.key, "car");
        assert_eq!(
            classification.category,
            ChoiceCategory::LowestEmission { long_journey: true }
        );

        let classification = engine.classify("suv", &results).unwrap();
        assert_eq!(classification.category, ChoiceCategory::Worst);
    }

    #[test]
    fn test_lowest_emission_short_journey() {
        let engine = ComparisonEngine::default();
        let results = vec![
            result("bicycle", 0.0, 4.0),
            result("walk", 0.0, 5.0),
            result("car", 9.0, 1.0),
            result("suv", 9.0, 1.0),
        ];
        let classification = engine.classify("walk", &results).unwrap();

        // average 2.75 h, so 5 h is under the 5.5 h slow threshold
        assert_eq!(classification.best.key, "bicycle");
        assert!(!classification.practical_override);
        assert_eq!(
            classification.category,
            ChoiceCategory::LowestEmission { long_journey: false }
        );
    }

    #[test]
    fn test_single_mode_is_perfect() {
        let engine = ComparisonEngine::default();
        let classification = engine.classify("car", &[result("car", 10.0, 1.0)]).unwrap();
        assert_eq!(classification.category, ChoiceCategory::Perfect);
        assert_eq!(classification.best, classification.worst);
    }

    #[test]
    fn test_category_serializes_flat() {
        let value = serde_json::to_value(ChoiceCategory::LowestEmission { long_journey: true }).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "kind": "lowest_emission", "long_journey": true })
        );
        assert_eq!(
            serde_json::to_value(ChoiceCategory::Worst).unwrap(),
            serde_json::json!({ "kind": "worst" })
        );
    }

    #[test]
    fn test_classify_empty_results() {
        let engine = ComparisonEngine::default();
        let err = engine.classify("car", &[]).unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration { .. }));
    }

    #[test]
    fn test_classify_unknown_key() {
        let engine = ComparisonEngine::default();
        let err = engine.classify("boat", &slow_clean_results()).unwrap_err();
        assert!(matches!(err, CalculatorError::Lookup { .. }));
    }

    #[test]
    fn test_classify_is_deterministic_and_pure() {
        let engine = ComparisonEngine::default();
        let results = slow_clean_results();
        let snapshot = results.clone();

        let first = engine.classify("plane", &results).unwrap();
        let second = engine.classify("plane", &results).unwrap();

        assert_eq!(first, second);
        assert_eq!(results, snapshot);
    }

    #[test]
    fn test_custom_settings() {
        let engine = ComparisonEngine::new(ComparisonSettings {
            heuristic: PracticalBestHeuristic {
                slow_factor: 10.0,
                ..PracticalBestHeuristic::default()
            },
            carbon_price_per_kg: 0.1,
            tree_absorption_kg: 10.0,
        });
        let classification = engine.classify("plane", &slow_clean_results()).unwrap();

        assert_eq!(classification.best.key, "bicycle");
        assert!(approx(classification.carbon_costs.selected, 25.0));
        assert!(approx(classification.trees_needed, 25.0));
    }
}
