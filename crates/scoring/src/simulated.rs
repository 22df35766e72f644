use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use viability_types::{Category, CompanyData};

use crate::{UsageSnapshot, Verdict, ViabilityModel};

/// CNAE families treated as promising retail and service activities.
const PROMISING_CNAE_PREFIXES: &[&str] = &[
    "4711", "4712", "4721", "4781", "5611", "5620", "9602",
];

/// Tuning knobs for [`SimulatedModel`].
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Artificial scoring latency.
    pub latency: Duration,
    /// Fixed RNG seed for reproducible draws.
    pub seed: Option<u64>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            seed: None,
        }
    }
}

/// Stand-in scoring engine with weighted random verdicts.
#[derive(Debug, Clone, Default)]
pub struct SimulatedModel {
    settings: ModelSettings,
}

impl SimulatedModel {
    #[must_use]
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ViabilityModel for SimulatedModel {
    async fn analyze(&self, company: &CompanyData, usage: UsageSnapshot) -> Verdict {
        if !self.settings.latency.is_zero() {
            tokio::time::sleep(self.settings.latency).await;
        }

        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let draws = Draws::sample(&mut rng);
        let (category, score) = simulate(company, usage, draws);
        log::debug!(
            "Simulated run: weighted={} category={} score={score:?}",
            weighted_location_score(company),
            category.as_str(),
        );
        Verdict::new(category, company.clone(), usage).with_score(score)
    }
}

/// Uniform draws consumed by one simulated run, in consumption order.
#[derive(Debug, Clone, Copy)]
struct Draws {
    validity: f64,
    acceptance: f64,
    score: f64,
}

impl Draws {
    fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            validity: rng.gen(),
            acceptance: rng.gen(),
            score: rng.gen(),
        }
    }
}

/// One scoring pass over `company`, decided entirely by `draws`.
fn simulate(company: &CompanyData, usage: UsageSnapshot, draws: Draws) -> (Category, Option<u8>) {
    if usage.over_limit() {
        return (Category::ExcessiveUse, None);
    }

    // One run in ten is rejected as unanalyzable regardless of payload.
    if draws.validity < 0.1 {
        return (Category::InadequateUse, None);
    }

    let threshold = acceptance_threshold(weighted_location_score(company));
    if draws.acceptance < threshold {
        (Category::Positive, Some(positive_score(draws.score)))
    } else {
        (Category::Negative, Some(negative_score(draws.score)))
    }
}

/// Weighted 0-6 location profile: declared capital, state and CNAE family.
#[must_use]
pub fn weighted_location_score(company: &CompanyData) -> u8 {
    let mut score = 0u8;

    if company.capital_inicial >= 50_000.0 {
        score += 2;
    } else if company.capital_inicial >= 20_000.0 {
        score += 1;
    }

    match company.uf.trim() {
        "SP" => score += 2,
        "RJ" | "MG" | "RS" => score += 1,
        _ => {}
    }

    if has_promising_cnae(&company.cnae) {
        score += 2;
    }

    score
}

fn has_promising_cnae(cnae: &str) -> bool {
    let digits: String = cnae
        .chars()
        .filter(char::is_ascii_digit)
        .take(4)
        .collect();
    digits.len() == 4 && PROMISING_CNAE_PREFIXES.contains(&digits.as_str())
}

/// Profiles scoring 4 points or more clear the positive draw at 0.6, the
/// rest at 0.4.
const fn acceptance_threshold(weighted: u8) -> f64 {
    if weighted >= 4 {
        0.6
    } else {
        0.4
    }
}

/// Displayed score for a positive verdict, 60-95.
fn positive_score(draw: f64) -> u8 {
    60 + (draw * 36.0) as u8
}

/// Displayed score for a negative verdict, 25-59. The 50-59 tail re-reads
/// as moderate wherever a stored score is mapped back to a category.
fn negative_score(draw: f64) -> u8 {
    25 + (draw * 35.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn company(capital: f64, uf: &str, cnae: &str) -> CompanyData {
        CompanyData {
            uf: uf.to_string(),
            cnae: cnae.to_string(),
            capital_inicial: capital,
            ..CompanyData::default()
        }
    }

    fn draws(validity: f64, acceptance: f64, score: f64) -> Draws {
        Draws {
            validity,
            acceptance,
            score,
        }
    }

    #[test]
    fn capital_tiers() {
        assert_eq!(weighted_location_score(&company(55_000.0, "", "")), 2);
        assert_eq!(weighted_location_score(&company(20_000.0, "", "")), 1);
        assert_eq!(weighted_location_score(&company(10_000.0, "", "")), 0);
    }

    #[test]
    fn state_weights() {
        assert_eq!(weighted_location_score(&company(0.0, "SP", "")), 2);
        assert_eq!(weighted_location_score(&company(0.0, "RJ", "")), 1);
        assert_eq!(weighted_location_score(&company(0.0, "MG", "")), 1);
        assert_eq!(weighted_location_score(&company(0.0, "RS", "")), 1);
        assert_eq!(weighted_location_score(&company(0.0, "PR", "")), 0);
    }

    #[test]
    fn promising_cnae_weights() {
        assert_eq!(weighted_location_score(&company(0.0, "", "4781-4/00")), 2);
        assert_eq!(weighted_location_score(&company(0.0, "", "5611-2/01")), 2);
        assert_eq!(weighted_location_score(&company(0.0, "", "1234-5/00")), 0);
        assert_eq!(weighted_location_score(&company(0.0, "", "")), 0);
    }

    #[test]
    fn strong_profile_scores_six() {
        assert_eq!(
            weighted_location_score(&company(60_000.0, "SP", "4781-4/00")),
            6
        );
    }

    #[test]
    fn thresholds_follow_the_weighted_score() {
        assert_eq!(acceptance_threshold(6), 0.6);
        assert_eq!(acceptance_threshold(4), 0.6);
        assert_eq!(acceptance_threshold(3), 0.4);
        assert_eq!(acceptance_threshold(0), 0.4);
    }

    #[test]
    fn over_limit_run_is_refused() {
        let (category, score) = simulate(
            &company(60_000.0, "SP", "4781-4/00"),
            UsageSnapshot::new(3, 2),
            draws(0.9, 0.0, 0.0),
        );
        assert_eq!(category, Category::ExcessiveUse);
        assert_eq!(score, None);
    }

    #[test]
    fn at_limit_run_still_executes() {
        let (category, _) = simulate(
            &company(60_000.0, "SP", "4781-4/00"),
            UsageSnapshot::new(2, 2),
            draws(0.9, 0.1, 0.5),
        );
        assert_eq!(category, Category::Positive);
    }

    #[test]
    fn low_validity_draw_is_inadequate() {
        let (category, score) = simulate(
            &company(60_000.0, "SP", "4781-4/00"),
            UsageSnapshot::new(1, 2),
            draws(0.05, 0.0, 0.0),
        );
        assert_eq!(category, Category::InadequateUse);
        assert_eq!(score, None);
    }

    #[test]
    fn same_acceptance_draw_flips_with_profile_strength() {
        // 0.5 clears the strong threshold (0.6) but not the weak one (0.4).
        let strong = simulate(
            &company(60_000.0, "SP", "4781-4/00"),
            UsageSnapshot::new(1, 2),
            draws(0.9, 0.5, 0.5),
        );
        let weak = simulate(
            &company(5_000.0, "AM", "1234-5/00"),
            UsageSnapshot::new(1, 2),
            draws(0.9, 0.5, 0.5),
        );
        assert_eq!(strong.0, Category::Positive);
        assert_eq!(weak.0, Category::Negative);
    }

    #[test]
    fn positive_scores_stay_in_band() {
        for draw in [0.0, 0.25, 0.5, 0.75, 0.999] {
            let score = positive_score(draw);
            assert!((60..=95).contains(&score), "draw {draw} gave {score}");
        }
        assert_eq!(positive_score(0.0), 60);
    }

    #[test]
    fn negative_scores_stay_in_band() {
        for draw in [0.0, 0.25, 0.5, 0.75, 0.999] {
            let score = negative_score(draw);
            assert!((25..=59).contains(&score), "draw {draw} gave {score}");
        }
        assert_eq!(negative_score(0.0), 25);
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        let model = SimulatedModel::new(ModelSettings {
            latency: Duration::ZERO,
            seed: Some(42),
        });
        let payload = company(60_000.0, "SP", "4781-4/00");
        let usage = UsageSnapshot::new(1, 2);

        let first = model.analyze(&payload, usage).await;
        let second = model.analyze(&payload, usage).await;
        assert_eq!(first.category, second.category);
        assert_eq!(first.score, second.score);
    }

    #[tokio::test]
    async fn verdict_score_agrees_with_its_category() {
        let model = SimulatedModel::new(ModelSettings {
            latency: Duration::ZERO,
            seed: Some(7),
        });
        let verdict = model
            .analyze(&company(60_000.0, "SP", "4781-4/00"), UsageSnapshot::new(1, 2))
            .await;
        match verdict.category {
            Category::Positive => assert!(verdict.score.unwrap() >= 60),
            Category::Negative => assert!(verdict.score.unwrap() < 60),
            Category::InadequateUse => assert_eq!(verdict.score, None),
            other => panic!("unexpected category {other:?}"),
        }
    }

    #[tokio::test]
    async fn over_limit_analyze_reports_excessive_use() {
        let model = SimulatedModel::new(ModelSettings {
            latency: Duration::ZERO,
            seed: None,
        });
        let verdict = model
            .analyze(&CompanyData::default(), UsageSnapshot::new(3, 2))
            .await;
        assert_eq!(verdict.category, Category::ExcessiveUse);
        assert_eq!(verdict.score, None);
        assert_eq!(verdict.attempts_used, 3);
        assert_eq!(verdict.attempts_max, 2);
    }
}
