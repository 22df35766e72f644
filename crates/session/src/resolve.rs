use serde::Serialize;

use viability_scoring::{UsageSnapshot, Verdict, ViabilityModel};
use viability_store::{LocalStore, Namespace};
use viability_types::{Category, CompanyData, MAX_ATTEMPTS};

use crate::{RecordManager, UsageCounter};

/// Where a rendered verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOrigin {
    /// Mapped straight from the score persisted on the record.
    StoredScore,
    /// Produced by a fresh model run.
    FreshRun,
    /// Forced by the debug category override.
    DebugOverride,
    /// Nothing was resolvable; placeholder data.
    Fallback,
}

/// A verdict ready for rendering, with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    pub origin: ResolutionOrigin,
    pub verdict: Verdict,
}

/// Decides which verdict a result view renders.
///
/// Resolution never mutates session state: it does not consume attempts
/// and does not write records, so viewing a result twice is free.
pub struct ResultResolver<'a> {
    pub store: &'a LocalStore,
    pub manager: &'a RecordManager,
    pub counter: &'a UsageCounter,
    pub model: &'a dyn ViabilityModel,
}

impl ResultResolver<'_> {
    /// Resolve the verdict for `id`, or for the autosaved draft when no id
    /// is given.
    ///
    /// Precedence: missing data falls back to a placeholder, a debug
    /// override beats everything, a stored score is authoritative, and
    /// only then does the model run.
    pub async fn resolve(
        &self,
        id: Option<&str>,
        debug_category: Option<Category>,
    ) -> Resolution {
        let requested = id.map(str::to_string);
        let payload = requested
            .as_deref()
            .and_then(|id| self.manager.payload(id))
            .or_else(|| self.store.get::<CompanyData>(Namespace::Draft));

        let Some(company) = payload else {
            log::error!("No analysis data to resolve; rendering placeholder");
            let verdict = Verdict::new(
                Category::InadequateUse,
                CompanyData::placeholder(),
                UsageSnapshot::new(1, MAX_ATTEMPTS),
            );
            return Resolution {
                analysis_id: requested,
                origin: ResolutionOrigin::Fallback,
                verdict,
            };
        };

        let record = requested.as_deref().and_then(|id| self.manager.get(id));
        let usage = self.counter.snapshot();

        if let Some(category) = debug_category {
            let mut verdict = Verdict::new(category, company, usage)
                .with_score(record.as_ref().and_then(|record| record.score));
            if let Some(record) = &record {
                verdict.issued_at_ms = record.updated_at_ms;
            }
            return Resolution {
                analysis_id: requested,
                origin: ResolutionOrigin::DebugOverride,
                verdict,
            };
        }

        if let Some(record) = &record {
            if let Some(score) = record.score {
                let mut verdict =
                    Verdict::new(Category::from_score(score), company, usage)
                        .with_score(Some(score));
                verdict.issued_at_ms = record.updated_at_ms;
                return Resolution {
                    analysis_id: requested,
                    origin: ResolutionOrigin::StoredScore,
                    verdict,
                };
            }
        }

        let mut verdict = self.model.analyze(&company, usage).await;
        if let Some(score) = verdict.score {
            let mapped = Category::from_score(score);
            if mapped != verdict.category {
                log::debug!(
                    "Fresh draw {} disagrees with score {score}; displaying {}",
                    verdict.category.as_str(),
                    mapped.as_str()
                );
                verdict.category = mapped;
            }
        }
        if let Some(record) = &record {
            verdict.issued_at_ms = record.updated_at_ms;
        }
        Resolution {
            analysis_id: requested,
            origin: ResolutionOrigin::FreshRun,
            verdict,
        }
    }
}
