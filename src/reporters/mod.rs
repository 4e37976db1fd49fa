//! Output rendering for comparison results

pub mod json;
pub mod text;

#[cfg(test)]
pub(crate) mod tests {
    use crate::compare::Comparison;
    use crate::features::FeatureEngine;
    use crate::nlp::Annotator;
    use crate::stats::GenreStats;
    use std::sync::Arc;

    /// Shared fixture: a small two-genre comparison.
    pub fn test_comparison() -> Comparison {
        let engine = FeatureEngine::new(Arc::new(Annotator::new()));
        let mut genres = GenreStats::new();
        genres.insert("news".to_string(), engine.compute_fast("Officials said so."));
        genres.insert(
            "fiction".to_string(),
            engine.compute_fast("Once upon a time there was a cat."),
        );
        let mut user = engine.compute_fast("My sample text reads well.");
        user.perplexity_gpt2 = Some(31.5);
        Comparison { user, genres }
    }
}
