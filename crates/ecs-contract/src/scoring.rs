//! # Score Pipeline
//!
//! ```text
//! incomeFactor = min(income / 500, 100)
//! weighted     = incomeFactor * 3 / 10
//! baseline     = (45 + weighted) - debtRatio / 10
//! prior        = baseline | score on file
//! score        = prior * 5 / 10 + weighted + (100 - debtRatio) * 2 / 10
//! qualified    = score >= threshold
//! ```
//!
//! Division truncates and add/sub saturate, in both the encrypted pipeline
//! and [`plaintext_reference`].

use ecs_core::{Ebool, Euint32};
use ecs_fhe::{ArithmeticEngine, ConfidentialBackend, EngineError};

const INCOME_DIVISOR: u32 = 500;
const INCOME_FACTOR_CAP: u32 = 100;
const BASELINE_SCORE: u32 = 45;
const FULL_SCALE: u32 = 100;

/// Where the prior score comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorScore {
    /// First submission: derive the baseline from the inputs.
    Baseline,
    /// Re-submission: the current score on file.
    OnFile(Euint32),
}

/// Encrypted pipeline results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// The prior score used; stored as `last_score`.
    pub prior: Euint32,
    /// The new score; stored as `current_score`.
    pub score: Euint32,
    /// `score >= threshold`.
    pub qualified: Ebool,
}

/// Run the pipeline over admitted operands.
pub fn evaluate<B: ConfidentialBackend + ?Sized>(
    engine: &mut ArithmeticEngine<'_, B>,
    prior: PriorScore,
    income: &Euint32,
    debt_ratio: &Euint32,
    threshold: &Euint32,
) -> Result<ScoreOutcome, EngineError> {
    let scaled_income = engine.scalar_multiply(income, 1, INCOME_DIVISOR)?;
    let income_factor = engine.clamp_min(&scaled_income, INCOME_FACTOR_CAP)?;
    let weighted_income = engine.scalar_multiply(&income_factor, 3, 10)?;

    let prior = match prior {
        PriorScore::OnFile(score) => score,
        PriorScore::Baseline => {
            let base = engine.as_euint32(BASELINE_SCORE)?;
            let raised = engine.add(&base, &weighted_income)?;
            let debt_penalty = engine.scalar_multiply(debt_ratio, 1, 10)?;
            engine.sub(&raised, &debt_penalty)?
        }
    };

    let carried = engine.scalar_multiply(&prior, 5, 10)?;
    let full = engine.as_euint32(FULL_SCALE)?;
    let headroom = engine.sub(&full, debt_ratio)?;
    let weighted_headroom = engine.scalar_multiply(&headroom, 2, 10)?;
    let partial = engine.add(&carried, &weighted_income)?;
    let score = engine.add(&partial, &weighted_headroom)?;
    let qualified = engine.greater_or_equal(&score, threshold)?;

    tracing::debug!(
        score = %score.handle().short(),
        qualified = %qualified.handle().short(),
        "score evaluated"
    );
    Ok(ScoreOutcome {
        prior,
        score,
        qualified,
    })
}

/// Plaintext model of [`evaluate`]: `(prior, score, qualified)`.
pub fn plaintext_reference(
    income: u32,
    debt_ratio: u32,
    on_file: Option<u32>,
    threshold: u32,
) -> (u32, u32, bool) {
    let scale = |x: u32, n: u32, d: u32| {
        u32::try_from(u64::from(x) * u64::from(n) / u64::from(d)).unwrap_or(u32::MAX)
    };
    let income_factor = scale(income, 1, INCOME_DIVISOR).min(INCOME_FACTOR_CAP);
    let weighted_income = scale(income_factor, 3, 10);
    let prior = on_file.unwrap_or_else(|| {
        BASELINE_SCORE
            .saturating_add(weighted_income)
            .saturating_sub(scale(debt_ratio, 1, 10))
    });
    let score = scale(prior, 5, 10)
        .saturating_add(weighted_income)
        .saturating_add(scale(FULL_SCALE.saturating_sub(debt_ratio), 2, 10));
    (prior, score, score >= threshold)
}
