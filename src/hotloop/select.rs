use log::{info, warn};

use super::candidate::LoopCandidate;
use crate::error::{Error, Result};

// =============================================================================
// Score
// =============================================================================

/// Scores how hot a loop is. Higher is hotter.
pub trait Score {
    fn score(&self, candidate: &LoopCandidate) -> f64;
}

/// Scores a loop by the number of traces it appears in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Occurrence;

impl Score for Occurrence {
    fn score(&self, candidate: &LoopCandidate) -> f64 {
        candidate.temperature() as f64
    }
}

// =============================================================================
// Selector
// =============================================================================

/// The outcome of a selection.
#[derive(Clone, Debug)]
pub struct Selection {
    pub hottest: LoopCandidate,
    pub temperature: f64,
    pub ties: usize,    // Number of candidates sharing the max temperature
}

/// Counts the traces each candidate appears in & picks the hottest one.
pub struct Selector<'a> {
    candidates: Vec<LoopCandidate>,
    traces: usize,
    score: &'a dyn Score,
}

impl<'a> Selector<'a> {
    /// Create a selector over CANDIDATES, keeping their order for tie-breaks.
    pub fn new(candidates: Vec<LoopCandidate>, score: &'a dyn Score) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::NoCandidates);
        }
        return Ok(Self { candidates, traces: 0, score });
    }

    /// Count one trace. Each candidate gains at most one occurrence per trace.
    pub fn observe(&mut self, trace: &[u32]) {
        self.traces += 1;
        for candidate in self.candidates.iter_mut() {
            if candidate.appears_in(trace) {
                candidate.occurrence += 1;
            }
        }
    }

    pub fn candidates(&self) -> &[LoopCandidate] {
        &self.candidates
    }

    /// Pick the hottest loop. Draws go to the earliest candidate.
    pub fn select(self) -> Result<Selection> {
        if self.traces == 0 {
            return Err(Error::NoTraces);
        }

        let mut max_temperature: Option<f64> = None;
        let mut hottest: Vec<usize> = vec![];
        for (i, candidate) in self.candidates.iter().enumerate() {
            let mut temperature = self.score.score(candidate);
            info!("Temperature of {} is {}", candidate, temperature);

            // An unordered score ranks below every real one
            if temperature.is_nan() {
                warn!("Score of {} is not a number, ranking it last", candidate.name);
                temperature = f64::NEG_INFINITY;
            }

            if max_temperature.map_or(true, |max| temperature > max) {
                max_temperature = Some(temperature);
                hottest.clear();
                hottest.push(i);
            } else if max_temperature == Some(temperature) {
                hottest.push(i);
            }
        }

        let ties = hottest.len();
        if ties > 1 {
            info!("{} loops have the same temperature, selecting the first one", ties);
        }

        // Non-empty candidates always produce a winner
        let winner = *hottest.first().ok_or(Error::NoCandidates)?;
        let temperature = max_temperature.unwrap_or_default();
        let hottest = self.candidates.into_iter().nth(winner).ok_or(Error::NoCandidates)?;
        info!("Hottest loop: {}", hottest);

        return Ok(Selection { hottest, temperature, ties });
    }
}
