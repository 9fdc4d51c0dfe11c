//! Inference over a whole buffer

use super::classifier::is_evidence;
use super::decider::decide;
use super::extractor::extract;
use super::votes::{VoteAccumulator, VoteTable};
use super::{SourceBuffer, SCAN_CAP};
use crate::models::{Decision, IndentReading, Whitelist};
use tracing::debug;

/// Settings an [`InferenceEngine`] is built with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Admissible indentation widths
    pub whitelist: Whitelist,
    /// Emit per-line vote diagnostics at debug level
    pub debug: bool,
}

/// Decision plus the evidence that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    pub decision: Decision,
    pub votes: VoteTable,
    /// Space-indented evidence lines fed to the vote
    pub evidence_lines: usize,
    /// Whether scanning stopped at the line cap
    pub capped: bool,
}

/// Stateless indentation inference; every call starts from fresh votes.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.config.whitelist
    }

    /// Infer the indentation style of `buffer`
    pub fn infer<B: SourceBuffer + ?Sized>(&self, buffer: &B) -> Decision {
        self.analyze(buffer).decision
    }

    /// Infer and keep the vote table and scan statistics
    pub fn analyze<B: SourceBuffer + ?Sized>(&self, buffer: &B) -> Inference {
        let mut acc = VoteAccumulator::new();
        let mut capped = false;

        for (row, line) in buffer.lines().iter().enumerate() {
            if acc.evidence_lines() > SCAN_CAP {
                capped = true;
                break;
            }

            // Missing scope data fails open: the line counts.
            let scopes = buffer.scopes_at(row).unwrap_or_default();
            if !is_evidence(line, &scopes) {
                continue;
            }

            let indent = match extract(line) {
                IndentReading::Spaces(n) => n,
                IndentReading::Tab => {
                    if self.config.debug {
                        debug!(row, "tab indentation found, deciding for tabs");
                    }
                    return Inference {
                        decision: Decision::Tab,
                        evidence_lines: acc.evidence_lines(),
                        votes: acc.into_votes(),
                        capped: false,
                    };
                }
                IndentReading::None => continue,
            };

            let delta = acc.observe(indent);
            if self.config.debug {
                debug!(row, indent, delta, votes = ?acc.votes().to_map(), "evidence line");
            }
        }

        let evidence_lines = acc.evidence_lines();
        let votes = acc.into_votes();
        let decision = decide(&votes, &self.config.whitelist);
        if self.config.debug {
            debug!(
                evidence_lines,
                capped,
                votes = ?votes.to_map(),
                "indent report: decided for {}",
                decision
            );
        }

        Inference {
            decision,
            votes,
            evidence_lines,
            capped,
        }
    }
}
