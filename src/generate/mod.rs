//! Generation attempt lifecycle.
//!
//! Owns exactly one attempt at a time: empty-input short-circuit, the
//! in-flight flag the UI debounces on, and sequence tagging so a slow
//! response from a superseded attempt can never overwrite a newer one.

use crate::client::{GenerateError, Language, VisualizationKind, VisualizationRequest};

/// Terminal state of the most recent generation attempt. Replaced
/// wholesale per attempt, never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// No attempt has resolved yet.
    Pending,
    Succeeded {
        /// Fully resolved, cache-busted content reference.
        reference: String,
        logs: Option<String>,
        metadata: Option<serde_json::Value>,
        /// Millisecond timestamp; also the `?t=` disambiguator.
        retrieved_at: u64,
    },
    Failed {
        message: String,
    },
}

/// Successful resolution payload handed back by the async glue.
#[derive(Debug, Clone)]
pub struct GenerationSuccess {
    pub reference: String,
    pub logs: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub retrieved_at: u64,
}

/// One accepted submission, tagged with its sequence number.
#[derive(Debug, Clone)]
pub struct Submission {
    pub seq: u64,
    pub request: VisualizationRequest,
}

#[derive(Debug)]
pub struct Orchestrator {
    in_flight: bool,
    seq: u64,
    outcome: GenerationOutcome,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            in_flight: false,
            seq: 0,
            outcome: GenerationOutcome::Pending,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn outcome(&self) -> &GenerationOutcome {
        &self.outcome
    }

    /// Start an attempt. Whitespace-only source fails immediately with
    /// `EmptyInput` and never reaches the network; `in_flight` is not
    /// touched on that path.
    pub fn begin(
        &mut self,
        code: &str,
        language: Language,
        kind: VisualizationKind,
    ) -> Result<Submission, GenerateError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            self.outcome = GenerationOutcome::Failed {
                message: GenerateError::EmptyInput.to_string(),
            };
            return Err(GenerateError::EmptyInput);
        }

        self.seq += 1;
        self.in_flight = true;
        Ok(Submission {
            seq: self.seq,
            request: VisualizationRequest {
                code: trimmed.to_string(),
                language,
                visualization_type: kind,
            },
        })
    }

    /// Apply a terminal result. Results tagged with a superseded sequence
    /// number are dropped; the in-flight flag is released on every
    /// accepted resolution, success or failure. Returns whether the
    /// result was applied.
    pub fn resolve(
        &mut self,
        seq: u64,
        result: Result<GenerationSuccess, GenerateError>,
    ) -> bool {
        if seq != self.seq {
            return false;
        }

        self.in_flight = false;
        self.outcome = match result {
            Ok(success) => GenerationOutcome::Succeeded {
                reference: success.reference,
                logs: success.logs,
                metadata: success.metadata,
                retrieved_at: success.retrieved_at,
            },
            Err(err) => GenerationOutcome::Failed {
                message: err.to_string(),
            },
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(reference: &str) -> Result<GenerationSuccess, GenerateError> {
        Ok(GenerationSuccess {
            reference: reference.to_string(),
            logs: None,
            metadata: None,
            retrieved_at: 1,
        })
    }

    #[test]
    fn whitespace_only_fails_without_network_or_flag() {
        let mut orch = Orchestrator::new();
        let err = orch
            .begin("   ", Language::Python, VisualizationKind::Static)
            .unwrap_err();
        assert_eq!(err, GenerateError::EmptyInput);
        assert!(!orch.in_flight());
        assert_eq!(
            orch.outcome(),
            &GenerationOutcome::Failed {
                message: "Please enter some code".to_string()
            }
        );
    }

    #[test]
    fn in_flight_spans_begin_to_resolve_on_success() {
        let mut orch = Orchestrator::new();
        assert!(!orch.in_flight());

        let sub = orch
            .begin("plot(1)", Language::R, VisualizationKind::Static)
            .unwrap();
        assert!(orch.in_flight());

        assert!(orch.resolve(sub.seq, ok("http://h/out.png?t=1")));
        assert!(!orch.in_flight());
        match orch.outcome() {
            GenerationOutcome::Succeeded {
                reference,
                retrieved_at,
                ..
            } => {
                assert_eq!(reference, "http://h/out.png?t=1");
                assert_eq!(*retrieved_at, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn in_flight_released_on_transport_failure() {
        let mut orch = Orchestrator::new();
        let sub = orch
            .begin("plt.show()", Language::Python, VisualizationKind::Static)
            .unwrap();
        assert!(orch.in_flight());

        assert!(orch.resolve(
            sub.seq,
            Err(GenerateError::Transport("connection refused".into()))
        ));
        assert!(!orch.in_flight());
        assert_eq!(
            orch.outcome(),
            &GenerationOutcome::Failed {
                message: "connection refused".to_string()
            }
        );
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut orch = Orchestrator::new();
        let first = orch
            .begin("a", Language::Python, VisualizationKind::Static)
            .unwrap();
        let second = orch
            .begin("b", Language::Python, VisualizationKind::Static)
            .unwrap();
        assert_ne!(first.seq, second.seq);

        // The first attempt resolves late; its result must not land.
        assert!(!orch.resolve(first.seq, ok("stale")));
        assert!(orch.in_flight());
        assert_eq!(orch.outcome(), &GenerationOutcome::Pending);

        assert!(orch.resolve(second.seq, ok("fresh")));
        assert!(matches!(
            orch.outcome(),
            GenerationOutcome::Succeeded { reference, .. } if reference == "fresh"
        ));
    }

    #[test]
    fn submission_carries_trimmed_code() {
        let mut orch = Orchestrator::new();
        let sub = orch
            .begin("  plot(1)\n", Language::R, VisualizationKind::Interactive)
            .unwrap();
        assert_eq!(sub.request.code, "plot(1)");
        assert_eq!(sub.request.visualization_type, VisualizationKind::Interactive);
    }

    #[test]
    fn next_resolution_replaces_prior_failure_wholesale() {
        let mut orch = Orchestrator::new();
        let sub = orch
            .begin("x", Language::Python, VisualizationKind::Static)
            .unwrap();
        orch.resolve(sub.seq, Err(GenerateError::Generation("boom".into())));

        let sub = orch
            .begin("y", Language::Python, VisualizationKind::Static)
            .unwrap();
        orch.resolve(sub.seq, ok("http://h/y.html?t=2"));
        assert!(matches!(orch.outcome(), GenerationOutcome::Succeeded { .. }));
    }
}
