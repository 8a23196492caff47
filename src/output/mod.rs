//! Output classification and view-state resolution.
//!
//! Both halves are pure: `classify` decides raster image vs. embeddable
//! interactive document from the reference's path suffix, and
//! `resolve_view` maps orchestrator state to exactly one of four views
//! with a fixed precedence (loading beats a stale error or result).

use crate::generate::GenerationOutcome;

const IMAGE_SUFFIXES: &[&str] = &["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    InteractiveDocument,
}

/// Syntactic heuristic on the path suffix, case-insensitive. Query and
/// fragment are stripped first so the cache-buster never hides the real
/// extension. Total: every reference classifies to one of the two kinds.
pub fn classify(reference: &str) -> ContentKind {
    let path = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference);

    match path.rsplit_once('.') {
        Some((_, ext)) if IMAGE_SUFFIXES.iter().any(|s| ext.eq_ignore_ascii_case(s)) => {
            ContentKind::Image
        }
        _ => ContentKind::InteractiveDocument,
    }
}

/// Progress of the background fetch backing the image view's skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Idle,
    Fetching,
    Loaded { bytes: usize },
    Failed { message: String },
}

/// One of the four exclusive output views.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error {
        message: &'a str,
    },
    Empty,
    Image {
        reference: &'a str,
        logs: Option<&'a str>,
        metadata: Option<&'a serde_json::Value>,
        /// False until the asset fetch completes; the view shows a
        /// skeleton placeholder in the meantime.
        loaded: bool,
        bytes: Option<usize>,
        /// Set when the background fetch failed; replaces the skeleton.
        asset_error: Option<&'a str>,
    },
    /// Isolated embedded view; no skeleton phase.
    Interactive {
        reference: &'a str,
        logs: Option<&'a str>,
        metadata: Option<&'a serde_json::Value>,
    },
}

/// Precedence is load-bearing: a fresh submission shows Loading even
/// while a previous error or result is still held.
pub fn resolve_view<'a>(
    in_flight: bool,
    outcome: &'a GenerationOutcome,
    asset: &'a AssetState,
) -> ViewState<'a> {
    if in_flight {
        return ViewState::Loading;
    }

    match outcome {
        GenerationOutcome::Failed { message } => ViewState::Error { message },
        GenerationOutcome::Pending => ViewState::Empty,
        GenerationOutcome::Succeeded {
            reference,
            logs,
            metadata,
            ..
        } => match classify(reference) {
            ContentKind::Image => ViewState::Image {
                reference: reference.as_str(),
                logs: logs.as_deref(),
                metadata: metadata.as_ref(),
                loaded: matches!(asset, AssetState::Loaded { .. }),
                bytes: match asset {
                    AssetState::Loaded { bytes } => Some(*bytes),
                    _ => None,
                },
                asset_error: match asset {
                    AssetState::Failed { message } => Some(message.as_str()),
                    _ => None,
                },
            },
            ContentKind::InteractiveDocument => ViewState::Interactive {
                reference: reference.as_str(),
                logs: logs.as_deref(),
                metadata: metadata.as_ref(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn succeeded(reference: &str) -> GenerationOutcome {
        GenerationOutcome::Succeeded {
            reference: reference.to_string(),
            logs: None,
            metadata: None,
            retrieved_at: 1,
        }
    }

    #[test]
    fn raster_suffixes_classify_as_image() {
        for reference in [
            "http://h/files/out.png",
            "http://h/files/OUT.PNG",
            "/files/a.jpg",
            "/files/a.JPEG",
            "/files/anim.gif",
        ] {
            assert_eq!(classify(reference), ContentKind::Image, "{reference}");
        }
    }

    #[test]
    fn everything_else_is_interactive() {
        for reference in [
            "http://h/files/out.html",
            "/files/plot.svg",
            "/files/no_extension",
            "",
        ] {
            assert_eq!(
                classify(reference),
                ContentKind::InteractiveDocument,
                "{reference}"
            );
        }
    }

    #[test]
    fn cache_buster_does_not_hide_the_suffix() {
        assert_eq!(
            classify("http://h/files/out.png?t=1712000000123"),
            ContentKind::Image
        );
        assert_eq!(
            classify("http://h/files/out.html?t=1712000000123"),
            ContentKind::InteractiveDocument
        );
    }

    #[test]
    fn loading_supersedes_stale_success() {
        let outcome = succeeded("http://h/out.png?t=1");
        let view = resolve_view(true, &outcome, &AssetState::Idle);
        assert_eq!(view, ViewState::Loading);
    }

    #[test]
    fn loading_supersedes_stale_error() {
        let outcome = GenerationOutcome::Failed {
            message: "boom".to_string(),
        };
        assert_eq!(
            resolve_view(true, &outcome, &AssetState::Idle),
            ViewState::Loading
        );
    }

    #[test]
    fn failed_outcome_shows_its_message() {
        let outcome = GenerationOutcome::Failed {
            message: "bad request".to_string(),
        };
        assert_eq!(
            resolve_view(false, &outcome, &AssetState::Idle),
            ViewState::Error {
                message: "bad request"
            }
        );
    }

    #[test]
    fn pending_outcome_is_the_empty_view() {
        assert_eq!(
            resolve_view(false, &GenerationOutcome::Pending, &AssetState::Idle),
            ViewState::Empty
        );
    }

    #[test]
    fn image_view_tracks_the_asset_sub_state() {
        let outcome = succeeded("http://h/out.png?t=1");

        let skeleton = resolve_view(false, &outcome, &AssetState::Fetching);
        assert!(matches!(skeleton, ViewState::Image { loaded: false, .. }));

        let loaded = resolve_view(false, &outcome, &AssetState::Loaded { bytes: 2048 });
        assert!(matches!(
            loaded,
            ViewState::Image {
                loaded: true,
                bytes: Some(2048),
                ..
            }
        ));
    }

    #[test]
    fn failed_asset_fetch_surfaces_in_the_image_view() {
        let outcome = succeeded("http://h/out.png?t=1");
        let failed = AssetState::Failed {
            message: "404".to_string(),
        };
        let view = resolve_view(false, &outcome, &failed);
        assert!(matches!(
            view,
            ViewState::Image {
                loaded: false,
                asset_error: Some("404"),
                ..
            }
        ));
    }

    #[test]
    fn interactive_view_has_no_skeleton_phase() {
        let outcome = succeeded("http://h/out.html?t=1");
        let view = resolve_view(false, &outcome, &AssetState::Idle);
        assert!(matches!(view, ViewState::Interactive { .. }));
    }
}
