//! # Scheduling Scenarios
//!
//! Activation, polling, and settling of the fallback loop.

use std::time::Duration;

use crate::{legacy_engine, modern_engine};
use svgkit_common::BackoffConfig;
use svgkit_dom::{DocumentReadyState, HostCapabilities};
use svgkit_engine::{FallbackConfig, FallbackScheduler, SchedulerState, Step, SvgFallback};

fn fast_config() -> FallbackConfig {
    FallbackConfig::default()
        .with_backoff(BackoffConfig::fixed(Duration::from_millis(1)))
        .with_settle_delay(Duration::from_millis(1))
}

/// On a modern host the engine is inert: activation runs no passes and the
/// document keeps its SVG references.
#[tokio::test]
async fn test_modern_host_never_rewrites() {
    let engine = modern_engine(r#"<html><body><img src="logo.svg"></body></html>"#);
    engine
        .document()
        .set_ready_state(DocumentReadyState::Complete);

    engine.activate().await;

    let img = &engine.document().get_elements_by_tag_name("img")[0];
    assert_eq!(img.get_attribute("src").as_deref(), Some("logo.svg"));
}

/// Activating against an already-complete document performs the immediate
/// pass plus the trailing pass, then stops.
#[tokio::test]
async fn test_activate_on_complete_document() {
    let engine = SvgFallback::from_html(
        r#"<html><body><img src="logo.svg"></body></html>"#,
        HostCapabilities::legacy(),
        fast_config(),
    )
    .unwrap();
    engine
        .document()
        .set_ready_state(DocumentReadyState::Complete);

    engine.activate().await;

    let img = &engine.document().get_elements_by_tag_name("img")[0];
    assert_eq!(img.get_attribute("src").as_deref(), Some("logo.png"));
}

/// Driving the machine by hand: content inserted between passes is caught by
/// a later pass, and the trailing pass catches content injected after the
/// document completes.
#[test]
fn test_late_content_caught_by_trailing_pass() {
    let engine = legacy_engine(r#"<html><body><img src="early.svg"></body></html>"#);
    let doc = engine.document().clone();

    let mut scheduler = FallbackScheduler::new(engine.config());
    assert!(scheduler.begin(engine.is_svg_supported()));

    // First pass while loading.
    assert!(matches!(
        scheduler.next(doc.ready_state()),
        Step::Pass { .. }
    ));
    engine.run_fallback(None);
    assert_eq!(
        doc.get_elements_by_tag_name("img")[0]
            .get_attribute("src")
            .as_deref(),
        Some("early.png")
    );

    // Document completes; a script injects one more image.
    doc.set_ready_state(DocumentReadyState::Complete);
    let late = doc.create_element("img");
    late.set_attribute("src", "late.svg");
    doc.body().unwrap().append_child(late);

    let Step::FinalPass { .. } = scheduler.next(doc.ready_state()) else {
        panic!("expected the final-pass transition");
    };
    engine.run_fallback(None);
    engine.run_fallback(None); // trailing pass

    assert_eq!(scheduler.state(), SchedulerState::Settled);
    assert_eq!(scheduler.next(doc.ready_state()), Step::Done);

    let images = doc.get_elements_by_tag_name("img");
    assert_eq!(images[1].get_attribute("src").as_deref(), Some("late.png"));
}

/// Once settled, the scheduler never issues another pass, whatever the ready
/// state reports afterwards.
#[test]
fn test_settled_is_permanent() {
    let engine = legacy_engine("<html><body></body></html>");
    let mut scheduler = FallbackScheduler::new(engine.config());
    scheduler.begin(false);

    engine
        .document()
        .set_ready_state(DocumentReadyState::Complete);
    assert!(matches!(
        scheduler.next(DocumentReadyState::Complete),
        Step::FinalPass { .. }
    ));

    for ready in [
        DocumentReadyState::Loading,
        DocumentReadyState::Interactive,
        DocumentReadyState::Complete,
    ] {
        assert_eq!(scheduler.next(ready), Step::Done);
    }
}
