use std::time::Duration;

use super::mock::{EngineCommand, MockDom, MockEngineFactory, MockSurface};
use super::*;
use crate::config::ReaderConfig;
use crate::schedule::ManualScheduler;

type TestController =
    FlipbookController<MockEngineFactory, MockSurface, ManualScheduler<ScheduledPhase>>;

fn book(pages: usize) -> Book {
    Book::new(
        "senke-proslosti",
        "front.jpg",
        "back.jpg",
        (1..=pages).map(|i| format!("page-{i}.jpg")).collect(),
    )
}

fn landscape_dom() -> MockDom {
    MockDom::new(Bounds::new(1000.0, 800.0), Orientation::Landscape)
}

fn controller(dom: &MockDom, pages: usize) -> TestController {
    let mut controller = FlipbookController::new(
        book(pages),
        ReaderConfig::default(),
        dom.factory(),
        dom.surface(),
        ManualScheduler::new(),
    );
    controller.set_position_sink(dom.position_sink());
    controller
}

/// Move the virtual clock forward, firing every phase that falls due.
fn advance(controller: &mut TestController, ms: u64) {
    let deadline = controller.scheduler().now() + Duration::from_millis(ms);
    while let Some(task) = controller.scheduler_mut().pop_until(deadline) {
        controller.run_phase(task);
    }
    controller.scheduler_mut().set_now(deadline);
}

/// Hand queued engine notifications to the controller.
fn deliver(controller: &mut TestController, dom: &MockDom) {
    for leaf in dom.take_notifications() {
        controller.handle_position_change(leaf);
    }
}

fn open_and_settle(controller: &mut TestController, dom: &MockDom) {
    assert!(controller.open());
    advance(controller, 100);
    deliver(controller, dom);
}

#[test]
fn test_open_four_page_book_in_landscape() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);

    assert!(reader.open());
    {
        let state = dom.state();
        let settings = state.last_settings.as_ref().unwrap();
        assert_eq!((settings.width, settings.height), (500, 769));
        assert!(!settings.use_portrait);
        assert!(!state.cover_visible);
        assert!(state.surface_visible);
        assert!(state.keys_attached);
        assert_eq!(state.offset, -250.0);
    }
    assert_eq!(reader.view_state(), ViewState::FrontCover);
    assert_eq!(reader.leaf_count(), Some(6));
    assert!(reader.is_animating());

    advance(&mut reader, 99);
    assert!(reader.is_animating());

    advance(&mut reader, 1);
    assert!(!reader.is_animating());
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::GoTo(1)));
    // The engine has not reported yet.
    assert_eq!(reader.view_state(), ViewState::FrontCover);

    deliver(&mut reader, &dom);
    assert_eq!(reader.view_state(), ViewState::Spread);
    assert_eq!(reader.current_offset(), 0.0);
}

#[test]
fn test_open_sizes_pages_before_the_surface_collapses() {
    let dom = landscape_dom();
    // Once the cover hides, the empty surface leaves only the controls row.
    dom.state_mut().revealed_bounds = Some(Bounds::new(1000.0, 44.0));
    let mut reader = controller(&dom, 4);

    assert!(reader.open());
    let state = dom.state();
    let settings = state.last_settings.as_ref().unwrap();
    assert_eq!((settings.width, settings.height), (500, 769));
    assert_eq!(state.offset, -250.0);
    assert!(state.surface_visible);
}

#[test]
fn test_second_open_is_ignored() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);

    assert!(reader.open());
    assert!(!reader.open());
    assert_eq!(dom.state().engines_created, 1);
    assert_eq!(reader.scheduler().pending(), 1);

    advance(&mut reader, 100);
    assert!(!reader.open());
    assert_eq!(dom.state().engines_created, 1);
    assert_eq!(reader.view_state(), ViewState::FrontCover);
}

#[test]
fn test_open_then_close_restores_closed_snapshot() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);

    open_and_settle(&mut reader, &dom);
    assert!(reader.close());
    advance(&mut reader, 10_000);
    deliver(&mut reader, &dom);

    assert_eq!(reader.view_state(), ViewState::Closed);
    assert!(!reader.is_animating());
    assert!(!reader.has_engine());
    assert_eq!(reader.current_offset(), 0.0);
    assert!(reader.scheduler().is_idle());

    let state = dom.state();
    assert_eq!(state.injected_nodes, 0);
    assert!(state.cover_visible);
    assert!(!state.surface_visible);
    assert!(!state.keys_attached);
    assert_eq!(state.offset, 0.0);
    assert_eq!(state.engines_destroyed, 1);
}

#[test]
fn test_close_runs_named_phases_on_time() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    open_and_settle(&mut reader, &dom);

    assert!(reader.close());
    assert!(!dom.state().keys_attached);
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::GoTo(0)));

    advance(&mut reader, 799);
    assert_eq!(reader.current_offset(), 0.0);
    assert!(reader.has_engine());

    advance(&mut reader, 1);
    assert_eq!(reader.view_state(), ViewState::FrontCover);
    assert_eq!(reader.current_offset(), -250.0);
    assert!(reader.has_engine());
    assert!(reader.is_animating());

    advance(&mut reader, 499);
    assert!(reader.has_engine());

    advance(&mut reader, 1);
    assert!(!reader.has_engine());
    assert_eq!(reader.view_state(), ViewState::Closed);
    assert!(!reader.is_animating());
}

#[test]
fn test_requests_are_dropped_while_animating() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    assert!(reader.open());

    let commands_before = dom.state().commands.len();
    assert!(!reader.next());
    assert!(!reader.prev());
    assert!(!reader.close());
    assert!(!reader.open());
    assert!(!reader.handle_key(ReaderKey::ArrowRight));
    assert!(!reader.handle_key(ReaderKey::Escape));

    assert_eq!(dom.state().commands.len(), commands_before);
    assert_eq!(reader.scheduler().pending(), 1);
    assert_eq!(reader.view_state(), ViewState::FrontCover);
}

#[test]
fn test_close_requested_mid_open_is_rejected_and_open_completes() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 2);
    assert!(reader.open());
    assert!(!reader.close());

    advance(&mut reader, 100);
    deliver(&mut reader, &dom);
    assert!(reader.is_open());
    assert!(!reader.is_animating());
    assert!(dom.state().keys_attached);

    // A retry after the open settles goes through.
    assert!(reader.close());
}

#[test]
fn test_phase_run_after_its_due_time_still_unlocks() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    assert!(reader.open());

    // The host could not run the phase when it fell due and retries later.
    let due = reader.scheduler_mut().pop_until(Duration::from_millis(100)).unwrap();
    reader.scheduler_mut().set_now(Duration::from_millis(130));
    assert!(!reader.close());
    assert!(reader.is_animating());

    reader.run_phase(due);
    assert!(!reader.is_animating());
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::GoTo(1)));
}

#[test]
fn test_navigation_delegates_and_engine_drives_view() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    open_and_settle(&mut reader, &dom);

    assert!(reader.next());
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::Advance));
    // No direct state change until the engine reports.
    assert_eq!(reader.view_state(), ViewState::Spread);

    for _ in 0..3 {
        reader.next();
    }
    deliver(&mut reader, &dom);
    assert_eq!(reader.view_state(), ViewState::BackCover);
    assert_eq!(reader.current_offset(), 250.0);

    assert!(reader.prev());
    deliver(&mut reader, &dom);
    assert_eq!(reader.view_state(), ViewState::Spread);
}

#[test]
fn test_cover_offsets_mirror_each_other() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    open_and_settle(&mut reader, &dom);

    reader.handle_position_change(0);
    let front = reader.current_offset();
    reader.handle_position_change(5);
    let back = reader.current_offset();
    reader.handle_position_change(3);
    let spread = reader.current_offset();

    assert_eq!(front, -back);
    assert_eq!(front, -250.0);
    assert_eq!(spread, 0.0);
}

#[test]
fn test_portrait_is_always_centered() {
    let dom = MockDom::new(Bounds::new(390.0, 800.0), Orientation::Portrait);
    let mut reader = controller(&dom, 4);

    assert!(reader.open());
    let settings = dom.state().last_settings.clone().unwrap();
    assert!(settings.use_portrait);
    assert_eq!((settings.width, settings.height), (390, 600));
    assert_eq!(reader.current_offset(), 0.0);

    advance(&mut reader, 100);
    for leaf in [0, 2, 5] {
        reader.handle_position_change(leaf);
        assert_eq!(reader.current_offset(), 0.0);
    }
}

#[test]
fn test_geometry_follows_resize() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    open_and_settle(&mut reader, &dom);

    dom.state_mut().bounds = Bounds::new(1600.0, 500.0);
    reader.handle_position_change(0);
    assert_eq!(reader.geometry(), Geometry { width: 325, height: 500 });
    assert_eq!(reader.current_offset(), -162.5);
}

#[test]
fn test_keyboard_bridge() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);

    assert!(!reader.handle_key(ReaderKey::ArrowRight));
    assert!(dom.state().commands.is_empty());
    assert_eq!(reader.view_state(), ViewState::Closed);

    open_and_settle(&mut reader, &dom);
    assert!(reader.handle_key(ReaderKey::ArrowRight));
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::Advance));
    assert!(reader.handle_key(ReaderKey::ArrowLeft));
    assert_eq!(dom.state().commands.last(), Some(&EngineCommand::Retreat));

    assert!(reader.handle_key(ReaderKey::Escape));
    assert!(reader.is_animating());
    assert!(!dom.state().keys_attached);
}

#[test]
fn test_empty_book_has_two_cover_leaves() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 0);

    assert!(reader.open());
    assert_eq!(reader.leaf_count(), Some(2));
    advance(&mut reader, 100);
    deliver(&mut reader, &dom);
    // Leaf 1 is the last leaf here.
    assert_eq!(reader.view_state(), ViewState::BackCover);
}

#[test]
fn test_engine_construction_failure_leaves_book_closed() {
    let dom = landscape_dom();
    dom.state_mut().fail_create = true;
    let mut reader = controller(&dom, 4);

    assert!(!reader.open());
    assert_eq!(reader.view_state(), ViewState::Closed);
    assert!(!reader.is_animating());
    assert!(reader.scheduler().is_idle());
    {
        let state = dom.state();
        assert!(state.cover_visible);
        assert!(!state.surface_visible);
        assert!(!state.keys_attached);
    }

    dom.state_mut().fail_create = false;
    assert!(reader.open());
    assert_eq!(reader.view_state(), ViewState::FrontCover);
}

#[test]
fn test_page_load_failure_destroys_half_built_engine() {
    let dom = landscape_dom();
    dom.state_mut().fail_load = true;
    let mut reader = controller(&dom, 4);

    assert!(!reader.open());
    assert!(!reader.has_engine());
    let state = dom.state();
    assert_eq!(state.commands, vec![EngineCommand::Load(6), EngineCommand::Destroy]);
    assert_eq!(state.injected_nodes, 0);
}

#[test]
fn test_destroy_failure_still_cleans_up_and_unlocks() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);
    open_and_settle(&mut reader, &dom);

    dom.state_mut().fail_destroy = true;
    assert!(reader.close());
    advance(&mut reader, 1300);

    assert_eq!(reader.view_state(), ViewState::Closed);
    assert!(!reader.is_animating());
    assert!(!reader.has_engine());
    assert_eq!(dom.state().injected_nodes, 0);
    assert!(dom.state().cover_visible);

    dom.state_mut().fail_destroy = false;
    assert!(reader.open());
}

#[test]
fn test_missing_mount_point_is_recreated() {
    let dom = landscape_dom();
    dom.state_mut().mount_present = false;
    let mut reader = controller(&dom, 4);

    assert!(reader.open());
    assert_eq!(dom.state().mounts_recreated, 1);
    assert!(reader.has_engine());
}

#[test]
fn test_stale_and_stray_events_are_ignored() {
    let dom = landscape_dom();
    let mut reader = controller(&dom, 4);

    reader.handle_position_change(2);
    assert_eq!(reader.view_state(), ViewState::Closed);

    open_and_settle(&mut reader, &dom);
    reader.handle_position_change(42);
    assert_eq!(reader.view_state(), ViewState::Spread);

    reader.run_phase(ScheduledPhase {
        phase: Phase::Teardown,
        generation: 99,
    });
    assert!(reader.has_engine());
    assert!(reader.is_open());
}

#[test]
fn test_view_state_from_leaf() {
    assert_eq!(ViewState::from_leaf(0, 6), ViewState::FrontCover);
    assert_eq!(ViewState::from_leaf(1, 6), ViewState::Spread);
    assert_eq!(ViewState::from_leaf(4, 6), ViewState::Spread);
    assert_eq!(ViewState::from_leaf(5, 6), ViewState::BackCover);
    assert_eq!(ViewState::from_leaf(1, 2), ViewState::BackCover);
}
