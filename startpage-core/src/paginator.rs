//! The quick-link paginator.
//!
//! Owns the pagination state for the current link snapshot, resolves the page
//! layout from the viewport width, routes input into page changes and runs the
//! page transition. Timers are returned to the host as [`Effect`]s; the host
//! sleeps and feeds the ticket back in.

use crate::api::LinkRecord;
use crate::config::StartPageConfig;
use crate::events::{EventEmitter, SubscriptionId};
use crate::input::{GestureConfig, GestureRouter, InputEvent, PageRequest, RouterOutput, WheelTicket};
use crate::layout::{BreakpointTable, PageLayout};
use crate::pagination::{Direction, PaginatedView};
use crate::transition::{Frame, Phase, Scheduled, Transition, TransitionConfig, TransitionTick};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PaginatorEvent {
    PageChanged {
        from: usize,
        to: usize,
        direction: Direction,
    },
    LayoutChanged(PageLayout),
    DataReplaced {
        total_items: usize,
        total_pages: usize,
    },
    LoadFailed(String),
}

/// Work the host must schedule on its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Transition(Scheduled),
    Wheel { ticket: WheelTicket, after: Duration },
}

impl Effect {
    pub fn delay(&self) -> Duration {
        match self {
            Effect::Transition(scheduled) => scheduled.after,
            Effect::Wheel { after, .. } => *after,
        }
    }
}

#[derive(Debug)]
pub struct Paginator {
    view: PaginatedView<LinkRecord>,
    breakpoints: BreakpointTable,
    layout: PageLayout,
    router: GestureRouter,
    transition: Transition,
    /// Page whose items are on screen; trails `view.current_page()` until the
    /// exit animation finishes.
    displayed_page: usize,
    events: EventEmitter<PaginatorEvent>,
}

impl Paginator {
    pub fn new(config: &StartPageConfig, viewport_width: f32) -> Self {
        Self::with_parts(
            config.breakpoints.clone(),
            config.gestures,
            config.transition,
            viewport_width,
        )
    }

    pub fn with_parts(
        breakpoints: BreakpointTable,
        gestures: GestureConfig,
        transition: TransitionConfig,
        viewport_width: f32,
    ) -> Self {
        let layout = breakpoints.resolve(viewport_width);
        Paginator {
            view: PaginatedView::new(Vec::new(), layout.items_per_page()),
            breakpoints,
            layout,
            router: GestureRouter::new(gestures),
            transition: Transition::new(transition),
            displayed_page: 0,
            events: EventEmitter::new(),
        }
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&PaginatorEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Replace the link snapshot and recompute pages with the current layout.
    pub fn set_data(&mut self, items: Vec<LinkRecord>) {
        self.view.set_items(items);
        self.sync_displayed_page();
        info!(
            items = self.view.len(),
            pages = self.view.total_pages(),
            page = self.view.current_page(),
            "Quick links replaced"
        );
        self.events.emit(&PaginatorEvent::DataReplaced {
            total_items: self.view.len(),
            total_pages: self.view.total_pages(),
        });
    }

    /// A load failed: keep the previous snapshot and tell listeners.
    pub fn load_failed(&mut self, error: &str) {
        warn!(error, "Quick link load failed, keeping previous snapshot");
        self.events
            .emit(&PaginatorEvent::LoadFailed(error.to_string()));
    }

    /// Re-resolve the layout. Returns `true` when the page size changed.
    pub fn set_viewport_width(&mut self, viewport_width: f32) -> bool {
        let layout = self.breakpoints.resolve(viewport_width);
        if layout == self.layout {
            return false;
        }
        debug!(
            width = viewport_width,
            columns = layout.columns,
            rows = layout.rows,
            "Viewport layout changed"
        );
        self.layout = layout;
        self.view.set_items_per_page(layout.items_per_page());
        self.sync_displayed_page();
        self.events.emit(&PaginatorEvent::LayoutChanged(layout));
        true
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Option<Effect> {
        match self.router.handle(event) {
            RouterOutput::Ignored | RouterOutput::Feedback { .. } => None,
            RouterOutput::Released { request } => {
                request.and_then(|request| self.request_page_change(request, now))
            }
            RouterOutput::Request(request) => self.request_page_change(request, now),
            RouterOutput::ScheduleWheel { ticket, after } => Some(Effect::Wheel { ticket, after }),
        }
    }

    pub fn wheel_elapsed(&mut self, ticket: WheelTicket, now: Instant) -> Option<Effect> {
        self.router
            .wheel_elapsed(ticket)
            .and_then(|request| self.request_page_change(request, now))
    }

    /// Single entry point for every page change. Requests arriving while a
    /// transition runs are dropped.
    pub fn request_page_change(&mut self, request: PageRequest, now: Instant) -> Option<Effect> {
        if !self.transition.is_idle() {
            debug!(?request, "Page change ignored during transition");
            return None;
        }

        let from = self.view.current_page();
        let direction = match request {
            PageRequest::Next => self.view.next_page().then_some(Direction::Next),
            PageRequest::Prev => self.view.prev_page().then_some(Direction::Prev),
            PageRequest::GoTo(page) => self.view.go_to_page(page),
        }?;

        let to = self.view.current_page();
        debug!(from, to, ?direction, "Page change accepted");
        self.events.emit(&PaginatorEvent::PageChanged {
            from,
            to,
            direction,
        });
        self.transition.begin(direction, now).map(Effect::Transition)
    }

    pub fn on_transition_tick(&mut self, tick: TransitionTick, now: Instant) -> Option<Effect> {
        let before = self.transition.phase();
        let next = self.transition.on_tick(tick, now);
        if matches!(before, Phase::Exiting(_)) && matches!(self.transition.phase(), Phase::Entering(_)) {
            self.displayed_page = self.view.current_page();
        }
        next.map(Effect::Transition)
    }

    fn sync_displayed_page(&mut self) {
        if self.transition.is_idle() {
            self.displayed_page = self.view.current_page();
        } else {
            self.displayed_page = self
                .displayed_page
                .min(self.view.total_pages().saturating_sub(1));
        }
    }

    /// Visual state of the page surface, including drag feedback.
    pub fn frame(&self, now: Instant) -> Frame {
        let mut frame = self.transition.frame_at(now);
        if self.transition.is_idle() {
            frame.offset_x += self.router.drag_offset();
        }
        frame
    }

    /// Items rendered right now, in source order.
    pub fn visible_items(&self) -> &[LinkRecord] {
        self.view.page(self.displayed_page)
    }

    pub fn items(&self) -> &[LinkRecord] {
        self.view.items()
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn current_page(&self) -> usize {
        self.view.current_page()
    }

    pub fn displayed_page(&self) -> usize {
        self.displayed_page
    }

    pub fn total_pages(&self) -> usize {
        self.view.total_pages()
    }

    pub fn can_go_prev(&self) -> bool {
        self.view.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.view.can_go_next()
    }

    /// Page indicators are only shown for more than one page.
    pub fn show_indicators(&self) -> bool {
        self.view.total_pages() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// The current or last drag was a swipe, not a click.
    pub fn drag_exceeded_threshold(&self) -> bool {
        self.router.drag_exceeded_threshold()
    }

    pub fn is_transitioning(&self) -> bool {
        !self.transition.is_idle()
    }

    /// True while something on screen moves without new input.
    pub fn is_animating(&self) -> bool {
        self.is_transitioning() || self.router.is_dragging()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Focus, Key};
    use crate::transition::Step;
    use std::sync::{Arc, Mutex};

    fn links(n: usize) -> Vec<LinkRecord> {
        (0..n)
            .map(|i| LinkRecord::new(i as i64, format!("link {}", i), format!("https://example.com/{}", i)))
            .collect()
    }

    /// 1300 px wide: 10 x 3 = 30 per page.
    fn paginator(n: usize) -> Paginator {
        let mut paginator = Paginator::new(&StartPageConfig::default(), 1300.0);
        paginator.set_data(links(n));
        paginator
    }

    /// Run a transition effect chain to completion.
    fn finish(paginator: &mut Paginator, effect: Option<Effect>, now: Instant) {
        let mut effect = effect;
        while let Some(Effect::Transition(scheduled)) = effect {
            effect = paginator.on_transition_tick(scheduled.tick, now + scheduled.after);
        }
    }

    fn ids(items: &[LinkRecord]) -> Vec<i64> {
        items.iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_viewport_drives_page_size() {
        let mut paginator = Paginator::new(&StartPageConfig::default(), 500.0);
        assert_eq!(paginator.layout(), PageLayout::new(6, 3));
        paginator.set_data(links(26));
        assert_eq!(paginator.total_pages(), 2);

        assert!(paginator.set_viewport_width(300.0));
        assert_eq!(paginator.total_pages(), 3);
        assert!(!paginator.set_viewport_width(320.0));
    }

    #[test]
    fn test_swipe_left_moves_to_next_page() {
        let now = Instant::now();
        let mut paginator = paginator(90);
        assert_eq!(paginator.total_pages(), 3);

        paginator.handle_input(InputEvent::PointerDown { x: 300.0 }, now);
        paginator.handle_input(InputEvent::PointerMove { x: 240.0 }, now);
        let effect = paginator.handle_input(InputEvent::PointerUp, now);
        assert!(matches!(effect, Some(Effect::Transition(_))));
        assert_eq!(paginator.current_page(), 1);

        finish(&mut paginator, effect, now);
        assert_eq!(paginator.displayed_page(), 1);
        assert_eq!(ids(paginator.visible_items()), (30..60).collect::<Vec<i64>>());
    }

    #[test]
    fn test_swipe_over_a_link_is_not_a_click() {
        let now = Instant::now();
        let mut paginator = paginator(90);

        paginator.handle_input(InputEvent::PointerDown { x: 300.0 }, now);
        paginator.handle_input(InputEvent::PointerMove { x: 200.0 }, now);
        assert!(paginator.drag_exceeded_threshold());
        paginator.handle_input(InputEvent::PointerUp, now);
        assert!(paginator.drag_exceeded_threshold());
        assert_eq!(paginator.current_page(), 1);

        paginator.handle_input(InputEvent::PointerDown { x: 200.0 }, now);
        paginator.handle_input(InputEvent::PointerUp, now);
        assert!(!paginator.drag_exceeded_threshold());
    }

    #[test]
    fn test_short_swipe_reverts_offset() {
        let now = Instant::now();
        let mut paginator = paginator(90);

        paginator.handle_input(InputEvent::PointerDown { x: 300.0 }, now);
        paginator.handle_input(InputEvent::PointerMove { x: 270.0 }, now);
        assert!((paginator.frame(now).offset_x + 9.0).abs() < 1e-4);

        assert_eq!(paginator.handle_input(InputEvent::PointerUp, now), None);
        assert_eq!(paginator.current_page(), 0);
        assert_eq!(paginator.frame(now), Frame::REST);
    }

    #[test]
    fn test_content_swaps_only_after_exit() {
        let now = Instant::now();
        let mut paginator = paginator(90);

        let Some(Effect::Transition(exit)) = paginator.request_page_change(PageRequest::Next, now)
        else {
            panic!("expected a transition");
        };
        assert_eq!(exit.tick.step, Step::SwapContent);
        assert_eq!(exit.after, Duration::from_millis(150));
        // old page still rendered while it fades out
        assert_eq!(paginator.displayed_page(), 0);
        assert_eq!(paginator.visible_items()[0].id, 0);

        let next = paginator.on_transition_tick(exit.tick, now + exit.after);
        assert_eq!(paginator.displayed_page(), 1);
        assert_eq!(paginator.visible_items()[0].id, 30);
        assert!(paginator.is_transitioning());

        finish(&mut paginator, next, now);
        assert!(!paginator.is_transitioning());
        assert_eq!(paginator.frame(now + Duration::from_secs(1)), Frame::REST);
    }

    #[test]
    fn test_requests_during_transition_are_dropped() {
        let now = Instant::now();
        let mut paginator = paginator(120);

        let effect = paginator.request_page_change(PageRequest::Next, now);
        assert!(effect.is_some());
        assert_eq!(paginator.request_page_change(PageRequest::Next, now), None);
        assert_eq!(
            paginator.handle_input(
                InputEvent::Key {
                    key: Key::ArrowRight,
                    focus: Focus::Surface
                },
                now
            ),
            None
        );
        assert_eq!(paginator.current_page(), 1);

        finish(&mut paginator, effect, now);
        assert_eq!(paginator.displayed_page(), 1);
        assert!(paginator.request_page_change(PageRequest::GoTo(3), now).is_some());
        assert_eq!(paginator.current_page(), 3);
    }

    #[test]
    fn test_no_wraparound_at_either_end() {
        let now = Instant::now();
        let mut paginator = paginator(60);
        assert_eq!(paginator.request_page_change(PageRequest::Prev, now), None);
        assert_eq!(paginator.current_page(), 0);

        let effect = paginator.request_page_change(PageRequest::GoTo(1), now);
        finish(&mut paginator, effect, now);
        assert_eq!(paginator.request_page_change(PageRequest::Next, now), None);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_filter_shrink_clamps_page() {
        let now = Instant::now();
        let mut paginator = Paginator::new(&StartPageConfig::default(), 1300.0);
        paginator.set_viewport_width(900.0);
        paginator.set_data(links(50));
        assert_eq!(paginator.layout().items_per_page(), 24);
        assert_eq!(paginator.total_pages(), 3);

        let effect = paginator.request_page_change(PageRequest::Next, now);
        finish(&mut paginator, effect, now);
        assert_eq!(paginator.current_page(), 1);

        paginator.set_data(links(5));
        assert_eq!(paginator.total_pages(), 1);
        assert_eq!(paginator.current_page(), 0);
        assert_eq!(paginator.visible_items().len(), 5);
    }

    #[test]
    fn test_empty_snapshot_suppresses_indicators() {
        let mut paginator = paginator(0);
        assert!(paginator.is_empty());
        assert_eq!(paginator.total_pages(), 0);
        assert!(!paginator.show_indicators());
        assert!(paginator.visible_items().is_empty());

        paginator.set_data(links(31));
        assert!(paginator.show_indicators());
    }

    #[test]
    fn test_failed_load_keeps_snapshot() {
        let mut paginator = paginator(40);
        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = Arc::clone(&events);
            paginator.subscribe(move |event| events.lock().unwrap().push(event.clone()));
        }

        paginator.load_failed("connection refused");
        assert_eq!(paginator.items().len(), 40);
        assert_eq!(
            *events.lock().unwrap(),
            vec![PaginatorEvent::LoadFailed("connection refused".to_string())]
        );
    }

    #[test]
    fn test_resize_while_loading_uses_latest_layout() {
        let mut paginator = Paginator::new(&StartPageConfig::default(), 1300.0);
        // fetch started at 30 per page, window shrinks before it resolves
        paginator.set_viewport_width(400.0);
        paginator.set_data(links(26));
        assert_eq!(paginator.layout().items_per_page(), 12);
        assert_eq!(paginator.total_pages(), 3);
    }

    #[test]
    fn test_wheel_burst_changes_one_page() {
        let now = Instant::now();
        let mut paginator = paginator(120);
        let tickets: Vec<WheelTicket> = (0..4)
            .filter_map(|_| match paginator.handle_input(InputEvent::Wheel { delta_y: 1.0 }, now) {
                Some(Effect::Wheel { ticket, .. }) => Some(ticket),
                _ => None,
            })
            .collect();
        assert_eq!(tickets.len(), 4);

        let effects: Vec<Effect> = tickets
            .iter()
            .filter_map(|ticket| paginator.wheel_elapsed(*ticket, now))
            .collect();
        assert_eq!(effects.len(), 1);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn test_page_change_events() {
        let now = Instant::now();
        let mut paginator = paginator(90);
        let events = Arc::new(Mutex::new(Vec::new()));
        let id = {
            let events = Arc::clone(&events);
            paginator.subscribe(move |event| events.lock().unwrap().push(event.clone()))
        };

        let effect = paginator.handle_input(InputEvent::IndicatorClick(2), now);
        finish(&mut paginator, effect, now);
        assert!(paginator.unsubscribe(id));
        paginator.request_page_change(PageRequest::Prev, now);

        assert_eq!(
            *events.lock().unwrap(),
            vec![PaginatorEvent::PageChanged {
                from: 0,
                to: 2,
                direction: Direction::Next
            }]
        );
    }
}
