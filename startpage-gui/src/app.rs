use iced::event::{self, Event};
use iced::mouse::{self, ScrollDelta};
use iced::widget::{
    Column, Row, Space, button, column, container, pick_list, row, text, text_input,
};
use iced::{
    Background, Border, Color, Element, Length, Padding, Size, Subscription, Task, Theme,
    clipboard, keyboard, time, touch, window,
};
use startpage_core::{
    CategoryFilter, Effect, Focus, InputEvent, Key as NavKey, LinkRecord, Notification,
    NotificationCenter, NotificationKind, PageRequest, Paginator, PaginatorEvent, RestClient,
    SearchEngine, SearchResponse, StartPageConfig, TransitionTick, WheelTicket, builtin_engines,
    category_tabs, default_engine, icon_label,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

// iced opens 1024 x 768 unless told otherwise; corrected once the real size is known
const INITIAL_WIDTH: f32 = 1024.0;

// Horizontal room the page surface can slide within
const MAX_SHIFT: f32 = 60.0;

const TILE_HEIGHT: f32 = 92.0;
const GRID_SPACING: f32 = 12.0;

// Fallback accent for links without a parseable #RRGGBB color
const FALLBACK_RGB: (u8, u8, u8) = (0x00, 0x7D, 0xFF);

const NOTIFICATION_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub enum Message {
    // Data loading
    Refresh,
    LinksLoaded {
        filter: CategoryFilter,
        result: Result<Vec<LinkRecord>, String>,
    },
    CategoriesLoaded(Result<Vec<String>, String>),
    EnginesLoaded(Result<Vec<SearchEngine>, String>),
    CategorySelected(CategoryFilter),

    // Viewport and input
    ViewportResized(Size),
    Input(InputEvent),
    CursorMoved(f32),
    PointerPressed,
    Navigate(PageRequest),

    // Timeline
    WheelElapsed(WheelTicket),
    TransitionTick(TransitionTick),
    Frame(Instant),

    // Links and search
    LinkPressed(i64),
    SearchChanged(String),
    SearchSubmitted,
    SearchResolved {
        fallback_url: String,
        result: Result<SearchResponse, String>,
    },
    EngineSelected(SearchEngine),

    // Notifications
    DismissNotification(u64),
    Tick(Instant),
}

pub struct AppState {
    client: Arc<RestClient>,
    paginator: Paginator,
    tabs: Vec<CategoryFilter>,
    filter: CategoryFilter,
    is_loading: bool,
    notifications: NotificationCenter,
    search_query: String,
    engines: Vec<SearchEngine>,
    selected_engine: Option<SearchEngine>,
    cursor_x: f32,
    now: Instant,
}

impl AppState {
    fn new(config: &StartPageConfig, client: RestClient) -> Self {
        let mut paginator = Paginator::new(config, INITIAL_WIDTH);
        paginator.subscribe(|event| match event {
            PaginatorEvent::PageChanged { from, to, .. } => {
                log::debug!("Page changed {} -> {}", from, to)
            }
            PaginatorEvent::LayoutChanged(layout) => {
                log::debug!("Grid is now {}x{}", layout.columns, layout.rows)
            }
            PaginatorEvent::DataReplaced {
                total_items,
                total_pages,
            } => log::debug!("{} links over {} pages", total_items, total_pages),
            PaginatorEvent::LoadFailed(error) => log::debug!("Load failed: {}", error),
        });

        let engines = builtin_engines();
        let selected_engine = default_engine(&engines).cloned();

        Self {
            client: Arc::new(client),
            paginator,
            tabs: category_tabs(&[]),
            filter: CategoryFilter::All,
            is_loading: false,
            notifications: NotificationCenter::new(config.notifications),
            search_query: String::new(),
            engines,
            selected_engine,
            cursor_x: 0.0,
            now: Instant::now(),
        }
    }

    fn load_links(&mut self) -> Task<Message> {
        self.is_loading = true;
        let client = Arc::clone(&self.client);
        let filter = self.filter.clone();
        let tag = filter.clone();
        Task::perform(
            async move { client.quick_links(&filter).await.map_err(|e| e.to_string()) },
            move |result| Message::LinksLoaded {
                filter: tag.clone(),
                result,
            },
        )
    }

    fn load_categories(&self) -> Task<Message> {
        let client = Arc::clone(&self.client);
        Task::perform(
            async move { client.categories().await.map_err(|e| e.to_string()) },
            Message::CategoriesLoaded,
        )
    }

    fn load_engines(&self) -> Task<Message> {
        let client = Arc::clone(&self.client);
        Task::perform(
            async move { client.search_engines(true).await.map_err(|e| e.to_string()) },
            Message::EnginesLoaded,
        )
    }
}

/// Turn a paginator effect into a sleep on the host timeline.
fn schedule(effect: Option<Effect>) -> Task<Message> {
    let Some(effect) = effect else {
        return Task::none();
    };
    let after = effect.delay();
    Task::perform(
        async move {
            tokio::time::sleep(after).await;
        },
        move |_| match effect {
            Effect::Transition(scheduled) => Message::TransitionTick(scheduled.tick),
            Effect::Wheel { ticket, .. } => Message::WheelElapsed(ticket),
        },
    )
}

pub fn initialize(config: StartPageConfig, client: RestClient) -> (AppState, Task<Message>) {
    let mut state = AppState::new(&config, client);
    let initial_size = window::get_latest()
        .and_then(window::get_size)
        .map(Message::ViewportResized);
    let tasks = Task::batch([
        state.load_links(),
        state.load_categories(),
        state.load_engines(),
        initial_size,
    ]);
    (state, tasks)
}

pub fn update(state: &mut AppState, message: Message) -> Task<Message> {
    let now = Instant::now();
    state.now = now;

    match message {
        Message::Refresh => {
            return Task::batch([state.load_links(), state.load_categories()]);
        }
        Message::LinksLoaded { filter, result } => {
            if filter != state.filter {
                log::debug!("Dropping links for stale category '{}'", filter);
                return Task::none();
            }
            state.is_loading = false;
            match result {
                Ok(links) => state.paginator.set_data(links),
                Err(e) => {
                    state.paginator.load_failed(&e);
                    state
                        .notifications
                        .error(format!("Failed to load quick links: {}", e));
                }
            }
        }
        Message::CategoriesLoaded(result) => match result {
            Ok(categories) => {
                state.tabs = category_tabs(&categories);
                if !state.tabs.contains(&state.filter) {
                    state.tabs.push(state.filter.clone());
                }
            }
            Err(e) => log::warn!("Failed to load categories: {}", e),
        },
        Message::EnginesLoaded(result) => {
            match result {
                Ok(engines) if !engines.is_empty() => state.engines = engines,
                Ok(_) => log::info!("Backend has no active search engines, keeping built-ins"),
                Err(e) => log::warn!("Failed to load search engines, keeping built-ins: {}", e),
            }
            let keep = state
                .selected_engine
                .as_ref()
                .is_some_and(|selected| state.engines.iter().any(|e| e.name == selected.name));
            if !keep {
                state.selected_engine = default_engine(&state.engines).cloned();
            }
        }
        Message::CategorySelected(filter) => {
            if filter == state.filter {
                return Task::none();
            }
            log::debug!("Category selected: {}", filter);
            state.filter = filter;
            return state.load_links();
        }
        Message::ViewportResized(size) => {
            state.paginator.set_viewport_width(size.width);
        }
        Message::Input(event) => {
            return schedule(state.paginator.handle_input(event, now));
        }
        Message::CursorMoved(x) => {
            state.cursor_x = x;
            return schedule(
                state
                    .paginator
                    .handle_input(InputEvent::PointerMove { x }, now),
            );
        }
        Message::PointerPressed => {
            let x = state.cursor_x;
            return schedule(
                state
                    .paginator
                    .handle_input(InputEvent::PointerDown { x }, now),
            );
        }
        Message::Navigate(request) => {
            return schedule(state.paginator.request_page_change(request, now));
        }
        Message::WheelElapsed(ticket) => {
            return schedule(state.paginator.wheel_elapsed(ticket, now));
        }
        Message::TransitionTick(tick) => {
            return schedule(state.paginator.on_transition_tick(tick, now));
        }
        Message::Frame(at) => {
            state.now = at;
        }
        Message::LinkPressed(id) => {
            if state.paginator.drag_exceeded_threshold() {
                log::debug!("Release after swipe, not opening link {}", id);
                return Task::none();
            }
            let Some(link) = state.paginator.items().iter().find(|l| l.id == id) else {
                return Task::none();
            };
            let url = link.url.clone();
            state.notifications.success(format!("Copied {}", url));
            return clipboard::write(url);
        }
        Message::SearchChanged(query) => {
            state.search_query = query;
        }
        Message::SearchSubmitted => {
            let Some(engine) = state.selected_engine.as_ref() else {
                state.notifications.warning("No search engine available");
                return Task::none();
            };
            // built locally first so bad input never reaches the backend
            let fallback_url = match engine.search_url(&state.search_query) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    state.notifications.warning(e.to_string());
                    return Task::none();
                }
            };
            let client = Arc::clone(&state.client);
            let query = state.search_query.clone();
            let engine_name = engine.name.clone();
            return Task::perform(
                async move {
                    client
                        .search(&query, &engine_name)
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| Message::SearchResolved {
                    fallback_url: fallback_url.clone(),
                    result,
                },
            );
        }
        Message::SearchResolved {
            fallback_url,
            result,
        } => {
            let (url, label) = match result {
                Ok(response) => {
                    log::info!("Search via {}: {}", response.search_engine, response.search_url);
                    (response.search_url, response.search_engine)
                }
                Err(e) => {
                    log::warn!("Backend search failed, using local URL: {}", e);
                    let label = state
                        .selected_engine
                        .as_ref()
                        .map(|engine| engine.display_name.clone())
                        .unwrap_or_default();
                    (fallback_url, label)
                }
            };
            state
                .notifications
                .success(format!("{} search URL copied", label));
            return clipboard::write(url);
        }
        Message::EngineSelected(engine) => {
            state.selected_engine = Some(engine);
        }
        Message::DismissNotification(id) => {
            state.notifications.dismiss(id);
        }
        Message::Tick(at) => {
            state.notifications.expire(at);
        }
    }

    Task::none()
}

pub fn subscription(state: &AppState) -> Subscription<Message> {
    let mut subscriptions = vec![
        event::listen_with(map_event),
        window::resize_events().map(|(_id, size)| Message::ViewportResized(size)),
    ];
    if state.paginator.is_animating() {
        subscriptions.push(window::frames().map(Message::Frame));
    }
    if !state.notifications.is_empty() {
        subscriptions.push(time::every(NOTIFICATION_POLL).map(Message::Tick));
    }
    Subscription::batch(subscriptions)
}

/// Raw window events to paginator input. Presses start a drag even when a
/// link tile captured them; `LinkPressed` is dropped after a swipe.
fn map_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    let ignored = status == event::Status::Ignored;
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::CursorMoved(position.x))
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            Some(Message::PointerPressed)
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::Input(InputEvent::PointerUp))
        }
        Event::Mouse(mouse::Event::CursorLeft) => Some(Message::Input(InputEvent::PointerCancel)),
        Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
            let y = match delta {
                ScrollDelta::Lines { y, .. } | ScrollDelta::Pixels { y, .. } => y,
            };
            // iced reports scrolling up as positive
            Some(Message::Input(InputEvent::Wheel { delta_y: -y }))
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            Some(Message::Input(InputEvent::PointerDown { x: position.x }))
        }
        Event::Touch(touch::Event::FingerMoved { position, .. }) => {
            Some(Message::Input(InputEvent::PointerMove { x: position.x }))
        }
        Event::Touch(touch::Event::FingerLifted { .. }) => {
            Some(Message::Input(InputEvent::PointerUp))
        }
        Event::Touch(touch::Event::FingerLost { .. }) => {
            Some(Message::Input(InputEvent::PointerCancel))
        }
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
            let key = match key {
                keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => NavKey::ArrowLeft,
                keyboard::Key::Named(keyboard::key::Named::ArrowRight) => NavKey::ArrowRight,
                _ => return None,
            };
            let focus = if ignored {
                Focus::Surface
            } else {
                Focus::TextEntry
            };
            Some(Message::Input(InputEvent::Key { key, focus }))
        }
        _ => None,
    }
}

pub fn view(state: &AppState) -> Element<Message> {
    let search_bar = row![
        pick_list(
            state.engines.as_slice(),
            state.selected_engine.clone(),
            Message::EngineSelected
        )
        .width(Length::Shrink),
        text_input("Search the web...", &state.search_query)
            .on_input(Message::SearchChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(8)
            .width(Length::Fill),
        button("Search").on_press(Message::SearchSubmitted).padding(8),
    ]
    .spacing(10);

    let tabs = Row::with_children(state.tabs.iter().map(|tab| {
        let style: fn(&Theme, button::Status) -> button::Style = if *tab == state.filter {
            button::primary
        } else {
            button::secondary
        };
        button(text(tab.to_string()).size(14))
            .style(style)
            .padding([4, 12])
            .on_press(Message::CategorySelected(tab.clone()))
            .into()
    }))
    .spacing(8);

    let header = row![
        tabs,
        Space::with_width(Length::Fill),
        button("Refresh")
            .on_press_maybe((!state.is_loading).then_some(Message::Refresh))
            .padding(5),
    ]
    .spacing(10);

    let body: Element<Message> = if state.paginator.is_empty() {
        empty_state(state)
    } else {
        link_grid(state)
    };

    column![
        search_bar,
        header,
        body,
        page_navigation(state),
        notification_list(state.notifications.active()),
    ]
    .spacing(16)
    .padding(20)
    .into()
}

fn empty_state(state: &AppState) -> Element<'_, Message> {
    let message = if state.is_loading {
        "Loading quick links...".to_string()
    } else {
        match &state.filter {
            CategoryFilter::All => "No quick links yet".to_string(),
            CategoryFilter::Named(name) => format!("No quick links in '{}'", name),
        }
    };
    container(text(message).size(16))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn link_grid(state: &AppState) -> Element<'_, Message> {
    let frame = state.paginator.frame(state.now);
    let columns = state.paginator.layout().columns;

    let rows = state.paginator.visible_items().chunks(columns).map(|chunk| {
        let mut cells: Vec<Element<Message>> = chunk
            .iter()
            .map(|link| link_tile(link, frame.opacity))
            .collect();
        while cells.len() < columns {
            cells.push(Space::with_width(Length::Fill).into());
        }
        Row::with_children(cells).spacing(GRID_SPACING).into()
    });

    container(Column::with_children(rows).spacing(GRID_SPACING))
        .padding(Padding {
            top: 0.0,
            bottom: 0.0,
            left: (MAX_SHIFT + frame.offset_x).max(0.0),
            right: (MAX_SHIFT - frame.offset_x).max(0.0),
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn link_tile(link: &LinkRecord, opacity: f32) -> Element<'_, Message> {
    let (r, g, b) = link.rgb().unwrap_or(FALLBACK_RGB);
    let accent = Color {
        a: opacity,
        ..Color::from_rgb8(r, g, b)
    };
    let ink = Color {
        a: opacity,
        ..Color::from_rgb(0.2, 0.2, 0.2)
    };

    // no icon font here; a custom icon shows as its initial and name
    let icon = link
        .has_custom_icon()
        .then(|| icon_label(&link.icon))
        .flatten();
    let badge = icon
        .unwrap_or(link.name.as_str())
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let subtitle = match (link.domain(), icon) {
        (Some(domain), Some(icon)) => format!("{} · {}", domain, icon),
        (Some(domain), None) => domain,
        (None, icon) => icon.unwrap_or_default().to_string(),
    };

    let content = column![
        text(badge).size(24).color(accent),
        text(link.name.as_str()).size(13).color(ink),
        text(subtitle).size(10).color(Color { a: opacity * 0.6, ..ink }),
    ]
    .spacing(4)
    .align_x(iced::Alignment::Center);

    button(container(content).center_x(Length::Fill))
        .style(button::text)
        .width(Length::Fill)
        .height(Length::Fixed(TILE_HEIGHT))
        .on_press(Message::LinkPressed(link.id))
        .into()
}

fn page_navigation(state: &AppState) -> Element<'_, Message> {
    let paginator = &state.paginator;
    if !paginator.show_indicators() {
        // No navigation needed for a single page
        return row![].into();
    }

    let current = paginator.current_page();
    let dots = Row::with_children((0..paginator.total_pages()).map(|page| {
        let glyph = if page == current { "●" } else { "○" };
        button(text(glyph).size(14))
            .style(button::text)
            .padding(2)
            .on_press(Message::Input(InputEvent::IndicatorClick(page)))
            .into()
    }))
    .spacing(4);

    container(
        row![
            button("Previous")
                .on_press_maybe(
                    paginator
                        .can_go_prev()
                        .then_some(Message::Navigate(PageRequest::Prev))
                )
                .padding(5),
            dots,
            text(format!("Page {} of {}", current + 1, paginator.total_pages())).size(14),
            button("Next")
                .on_press_maybe(
                    paginator
                        .can_go_next()
                        .then_some(Message::Navigate(PageRequest::Next))
                )
                .padding(5),
        ]
        .spacing(10)
        .align_y(iced::Alignment::Center),
    )
    .center_x(Length::Fill)
    .into()
}

fn notification_list(notifications: &[Notification]) -> Element<'_, Message> {
    Column::with_children(notifications.iter().map(|notification| {
        let background = match notification.kind {
            NotificationKind::Success => Color::from_rgb8(0x2E, 0x7D, 0x32),
            NotificationKind::Error => Color::from_rgb8(0xC6, 0x28, 0x28),
            NotificationKind::Info => Color::from_rgb8(0x15, 0x65, 0xC0),
            NotificationKind::Warning => Color::from_rgb8(0xEF, 0x6C, 0x00),
        };
        container(
            row![
                text(notification.message.as_str())
                    .size(14)
                    .width(Length::Fill),
                button(text("×").size(14))
                    .style(button::text)
                    .on_press(Message::DismissNotification(notification.id)),
            ]
            .align_y(iced::Alignment::Center),
        )
        .padding([6, 12])
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(background)),
            text_color: Some(Color::WHITE),
            border: Border {
                radius: 6.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
    }))
    .spacing(6)
    .into()
}
