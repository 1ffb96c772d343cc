pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod icons;
pub mod input;
pub mod layout;
pub mod notification;
pub mod pagination;
pub mod paginator;
pub mod search;
pub mod transition;

pub use api::{
    ApiCall, CategoryFilter, LinkProvider, LinkRecord, LinkUpdate, NewLink, RestClient,
    category_tabs,
};
pub use config::StartPageConfig;
pub use error::StartPageError;
pub use events::{EventEmitter, SubscriptionId};
pub use icons::{auto_icon, icon_label};
pub use input::{Focus, GestureConfig, GestureRouter, InputEvent, Key, PageRequest, WheelTicket};
pub use layout::{Breakpoint, BreakpointTable, PageLayout, resolve_layout};
pub use notification::{Notification, NotificationCenter, NotificationConfig, NotificationKind};
pub use pagination::{Direction, PaginatedView};
pub use paginator::{Effect, Paginator, PaginatorEvent};
pub use search::{
    NewSearchEngine, SearchEngine, SearchEngineUpdate, SearchHistoryEntry, SearchResponse,
    builtin_engines, default_engine, find_engine,
};
pub use transition::{Frame, Transition, TransitionConfig, TransitionTick};

/// Load links for `filter` into the paginator.
///
/// On failure the paginator keeps its previous snapshot and the error is
/// returned for the caller to surface.
pub async fn refresh_links<P: LinkProvider>(
    provider: &P,
    paginator: &mut Paginator,
    filter: &CategoryFilter,
) -> Result<usize, StartPageError> {
    match provider.load_links(filter).await {
        Ok(links) => {
            let count = links.len();
            paginator.set_data(links);
            Ok(count)
        }
        Err(e) => {
            paginator.load_failed(&e.to_string());
            Err(e)
        }
    }
}
