// lib.rs - shared core for the home-services admin back-office

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod event;
pub mod forms;
pub mod listing;
pub mod location;
pub mod model;
pub mod paging;

use serde::{Deserialize, Serialize};

use crate::forms::{FranchiseDraft, MetaInfoDraft, TechnicianDraft};
use crate::listing::{text_contains, Queryable};
use crate::location::SelectionState;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::{Event, Screen};
pub use model::Model;
pub use paging::{DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES};

// Collection paths relative to the configured API base.
pub const PINCODES_PATH: &str = "pincodes";
pub const FRANCHISES_PATH: &str = "franchises";
pub const TECHNICIANS_PATH: &str = "technicians";
pub const META_INFOS_PATH: &str = "meta-info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Validation,
    NotFound,
    Deserialization,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// A surfaced failure. Nothing in this core is fatal: the worst outcome
/// of any error is an empty or stale list behind a displayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Deserialization => {
                "The server returned an unexpected response. Please try again.".into()
            }
            ErrorKind::Internal => "Something went wrong on the server. Please try again.".into(),
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.".into(),
        }
    }

    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 | 409 | 422 => ErrorKind::Validation,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            500..=599 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        };

        let message = body
            .and_then(|b| serde_json::from_slice::<ApiErrorResponse>(b).ok())
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error {status}"));

        Self::new(kind, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<crux_http::Error> for AppError {
    fn from(e: crux_http::Error) -> Self {
        match e {
            crux_http::Error::Http(http) => {
                Self::from_http_status(http.code.into(), http.body.as_deref())
            }
            crux_http::Error::Timeout => {
                Self::new(ErrorKind::Timeout, "request timed out")
            }
            crux_http::Error::Json(message) => Self::new(ErrorKind::Deserialization, message),
            other => Self::new(ErrorKind::Network, other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
}

// --- Domain records ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub email: String,
    pub phone: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub area: String,
    #[serde(default)]
    pub sub_area: String,
    #[serde(default)]
    pub active: bool,
}

impl Queryable for Franchise {
    fn matches(&self, query: &str) -> bool {
        text_contains(&self.name, query)
            || text_contains(&self.owner, query)
            || text_contains(&self.email, query)
            || text_contains(&self.city, query)
            || self.pincode.contains(query)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub pincode: String,
    pub area: String,
    #[serde(default)]
    pub sub_area: String,
    #[serde(default)]
    pub active: bool,
}

impl Queryable for Technician {
    fn matches(&self, query: &str) -> bool {
        text_contains(&self.name, query)
            || text_contains(&self.email, query)
            || text_contains(&self.service, query)
            || self.pincode.contains(query)
    }
}

/// A locality-targeted SEO entry. Location fields are empty for
/// site-wide pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub id: String,
    pub page: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub sub_area: String,
}

impl Queryable for MetaInfo {
    fn matches(&self, query: &str) -> bool {
        text_contains(&self.page, query)
            || text_contains(&self.title, query)
            || self.keywords.iter().any(|k| text_contains(k, query))
    }
}

/// One server page of technicians, the offset/limit mode of the record
/// source boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianPage {
    pub items: Vec<Technician>,
    pub total: usize,
}

// --- Save payloads: draft fields merged with the location selection ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchisePayload {
    pub name: String,
    pub owner: String,
    pub email: String,
    pub phone: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub area: String,
    pub sub_area: String,
    pub active: bool,
}

impl FranchisePayload {
    #[must_use]
    pub fn new(draft: &FranchiseDraft, selection: &SelectionState) -> Self {
        Self {
            name: draft.name.clone(),
            owner: draft.owner.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            pincode: selection.pincode.clone(),
            city: selection.city.clone(),
            state: selection.state.clone(),
            area: selection.area.clone(),
            sub_area: selection.sub_area.clone(),
            active: draft.active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub pincode: String,
    pub area: String,
    pub sub_area: String,
    pub active: bool,
}

impl TechnicianPayload {
    #[must_use]
    pub fn new(draft: &TechnicianDraft, selection: &SelectionState) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            service: draft.service.clone(),
            pincode: selection.pincode.clone(),
            area: selection.area.clone(),
            sub_area: selection.sub_area.clone(),
            active: draft.active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfoPayload {
    pub page: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub pincode: String,
    pub area: String,
    pub sub_area: String,
}

impl MetaInfoPayload {
    #[must_use]
    pub fn new(draft: &MetaInfoDraft, selection: &SelectionState) -> Self {
        Self {
            page: draft.page.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            keywords: draft.keyword_list(),
            pincode: selection.pincode.clone(),
            area: selection.area.clone(),
            sub_area: selection.sub_area.clone(),
        }
    }
}

// --- View model ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacingError {
    pub message: String,
    pub code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_count: usize,
    /// "1-10 of 25", or "0 of 0" for an empty collection.
    pub range_label: String,
    pub can_next: bool,
    pub can_prev: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingView<T> {
    pub rows: Vec<T>,
    pub query: String,
    pub pager: PageControls,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPickerView {
    pub selection: SelectionState,
    pub area_options: Vec<String>,
    pub sub_area_options: Vec<String>,
    pub directory_loaded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub screen: Screen,
    pub franchises: ListingView<Franchise>,
    pub technicians: ListingView<Technician>,
    pub meta_infos: ListingView<MetaInfo>,
    pub location: LocationPickerView,
    pub is_loading: bool,
    pub error: Option<UserFacingError>,
}

pub mod app {
    use tracing::{debug, warn};
    use url::Url;
    use uuid::Uuid;

    use super::{
        AppError, ErrorKind, FranchisePayload, ListingView, LocationPickerView, MetaInfoPayload,
        PageControls, TechnicianPayload, UserFacingError, ViewModel, FRANCHISES_PATH,
        META_INFOS_PATH, PINCODES_PATH, TECHNICIANS_PATH,
    };
    use crate::capabilities::Capabilities;
    use crate::event::{Event, HttpResult, Screen};
    use crate::forms::{FranchiseDraft, MetaInfoDraft, TechnicianDraft};
    use crate::listing::{Listing, Queryable};
    use crate::location::{available_areas, available_sub_areas, PincodeRecord, SelectionState};
    use crate::model::Model;

    #[derive(Clone, Copy)]
    enum PageAction {
        GoTo(usize),
        Next,
        Prev,
        Resize(usize),
    }

    #[derive(Default)]
    pub struct App;

    impl App {
        fn endpoint(model: &Model, path: &str) -> Option<Url> {
            let base = model.api_base.as_ref()?;
            match base.join(path) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(path, error = %e, "could not build endpoint URL");
                    None
                }
            }
        }

        fn unconfigured(model: &mut Model) {
            model.set_error(AppError::new(
                ErrorKind::Internal,
                "API base URL is not configured",
            ));
        }

        fn derive_selection(
            records: &[PincodeRecord],
            pincode: &str,
            area: &str,
            sub_area: &str,
        ) -> SelectionState {
            SelectionState::default()
                .with_pincode(records, pincode)
                .with_area(area)
                .with_sub_area(sub_area)
        }

        fn fetch_directory(model: &mut Model, caps: &Capabilities) {
            let Some(url) = Self::endpoint(model, PINCODES_PATH) else {
                Self::unconfigured(model);
                return;
            };
            debug!(%url, "fetching pincode directory");
            caps.http
                .get(url.as_str())
                .expect_json()
                .send(Event::DirectoryFetched);
        }

        fn fetch_franchises(model: &mut Model, caps: &Capabilities) {
            let Some(url) = Self::endpoint(model, FRANCHISES_PATH) else {
                Self::unconfigured(model);
                return;
            };
            debug!(%url, "fetching franchises");
            caps.http
                .get(url.as_str())
                .expect_json()
                .send(Event::FranchisesFetched);
        }

        fn fetch_meta_infos(model: &mut Model, caps: &Capabilities) {
            let Some(url) = Self::endpoint(model, META_INFOS_PATH) else {
                Self::unconfigured(model);
                return;
            };
            debug!(%url, "fetching meta info entries");
            caps.http
                .get(url.as_str())
                .expect_json()
                .send(Event::MetaInfosFetched);
        }

        // Technicians are the offset/limit mode of the record source:
        // one window per request, re-fetched on every page move.
        fn fetch_technicians(model: &mut Model, caps: &Capabilities) {
            let Some(mut url) = Self::endpoint(model, TECHNICIANS_PATH) else {
                Self::unconfigured(model);
                return;
            };
            let page = model.technicians.page();
            url.query_pairs_mut()
                .append_pair("offset", &page.offset().to_string())
                .append_pair("limit", &page.page_size().to_string());
            debug!(%url, "fetching technician page");
            caps.http
                .get(url.as_str())
                .expect_json()
                .send(Event::TechnicianPageFetched);
        }

        fn refetch(model: &mut Model, caps: &Capabilities, screen: Screen) {
            match screen {
                Screen::Franchises => Self::fetch_franchises(model, caps),
                Screen::Technicians => Self::fetch_technicians(model, caps),
                Screen::MetaInfos => Self::fetch_meta_infos(model, caps),
            }
        }

        fn open_screen(model: &mut Model, caps: &Capabilities, screen: Screen) {
            model.screen = screen;
            model.clear_error();
            model.close_form();
            model.is_loading = true;
            match screen {
                Screen::Franchises => model.franchises.reset(),
                Screen::Technicians => model.technicians.reset(),
                Screen::MetaInfos => model.meta_infos.reset(),
            }
            Self::refetch(model, caps, screen);
        }

        fn open_editor(model: &mut Model, caps: &Capabilities, screen: Screen, id: Option<&str>) {
            model.clear_error();
            if !model.directory_loaded {
                Self::fetch_directory(model, caps);
            }

            match screen {
                Screen::Franchises => {
                    let record = id.and_then(|id| {
                        model.franchises.items().iter().find(|f| f.id == id).cloned()
                    });
                    model.selection = record.as_ref().map_or_else(SelectionState::default, |r| {
                        Self::derive_selection(
                            &model.pincode_directory,
                            &r.pincode,
                            &r.area,
                            &r.sub_area,
                        )
                    });
                    model.franchise_draft = Some(
                        record
                            .as_ref()
                            .map_or_else(FranchiseDraft::default, FranchiseDraft::from_record),
                    );
                }
                Screen::Technicians => {
                    let record = id.and_then(|id| {
                        model.technicians.items().iter().find(|t| t.id == id).cloned()
                    });
                    model.selection = record.as_ref().map_or_else(SelectionState::default, |r| {
                        Self::derive_selection(
                            &model.pincode_directory,
                            &r.pincode,
                            &r.area,
                            &r.sub_area,
                        )
                    });
                    model.technician_draft = Some(
                        record
                            .as_ref()
                            .map_or_else(TechnicianDraft::default, TechnicianDraft::from_record),
                    );
                }
                Screen::MetaInfos => {
                    let record = id.and_then(|id| {
                        model.meta_infos.items().iter().find(|m| m.id == id).cloned()
                    });
                    model.selection = record.as_ref().map_or_else(SelectionState::default, |r| {
                        Self::derive_selection(
                            &model.pincode_directory,
                            &r.pincode,
                            &r.area,
                            &r.sub_area,
                        )
                    });
                    model.meta_info_draft = Some(
                        record
                            .as_ref()
                            .map_or_else(MetaInfoDraft::default, MetaInfoDraft::from_record),
                    );
                }
            }
        }

        fn apply_page_action<T: Queryable>(listing: &mut Listing<T>, action: PageAction) {
            match action {
                PageAction::GoTo(page) => listing.go_to(page),
                PageAction::Next => listing.next(),
                PageAction::Prev => listing.prev(),
                PageAction::Resize(size) => listing.set_page_size(size),
            }
        }

        fn page_action(model: &mut Model, caps: &Capabilities, screen: Screen, action: PageAction) {
            match screen {
                Screen::Franchises => Self::apply_page_action(&mut model.franchises, action),
                Screen::MetaInfos => Self::apply_page_action(&mut model.meta_infos, action),
                Screen::Technicians => {
                    let before = model.technicians.page().current_page();
                    Self::apply_page_action(&mut model.technicians, action);
                    // A boundary no-op costs no fetch; a size change always
                    // refetches because the window length changed.
                    let moved = model.technicians.page().current_page() != before;
                    if moved || matches!(action, PageAction::Resize(_)) {
                        Self::fetch_technicians(model, caps);
                    }
                }
            }
        }

        fn dispatch_save(
            model: &mut Model,
            caps: &Capabilities,
            screen: Screen,
            id: Option<&str>,
            payload: &impl serde::Serialize,
            collection: &str,
        ) {
            let path = match id {
                Some(id) => format!("{collection}/{id}"),
                None => collection.to_string(),
            };
            let Some(url) = Self::endpoint(model, &path) else {
                Self::unconfigured(model);
                return;
            };

            let builder = if id.is_some() {
                caps.http.put(url.as_str())
            } else {
                caps.http.post(url.as_str())
            };
            let idempotency_key = Uuid::new_v4().to_string();

            match builder
                .header("Idempotency-Key", idempotency_key.as_str())
                .body_json(payload)
            {
                Ok(request) => {
                    model.is_loading = true;
                    debug!(%url, ?screen, "saving record");
                    request.send(move |result| Event::SaveCompleted { screen, result });
                }
                Err(e) => model.set_error(AppError::from(e)),
            }
        }

        fn dispatch_delete(
            model: &mut Model,
            caps: &Capabilities,
            screen: Screen,
            collection: &str,
            id: &str,
        ) {
            let Some(url) = Self::endpoint(model, &format!("{collection}/{id}")) else {
                Self::unconfigured(model);
                return;
            };
            model.is_loading = true;
            debug!(%url, ?screen, "deleting record");
            caps.http
                .delete(url.as_str())
                .send(move |result| Event::DeleteCompleted { screen, result });
        }

        fn save_franchise(model: &mut Model, caps: &Capabilities, draft: FranchiseDraft) {
            if let Err(e) = draft.validate(&model.selection) {
                model.set_error(AppError::new(ErrorKind::Validation, e.to_string()));
                return;
            }
            let payload = FranchisePayload::new(&draft, &model.selection);
            model.franchise_draft = Some(draft.clone());
            Self::dispatch_save(
                model,
                caps,
                Screen::Franchises,
                draft.id.as_deref(),
                &payload,
                FRANCHISES_PATH,
            );
        }

        fn save_technician(model: &mut Model, caps: &Capabilities, draft: TechnicianDraft) {
            if let Err(e) = draft.validate(&model.selection) {
                model.set_error(AppError::new(ErrorKind::Validation, e.to_string()));
                return;
            }
            let payload = TechnicianPayload::new(&draft, &model.selection);
            model.technician_draft = Some(draft.clone());
            Self::dispatch_save(
                model,
                caps,
                Screen::Technicians,
                draft.id.as_deref(),
                &payload,
                TECHNICIANS_PATH,
            );
        }

        fn save_meta_info(model: &mut Model, caps: &Capabilities, draft: MetaInfoDraft) {
            if let Err(e) = draft.validate(&model.selection) {
                model.set_error(AppError::new(ErrorKind::Validation, e.to_string()));
                return;
            }
            let payload = MetaInfoPayload::new(&draft, &model.selection);
            model.meta_info_draft = Some(draft.clone());
            Self::dispatch_save(
                model,
                caps,
                Screen::MetaInfos,
                draft.id.as_deref(),
                &payload,
                META_INFOS_PATH,
            );
        }

        /// Unwrap a successful JSON body, folding HTTP failures and
        /// malformed payloads into one surfaced error.
        fn into_body<T>(result: HttpResult<T>, what: &str) -> Result<T, AppError> {
            match result {
                Ok(mut response) if response.status().is_success() => {
                    response.take_body().ok_or_else(|| {
                        AppError::new(
                            ErrorKind::Deserialization,
                            format!("empty {what} response"),
                        )
                    })
                }
                Ok(response) => Err(AppError::from_http_status(response.status().into(), None)),
                Err(e) => Err(AppError::from(e)),
            }
        }

        fn into_ok(result: HttpResult<Vec<u8>>) -> Result<(), AppError> {
            match result {
                Ok(response) if response.status().is_success() => Ok(()),
                Ok(mut response) => {
                    let status: u16 = response.status().into();
                    let body = response.take_body();
                    Err(AppError::from_http_status(status, body.as_deref()))
                }
                Err(e) => Err(AppError::from(e)),
            }
        }

        fn apply_directory(model: &mut Model, result: HttpResult<Vec<PincodeRecord>>) {
            match Self::into_body(result, "pincode directory") {
                Ok(records) => {
                    debug!(count = records.len(), "pincode directory loaded");
                    model.pincode_directory = records;
                    model.directory_loaded = true;
                    // A form opened while the fetch was in flight re-derives
                    // its city/state now that the directory is here.
                    if model.has_open_form() && !model.selection.pincode.is_empty() {
                        let s = model.selection.clone();
                        model.selection = Self::derive_selection(
                            &model.pincode_directory,
                            &s.pincode,
                            &s.area,
                            &s.sub_area,
                        );
                    }
                }
                Err(e) => {
                    warn!(error = %e, "pincode directory fetch failed");
                    model.pincode_directory = Vec::new();
                    model.directory_loaded = false;
                    model.set_error(e);
                }
            }
        }

        fn listing_view<T: Queryable + Clone>(listing: &Listing<T>) -> ListingView<T> {
            let visible = listing.visible();
            let page = listing.page();
            let range_label = if visible.total_count == 0 {
                "0 of 0".to_string()
            } else {
                format!(
                    "{}-{} of {}",
                    visible.start_index + 1,
                    visible.end_index,
                    visible.total_count
                )
            };
            ListingView {
                rows: visible.rows.iter().copied().cloned().collect(),
                query: listing.query().to_string(),
                pager: PageControls {
                    current_page: page.current_page(),
                    total_pages: visible.total_pages,
                    page_size: page.page_size(),
                    total_count: visible.total_count,
                    range_label,
                    can_next: page.has_next(),
                    can_prev: page.has_prev(),
                },
            }
        }

        fn location_view(model: &Model) -> LocationPickerView {
            let selection = model.selection.clone();
            let area_options = available_areas(&model.pincode_directory, &selection.pincode)
                .iter()
                .map(|a| a.name.clone())
                .collect();
            let sub_area_options = available_sub_areas(
                &model.pincode_directory,
                &selection.pincode,
                &selection.area,
            )
            .iter()
            .map(|s| s.name.clone())
            .collect();
            LocationPickerView {
                selection,
                area_options,
                sub_area_options,
                directory_loaded: model.directory_loaded,
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            match event {
                Event::AppStarted { api_base } => {
                    // Url::join treats a base without a trailing slash as a
                    // file; normalise so endpoint paths append cleanly.
                    let normalised = if api_base.ends_with('/') {
                        api_base
                    } else {
                        format!("{api_base}/")
                    };
                    match Url::parse(&normalised) {
                        Ok(base) => model.api_base = Some(base),
                        Err(e) => model.set_error(AppError::new(
                            ErrorKind::Validation,
                            format!("invalid API base URL: {e}"),
                        )),
                    }
                    caps.render.render();
                }

                Event::ScreenOpened(screen) => {
                    Self::open_screen(model, caps, screen);
                    caps.render.render();
                }

                Event::SearchChanged { screen, query } => {
                    match screen {
                        Screen::Franchises => model.franchises.set_query(query),
                        Screen::MetaInfos => model.meta_infos.set_query(query),
                        Screen::Technicians => {
                            // No filter parameter at the fetch boundary; a
                            // query change still restarts from page 1.
                            model.technicians.set_query(query);
                            Self::fetch_technicians(model, caps);
                        }
                    }
                    caps.render.render();
                }

                Event::PageRequested { screen, page } => {
                    Self::page_action(model, caps, screen, PageAction::GoTo(page));
                    caps.render.render();
                }

                Event::NextPageRequested(screen) => {
                    Self::page_action(model, caps, screen, PageAction::Next);
                    caps.render.render();
                }

                Event::PrevPageRequested(screen) => {
                    Self::page_action(model, caps, screen, PageAction::Prev);
                    caps.render.render();
                }

                Event::PageSizeChanged { screen, size } => {
                    Self::page_action(model, caps, screen, PageAction::Resize(size));
                    caps.render.render();
                }

                Event::PincodeEntered(code) => {
                    model.selection = model.selection.with_pincode(&model.pincode_directory, &code);
                    caps.render.render();
                }

                Event::AreaPicked(name) => {
                    model.selection = model.selection.with_area(&name);
                    caps.render.render();
                }

                Event::SubAreaPicked(name) => {
                    model.selection = model.selection.with_sub_area(&name);
                    caps.render.render();
                }

                Event::EditOpened { screen, id } => {
                    Self::open_editor(model, caps, screen, id.as_deref());
                    caps.render.render();
                }

                Event::FormClosed => {
                    model.close_form();
                    caps.render.render();
                }

                Event::FranchiseSaveRequested(draft) => {
                    Self::save_franchise(model, caps, *draft);
                    caps.render.render();
                }

                Event::TechnicianSaveRequested(draft) => {
                    Self::save_technician(model, caps, *draft);
                    caps.render.render();
                }

                Event::MetaInfoSaveRequested(draft) => {
                    Self::save_meta_info(model, caps, *draft);
                    caps.render.render();
                }

                Event::DeleteRequested { screen, id } => {
                    let collection = match screen {
                        Screen::Franchises => FRANCHISES_PATH,
                        Screen::Technicians => TECHNICIANS_PATH,
                        Screen::MetaInfos => META_INFOS_PATH,
                    };
                    Self::dispatch_delete(model, caps, screen, collection, &id);
                    caps.render.render();
                }

                Event::ErrorDismissed => {
                    model.clear_error();
                    caps.render.render();
                }

                Event::DirectoryFetched(result) => {
                    Self::apply_directory(model, result);
                    caps.render.render();
                }

                Event::FranchisesFetched(result) => {
                    model.is_loading = false;
                    match Self::into_body(result, "franchise list") {
                        Ok(items) => model.franchises.set_full(items),
                        Err(e) => {
                            warn!(error = %e, "franchise fetch failed");
                            model.franchises.clear();
                            model.set_error(e);
                        }
                    }
                    caps.render.render();
                }

                Event::TechnicianPageFetched(result) => {
                    model.is_loading = false;
                    match Self::into_body(result, "technician page") {
                        Ok(page) => model.technicians.set_window(page.items, page.total),
                        Err(e) => {
                            warn!(error = %e, "technician fetch failed");
                            model.technicians.clear();
                            model.set_error(e);
                        }
                    }
                    caps.render.render();
                }

                Event::MetaInfosFetched(result) => {
                    model.is_loading = false;
                    match Self::into_body(result, "meta info list") {
                        Ok(items) => model.meta_infos.set_full(items),
                        Err(e) => {
                            warn!(error = %e, "meta info fetch failed");
                            model.meta_infos.clear();
                            model.set_error(e);
                        }
                    }
                    caps.render.render();
                }

                Event::SaveCompleted { screen, result } => {
                    model.is_loading = false;
                    match Self::into_ok(result) {
                        Ok(()) => {
                            debug!(?screen, "save succeeded");
                            model.close_form();
                            Self::refetch(model, caps, screen);
                        }
                        Err(e) => {
                            warn!(error = %e, ?screen, "save failed");
                            model.set_error(e);
                        }
                    }
                    caps.render.render();
                }

                Event::DeleteCompleted { screen, result } => {
                    model.is_loading = false;
                    match Self::into_ok(result) {
                        Ok(()) => {
                            debug!(?screen, "delete succeeded");
                            Self::refetch(model, caps, screen);
                        }
                        Err(e) => {
                            warn!(error = %e, ?screen, "delete failed");
                            model.set_error(e);
                        }
                    }
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                screen: model.screen,
                franchises: Self::listing_view(&model.franchises),
                technicians: Self::listing_view(&model.technicians),
                meta_infos: Self::listing_view(&model.meta_infos),
                location: Self::location_view(model),
                is_loading: model.is_loading,
                error: model.active_error.as_ref().map(UserFacingError::from),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_tests {
        use super::*;

        #[test]
        fn status_codes_map_to_kinds() {
            assert_eq!(AppError::from_http_status(400, None).kind, ErrorKind::Validation);
            assert_eq!(AppError::from_http_status(404, None).kind, ErrorKind::NotFound);
            assert_eq!(AppError::from_http_status(408, None).kind, ErrorKind::Timeout);
            assert_eq!(AppError::from_http_status(500, None).kind, ErrorKind::Internal);
            assert_eq!(AppError::from_http_status(418, None).kind, ErrorKind::Unknown);
        }

        #[test]
        fn error_body_message_is_surfaced() {
            let body = br#"{"message":"pincode already assigned"}"#;
            let error = AppError::from_http_status(409, Some(body));
            assert_eq!(error.kind, ErrorKind::Validation);
            assert_eq!(error.user_facing_message(), "pincode already assigned");
        }

        #[test]
        fn malformed_error_body_falls_back_to_status() {
            let error = AppError::from_http_status(500, Some(b"<html>oops</html>"));
            assert_eq!(error.message, "HTTP error 500");
        }

        #[test]
        fn timeout_maps_from_http_error() {
            let error = AppError::from(crux_http::Error::Timeout);
            assert_eq!(error.kind, ErrorKind::Timeout);
        }

        #[test]
        fn display_includes_code() {
            let error = AppError::new(ErrorKind::NotFound, "no such franchise");
            assert_eq!(error.to_string(), "[NOT_FOUND] no such franchise");
        }
    }

    mod query_tests {
        use super::*;

        fn franchise() -> Franchise {
            Franchise {
                id: "f1".into(),
                name: "QuickFix Hyderabad".into(),
                owner: "R. Sharma".into(),
                email: "owner@quickfix.in".into(),
                phone: "9876543210".into(),
                pincode: "500001".into(),
                city: "Hyderabad".into(),
                state: "Telangana".into(),
                area: "Abids".into(),
                sub_area: String::new(),
                active: true,
            }
        }

        #[test]
        fn franchise_matches_name_case_insensitively() {
            assert!(franchise().matches("quickfix"));
            assert!(franchise().matches("SHARMA"));
            assert!(!franchise().matches("bengaluru"));
        }

        #[test]
        fn franchise_matches_pincode_exact_substring() {
            assert!(franchise().matches("500001"));
            assert!(franchise().matches("5000"));
        }

        #[test]
        fn meta_info_matches_keywords() {
            let meta = MetaInfo {
                id: "m1".into(),
                page: "home".into(),
                title: "Home Services".into(),
                description: String::new(),
                keywords: vec!["plumber".into(), "AC Repair".into()],
                pincode: String::new(),
                area: String::new(),
                sub_area: String::new(),
            };
            assert!(meta.matches("ac repair"));
            assert!(!meta.matches("carpenter"));
        }
    }

    mod payload_tests {
        use super::*;
        use crate::location::{Area, PincodeRecord};

        #[test]
        fn franchise_payload_merges_draft_and_selection() {
            let records = vec![PincodeRecord {
                code: "500001".into(),
                city: "Hyderabad".into(),
                state: "Telangana".into(),
                areas: vec![Area {
                    id: "a1".into(),
                    name: "Abids".into(),
                    sub_areas: vec![],
                }],
            }];
            let selection = SelectionState::default()
                .with_pincode(&records, "500001")
                .with_area("Abids");
            let draft = FranchiseDraft {
                name: "QuickFix".into(),
                owner: "R. Sharma".into(),
                email: "owner@quickfix.in".into(),
                phone: "9876543210".into(),
                active: true,
                ..FranchiseDraft::default()
            };

            let payload = FranchisePayload::new(&draft, &selection);
            assert_eq!(payload.city, "Hyderabad");
            assert_eq!(payload.state, "Telangana");
            assert_eq!(payload.area, "Abids");
            assert_eq!(payload.name, "QuickFix");
        }

        #[test]
        fn meta_info_payload_splits_keywords() {
            let draft = MetaInfoDraft {
                page: "home".into(),
                title: "Home".into(),
                keywords: "plumber, electrician".into(),
                ..MetaInfoDraft::default()
            };
            let payload = MetaInfoPayload::new(&draft, &SelectionState::default());
            assert_eq!(payload.keywords, vec!["plumber", "electrician"]);
        }
    }

    mod view_tests {
        use super::*;
        use crate::location::{Area, PincodeRecord, SubArea};
        use crux_core::App as _;

        fn franchise(i: usize) -> Franchise {
            Franchise {
                id: format!("f{i}"),
                name: format!("Franchise {i:02}"),
                owner: "Owner".into(),
                email: "owner@example.in".into(),
                phone: "9876543210".into(),
                pincode: "500001".into(),
                city: "Hyderabad".into(),
                state: "Telangana".into(),
                area: "Abids".into(),
                sub_area: String::new(),
                active: true,
            }
        }

        #[test]
        fn pager_reflects_the_visible_window() {
            let mut model = Model::default();
            model
                .franchises
                .set_full((0..25).map(franchise).collect());

            let vm = App.view(&model);
            let pager = &vm.franchises.pager;
            assert_eq!(pager.total_pages, 3);
            assert_eq!(pager.range_label, "1-10 of 25");
            assert!(pager.can_next);
            assert!(!pager.can_prev);
            assert_eq!(vm.franchises.rows.len(), 10);
        }

        #[test]
        fn empty_listing_has_zero_label_and_one_page() {
            let model = Model::default();
            let vm = App.view(&model);
            assert_eq!(vm.franchises.pager.range_label, "0 of 0");
            assert_eq!(vm.franchises.pager.total_pages, 1);
            assert!(!vm.franchises.pager.can_next);
        }

        #[test]
        fn location_options_follow_the_selection() {
            let mut model = Model::default();
            model.pincode_directory = vec![PincodeRecord {
                code: "500001".into(),
                city: "Hyderabad".into(),
                state: "Telangana".into(),
                areas: vec![
                    Area {
                        id: "a2".into(),
                        name: "banjara Hills".into(),
                        sub_areas: vec![SubArea {
                            id: "s1".into(),
                            name: "Road No 1".into(),
                        }],
                    },
                    Area {
                        id: "a1".into(),
                        name: "Abids".into(),
                        sub_areas: vec![],
                    },
                ],
            }];
            model.directory_loaded = true;
            model.selection = model
                .selection
                .with_pincode(&model.pincode_directory, "500001")
                .with_area("banjara Hills");

            let vm = App.view(&model);
            assert_eq!(vm.location.area_options, vec!["Abids", "banjara Hills"]);
            assert_eq!(vm.location.sub_area_options, vec!["Road No 1"]);
            assert_eq!(vm.location.selection.city, "Hyderabad");
        }
    }
}
