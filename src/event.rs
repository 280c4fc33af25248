use serde::{Deserialize, Serialize};

use crate::forms::{FranchiseDraft, MetaInfoDraft, TechnicianDraft};
use crate::location::PincodeRecord;
use crate::{Franchise, MetaInfo, Technician, TechnicianPage};

pub type HttpResult<T> = crux_http::Result<crux_http::Response<T>>;

/// The three back-office screens. Listing events are parameterised by
/// screen so the shells drive every table through the same handful of
/// events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Franchises,
    Technicians,
    MetaInfos,
}

// Capability-result variants are #[serde(skip)]: they never cross the
// shell boundary, only the typed bridge inside the core.
#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    // --- Lifecycle ---
    AppStarted { api_base: String },
    ScreenOpened(Screen),

    // --- Listing ---
    SearchChanged { screen: Screen, query: String },
    PageRequested { screen: Screen, page: usize },
    NextPageRequested(Screen),
    PrevPageRequested(Screen),
    PageSizeChanged { screen: Screen, size: usize },

    // --- Location cascade ---
    PincodeEntered(String),
    AreaPicked(String),
    SubAreaPicked(String),

    // --- Forms ---
    EditOpened { screen: Screen, id: Option<String> },
    FormClosed,
    FranchiseSaveRequested(Box<FranchiseDraft>),
    TechnicianSaveRequested(Box<TechnicianDraft>),
    MetaInfoSaveRequested(Box<MetaInfoDraft>),
    DeleteRequested { screen: Screen, id: String },
    ErrorDismissed,

    // --- Capability results ---
    #[serde(skip)]
    DirectoryFetched(HttpResult<Vec<PincodeRecord>>),
    #[serde(skip)]
    FranchisesFetched(HttpResult<Vec<Franchise>>),
    #[serde(skip)]
    TechnicianPageFetched(HttpResult<TechnicianPage>),
    #[serde(skip)]
    MetaInfosFetched(HttpResult<Vec<MetaInfo>>),
    #[serde(skip)]
    SaveCompleted { screen: Screen, result: HttpResult<Vec<u8>> },
    #[serde(skip)]
    DeleteCompleted { screen: Screen, result: HttpResult<Vec<u8>> },
}
