use url::Url;

use crate::event::Screen;
use crate::forms::{FranchiseDraft, MetaInfoDraft, TechnicianDraft};
use crate::listing::Listing;
use crate::location::{PincodeRecord, SelectionState};
use crate::{AppError, Franchise, MetaInfo, Technician};

/// Whole-app state. Mutated only by `App::update`; the shells see it
/// through the `ViewModel` produced by `App::view`.
#[derive(Debug, Default)]
pub struct Model {
    pub api_base: Option<Url>,
    pub screen: Screen,

    // Location reference data, fetched once per form session.
    pub pincode_directory: Vec<PincodeRecord>,
    pub directory_loaded: bool,
    pub selection: SelectionState,

    pub franchises: Listing<Franchise>,
    pub technicians: Listing<Technician>,
    pub meta_infos: Listing<MetaInfo>,

    // At most one form is open at a time; which one follows the screen.
    pub franchise_draft: Option<FranchiseDraft>,
    pub technician_draft: Option<TechnicianDraft>,
    pub meta_info_draft: Option<MetaInfoDraft>,

    pub is_loading: bool,
    pub active_error: Option<AppError>,
}

impl Model {
    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    /// Discard any open draft and its selection state, as on form
    /// submit or unmount.
    pub fn close_form(&mut self) {
        self.franchise_draft = None;
        self.technician_draft = None;
        self.meta_info_draft = None;
        self.selection = SelectionState::default();
    }

    #[must_use]
    pub fn has_open_form(&self) -> bool {
        self.franchise_draft.is_some()
            || self.technician_draft.is_some()
            || self.meta_info_draft.is_some()
    }
}
