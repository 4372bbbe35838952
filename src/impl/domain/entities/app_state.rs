use super::ingestion::IngestionReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Analytics.
    #[default]
    Dashboard,
    /// Vault.
    Gallery,
    /// Archive.
    History,
}

/// Front-end state shared by every view. Updated only through
/// `AppState::reduce`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub active_tab: Tab,
    pub is_analyzing: bool,
    /// Single message slot; a new notice replaces the previous one.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SelectTab(Tab),
    AnalysisStarted,
    IngestionFinished(IngestionReport),
    ReceiptRecorded,
    Notify(String),
    DismissNotice,
}
