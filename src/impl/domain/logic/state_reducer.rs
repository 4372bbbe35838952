use crate::entities::{AppAction, AppState, IngestionOutcome, Tab};

impl AppState {
    /// Applies one action, returning the next state.
    pub fn reduce(self, action: &AppAction) -> AppState {
        match action {
            AppAction::SelectTab(tab) => AppState {
                active_tab: *tab,
                ..self
            },
            AppAction::AnalysisStarted => AppState {
                is_analyzing: true,
                notice: None,
                ..self
            },
            // The attempt already running still owns the analyzing flag.
            AppAction::IngestionFinished(report)
                if matches!(report.outcome, IngestionOutcome::AlreadyInFlight) =>
            {
                AppState {
                    notice: report.outcome.notice().map(str::to_string),
                    ..self
                }
            }
            AppAction::IngestionFinished(report) => {
                let active_tab = match (&report.outcome, &report.image_id) {
                    (IngestionOutcome::Linked(_), _) => Tab::History,
                    (_, Some(_)) => Tab::Gallery,
                    (_, None) => self.active_tab,
                };
                AppState {
                    active_tab,
                    is_analyzing: false,
                    notice: report.outcome.notice().map(str::to_string),
                }
            }
            AppAction::ReceiptRecorded => AppState {
                active_tab: Tab::History,
                ..self
            },
            AppAction::Notify(message) => AppState {
                notice: Some(message.clone()),
                ..self
            },
            AppAction::DismissNotice => AppState {
                notice: None,
                ..self
            },
        }
    }
}
