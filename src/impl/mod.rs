// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod gallery_datasource;
        pub(crate) mod gemini_datasource;
        pub(crate) mod ledger_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod clock_time_model;
        pub(crate) mod extraction_model;
        pub(crate) mod gallery_image_model;
        pub(crate) mod generate_content_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod ledger_document_model;
        pub(crate) mod price_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod annotation_repository_impl;
        pub(crate) mod image_repository_impl;
        pub(crate) mod ledger_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod app_state;
        pub(crate) mod category;
        pub(crate) mod clock;
        pub(crate) mod dashboard;
        pub(crate) mod extraction;
        pub(crate) mod gallery_image;
        pub(crate) mod ingestion;
        pub(crate) mod manual_entry;
        pub(crate) mod receipt;
    }
    pub(crate) mod logic {
        pub(crate) mod in_flight_guard;
        pub(crate) mod receipt_builder;
        pub(crate) mod spend_aggregator;
        mod state_reducer;
    }
    pub(crate) mod repositories {
        pub(crate) mod annotation_repository;
        pub(crate) mod image_repository;
        pub(crate) mod ledger_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod dashboard_usecase;
        pub(crate) mod gallery_usecase;
        pub(crate) mod ingest_usecase;
        pub(crate) mod ledger_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod csv_exporter;
    pub(crate) mod report_printer;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::app_state::*;
        pub use crate::domain::entities::category::*;
        pub use crate::domain::entities::clock::*;
        pub use crate::domain::entities::dashboard::*;
        pub use crate::domain::entities::extraction::*;
        pub use crate::domain::entities::gallery_image::*;
        pub use crate::domain::entities::ingestion::*;
        pub use crate::domain::entities::manual_entry::*;
        pub use crate::domain::entities::receipt::*;
    }

    /// Storage and annotation seams, for plugging in alternative backends.
    pub mod repositories {
        pub use crate::domain::repositories::annotation_repository::*;
        pub use crate::domain::repositories::image_repository::*;
        pub use crate::domain::repositories::ledger_repository::*;
    }
}
