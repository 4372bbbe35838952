use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_internal_error!(WriteError, "Error writing file '{path}'.", { path: &str });

// Parsing-related.
define_client_error!(InvalidJson, "Invalid {json_type} (invalid JSON format).", { json_type: &str });
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidIsoDate, "Invalid ISO date: {date}.", { date: &str });
define_client_error!(InvalidClockTime, "Invalid time of day: {time}.", { time: &str });
define_client_error!(InvalidIsoCurrencyCode, "Invalid ISO currency code: {code}.", { code: &str });
define_client_error!(
    InvalidImageEncoding,
    "Invalid base64 image data for gallery image '{id}'.",
    { id: &str }
);

// Ledger-related.
define_client_error!(
    InvalidMonthlyBudget,
    "Invalid monthly budget: {value}. Budget must be a finite, non-negative amount.",
    { value: f64 }
);

// Gallery-related.
define_client_error!(ImageNotFound, "Gallery image '{id}' not found.", { id: &str });

// Annotation service.
define_client_error!(
    MissingApiKey,
    "Missing annotation service API key. Set the '{var}' environment variable.",
    { var: &str }
);
define_internal_error!(
    AnnotationRequestFailed,
    "Annotation service request failed: {details}.",
    { details: &str }
);
define_internal_error!(
    AnnotationStatusError,
    "Annotation service returned HTTP {status}.",
    { status: u16 }
);
define_internal_error!(
    AnnotationEmptyResponse,
    "Annotation service returned a response without any content."
);

// Export.
define_internal_error!(CsvExportFailed, "Error writing CSV export.");
