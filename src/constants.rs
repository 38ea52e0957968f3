//! Application constants for the transformer lookup client
//!
//! Resource locations, user-facing status messages, display placeholders
//! and client table layout.

// =============================================================================
// Resource Locations
// =============================================================================

/// Location of the search index, relative to the source root
pub const INDEX_LOCATION: &str = "api/index/search_index.json";

/// Directory holding one `<id>.json` detail record per transformer
pub const DETAILS_DIR: &str = "api/details";

/// Extension of detail record resources
pub const DETAIL_EXTENSION: &str = "json";

/// Source root used when neither the CLI nor the config names one
pub const DEFAULT_SOURCE_ROOT: &str = "docs";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TRAFO_LOOKUP_";

/// Config file name looked up in the user config directory
pub const CONFIG_FILE_NAME: &str = "trafo-lookup.toml";

// =============================================================================
// Status Messages
// =============================================================================

/// Status messages shown on the page status line
pub mod messages {
    pub const SEARCHING: &str = "Buscando...";
    pub const EMPTY_QUERY: &str = "Por favor ingrese un término de búsqueda.";
    pub const INDEX_LOADING: &str = "Cargando base de datos, intente en unos segundos...";
    pub const INDEX_LOAD_FAILED: &str = "Error: No se pudo cargar la base de datos de búsqueda.";
    pub const NO_RESULTS_PREFIX: &str = "No se encontraron resultados para: ";
    pub const DETAIL_LOAD_FAILED: &str = "Error al cargar detalles del Transformador.";
    pub const NO_CLIENTS: &str = "No hay clientes registrados en este transformador.";

    /// Status line for a lookup miss
    pub fn no_results(query: &str) -> String {
        format!("{}{}", NO_RESULTS_PREFIX, query)
    }
}

// =============================================================================
// Display Placeholders and Badge Defaults
// =============================================================================

/// Placeholder for absent text fields
pub const TEXT_PLACEHOLDER: &str = "-";

/// Placeholder for an absent client count
pub const COUNT_PLACEHOLDER: &str = "0";

/// Status value that marks a transformer as requiring follow-up
pub const FOLLOW_UP_SENTINEL: &str = "LEVANTAR";

pub const BADGE_DANGER_CLASS: &str = "badge-danger";
pub const BADGE_SUCCESS_CLASS: &str = "badge-success";

// =============================================================================
// Client Table
// =============================================================================

/// Client table column headers, in display order
pub const CLIENT_COLUMNS: [&str; 7] = [
    "Nombre",
    "Medidor",
    "NIU",
    "Dirección",
    "Matrícula CT",
    "NIS RAD",
    "NIC",
];
