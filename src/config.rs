//! Application-level configuration constants.

// Backend
pub const API_BASE: &str = match option_env!("SCRAPER_API_BASE") {
    Some(base) => base,
    None => "",
};
pub const SELECTOR_OPTIONS_PATH: &str = "/api/selector-options";
pub const SESSION_DATA_PATH: &str = "/api/data";
pub const EXPORT_PATH: &str = "/export";
pub const SCRAPE_ACTION: &str = "/scrape";
pub const SEARCH_ACTION: &str = "/search";
pub const SESSION_QUERY_PARAM: &str = "session";

// Durable storage
pub const PREFERRED_VIEW_KEY: &str = "preferred_view";

// UI timings (milliseconds)
pub const ALERT_TIMEOUT_MS: f64 = 5_000.0;
pub const ALERT_FADE_MS: f64 = 150.0;
pub const COPY_RESET_MS: u32 = 2_000;
pub const PREVIEW_SUBMIT_DELAY_MS: u32 = 1_200;

// Busy overlay messages
pub const DEFAULT_BUSY_MESSAGE: &str = "Loading...";
pub const ANALYZING_BUSY_MESSAGE: &str =
    "Analyzing page structure and identifying important elements...";
pub const ANALYZE_BUTTON_BUSY_MESSAGE: &str = "Analyzing webpage structure...";
pub const SUBMIT_BUSY_MESSAGE: &str = "Processing website data...";

// Dropdown placeholders
pub const SENTINEL_LABEL: &str = "-- Select from recommended options --";
pub const LOADING_PLACEHOLDER: &str = "Analyzing page structure...";
pub const MANUAL_ENTRY_PLACEHOLDER: &str = "Select manually or try another URL";
pub const FETCH_ERROR_PLACEHOLDER: &str = "Error analyzing page";
pub const ROBOTS_LABEL: &str = "Analyze robots.txt rules";
pub const ROBOTS_VALUE: &str = "analyze";

// Notifications
pub const ANALYSIS_COMPLETE_MESSAGE: &str = "Page analysis complete! Smart selector options loaded.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze page structure";
pub const ANALYSIS_ERROR_MESSAGE: &str = "Failed to analyze page structure. Please try again.";
pub const CLIPBOARD_FAILED_MESSAGE: &str = "Failed to copy to clipboard";
pub const CHART_ERROR_MESSAGE: &str = "Error loading charts. Please try again later.";

// Fallback option lists
pub const DEFAULT_IMAGE_OPTIONS: [&str; 4] =
    ["All Images", "Large Images Only", "Product Images", "Banner Images"];
pub const DEFAULT_LINK_OPTIONS: [&str; 5] = [
    "All Links",
    "Internal Links",
    "External Links",
    "Navigation Links",
    "Footer Links",
];
pub const META_OPTIONS: [&str; 5] = [
    "All Meta Tags",
    "Title & Description",
    "Keywords",
    "Open Graph Data",
    "Twitter Cards",
];

// Charts
pub const CHART_PALETTE: [&str; 7] = [
    "rgba(54, 162, 235, 0.6)",
    "rgba(255, 99, 132, 0.6)",
    "rgba(255, 206, 86, 0.6)",
    "rgba(75, 192, 192, 0.6)",
    "rgba(153, 102, 255, 0.6)",
    "rgba(255, 159, 64, 0.6)",
    "rgba(199, 199, 199, 0.6)",
];
pub const ELEMENT_TYPE_CANVAS: &str = "element_type_chart";
pub const CONTENT_LENGTH_CANVAS: &str = "content_length_chart";
