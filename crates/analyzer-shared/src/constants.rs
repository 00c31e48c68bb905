/// Application name
pub const APP_NAME: &str = "Inventory Analyzer AI";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default base URL the client talks to
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Fixed assistant text injected into a chat when a send fails
pub const SEND_ERROR_TEXT: &str =
    "Sorry, there was an error processing your request. Please try again.";
