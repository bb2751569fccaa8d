// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Quill

// Server
pub const QUILL_PORT: &str = "QUILL_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const QUILL_HOST: &str = "QUILL_HOST";

// CORS
pub const QUILL_CORS_ORIGIN: &str = "QUILL_CORS_ORIGIN";

// Database
pub const QUILL_DATABASE_PATH: &str = "QUILL_DATABASE_PATH";
pub const QUILL_MAX_CONNECTIONS: &str = "QUILL_MAX_CONNECTIONS";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

pub const DEFAULT_PORT: u16 = 4010;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
