/// Error code registry for the trip planner
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Storage errors
/// - 4000-4999: Trip document errors
/// - 7000-7999: Validation errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;
    pub const CONFIG_PATH_ERROR: u16 = 1006;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_PERMISSION_DENIED: u16 = 3002;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_ALREADY_EXISTS: u16 = 3005;
    pub const STORAGE_CORRUPTED: u16 = 3006;
    pub const STORAGE_WRITE_FAILED: u16 = 3007;
    pub const STORAGE_SERIALIZATION_ERROR: u16 = 3011;

    // Trip document errors (4000-4999)
    pub const DOCUMENT_INVALID_JSON: u16 = 4001;
    pub const DOCUMENT_INVALID_STRUCTURE: u16 = 4002;

    // Validation errors (7000-7999)
    pub const VALIDATION_INVALID_FORMAT: u16 = 7005;
    pub const VALIDATION_INVALID_INPUT: u16 = 7008;
    pub const VALIDATION_INVALID_DATA: u16 = 7009;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1005 => "Invalid value in configuration",
        1006 => "Configuration path error",

        // Storage errors
        3001 => "Storage I/O error",
        3002 => "Storage permission denied",
        3004 => "Storage item not found",
        3005 => "Storage item already exists",
        3006 => "Stored trip document is corrupted",
        3007 => "Failed to write trip document",
        3011 => "Storage serialization error",

        // Trip document errors
        4001 => "Trip document is not valid JSON",
        4002 => "Trip document does not have the expected structure",

        // Validation errors
        7005 => "Invalid format",
        7008 => "Invalid input",
        7009 => "Invalid data",

        _ => "Unknown error code",
    }
}
