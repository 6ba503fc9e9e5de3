//! Record tags, naming conventions and defaults shared by the readers.

// =============================================================================
// Structure (.str) Record Tags
// =============================================================================

/// Mesh point coordinate: `c <id> <x> <y> <z>`
pub const TAG_COORDINATE: &str = "c";

/// Data key header: `s <key1> ... <keyN>`
pub const TAG_DATA_HEADER: &str = "s";

/// Node feature vector: `n <id> <v1> ... <vN>`
pub const TAG_NODE_DATA: &str = "n";

/// Column label: `Q <raw_key> <ignored> <name...>`
pub const TAG_COLUMN_LABEL: &str = "Q";

/// Number of tokens in a coordinate record, tag included
pub const COORDINATE_FIELD_COUNT: usize = 5;

/// Minimum number of shell tokens in a column label record, tag included
pub const LABEL_MIN_FIELD_COUNT: usize = 4;

/// Node records are numbered one below the coordinate records they belong to
pub const NODE_ID_OFFSET: u64 = 1;

// =============================================================================
// Simulator Log (.log) Record Tags
// =============================================================================

/// Column header: `p <ignored> <key1> ... <keyN>`
pub const TAG_LOG_HEADER: &str = "p";

/// Data row: `d <v1> ... <vN>`
pub const TAG_LOG_DATA: &str = "d";

/// Tokens before the first column key in a log header record. A header
/// must name at least one key; `p` with nothing after the count is malformed.
pub const LOG_HEADER_SKIP: usize = 2;

// =============================================================================
// Naming Defaults
// =============================================================================

/// Axis column names, also used for the perpendicular column of a cutline
pub const AXIS_X: &str = "x";
pub const AXIS_Y: &str = "y";

/// Default extension for simulator log files
pub const DEFAULT_LOG_EXTENSION: &str = "log";

/// Prefix for log columns that were never given a descriptive label
pub const DEFAULT_UNRESOLVED_PREFIX: &str = "Column_";

/// Column holding the simulation name in collected log tables
pub const DEFAULT_NAME_COLUMN: &str = "name";

/// Pulls `key value` pairs such as `_Vd1.5` out of a log file stem
pub const DEFAULT_METADATA_PATTERN: &str = r"_([a-zA-Z]+)([\d.eE+-]+)";
