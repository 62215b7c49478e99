// journal constants
pub const DEFAULT_JOURNAL_FILE: &str = ".migrate_versions";
pub const JOURNAL_TEMP_EXTENSION: &str = "tmp";

// file name constants
pub const FORWARD_TOKEN: &str = "up";
pub const REVERSE_TOKEN: &str = "down";
pub const FILENAME_PATTERN_TEMPLATE: &str = r"^([0-9]+)_(.*)\.(up|down)\.{ext}$";
pub const EXTENSION_PLACEHOLDER: &str = "{ext}";

// excerpt constants
pub const EXCERPT_LINES_BEFORE: usize = 3;
pub const EXCERPT_LINES_AFTER: usize = 3;

// executor constants
pub const URL_SCHEME_SEPARATOR: char = ':';

// relative move constants
pub const STEP_FORWARD: i64 = 1;
pub const STEP_BACK: i64 = -1;
