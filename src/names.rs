// Content bank conventions

pub const JOURNAL_ID_PREFIX: &str = "Q_J_";
pub const LEDGER_ID_PREFIX: &str = "Q_L_";
pub const TRIAL_BALANCE_ID_PREFIX: &str = "Q_T_";

/// Digits following the id prefix, e.g. Q_J_001.
pub const ID_DIGITS: usize = 3;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Year used when checking month/day dates for calendar validity. A leap
/// year, so 2/29 in content is accepted.
pub const DATE_CHECK_YEAR: i32 = 2024;
