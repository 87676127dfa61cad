//! Fixed column positions of the production-plan sheet (0-based).

pub const WEEK: usize = 0;
pub const CLIENT: usize = 1;
pub const MODEL: usize = 2;
pub const QUANTITY: usize = 3;
pub const ORDER_DATE: usize = 4;
pub const DEADLINE: usize = 5;
pub const VERSION_MANAGEMENT: usize = 6;
pub const LINE: usize = 7;
pub const BOARD_SIDE: usize = 8;
pub const POST_PROCESS: usize = 9;
pub const ROHS: usize = 10;
/// Column AB
pub const NOTE: usize = 27;

/// Client text marking the next-week waiting section
pub const NEXT_WEEK_MARKER: &str = "차주 대기모델";
/// Client text prefix marking a managed-model section
pub const MANAGED_PREFIX: &str = "관리모델";
