//! Header names of the three quote sheets.

/// Quote number, shared by the quote and item sheets
pub const QUOTE_NUMBER: &str = "견적번호";
/// Item key, shared by the item and process sheets
pub const ITEM_ID: &str = "품목ID";
pub const ITEM_NAME: &str = "품명";
pub const PROCESS: &str = "공정";
pub const QUANTITY: &str = "수량";
pub const UNIT_PRICE: &str = "단가";
pub const AMOUNT: &str = "금액";
pub const NOTE: &str = "비고";

pub const REGISTERED_AT: &str = "등록일";
pub const RECIPIENT: &str = "고객사";
pub const RECIPIENT_CONTACT: &str = "고객사담당자";
pub const MEMO: &str = "메모";
pub const DISCOUNT: &str = "할인";
