/**
 * Who may read and who may change entries.
 *  - Read filters per mode (me / partner / couple)
 *  - Author-only mutation checks
 */
pub mod access;
/**
 * Domain types shared by the server and its clients:
 *  users, couples, entries and messages.
 */
pub mod model;

pub mod prelude {
    pub use crate::access::{ensure_author, AccessError, EntryFilter, Mode, Scope};
    pub use crate::model::{
        parse_entry_date, Couple, CoupleError, Entry, EntryDraft, EntryEdit, EntryKind, Message,
        MessageDraft, UserId, UserSummary, ValidationError, Visibility, MAX_EMAIL_LEN,
        MAX_NAME_LEN, MAX_TITLE_LEN,
    };
}
