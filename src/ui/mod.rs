/// View layer
///
/// - `form.rs` - the draft inputs and submit button
/// - `list.rs` - the record list with its count header
/// - `card.rs` - one record card plus formatting helpers
/// - `alert.rs` - the modal alert overlay

pub mod alert;
pub mod card;
pub mod form;
pub mod list;
