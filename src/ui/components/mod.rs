mod choice_list;
mod detail_callout;
mod history_view;
mod key_hints;
mod spinner;
mod status_bar;
pub mod theme;

pub use choice_list::{choice_lines, from_column_width, pad_to_width, render_choices};
pub use detail_callout::{detail_lines, render_details};
pub use history_view::{fragment_spans, row_line, HistoryView};
pub use key_hints::{key_hint_line, render_key_hints, KeyHintBarStyle, KEY_HINTS};
pub use spinner::Spinner;
pub use status_bar::StatusBar;
pub use theme::Theme;
