pub mod clipboard_item;

pub use clipboard_item::ClipboardItem;
