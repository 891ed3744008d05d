// Bookmark manager presentation layer
// Console rendering only; no state lives here.

pub mod console;
