pub mod session;
pub mod table;

pub use session::{HttpSession, LoadedPage, PageSession};
pub use table::TableExtractor;
