mod book_reader;
mod essay_entry;
mod essays;
mod site_header;
mod theme_toggle;

pub use book_reader::BookReader;
pub use essays::EssaySection;
pub use site_header::SiteHeader;
pub use theme_toggle::ThemeToggle;
