pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{block, catalog_header, dim, empty, error, header, status, success, warn};
pub use table::{info_table, lines_table, partfunc_table};
pub use theme::{theme, Theme};
