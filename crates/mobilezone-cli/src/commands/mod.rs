//! Command implementations.

pub mod brands;
pub mod configure;
pub mod list;
pub mod search;
pub mod show;

pub use self::brands::execute_brands;
pub use self::configure::execute_config;
pub use self::list::execute_list;
pub use self::search::{execute_search, search_view};
pub use self::show::execute_show;
