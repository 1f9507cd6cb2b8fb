pub mod save;
pub mod show;
pub mod watch;

pub use save::*;
pub use show::*;
pub use watch::*;
