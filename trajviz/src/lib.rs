pub mod config;
pub mod draw;
pub mod error;
pub mod gif;
pub mod interaction;
pub mod playback;
pub mod plotters_ext;
pub mod scene;
pub mod table;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::draw::*;
    pub use crate::error::{Error, Result};
    pub use crate::gif::*;
    pub use crate::interaction::*;
    pub use crate::playback::*;
    pub use crate::plotters_ext::*;
    pub use crate::scene::*;
    pub use crate::table::*;
    #[cfg(feature = "viewer")]
    pub use crate::viewer::*;
}
