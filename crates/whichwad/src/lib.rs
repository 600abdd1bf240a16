//! whichwad - locate a texture across the WAD archives of a GoldSrc mod.
//!
//! The search core in four pieces:
//!
//! - [`locate`] - discover candidate archives across a SteamPipe layered
//!   installation (layer directories first, base mod directory last)
//! - [`IndexCache`] - parse each archive's texture directory at most once
//! - [`resolve`] - match shell-glob patterns against every indexed archive,
//!   grouping matches by texture name in archive discovery order
//! - [`ChoiceMachine`] - decide which archive to extract from when a name
//!   is found in more than one
//!
//! # Example
//!
//! ```no_run
//! use whichwad::prelude::*;
//!
//! let archives = locate("/games/Half-Life/valve".as_ref())?;
//! let mut cache = IndexCache::new();
//!
//! for pattern in split_patterns("SKY1;CRATE*") {
//!     let resolution = resolve(&archives, pattern, &mut cache)?;
//!     for (name, owners) in resolution.matches.iter() {
//!         println!("{name} found in {} WADs", owners.len());
//!     }
//! }
//! # Ok::<(), whichwad::Error>(())
//! ```

mod choose;
mod error;
mod index;
mod locate;
mod resolve;

pub use choose::{ChoiceMachine, ChoiceState, ConfirmOracle};
pub use error::{Error, Result};
pub use index::{IndexCache, IndexError};
pub use locate::{locate, unsteampipe, WadFile, STEAM_PIPE_SUFFIXES, WAD_SKIP_LIST};
pub use resolve::{resolve, split_patterns, MatchGroup, Resolution};

// Re-export the collaborating crates
pub use whichwad_bmp as bmp;
pub use whichwad_wad as wad;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        locate, resolve, split_patterns, ChoiceMachine, ChoiceState, ConfirmOracle, IndexCache,
        IndexError, MatchGroup, Resolution, WadFile,
    };
    pub use whichwad_bmp::{encode, IndexedImage};
    pub use whichwad_wad::{MipTexture, WadArchive};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
