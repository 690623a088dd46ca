//! Frame resolution and animation assembly.
//!
//! Maps normalized input symbols to pre-rendered ASL imagery and
//! concatenates the decoded frames into a single looping GIF artifact.

mod assembler;
mod assets;
mod resolver;
mod sequence;

pub use assembler::{FRAME_DURATION_MS, assemble};
pub use assets::{AssetLibrary, print_inventory};
pub use resolver::{resolve_digits, resolve_text};
pub use sequence::{FrameSequence, Symbol};
