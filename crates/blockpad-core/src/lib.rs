pub mod buffer;
pub mod cursor;
pub mod document;
pub mod error;
pub mod metrics;
pub mod repeat;
pub mod selection;
pub mod session;
pub mod wrap;

pub use buffer::TextBuffer;
pub use cursor::Direction;
pub use document::{Block, BlockId, BlockRef, Document};
pub use error::{EditorError, Result};
pub use metrics::{MonospaceMetrics, TextMetrics};
pub use repeat::{KeyRepeat, RepeatTimers};
pub use selection::{Anchor, Selection};
pub use session::{EditOutcome, EditSession, FrameInput, KeyInput, PointerHit, PointerInput};
pub use wrap::{LineLayout, VisualPos, WrapSettings};
