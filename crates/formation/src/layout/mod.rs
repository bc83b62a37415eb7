mod resolver;
mod types;

pub use resolver::resolve_all;
pub use types::{PositionRecord, ResolvedFormation, ScreenPoint};
