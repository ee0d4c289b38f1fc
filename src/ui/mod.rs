pub mod plain_renderer;
pub mod theme;
pub mod widgets;

pub use plain_renderer::{MessageRenderer, PlainRenderer, UiError, UiResult};
pub use theme::OutputMode;
pub use widgets::MessageBlock;
