mod core;

pub use self::core::{CssRenderer, CssSink, RendererSettings};
