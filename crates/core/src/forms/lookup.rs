//! Secondary option lists a form depends on.

/// Load state of one option list. Each list loads independently so the form
/// can show a spinner per selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Lookup<T> {
    #[default]
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

impl<T> Lookup<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Options to render, once loaded.
    pub fn options(&self) -> Option<&[T]> {
        match self {
            Self::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
