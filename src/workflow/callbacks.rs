use std::sync::Arc;

use super::{Transition, Workflow};

/// Side effect run when content enters a state or a transition fires.
///
/// The returned string, if any, is a human-readable message for the caller.
/// Returning an error aborts the operation before the state is written.
pub type Callback<T, R> =
    Arc<dyn Fn(&mut T, &CallbackArgs<'_, T, R>) -> anyhow::Result<Option<String>> + Send + Sync>;

/// Everything a callback gets besides the content itself.
pub struct CallbackArgs<'a, T, R> {
    pub workflow: &'a Workflow<T, R>,
    /// The firing transition; `None` for `initialize` and `reset`.
    pub transition: Option<&'a Transition<T, R>>,
    pub request: Option<&'a R>,
}

/// Wrap a closure as a [`Callback`].
pub fn callback<T, R, F>(f: F) -> Callback<T, R>
where
    F: Fn(&mut T, &CallbackArgs<'_, T, R>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
{
    Arc::new(f)
}
