use crate::value::ImageValue;

/// Decides whether an externally controlled value replaces the displayed one.
///
/// Returns the new displayed value, or `None` to keep `previous`. An empty or
/// missing external value never overrides internal state.
pub fn reconcile(previous: &ImageValue, incoming: Option<&ImageValue>) -> Option<ImageValue> {
    match incoming {
        Some(value) if !value.is_empty() && value != previous => Some(value.clone()),
        _ => None,
    }
}
