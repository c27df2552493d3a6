mod empty_message;
mod help;
mod toast;

/// Namespace for small reusable paragraphs.
pub struct UiComponent;
