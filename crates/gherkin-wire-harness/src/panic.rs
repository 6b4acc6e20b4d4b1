//! Panic payload formatting.

use std::any::Any;

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly; anything else is described by its
/// type identifier.
///
/// # Examples
///
/// ```
/// use gherkin_wire_harness::panic_message;
///
/// let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| format!("panic with opaque payload ({:?})", payload.type_id()))
}

#[cfg(test)]
mod tests {
    use super::panic_message;

    #[test]
    fn formats_string_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
    }

    #[test]
    fn describes_opaque_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert!(panic_message(payload.as_ref()).starts_with("panic with opaque payload"));
    }
}
