pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_body_from_str() {
        let body = types::MessageBody::new("SWIFT code deleted successfully");
        assert_eq!(body.message, "SWIFT code deleted successfully");
    }
}
