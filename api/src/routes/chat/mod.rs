pub mod send_message_request;
pub mod send_message_route;
pub mod transcript_route;
