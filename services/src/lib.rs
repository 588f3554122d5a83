pub mod ids;

pub use ids::{new_file_id, new_message_id, new_session_id};
