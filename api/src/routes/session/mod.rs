pub mod create_session_route;
