pub mod bulk;
pub mod query;
pub mod response;
pub mod server_info;
