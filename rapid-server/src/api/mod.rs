pub mod response;
pub mod users;

pub use response::ApiResponse;
