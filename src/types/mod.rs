mod response;
mod user;

pub use response::{ApiResponse, DataInfo, ListMeta, STATUS_SUCCESS};
pub use user::UserRecord;
