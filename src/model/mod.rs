pub mod attendance;
pub mod company;
pub mod paid_leave;
pub mod record_id;
pub mod role;
pub mod user;
