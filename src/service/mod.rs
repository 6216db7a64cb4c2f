pub mod attendance;
pub mod company;
pub mod paid_leave;
