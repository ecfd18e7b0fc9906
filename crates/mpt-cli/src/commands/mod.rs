pub mod optimize;
pub mod projection;
pub mod validate;
