mod apply;
mod plan;
mod status;

pub use apply::cmd_apply;
pub use plan::cmd_plan;
pub use status::cmd_status;
