mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_check, handle_diff, handle_list, handle_log, handle_render, handle_show,
    handle_versions, parse_variables,
};
