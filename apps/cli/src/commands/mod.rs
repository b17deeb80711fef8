//! 命令定义和实现

pub mod compare;
pub mod config;
pub mod stamp;
pub mod tree;

pub use compare::CompareCommand;
pub use config::ConfigCommand;
pub use stamp::StampCommand;
pub use tree::TreeCommand;
