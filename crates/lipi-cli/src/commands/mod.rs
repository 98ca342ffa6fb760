pub mod config_ops;
pub mod convert_ops;
pub mod script_ops;
pub mod typing_ops;
