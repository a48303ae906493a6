pub mod create_item_command;

pub use create_item_command::CreateItemCommand;
