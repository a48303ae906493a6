pub mod create_category_command;

pub use create_category_command::CreateCategoryCommand;
