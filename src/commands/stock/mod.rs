pub mod record_movement_command;

pub use record_movement_command::RecordMovementCommand;
